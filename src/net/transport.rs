//! Peer transport: ids, connections and an in-process network
//!
//! Each peer owns one event receiver. Connections are cheap clonable send
//! handles; everything arriving for a peer, from any connection, lands on
//! its receiver in order.

use crate::net::message::NetworkMessage;
use crate::{GameError, Result};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub String);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something that happened on one of a peer's connections
#[derive(Debug)]
pub enum PeerEvent {
    /// A remote peer connected to us
    Opened(Connection),
    Data { from: PeerId, message: NetworkMessage },
    /// A line that did not parse as a message
    Invalid { from: PeerId, error: String },
    Closed(PeerId),
}

/// Commands for a stream connection's writer task
#[derive(Debug)]
pub(crate) enum WriterCommand {
    Line(String),
    Close,
}

#[derive(Debug, Clone)]
enum Link {
    /// Deliver straight into the remote peer's event queue
    Memory {
        remote_events: UnboundedSender<PeerEvent>,
        local: PeerId,
    },
    Stream(UnboundedSender<WriterCommand>),
}

/// Send half of a connection to one remote peer
#[derive(Debug, Clone)]
pub struct Connection {
    remote: PeerId,
    link: Link,
}

impl Connection {
    pub(crate) fn stream(remote: PeerId, writer: UnboundedSender<WriterCommand>) -> Self {
        Connection {
            remote,
            link: Link::Stream(writer),
        }
    }

    pub fn remote(&self) -> &PeerId {
        &self.remote
    }

    pub fn send(&self, message: &NetworkMessage) -> Result<()> {
        let delivered = match &self.link {
            Link::Memory { remote_events, local } => remote_events
                .send(PeerEvent::Data {
                    from: local.clone(),
                    message: message.clone(),
                })
                .is_ok(),
            Link::Stream(writer) => writer.send(WriterCommand::Line(message.to_json()?)).is_ok(),
        };
        if delivered {
            Ok(())
        } else {
            Err(GameError::Network(format!("connection to {} is closed", self.remote)))
        }
    }

    /// Tell the remote side we are gone
    pub fn close(&self) {
        match &self.link {
            Link::Memory { remote_events, local } => {
                let _ = remote_events.send(PeerEvent::Closed(local.clone()));
            }
            Link::Stream(writer) => {
                let _ = writer.send(WriterCommand::Close);
            }
        }
    }
}

#[derive(Default)]
struct Registry {
    peers: FxHashMap<PeerId, UnboundedSender<PeerEvent>>,
    next_id: u64,
}

/// In-process stand-in for a peer-to-peer broker
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    registry: Arc<Mutex<Registry>>,
    registered: Arc<Notify>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new peer and return its id and event stream
    pub fn create_peer(&self) -> (PeerId, UnboundedReceiver<PeerEvent>) {
        let (tx, rx) = unbounded_channel();
        let id = {
            let mut registry = self.lock();
            registry.next_id += 1;
            let id = PeerId(format!("peer-{}", registry.next_id));
            registry.peers.insert(id.clone(), tx);
            id
        };
        self.registered.notify_waiters();
        (id, rx)
    }

    /// Connect `from` to `to`, waiting until `to` exists
    ///
    /// The remote peer receives `PeerEvent::Opened` with a connection back
    /// to `from`. Callers bound the wait with a timeout.
    pub async fn connect(&self, from: &PeerId, to: &PeerId) -> Result<Connection> {
        loop {
            let notified = self.registered.notified();
            if let Some(connection) = self.try_connect(from, to)? {
                return Ok(connection);
            }
            notified.await;
        }
    }

    fn try_connect(&self, from: &PeerId, to: &PeerId) -> Result<Option<Connection>> {
        let registry = self.lock();
        let Some(own_events) = registry.peers.get(from).cloned() else {
            return Err(GameError::Network(format!("unknown local peer {}", from)));
        };
        let Some(remote_events) = registry.peers.get(to).cloned() else {
            return Ok(None);
        };
        drop(registry);

        let back = Connection {
            remote: from.clone(),
            link: Link::Memory {
                remote_events: own_events,
                local: to.clone(),
            },
        };
        remote_events
            .send(PeerEvent::Opened(back))
            .map_err(|_| GameError::Network(format!("peer {} is gone", to)))?;

        Ok(Some(Connection {
            remote: to.clone(),
            link: Link::Memory {
                remote_events,
                local: from.clone(),
            },
        }))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        // A panic while holding the lock leaves the map itself intact
        self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
