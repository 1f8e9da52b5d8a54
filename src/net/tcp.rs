//! TCP transport: one JSON message per line
//!
//! Each accepted or dialed socket gets a reader task feeding the owner's
//! event channel and a writer task draining the connection's outbox.

use crate::net::message::NetworkMessage;
use crate::net::transport::{Connection, PeerEvent, PeerId, WriterCommand};
use crate::{GameError, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub struct TcpTransport;

impl TcpTransport {
    /// Bind `addr` and accept connections in the background
    ///
    /// Returns the bound address (useful with port 0) and the host's event
    /// stream, which starts with `Opened` for every accepted socket.
    pub async fn listen(addr: &str) -> Result<(SocketAddr, UnboundedReceiver<PeerEvent>)> {
        let listener = TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;
        let (events_tx, events_rx) = unbounded_channel();

        tokio::spawn(async move {
            loop {
                let Ok((stream, peer_addr)) = listener.accept().await else {
                    break;
                };
                let connection = spawn_connection(stream, PeerId(peer_addr.to_string()), events_tx.clone());
                if events_tx.send(PeerEvent::Opened(connection)).is_err() {
                    break;
                }
            }
        });

        Ok((local, events_rx))
    }

    /// Dial a host, giving up after `timeout`
    pub async fn connect(addr: &str, timeout: Duration) -> Result<(Connection, UnboundedReceiver<PeerEvent>)> {
        let stream = match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(stream) => stream?,
            Err(_) => return Err(GameError::ConnectTimeout(timeout)),
        };
        let (events_tx, events_rx) = unbounded_channel();
        let connection = spawn_connection(stream, PeerId(addr.to_string()), events_tx);
        Ok((connection, events_rx))
    }
}

fn spawn_connection(stream: TcpStream, remote: PeerId, events: UnboundedSender<PeerEvent>) -> Connection {
    let (read_half, mut write_half) = stream.into_split();
    let (writer_tx, mut writer_rx) = unbounded_channel::<WriterCommand>();

    tokio::spawn(async move {
        while let Some(command) = writer_rx.recv().await {
            match command {
                WriterCommand::Line(mut line) => {
                    line.push('\n');
                    if write_half.write_all(line.as_bytes()).await.is_err() {
                        break;
                    }
                }
                WriterCommand::Close => {
                    let _ = write_half.shutdown().await;
                    break;
                }
            }
        }
    });

    let from = remote.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            let event = match NetworkMessage::from_json(&line) {
                Ok(message) => PeerEvent::Data {
                    from: from.clone(),
                    message,
                },
                Err(e) => PeerEvent::Invalid {
                    from: from.clone(),
                    error: e.to_string(),
                },
            };
            if events.send(event).is_err() {
                return;
            }
        }
        let _ = events.send(PeerEvent::Closed(from));
    });

    Connection::stream(remote, writer_tx)
}
