//! Host-authoritative multiplayer
//!
//! The host runs the only rules engine. Clients send `ACTION` requests and
//! render whatever `STATE_UPDATE` the host broadcasts.

pub mod client;
pub mod host;
pub mod message;
pub mod tcp;
pub mod transport;

pub use client::{await_seat, join_memory, join_tcp, run_client, ClientSession, LobbyStatus};
pub use host::{run_host, Delivery, HostSession, HOST_SEAT};
pub use message::{ActionPayload, ActionType, NetworkMessage, PlayerRequest, StateSnapshot};
pub use tcp::TcpTransport;
pub use transport::{Connection, MemoryNetwork, PeerEvent, PeerId};

use crate::game::debounce::DEFAULT_DEBOUNCE_WINDOW;
use std::time::Duration;

/// Default wait for a client to reach the host
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Session settings shared by host and client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetConfig {
    pub connect_timeout: Duration,
    pub debounce_window: Duration,
    /// The host abandons the game once the turn counter passes this
    pub max_turns: u32,
    /// Refused decisions in a row before a seat falls back to ending its turn
    pub max_rejections: u32,
}

impl Default for NetConfig {
    fn default() -> Self {
        NetConfig {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            max_turns: 200,
            max_rejections: 3,
        }
    }
}
