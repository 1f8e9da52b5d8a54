//! Client side of a networked game
//!
//! A client never runs rules. It forwards requests for its own seat and
//! replaces its whole view whenever the host sends a state update.

use crate::game::{
    minimal_selection, ActionDebouncer, GameLogger, GameResult, GameStateView, PlayerController, TurnAction,
};
use crate::net::message::{ActionPayload, NetworkMessage, PlayerRequest, StateSnapshot};
use crate::net::tcp::TcpTransport;
use crate::net::transport::{Connection, MemoryNetwork, PeerEvent, PeerId};
use crate::net::NetConfig;
use crate::{GameError, Result};
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

/// Where the client is in the join sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyStatus {
    Idle,
    Connecting,
    /// Joined, waiting for the host to start
    Connected,
    InGame,
    Failed(String),
    Disconnected,
}

impl fmt::Display for LobbyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LobbyStatus::Idle => write!(f, "Not connected."),
            LobbyStatus::Connecting => write!(f, "Connecting to realm..."),
            LobbyStatus::Connected => write!(f, "Connected! Awaiting host..."),
            LobbyStatus::InGame => write!(f, "In game."),
            LobbyStatus::Failed(reason) => write!(f, "Connection failed: {}", reason),
            LobbyStatus::Disconnected => write!(f, "Disconnected from host."),
        }
    }
}

pub struct ClientSession {
    name: String,
    host: Option<Connection>,
    my_seat: Option<usize>,
    snapshot: Option<StateSnapshot>,
    status: LobbyStatus,
    debouncer: ActionDebouncer,
    pub logger: GameLogger,
}

impl ClientSession {
    pub fn new(name: impl Into<String>, config: &NetConfig) -> Self {
        ClientSession {
            name: name.into(),
            host: None,
            my_seat: None,
            snapshot: None,
            status: LobbyStatus::Idle,
            debouncer: ActionDebouncer::new(config.debounce_window),
            logger: GameLogger::new(),
        }
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> &LobbyStatus {
        &self.status
    }

    /// Seat assigned by `START_GAME`
    pub fn my_seat(&self) -> Option<usize> {
        self.my_seat
    }

    /// Latest state received from the host
    pub fn snapshot(&self) -> Option<&StateSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn view(&self) -> Option<GameStateView<'_>> {
        self.snapshot.as_ref().map(GameStateView::from_snapshot)
    }

    /// The host is waiting on this seat
    pub fn is_my_turn(&self) -> bool {
        match (&self.snapshot, self.my_seat) {
            (Some(snapshot), Some(seat)) => !snapshot.game_over && snapshot.active_player() == seat,
            _ => false,
        }
    }

    /// A submission is still unanswered and inside the debounce window
    pub fn is_waiting(&self, now: Instant) -> bool {
        self.debouncer.is_blocked(now)
    }

    pub fn begin_connect(&mut self) {
        self.status = LobbyStatus::Connecting;
        self.logger.normal(&self.status.to_string());
    }

    /// Link established: introduce ourselves
    pub fn on_connected(&mut self, host: Connection) -> Result<()> {
        host.send(&NetworkMessage::Join { name: self.name.clone() })?;
        self.logger.network(&format!("Joined {} as {}.", host.remote(), self.name));
        self.host = Some(host);
        self.status = LobbyStatus::Connected;
        self.logger.normal(&self.status.to_string());
        Ok(())
    }

    pub fn on_connect_failed(&mut self, error: &GameError) {
        self.status = LobbyStatus::Failed(error.to_string());
        self.logger.network_warning(&self.status.to_string());
    }

    /// Apply one event; returns true when a new snapshot arrived
    pub fn handle_event(&mut self, event: PeerEvent) -> bool {
        match event {
            PeerEvent::Data { message, .. } => self.handle_message(message),
            PeerEvent::Invalid { from, error } => {
                self.logger
                    .network_warning(&format!("Unreadable message from {}: {}", from, error));
                false
            }
            PeerEvent::Opened(connection) => {
                self.logger
                    .network_warning(&format!("Refused incoming connection from {}.", connection.remote()));
                connection.close();
                false
            }
            PeerEvent::Closed(peer) => {
                if self.host.as_ref().is_some_and(|host| host.remote() == &peer) {
                    self.host = None;
                    self.status = LobbyStatus::Disconnected;
                    self.logger.network_warning(&self.status.to_string());
                }
                false
            }
        }
    }

    fn handle_message(&mut self, message: NetworkMessage) -> bool {
        match message {
            NetworkMessage::StartGame { your_player_id } => {
                self.my_seat = Some(your_player_id);
                self.status = LobbyStatus::InGame;
                self.logger
                    .normal(&format!("The game has started. You are seat {}.", your_player_id));
                false
            }
            NetworkMessage::StateUpdate(snapshot) => {
                let seen = self.snapshot.as_ref().map_or(0, |s| s.log.len());
                for line in snapshot.log.iter().skip(seen) {
                    self.logger.transcript(line);
                }
                self.snapshot = Some(*snapshot);
                self.debouncer.release();
                true
            }
            other => {
                self.logger
                    .network_warning(&format!("Ignored {} from the host.", other.kind()));
                false
            }
        }
    }

    /// Forward a request for our seat to the host
    ///
    /// Returns `Ok(false)` when an earlier submission is still pending.
    pub fn submit(&mut self, request: PlayerRequest, now: Instant) -> Result<bool> {
        let (Some(seat), Some(host)) = (self.my_seat, self.host.as_ref()) else {
            return Err(GameError::Network("not seated in a game".to_string()));
        };
        if !self.debouncer.try_acquire(now) {
            self.logger.network("Ignored a repeated action.");
            return Ok(false);
        }
        let payload = ActionPayload::from_request(seat, &request);
        host.send(&NetworkMessage::Action(payload))?;
        Ok(true)
    }

    pub fn disconnect(&mut self) {
        if let Some(host) = self.host.take() {
            host.close();
        }
        self.status = LobbyStatus::Disconnected;
    }
}

async fn dial<T>(session: &mut ClientSession, timeout: Duration, attempt: impl Future<Output = Result<T>>) -> Result<T> {
    session.begin_connect();
    let outcome = match tokio::time::timeout(timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(GameError::ConnectTimeout(timeout)),
    };
    if let Err(e) = &outcome {
        session.on_connect_failed(e);
    }
    outcome
}

/// Join a host on an in-process network
pub async fn join_memory(
    session: &mut ClientSession,
    network: &MemoryNetwork,
    local: &PeerId,
    host: &PeerId,
    config: &NetConfig,
) -> Result<()> {
    let connection = dial(session, config.connect_timeout, network.connect(local, host)).await?;
    session.on_connected(connection)
}

/// Join a host over TCP; returns the event stream for the connection
pub async fn join_tcp(
    session: &mut ClientSession,
    addr: &str,
    config: &NetConfig,
) -> Result<UnboundedReceiver<PeerEvent>> {
    let (connection, events) = dial(
        session,
        config.connect_timeout,
        TcpTransport::connect(addr, config.connect_timeout),
    )
    .await?;
    session.on_connected(connection)?;
    Ok(events)
}

/// Wait in the lobby until the host assigns our seat
pub async fn await_seat(session: &mut ClientSession, events: &mut UnboundedReceiver<PeerEvent>) -> Result<usize> {
    loop {
        if let Some(seat) = session.my_seat() {
            return Ok(seat);
        }
        match events.recv().await {
            Some(event) => {
                session.handle_event(event);
            }
            None => session.disconnect(),
        }
        if *session.status() == LobbyStatus::Disconnected {
            return Err(GameError::Network("host closed the connection before the game started".to_string()));
        }
    }
}

/// Play our seat until the host reports game over
pub async fn run_client(
    session: &mut ClientSession,
    events: &mut UnboundedReceiver<PeerEvent>,
    controller: &mut dyn PlayerController,
    config: &NetConfig,
) -> Result<GameResult> {
    let mut attempts = 0u32;
    loop {
        if let Some(snapshot) = session.snapshot() {
            if snapshot.game_over {
                let result = snapshot.result();
                if let (Some(view), Some(seat)) = (session.view(), session.my_seat()) {
                    controller.on_game_end(&view, result.winners.contains(&seat));
                }
                return Ok(result);
            }
        }

        let now = Instant::now();
        if session.is_my_turn() && !session.is_waiting(now) {
            let request = decide(session, controller, attempts >= config.max_rejections)?;
            session.submit(request, now)?;
            attempts += 1;
        }

        let event = if session.is_waiting(Instant::now()) {
            tokio::select! {
                event = events.recv() => event,
                _ = tokio::time::sleep(config.debounce_window) => continue,
            }
        } else {
            events.recv().await
        };

        match event {
            Some(event) => {
                if session.handle_event(event) {
                    attempts = 0;
                }
            }
            None => session.disconnect(),
        }

        if *session.status() == LobbyStatus::Disconnected {
            return match session.snapshot() {
                // The host stops at its turn limit and hangs up
                Some(snapshot) if snapshot.turn_count > config.max_turns => Ok(snapshot.result()),
                _ => Err(GameError::Network("host closed the connection".to_string())),
            };
        }
    }
}

/// Ask the controller for our next request, or fall back after repeated
/// unanswered attempts
fn decide(session: &ClientSession, controller: &mut dyn PlayerController, forced: bool) -> Result<PlayerRequest> {
    let Some(view) = session.view() else {
        return Err(GameError::Network("no state received yet".to_string()));
    };
    let request = match view.interaction() {
        Some(interaction) if forced => PlayerRequest::Resolve(minimal_selection(&view, interaction)),
        Some(interaction) => PlayerRequest::Resolve(controller.choose_selection(&view, interaction)),
        None if forced => PlayerRequest::Turn(TurnAction::EndTurn),
        None => {
            let available = view.legal_actions();
            PlayerRequest::Turn(controller.choose_action(&view, &available))
        }
    };
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GameState};

    fn config() -> NetConfig {
        NetConfig::default()
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(LobbyStatus::Connecting.to_string(), "Connecting to realm...");
        assert_eq!(LobbyStatus::Connected.to_string(), "Connected! Awaiting host...");
    }

    #[tokio::test]
    async fn test_join_sends_name() {
        let network = MemoryNetwork::new();
        let (host, mut host_events) = network.create_peer();
        let (me, _events) = network.create_peer();
        let mut session = ClientSession::new("Ada", &config());

        join_memory(&mut session, &network, &me, &host, &config()).await.unwrap();
        assert_eq!(session.status(), &LobbyStatus::Connected);
        assert!(matches!(host_events.recv().await, Some(PeerEvent::Opened(_))));
        assert!(matches!(
            host_events.recv().await,
            Some(PeerEvent::Data { message: NetworkMessage::Join { name }, .. }) if name == "Ada"
        ));
    }

    #[tokio::test]
    async fn test_join_times_out() {
        let network = MemoryNetwork::new();
        let (me, _events) = network.create_peer();
        let cfg = NetConfig {
            connect_timeout: Duration::from_millis(20),
            ..NetConfig::default()
        };
        let mut session = ClientSession::new("Ada", &cfg);
        let err = join_memory(&mut session, &network, &me, &PeerId("nobody".into()), &cfg)
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::ConnectTimeout(_)));
        assert!(matches!(session.status(), LobbyStatus::Failed(_)));
    }

    #[tokio::test]
    async fn test_submit_is_debounced_until_update() {
        let network = MemoryNetwork::new();
        let (host, mut host_events) = network.create_peer();
        let (me, _events) = network.create_peer();
        let mut session = ClientSession::new("Ada", &config());
        join_memory(&mut session, &network, &me, &host, &config()).await.unwrap();

        session.handle_event(PeerEvent::Data {
            from: host.clone(),
            message: NetworkMessage::StartGame { your_player_id: 1 },
        });
        let game = GameState::new(&GameConfig::new(2).seed(4)).unwrap();
        session.handle_event(PeerEvent::Data {
            from: host.clone(),
            message: NetworkMessage::StateUpdate(Box::new(StateSnapshot::capture(&game))),
        });
        assert_eq!(session.my_seat(), Some(1));
        assert!(!session.is_my_turn());

        let t0 = Instant::now();
        let end = PlayerRequest::Turn(TurnAction::EndTurn);
        assert!(session.submit(end.clone(), t0).unwrap());
        assert!(!session.submit(end.clone(), t0 + Duration::from_millis(50)).unwrap());

        session.handle_event(PeerEvent::Data {
            from: host.clone(),
            message: NetworkMessage::StateUpdate(Box::new(StateSnapshot::capture(&game))),
        });
        assert!(session.submit(end, t0 + Duration::from_millis(60)).unwrap());

        // Opened + Join, then exactly two actions reached the host
        let mut actions = 0;
        while let Ok(event) = host_events.try_recv() {
            if let PeerEvent::Data { message: NetworkMessage::Action(payload), .. } = event {
                assert_eq!(payload.player_index, 1);
                actions += 1;
            }
        }
        assert_eq!(actions, 2);
    }

    #[test]
    fn test_submit_before_start_fails() {
        let mut session = ClientSession::new("Ada", &config());
        assert!(session
            .submit(PlayerRequest::Turn(TurnAction::EndTurn), Instant::now())
            .is_err());
    }

    #[tokio::test]
    async fn test_host_close_disconnects() {
        let network = MemoryNetwork::new();
        let (host, _host_events) = network.create_peer();
        let (me, _events) = network.create_peer();
        let mut session = ClientSession::new("Ada", &config());
        join_memory(&mut session, &network, &me, &host, &config()).await.unwrap();
        session.handle_event(PeerEvent::Closed(host));
        assert_eq!(session.status(), &LobbyStatus::Disconnected);
    }
}
