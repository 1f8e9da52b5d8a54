//! Host side of a networked game
//!
//! The host owns the only writable `GameState`. `HostSession` is a plain
//! state machine fed one `PeerEvent` (or local decision) at a time; the
//! async `run_host` driver just pumps events into it.

use crate::game::{
    minimal_selection, ActionDebouncer, BoardChoice, GameConfig, GameEndReason, GameLogger, GameResult, GameState, GameStateView,
    PlayerController, TurnAction,
};
use crate::net::message::{ActionPayload, NetworkMessage, PlayerRequest, StateSnapshot};
use crate::net::transport::{Connection, PeerEvent, PeerId};
use crate::net::NetConfig;
use crate::{GameError, Result};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

/// Seat the host plays from
pub const HOST_SEAT: usize = 0;

/// What happened to one event or request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The game changed and a state update went out
    Applied,
    /// The rules engine refused it; nothing changed
    Rejected,
    /// Failed session validation and was ignored
    Dropped,
    /// A lobby change (join, leave, start)
    Lobby,
}

#[derive(Debug)]
struct RemoteSeat {
    connection: Connection,
    name: Option<String>,
    connected: bool,
}

pub struct HostSession {
    host_name: String,
    players: usize,
    board: BoardChoice,
    seed: Option<u64>,
    /// Lobby order; entry `i` plays seat `i + 1`
    remotes: Vec<RemoteSeat>,
    game: Option<GameState>,
    debouncer: ActionDebouncer,
    pub logger: GameLogger,
}

impl HostSession {
    pub fn new(host_name: impl Into<String>, players: usize, board: BoardChoice, config: &NetConfig) -> Self {
        HostSession {
            host_name: host_name.into(),
            players,
            board,
            seed: None,
            remotes: Vec::new(),
            game: None,
            debouncer: ActionDebouncer::new(config.debounce_window),
            logger: GameLogger::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    pub fn is_started(&self) -> bool {
        self.game.is_some()
    }

    /// Every remote seat is connected and has sent its name
    pub fn is_full(&self) -> bool {
        self.remotes.len() + 1 == self.players && self.remotes.iter().all(|r| r.name.is_some())
    }

    /// Status line for the lobby screen
    pub fn lobby_status(&self) -> String {
        if self.is_started() {
            return "Game in progress.".to_string();
        }
        let joined = self.remotes.iter().filter(|r| r.name.is_some()).count();
        if joined + 1 < self.players {
            format!("Waiting for challengers... ({}/{})", joined + 1, self.players)
        } else {
            "All seats taken.".to_string()
        }
    }

    fn seat_of(&self, peer: &PeerId) -> Option<usize> {
        self.remotes
            .iter()
            .position(|r| r.connection.remote() == peer)
            .map(|i| i + 1)
    }

    fn drop_message(&self, reason: String) -> Delivery {
        self.logger.network_warning(&reason);
        Delivery::Dropped
    }

    pub fn handle_event(&mut self, event: PeerEvent) -> Delivery {
        match event {
            PeerEvent::Opened(connection) => {
                if self.is_started() || self.remotes.len() + 1 >= self.players {
                    self.logger
                        .network_warning(&format!("Turned away {}: the lobby is closed.", connection.remote()));
                    connection.close();
                    return Delivery::Dropped;
                }
                self.logger.network(&format!("{} connected.", connection.remote()));
                self.remotes.push(RemoteSeat {
                    connection,
                    name: None,
                    connected: true,
                });
                Delivery::Lobby
            }
            PeerEvent::Data { from, message } => self.handle_message(from, message),
            PeerEvent::Invalid { from, error } => self.drop_message(format!("Unreadable message from {}: {}", from, error)),
            PeerEvent::Closed(peer) => {
                let Some(seat) = self.seat_of(&peer) else {
                    return Delivery::Dropped;
                };
                if self.is_started() {
                    self.remotes[seat - 1].connected = false;
                    self.logger.network_warning(&format!("Seat {} ({}) disconnected.", seat, peer));
                } else {
                    self.remotes.remove(seat - 1);
                    self.logger.network(&format!("{} left the lobby.", peer));
                }
                Delivery::Lobby
            }
        }
    }

    fn handle_message(&mut self, from: PeerId, message: NetworkMessage) -> Delivery {
        let Some(seat) = self.seat_of(&from) else {
            return self.drop_message(format!("{} from unknown peer {}", message.kind(), from));
        };
        match message {
            NetworkMessage::Join { name } => {
                if self.is_started() {
                    return self.drop_message(format!("JOIN from seat {} after the game started", seat));
                }
                self.logger.network(&format!("{} joined as seat {}.", name, seat));
                self.remotes[seat - 1].name = Some(name);
                Delivery::Lobby
            }
            NetworkMessage::Action(payload) => self.apply_remote(seat, payload),
            other => self.drop_message(format!("Unexpected {} from seat {}", other.kind(), seat)),
        }
    }

    /// Create the game, assign seats and send the first state update
    pub fn start(&mut self) -> Result<()> {
        if self.is_started() {
            return Err(GameError::Network("the game has already started".to_string()));
        }
        let mut names = vec![self.host_name.clone()];
        for (i, remote) in self.remotes.iter().enumerate() {
            names.push(remote.name.clone().unwrap_or_else(|| format!("Player {}", i + 2)));
        }
        let mut config = GameConfig::with_names(names).board(self.board.clone());
        config.seed = self.seed;
        let game = GameState::with_logger(&config, self.logger.clone())?;
        self.game = Some(game);

        for (i, remote) in self.remotes.iter().enumerate() {
            let start = NetworkMessage::StartGame { your_player_id: i + 1 };
            if let Err(e) = remote.connection.send(&start) {
                self.logger.network_warning(&e.to_string());
            }
        }
        self.broadcast();
        Ok(())
    }

    /// Send the current state to every connected client
    pub fn broadcast(&self) {
        let Some(game) = &self.game else {
            return;
        };
        let update = NetworkMessage::StateUpdate(Box::new(StateSnapshot::capture(game)));
        for remote in self.remotes.iter().filter(|r| r.connected) {
            if let Err(e) = remote.connection.send(&update) {
                self.logger.network_warning(&e.to_string());
            }
        }
    }

    /// Apply a request from a client seat after checking it is theirs to make
    pub fn apply_remote(&mut self, seat: usize, payload: ActionPayload) -> Delivery {
        let Some(game) = &self.game else {
            return self.drop_message(format!("ACTION from seat {} before the game started", seat));
        };
        if payload.player_index != seat {
            return self.drop_message(format!(
                "Seat {} sent an action for player {}",
                seat, payload.player_index
            ));
        }
        let Some(request) = payload.to_request() else {
            return self.drop_message(format!("Incomplete {:?} from seat {}", payload.action_type, seat));
        };
        let expected = match request {
            PlayerRequest::Turn(_) => game.current_player,
            PlayerRequest::Resolve(_) => game.active_player(),
        };
        if payload.player_index != expected {
            return self.drop_message(format!(
                "Out-of-turn action from seat {} (waiting on seat {})",
                seat, expected
            ));
        }
        self.apply(seat, request)
    }

    /// Apply a decision for the host's own seat
    ///
    /// Turn actions go through the debouncer, which stays held for the whole
    /// window; a turn action inside it is dropped.
    pub fn apply_local(&mut self, request: PlayerRequest, now: Instant) -> Delivery {
        if request.is_turn_action() && !self.debouncer.try_acquire(now) {
            return self.drop_message("Ignored a repeated action.".to_string());
        }
        self.apply(HOST_SEAT, request)
    }

    /// How long until the host seat may submit another turn action
    pub fn debounce_remaining(&self, now: Instant) -> Duration {
        self.debouncer.remaining(now)
    }

    /// Whether `seat` still has a live player behind it
    pub fn is_seat_connected(&self, seat: usize) -> bool {
        match seat.checked_sub(1) {
            None => true,
            Some(i) => self.remotes.get(i).is_some_and(|r| r.connected),
        }
    }

    fn apply(&mut self, seat: usize, request: PlayerRequest) -> Delivery {
        let Some(game) = self.game.as_mut() else {
            return Delivery::Dropped;
        };
        let outcome = match request {
            PlayerRequest::Turn(action) => game.apply(seat, &action),
            PlayerRequest::Resolve(selection) => game.resolve_interaction(seat, selection),
        };
        match outcome {
            Ok(()) => {
                self.broadcast();
                Delivery::Applied
            }
            Err(_) => Delivery::Rejected,
        }
    }

    /// Close every client connection
    pub fn shutdown(&mut self) {
        for remote in self.remotes.iter_mut().filter(|r| r.connected) {
            remote.connection.close();
            remote.connected = false;
        }
    }
}

/// Run a hosted game to the end
///
/// Waits in the lobby until every seat has joined, then alternates between
/// asking `local` for the host seat's decisions and applying client
/// messages as they arrive.
pub async fn run_host(
    mut session: HostSession,
    mut events: UnboundedReceiver<PeerEvent>,
    mut local: Box<dyn PlayerController>,
    config: &NetConfig,
) -> Result<GameResult> {
    session.logger.minimal(&session.lobby_status());
    while !session.is_full() {
        let event = events
            .recv()
            .await
            .ok_or_else(|| GameError::Network("transport closed while in the lobby".to_string()))?;
        if session.handle_event(event) == Delivery::Lobby {
            session.logger.minimal(&session.lobby_status());
        }
    }
    session.start()?;

    let mut rejections = 0u32;
    let reason = loop {
        while let Ok(event) = events.try_recv() {
            session.handle_event(event);
        }
        let Some(game) = session.game() else {
            return Err(GameError::Network("game missing after start".to_string()));
        };
        if game.game_over {
            break game.end_reason.unwrap_or(GameEndReason::Stalled);
        }
        if game.turn_count > config.max_turns {
            break GameEndReason::TurnLimit;
        }

        if game.active_player() == HOST_SEAT {
            let view = GameStateView::from_state(game);
            let forced = rejections >= config.max_rejections;
            let request = match view.interaction() {
                Some(interaction) if forced => PlayerRequest::Resolve(minimal_selection(&view, interaction)),
                Some(interaction) => PlayerRequest::Resolve(local.choose_selection(&view, interaction)),
                None if forced => PlayerRequest::Turn(TurnAction::EndTurn),
                None => {
                    let available = view.legal_actions();
                    PlayerRequest::Turn(local.choose_action(&view, &available))
                }
            };
            if request.is_turn_action() {
                let wait = session.debounce_remaining(Instant::now());
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
            }
            match session.apply_local(request, Instant::now()) {
                Delivery::Rejected if forced => break GameEndReason::Stalled,
                Delivery::Rejected => rejections += 1,
                _ => rejections = 0,
            }
            // Let client tasks run between our own decisions
            tokio::task::yield_now().await;
        } else {
            let waiting_on = game.active_player();
            if !session.is_seat_connected(waiting_on) {
                session.shutdown();
                return Err(GameError::Network(format!(
                    "seat {} disconnected while the game waits on it",
                    waiting_on
                )));
            }
            let event = events
                .recv()
                .await
                .ok_or_else(|| GameError::Network("transport closed during the game".to_string()))?;
            session.handle_event(event);
        }
    };

    let Some(game) = session.game() else {
        return Err(GameError::Network("game missing after start".to_string()));
    };
    let result = GameResult {
        scores: game.final_scores(),
        winners: game.winners(),
        turns: game.turn_count,
        end_reason: reason,
    };
    local.on_game_end(&GameStateView::from_state(game), result.winners.contains(&HOST_SEAT));
    session.logger.minimal(&format!("Game over ({}). Scores: {:?}", reason, result.scores));
    session.shutdown();
    Ok(result)
}
