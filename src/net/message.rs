//! Wire messages
//!
//! Every message is one JSON object `{"type": ..., "payload": ...}`.

use crate::core::{CardId, Player};
use crate::game::scoring::score;
use crate::game::supply::{GameEndReason, Supply};
use crate::game::{GameResult, GameState, Interaction, Phase, Selection, TurnAction};
use crate::zones::CardPile;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkMessage {
    /// Client → host, first message on a new connection
    Join { name: String },
    /// Host → each client once, assigns the seat
    StartGame {
        #[serde(rename = "yourPlayerId")]
        your_player_id: usize,
    },
    /// Host → all clients after every change
    StateUpdate(Box<StateSnapshot>),
    /// Client → host, a requested action
    Action(ActionPayload),
}

impl NetworkMessage {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            NetworkMessage::Join { .. } => "JOIN",
            NetworkMessage::StartGame { .. } => "START_GAME",
            NetworkMessage::StateUpdate(_) => "STATE_UPDATE",
            NetworkMessage::Action(_) => "ACTION",
        }
    }
}

/// Full copy of the host's state as clients see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub players: Vec<Player>,
    pub supply: Supply,
    pub turn_count: u32,
    pub current_player_index: usize,
    pub log: Vec<String>,
    pub phase: Phase,
    pub trash: CardPile,
    pub game_over: bool,
    #[serde(default)]
    pub end_reason: Option<GameEndReason>,
    /// Head of the host's interaction queue
    #[serde(default)]
    pub interaction: Option<Interaction>,
    #[serde(default = "default_multiplier")]
    pub action_multiplier: u32,
    #[serde(default)]
    pub board_name: String,
}

fn default_multiplier() -> u32 {
    1
}

impl StateSnapshot {
    pub fn capture(game: &GameState) -> Self {
        StateSnapshot {
            players: game.players.clone(),
            supply: game.supply.clone(),
            turn_count: game.turn_count,
            current_player_index: game.current_player,
            log: game.log.clone(),
            phase: game.phase,
            trash: game.trash.clone(),
            game_over: game.game_over,
            end_reason: game.end_reason,
            interaction: game.current_interaction().cloned(),
            action_multiplier: game.action_multiplier,
            board_name: game.board_name.clone(),
        }
    }

    /// Seat whose input the host is waiting for
    pub fn active_player(&self) -> usize {
        self.interaction
            .as_ref()
            .map(|i| i.target_player)
            .unwrap_or(self.current_player_index)
    }

    /// Scores and winners as of this snapshot
    pub fn result(&self) -> GameResult {
        let scores: Vec<i32> = self.players.iter().map(score).collect();
        let best = scores.iter().copied().max();
        let winners = scores
            .iter()
            .enumerate()
            .filter(|&(_, &s)| Some(s) == best)
            .map(|(seat, _)| seat)
            .collect();
        GameResult {
            scores,
            winners,
            turns: self.turn_count,
            end_reason: self.end_reason.unwrap_or(GameEndReason::TurnLimit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    PlayCard,
    BuyCard,
    PlayAllTreasures,
    SkipToBuy,
    EndTurn,
    ResolveInteraction,
}

/// Body of an `ACTION` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPayload {
    pub action_type: ActionType,
    pub player_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

/// What a seat asks the host to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerRequest {
    Turn(TurnAction),
    Resolve(Selection),
}

impl PlayerRequest {
    /// Requests the debouncer guards
    pub fn is_turn_action(&self) -> bool {
        matches!(self, PlayerRequest::Turn(_))
    }
}

impl ActionPayload {
    fn bare(action_type: ActionType, player_index: usize) -> Self {
        ActionPayload {
            action_type,
            player_index,
            card_index: None,
            card_id: None,
            selection: None,
        }
    }

    pub fn from_request(player_index: usize, request: &PlayerRequest) -> Self {
        match request {
            PlayerRequest::Turn(action) => match *action {
                TurnAction::PlayCard { hand_index } => ActionPayload {
                    card_index: Some(hand_index),
                    ..Self::bare(ActionType::PlayCard, player_index)
                },
                TurnAction::BuyCard(card) => ActionPayload {
                    card_id: Some(card),
                    ..Self::bare(ActionType::BuyCard, player_index)
                },
                TurnAction::PlayAllTreasures => Self::bare(ActionType::PlayAllTreasures, player_index),
                TurnAction::SkipToBuy => Self::bare(ActionType::SkipToBuy, player_index),
                TurnAction::EndTurn => Self::bare(ActionType::EndTurn, player_index),
            },
            PlayerRequest::Resolve(selection) => ActionPayload {
                selection: Some(selection.clone()),
                ..Self::bare(ActionType::ResolveInteraction, player_index)
            },
        }
    }

    /// The request this payload describes; `None` when a required field is missing
    pub fn to_request(&self) -> Option<PlayerRequest> {
        let request = match self.action_type {
            ActionType::PlayCard => PlayerRequest::Turn(TurnAction::PlayCard {
                hand_index: self.card_index?,
            }),
            ActionType::BuyCard => PlayerRequest::Turn(TurnAction::BuyCard(self.card_id?)),
            ActionType::PlayAllTreasures => PlayerRequest::Turn(TurnAction::PlayAllTreasures),
            ActionType::SkipToBuy => PlayerRequest::Turn(TurnAction::SkipToBuy),
            ActionType::EndTurn => PlayerRequest::Turn(TurnAction::EndTurn),
            ActionType::ResolveInteraction => PlayerRequest::Resolve(self.selection.clone()?),
        };
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;
    use serde_json::json;

    #[test]
    fn test_start_game_wire_shape() {
        let msg = NetworkMessage::StartGame { your_player_id: 2 };
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"type": "START_GAME", "payload": {"yourPlayerId": 2}}));
    }

    #[test]
    fn test_action_wire_shape() {
        let payload = ActionPayload::from_request(1, &PlayerRequest::Turn(TurnAction::BuyCard(CardId::ThroneRoom)));
        let value = serde_json::to_value(NetworkMessage::Action(payload)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "ACTION",
                "payload": {"actionType": "BUY_CARD", "playerIndex": 1, "cardId": "throne_room"}
            })
        );
    }

    #[test]
    fn test_parses_client_action() {
        let text = r#"{"type":"ACTION","payload":{"actionType":"PLAY_CARD","playerIndex":1,"cardIndex":3}}"#;
        let NetworkMessage::Action(payload) = NetworkMessage::from_json(text).unwrap() else {
            panic!("expected an action");
        };
        assert_eq!(
            payload.to_request(),
            Some(PlayerRequest::Turn(TurnAction::PlayCard { hand_index: 3 }))
        );
    }

    #[test]
    fn test_missing_field_has_no_request() {
        let payload = ActionPayload::bare(ActionType::BuyCard, 0);
        assert_eq!(payload.to_request(), None);
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_state() {
        let game = GameState::new(&GameConfig::new(3).seed(9)).unwrap();
        let snapshot = StateSnapshot::capture(&game);
        let text = NetworkMessage::StateUpdate(Box::new(snapshot.clone())).to_json().unwrap();
        let NetworkMessage::StateUpdate(parsed) = NetworkMessage::from_json(&text).unwrap() else {
            panic!("expected a state update");
        };
        similar_asserts::assert_eq!(*parsed, snapshot);
        assert!(text.contains("\"currentPlayerIndex\":0"));
        assert!(text.contains("\"turnCount\":1"));
    }
}
