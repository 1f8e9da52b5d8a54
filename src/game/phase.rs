//! Turn phases

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the current turn
///
/// A turn starts in `Action` and moves to `Buy` at most once; cleanup at end
/// of turn returns the next player to `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Action,
    Buy,
}

impl Phase {
    /// Action and Reaction cards may only be played in the Action phase
    pub fn allows_actions(self) -> bool {
        self == Phase::Action
    }

    /// One-directional transition; a Buy phase stays Buy
    pub fn advance_to_buy(&mut self) -> bool {
        let changed = *self == Phase::Action;
        *self = Phase::Buy;
        changed
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Action => write!(f, "Action"),
            Phase::Buy => write!(f, "Buy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_only_moves_forward() {
        let mut phase = Phase::default();
        assert!(phase.allows_actions());
        assert!(phase.advance_to_buy());
        assert!(!phase.advance_to_buy());
        assert_eq!(phase, Phase::Buy);
        assert!(!phase.allows_actions());
    }

    #[test]
    fn test_phase_wire_name() {
        assert_eq!(serde_json::to_string(&Phase::Buy).unwrap(), "\"BUY\"");
    }
}
