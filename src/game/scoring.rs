//! Final scoring

use crate::core::{CardId, Player};
use crate::game::GameState;

/// Cards needed per Gardens point
const GARDENS_DIVISOR: usize = 10;

/// Victory points across every card the player owns
///
/// Each Gardens adds one point per full ten cards owned.
pub fn score(player: &Player) -> i32 {
    let total = player.total_cards();
    player
        .all_cards()
        .map(|card| match card {
            CardId::Gardens => (total / GARDENS_DIVISOR) as i32,
            other => other.def().points,
        })
        .sum()
}

impl GameState {
    /// Scores by seat
    pub fn final_scores(&self) -> Vec<i32> {
        self.players.iter().map(score).collect()
    }

    /// Every seat sharing the top score
    pub fn winners(&self) -> Vec<usize> {
        let scores = self.final_scores();
        let Some(&best) = scores.iter().max() else {
            return Vec::new();
        };
        scores
            .iter()
            .enumerate()
            .filter(|&(_, &s)| s == best)
            .map(|(seat, _)| seat)
            .collect()
    }
}
