//! Card-specific behaviour, dispatched by card id
//!
//! Flat bonuses (+actions, +buys, +coins, +cards) come from the catalog and
//! are applied by `play_from_hand`. Everything here is the part a card does
//! beyond its numbers: queueing decisions, attacks, and oddities like
//! Library. Cards without special behaviour fall through untouched.

use crate::core::catalog::BLOCKER;
use crate::core::{CardId, CardType};
use crate::game::interaction::{CardFilter, Continuation, Interaction};
use crate::game::state::GainDestination;
use crate::game::GameState;

/// Library draws until the hand holds this many cards
pub const LIBRARY_HAND_SIZE: usize = 7;

/// Militia victims keep this many cards
pub const MILITIA_HAND_SIZE: usize = 3;

/// Cards Sentry and Bandit look at
const REVEAL_COUNT: usize = 2;

impl GameState {
    /// Run `card`'s own effect for one repetition
    pub(crate) fn apply_card_effect(&mut self, player: usize, card: CardId, repetition: u32) {
        let name = self.players[player].name.clone();
        match card {
            CardId::Cellar => {
                self.queue_interaction(
                    Interaction::hand(card.name(), player, Continuation::CellarDiscard)
                        .bounds(0, None)
                        .label("Discard & Draw"),
                );
            }
            CardId::Chapel => {
                self.queue_interaction(
                    Interaction::hand(card.name(), player, Continuation::ChapelTrash)
                        .bounds(0, Some(4))
                        .label("Trash Cards"),
                );
            }
            CardId::Sentry => {
                let revealed: Vec<CardId> = (0..REVEAL_COUNT).filter_map(|_| self.reveal_top(player)).collect();
                if !revealed.is_empty() {
                    let max = revealed.len();
                    self.queue_interaction(
                        Interaction::custom(format!("{} (Trash)", card), player, revealed, Continuation::SentryTrash)
                            .bounds(0, Some(max))
                            .label("Trash Selected"),
                    );
                }
            }
            CardId::Library => {
                let needed = LIBRARY_HAND_SIZE.saturating_sub(self.players[player].hand.len());
                if needed > 0 {
                    self.draw(player, needed);
                    self.record(format!("{} drew up to {} cards.", name, LIBRARY_HAND_SIZE));
                }
            }
            CardId::Harbinger => {
                let discard = self.players[player].discard.as_slice().to_vec();
                if !discard.is_empty() {
                    self.queue_interaction(
                        Interaction::custom(card.name(), player, discard, Continuation::HarbingerTopdeck)
                            .exactly(1)
                            .label("Topdeck"),
                    );
                }
            }
            CardId::Vassal => {
                if let Some(revealed) = self.reveal_top(player) {
                    self.players[player].discard.add(revealed);
                    self.record(format!("{}'s {} reveals {}.", name, card, revealed));
                    if revealed.is_action() {
                        self.queue_interaction(
                            Interaction::confirmation(
                                format!("{} ({})", card, revealed),
                                player,
                                format!("Play {} from discard?", revealed),
                                false,
                                Continuation::VassalPlay { card: revealed },
                            )
                            .label("Play It"),
                        );
                    }
                }
            }
            CardId::Workshop => {
                self.queue_interaction(
                    Interaction::supply(card.name(), player, Continuation::WorkshopGain).filter(CardFilter::CostUpTo(4)),
                );
            }
            CardId::Artisan => {
                self.queue_interaction(
                    Interaction::supply(card.name(), player, Continuation::ArtisanGain).filter(CardFilter::CostUpTo(5)),
                );
            }
            CardId::Mine => {
                self.queue_interaction(
                    Interaction::hand(card.name(), player, Continuation::MineTrash)
                        .exactly(1)
                        .filter(CardFilter::OfType(CardType::Treasure))
                        .label("Trash & Upgrade"),
                );
            }
            CardId::Remodel => {
                self.queue_interaction(
                    Interaction::hand(card.name(), player, Continuation::RemodelTrash)
                        .exactly(1)
                        .label("Trash & Remodel"),
                );
            }
            CardId::Moneylender => {
                self.queue_interaction(
                    Interaction::hand(card.name(), player, Continuation::MoneylenderTrash)
                        .bounds(0, Some(1))
                        .filter(CardFilter::Exactly(CardId::Copper))
                        .prompt(format!("Trash a {} (Optional)", CardId::Copper)),
                );
            }
            CardId::Poacher => {
                let empty = self.supply.empty_piles();
                let count = empty.min(self.players[player].hand.len());
                if count > 0 {
                    self.queue_interaction(
                        Interaction::hand(card.name(), player, Continuation::PoacherDiscard)
                            .exactly(count)
                            .label(format!("Discard {} Cards", count)),
                    );
                }
            }
            CardId::Merchant => {
                self.turn.merchants_played += 1;
            }
            CardId::CouncilRoom => {
                for other in self.opponents_of(player) {
                    self.draw(other, 1);
                    let other_name = self.players[other].name.clone();
                    self.record(format!("{} draws a card.", other_name));
                }
            }
            CardId::Militia => self.militia_attack(player, card),
            CardId::Bandit => self.bandit_attack(player, card),
            CardId::Bureaucrat => self.bureaucrat_attack(player, card),
            CardId::Witch => self.witch_attack(player, card, repetition),
            _ => {}
        }
    }

    /// Whether `victim` blocks an attack; logs the block when `announce` is set
    fn blocks_attack(&mut self, victim: usize, attack: CardId, announce: bool) -> bool {
        if !self.players[victim].hand.contains(BLOCKER) {
            return false;
        }
        if announce {
            let victim_name = self.players[victim].name.clone();
            self.record(format!("{} blocks {} with {}.", victim_name, attack, BLOCKER));
        }
        true
    }

    fn militia_attack(&mut self, attacker: usize, card: CardId) {
        for victim in self.opponents_of(attacker) {
            if self.blocks_attack(victim, card, true) {
                continue;
            }
            let hand_size = self.players[victim].hand.len();
            if hand_size <= MILITIA_HAND_SIZE {
                continue;
            }
            let victim_name = self.players[victim].name.clone();
            self.queue_interaction(
                Interaction::hand(
                    format!("{} Attack ({})", card, victim_name),
                    victim,
                    Continuation::MilitiaDiscard,
                )
                .exactly(hand_size - MILITIA_HAND_SIZE)
                .label(format!("Discard Down to {}", MILITIA_HAND_SIZE)),
            );
        }
    }

    fn bandit_attack(&mut self, attacker: usize, card: CardId) {
        let attacker_name = self.players[attacker].name.clone();
        for victim in self.opponents_of(attacker) {
            if self.blocks_attack(victim, card, true) {
                continue;
            }
            let victim_name = self.players[victim].name.clone();
            self.queue_interaction(
                Interaction::confirmation(
                    format!("{} Attack ({})", card, victim_name),
                    victim,
                    format!("{} plays {}. Reveal top {} cards?", attacker_name, card, REVEAL_COUNT),
                    true,
                    Continuation::BanditReveal,
                )
                .label("Reveal Cards"),
            );
        }
    }

    fn bureaucrat_attack(&mut self, attacker: usize, card: CardId) {
        if self.gain(attacker, CardId::Silver, GainDestination::DeckTop) {
            let name = self.players[attacker].name.clone();
            self.record(format!("{} put a {} on their deck.", name, CardId::Silver));
        }
        for victim in self.opponents_of(attacker) {
            if self.blocks_attack(victim, card, true) {
                continue;
            }
            let victim_name = self.players[victim].name.clone();
            if self.players[victim].hand.iter().any(|c| c.is_victory()) {
                self.queue_interaction(
                    Interaction::hand(
                        format!("{} Attack ({})", card, victim_name),
                        victim,
                        Continuation::BureaucratTopdeck,
                    )
                    .exactly(1)
                    .filter(CardFilter::OfType(CardType::Victory))
                    .prompt("Put a Victory card on your deck")
                    .label("Topdeck"),
                );
            } else {
                self.record(format!("{} shows a hand with no Victory cards.", victim_name));
            }
        }
    }

    /// Curses go out in seat order after the attacker until the pile runs dry
    fn witch_attack(&mut self, attacker: usize, card: CardId, repetition: u32) {
        for victim in self.opponents_of(attacker) {
            if self.blocks_attack(victim, card, repetition == 0) {
                continue;
            }
            if !self.gain(victim, CardId::Curse, GainDestination::Discard) {
                break;
            }
            let victim_name = self.players[victim].name.clone();
            self.record(format!("{} gains a {}.", victim_name, CardId::Curse));
        }
    }
}
