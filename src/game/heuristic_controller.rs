//! Heuristic AI controller
//!
//! A "big money" player that also knows how to use its action cards:
//! chain non-terminal actions first, cash in every treasure, then buy by
//! a fixed price ladder. Interaction answers rank cards as junk (curses,
//! victory cards, coppers) or keepers and act on the junk first.

use crate::core::{CardId, CardType};
use crate::game::controller::{minimal_selection, GameStateView, PlayerController};
use crate::game::interaction::{Continuation, Interaction, InteractionKind, Selection};
use crate::game::{Phase, TurnAction};
use smallvec::SmallVec;

/// Provinces left when the bot starts greening
const GREENING_THRESHOLD: u32 = 4;
/// Provinces left when the bot starts buying Estates
const ENDGAME_THRESHOLD: u32 = 2;
/// Deck cards per action card the bot aims for
const ACTION_DENSITY: usize = 5;

/// Heuristic AI controller that makes decisions with fixed priorities
pub struct HeuristicController {
    player_index: usize,
}

impl HeuristicController {
    pub fn new(player_index: usize) -> Self {
        HeuristicController { player_index }
    }

    /// Best action card to play, if any is worth playing
    fn pick_action_card(&self, view: &GameStateView, available: &[TurnAction]) -> Option<TurnAction> {
        let hand = view.hand(self.player_index);
        let actions_in_hand = hand.iter().filter(|c| c.is_action()).count();

        available
            .iter()
            .filter_map(|action| match action {
                TurnAction::PlayCard { hand_index } => {
                    let card = *hand.get(*hand_index)?;
                    if !card.is_action() {
                        return None;
                    }
                    // Throne Room needs a second action to copy
                    if card == CardId::ThroneRoom && actions_in_hand < 2 {
                        return None;
                    }
                    Some((action_rank(card), action))
                }
                _ => None,
            })
            .max_by_key(|(rank, _)| *rank)
            .map(|(_, action)| action.clone())
    }

    /// What the price ladder wants for this much gold
    fn desired_buy(&self, view: &GameStateView, gold: u32) -> Vec<CardId> {
        let provinces = view.supply().count(CardId::Province);
        let wants_actions = view
            .player(self.player_index)
            .map(|p| {
                let actions = p.all_cards().filter(|c| c.is_action()).count();
                actions * ACTION_DENSITY < p.total_cards()
            })
            .unwrap_or(false);

        let mut wanted = Vec::new();
        if gold >= 8 {
            wanted.push(CardId::Province);
        }
        if gold >= 6 {
            if provinces <= GREENING_THRESHOLD {
                wanted.push(CardId::Duchy);
            }
            wanted.push(CardId::Gold);
        }
        if gold >= 5 && provinces <= GREENING_THRESHOLD {
            wanted.push(CardId::Duchy);
        }
        if wants_actions {
            let mut kingdom: Vec<CardId> = view
                .supply()
                .kingdom()
                .into_iter()
                .filter(|c| c.is_action() && c.cost() <= gold && c.cost() >= 3)
                .collect();
            kingdom.sort_by_key(|c| std::cmp::Reverse((c.cost(), action_rank(*c))));
            wanted.extend(kingdom);
        }
        if gold >= 3 {
            wanted.push(CardId::Silver);
        }
        if gold >= 2 && provinces <= ENDGAME_THRESHOLD {
            wanted.push(CardId::Estate);
        }
        wanted
    }

    fn pick_cards(&self, view: &GameStateView, interaction: &Interaction) -> Selection {
        let hand_cards = |i: usize| view.selectable_card(interaction, i);
        let mut candidates: SmallVec<[(usize, CardId); 8]> = view
            .eligible_indices(interaction)
            .into_iter()
            .filter_map(|i| hand_cards(i).map(|c| (i, c)))
            .collect();

        // Junk is picked voluntarily; anything else only to reach the minimum
        let is_junk: fn(CardId) -> bool = match interaction.continuation {
            Continuation::CellarDiscard | Continuation::SentryDiscard => is_dead_card,
            Continuation::ChapelTrash | Continuation::SentryTrash => is_trash_fodder,
            Continuation::MoneylenderTrash => is_copper,
            _ => never,
        };
        let rank: fn(CardId) -> i32 = match interaction.continuation {
            Continuation::ChapelTrash
            | Continuation::SentryTrash
            | Continuation::MoneylenderTrash
            | Continuation::RemodelTrash => trash_rank,
            Continuation::MineTrash => mine_rank,
            Continuation::ArtisanTopdeck | Continuation::HarbingerTopdeck => topdeck_rank,
            _ => discard_rank,
        };

        candidates.sort_by_key(|&(_, card)| rank(card));
        let junk = candidates.iter().filter(|(_, c)| is_junk(*c)).count();
        let upper = interaction.max.unwrap_or(candidates.len()).min(candidates.len());
        let count = junk.max(interaction.min).min(upper);

        let mut picked: Vec<usize> = candidates.into_iter().take(count).map(|(i, _)| i).collect();
        picked.sort_unstable();
        Selection::Cards(picked)
    }

    fn pick_pile(&self, view: &GameStateView, interaction: &Interaction) -> Selection {
        let eligible = view.eligible_supply(interaction);
        let best = eligible
            .iter()
            .copied()
            .filter(|c| !matches!(c.card_type(), CardType::Curse | CardType::Victory))
            .max_by_key(|c| (c.cost(), action_rank(*c)))
            .or_else(|| eligible.iter().copied().max_by_key(|c| c.cost()));
        match best {
            Some(card) => Selection::Supply(card),
            None => minimal_selection(view, interaction),
        }
    }
}

impl PlayerController for HeuristicController {
    fn player_index(&self) -> usize {
        self.player_index
    }

    fn name(&self) -> &str {
        "heuristic"
    }

    fn choose_action(&mut self, view: &GameStateView, available: &[TurnAction]) -> TurnAction {
        if view.phase() == Phase::Action {
            if let Some(action) = self.pick_action_card(view, available) {
                return action;
            }
        }
        if available.contains(&TurnAction::PlayAllTreasures) {
            return TurnAction::PlayAllTreasures;
        }

        let gold = view.player(self.player_index).map(|p| p.gold).unwrap_or(0);
        for card in self.desired_buy(view, gold) {
            let buy = TurnAction::BuyCard(card);
            if available.contains(&buy) {
                return buy;
            }
        }
        TurnAction::EndTurn
    }

    fn choose_selection(&mut self, view: &GameStateView, interaction: &Interaction) -> Selection {
        match interaction.kind {
            InteractionKind::HandSelection | InteractionKind::CustomSelection => self.pick_cards(view, interaction),
            InteractionKind::SupplySelection => self.pick_pile(view, interaction),
            InteractionKind::Confirmation => Selection::Confirm(true),
        }
    }
}

/// Higher is played first; non-terminal actions come before terminals
fn action_rank(card: CardId) -> i32 {
    let def = card.def();
    let chaining = if def.actions > 0 { 100 } else { 0 };
    let throne = if card == CardId::ThroneRoom { 200 } else { 0 };
    throne + chaining + card.cost() as i32
}

fn is_dead_card(card: CardId) -> bool {
    matches!(card.card_type(), CardType::Victory | CardType::Curse)
}

fn is_trash_fodder(card: CardId) -> bool {
    matches!(card, CardId::Curse | CardId::Estate | CardId::Copper)
}

fn is_copper(card: CardId) -> bool {
    card == CardId::Copper
}

fn never(_: CardId) -> bool {
    false
}

/// Lower is discarded first
fn discard_rank(card: CardId) -> i32 {
    match card.card_type() {
        CardType::Curse => 0,
        CardType::Victory => 1,
        _ if card == CardId::Copper => 2,
        _ => 3 + card.cost() as i32,
    }
}

/// Lower is trashed first
fn trash_rank(card: CardId) -> i32 {
    match card {
        CardId::Curse => 0,
        CardId::Estate => 1,
        CardId::Copper => 2,
        other => 10 + other.cost() as i32,
    }
}

/// Silver upgrades to Gold, Copper to Silver, Gold has nowhere to go
fn mine_rank(card: CardId) -> i32 {
    match card {
        CardId::Silver => 0,
        CardId::Copper => 1,
        _ => 2,
    }
}

/// Most expensive card goes on top
fn topdeck_rank(card: CardId) -> i32 {
    -(card.cost() as i32)
}
