//! Pending player decisions and the FIFO queue that holds them
//!
//! An `Interaction` is plain data: what kind of choice it is, which cards
//! are eligible, and a `Continuation` naming the step that consumes the
//! answer. Because nothing in here is a closure, interactions can be cloned,
//! compared and shipped to clients inside a state snapshot.

use crate::core::{CardId, CardType};
use crate::zones::CardPile;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// What the player is choosing from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionKind {
    /// Indices into the target player's hand
    HandSelection,
    /// One pile of the supply
    SupplySelection,
    /// Indices into the interaction's own card list
    CustomSelection,
    /// Yes or no
    Confirmation,
}

/// Which cards an interaction accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "filter", content = "value", rename_all = "snake_case")]
pub enum CardFilter {
    #[default]
    Any,
    OfType(CardType),
    Exactly(CardId),
    CostUpTo(u32),
    TreasureCostUpTo(u32),
}

impl CardFilter {
    pub fn matches(&self, card: CardId) -> bool {
        match *self {
            CardFilter::Any => true,
            CardFilter::OfType(t) => card.card_type() == t,
            CardFilter::Exactly(id) => card == id,
            CardFilter::CostUpTo(max) => card.cost() <= max,
            CardFilter::TreasureCostUpTo(max) => card.is_treasure() && card.cost() <= max,
        }
    }

    /// Short text shown with the prompt
    pub fn describe(&self) -> String {
        match *self {
            CardFilter::Any => "Any card".to_string(),
            CardFilter::OfType(t) => format!("Select a {} card", t),
            CardFilter::Exactly(id) => format!("Select {}", id),
            CardFilter::CostUpTo(max) => format!("Cost up to {}", max),
            CardFilter::TreasureCostUpTo(max) => format!("Treasure cost max {}", max),
        }
    }
}

/// The step that runs once an interaction is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Continuation {
    CellarDiscard,
    ChapelTrash,
    SentryTrash,
    SentryDiscard,
    HarbingerTopdeck,
    VassalPlay { card: CardId },
    WorkshopGain,
    ArtisanGain,
    ArtisanTopdeck,
    MineTrash,
    MineGain,
    RemodelTrash,
    RemodelGain,
    MoneylenderTrash,
    PoacherDiscard,
    MilitiaDiscard,
    BanditReveal,
    BureaucratTopdeck,
}

impl Continuation {
    /// Steps whose custom cards were taken out of a deck and exist nowhere else
    pub fn holds_cards(&self) -> bool {
        matches!(self, Continuation::SentryTrash | Continuation::SentryDiscard)
    }
}

/// A pending decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Assigned by the queue on enqueue
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Display label, e.g. "Militia Attack (Player 2)"
    pub source: String,
    /// Seat that must answer
    pub target_player: usize,
    pub min: usize,
    /// `None` means unbounded
    pub max: Option<usize>,
    pub filter: CardFilter,
    /// Cards offered by a `CustomSelection` (see `Continuation::holds_cards`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_cards: Vec<CardId>,
    pub prompt: Option<String>,
    pub confirm_label: String,
    pub continuation: Continuation,
}

impl Interaction {
    fn base(kind: InteractionKind, source: impl Into<String>, target_player: usize, continuation: Continuation) -> Self {
        Interaction {
            id: 0,
            kind,
            source: source.into(),
            target_player,
            min: 0,
            max: None,
            filter: CardFilter::Any,
            custom_cards: Vec::new(),
            prompt: None,
            confirm_label: "Confirm".to_string(),
            continuation,
        }
    }

    pub fn hand(source: impl Into<String>, target_player: usize, continuation: Continuation) -> Self {
        Self::base(InteractionKind::HandSelection, source, target_player, continuation)
    }

    pub fn supply(source: impl Into<String>, target_player: usize, continuation: Continuation) -> Self {
        let mut interaction = Self::base(InteractionKind::SupplySelection, source, target_player, continuation);
        interaction.min = 1;
        interaction.max = Some(1);
        interaction
    }

    pub fn custom(
        source: impl Into<String>,
        target_player: usize,
        cards: Vec<CardId>,
        continuation: Continuation,
    ) -> Self {
        let mut interaction = Self::base(InteractionKind::CustomSelection, source, target_player, continuation);
        interaction.custom_cards = cards;
        interaction
    }

    /// A yes/no question; `required` confirmations cannot be declined
    pub fn confirmation(
        source: impl Into<String>,
        target_player: usize,
        prompt: impl Into<String>,
        required: bool,
        continuation: Continuation,
    ) -> Self {
        let mut interaction = Self::base(InteractionKind::Confirmation, source, target_player, continuation);
        interaction.prompt = Some(prompt.into());
        interaction.min = usize::from(required);
        interaction.max = Some(0);
        interaction
    }

    pub fn bounds(mut self, min: usize, max: Option<usize>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn exactly(self, count: usize) -> Self {
        self.bounds(count, Some(count))
    }

    pub fn filter(mut self, filter: CardFilter) -> Self {
        self.filter = filter;
        if self.prompt.is_none() && filter != CardFilter::Any {
            self.prompt = Some(filter.describe());
        }
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn allows_decline(&self) -> bool {
        self.kind == InteractionKind::Confirmation && self.min == 0
    }

    /// Card a selection index refers to, given the target player's hand
    pub fn card_at(&self, hand: &CardPile, index: usize) -> Option<CardId> {
        match self.kind {
            InteractionKind::HandSelection => hand.get(index),
            InteractionKind::CustomSelection => self.custom_cards.get(index).copied(),
            _ => None,
        }
    }

    /// Indices the filter accepts, given the target player's hand
    pub fn eligible_indices(&self, hand: &CardPile) -> Vec<usize> {
        let cards: &[CardId] = match self.kind {
            InteractionKind::HandSelection => hand.as_slice(),
            InteractionKind::CustomSelection => &self.custom_cards,
            _ => &[],
        };
        cards
            .iter()
            .enumerate()
            .filter(|(_, c)| self.filter.matches(**c))
            .map(|(i, _)| i)
            .collect()
    }
}

/// A player's answer to the head interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Hand or custom-list indices
    Cards(Vec<usize>),
    Supply(CardId),
    Confirm(bool),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Cards(indices) => write!(f, "cards {:?}", indices),
            Selection::Supply(card) => write!(f, "{}", card),
            Selection::Confirm(yes) => write!(f, "{}", if *yes { "yes" } else { "no" }),
        }
    }
}

/// Transient feedback for a refused toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The card at this index does not pass the filter
    FilterMismatch { index: usize, card: CardId },
    /// Already holding `max` selections
    TooMany { max: usize },
    OutOfRange { index: usize },
    /// The head interaction does not take card indices
    NotSelectable,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FilterMismatch { card, .. } => write!(f, "{} cannot be selected", card),
            Notice::TooMany { max } => write!(f, "Select at most {}", max),
            Notice::OutOfRange { index } => write!(f, "No card at position {}", index),
            Notice::NotSelectable => write!(f, "This choice does not take cards"),
        }
    }
}

/// Result of toggling one index in the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Single-choice interaction: the new index replaced the old one
    Swapped,
    Rejected(Notice),
}

/// FIFO of pending interactions plus the transient selection for the head
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionQueue {
    pending: VecDeque<Interaction>,
    #[serde(skip)]
    selected: Vec<usize>,
    next_id: u64,
}

impl InteractionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail, assigning an id
    pub fn enqueue(&mut self, mut interaction: Interaction) -> u64 {
        self.next_id += 1;
        interaction.id = self.next_id;
        self.pending.push_back(interaction);
        self.next_id
    }

    pub fn current(&self) -> Option<&Interaction> {
        self.pending.front()
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut Interaction> {
        self.pending.front_mut()
    }

    /// Remove the head, clearing the selection
    pub fn pop(&mut self) -> Option<Interaction> {
        self.selected.clear();
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.pending.iter()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.selected.clear();
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Toggle `index` for the head interaction
    ///
    /// `card` is the card at that index (None when out of range). Filter
    /// mismatches and over-max picks are refused; with `max == 1` a new pick
    /// replaces the old one instead.
    pub fn toggle(&mut self, index: usize, card: Option<CardId>) -> ToggleOutcome {
        let Some(head) = self.pending.front() else {
            return ToggleOutcome::Rejected(Notice::NotSelectable);
        };
        if !matches!(head.kind, InteractionKind::HandSelection | InteractionKind::CustomSelection) {
            return ToggleOutcome::Rejected(Notice::NotSelectable);
        }

        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            return ToggleOutcome::Deselected;
        }

        let Some(card) = card else {
            return ToggleOutcome::Rejected(Notice::OutOfRange { index });
        };
        if !head.filter.matches(card) {
            return ToggleOutcome::Rejected(Notice::FilterMismatch { index, card });
        }
        if let Some(max) = head.max {
            if self.selected.len() >= max {
                if max == 1 {
                    self.selected.clear();
                    self.selected.push(index);
                    return ToggleOutcome::Swapped;
                }
                return ToggleOutcome::Rejected(Notice::TooMany { max });
            }
        }
        self.selected.push(index);
        ToggleOutcome::Selected
    }

    /// Every card currently held inside queued interactions
    pub fn held_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.pending
            .iter()
            .filter(|i| i.continuation.holds_cards())
            .flat_map(|i| i.custom_cards.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_of(cards: &[CardId]) -> CardPile {
        CardPile::from_cards(cards.to_vec())
    }

    #[test]
    fn test_fifo_order_and_ids() {
        let mut queue = InteractionQueue::new();
        let a = queue.enqueue(Interaction::hand("Cellar", 0, Continuation::CellarDiscard));
        let b = queue.enqueue(Interaction::hand("Chapel", 0, Continuation::ChapelTrash));
        assert!(b > a);
        assert_eq!(queue.current().map(|i| i.source.as_str()), Some("Cellar"));
        queue.pop();
        assert_eq!(queue.current().map(|i| i.source.as_str()), Some("Chapel"));
        queue.pop();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_toggle_filter_rejects() {
        let mut queue = InteractionQueue::new();
        queue.enqueue(
            Interaction::hand("Mine", 0, Continuation::MineTrash)
                .exactly(1)
                .filter(CardFilter::OfType(CardType::Treasure)),
        );
        let outcome = queue.toggle(0, Some(CardId::Estate));
        assert_eq!(
            outcome,
            ToggleOutcome::Rejected(Notice::FilterMismatch {
                index: 0,
                card: CardId::Estate
            })
        );
        assert!(queue.selected().is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_toggle_single_choice_swaps() {
        let mut queue = InteractionQueue::new();
        queue.enqueue(Interaction::hand("Remodel", 0, Continuation::RemodelTrash).exactly(1));
        assert_eq!(queue.toggle(0, Some(CardId::Copper)), ToggleOutcome::Selected);
        assert_eq!(queue.toggle(2, Some(CardId::Estate)), ToggleOutcome::Swapped);
        assert_eq!(queue.selected(), &[2]);
        assert_eq!(queue.toggle(2, Some(CardId::Estate)), ToggleOutcome::Deselected);
        assert!(queue.selected().is_empty());
    }

    #[test]
    fn test_toggle_over_max_rejected() {
        let mut queue = InteractionQueue::new();
        queue.enqueue(Interaction::hand("Militia", 1, Continuation::MilitiaDiscard).exactly(2));
        queue.toggle(0, Some(CardId::Copper));
        queue.toggle(1, Some(CardId::Copper));
        assert_eq!(
            queue.toggle(2, Some(CardId::Copper)),
            ToggleOutcome::Rejected(Notice::TooMany { max: 2 })
        );
        assert_eq!(queue.selected(), &[0, 1]);
    }

    #[test]
    fn test_pop_clears_selection() {
        let mut queue = InteractionQueue::new();
        queue.enqueue(Interaction::hand("Cellar", 0, Continuation::CellarDiscard));
        queue.toggle(1, Some(CardId::Estate));
        queue.pop();
        assert!(queue.selected().is_empty());
    }

    #[test]
    fn test_eligible_indices_for_custom_list() {
        let interaction = Interaction::custom(
            "Sentry (Trash)",
            0,
            vec![CardId::Copper, CardId::Gold],
            Continuation::SentryTrash,
        )
        .filter(CardFilter::Exactly(CardId::Gold));
        let hand = hand_of(&[CardId::Gold, CardId::Gold, CardId::Gold]);
        assert_eq!(interaction.eligible_indices(&hand), vec![1]);
        assert_eq!(interaction.card_at(&hand, 0), Some(CardId::Copper));
    }

    #[test]
    fn test_confirmation_decline() {
        let optional = Interaction::confirmation("Vassal", 0, "Play it?", false, Continuation::VassalPlay {
            card: CardId::Village,
        });
        assert!(optional.allows_decline());
        let forced = Interaction::confirmation("Bandit", 1, "Reveal?", true, Continuation::BanditReveal);
        assert!(!forced.allows_decline());
    }

    #[test]
    fn test_interaction_is_wire_friendly() {
        let interaction = Interaction::supply("Workshop", 0, Continuation::WorkshopGain).filter(CardFilter::CostUpTo(4));
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "SUPPLY_SELECTION");
        assert_eq!(json["targetPlayer"], 0);
        assert_eq!(json["filter"]["filter"], "cost_up_to");
        assert_eq!(json["continuation"]["step"], "workshop_gain");
        let back: Interaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, interaction);
    }
}
