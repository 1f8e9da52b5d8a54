//! Main game state structure

use crate::core::catalog::{self, KINGDOM_SIZE};
use crate::core::player::HAND_SIZE;
use crate::core::{CardId, Player};
use crate::game::effects::MILITIA_HAND_SIZE;
use crate::game::interaction::{Continuation, Interaction, InteractionKind, InteractionQueue};
use crate::game::supply::{GameEndReason, Supply};
use crate::game::{GameLogger, Phase};
use crate::zones::CardPile;
use crate::{GameError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

/// Which kingdom to play with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardChoice {
    /// One of the named setups, by id
    Preset(String),
    /// Exactly ten distinct kingdom cards
    Custom(Vec<CardId>),
}

impl Default for BoardChoice {
    fn default() -> Self {
        BoardChoice::Preset("first_game".to_string())
    }
}

/// Settings for a new game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub player_names: Vec<String>,
    pub board: BoardChoice,
    /// Fixed seed for a reproducible game; random when absent
    pub seed: Option<u64>,
}

impl GameConfig {
    /// `players` seats named "Player 1", "Player 2", ...
    pub fn new(players: usize) -> Self {
        GameConfig {
            player_names: (0..players).map(|i| format!("Player {}", i + 1)).collect(),
            board: BoardChoice::default(),
            seed: None,
        }
    }

    pub fn with_names(names: Vec<String>) -> Self {
        GameConfig {
            player_names: names,
            ..Self::new(0)
        }
    }

    pub fn board(mut self, board: BoardChoice) -> Self {
        self.board = board;
        self
    }

    pub fn preset(self, id: &str) -> Self {
        self.board(BoardChoice::Preset(id.to_string()))
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check player count and board; returns the board's display name and kingdom
    pub fn validate(&self) -> Result<(String, Vec<CardId>)> {
        let n = self.player_names.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
            return Err(GameError::InvalidConfig(format!(
                "{} players requested, need {}-{}",
                n, MIN_PLAYERS, MAX_PLAYERS
            )));
        }
        match &self.board {
            BoardChoice::Preset(id) => catalog::board_setup(id)
                .map(|b| (b.name.to_string(), b.cards.to_vec()))
                .ok_or_else(|| GameError::InvalidConfig(format!("unknown board '{}'", id))),
            BoardChoice::Custom(cards) => {
                let mut distinct = cards.clone();
                distinct.sort();
                distinct.dedup();
                if distinct.len() != KINGDOM_SIZE || cards.len() != KINGDOM_SIZE {
                    return Err(GameError::InvalidConfig(format!(
                        "a custom board needs exactly {} distinct kingdom cards",
                        KINGDOM_SIZE
                    )));
                }
                if let Some(basic) = cards.iter().find(|c| !catalog::is_kingdom(**c)) {
                    return Err(GameError::InvalidConfig(format!("{} is not a kingdom card", basic.as_str())));
                }
                Ok(("Custom Realm".to_string(), cards.clone()))
            }
        }
    }
}

/// Turn-scoped bookkeeping reset at cleanup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    /// Merchants played this turn
    pub merchants_played: u32,
    /// A Silver has already been played this turn
    pub silver_played: bool,
}

/// Complete game state
///
/// The host owns the only writable copy. Everything except the logger
/// serializes, so two states can be compared byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub supply: Supply,
    pub trash: CardPile,
    pub current_player: usize,
    /// Starts at 1, increments when play wraps back to seat 0
    pub turn_count: u32,
    pub phase: Phase,
    /// Append-only transcript
    pub log: Vec<String>,
    pub game_over: bool,
    pub end_reason: Option<GameEndReason>,
    pub board_name: String,
    pub interactions: InteractionQueue,
    /// Repetitions for the next Action card (2 after Throne Room)
    pub action_multiplier: u32,
    pub turn: TurnFlags,
    pub rng: ChaCha12Rng,

    #[serde(skip)]
    pub logger: GameLogger,
}

impl GameState {
    /// Set up a new game: shuffled starting decks, five-card hands, supply
    pub fn new(config: &GameConfig) -> Result<Self> {
        Self::with_logger(config, GameLogger::new())
    }

    pub fn with_logger(config: &GameConfig, logger: GameLogger) -> Result<Self> {
        let (board_name, kingdom) = config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };
        let n = config.player_names.len();

        let mut state = GameState {
            players: config
                .player_names
                .iter()
                .enumerate()
                .map(|(i, name)| Player::new(i, name.clone()))
                .collect(),
            supply: Supply::for_game(n, &kingdom),
            trash: CardPile::new(),
            current_player: 0,
            turn_count: 1,
            phase: Phase::Action,
            log: Vec::new(),
            game_over: false,
            end_reason: None,
            board_name,
            interactions: InteractionQueue::new(),
            action_multiplier: 1,
            turn: TurnFlags::default(),
            rng,
            logger,
        };

        for p in 0..n {
            let player = &mut state.players[p];
            player.deck.shuffle(&mut state.rng);
            player.draw(HAND_SIZE, &mut state.rng);
        }

        state.record(format!("Reign Started: {}", state.board_name));
        state.record(format!("{} Lords have entered the fray.", n));
        Ok(state)
    }

    /// Append a transcript line (and echo it through the logger)
    pub fn record(&mut self, line: impl Into<String>) {
        let line = line.into();
        self.logger.transcript(&line);
        self.log.push(line);
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub fn player(&self, idx: usize) -> Option<&Player> {
        self.players.get(idx)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn current_interaction(&self) -> Option<&Interaction> {
        self.interactions.current()
    }

    /// Seat that must act next: the head interaction's target, else the turn owner
    pub fn active_player(&self) -> usize {
        self.interactions
            .current()
            .map(|i| i.target_player)
            .unwrap_or(self.current_player)
    }

    /// Other seats in play order starting after `attacker`
    pub fn opponents_of(&self, attacker: usize) -> Vec<usize> {
        let n = self.players.len();
        (1..n).map(|k| (attacker + k) % n).collect()
    }

    /// Draw for a player using the game RNG; returns cards drawn
    pub fn draw(&mut self, player: usize, count: usize) -> usize {
        self.players[player].draw(count, &mut self.rng)
    }

    /// Take one card off a player's deck (reshuffling if needed) without
    /// putting it in hand
    pub fn reveal_top(&mut self, player: usize) -> Option<CardId> {
        self.players[player].draw_one(&mut self.rng)
    }

    /// Move one copy from supply to `dest`; false if the pile is empty
    pub fn gain(&mut self, player: usize, card: CardId, dest: GainDestination) -> bool {
        if !self.supply.take(card) {
            return false;
        }
        let p = &mut self.players[player];
        match dest {
            GainDestination::Discard => p.discard.add(card),
            GainDestination::Hand => p.hand.add(card),
            GainDestination::DeckTop => p.deck.add_to_top(card),
        }
        true
    }

    /// Queue an interaction, adjusting for what the player can actually choose
    ///
    /// Minimums are clamped to the number of eligible options. When nothing
    /// is eligible the interaction is dropped and the transcript says so.
    pub fn queue_interaction(&mut self, mut interaction: Interaction) {
        let eligible = self.eligible_count(&interaction);
        if eligible == 0 {
            self.drop_interaction(interaction, "has nothing to choose for");
            return;
        }
        interaction.min = interaction.min.min(eligible);
        self.interactions.enqueue(interaction);
    }

    /// Bring the head interaction up to date with the zones it selects from
    ///
    /// Answers to earlier interactions can shrink a hand after later ones
    /// were queued. Heads that can no longer be answered are dropped until
    /// one can be.
    pub(crate) fn settle_head(&mut self) {
        loop {
            let Some(head) = self.interactions.current() else {
                return;
            };
            let eligible = self.eligible_count(head);
            let (min, max) = match head.continuation {
                // Discard down to the limit from whatever the hand holds now
                Continuation::MilitiaDiscard => {
                    let excess = self.players[head.target_player]
                        .hand
                        .len()
                        .saturating_sub(MILITIA_HAND_SIZE);
                    (excess, Some(excess))
                }
                _ => (head.min, head.max),
            };

            let reason = if max == Some(0) && head.continuation == Continuation::MilitiaDiscard {
                "is already down to size for"
            } else if eligible == 0 {
                "has nothing to choose for"
            } else {
                if let Some(head) = self.interactions.current_mut() {
                    head.min = min.min(eligible);
                    head.max = max;
                }
                return;
            };
            if let Some(dropped) = self.interactions.pop() {
                self.drop_interaction(dropped, reason);
            }
        }
    }

    /// Record that `interaction` will not be asked, returning any cards it held
    fn drop_interaction(&mut self, mut interaction: Interaction, reason: &str) {
        let name = self.players[interaction.target_player].name.clone();
        self.record(format!("{} {} {}.", name, reason, interaction.source));
        if interaction.continuation.holds_cards() {
            let cards = std::mem::take(&mut interaction.custom_cards);
            self.players[interaction.target_player].deck.extend(cards);
        }
    }

    /// Options the interaction's filter accepts right now
    pub fn eligible_count(&self, interaction: &Interaction) -> usize {
        match interaction.kind {
            InteractionKind::HandSelection | InteractionKind::CustomSelection => {
                let hand = &self.players[interaction.target_player].hand;
                interaction.eligible_indices(hand).len()
            }
            InteractionKind::SupplySelection => self.supply.eligible(&interaction.filter).len(),
            InteractionKind::Confirmation => 1,
        }
    }

    /// Per-card totals across every zone, the supply, the trash and cards
    /// held inside pending interactions
    pub fn card_census(&self) -> FxHashMap<CardId, usize> {
        let mut census: FxHashMap<CardId, usize> = FxHashMap::default();
        for player in &self.players {
            for card in player.all_cards() {
                *census.entry(card).or_insert(0) += 1;
            }
        }
        for (card, count) in self.supply.iter() {
            *census.entry(card).or_insert(0) += count as usize;
        }
        for &card in self.trash.iter() {
            *census.entry(card).or_insert(0) += 1;
        }
        for card in self.interactions.held_cards() {
            *census.entry(card).or_insert(0) += 1;
        }
        census
    }

    /// Stable serialized form used to compare states
    pub fn fingerprint(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Where a gained card lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainDestination {
    Discard,
    Hand,
    DeckTop,
}
