//! Interactive controller for human players
//!
//! Reads commands from stdin (or any reader) and shows the game through a
//! `GameStateView`. Cards can be named instead of numbered: names match by
//! prefix, ignoring case, spacing and accents, against either the display
//! name or the card key (`"play smi"`, `"buy throne"`).

use crate::core::CardId;
use crate::game::controller::{minimal_selection, GameStateView, PlayerController};
use crate::game::interaction::{Interaction, InteractionKind, Selection};
use crate::game::TurnAction;
use deunicode::deunicode;
use std::io::{self, BufRead, Write};

/// A controller that prompts a human player for decisions
pub struct InteractiveController {
    player_index: usize,
    input: Box<dyn BufRead + Send>,
}

impl InteractiveController {
    /// Controller reading from stdin
    pub fn new(player_index: usize) -> Self {
        Self::with_input(player_index, Box::new(io::BufReader::new(io::stdin())))
    }

    /// Controller reading from an arbitrary source (tests, piped scripts)
    pub fn with_input(player_index: usize, input: Box<dyn BufRead + Send>) -> Self {
        InteractiveController { player_index, input }
    }

    /// Lowercase ASCII with spaces, underscores and punctuation removed
    pub fn normalize(s: &str) -> String {
        deunicode(s)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase()
    }

    /// Prefix match against a card's display name or key
    pub fn card_matches(card: CardId, pattern: &str) -> bool {
        let pattern = Self::normalize(pattern);
        !pattern.is_empty()
            && (Self::normalize(card.name()).starts_with(&pattern)
                || Self::normalize(card.as_str()).starts_with(&pattern))
    }

    /// Parse a turn command
    ///
    /// Examples: "3", "play village", "buy silver", "t", "skip", "end"
    pub fn parse_action(command: &str, view: &GameStateView, available: &[TurnAction]) -> Option<TurnAction> {
        let cmd = command.trim().to_lowercase();
        if let Ok(idx) = cmd.parse::<usize>() {
            return available.get(idx).cloned();
        }

        let wanted = match cmd.as_str() {
            "t" | "treasures" => Some(TurnAction::PlayAllTreasures),
            "s" | "skip" => Some(TurnAction::SkipToBuy),
            "e" | "end" => Some(TurnAction::EndTurn),
            _ => None,
        };
        if let Some(action) = wanted {
            return available.contains(&action).then_some(action);
        }

        let hand = view.hand(view.current_player());
        if let Some(pattern) = cmd.strip_prefix("play ") {
            return available
                .iter()
                .find(|a| match a {
                    TurnAction::PlayCard { hand_index } => hand
                        .get(*hand_index)
                        .map(|&c| Self::card_matches(c, pattern))
                        .unwrap_or(false),
                    _ => false,
                })
                .cloned();
        }
        if let Some(pattern) = cmd.strip_prefix("buy ") {
            return available
                .iter()
                .find(|a| matches!(a, TurnAction::BuyCard(c) if Self::card_matches(*c, pattern)))
                .cloned();
        }
        None
    }

    /// Parse an answer to an interaction
    ///
    /// Cards are comma separated numbers or names (empty for none); piles
    /// are a name or a number from the listed options; confirmations y/n.
    pub fn parse_selection(command: &str, view: &GameStateView, interaction: &Interaction) -> Option<Selection> {
        let cmd = command.trim().to_lowercase();
        match interaction.kind {
            InteractionKind::HandSelection | InteractionKind::CustomSelection => {
                if cmd.is_empty() || cmd == "none" {
                    return Some(Selection::Cards(Vec::new()));
                }
                let eligible = view.eligible_indices(interaction);
                let mut picked: Vec<usize> = Vec::new();
                for token in cmd.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                    let index = match token.parse::<usize>() {
                        Ok(i) => i,
                        Err(_) => *eligible.iter().find(|&&i| {
                            !picked.contains(&i)
                                && view
                                    .selectable_card(interaction, i)
                                    .map(|c| Self::card_matches(c, token))
                                    .unwrap_or(false)
                        })?,
                    };
                    picked.push(index);
                }
                Some(Selection::Cards(picked))
            }
            InteractionKind::SupplySelection => {
                let options = view.eligible_supply(interaction);
                if let Ok(idx) = cmd.parse::<usize>() {
                    return options.get(idx).map(|&c| Selection::Supply(c));
                }
                options
                    .into_iter()
                    .find(|&c| Self::card_matches(c, &cmd))
                    .map(Selection::Supply)
            }
            InteractionKind::Confirmation => match cmd.as_str() {
                "y" | "yes" => Some(Selection::Confirm(true)),
                "n" | "no" => Some(Selection::Confirm(false)),
                _ => None,
            },
        }
    }

    /// Next input line; `None` at end of input
    fn read_command(&mut self, prompt: &str) -> Option<String> {
        print!("{} ", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }

    fn display_turn(&self, view: &GameStateView, available: &[TurnAction]) {
        let seat = self.player_index;
        let Some(player) = view.player(seat) else {
            return;
        };
        println!("\n=== {} | Turn {} | {} phase ===", player.name, view.turn_count(), view.phase());
        println!(
            "Actions: {}  Buys: {}  Gold: {}",
            player.actions, player.buys, player.gold
        );
        println!("Hand:");
        for (i, card) in player.hand.iter().enumerate() {
            println!("  [{}] {} ({})", i, card, card.card_type());
        }
        println!("Options:");
        for (i, action) in available.iter().enumerate() {
            let label = match action {
                TurnAction::PlayCard { hand_index } => match player.hand.get(*hand_index) {
                    Some(card) => format!("play {}", card),
                    None => action.to_string(),
                },
                _ => action.to_string(),
            };
            println!("  {}) {}", i, label);
        }
    }

    fn display_help(&self) {
        println!("\n=== Help ===");
        println!("  <n>          - choose option n");
        println!("  play <card>  - play a card from hand by name");
        println!("  buy <card>   - buy a card by name");
        println!("  t            - play all treasures");
        println!("  skip         - move to the Buy phase");
        println!("  end          - end your turn");
        println!("  ?            - show this help");
    }

    fn display_interaction(&self, view: &GameStateView, interaction: &Interaction) {
        println!("\n--- {} ---", interaction.source);
        if let Some(prompt) = &interaction.prompt {
            println!("{}", prompt);
        }
        match interaction.kind {
            InteractionKind::HandSelection | InteractionKind::CustomSelection => {
                let bound = match interaction.max {
                    Some(max) => format!("{}-{}", interaction.min, max),
                    None => format!("at least {}", interaction.min),
                };
                println!("Select {} card(s), comma separated ({}):", bound, interaction.confirm_label);
                for i in view.eligible_indices(interaction) {
                    if let Some(card) = view.selectable_card(interaction, i) {
                        println!("  [{}] {}", i, card);
                    }
                }
            }
            InteractionKind::SupplySelection => {
                println!("Choose a pile:");
                for (i, card) in view.eligible_supply(interaction).iter().enumerate() {
                    println!("  {}) {} (cost {})", i, card, card.cost());
                }
            }
            InteractionKind::Confirmation => {
                let decline = if interaction.allows_decline() { "y/n" } else { "y" };
                println!("{}? ({})", interaction.confirm_label, decline);
            }
        }
    }
}

impl PlayerController for InteractiveController {
    fn player_index(&self) -> usize {
        self.player_index
    }

    fn name(&self) -> &str {
        "human"
    }

    fn choose_action(&mut self, view: &GameStateView, available: &[TurnAction]) -> TurnAction {
        self.display_turn(view, available);
        loop {
            let Some(line) = self.read_command("Your move (? for help):") else {
                return TurnAction::EndTurn;
            };
            if line.trim() == "?" {
                self.display_help();
                continue;
            }
            match Self::parse_action(&line, view, available) {
                Some(action) => return action,
                None => eprintln!("Unrecognized or unavailable command."),
            }
        }
    }

    fn choose_selection(&mut self, view: &GameStateView, interaction: &Interaction) -> Selection {
        self.display_interaction(view, interaction);
        loop {
            let Some(line) = self.read_command(">") else {
                return minimal_selection(view, interaction);
            };
            match Self::parse_selection(&line, view, interaction) {
                Some(selection) => return selection,
                None => eprintln!("Could not read that selection."),
            }
        }
    }

    fn on_game_end(&mut self, view: &GameStateView, won: bool) {
        let name = view.player(self.player_index).map(|p| p.name.as_str()).unwrap_or("Player");
        if won {
            println!("{} wins!", name);
        } else {
            println!("{} did not win this time.", name);
        }
    }
}
