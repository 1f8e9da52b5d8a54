//! Core game types: cards, catalog and players

pub mod card;
pub mod catalog;
pub mod player;

pub use card::{CardDef, CardId, CardType};
pub use catalog::{board_setup, BoardSetup, Difficulty, ALL_CARDS, BOARD_SETUPS};
pub use player::Player;
