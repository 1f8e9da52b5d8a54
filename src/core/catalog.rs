//! Static card catalog, board setups and starting deck
//!
//! Definitions are indexed by `CardId` discriminant, so `CATALOG` must stay in
//! the same order as the `CardId` variants.

use crate::core::card::{CardDef, CardId, CardType};
use serde::{Deserialize, Serialize};

use CardType::{Action, Curse, Reaction, Treasure, Victory};

static CATALOG: [CardDef; 33] = [
    // --- Basic cards ---
    CardDef::new(CardId::Copper, "copper", "Copper", 0, Treasure, "+1 Coin").value(1),
    CardDef::new(CardId::Silver, "silver", "Silver", 3, Treasure, "+2 Coins").value(2),
    CardDef::new(CardId::Gold, "gold", "Gold", 6, Treasure, "+3 Coins").value(3),
    CardDef::new(CardId::Estate, "estate", "Tim's Studio Flat", 2, Victory, "1 VP").points(1),
    CardDef::new(CardId::Duchy, "duchy", "Julian's Summer House", 5, Victory, "3 VP").points(3),
    CardDef::new(CardId::Province, "province", "Rune's Empire", 8, Victory, "6 VP").points(6),
    CardDef::new(CardId::Curse, "curse", "Niklas Egg Fart", 0, Curse, "-1 VP").points(-1),
    // --- Kingdom cards ---
    CardDef::new(
        CardId::Artisan,
        "artisan",
        "Mattis 3D Printer",
        6,
        Action,
        "Gain a card costing up to 5 to your hand. Put a card from hand onto deck.",
    ),
    CardDef::new(
        CardId::Bandit,
        "bandit",
        "Björn the Mugger",
        5,
        Action,
        "+1 Coin. Attack: Opponents reveal the top 2 cards of their deck and trash a Silver or Gold.",
    )
    .gold(1),
    CardDef::new(
        CardId::Bureaucrat,
        "bureaucrat",
        "Fredrik's Middle Management",
        4,
        Action,
        "Gain Silver on deck. Attack: Opponents put a Victory card from hand on deck.",
    ),
    CardDef::new(
        CardId::Cellar,
        "cellar",
        "Charlie's Man Cave",
        2,
        Action,
        "+1 Action. Discard any number of cards, then draw that many.",
    )
    .actions(1),
    CardDef::new(
        CardId::Chapel,
        "chapel",
        "Ivan's Bonfire",
        2,
        Action,
        "Trash up to 4 cards from your hand.",
    ),
    CardDef::new(
        CardId::CouncilRoom,
        "council_room",
        "Andreas Group Chat",
        5,
        Action,
        "+4 Cards, +1 Buy. Each other player draws 1 card.",
    )
    .cards(4)
    .buys(1),
    CardDef::new(
        CardId::Festival,
        "festival",
        "Tim's Rave",
        5,
        Action,
        "+2 Actions, +1 Buy, +2 Coins.",
    )
    .actions(2)
    .buys(1)
    .gold(2),
    CardDef::new(
        CardId::Gardens,
        "gardens",
        "Niklas Jungle",
        4,
        Victory,
        "Worth 1 VP per 10 cards you have (round down).",
    ),
    CardDef::new(
        CardId::Harbinger,
        "harbinger",
        "Rune's Déjà Vu",
        3,
        Action,
        "+1 Card, +1 Action. Put a card from discard onto deck.",
    )
    .cards(1)
    .actions(1),
    CardDef::new(
        CardId::Laboratory,
        "laboratory",
        "Julian's Energy Drink",
        5,
        Action,
        "+2 Cards, +1 Action.",
    )
    .cards(2)
    .actions(1),
    CardDef::new(
        CardId::Library,
        "library",
        "Fredrik's Collection",
        5,
        Action,
        "Draw until you have 7 cards in hand.",
    ),
    CardDef::new(
        CardId::Market,
        "market",
        "Björn's Garage Sale",
        5,
        Action,
        "+1 Card, +1 Action, +1 Buy, +1 Coin.",
    )
    .cards(1)
    .actions(1)
    .buys(1)
    .gold(1),
    CardDef::new(
        CardId::Merchant,
        "merchant",
        "Charlie's Used Cars",
        3,
        Action,
        "+1 Card, +1 Action. The first time you play Silver this turn, +1 Coin.",
    )
    .cards(1)
    .actions(1),
    CardDef::new(
        CardId::Militia,
        "militia",
        "Ivan's Goon Squad",
        4,
        Action,
        "+2 Coins. Attack: Each other player discards down to 3 cards.",
    )
    .gold(2),
    CardDef::new(
        CardId::Mine,
        "mine",
        "Mattis Crypto Rig",
        5,
        Action,
        "Trash a Treasure from hand. Gain a Treasure to hand costing up to 3 more.",
    ),
    CardDef::new(
        CardId::Moat,
        "moat",
        "Niklas Firewall",
        2,
        Reaction,
        "+2 Cards. Reaction: Reveal to block an Attack.",
    )
    .cards(2),
    CardDef::new(
        CardId::Moneylender,
        "moneylender",
        "Rune's Pawn Shop",
        4,
        Action,
        "You may trash a Copper from hand for +3 Coins.",
    ),
    CardDef::new(
        CardId::Poacher,
        "poacher",
        "Andreas Leftovers",
        4,
        Action,
        "+1 Card, +1 Action, +1 Coin. Discard 1 card per empty Supply pile.",
    )
    .cards(1)
    .actions(1)
    .gold(1),
    CardDef::new(
        CardId::Remodel,
        "remodel",
        "Tim's Makeover",
        4,
        Action,
        "Trash a card from hand. Gain a card costing up to 2 more.",
    ),
    CardDef::new(
        CardId::Sentry,
        "sentry",
        "Björn's Surveillance",
        5,
        Action,
        "+1 Card, +1 Action. Look at top 2 of deck: Trash and/or discard any.",
    )
    .cards(1)
    .actions(1),
    CardDef::new(CardId::Smithy, "smithy", "Mattis Forge", 4, Action, "+3 Cards.").cards(3),
    CardDef::new(
        CardId::ThroneRoom,
        "throne_room",
        "Julian's Gaming Chair",
        4,
        Action,
        "You may play an Action card from your hand twice.",
    ),
    CardDef::new(
        CardId::Vassal,
        "vassal",
        "Fredrik's Intern",
        3,
        Action,
        "+2 Coins. Discard top of deck. If Action, you may play it.",
    )
    .gold(2),
    CardDef::new(
        CardId::Village,
        "village",
        "Ivan's Block Party",
        3,
        Action,
        "+1 Card, +2 Actions.",
    )
    .cards(1)
    .actions(2),
    CardDef::new(
        CardId::Witch,
        "witch",
        "Charlie's Voodoo Doll",
        5,
        Action,
        "+2 Cards. Attack: Each other player gains a Curse.",
    )
    .cards(2),
    CardDef::new(
        CardId::Workshop,
        "workshop",
        "Niklas IKEA Hack",
        3,
        Action,
        "Gain a card costing up to 4.",
    ),
];

/// Every card id in catalog order
pub static ALL_CARDS: [CardId; 33] = [
    CardId::Copper,
    CardId::Silver,
    CardId::Gold,
    CardId::Estate,
    CardId::Duchy,
    CardId::Province,
    CardId::Curse,
    CardId::Artisan,
    CardId::Bandit,
    CardId::Bureaucrat,
    CardId::Cellar,
    CardId::Chapel,
    CardId::CouncilRoom,
    CardId::Festival,
    CardId::Gardens,
    CardId::Harbinger,
    CardId::Laboratory,
    CardId::Library,
    CardId::Market,
    CardId::Merchant,
    CardId::Militia,
    CardId::Mine,
    CardId::Moat,
    CardId::Moneylender,
    CardId::Poacher,
    CardId::Remodel,
    CardId::Sentry,
    CardId::Smithy,
    CardId::ThroneRoom,
    CardId::Vassal,
    CardId::Village,
    CardId::Witch,
    CardId::Workshop,
];

/// Cards always present in the supply
pub const BASIC_CARDS: [CardId; 7] = [
    CardId::Copper,
    CardId::Silver,
    CardId::Gold,
    CardId::Estate,
    CardId::Duchy,
    CardId::Province,
    CardId::Curse,
];

/// Victory piles whose exhaustion ends the game on their own
pub const ENDGAME_PILES: [CardId; 3] = [CardId::Province, CardId::Duchy, CardId::Estate];

/// The Reaction card that blocks attacks
pub const BLOCKER: CardId = CardId::Moat;

/// Copies of each kingdom card placed in the supply
pub const KINGDOM_PILE_SIZE: u32 = 10;

/// Number of kingdom piles on every board
pub const KINGDOM_SIZE: usize = 10;

pub(crate) fn definition(id: CardId) -> &'static CardDef {
    &CATALOG[id as usize]
}

pub fn is_kingdom(id: CardId) -> bool {
    !BASIC_CARDS.contains(&id)
}

/// Starting deck: 7 Copper and 3 Estates
pub fn starting_deck() -> Vec<CardId> {
    let mut deck = vec![CardId::Copper; 7];
    deck.extend([CardId::Estate; 3]);
    deck
}

/// Difficulty label of a board setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A named preset of ten kingdom cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSetup {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: Difficulty,
    pub cards: [CardId; KINGDOM_SIZE],
}

pub static BOARD_SETUPS: [BoardSetup; 5] = [
    BoardSetup {
        id: "first_game",
        name: "First Game",
        description: "A balanced introduction to the realm. Focuses on straightforward expansion and resource management.",
        difficulty: Difficulty::Easy,
        cards: [
            CardId::Cellar,
            CardId::Market,
            CardId::Merchant,
            CardId::Militia,
            CardId::Mine,
            CardId::Moat,
            CardId::Remodel,
            CardId::Smithy,
            CardId::Village,
            CardId::Workshop,
        ],
    },
    BoardSetup {
        id: "size_distortion",
        name: "Size Distortion",
        description: "A contest of bloat and trim. While some seek to expand their domains rapidly, others find power in efficiency.",
        difficulty: Difficulty::Hard,
        cards: [
            CardId::Artisan,
            CardId::Bandit,
            CardId::Bureaucrat,
            CardId::Chapel,
            CardId::Festival,
            CardId::Gardens,
            CardId::Sentry,
            CardId::ThroneRoom,
            CardId::Village,
            CardId::Witch,
        ],
    },
    BoardSetup {
        id: "the_engine",
        name: "The Engine",
        description: "A setup that rewards momentum. Opportunities abound for those who can chain their decrees into a single, massive edict.",
        difficulty: Difficulty::Medium,
        cards: [
            CardId::Festival,
            CardId::Laboratory,
            CardId::Library,
            CardId::Market,
            CardId::Poacher,
            CardId::Smithy,
            CardId::ThroneRoom,
            CardId::Village,
            CardId::CouncilRoom,
            CardId::Harbinger,
        ],
    },
    BoardSetup {
        id: "gold_treasures",
        name: "Gold & Treasures",
        description: "A heavy economy scenario. The markets are overflowing with wealth, but thieves lurk in the shadows.",
        difficulty: Difficulty::Easy,
        cards: [
            CardId::Bandit,
            CardId::Bureaucrat,
            CardId::Moneylender,
            CardId::Mine,
            CardId::Vassal,
            CardId::Merchant,
            CardId::Harbinger,
            CardId::Artisan,
            CardId::Market,
            CardId::Poacher,
        ],
    },
    BoardSetup {
        id: "chaos_reactions",
        name: "Chaos & Reactions",
        description: "A volatile battlefield where attacks are frequent and defense is paramount. Expect the unexpected.",
        difficulty: Difficulty::Hard,
        cards: [
            CardId::Cellar,
            CardId::CouncilRoom,
            CardId::Festival,
            CardId::Militia,
            CardId::Moat,
            CardId::Sentry,
            CardId::Vassal,
            CardId::Village,
            CardId::Witch,
            CardId::Workshop,
        ],
    },
];

/// Look up a board setup by id
pub fn board_setup(id: &str) -> Option<&'static BoardSetup> {
    BOARD_SETUPS.iter().find(|b| b.id == id)
}
