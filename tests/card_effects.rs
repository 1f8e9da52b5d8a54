//! Kingdom card behaviour end to end: play, answer, check the zones

use wickinion::core::CardId;
use wickinion::game::{GameConfig, GameState, InteractionKind, Selection};
use wickinion::zones::CardPile;
use wickinion::GameError;

fn new_game(players: usize) -> GameState {
    GameState::new(&GameConfig::new(players).seed(31)).unwrap()
}

fn set_hand(game: &mut GameState, seat: usize, cards: &[CardId]) {
    game.players[seat].hand = CardPile::from_cards(cards.to_vec());
}

#[test]
fn test_council_room_feeds_opponents() {
    let mut game = new_game(3);
    set_hand(&mut game, 0, &[CardId::CouncilRoom, CardId::Copper]);

    game.play_card(0, 0).unwrap();
    assert_eq!(game.players[0].hand.len(), 5);
    assert_eq!(game.players[0].buys, 2);
    assert_eq!(game.players[1].hand.len(), 6);
    assert_eq!(game.players[2].hand.len(), 6);
}

#[test]
fn test_bureaucrat_topdecks_silver_and_victim_victory() {
    let mut game = new_game(2);
    set_hand(&mut game, 0, &[CardId::Bureaucrat]);
    set_hand(
        &mut game,
        1,
        &[CardId::Copper, CardId::Estate, CardId::Copper, CardId::Copper, CardId::Copper],
    );

    game.play_card(0, 0).unwrap();
    assert_eq!(game.players[0].deck.peek_top(), Some(CardId::Silver));
    assert_eq!(game.supply.count(CardId::Silver), 39);

    let head = game.current_interaction().unwrap();
    assert_eq!(head.target_player, 1);
    assert_eq!(head.kind, InteractionKind::HandSelection);

    assert!(matches!(
        game.resolve_interaction(1, Selection::Cards(vec![0])),
        Err(GameError::InvalidSelection(_))
    ));
    game.resolve_interaction(1, Selection::Cards(vec![1])).unwrap();
    assert_eq!(game.players[1].deck.peek_top(), Some(CardId::Estate));
    assert_eq!(game.players[1].hand.len(), 4);
}

#[test]
fn test_mine_upgrades_into_hand() {
    let mut game = new_game(2);
    set_hand(&mut game, 0, &[CardId::Mine, CardId::Silver, CardId::Estate]);

    game.play_card(0, 0).unwrap();
    // Estates are not Treasures
    assert!(game.resolve_interaction(0, Selection::Cards(vec![1])).is_err());
    game.resolve_interaction(0, Selection::Cards(vec![0])).unwrap();
    assert_eq!(game.trash.as_slice(), &[CardId::Silver]);

    assert_eq!(game.current_interaction().unwrap().kind, InteractionKind::SupplySelection);
    assert!(game.resolve_interaction(0, Selection::Supply(CardId::Province)).is_err());
    game.resolve_interaction(0, Selection::Supply(CardId::Gold)).unwrap();

    assert!(game.players[0].hand.contains(CardId::Gold));
    assert_eq!(game.supply.count(CardId::Gold), 29);
    assert!(game.current_interaction().is_none());
}

#[test]
fn test_poacher_discards_per_empty_pile() {
    let mut game = new_game(2);
    game.supply.insert(CardId::Cellar, 0);
    game.supply.insert(CardId::Moat, 0);
    set_hand(&mut game, 0, &[CardId::Poacher, CardId::Estate, CardId::Estate, CardId::Copper]);

    game.play_card(0, 0).unwrap();
    assert_eq!(game.players[0].gold, 1);
    let head = game.current_interaction().unwrap();
    assert_eq!((head.min, head.max), (2, Some(2)));

    assert!(game.resolve_interaction(0, Selection::Cards(vec![0])).is_err());
    game.resolve_interaction(0, Selection::Cards(vec![0, 1])).unwrap();
    assert_eq!(game.players[0].discard.len(), 2);
    assert_eq!(game.players[0].hand.len(), 2);
}

#[test]
fn test_moat_spares_only_its_holder_from_witch() {
    let mut game = new_game(3);
    set_hand(&mut game, 0, &[CardId::Witch]);
    set_hand(&mut game, 1, &[CardId::Moat, CardId::Copper]);

    game.play_card(0, 0).unwrap();
    assert_eq!(game.players[0].hand.len(), 2);
    assert!(!game.players[1].discard.contains(CardId::Curse));
    assert!(game.players[2].discard.contains(CardId::Curse));
    assert_eq!(game.supply.count(CardId::Curse), 19);
}

#[test]
fn test_vassal_decline_leaves_card_in_discard() {
    let mut game = new_game(2);
    set_hand(&mut game, 0, &[CardId::Vassal]);
    game.players[0].deck = CardPile::from_cards(vec![CardId::Copper, CardId::Smithy]);

    game.play_card(0, 0).unwrap();
    assert_eq!(game.players[0].gold, 2);
    assert_eq!(game.current_interaction().unwrap().kind, InteractionKind::Confirmation);

    game.resolve_interaction(0, Selection::Confirm(false)).unwrap();
    assert_eq!(game.players[0].discard.as_slice(), &[CardId::Smithy]);
    assert_eq!(game.players[0].hand.len(), 0);
}

#[test]
fn test_throne_room_remodel_with_one_card_left() {
    let mut game = new_game(2);
    set_hand(&mut game, 0, &[CardId::ThroneRoom, CardId::Remodel, CardId::Estate]);

    game.play_card(0, 0).unwrap();
    game.play_card(0, 0).unwrap();
    assert_eq!(game.interactions.len(), 2);

    game.resolve_interaction(0, Selection::Cards(vec![0])).unwrap();
    assert_eq!(game.trash.as_slice(), &[CardId::Estate]);
    // The second trash has an empty hand to pick from and is skipped
    let head = game.current_interaction().unwrap();
    assert_eq!(head.kind, InteractionKind::SupplySelection);
    assert!(game.log.iter().any(|l| l.contains("has nothing to choose for")));

    game.resolve_interaction(0, Selection::Supply(CardId::Silver)).unwrap();
    assert!(game.current_interaction().is_none());
    assert!(game.players[0].discard.contains(CardId::Silver));
    game.end_turn(0).unwrap();
}

#[test]
fn test_throne_room_mine_with_one_treasure() {
    let mut game = new_game(2);
    set_hand(&mut game, 0, &[CardId::ThroneRoom, CardId::Mine, CardId::Silver, CardId::Estate]);

    game.play_card(0, 0).unwrap();
    game.play_card(0, 0).unwrap();
    game.resolve_interaction(0, Selection::Cards(vec![0])).unwrap();

    assert_eq!(game.current_interaction().unwrap().kind, InteractionKind::SupplySelection);
    game.resolve_interaction(0, Selection::Supply(CardId::Gold)).unwrap();
    assert!(game.current_interaction().is_none());
    // The gained Gold is eligible now, but the second Mine was skipped before it arrived
    assert!(game.players[0].hand.contains(CardId::Gold));
    game.end_turn(0).unwrap();
}

#[test]
fn test_throne_room_poacher_runs_out_of_cards() {
    let mut game = new_game(2);
    game.supply.insert(CardId::Cellar, 0);
    set_hand(&mut game, 0, &[CardId::ThroneRoom, CardId::Poacher, CardId::Copper]);
    game.players[0].deck = CardPile::new();

    game.play_card(0, 0).unwrap();
    game.play_card(0, 0).unwrap();
    assert_eq!(game.players[0].hand.len(), 1);
    assert_eq!(game.interactions.len(), 2);

    game.resolve_interaction(0, Selection::Cards(vec![0])).unwrap();
    assert!(game.current_interaction().is_none());
    assert!(game.players[0].hand.is_empty());
    game.end_turn(0).unwrap();
}

#[test]
fn test_throne_room_militia_stops_at_three() {
    let mut game = new_game(2);
    set_hand(&mut game, 0, &[CardId::ThroneRoom, CardId::Militia]);
    set_hand(&mut game, 1, &[CardId::Copper; 5]);

    game.play_card(0, 0).unwrap();
    game.play_card(0, 0).unwrap();
    assert_eq!(game.players[0].gold, 4);
    assert_eq!(game.interactions.len(), 2);

    game.resolve_interaction(1, Selection::Cards(vec![0, 1])).unwrap();
    assert_eq!(game.players[1].hand.len(), 3);
    assert!(game.current_interaction().is_none());
    assert!(game.log.iter().any(|l| l.contains("is already down to size")));
}
