//! Input continuation tests.
//!
//! Every pending choice kind is raised by playing a card, answered through
//! `resolve_input`, and checked for the effect it resumes into.

use ideology_ccg::{
    end_turn, initialize_game, perform_mulligan, play_card, resolve_input, resolve_mulligan_phase,
    CardDatabase, Choice, ChoiceKind, DeckPreset, EffectArgs, GamePhase, GameState, InstanceId,
    Pile, PlayerId, RulesConfig, ZonePosition,
};

const CARDS: &str = r#"{
    "農場": {"name": "農場", "card_type": "WEALTH", "durability": 2},
    "銀行": {"name": "銀行", "card_type": "WEALTH", "durability": 4, "required_scale": 3},
    "マネー": {"name": "マネー", "card_type": "WEALTH", "durability": 1, "is_token": true, "scale_token": true},
    "求人": {
        "name": "求人", "card_type": "EVENT",
        "triggers": {"PLAY_EVENT_THIS": [
            {"effect_type": "PROCESS_ADD_CHOICE_CARD_TO_HAND",
             "args": {"player_id": "self", "options": ["農場", "銀行"]}}
        ]}
    },
    "回収": {
        "name": "回収", "card_type": "EVENT",
        "triggers": {"PLAY_EVENT_THIS": [
            {"effect_type": "PROCESS_CHOOSE_AND_MOVE_CARD_FROM_PILE",
             "args": {"player_id": "self", "source_piles": ["discard"], "destination_pile": "hand"}}
        ]}
    },
    "選別": {
        "name": "選別", "card_type": "EVENT",
        "triggers": {"PLAY_EVENT_THIS": [
            {"effect_type": "PROCESS_CARD_OPERATION",
             "args": {"player_id": "self", "operation": "move", "selection_method": "choice",
                      "source_piles": ["hand"], "destination_pile": "discard", "count": 2}}
        ]}
    },
    "換金": {
        "name": "換金", "card_type": "EVENT",
        "triggers": {"PLAY_EVENT_THIS": [
            {"effect_type": "PROCESS_REDUCE_MONEY_DURABILITY_AND_GAIN_SCALE", "args": {"player_id": "self"}}
        ]}
    },
    "買収": {
        "name": "買収", "card_type": "EVENT",
        "triggers": {"PLAY_EVENT_THIS": [
            {"effect_type": "PROCESS_CHOOSE_AND_BOUNCE_TO_WEALTH",
             "args": {"player_id": "self",
                      "next_effect": {"effect_type": "MODIFY_SCALE_RESERVE",
                                      "args": {"player_id": "self", "amount": 1}}}}
        ]}
    },
    "破壊工作": {
        "name": "破壊工作", "card_type": "EVENT",
        "triggers": {"PLAY_EVENT_THIS": [
            {"effect_type": "PROCESS_CHOOSE_AND_MODIFY_DURABILITY_TO_WEALTH",
             "args": {"player_id": "self", "amount": -1}}
        ]}
    }
}"#;

// =============================================================================
// Setup
// =============================================================================

fn started() -> GameState {
    let db = CardDatabase::from_json_str(CARDS).unwrap();
    let presets = vec![DeckPreset::new("農業", vec!["農場"; 20])];
    let config = RulesConfig::default().with_seed(3).with_first_player(PlayerId::FIRST);
    let state = initialize_game(db, &presets, "農業", "農業", config).unwrap();
    let state = perform_mulligan(state, PlayerId::FIRST, &[]);
    let state = perform_mulligan(state, PlayerId::SECOND, &[]);
    resolve_mulligan_phase(state)
}

fn put(state: &mut GameState, name: &str, player: PlayerId, pile: Pile) -> InstanceId {
    let id = state.create_instance(name, player).unwrap();
    state.insert_into_pile(id, player, pile, ZonePosition::Bottom);
    id
}

fn play(state: GameState, card: InstanceId) -> GameState {
    play_card(state, PlayerId::FIRST, card, EffectArgs::new())
}

fn hand_names(state: &GameState, player: PlayerId) -> Vec<String> {
    state
        .player(player)
        .hand
        .iter()
        .map(|&id| state.card(id).unwrap().name.clone())
        .collect()
}

// =============================================================================
// Card To Add
// =============================================================================

#[test]
fn test_card_to_add() {
    let mut state = started();
    let offer = put(&mut state, "求人", PlayerId::FIRST, Pile::Hand);

    let state = play(state, offer);
    let input = state.awaiting_input.clone().expect("choice pending");
    assert_eq!(input.kind, ChoiceKind::CardToAdd);
    assert_eq!(input.player, PlayerId::FIRST);
    assert_eq!(input.template_options, vec!["農場".to_string(), "銀行".to_string()]);
    assert_eq!(state.status.input_for, Some(PlayerId::FIRST));

    let state = resolve_input(state, Choice::Template("銀行".into()));

    assert!(state.awaiting_input.is_none());
    assert_eq!(state.status.input_for, None);
    assert!(hand_names(&state, PlayerId::FIRST).contains(&"銀行".to_string()));
    state.check_integrity().unwrap();
}

#[test]
fn test_unoffered_template_keeps_request() {
    let mut state = started();
    let offer = put(&mut state, "求人", PlayerId::FIRST, Pile::Hand);
    let state = play(state, offer);
    let pending = state.awaiting_input.clone();
    let hand = state.player(PlayerId::FIRST).hand.len();

    let state = resolve_input(state, Choice::Template("マネー".into()));

    assert_eq!(state.awaiting_input, pending);
    assert_eq!(state.status.input_for, Some(PlayerId::FIRST));
    assert_eq!(state.player(PlayerId::FIRST).hand.len(), hand);

    let state = resolve_input(state, Choice::Template("銀行".into()));

    assert!(state.awaiting_input.is_none());
    assert!(hand_names(&state, PlayerId::FIRST).contains(&"銀行".to_string()));
    assert_eq!(state.phase, GamePhase::Play);
}

// =============================================================================
// Card From Pile
// =============================================================================

#[test]
fn test_card_from_pile() {
    let mut state = started();
    let bank = put(&mut state, "銀行", PlayerId::FIRST, Pile::Discard);
    let salvage = put(&mut state, "回収", PlayerId::FIRST, Pile::Hand);

    let state = play(state, salvage);
    let input = state.awaiting_input.clone().expect("choice pending");
    assert_eq!(input.kind, ChoiceKind::CardFromPile);
    assert_eq!(input.options, vec![bank], "the played card itself is not offered");

    let state = resolve_input(state, Choice::Card(bank));

    assert_eq!(state.locate(bank), Some((PlayerId::FIRST, Pile::Hand)));
}

#[test]
fn test_empty_pile_asks_nothing() {
    let mut state = started();
    let salvage = put(&mut state, "回収", PlayerId::FIRST, Pile::Hand);

    let state = play(state, salvage);

    assert!(state.awaiting_input.is_none());
    assert_eq!(state.locate(salvage), Some((PlayerId::FIRST, Pile::Discard)));
}

// =============================================================================
// Cards For Operation
// =============================================================================

#[test]
fn test_cards_for_operation() {
    let mut state = started();
    let sort = put(&mut state, "選別", PlayerId::FIRST, Pile::Hand);

    let state = play(state, sort);
    let input = state.awaiting_input.clone().expect("choice pending");
    assert_eq!(input.kind, ChoiceKind::CardsForOperation);
    assert_eq!(input.count, 2);
    assert_eq!(input.options.len(), 6);

    let picked = vec![input.options[0], input.options[3]];
    let state = resolve_input(state, Choice::Cards(picked.clone()));

    for card in picked {
        assert_eq!(state.locate(card), Some((PlayerId::FIRST, Pile::Discard)));
    }
    assert_eq!(state.player(PlayerId::FIRST).hand.len(), 4);
}

#[test]
fn test_too_many_cards_keeps_request() {
    let mut state = started();
    let sort = put(&mut state, "選別", PlayerId::FIRST, Pile::Hand);
    let state = play(state, sort);
    let options = state.awaiting_input.clone().unwrap().options;

    let state = resolve_input(state, Choice::Cards(options[..3].to_vec()));

    assert!(state.awaiting_input.is_some());
    assert_eq!(state.player(PlayerId::FIRST).hand.len(), 6);

    let state = resolve_input(state, Choice::Cards(options[..2].to_vec()));

    assert!(state.awaiting_input.is_none());
    assert_eq!(state.player(PlayerId::FIRST).hand.len(), 4);
}

// =============================================================================
// Number
// =============================================================================

#[test]
fn test_number_converts_token_durability() {
    let mut state = started();
    let token = put(&mut state, "マネー", PlayerId::FIRST, Pile::Field);
    state.card_mut(token).unwrap().current_durability = 5;
    let cash = put(&mut state, "換金", PlayerId::FIRST, Pile::Hand);

    let state = play(state, cash);
    let input = state.awaiting_input.clone().expect("choice pending");
    assert_eq!(input.kind, ChoiceKind::Number);
    assert_eq!((input.min, input.max), (0, 5));
    assert!(input.prompt.as_deref().unwrap().contains("マネー"));

    let state = resolve_input(state, Choice::Number(3));

    assert_eq!(state.card(token).unwrap().current_durability, 2);
    assert_eq!(state.player(PlayerId::FIRST).scale, 3);
}

#[test]
fn test_number_out_of_range_keeps_request() {
    let mut state = started();
    let token = put(&mut state, "マネー", PlayerId::FIRST, Pile::Field);
    state.card_mut(token).unwrap().current_durability = 2;
    let cash = put(&mut state, "換金", PlayerId::FIRST, Pile::Hand);
    let state = play(state, cash);

    let state = resolve_input(state, Choice::Number(9));

    assert!(state.awaiting_input.is_some());
    assert_eq!(state.card(token).unwrap().current_durability, 2);
    assert_eq!(state.player(PlayerId::FIRST).scale, 0);

    let state = resolve_input(state, Choice::Number(2));

    assert!(state.awaiting_input.is_none());
    assert_eq!(state.player(PlayerId::FIRST).scale, 2);
}

// =============================================================================
// Card For Effect
// =============================================================================

#[test]
fn test_card_for_effect_then_chained_effect() {
    let mut state = started();
    let farm = put(&mut state, "農場", PlayerId::SECOND, Pile::Field);
    let bribe = put(&mut state, "買収", PlayerId::FIRST, Pile::Hand);

    let state = play(state, bribe);
    let input = state.awaiting_input.clone().expect("choice pending");
    assert_eq!(input.kind, ChoiceKind::CardForEffect);
    assert_eq!(input.options, vec![farm]);
    assert_eq!(state.player(PlayerId::FIRST).scale, 0, "chained effect waits for the choice");

    let state = resolve_input(state, Choice::Card(farm));

    assert_eq!(state.locate(farm), Some((PlayerId::SECOND, Pile::Hand)));
    assert_eq!(state.player(PlayerId::FIRST).scale, 1);
}

#[test]
fn test_chosen_wealth_takes_damage() {
    let mut state = started();
    let bank = put(&mut state, "銀行", PlayerId::SECOND, Pile::Field);
    let sabotage = put(&mut state, "破壊工作", PlayerId::FIRST, Pile::Hand);

    let state = play(state, sabotage);
    let state = resolve_input(state, Choice::Card(bank));

    assert_eq!(state.card(bank).unwrap().current_durability, 3);
}

#[test]
fn test_wrong_choice_shape_keeps_request() {
    let mut state = started();
    let farm = put(&mut state, "農場", PlayerId::SECOND, Pile::Field);
    let bribe = put(&mut state, "買収", PlayerId::FIRST, Pile::Hand);
    let state = play(state, bribe);

    let before = serde_json::to_value(&state).unwrap();

    let state = resolve_input(state, Choice::Number(1));

    assert_eq!(serde_json::to_value(&state).unwrap(), before);
    assert_eq!(state.locate(farm), Some((PlayerId::SECOND, Pile::Field)));

    let state = resolve_input(state, Choice::Card(farm));

    assert_eq!(state.locate(farm), Some((PlayerId::SECOND, Pile::Hand)));
}

// =============================================================================
// Blocking
// =============================================================================

#[test]
fn test_pending_input_blocks_actions() {
    let mut state = started();
    let offer = put(&mut state, "求人", PlayerId::FIRST, Pile::Hand);
    let farm = put(&mut state, "農場", PlayerId::FIRST, Pile::Hand);
    let state = play(state, offer);

    let state = play(state, farm);
    assert_eq!(state.locate(farm), Some((PlayerId::FIRST, Pile::Hand)));

    let state = end_turn(state);
    assert_eq!(state.current_turn, PlayerId::FIRST);
    assert!(state.awaiting_input.is_some());
}

#[test]
fn test_resolve_without_pending_input_is_noop() {
    let state = started();
    let turn = state.turn_number;

    let state = resolve_input(state, Choice::Number(1));

    assert_eq!(state.turn_number, turn);
    assert_eq!(state.phase, GamePhase::Play);
}
