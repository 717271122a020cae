//! Game setup, card plays and input resolution.
//!
//! Every entry point takes the state by value and returns it. An action
//! that is not legal right now returns the state untouched; the reason is
//! logged at debug level.

use log::{debug, info};

use super::game_over::check_game_over;
use super::turn::settle;
use crate::cards::{CardDatabase, CardType, DeckPreset};
use crate::core::{DataError, EngineError, GamePhase, GameState, InstanceId, PlayerId, RulesConfig};
use crate::effects::{BoundEffect, CardRef, EffectArgs, EffectKind, PlayerRef};
use crate::stack::{drain, Choice, QueueEntry};
use crate::zones::{Pile, ZonePosition};

/// Build a new game in the mulligan phase.
///
/// Both decks are stamped from their presets, shuffled with the seeded RNG
/// and dealt an opening hand. The first player is taken from the config or
/// drawn at random, and pays the first-player consciousness penalty.
///
/// ```
/// use ideology_ccg::cards::{CardDatabase, CardTemplate, CardType, DeckPreset};
/// use ideology_ccg::core::{GamePhase, PlayerId, RulesConfig};
/// use ideology_ccg::rules::initialize_game;
///
/// let db = CardDatabase::from_templates([
///     CardTemplate::new("農場", CardType::Wealth).with_durability(2),
/// ]).unwrap();
/// let presets = vec![DeckPreset::new("農業", vec!["農場"; 20])];
/// let config = RulesConfig::default().with_first_player(PlayerId::SECOND);
///
/// let state = initialize_game(db, &presets, "農業", "農業", config).unwrap();
/// assert_eq!(state.phase, GamePhase::Mulligan);
/// assert_eq!(state.player(PlayerId::FIRST).hand.len(), 5);
/// assert_eq!(state.player(PlayerId::SECOND).consciousness, 47);
/// ```
pub fn initialize_game(
    card_defs: CardDatabase,
    deck_presets: &[DeckPreset],
    deck_a: &str,
    deck_b: &str,
    config: RulesConfig,
) -> Result<GameState, EngineError> {
    card_defs.validate()?;
    let find = |name: &str| {
        deck_presets
            .iter()
            .find(|deck| deck.name == name)
            .ok_or_else(|| EngineError::UnknownDeck(name.to_string()))
    };
    let decks = [find(deck_a)?, find(deck_b)?];
    for deck in decks {
        deck.validate(&card_defs)?;
    }

    let mut state = GameState::new(card_defs, config);
    state.log_event("Game initialized.");
    for (player, deck) in PlayerId::all().zip(decks) {
        for name in &deck.cards {
            let Some(id) = state.create_instance(name, player) else {
                return Err(DataError::UnknownDeckCard {
                    deck: deck.name.clone(),
                    card: name.clone(),
                }
                .into());
            };
            state.insert_into_pile(id, player, Pile::Deck, ZonePosition::Bottom);
        }
        state.shuffle_deck(player);
        for _ in 0..state.config.initial_hand_size {
            let Some(card) = state.deck_top(player) else {
                break;
            };
            state.detach(card);
            state.insert_into_pile(card, player, Pile::Hand, ZonePosition::Bottom);
        }
    }

    let first = match state.config.first_player {
        Some(player) => player,
        None => *state.rng.choose(&[PlayerId::FIRST, PlayerId::SECOND]).unwrap_or(&PlayerId::FIRST),
    };
    state.current_turn = first;
    state.first_player = first;
    let penalty = state.config.first_player_penalty;
    let seat = state.player_mut(first);
    seat.consciousness -= penalty;
    let name = seat.name.clone();
    state.log_event(format!("[{name}] が先攻です。意識に {} の影響を受けます。", -penalty));
    info!("game initialized, {first} goes first");

    state.phase = GamePhase::Mulligan;
    Ok(state)
}

/// Play a card from hand.
///
/// `options` are extra arguments carried on the play action; the player
/// and card fields are always overwritten.
#[must_use]
pub fn play_card(
    mut state: GameState,
    player: PlayerId,
    card: InstanceId,
    options: EffectArgs,
) -> GameState {
    if let Err(reason) = check_play(&state, player, card) {
        debug!("{player} cannot play {card}: {reason}");
        return state;
    }
    let mut args = options;
    args.player_id = Some(PlayerRef::Player(player));
    args.card_id = Some(CardRef::Id(card));
    state
        .queue
        .push_back(QueueEntry::Effect(BoundEffect::new(EffectKind::PlayerAction, args)));
    drain(&mut state);
    if state.is_blocked() {
        return state;
    }
    check_game_over(state)
}

fn check_play(state: &GameState, player: PlayerId, card: InstanceId) -> Result<(), &'static str> {
    if state.game_over {
        return Err("the game is over");
    }
    if state.current_turn != player {
        return Err("not their turn");
    }
    if state.phase != GamePhase::Play {
        return Err("not in the play phase");
    }
    if state.is_blocked() || state.status.transition_pending || !state.queue.is_empty() {
        return Err("the engine is busy");
    }
    if state.locate(card) != Some((player, Pile::Hand)) {
        return Err("card is not in their hand");
    }
    let Some(instance) = state.card(card) else {
        return Err("card does not exist");
    };
    if state.effective_scale(player) < instance.required_scale {
        return Err("scale too low");
    }
    let seat = state.player(player);
    let banned = seat
        .ideology
        .and_then(|id| state.template_of(id))
        .is_some_and(|ideology| ideology.bans.contains(&instance.card_type));
    if banned {
        return Err("banned by their ideology");
    }
    if instance.card_type == CardType::Wealth
        && !instance.is_token
        && seat.field.len() as i32 >= seat.field_limit
    {
        return Err("field is full");
    }
    Ok(())
}

/// Answer the pending input request and resume processing.
///
/// A choice that does not fit the request leaves the state untouched and
/// the request open. A request whose source card has left the game is
/// cleared without running anything.
#[must_use]
pub fn resolve_input(mut state: GameState, choice: Choice) -> GameState {
    let Some(input) = state.awaiting_input.as_ref() else {
        debug!("no input is pending");
        return state;
    };

    let source_present = input.source.map_or(true, |id| state.locate(id).is_some());
    let resumed = if source_present {
        match input.resume(&state, choice) {
            Some(effect) => Some(effect),
            None => {
                debug!("choice does not answer the {:?} request", input.kind);
                return state;
            }
        }
    } else {
        debug!("source {:?} of the {:?} request is gone", input.source, input.kind);
        None
    };

    state.awaiting_input = None;
    state.status.input_for = None;
    if let Some(effect) = resumed {
        state.queue.push_back(QueueEntry::Effect(effect));
    }
    drain(&mut state);
    settle(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardTemplate, Location};
    use crate::triggers::TriggerKind;

    fn database() -> CardDatabase {
        CardDatabase::from_templates([
            CardTemplate::new("農場", CardType::Wealth).with_durability(2).with_required_scale(1),
            CardTemplate::new("工場", CardType::Wealth).with_durability(3).with_required_scale(9),
            CardTemplate::new("原始共産制", CardType::Ideology).with_ban(CardType::Wealth),
        ])
        .unwrap()
    }

    fn presets() -> Vec<DeckPreset> {
        vec![
            DeckPreset::new("農業", vec!["農場"; 20]),
            DeckPreset::new("工業", vec!["工場"; 20]),
        ]
    }

    fn started() -> GameState {
        let config = RulesConfig::default().with_first_player(PlayerId::FIRST).with_seed(3);
        let mut state = initialize_game(database(), &presets(), "農業", "工業", config).unwrap();
        state.player_mut(PlayerId::FIRST).scale = 1;
        state.phase = GamePhase::Play;
        state
    }

    #[test]
    fn test_unknown_deck() {
        let err = initialize_game(database(), &presets(), "農業", "不明", RulesConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownDeck(name) if name == "不明"));
    }

    #[test]
    fn test_unknown_card_in_deck() {
        let presets = vec![DeckPreset::new("壊れた", vec!["農場", "幻"])];
        let err = initialize_game(database(), &presets, "壊れた", "壊れた", RulesConfig::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::Data(DataError::UnknownDeckCard { .. })));
    }

    #[test]
    fn test_setup_is_deterministic() {
        let config = RulesConfig::default().with_seed(11);
        let a = initialize_game(database(), &presets(), "農業", "工業", config.clone()).unwrap();
        let b = initialize_game(database(), &presets(), "農業", "工業", config).unwrap();

        assert_eq!(a.first_player, b.first_player);
        assert_eq!(a.player(PlayerId::FIRST).deck, b.player(PlayerId::FIRST).deck);
        assert_eq!(a.player(a.first_player).consciousness, 47);
        assert_eq!(a.player(a.first_player.opponent()).consciousness, 50);
        a.check_integrity().unwrap();
    }

    #[test]
    fn test_play_wealth_card() {
        let state = started();
        let card = state.player(PlayerId::FIRST).hand[0];

        let state = play_card(state, PlayerId::FIRST, card, EffectArgs::new());

        assert_eq!(state.card(card).unwrap().location, Location::Field);
        assert_eq!(state.player(PlayerId::FIRST).cards_played_this_turn, 1);
        assert!(state.log.iter().any(|line| line.contains("「農場」をプレイ")));
    }

    #[test]
    fn test_illegal_plays_decline() {
        let state = started();
        let theirs = state.player(PlayerId::SECOND).hand[0];
        let before = serde_json::to_value(&state).unwrap();

        let state = play_card(state, PlayerId::SECOND, theirs, EffectArgs::new());
        assert_eq!(serde_json::to_value(&state).unwrap(), before, "not their turn");

        let mut state = state;
        state.player_mut(PlayerId::FIRST).scale = 0;
        let mine = state.player(PlayerId::FIRST).hand[0];
        let state = play_card(state, PlayerId::FIRST, mine, EffectArgs::new());
        assert_eq!(state.card(mine).unwrap().location, Location::Hand, "scale too low");
    }

    #[test]
    fn test_full_field_declines_wealth() {
        let mut state = started();
        state.player_mut(PlayerId::FIRST).field_limit = 0;
        let card = state.player(PlayerId::FIRST).hand[0];

        let state = play_card(state, PlayerId::FIRST, card, EffectArgs::new());

        assert_eq!(state.card(card).unwrap().location, Location::Hand);
    }

    #[test]
    fn test_ideology_ban() {
        let mut state = started();
        let ideology = state.create_instance("原始共産制", PlayerId::FIRST).unwrap();
        state.insert_into_pile(ideology, PlayerId::FIRST, Pile::Ideology, ZonePosition::Bottom);
        let card = state.player(PlayerId::FIRST).hand[0];

        let state = play_card(state, PlayerId::FIRST, card, EffectArgs::new());

        assert_eq!(state.card(card).unwrap().location, Location::Hand);
    }

    #[test]
    fn test_resolve_input_without_request_is_noop() {
        let state = started();
        let before = serde_json::to_value(&state).unwrap();
        let state = resolve_input(state, Choice::Number(1));
        assert_eq!(serde_json::to_value(&state).unwrap(), before);
    }

    #[test]
    fn test_resolve_input_keeps_request_on_wrong_shape() {
        let mut state = started();
        let target = state.player(PlayerId::FIRST).hand[0];
        let effect = BoundEffect::new(
            EffectKind::ModifyCardDurability,
            EffectArgs::new().with_card(target),
        );
        state.awaiting_input = Some(crate::stack::AwaitingInput::number(PlayerId::FIRST, 0, 3, effect));
        state.status.input_for = Some(PlayerId::FIRST);

        let before = serde_json::to_value(&state).unwrap();

        let state = resolve_input(state, Choice::Card(target));

        assert_eq!(serde_json::to_value(&state).unwrap(), before);
        assert_eq!(state.status.input_for, Some(PlayerId::FIRST));
    }

    #[test]
    fn test_play_events_reach_reacting_cards() {
        let mut echo = EffectArgs::new().with_amount(2);
        echo.player_id = Some(PlayerRef::Owner);
        let db = CardDatabase::from_templates([
            CardTemplate::new("農場", CardType::Wealth).with_durability(2),
            CardTemplate::new("商人", CardType::Wealth).with_durability(2).with_trigger(
                TriggerKind::PlayerPlayCardActionOwner,
                [crate::effects::EffectDescriptor::new(EffectKind::ModifyScale, echo)],
            ),
        ])
        .unwrap();
        let presets = vec![DeckPreset::new("混合", vec!["農場"; 20])];
        let config = RulesConfig::default().with_first_player(PlayerId::FIRST);
        let mut state = initialize_game(db, &presets, "混合", "混合", config).unwrap();
        state.phase = GamePhase::Play;
        let merchant = state.create_instance("商人", PlayerId::FIRST).unwrap();
        state.insert_into_pile(merchant, PlayerId::FIRST, Pile::Field, ZonePosition::Bottom);
        let card = state.player(PlayerId::FIRST).hand[0];

        let state = play_card(state, PlayerId::FIRST, card, EffectArgs::new());

        assert_eq!(state.player(PlayerId::FIRST).scale, 2);
    }
}
