//! Effect queue integration tests.
//!
//! These tests verify the ordering law of the queue: whatever an entry
//! produces runs after everything already waiting.

use ideology_ccg::{
    process_effects, AwaitingInput, BoundEffect, CardDatabase, CardTemplate, CardType, EffectArgs,
    EffectDescriptor, EffectKind, GameEvent, GameState, Pile, PlayerId, PlayerRef, QueueEntry,
    RulesConfig, TriggerKind, ZonePosition,
};

fn gain(amount: i32) -> EffectDescriptor {
    let mut args = EffectArgs::new().with_amount(amount);
    args.player_id = Some(PlayerRef::Owner);
    EffectDescriptor::new(EffectKind::ModifyScale, args)
}

fn set(amount: i32, player: PlayerId) -> QueueEntry {
    BoundEffect::new(EffectKind::SetScale, EffectArgs::new().with_player(player).with_amount(amount))
        .into()
}

/// A card that raises its owner's scale when drawn and at the end of their turn.
fn state() -> GameState {
    let db = CardDatabase::from_templates([
        CardTemplate::new("農場", CardType::Wealth).with_durability(2),
        CardTemplate::new("福袋", CardType::Event)
            .with_trigger(TriggerKind::CardDrawnThis, [gain(10)])
            .with_trigger(TriggerKind::EndTurnOwner, [gain(100)]),
    ])
    .unwrap();
    GameState::new(db, RulesConfig::default())
}

// =============================================================================
// Ordering
// =============================================================================

/// Reactions to an effect run after entries queued before them.
#[test]
fn test_reactions_append_to_tail() {
    let mut state = state();
    let bag = state.create_instance("福袋", PlayerId::FIRST).unwrap();
    state.insert_into_pile(bag, PlayerId::FIRST, Pile::Deck, ZonePosition::Top);

    let draw = BoundEffect::new(EffectKind::DrawCard, EffectArgs::new().with_player(PlayerId::FIRST));
    state.queue.push_back(draw.into());
    state.queue.push_back(set(1, PlayerId::FIRST));

    let state = process_effects(state);

    // Draw, then set to 1, then the drawn card's +10.
    assert_eq!(state.player(PlayerId::FIRST).scale, 11);
    assert_eq!(state.locate(bag), Some((PlayerId::FIRST, Pile::Hand)));
}

/// A queued event is broadcast only when it reaches the front.
#[test]
fn test_queued_event_waits_its_turn() {
    let mut state = state();
    let bag = state.create_instance("福袋", PlayerId::FIRST).unwrap();
    state.insert_into_pile(bag, PlayerId::FIRST, Pile::Resolving, ZonePosition::Bottom);

    state.queue.push_back(set(5, PlayerId::FIRST));
    state
        .queue
        .push_back(GameEvent::turn(TriggerKind::EndTurnOwner, PlayerId::FIRST).into());
    state.queue.push_back(set(2, PlayerId::FIRST));

    let state = process_effects(state);

    // 5, then the event's reaction is queued behind the second set.
    assert_eq!(state.player(PlayerId::FIRST).scale, 102);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn test_processing_drained_queue_changes_nothing() {
    let mut state = state();
    state.queue.push_back(set(4, PlayerId::SECOND));

    let once = process_effects(state);
    let log = once.log.len();
    let twice = process_effects(once.clone());

    assert_eq!(twice.player(PlayerId::SECOND).scale, 4);
    assert_eq!(twice.log.len(), log);
    assert!(twice.queue.is_empty());
}

/// A pending choice freezes the queue; processing leaves everything as is.
#[test]
fn test_pending_input_freezes_queue() {
    let mut state = state();
    let resume = BoundEffect::new(EffectKind::SetScale, EffectArgs::new().with_player(PlayerId::FIRST));
    state.awaiting_input = Some(AwaitingInput::number(PlayerId::FIRST, 0, 3, resume));
    state.queue.push_back(set(9, PlayerId::FIRST));
    let before = serde_json::to_value(&state).unwrap();

    let state = process_effects(state);

    assert_eq!(serde_json::to_value(&state).unwrap(), before);
    assert_eq!(state.queue.len(), 1);
}

#[test]
fn test_failed_effect_does_not_stop_queue() {
    let mut state = state();
    let orphan = BoundEffect::new(EffectKind::MoveCard, EffectArgs::new().with_destination(Pile::Hand));
    state.queue.push_back(orphan.into());
    state.queue.push_back(set(3, PlayerId::FIRST));

    let state = process_effects(state);

    assert_eq!(state.player(PlayerId::FIRST).scale, 3);
}
