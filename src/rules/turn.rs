//! Turn phase machine and mulligan.
//!
//! ```text
//! mulligan → start turn → play → end turn → start turn → … → game over
//! ```
//!
//! Ending a turn queues reactions that may themselves ask for input, so
//! the pivot to the next player is deferred: `end_turn` marks a transition
//! pending, and whichever call drains the queue last (`end_turn` itself or
//! `resolve_input`) completes it through [`settle`].

use log::{debug, info};

use super::game_over::check_game_over;
use crate::core::{GamePhase, GameState, InstanceId, PlayerId};
use crate::effects::{BoundEffect, EffectArgs, EffectKind};
use crate::stack::{drain, QueueEntry};
use crate::triggers::{GameEvent, TriggerKind};
use crate::zones::{Pile, ZonePosition};

/// Begin the current player's turn: draw, then start-of-turn triggers.
#[must_use]
pub fn start_turn(mut state: GameState) -> GameState {
    if state.game_over {
        return state;
    }
    let current = state.current_turn;
    state.phase = GamePhase::StartTurn;
    state.exposed_cards.clear();
    for card in state.cards.values_mut() {
        card.clear_flags();
    }
    for player in PlayerId::all() {
        state.player_mut(player).cards_played_this_turn = 0;
    }

    let order = if current == state.first_player {
        "先攻"
    } else {
        "後攻"
    };
    let header = format!(
        "--- {}のターン開始 ({order} ターン{}) ---",
        state.player(current).name,
        state.round_number
    );
    state.log_event(header);
    info!(
        "turn {} (round {}) begins for {current}",
        state.turn_number, state.round_number
    );

    let draw = BoundEffect::new(EffectKind::DrawCard, EffectArgs::new().with_player(current));
    state.queue.push_back(QueueEntry::Effect(draw));
    state
        .queue
        .push_back(QueueEntry::Event(GameEvent::turn(TriggerKind::StartTurnOwner, current)));
    state
        .queue
        .push_back(QueueEntry::Event(GameEvent::turn(TriggerKind::StartTurnOpponent, current)));
    drain(&mut state);
    settle(state)
}

/// End the current player's turn and, once its reactions are done, hand
/// over to the opponent.
#[must_use]
pub fn end_turn(mut state: GameState) -> GameState {
    if state.game_over
        || state.is_blocked()
        || state.status.transition_pending
        || state.phase != GamePhase::Play
    {
        debug!("end of turn declined in phase {:?}", state.phase);
        return state;
    }
    let current = state.current_turn;
    state.phase = GamePhase::EndTurn;
    state.status.turn_end_in_progress = true;
    state.status.transition_pending = true;
    state
        .queue
        .push_back(QueueEntry::Event(GameEvent::turn(TriggerKind::EndTurnOwner, current)));
    state
        .queue
        .push_back(QueueEntry::Event(GameEvent::turn(TriggerKind::EndTurnOpponent, current)));
    drain(&mut state);
    settle(state)
}

/// Finish whatever the turn machine was waiting on, if nothing is left to
/// wait for.
pub(crate) fn settle(mut state: GameState) -> GameState {
    if state.is_blocked() || !state.queue.is_empty() {
        return state;
    }
    if state.status.transition_pending {
        state = check_game_over(state);
        if state.game_over {
            return state;
        }
        return pivot(state);
    }
    if state.phase == GamePhase::StartTurn {
        state.phase = GamePhase::Play;
    }
    check_game_over(state)
}

/// Hand the turn to the opponent and advance the counters.
fn pivot(mut state: GameState) -> GameState {
    let previous = state.current_turn;
    state.status.turn_end_in_progress = false;
    state.status.transition_pending = false;
    state.current_turn = previous.opponent();
    if previous == state.first_player {
        state.turn_in_round = 2;
    } else {
        state.round_number += 1;
        state.turn_in_round = 1;
    }
    state.turn_number += 1;
    start_turn(state)
}

fn shift(state: &mut GameState, card: InstanceId, player: PlayerId, to: Pile) {
    state.detach(card);
    state.insert_into_pile(card, player, to, ZonePosition::Bottom);
}

/// Return the chosen hand cards to the deck, shuffle, and redraw as many.
///
/// Cards not in the player's hand are ignored. A player gets one decision.
#[must_use]
pub fn perform_mulligan(mut state: GameState, player: PlayerId, cards: &[InstanceId]) -> GameState {
    if state.phase != GamePhase::Mulligan || state.mulligan_done[player] {
        debug!("{player} has no mulligan to make");
        return state;
    }
    let mut returned: Vec<InstanceId> = Vec::new();
    for &card in cards {
        if !returned.contains(&card) && state.locate(card) == Some((player, Pile::Hand)) {
            returned.push(card);
        }
    }
    for &card in &returned {
        shift(&mut state, card, player, Pile::Deck);
    }
    if !returned.is_empty() {
        state.shuffle_deck(player);
    }
    for _ in &returned {
        let Some(card) = state.deck_top(player) else {
            break;
        };
        shift(&mut state, card, player, Pile::Hand);
    }

    state.mulligan_done[player] = true;
    let name = state.player(player).name.clone();
    state.log_event(format!("{name}がマリガン ({}枚)", returned.len()));
    state
}

/// Start the first turn once both players have decided on their mulligan.
#[must_use]
pub fn resolve_mulligan_phase(state: GameState) -> GameState {
    if state.phase != GamePhase::Mulligan || !PlayerId::all().all(|p| state.mulligan_done[p]) {
        return state;
    }
    start_turn(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDatabase, CardTemplate, CardType, DeckPreset};
    use crate::core::RulesConfig;
    use crate::effects::{EffectDescriptor, PlayerRef};
    use crate::rules::initialize_game;

    fn game(db: CardDatabase) -> GameState {
        let presets = vec![DeckPreset::new("基本", vec!["農場"; 20])];
        let config = RulesConfig::default().with_first_player(PlayerId::FIRST).with_seed(5);
        initialize_game(db, &presets, "基本", "基本", config).unwrap()
    }

    fn plain() -> GameState {
        game(CardDatabase::from_templates([CardTemplate::new("農場", CardType::Wealth).with_durability(2)]).unwrap())
    }

    #[test]
    fn test_start_turn_draws() {
        let state = start_turn(plain());

        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.player(PlayerId::FIRST).hand.len(), 6);
        assert_eq!(state.player(PlayerId::FIRST).deck.len(), 14);
        assert!(state.log.iter().any(|line| line.contains("先攻 ターン1")));
    }

    #[test]
    fn test_turn_counters() {
        let mut state = start_turn(plain());
        assert_eq!((state.turn_number, state.round_number, state.turn_in_round), (1, 1, 1));

        state = end_turn(state);
        assert_eq!(state.current_turn, PlayerId::SECOND);
        assert_eq!((state.turn_number, state.round_number, state.turn_in_round), (2, 1, 2));

        state = end_turn(state);
        assert_eq!(state.current_turn, PlayerId::FIRST);
        assert_eq!((state.turn_number, state.round_number, state.turn_in_round), (3, 2, 1));
        assert!(!state.status.transition_pending);
        assert!(!state.status.turn_end_in_progress);
    }

    #[test]
    fn test_end_turn_outside_play_declines() {
        let state = plain();
        let state = end_turn(state);
        assert_eq!(state.phase, GamePhase::Mulligan);
        assert_eq!(state.current_turn, PlayerId::FIRST);
    }

    #[test]
    fn test_start_turn_triggers_follow_the_draw() {
        let mut gain = EffectArgs::new().with_amount(1);
        gain.player_id = Some(PlayerRef::Owner);
        let db = CardDatabase::from_templates([
            CardTemplate::new("農場", CardType::Wealth).with_durability(2),
            CardTemplate::new("銀行", CardType::Wealth).with_durability(2).with_trigger(
                TriggerKind::StartTurnOwner,
                [EffectDescriptor::new(EffectKind::ModifyScaleReserve, gain)],
            ),
        ])
        .unwrap();
        let mut state = game(db);
        let bank = state.create_instance("銀行", PlayerId::SECOND).unwrap();
        state.insert_into_pile(bank, PlayerId::SECOND, Pile::Field, ZonePosition::Bottom);

        state = start_turn(state);
        assert_eq!(state.player(PlayerId::SECOND).scale, 0, "not the bank owner's turn");

        state = end_turn(state);
        assert_eq!(state.player(PlayerId::SECOND).scale, 1);
    }

    #[test]
    fn test_mulligan_round_trip() {
        let mut state = plain();
        let hand = state.player(PlayerId::FIRST).hand.clone();

        state = perform_mulligan(state, PlayerId::FIRST, &hand[..2]);
        assert_eq!(state.player(PlayerId::FIRST).hand.len(), 5);
        assert_eq!(state.player(PlayerId::FIRST).deck.len(), 15);
        state.check_integrity().unwrap();

        state = resolve_mulligan_phase(state);
        assert_eq!(state.phase, GamePhase::Mulligan, "second player has not decided");

        state = perform_mulligan(state, PlayerId::SECOND, &[]);
        state = resolve_mulligan_phase(state);
        assert_eq!(state.phase, GamePhase::Play);
        assert_eq!(state.player(PlayerId::FIRST).hand.len(), 6);

        let again = resolve_mulligan_phase(state.clone());
        assert_eq!(again.player(PlayerId::FIRST).hand.len(), 6, "first turn starts once");
        assert_eq!(again.turn_number, state.turn_number);
    }

    #[test]
    fn test_second_mulligan_is_ignored() {
        let mut state = plain();
        state = perform_mulligan(state, PlayerId::FIRST, &[]);
        let hand = state.player(PlayerId::FIRST).hand.clone();

        state = perform_mulligan(state, PlayerId::FIRST, &hand);

        assert_eq!(state.player(PlayerId::FIRST).hand, hand);
    }
}
