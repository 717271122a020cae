//! Win conditions.

use log::info;

use crate::core::{AnimationCue, GamePhase, GameState, PlayerId};

/// Decide the game if a player's consciousness has run out or a deck is
/// empty. Calling it on a finished game changes nothing.
///
/// A deck-out is judged first and overrides a consciousness loss: the
/// higher consciousness wins, and a tie goes to the player not on turn.
/// Otherwise consciousness is checked in seat order.
#[must_use]
pub fn check_game_over(mut state: GameState) -> GameState {
    if state.game_over {
        return state;
    }
    let (first, second) = (PlayerId::FIRST, PlayerId::SECOND);
    let decided = if state.player(first).deck.is_empty() || state.player(second).deck.is_empty() {
        let (a, b) = (state.player(first).consciousness, state.player(second).consciousness);
        let winner = match a.cmp(&b) {
            std::cmp::Ordering::Greater => first,
            std::cmp::Ordering::Less => second,
            std::cmp::Ordering::Equal => state.current_turn.opponent(),
        };
        Some((winner, "デッキ切れによる判定".to_string()))
    } else if state.player(first).consciousness <= 0 {
        Some((second, format!("{}の意識が0になりました", state.player(first).name)))
    } else if state.player(second).consciousness <= 0 {
        Some((first, format!("{}の意識が0になりました", state.player(second).name)))
    } else {
        None
    };

    let Some((winner, reason)) = decided else {
        return state;
    };
    state.game_over = true;
    state.winner = Some(winner);
    state.phase = GamePhase::GameOver;
    let message = format!("{reason}。{}の勝利！", state.player(winner).name);
    state.log_event(format!("ゲーム終了: {message}"));
    info!("game over after turn {}: {winner} wins", state.turn_number);
    state.push_animation(AnimationCue::new("GAME_RESULT", None).with_message(message));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDatabase, CardTemplate, CardType};
    use crate::core::RulesConfig;
    use crate::zones::{Pile, ZonePosition};

    fn state_with_decks(cards: usize) -> GameState {
        let db = CardDatabase::from_templates([CardTemplate::new("農場", CardType::Wealth)]).unwrap();
        let mut state = GameState::new(db, RulesConfig::default());
        for player in PlayerId::all() {
            for _ in 0..cards {
                let id = state.create_instance("農場", player).unwrap();
                state.insert_into_pile(id, player, Pile::Deck, ZonePosition::Bottom);
            }
        }
        state.phase = GamePhase::Play;
        state
    }

    #[test]
    fn test_game_continues() {
        let state = check_game_over(state_with_decks(3));
        assert!(!state.game_over);
        assert_eq!(state.winner, None);
        assert_eq!(state.phase, GamePhase::Play);
    }

    #[test]
    fn test_consciousness_loss() {
        let mut state = state_with_decks(3);
        state.player_mut(PlayerId::SECOND).consciousness = 0;

        let state = check_game_over(state);

        assert!(state.game_over);
        assert_eq!(state.winner, Some(PlayerId::FIRST));
        assert_eq!(state.phase, GamePhase::GameOver);
        let cue = state.animations.last().unwrap();
        assert_eq!(cue.label, "GAME_RESULT");
        assert!(cue.message.as_deref().unwrap().contains("意識が0"));
    }

    #[test]
    fn test_first_seat_checked_first() {
        let mut state = state_with_decks(3);
        state.player_mut(PlayerId::FIRST).consciousness = -2;
        state.player_mut(PlayerId::SECOND).consciousness = -5;

        assert_eq!(check_game_over(state).winner, Some(PlayerId::SECOND));
    }

    #[test]
    fn test_deck_out_compares_consciousness() {
        let mut state = state_with_decks(0);
        state.player_mut(PlayerId::FIRST).consciousness = 10;
        state.player_mut(PlayerId::SECOND).consciousness = 30;

        let state = check_game_over(state);

        assert_eq!(state.winner, Some(PlayerId::SECOND));
        assert!(state.log.last().unwrap().contains("デッキ切れ"));
    }

    #[test]
    fn test_deck_out_overrides_consciousness_loss() {
        let mut state = state_with_decks(0);
        state.player_mut(PlayerId::FIRST).consciousness = 0;
        state.player_mut(PlayerId::SECOND).consciousness = -4;

        let state = check_game_over(state);

        assert_eq!(state.winner, Some(PlayerId::FIRST));
        assert!(state.log.last().unwrap().contains("デッキ切れ"));
    }

    #[test]
    fn test_deck_out_tie_favors_player_off_turn() {
        let mut state = state_with_decks(0);
        state.current_turn = PlayerId::FIRST;

        assert_eq!(check_game_over(state).winner, Some(PlayerId::SECOND));
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut state = state_with_decks(0);
        state.player_mut(PlayerId::FIRST).consciousness = 1;
        let once = check_game_over(state);
        let cues = once.animations.len();

        let twice = check_game_over(once.clone());

        assert_eq!(twice.winner, once.winner);
        assert_eq!(twice.animations.len(), cues);
        assert_eq!(twice.log.len(), once.log.len());
    }
}
