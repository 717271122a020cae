//! The public game API.
//!
//! Every operation takes a `GameState` by value and returns the next one.
//! Operations that are illegal in the current state return it unchanged.
//!
//! - `engine`: setup, playing cards, answering input prompts
//! - `turn`: the turn phase machine and mulligan
//! - `game_over`: win conditions

pub mod engine;
pub mod game_over;
pub mod turn;

pub use engine::{initialize_game, play_card, resolve_input};
pub use game_over::check_game_over;
pub use turn::{end_turn, perform_mulligan, resolve_mulligan_phase, start_turn};
