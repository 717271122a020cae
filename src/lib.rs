//! # ideology-ccg
//!
//! Rules engine for a two-player card game of wealth, actions and
//! ideologies, played over two resources: consciousness and scale.
//!
//! ## Design Principles
//!
//! 1. **Values In, Values Out**: every public operation consumes a
//!    `GameState` and returns the next one. Cloning is cheap; piles,
//!    logs and animation cues live in `im` structures.
//!
//! 2. **Data-Driven Cards**: card behaviour is declared in JSON as
//!    trigger lists of effect descriptors. The engine interprets them;
//!    no card name is known to the code.
//!
//! 3. **One Queue**: effects and events are resolved strictly in order
//!    from a single FIFO queue. Anything a card does is appended to its
//!    tail, and the queue pauses whenever a player must choose.
//!
//! ## Modules
//!
//! - `core`: player seats, instance IDs, RNG, configuration, errors, state
//! - `zones`: piles and card movement between them
//! - `cards`: templates, instances, the card database and deck presets
//! - `triggers`: trigger kinds, game events, conditions, dispatch
//! - `effects`: effect kinds, arguments, corrections, resolution
//! - `stack`: the effect queue and input continuations
//! - `rules`: setup, turns, playing cards and win conditions
//!
//! ## Example
//!
//! ```
//! use ideology_ccg::{
//!     end_turn, initialize_game, perform_mulligan, resolve_mulligan_phase, CardDatabase,
//!     CardTemplate, CardType, DeckPreset, GamePhase, PlayerId, RulesConfig,
//! };
//!
//! let db = CardDatabase::from_templates([CardTemplate::new("農場", CardType::Wealth)]).unwrap();
//! let decks = vec![DeckPreset::new("農業", vec!["農場"; 20])];
//! let config = RulesConfig::default().with_seed(7).with_first_player(PlayerId::FIRST);
//!
//! let state = initialize_game(db, &decks, "農業", "農業", config).unwrap();
//! let state = perform_mulligan(state, PlayerId::FIRST, &[]);
//! let state = perform_mulligan(state, PlayerId::SECOND, &[]);
//! let state = resolve_mulligan_phase(state);
//! assert_eq!(state.phase, GamePhase::Play);
//!
//! let state = end_turn(state);
//! assert_eq!(state.current_turn, PlayerId::SECOND);
//! ```

pub mod core;
pub mod zones;
pub mod cards;
pub mod triggers;
pub mod effects;
pub mod stack;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    AnimationCue, DataError, EngineError, GamePhase, GameRng, GameState, InstanceId, PlayerId,
    PlayerMap, PlayerState, RulesConfig,
};

pub use crate::zones::{Pile, ZonePosition};

pub use crate::cards::{CardDatabase, CardInstance, CardTemplate, CardType, DeckPreset, Location};

pub use crate::triggers::{Condition, GameEvent, Scope, TriggerKind};

pub use crate::effects::{
    BoundEffect, CardOperation, CardRef, EffectArgs, EffectDescriptor, EffectKind,
    ParameterCorrection, PlayerRef, ResolveResult,
};

pub use crate::stack::{process_effects, AwaitingInput, Choice, ChoiceKind, QueueEntry};

pub use crate::rules::{
    check_game_over, end_turn, initialize_game, perform_mulligan, play_card, resolve_input,
    resolve_mulligan_phase, start_turn,
};
