//! Core engine types: instance ids, players, state, RNG, configuration, errors.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod state;

pub use entity::InstanceId;
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use config::RulesConfig;
pub use error::{DataError, EngineError};
pub use state::{
    AnimationCue, GamePhase, GameState, PlayerState, ProcessingStatus, SkipRegistration,
};
