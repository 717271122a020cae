//! Rules configuration.
//!
//! `RulesConfig` carries the numeric constants of the ruleset plus engine
//! tuning knobs. `RulesConfig::default()` is the standard game; tests and
//! drivers adjust it through the `with_*` builders.
//!
//! ```
//! use ideology_ccg::core::RulesConfig;
//!
//! let config = RulesConfig::default().with_seed(7).with_initial_hand_size(3);
//! assert_eq!(config.seed, 7);
//! assert_eq!(config.initial_hand_size, 3);
//! assert_eq!(config.initial_field_limit, 5);
//! ```

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// Constants and limits for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    // === Starting Resources ===
    /// Consciousness each player starts with.
    pub initial_consciousness: i32,

    /// Scale each player starts with.
    pub initial_scale: i32,

    /// Number of wealth slots on each field.
    pub initial_field_limit: i32,

    /// Cards drawn into each hand at setup.
    pub initial_hand_size: usize,

    /// Hand capacity. Cards entering a full hand go to discard.
    pub max_hand_size: usize,

    /// Consciousness lost by the player who goes first.
    pub first_player_penalty: i32,

    // === Setup ===
    /// Seat that takes the first turn. `None` picks one with the game RNG.
    pub first_player: Option<PlayerId>,

    /// Seed for the game RNG.
    pub seed: u64,

    /// Display names for the two seats.
    pub player_names: [String; 2],

    // === Card Vocabulary ===
    /// Template name of the scale token ("Money").
    pub scale_token_name: String,

    /// Template handed out when a scale token cashes in at turn start.
    pub token_reward_name: String,

    // === Engine ===
    /// Upper bound on queue entries processed by one drain.
    pub max_steps_per_drain: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            initial_consciousness: 50,
            initial_scale: 0,
            initial_field_limit: 5,
            initial_hand_size: 5,
            max_hand_size: 7,
            first_player_penalty: 3,
            first_player: None,
            seed: 0,
            player_names: ["あなた".to_string(), "NPC".to_string()],
            scale_token_name: "マネー".to_string(),
            token_reward_name: "資本主義".to_string(),
            max_steps_per_drain: 10_000,
        }
    }
}

impl RulesConfig {
    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fix the first player instead of drawing one.
    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.first_player = Some(player);
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }

    /// Set the starting consciousness.
    #[must_use]
    pub fn with_initial_consciousness(mut self, value: i32) -> Self {
        self.initial_consciousness = value;
        self
    }

    /// Set the starting scale.
    #[must_use]
    pub fn with_initial_scale(mut self, value: i32) -> Self {
        self.initial_scale = value;
        self
    }

    /// Set the first-player consciousness penalty.
    #[must_use]
    pub fn with_first_player_penalty(mut self, penalty: i32) -> Self {
        self.first_player_penalty = penalty;
        self
    }

    /// Set the hand capacity.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Set the drain step ceiling.
    #[must_use]
    pub fn with_max_steps_per_drain(mut self, steps: usize) -> Self {
        self.max_steps_per_drain = steps;
        self
    }
}
