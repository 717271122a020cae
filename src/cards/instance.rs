//! Card instances - runtime card state.
//!
//! `CardInstance` is one stamped copy of a template. It tracks the mutable
//! parts of a card: where it is, its current durability and the required
//! scale that effects may have discounted.
//!
//! ## Removed Cards
//!
//! A card taken out of the game keeps its index entry with location
//! `Removed`, so effects still holding its id resolve to a harmless no-op
//! rather than a dangling reference.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardTemplate, CardType};
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::zones::Pile;

/// Where an instance currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Hand,
    Deck,
    Field,
    Discard,
    Ideology,
    /// An event card mid-play.
    Resolving,
    /// Out of the game entirely. Distinct from discarded.
    #[serde(rename = "none")]
    Removed,
}

impl Location {
    /// The pile this location corresponds to, if any.
    #[must_use]
    pub const fn pile(self) -> Option<Pile> {
        match self {
            Location::Hand => Some(Pile::Hand),
            Location::Deck => Some(Pile::Deck),
            Location::Field => Some(Pile::Field),
            Location::Discard => Some(Pile::Discard),
            Location::Ideology => Some(Pile::Ideology),
            Location::Resolving => Some(Pile::Resolving),
            Location::Removed => None,
        }
    }

    /// Field and ideology slot.
    #[must_use]
    pub const fn is_in_play(self) -> bool {
        matches!(self, Location::Field | Location::Ideology)
    }
}

impl From<Pile> for Location {
    fn from(pile: Pile) -> Self {
        match pile {
            Pile::Hand => Location::Hand,
            Pile::Deck => Location::Deck,
            Pile::Field => Location::Field,
            Pile::Discard => Location::Discard,
            Pile::Ideology => Location::Ideology,
            Pile::Resolving => Location::Resolving,
        }
    }
}

/// A card instance in a game.
///
/// ## Turn Flags
///
/// `flags` holds per-turn markers (`i64` values, 0/1 for booleans) and is
/// cleared at the start of every turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub instance_id: InstanceId,

    /// Template name.
    pub name: String,

    pub card_type: CardType,

    /// Owner. Changes only when an effect moves the card to another
    /// player's pile.
    pub owner: PlayerId,

    pub location: Location,

    pub current_durability: i32,

    /// Required scale, possibly modified by effects while in hand.
    pub required_scale: i32,

    pub is_token: bool,

    #[serde(default)]
    pub flags: FxHashMap<String, i64>,
}

impl CardInstance {
    /// Stamp an instance from a template. It starts outside every pile
    /// until placed.
    #[must_use]
    pub fn from_template(instance_id: InstanceId, template: &CardTemplate, owner: PlayerId) -> Self {
        Self {
            instance_id,
            name: template.name.clone(),
            card_type: template.card_type,
            owner,
            location: Location::Removed,
            current_durability: template.base_durability(),
            required_scale: template.required_scale,
            is_token: template.is_token,
            flags: FxHashMap::default(),
        }
    }

    /// Restore printed durability and required scale.
    pub fn reset_to_template(&mut self, template: &CardTemplate) {
        self.current_durability = template.base_durability();
        self.required_scale = template.required_scale;
    }

    /// Get a turn flag with a default.
    #[must_use]
    pub fn flag(&self, key: &str, default: i64) -> i64 {
        self.flags.get(key).copied().unwrap_or(default)
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: i64) {
        self.flags.insert(key.into(), value);
    }

    pub fn clear_flags(&mut self) {
        self.flags.clear();
    }
}
