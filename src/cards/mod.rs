//! Card system: templates, instances, and the card database.
//!
//! ## Key Types
//!
//! - `CardType`: Wealth, Ideology or Event
//! - `CardTemplate`: Static card data with its trigger table
//! - `CardInstance`: Runtime card state (location, owner, durability)
//! - `CardDatabase`: Validated name → template lookup
//! - `DeckPreset`: Named deck lists used at setup

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{CardTemplate, CardType};
pub use instance::{CardInstance, Location};
pub use registry::{CardDatabase, DeckPreset};
