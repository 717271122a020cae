//! Pile system for card locations.
//!
//! ## Key Types
//!
//! - `Pile`: One of a player's six piles
//! - `ZonePosition`: Position specifier for insertion

pub mod manager;

pub use manager::{Pile, ZonePosition};
