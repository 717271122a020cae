//! Effect system.
//!
//! Card reactions are data: an [`EffectKind`] plus a flat [`EffectArgs`]
//! bag. Once the dispatcher binds a descriptor it becomes a
//! [`BoundEffect`], and the [`EffectResolver`] executes it against the
//! game state:
//!
//! - Primitive kinds act directly (moves, resource changes, skips)
//! - Reserve kinds run the correction pipeline around the change
//! - Composite `PROCESS_*` kinds expand into primitive follow-ups or pause
//!   for player input
//!
//! Every execution yields a [`Resolution`]: its [`ResolveResult`], the
//! entries to enqueue, and an optional input request.

mod args;
mod composite;
mod correction;
mod effect;
mod reserve;
mod resolver;

pub use args::{
    AmountSource, CardOperation, CardRef, DurabilitySource, EffectArgs, PlayerRef, PlayerSet,
    Resource, SelectionMethod,
};
pub use correction::{
    fold_corrections, CorrectionKind, CorrectionTarget, Direction, ParameterCorrection,
};
pub use effect::{BoundEffect, EffectDescriptor, EffectKind};
pub use resolver::{EffectResolver, ResolveResult, Resolution};
