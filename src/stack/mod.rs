//! Effect queue and input continuation.
//!
//! All effect execution goes through one FIFO queue on the `GameState`:
//!
//! - `processor`: runs entries in order, honoring skips, fallbacks and the
//!   step ceiling
//! - `input`: the `AwaitingInput` token that freezes the queue, and the
//!   `Choice` that thaws it
//!
//! ```
//! use ideology_ccg::cards::{CardDatabase, CardTemplate, CardType};
//! use ideology_ccg::core::{GameState, PlayerId, RulesConfig};
//! use ideology_ccg::effects::{BoundEffect, EffectArgs, EffectKind};
//! use ideology_ccg::stack::{process_effects, QueueEntry};
//!
//! let db = CardDatabase::from_templates([
//!     CardTemplate::new("農場", CardType::Wealth).with_durability(1),
//! ]).unwrap();
//! let mut state = GameState::new(db, RulesConfig::default());
//! state.queue.push_back(QueueEntry::Effect(BoundEffect::new(
//!     EffectKind::ModifyConsciousness,
//!     EffectArgs::new().with_player(PlayerId::SECOND).with_amount(-4),
//! )));
//!
//! let state = process_effects(state);
//! assert_eq!(state.player(PlayerId::SECOND).consciousness, 46);
//! ```

mod input;
mod processor;

pub use input::{AwaitingInput, Choice, ChoiceKind};
pub use processor::{drain, process_effects, QueueEntry};

pub(crate) use processor::drain_local;
