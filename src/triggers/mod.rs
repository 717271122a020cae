//! Trigger system for card reactions.
//!
//! Cards react to game events through a trigger table keyed by
//! [`TriggerKind`]. Emitting an event asks the [`Dispatcher`] for every
//! matching reaction, bound and ready to enqueue.
//!
//! ## Key Components
//!
//! - [`TriggerKind`]: closed set of event kinds, each with a fixed [`Scope`]
//! - [`GameEvent`]: an event with its perspective player and payload
//! - [`Condition`]: declarative predicate on state, card and event
//! - [`ConditionEvaluator`]: evaluates conditions against a [`ConditionContext`]
//! - [`Dispatcher`]: enumerates reacting cards and binds their effects
//!
//! ## Example Usage
//!
//! ```
//! use ideology_ccg::cards::{CardDatabase, CardTemplate, CardType};
//! use ideology_ccg::core::{GameState, PlayerId, RulesConfig};
//! use ideology_ccg::effects::{EffectArgs, EffectDescriptor, EffectKind, PlayerRef};
//! use ideology_ccg::triggers::{Dispatcher, GameEvent, TriggerKind};
//! use ideology_ccg::zones::{Pile, ZonePosition};
//!
//! let mut args = EffectArgs::new().with_amount(1);
//! args.player_id = Some(PlayerRef::Owner);
//! let farm = CardTemplate::new("農場", CardType::Wealth)
//!     .with_durability(2)
//!     .with_trigger(
//!         TriggerKind::StartTurnOwner,
//!         [EffectDescriptor::new(EffectKind::ModifyScaleReserve, args)],
//!     );
//! let db = CardDatabase::from_templates([farm]).unwrap();
//! let mut state = GameState::new(db, RulesConfig::default());
//! let id = state.create_instance("農場", PlayerId::FIRST).unwrap();
//! state.insert_into_pile(id, PlayerId::FIRST, Pile::Field, ZonePosition::Bottom);
//!
//! let event = GameEvent::turn(TriggerKind::StartTurnOwner, PlayerId::FIRST);
//! let reactions = Dispatcher::dispatch(&mut state, &event);
//! assert_eq!(reactions.len(), 1);
//! assert_eq!(reactions[0].args.player(), Some(PlayerId::FIRST));
//! ```

mod condition;
mod dispatcher;
mod event;
mod kind;

pub use condition::{
    is_addressable, last_consciousness_key, Condition, ConditionContext, ConditionEvaluator,
};
pub use dispatcher::{Dispatcher, Reactions};
pub use event::GameEvent;
pub use kind::{Scope, TriggerKind};
