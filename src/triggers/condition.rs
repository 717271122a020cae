//! Effect conditions.
//!
//! A `Condition` gates a descriptor at bind time, or a correction at apply
//! time. It is always evaluated from one player's point of view (the
//! reacting card's owner, or a correction's injector), optionally with the
//! reacting card and the triggering event in hand.
//!
//! Card data spells conditions in snake case:
//!
//! ```
//! use ideology_ccg::triggers::Condition;
//!
//! let c: Condition = serde_json::from_str(
//!     r#"{"all": [{"resource_at_least": {"resource": "consciousness", "value": 100}}, "owners_turn"]}"#,
//! ).unwrap();
//! assert!(matches!(c, Condition::All(_)));
//! ```

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::cards::{CardType, Location};
use crate::core::{GameState, InstanceId, PlayerId};
use crate::effects::Resource;

/// Closed condition vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    // === Resources ===
    /// Owner's resource strictly above the opponent's.
    SelfHigher(Resource),
    /// Owner's resource strictly below the opponent's.
    SelfLower(Resource),
    ResourceAtLeast { resource: Resource, value: i32 },
    ResourceAtMost { resource: Resource, value: i32 },
    /// The last consciousness reserve actually lowered consciousness.
    ConsciousnessDecreased,

    // === Board ===
    FieldWealthAtLeast(usize),
    FewerWealthThanOpponent,
    OpponentDeckSmaller,
    DeckSizeAtLeast(usize),
    ScaleTokenOnField,
    ScaleTokenDurabilityAtLeast(i32),
    /// Owner's field limit strictly above the opponent's.
    FieldLimitAbove,
    CardsPlayedThisTurnAtLeast(u32),
    /// The owner's ideology slot holds a card with this name.
    IdeologyIs(String),
    /// The reacting card sits in its owner's ideology slot.
    InIdeologySlot,
    /// The reacting card is neither on the field nor in the ideology slot.
    NotInPlay,

    // === Turn ===
    OwnersTurn,
    OpponentsTurn,

    // === Triggering Event ===
    EventByOpponent,
    EventTargetsOwner,
    EventSourceIsNotThis,
    EventCardType(CardType),
    EventCardName(String),
    EventCardIsScaleToken,
    /// Event's card costs more than the owner's scale.
    EventCardUnaffordable,
    EventAmountPositive,
    EventAmountNegative,

    // === Combinators ===
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
    Always,
    Never,
}

impl Condition {
    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    /// Negate this condition.
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }
}

/// Context for evaluating conditions.
pub struct ConditionContext<'a> {
    pub state: &'a GameState,
    /// Perspective player.
    pub owner: PlayerId,
    /// The reacting card.
    pub card: Option<InstanceId>,
    pub event: Option<&'a GameEvent>,
}

impl<'a> ConditionContext<'a> {
    /// Create a new context.
    pub fn new(state: &'a GameState, owner: PlayerId) -> Self {
        Self {
            state,
            owner,
            card: None,
            event: None,
        }
    }

    pub fn with_card(mut self, card: Option<InstanceId>) -> Self {
        self.card = card;
        self
    }

    pub fn with_event(mut self, event: Option<&'a GameEvent>) -> Self {
        self.event = event;
        self
    }

    fn resource(&self, player: PlayerId, resource: Resource) -> i32 {
        let state = self.state.player(player);
        match resource {
            Resource::Consciousness => state.consciousness,
            Resource::Scale => state.scale,
        }
    }

    /// The card an event is about.
    fn event_card(&self) -> Option<&crate::cards::CardInstance> {
        self.event
            .and_then(|e| e.subject)
            .and_then(|id| self.state.card(id))
    }
}

/// Evaluator for conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check if a condition is satisfied.
    pub fn evaluate(condition: &Condition, ctx: &ConditionContext) -> bool {
        let state = ctx.state;
        let owner = ctx.owner;
        let opponent = owner.opponent();
        match condition {
            Condition::SelfHigher(resource) => {
                ctx.resource(owner, *resource) > ctx.resource(opponent, *resource)
            }
            Condition::SelfLower(resource) => {
                ctx.resource(owner, *resource) < ctx.resource(opponent, *resource)
            }
            Condition::ResourceAtLeast { resource, value } => ctx.resource(owner, *resource) >= *value,
            Condition::ResourceAtMost { resource, value } => ctx.resource(owner, *resource) <= *value,
            Condition::ConsciousnessDecreased => state
                .temp_value(&last_consciousness_key(owner))
                .is_some_and(|delta| delta < 0),

            Condition::FieldWealthAtLeast(n) => state.field_wealth(owner).len() >= *n,
            Condition::FewerWealthThanOpponent => {
                state.player(owner).field.len() < state.player(opponent).field.len()
            }
            Condition::OpponentDeckSmaller => {
                state.player(opponent).deck.len() < state.player(owner).deck.len()
            }
            Condition::DeckSizeAtLeast(n) => state.player(owner).deck.len() >= *n,
            Condition::ScaleTokenOnField => state.scale_token_on_field(owner).is_some(),
            Condition::ScaleTokenDurabilityAtLeast(n) => state
                .scale_token_on_field(owner)
                .and_then(|id| state.card(id))
                .is_some_and(|card| card.current_durability >= *n),
            Condition::FieldLimitAbove => {
                state.player(owner).field_limit > state.player(opponent).field_limit
            }
            Condition::CardsPlayedThisTurnAtLeast(n) => {
                state.player(owner).cards_played_this_turn >= *n
            }
            Condition::IdeologyIs(name) => state
                .player(owner)
                .ideology
                .and_then(|id| state.card(id))
                .is_some_and(|card| card.name == *name),
            Condition::InIdeologySlot => {
                ctx.card.is_some() && state.player(owner).ideology == ctx.card
            }
            Condition::NotInPlay => ctx
                .card
                .and_then(|id| state.card(id))
                .is_some_and(|card| !card.location.is_in_play()),

            Condition::OwnersTurn => state.current_turn == owner,
            Condition::OpponentsTurn => state.current_turn != owner,

            Condition::EventByOpponent => ctx.event.is_some_and(|e| e.acting_player() != owner),
            Condition::EventTargetsOwner => ctx.event.is_some_and(|e| e.player == owner),
            Condition::EventSourceIsNotThis => {
                ctx.event.is_some_and(|e| e.source.is_none() || e.source != ctx.card)
            }
            Condition::EventCardType(card_type) => ctx.event.is_some_and(|e| {
                e.card_type
                    .or_else(|| ctx.event_card().map(|c| c.card_type))
                    == Some(*card_type)
            }),
            Condition::EventCardName(name) => ctx.event_card().is_some_and(|c| c.name == *name),
            Condition::EventCardIsScaleToken => ctx
                .event
                .and_then(|e| e.subject)
                .is_some_and(|id| state.is_scale_token(id)),
            Condition::EventCardUnaffordable => ctx
                .event_card()
                .is_some_and(|c| c.required_scale > state.player(owner).scale),
            Condition::EventAmountPositive => {
                ctx.event.and_then(|e| e.amount).is_some_and(|a| a > 0)
            }
            Condition::EventAmountNegative => {
                ctx.event.and_then(|e| e.amount).is_some_and(|a| a < 0)
            }

            Condition::All(conditions) => conditions.iter().all(|c| Self::evaluate(c, ctx)),
            Condition::Any(conditions) => conditions.iter().any(|c| Self::evaluate(c, ctx)),
            Condition::Not(inner) => !Self::evaluate(inner, ctx),
            Condition::Always => true,
            Condition::Never => false,
        }
    }
}

/// Temp key recording a player's last consciousness reserve delta.
#[must_use]
pub fn last_consciousness_key(player: PlayerId) -> String {
    format!("{}_last_consciousness_change", player.index())
}

/// Whether the card is somewhere a condition on it still makes sense.
#[must_use]
pub fn is_addressable(location: Location) -> bool {
    !matches!(location, Location::Removed | Location::Deck)
}
