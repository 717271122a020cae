//! Game event values.
//!
//! A `GameEvent` is what the dispatcher broadcasts: a kind, the player it
//! is about (the perspective every `_OWNER` / `_OPPONENT` scope is relative
//! to) and whatever payload the emitting handler knows.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::kind::TriggerKind;
use crate::cards::CardType;
use crate::core::{InstanceId, PlayerId};
use crate::zones::Pile;

/// A game event with contextual data.
///
/// ## Event Data
///
/// - `player`: perspective player
/// - `actor`: player who performed the action, when different from
///   `player` (the card player for play events)
/// - `subject`: the card the event is about
/// - `source`: the card whose effect caused the event
/// - `amount`: signed delta for resource and durability events
/// - `card_type`, `from`, `to`: movement payload
/// - `exposed`: cards revealed by the causing effect
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: TriggerKind,
    pub player: PlayerId,
    pub actor: Option<PlayerId>,
    pub subject: Option<InstanceId>,
    pub source: Option<InstanceId>,
    pub amount: Option<i32>,
    pub card_type: Option<CardType>,
    pub from: Option<Pile>,
    pub to: Option<Pile>,
    pub exposed: SmallVec<[InstanceId; 2]>,
}

impl GameEvent {
    /// Create an event with just a kind and perspective.
    #[must_use]
    pub fn new(kind: TriggerKind, player: PlayerId) -> Self {
        Self {
            kind,
            player,
            actor: None,
            subject: None,
            source: None,
            amount: None,
            card_type: None,
            from: None,
            to: None,
            exposed: SmallVec::new(),
        }
    }

    /// Same payload under a different kind and perspective.
    #[must_use]
    pub fn rekind(&self, kind: TriggerKind, player: PlayerId) -> Self {
        Self {
            kind,
            player,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: InstanceId) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<InstanceId>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_actor(mut self, actor: PlayerId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_card_type(mut self, card_type: CardType) -> Self {
        self.card_type = Some(card_type);
        self
    }

    #[must_use]
    pub fn with_move(mut self, from: Option<Pile>, to: Pile) -> Self {
        self.from = from;
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn with_exposed(mut self, cards: impl IntoIterator<Item = InstanceId>) -> Self {
        self.exposed.extend(cards);
        self
    }

    /// Player who acted, defaulting to the perspective player.
    #[must_use]
    pub fn acting_player(&self) -> PlayerId {
        self.actor.unwrap_or(self.player)
    }

    // === Constructors ===

    /// A turn boundary event for the player whose turn it is.
    #[must_use]
    pub fn turn(kind: TriggerKind, current: PlayerId) -> Self {
        Self::new(kind, current)
    }

    /// An event about one card, from its owner's perspective.
    #[must_use]
    pub fn card(kind: TriggerKind, owner: PlayerId, card: InstanceId) -> Self {
        Self::new(kind, owner).with_subject(card)
    }

    /// Outcome event addressed to the card whose effect just ran.
    #[must_use]
    pub fn process_outcome(success: bool, owner: PlayerId, source: InstanceId) -> Self {
        let kind = if success {
            TriggerKind::SuccessProcess
        } else {
            TriggerKind::FailedProcess
        };
        Self::card(kind, owner, source).with_source(Some(source))
    }
}
