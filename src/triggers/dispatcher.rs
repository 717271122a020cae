//! Trigger dispatch.
//!
//! `Dispatcher::dispatch` turns one event into the ordered list of bound
//! reactions it causes. Matching is done against the current state, so a
//! card moved out of play by an earlier effect no longer reacts.
//!
//! ## Enumeration Order
//!
//! The current-turn player's cards come first, then the opponent's. Within
//! a player: ideology slot, field (left to right), resolving events, then
//! hand cards flagged `reacts_from_hand`. Within a card, descriptors keep
//! their declared order.
//!
//! ## Binding
//!
//! Each descriptor's condition is checked and its reference expressions are
//! resolved relative to the reacting card. A descriptor that fails either
//! step is dropped, and any `on_failure_of_previous` descriptors attached to
//! it are bound in its place. When it binds, those fallbacks travel with it
//! and are only enqueued if it does not succeed.

use log::debug;
use smallvec::SmallVec;

use super::condition::{is_addressable, ConditionContext, ConditionEvaluator};
use super::event::GameEvent;
use super::kind::{Scope, TriggerKind};
use crate::cards::CardType;
use crate::core::{GameState, InstanceId, PlayerId};
use crate::effects::{
    AmountSource, BoundEffect, CardRef, DurabilitySource, EffectArgs, EffectDescriptor, PlayerRef,
    PlayerSet,
};

/// Reactions produced by one event. Most events wake at most a few cards.
pub type Reactions = SmallVec<[BoundEffect; 4]>;

/// Who is reacting, and to what.
struct Origin<'e> {
    owner: PlayerId,
    card: InstanceId,
    event: &'e GameEvent,
}

/// Matches events against card trigger tables.
pub struct Dispatcher;

impl Dispatcher {
    /// Every reaction to `event`, bound and in enqueue order.
    pub fn dispatch(state: &mut GameState, event: &GameEvent) -> Reactions {
        let mut reactions = Reactions::new();
        for card in Self::candidates(state, event) {
            let Some(instance) = state.card(card) else {
                continue;
            };
            let owner = instance.owner;
            let descriptors = match state.database.get(&instance.name) {
                Some(template) => template.effects_for(event.kind).to_vec(),
                None => continue,
            };
            if descriptors.is_empty() {
                continue;
            }
            debug!("{card} reacts to {} ({} effects)", event.kind, descriptors.len());
            let origin = Origin { owner, card, event };
            Self::bind_list(state, &origin, &descriptors, &mut reactions);
        }
        reactions
    }

    /// Bind a descriptor chained after `parent`, from the point of view of
    /// the parent's source card.
    pub fn bind_chained(
        state: &mut GameState,
        parent: &BoundEffect,
        descriptor: &EffectDescriptor,
    ) -> Option<BoundEffect> {
        let card = parent.source?;
        let owner = state.card(card)?.owner;
        let kind = parent.trigger.unwrap_or(TriggerKind::SuccessProcess);
        let event = GameEvent::card(kind, owner, card).with_source(Some(card));
        let origin = Origin {
            owner,
            card,
            event: &event,
        };
        Self::bind_one(state, &origin, descriptor)
    }

    /// Cards whose trigger tables are consulted for this event.
    fn candidates(state: &GameState, event: &GameEvent) -> Vec<InstanceId> {
        let scope = event.kind.scope();
        if scope == Scope::Subject {
            return event
                .subject
                .filter(|&id| state.card(id).is_some_and(|c| is_addressable(c.location)))
                .into_iter()
                .collect();
        }

        let current = state.current_turn;
        let mut cards = Vec::new();
        for player in [current, current.opponent()] {
            let matches_scope = match scope {
                Scope::Owner => player == event.player,
                Scope::Opponent => player != event.player,
                _ => true,
            };
            if !matches_scope {
                continue;
            }
            let seat = state.player(player);
            cards.extend(seat.ideology);
            cards.extend(seat.field.iter().copied());
            cards.extend(seat.resolving.iter().copied());
            cards.extend(seat.hand.iter().copied().filter(|&id| {
                state
                    .template_of(id)
                    .is_some_and(|template| template.reacts_from_hand)
            }));
        }
        if event.kind.is_play_action() {
            cards.retain(|&id| Some(id) != event.subject);
        }
        cards
    }

    /// Bind one card's descriptor list, grouping fallbacks with their
    /// primary descriptor.
    fn bind_list(
        state: &mut GameState,
        origin: &Origin,
        descriptors: &[EffectDescriptor],
        out: &mut Reactions,
    ) {
        let mut groups: Vec<(&EffectDescriptor, Vec<&EffectDescriptor>)> = Vec::new();
        for descriptor in descriptors {
            match groups.last_mut() {
                Some((_, fallbacks)) if descriptor.on_failure_of_previous => {
                    fallbacks.push(descriptor)
                }
                _ => groups.push((descriptor, Vec::new())),
            }
        }

        for (primary, fallbacks) in groups {
            match Self::bind_one(state, origin, primary) {
                Some(bound) => {
                    let bound_fallbacks = fallbacks
                        .into_iter()
                        .filter_map(|f| Self::bind_one(state, origin, f))
                        .collect();
                    out.push(bound.with_fallbacks(bound_fallbacks));
                }
                None => out.extend(
                    fallbacks
                        .into_iter()
                        .filter_map(|f| Self::bind_one(state, origin, f)),
                ),
            }
        }
    }

    /// Check the condition and bind the arguments of one descriptor.
    fn bind_one(
        state: &mut GameState,
        origin: &Origin,
        descriptor: &EffectDescriptor,
    ) -> Option<BoundEffect> {
        if let Some(condition) = &descriptor.condition {
            let ctx = ConditionContext::new(state, origin.owner)
                .with_card(Some(origin.card))
                .with_event(Some(origin.event));
            if !ConditionEvaluator::evaluate(condition, &ctx) {
                debug!("{}: condition not met for {}", origin.card, descriptor.effect_type);
                return None;
            }
        }
        let Some(args) = bind_args(state, origin, &descriptor.args) else {
            debug!("{}: unresolvable reference in {}", origin.card, descriptor.effect_type);
            return None;
        };
        Some(
            BoundEffect::new(descriptor.effect_type, args)
                .with_source(Some(origin.card))
                .with_trigger(origin.event.kind),
        )
    }
}

/// Resolve every reference expression in `args` relative to `origin`.
///
/// Returns `None` when a reference names something that does not exist.
fn bind_args(state: &mut GameState, origin: &Origin, args: &EffectArgs) -> Option<EffectArgs> {
    let mut bound = args.clone();

    if let Some(player) = &args.player_id {
        bound.player_id = Some(PlayerRef::Player(resolve_player(state, origin, player)?));
    }
    if let Some(player) = &args.target_player_id {
        bound.target_player_id = Some(PlayerRef::Player(resolve_player(state, origin, player)?));
    }
    if let Some(set) = &args.player_ids {
        let owner = origin.owner;
        let players = match set {
            PlayerSet::Owner => vec![owner],
            PlayerSet::Opponent => vec![owner.opponent()],
            PlayerSet::SelfAndOpponent => vec![owner, owner.opponent()],
            PlayerSet::Players(ids) => ids.clone(),
        };
        bound.player_ids = Some(PlayerSet::Players(players));
    }
    if let Some(card) = &args.card_id {
        bound.card_id = match card {
            CardRef::DrawFromDeck => Some(CardRef::DrawFromDeck),
            other => Some(CardRef::Id(resolve_card(state, origin, other)?)),
        };
    }
    match &args.amount_from {
        Some(AmountSource::Temp(_)) | None => {}
        Some(source) => {
            let amount = resolve_amount(state, origin, source)?;
            bound.amount = Some(if args.negate { -amount } else { amount });
            bound.amount_from = None;
            bound.negate = false;
        }
    }
    if let Some(source) = &args.durability_from {
        bound.initial_durability = Some(resolve_durability(state, origin, source));
        bound.durability_from = None;
    }
    if let Some(next) = &args.next_effect {
        let next_args = bind_args(state, origin, &next.args)?;
        bound.next_effect = Some(Box::new(EffectDescriptor {
            args: next_args,
            ..(**next).clone()
        }));
    }
    Some(bound)
}

fn resolve_player(state: &mut GameState, origin: &Origin, player: &PlayerRef) -> Option<PlayerId> {
    match player {
        PlayerRef::Owner => Some(origin.owner),
        PlayerRef::Opponent => Some(origin.owner.opponent()),
        PlayerRef::Random => Some(if state.rng.gen_bool(0.5) {
            origin.owner
        } else {
            origin.owner.opponent()
        }),
        PlayerRef::Source => origin
            .event
            .source
            .and_then(|id| state.card(id))
            .map(|card| card.owner),
        PlayerRef::Player(id) => Some(*id),
    }
}

fn resolve_card(state: &GameState, origin: &Origin, card: &CardRef) -> Option<InstanceId> {
    let owner = origin.owner;
    match card {
        CardRef::This => Some(origin.card),
        CardRef::Target => origin.event.subject,
        CardRef::Source => origin.event.source,
        CardRef::Exposed => origin
            .event
            .exposed
            .first()
            .or_else(|| state.exposed_cards.first())
            .copied(),
        CardRef::SelfIdeology => state.player(owner).ideology,
        CardRef::OpponentIdeology => state.player(owner.opponent()).ideology,
        CardRef::SelfScaleToken => state.scale_token_on_field(owner),
        CardRef::Front => {
            let index = state
                .player(owner)
                .field
                .iter()
                .position(|&id| id == origin.card)?;
            state.player(owner.opponent()).field.get(index).copied()
        }
        CardRef::LeftOpponent => state.player(owner.opponent()).field.first().copied(),
        CardRef::DrawFromDeck => None,
        CardRef::Id(id) => Some(*id),
    }
}

fn resolve_amount(state: &GameState, origin: &Origin, source: &AmountSource) -> Option<i32> {
    let owner = origin.owner;
    let seat = state.player(owner);
    let opponent = state.player(owner.opponent());
    let amount = match source {
        AmountSource::SelfDurability => state.card(origin.card)?.current_durability,
        AmountSource::TriggerAmount => origin.event.amount?,
        AmountSource::TriggerDamage => (-origin.event.amount?).max(0),
        AmountSource::FieldWealthCount => state.field_wealth(owner).len() as i32,
        AmountSource::OpponentFieldWealthCount => state.field_wealth(owner.opponent()).len() as i32,
        AmountSource::DiscardCount => seat.discard.len() as i32,
        AmountSource::HandCount => seat.hand.len() as i32,
        AmountSource::ScaleTokenDurability => {
            let token = state.scale_token_on_field(owner)?;
            state.card(token)?.current_durability
        }
        AmountSource::FieldLimitDiff => seat.field_limit - opponent.field_limit,
        AmountSource::CardsPlayedThisTurn => seat.cards_played_this_turn as i32,
        AmountSource::Temp(key) => state.temp_value(key).unwrap_or(0),
    };
    Some(amount)
}

fn resolve_durability(state: &GameState, origin: &Origin, source: &DurabilitySource) -> i32 {
    let owner = origin.owner;
    let scale = state.player(owner).scale;
    match source {
        DurabilitySource::TriggerAmount => origin.event.amount.unwrap_or(0).max(1),
        DurabilitySource::TriggerDamage => (-origin.event.amount.unwrap_or(0)).max(1),
        DurabilitySource::Scale => scale.max(1),
        DurabilitySource::ScalePercentage(pct) => (scale * pct / 100).max(1),
        DurabilitySource::FieldWealthCountPlusOne => state.field_wealth(owner).len() as i32 + 1,
        DurabilitySource::FieldWealthTotal => state
            .cards_of_type(&state.player(owner).field, CardType::Wealth)
            .iter()
            .filter_map(|&id| state.card(id))
            .map(|card| card.current_durability)
            .sum(),
    }
}
