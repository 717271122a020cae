//! Effect resolution - executing bound effects on game state.
//!
//! `EffectResolver::resolve` runs exactly one queued effect. Handlers
//! mutate the state directly and collect what should happen next in a
//! [`Resolution`]: reactions to the events they emitted, follow-up effects,
//! and at most one input request. The processor appends those entries to
//! the queue tail.
//!
//! A target that no longer exists is never a fault: the handler returns
//! `Failed` or `Skipped` and the queue moves on.

use log::debug;

use super::args::{CardRef, EffectArgs, AmountSource};
use super::composite;
use super::correction::ParameterCorrection;
use super::effect::{BoundEffect, EffectKind};
use super::reserve;
use crate::cards::CardType;
use crate::core::{AnimationCue, GameState, InstanceId, PlayerId, SkipRegistration};
use crate::stack::{AwaitingInput, QueueEntry};
use crate::triggers::{Dispatcher, GameEvent, TriggerKind};
use crate::zones::{Pile, ZonePosition};

/// Result of resolving an effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult {
    /// Effect resolved successfully.
    Success,
    /// Effect failed (e.g., invalid target).
    Failed(String),
    /// Effect had nothing to do (e.g., empty deck).
    Skipped,
}

impl ResolveResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ResolveResult::Success)
    }
}

/// Outcome of one effect execution.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub result: ResolveResult,
    /// Entries to append to the queue, in order.
    pub entries: Vec<QueueEntry>,
    pub input: Option<AwaitingInput>,
}

impl Resolution {
    #[must_use]
    pub fn success() -> Self {
        Self {
            result: ResolveResult::Success,
            entries: Vec::new(),
            input: None,
        }
    }

    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            result: ResolveResult::Failed(reason.into()),
            ..Self::success()
        }
    }

    #[must_use]
    pub fn skipped() -> Self {
        Self {
            result: ResolveResult::Skipped,
            ..Self::success()
        }
    }

    #[must_use]
    pub fn awaiting(input: AwaitingInput) -> Self {
        Self {
            input: Some(input),
            ..Self::success()
        }
    }

    /// Broadcast `event` now and keep its reactions.
    pub fn emit(&mut self, state: &mut GameState, event: GameEvent) {
        let reactions = Dispatcher::dispatch(state, &event);
        self.entries
            .extend(reactions.into_iter().map(QueueEntry::Effect));
    }

    /// Queue a follow-up effect.
    pub fn push(&mut self, effect: BoundEffect) {
        self.entries.push(QueueEntry::Effect(effect));
    }

    /// Mark the resolution failed, keeping what was collected so far.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.result = ResolveResult::Failed(reason.into());
    }

    /// Emit SUCCESS_PROCESS or FAILED_PROCESS to the source card.
    pub fn report(&mut self, state: &mut GameState, success: bool, source: Option<InstanceId>) {
        let Some(source) = source else {
            return;
        };
        let Some(owner) = state.card(source).map(|card| card.owner) else {
            return;
        };
        self.emit(state, GameEvent::process_outcome(success, owner, source));
    }

    /// Fail with FAILED_PROCESS sent to the source card.
    #[must_use]
    pub fn failed_process(state: &mut GameState, source: Option<InstanceId>, reason: &str) -> Self {
        let mut res = Self::failed(reason);
        res.report(state, false, source);
        res
    }
}

/// Resolves bound effects on game state.
pub struct EffectResolver;

impl EffectResolver {
    /// Execute one effect.
    pub fn resolve(state: &mut GameState, effect: &BoundEffect) -> Resolution {
        use EffectKind::*;
        let mut resolution = match effect.kind {
            PlayerAction => player_action(state, effect),
            DrawCard => draw_card(state, effect),
            MoveCard => move_card_effect(state, effect),
            AddCardToGame => add_card_to_game(state, effect),
            RemoveCardFromGame => remove_card(state, effect),
            ModifyCardDurability => modify_card_durability(state, effect),
            ModifyCardRequiredScale => modify_required_scale(state, effect),
            ModifyConsciousness => modify_resource(state, effect, Meter::Consciousness, false),
            ModifyScale => modify_resource(state, effect, Meter::Scale, false),
            SetConsciousness => modify_resource(state, effect, Meter::Consciousness, true),
            SetScale => modify_resource(state, effect, Meter::Scale, true),
            ModifyFieldLimit => modify_field_limit(state, effect),

            ModifyConsciousnessReserve => reserve::consciousness(state, effect),
            ModifyScaleReserve => reserve::scale(state, effect),
            ModifyCardDurabilityReserve => reserve::card_durability(state, effect),
            AddModifyParameterCorrection => add_correction(state, effect),

            SkipEffect => skip_effect(state, effect),

            ProcessCardOperation => composite::card_operation(state, effect),
            ProcessDealDamageToAllWealth => composite::deal_damage_to_all_wealth(state, effect),
            ProcessAllWealthBoost => composite::all_wealth_boost(state, effect),
            ProcessChooseAndDiscardIdeology => composite::choose_and_discard_ideology(state, effect),
            ProcessChooseAndDiscardIdeologyResolved => {
                composite::discard_chosen_ideology(state, effect)
            }
            ProcessDiscardAllHandWealthCardsAndDraw => {
                composite::replace_hand_wealth(state, effect, Pile::Discard)
            }
            ProcessMoveHandWealthToDeckAndDraw => {
                composite::replace_hand_wealth(state, effect, Pile::Deck)
            }
            ProcessExposeCardByType => composite::expose_card_by_type(state, effect),
            ProcessDiscardAllIdeologyFromHandAndDeck => {
                composite::discard_all_ideology(state, effect)
            }
            ProcessSetAllScaleToZeroAndReduceConsciousness => {
                composite::scale_to_zero_and_reduce_consciousness(state, effect)
            }
            ProcessMoneyCardPlacementEffect => composite::merge_scale_token(state, effect),
            ProcessMoneyCardTurnStartEffect => composite::cash_in_scale_token(state, effect),
            ProcessDiscardAllHandIdeologyAndAddMoney => {
                composite::trade_ideology_for_token(state, effect)
            }
            ProcessModifyMoneyDurabilityRandom => composite::gamble_token_durability(state, effect),
            ProcessReduceMoneyDurabilityAndGainScale => {
                composite::ask_token_conversion(state, effect)
            }
            ProcessReduceMoneyDurabilityAndGainScaleResolved => {
                composite::convert_token_to_scale(state, effect)
            }
            ProcessAddMoneyTokenBasedOnCardsPlayed => {
                composite::token_for_cards_played(state, effect)
            }
            ProcessMoneyDurabilityBasedCountModifyCardDurability => {
                composite::spend_token_on_random_wealth(state, effect)
            }
            ProcessAddCardsBasedOnDiscardedCount => composite::exchange_hand_cards(state, effect),
            ProcessAddChoiceCardToHand => composite::choose_card_to_add(state, effect),
            ProcessChooseAndMoveCardFromPile => composite::choose_card_from_pile(state, effect),
            ProcessChooseAndModifyDurabilityToWealth => {
                composite::choose_wealth(state, effect, ProcessChooseAndModifyDurabilityToWealthResolved)
            }
            ProcessChooseAndModifyDurabilityToWealthResolved => {
                composite::modify_chosen_wealth(state, effect)
            }
            ProcessChooseAndBounceToWealth => {
                composite::choose_wealth(state, effect, ProcessChooseAndBounceToWealthResolved)
            }
            ProcessChooseAndBounceToWealthResolved => composite::bounce_chosen_wealth(state, effect),
            ProcessReturnLargestRequiredScaleCardToDeck => {
                composite::return_largest_to_deck(state, effect)
            }
            ProcessDrawRandomCardAndModifyRequiredScale => {
                composite::draw_discounted(state, effect)
            }
            ProcessCounterAttack => composite::counter_attack(state, effect),
            ProcessAddCardConditional => composite::add_card_conditional(state, effect),
            ProcessAddCardConditionalOnDeckCount => composite::add_card_by_deck_count(state, effect),
        };

        if effect.kind.is_composite()
            && resolution.input.is_none()
            && !matches!(resolution.result, ResolveResult::Failed(_))
        {
            if let Some(next) = &effect.args.next_effect {
                match Dispatcher::bind_chained(state, effect, next) {
                    Some(bound) => resolution.push(bound),
                    None => debug!("chained {} dropped", next.effect_type),
                }
            }
        }

        match &resolution.result {
            ResolveResult::Success => {
                if effect.source.is_some() {
                    state.push_animation(AnimationCue::new(effect.kind.to_string(), effect.source));
                }
            }
            ResolveResult::Failed(reason) => debug!("{} failed: {reason}", effect.kind),
            ResolveResult::Skipped => debug!("{} skipped", effect.kind),
        }
        resolution
    }
}

// === Shared Helpers ===

/// The effect's player, falling back to the source card's owner.
pub(crate) fn acting_player(state: &GameState, effect: &BoundEffect) -> Option<PlayerId> {
    effect
        .args
        .player()
        .or_else(|| effect.source.and_then(|id| state.card(id)).map(|c| c.owner))
}

/// Players an effect applies to: `player_ids`, else the acting player.
pub(crate) fn target_players(state: &GameState, effect: &BoundEffect) -> Vec<PlayerId> {
    let players = effect.args.players();
    if players.is_empty() {
        acting_player(state, effect).into_iter().collect()
    } else {
        players
    }
}

/// Amount at execution time, reading temp values where requested.
pub(crate) fn exec_amount(state: &GameState, args: &EffectArgs) -> Option<i32> {
    match &args.amount_from {
        Some(AmountSource::Temp(key)) => {
            let value = state.temp_value(key).unwrap_or(0);
            Some(if args.negate { -value } else { value })
        }
        _ => args.amount,
    }
}

/// A card movement request.
#[derive(Clone, Debug)]
pub(crate) struct CardMove {
    pub card: InstanceId,
    pub to: Pile,
    /// New holder; `None` keeps the current one.
    pub to_player: Option<PlayerId>,
    pub position: Option<ZonePosition>,
    pub maintain: bool,
    pub source: Option<InstanceId>,
}

impl CardMove {
    pub fn new(card: InstanceId, to: Pile) -> Self {
        Self {
            card,
            to,
            to_player: None,
            position: None,
            maintain: false,
            source: None,
        }
    }

    pub fn to_player(mut self, player: Option<PlayerId>) -> Self {
        self.to_player = player;
        self
    }

    pub fn at(mut self, position: Option<ZonePosition>) -> Self {
        self.position = position;
        self
    }

    pub fn maintaining(mut self, maintain: bool) -> Self {
        self.maintain = maintain;
        self
    }

    pub fn by(mut self, source: Option<InstanceId>) -> Self {
        self.source = source;
        self
    }
}

/// Move a card out of its pile and into the destination, emitting the
/// arrival events. Returns the pile it actually landed in.
pub(crate) fn move_card(state: &mut GameState, res: &mut Resolution, mv: CardMove) -> Option<Pile> {
    let (holder, from, _) = state.detach(mv.card)?;
    let player = mv.to_player.unwrap_or(holder);
    Some(place(state, res, &mv, Some(from), player))
}

/// Put a card that is in no pile into the destination.
pub(crate) fn place_new(
    state: &mut GameState,
    res: &mut Resolution,
    mv: CardMove,
    player: PlayerId,
) -> Pile {
    place(state, res, &mv, None, player)
}

fn place(
    state: &mut GameState,
    res: &mut Resolution,
    mv: &CardMove,
    from: Option<Pile>,
    player: PlayerId,
) -> Pile {
    let card_type = state.card(mv.card).map(|c| c.card_type);
    let mut to = match (mv.to, card_type) {
        (Pile::Field, Some(CardType::Ideology)) => Pile::Ideology,
        (Pile::Ideology, Some(t)) if t != CardType::Ideology => Pile::Field,
        (pile, _) => pile,
    };
    if to == Pile::Hand && !state.player(player).hand_has_room() {
        debug!("hand of {player} is full, {} goes to discard", mv.card);
        to = Pile::Discard;
    }

    let keeps_state = mv.maintain || (to == Pile::Hand && state.is_scale_token(mv.card));
    if matches!(to, Pile::Hand | Pile::Deck) && !keeps_state {
        if let Some(template) = state.template_of(mv.card).cloned() {
            if let Some(card) = state.card_mut(mv.card) {
                card.reset_to_template(&template);
            }
        }
    }

    let position = mv.position.unwrap_or_else(|| to.default_position());
    let displaced = state.insert_into_pile(mv.card, player, to, position);
    if let Some(previous) = displaced {
        announce(state, res, previous, Some(Pile::Ideology), Pile::Discard, mv.source);
    }
    announce(state, res, mv.card, from, to, mv.source);
    to
}

/// Emit the movement events for a card that just arrived in `to`.
fn announce(
    state: &mut GameState,
    res: &mut Resolution,
    card: InstanceId,
    from: Option<Pile>,
    to: Pile,
    source: Option<InstanceId>,
) {
    use TriggerKind::*;
    let Some(instance) = state.card(card) else {
        return;
    };
    let owner = instance.owner;
    let base = GameEvent::card(CardPlaced, owner, card)
        .with_card_type(instance.card_type)
        .with_move(from, to)
        .with_source(source);

    let mut kinds: Vec<TriggerKind> = Vec::new();
    match to {
        Pile::Field | Pile::Ideology => {
            kinds.extend([CardPlacedThis, CardPlaced, CardPlacedOwner, CardPlacedOpponent]);
        }
        Pile::Hand => {
            if from == Some(Pile::Deck) {
                kinds.extend([CardDrawnThis, CardDrawn, CardDrawnOwner]);
            }
            kinds.extend([CardAddedToHandThis, CardAddedToHand, CardAddedToHandOwner]);
            if from == Some(Pile::Field) {
                kinds.extend([CardBouncedThis, CardBouncedOwner]);
            }
        }
        Pile::Discard if from != Some(Pile::Discard) => {
            kinds.extend([CardDiscardedThis, CardDiscarded, CardDiscardedOwner]);
        }
        _ => {}
    }
    for kind in kinds {
        res.emit(state, base.rekind(kind, owner));
    }
}

/// Change an in-play card's durability directly.
///
/// Emits DAMAGE_THIS or BOOST_THIS and, for wealth reaching zero, the
/// durability-zero events followed by the move to discard. Returns the
/// applied delta, or `None` when the card is not in play.
pub(crate) fn change_durability(
    state: &mut GameState,
    res: &mut Resolution,
    card: InstanceId,
    delta: i32,
    source: Option<InstanceId>,
) -> Option<i32> {
    let instance = state.card_mut(card)?;
    if !instance.location.is_in_play() {
        return None;
    }
    let before = instance.current_durability;
    let after = (before + delta).max(0);
    instance.current_durability = after;
    let owner = instance.owner;
    let card_type = instance.card_type;
    let applied = after - before;

    let event = GameEvent::card(TriggerKind::DamageThis, owner, card)
        .with_amount(applied)
        .with_card_type(card_type)
        .with_source(source);
    if applied < 0 {
        res.emit(state, event.clone());
    } else if applied > 0 {
        res.emit(state, event.rekind(TriggerKind::BoostThis, owner));
    }

    if after == 0 && before > 0 && card_type == CardType::Wealth {
        for kind in [
            TriggerKind::WealthDurabilityZeroThis,
            TriggerKind::WealthDurabilityZero,
            TriggerKind::WealthDurabilityZeroOwner,
            TriggerKind::WealthDurabilityZeroOpponent,
        ] {
            res.emit(state, event.rekind(kind, owner));
        }
        move_card(state, res, CardMove::new(card, Pile::Discard).by(source));
    }
    Some(applied)
}

// === Primitive Handlers ===

fn player_action(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let (Some(player), Some(card)) = (effect.args.player(), effect.args.card()) else {
        return Resolution::failed("player action without player or card");
    };
    let Some(instance) = state.card(card) else {
        return Resolution::failed(format!("{card} does not exist"));
    };
    let card_type = instance.card_type;
    let name = instance.name.clone();
    let persists = state
        .template_of(card)
        .is_some_and(|template| template.persists_after_play);

    let mut res = Resolution::success();
    let player_name = state.player(player).name.clone();
    state.log_event(format!("{player_name}が「{name}」をプレイ"));

    match card_type {
        CardType::Event => {
            move_card(state, &mut res, CardMove::new(card, Pile::Resolving).to_player(Some(player)));
            res.emit(
                state,
                GameEvent::card(TriggerKind::PlayEventThis, player, card).with_card_type(card_type),
            );
            if !persists {
                move_card(state, &mut res, CardMove::new(card, Pile::Discard));
            }
            for kind in [
                TriggerKind::PlayEvent,
                TriggerKind::PlayEventOwner,
                TriggerKind::PlayEventOpponent,
            ] {
                res.emit(
                    state,
                    GameEvent::card(kind, player, card)
                        .with_actor(player)
                        .with_card_type(card_type),
                );
            }
        }
        CardType::Wealth => {
            move_card(state, &mut res, CardMove::new(card, Pile::Field).to_player(Some(player)));
        }
        CardType::Ideology => {
            move_card(state, &mut res, CardMove::new(card, Pile::Ideology).to_player(Some(player)));
        }
    }

    let seat = state.player_mut(player);
    seat.cards_played_this_turn += 1;
    seat.last_played_card_id = Some(card);

    for kind in [
        TriggerKind::PlayerPlayCardAction,
        TriggerKind::PlayerPlayCardActionOwner,
        TriggerKind::PlayerPlayCardActionOpponent,
    ] {
        res.emit(
            state,
            GameEvent::card(kind, player, card)
                .with_actor(player)
                .with_card_type(card_type),
        );
    }
    state.push_animation(AnimationCue::new("PLAYER_ACTION", Some(card)));
    res
}

fn draw_card(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let Some(player) = acting_player(state, effect) else {
        return Resolution::failed("draw without player");
    };
    let count = effect.args.count.unwrap_or(1);
    let mut res = Resolution::success();
    let mut drawn = 0;
    for _ in 0..count {
        let Some(card) = state.deck_top(player) else {
            debug!("{player} draws from an empty deck");
            break;
        };
        move_card(state, &mut res, CardMove::new(card, Pile::Hand).by(effect.source));
        drawn += 1;
    }
    if drawn == 0 {
        res.result = ResolveResult::Skipped;
    }
    res
}

fn move_card_effect(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let card = match args.card_id {
        Some(CardRef::DrawFromDeck) => acting_player(state, effect).and_then(|p| state.deck_top(p)),
        _ => args.card(),
    };
    let Some(card) = card else {
        return Resolution::skipped();
    };
    let Some((_, pile)) = state.locate(card) else {
        return Resolution::failed(format!("{card} is not in any pile"));
    };
    if args.source_pile.is_some_and(|expected| expected != pile) {
        return Resolution::failed(format!("{card} is no longer in {:?}", args.source_pile));
    }
    let Some(to) = args.destination_pile else {
        return Resolution::failed("move without destination");
    };

    let mut res = Resolution::success();
    let mv = CardMove::new(card, to)
        .to_player(args.target_player())
        .at(args.position)
        .maintaining(args.maintain)
        .by(effect.source);
    move_card(state, &mut res, mv);
    res
}

fn add_card_to_game(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let (Some(player), Some(name), Some(to)) = (
        args.target_player().or_else(|| acting_player(state, effect)),
        args.card_template_name.as_deref(),
        args.destination_pile,
    ) else {
        return Resolution::failed("add card without player, template or destination");
    };

    let mut res = Resolution::success();
    let mut created = 0;
    for _ in 0..args.count.unwrap_or(1) {
        if args.respect_field_limit && to == Pile::Field {
            let seat = state.player(player);
            if state.field_wealth(player).len() as i32 >= seat.field_limit {
                debug!("field of {player} is full, not creating {name}");
                continue;
            }
        }
        let Some(card) = state.create_instance(name, player) else {
            return Resolution::failed(format!("unknown template {name}"));
        };
        if let (Some(durability), Some(instance)) = (args.initial_durability, state.card_mut(card)) {
            instance.current_durability = durability;
        }
        let mv = CardMove::new(card, to).at(args.position).by(effect.source);
        // Fresh instances already match their template.
        place_new(state, &mut res, mv.maintaining(true), player);
        created += 1;
    }
    if created == 0 {
        res.result = ResolveResult::Skipped;
    }
    res
}

fn remove_card(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    match effect.args.card() {
        Some(card) if state.remove_from_game(card) => Resolution::success(),
        Some(card) => Resolution::failed(format!("{card} is not in any pile")),
        None => Resolution::failed("remove without card"),
    }
}

fn modify_card_durability(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let (Some(card), Some(delta)) = (effect.args.card(), exec_amount(state, &effect.args)) else {
        return Resolution::failed("durability change without card or amount");
    };
    let mut res = Resolution::success();
    if change_durability(state, &mut res, card, delta, effect.source).is_none() {
        res.fail(format!("{card} is not in play"));
    }
    res
}

fn modify_required_scale(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let (Some(card), Some(amount)) = (args.card(), exec_amount(state, args)) else {
        return Resolution::failed("required scale change without card or amount");
    };
    let floor = args.min_value.unwrap_or(0);
    match state.card_mut(card) {
        Some(instance) if instance.location == crate::cards::Location::Hand => {
            let value = if args.set_value {
                amount
            } else {
                instance.required_scale + amount
            };
            instance.required_scale = value.max(floor);
            Resolution::success()
        }
        _ => Resolution::failed(format!("{card} is not in a hand")),
    }
}

#[derive(Clone, Copy)]
enum Meter {
    Consciousness,
    Scale,
}

fn modify_resource(state: &mut GameState, effect: &BoundEffect, meter: Meter, set: bool) -> Resolution {
    let Some(amount) = exec_amount(state, &effect.args) else {
        return Resolution::failed("resource change without amount");
    };
    let players = target_players(state, effect);
    if players.is_empty() {
        return Resolution::failed("resource change without player");
    }
    for player in players {
        let seat = state.player_mut(player);
        let value = match meter {
            Meter::Consciousness => &mut seat.consciousness,
            Meter::Scale => &mut seat.scale,
        };
        *value = if set { amount.max(0) } else { *value + amount };
    }
    Resolution::success()
}

fn modify_field_limit(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let (Some(player), Some(amount)) = (acting_player(state, effect), exec_amount(state, &effect.args))
    else {
        return Resolution::failed("field limit change without player or amount");
    };
    let seat = state.player(player);
    let limit = seat.field_limit + amount;
    if amount < 0 && limit < seat.field.len() as i32 {
        return Resolution::failed_process(state, effect.source, "field limit below field size");
    }
    state.player_mut(player).field_limit = limit.max(0);
    let mut res = Resolution::success();
    if amount < 0 {
        res.report(state, true, effect.source);
    }
    res
}

fn add_correction(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let (Some(player), Some(target), Some(direction), Some(kind), Some(amount)) = (
        args.player(),
        args.correct_target,
        args.correct_direction,
        args.correct_type,
        exec_amount(state, args),
    ) else {
        return Resolution::failed("incomplete correction");
    };
    let injector = effect
        .source
        .and_then(|id| state.card(id))
        .map_or(player, |card| card.owner);
    let correction = ParameterCorrection::new(target, direction, kind, amount, injector)
        .with_source(effect.source)
        .with_condition(args.applies_if.clone());
    state.player_mut(player).corrections.push(correction);
    Resolution::success()
}

fn skip_effect(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let (Some(kind), Some(player)) = (effect.args.effect_type, effect.args.player()) else {
        return Resolution::failed("skip without kind or player");
    };
    state.skips.push(SkipRegistration { kind, player });
    Resolution::success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDatabase, CardTemplate, Location};
    use crate::core::RulesConfig;
    use crate::effects::EffectDescriptor;

    fn database() -> CardDatabase {
        CardDatabase::from_templates([
            CardTemplate::new("農場", CardType::Wealth).with_durability(3).with_required_scale(2),
            CardTemplate::new("マネー", CardType::Wealth).with_durability(1),
            CardTemplate::new("自由主義", CardType::Ideology),
            CardTemplate::new("保守主義", CardType::Ideology),
            CardTemplate::new("改革", CardType::Event),
        ])
        .unwrap()
    }

    fn state() -> GameState {
        GameState::new(database(), RulesConfig::default())
    }

    fn put(state: &mut GameState, name: &str, player: PlayerId, pile: Pile) -> InstanceId {
        let id = state.create_instance(name, player).unwrap();
        state.insert_into_pile(id, player, pile, ZonePosition::Bottom);
        id
    }

    fn run(state: &mut GameState, kind: EffectKind, args: EffectArgs) -> Resolution {
        EffectResolver::resolve(state, &BoundEffect::new(kind, args))
    }

    #[test]
    fn test_draw_card() {
        let mut state = state();
        let top = put(&mut state, "農場", PlayerId::FIRST, Pile::Deck);
        put(&mut state, "農場", PlayerId::FIRST, Pile::Deck);

        let res = run(&mut state, EffectKind::DrawCard, EffectArgs::new().with_player(PlayerId::FIRST));

        assert!(res.result.is_success());
        assert_eq!(state.player(PlayerId::FIRST).hand, vec![top]);
        assert_eq!(state.card(top).unwrap().location, Location::Hand);
        state.check_integrity().unwrap();
    }

    #[test]
    fn test_draw_from_empty_deck_is_skipped() {
        let mut state = state();
        let res = run(&mut state, EffectKind::DrawCard, EffectArgs::new().with_player(PlayerId::SECOND));
        assert_eq!(res.result, ResolveResult::Skipped);
    }

    #[test]
    fn test_full_hand_diverts_to_discard() {
        let mut state = state();
        for _ in 0..state.config.max_hand_size {
            put(&mut state, "農場", PlayerId::FIRST, Pile::Hand);
        }
        let top = put(&mut state, "農場", PlayerId::FIRST, Pile::Deck);

        run(&mut state, EffectKind::DrawCard, EffectArgs::new().with_player(PlayerId::FIRST));

        assert_eq!(state.player(PlayerId::FIRST).discard, vec![top]);
        assert_eq!(state.player(PlayerId::FIRST).hand.len(), state.config.max_hand_size);
    }

    #[test]
    fn test_move_to_hand_resets_unless_maintained() {
        let mut state = state();
        let farm = put(&mut state, "農場", PlayerId::FIRST, Pile::Field);
        state.card_mut(farm).unwrap().current_durability = 1;

        run(
            &mut state,
            EffectKind::MoveCard,
            EffectArgs::new().with_card(farm).with_destination(Pile::Hand),
        );
        assert_eq!(state.card(farm).unwrap().current_durability, 3);

        let money = put(&mut state, "マネー", PlayerId::FIRST, Pile::Field);
        state.card_mut(money).unwrap().current_durability = 9;
        run(
            &mut state,
            EffectKind::MoveCard,
            EffectArgs::new().with_card(money).with_destination(Pile::Hand),
        );
        assert_eq!(state.card(money).unwrap().current_durability, 9, "scale tokens keep value");
    }

    #[test]
    fn test_move_checks_source_pile() {
        let mut state = state();
        let farm = put(&mut state, "農場", PlayerId::FIRST, Pile::Hand);

        let res = run(
            &mut state,
            EffectKind::MoveCard,
            EffectArgs::new()
                .with_card(farm)
                .with_source_pile(Pile::Field)
                .with_destination(Pile::Discard),
        );

        assert!(!res.result.is_success());
        assert_eq!(state.card(farm).unwrap().location, Location::Hand);
    }

    #[test]
    fn test_move_to_other_player_transfers_ownership() {
        let mut state = state();
        let farm = put(&mut state, "農場", PlayerId::FIRST, Pile::Field);

        run(
            &mut state,
            EffectKind::MoveCard,
            EffectArgs::new()
                .with_card(farm)
                .with_target_player(PlayerId::SECOND)
                .with_destination(Pile::Field),
        );

        assert_eq!(state.card(farm).unwrap().owner, PlayerId::SECOND);
        assert_eq!(state.player(PlayerId::SECOND).field, vec![farm]);
        state.check_integrity().unwrap();
    }

    #[test]
    fn test_ideology_displacement() {
        let mut state = state();
        let old = put(&mut state, "自由主義", PlayerId::FIRST, Pile::Ideology);
        let new = put(&mut state, "保守主義", PlayerId::FIRST, Pile::Hand);

        run(
            &mut state,
            EffectKind::MoveCard,
            EffectArgs::new().with_card(new).with_destination(Pile::Ideology),
        );

        assert_eq!(state.player(PlayerId::FIRST).ideology, Some(new));
        assert_eq!(state.player(PlayerId::FIRST).discard, vec![old]);
        state.check_integrity().unwrap();
    }

    #[test]
    fn test_add_card_to_game() {
        let mut state = state();
        let res = run(
            &mut state,
            EffectKind::AddCardToGame,
            EffectArgs::new()
                .with_player(PlayerId::SECOND)
                .with_template("マネー")
                .with_destination(Pile::Field)
                .with_durability(6)
                .with_count(2),
        );

        assert!(res.result.is_success());
        let field = &state.player(PlayerId::SECOND).field;
        assert_eq!(field.len(), 2);
        assert_eq!(state.card(field[0]).unwrap().current_durability, 6);
        assert_eq!(state.effective_scale(PlayerId::SECOND), 12);
    }

    #[test]
    fn test_add_card_respects_field_limit() {
        let mut state = state();
        state.player_mut(PlayerId::FIRST).field_limit = 1;
        put(&mut state, "農場", PlayerId::FIRST, Pile::Field);
        let mut args = EffectArgs::new()
            .with_player(PlayerId::FIRST)
            .with_template("農場")
            .with_destination(Pile::Field);
        args.respect_field_limit = true;

        let res = run(&mut state, EffectKind::AddCardToGame, args);

        assert_eq!(res.result, ResolveResult::Skipped);
        assert_eq!(state.player(PlayerId::FIRST).field.len(), 1);
    }

    #[test]
    fn test_remove_card_from_game() {
        let mut state = state();
        let farm = put(&mut state, "農場", PlayerId::FIRST, Pile::Discard);

        run(&mut state, EffectKind::RemoveCardFromGame, EffectArgs::new().with_card(farm));

        assert_eq!(state.card(farm).unwrap().location, Location::Removed);
        assert!(state.player(PlayerId::FIRST).discard.is_empty());
        state.check_integrity().unwrap();
    }

    #[test]
    fn test_direct_durability_change() {
        let mut state = state();
        let farm = put(&mut state, "農場", PlayerId::FIRST, Pile::Field);

        run(
            &mut state,
            EffectKind::ModifyCardDurability,
            EffectArgs::new().with_card(farm).with_amount(-5),
        );

        assert_eq!(state.card(farm).unwrap().current_durability, 0);
        assert_eq!(state.player(PlayerId::FIRST).discard, vec![farm]);

        let hand_card = put(&mut state, "農場", PlayerId::FIRST, Pile::Hand);
        let res = run(
            &mut state,
            EffectKind::ModifyCardDurability,
            EffectArgs::new().with_card(hand_card).with_amount(-1),
        );
        assert!(!res.result.is_success(), "hand cards have no durability in play");
    }

    #[test]
    fn test_required_scale_floor() {
        let mut state = state();
        let farm = put(&mut state, "農場", PlayerId::FIRST, Pile::Hand);

        run(
            &mut state,
            EffectKind::ModifyCardRequiredScale,
            EffectArgs::new().with_card(farm).with_amount(-5),
        );
        assert_eq!(state.card(farm).unwrap().required_scale, 0);

        let mut args = EffectArgs::new().with_card(farm).with_amount(4);
        args.set_value = true;
        run(&mut state, EffectKind::ModifyCardRequiredScale, args);
        assert_eq!(state.card(farm).unwrap().required_scale, 4);
    }

    #[test]
    fn test_set_and_modify_resources() {
        let mut state = state();
        run(
            &mut state,
            EffectKind::ModifyConsciousness,
            EffectArgs::new().with_player(PlayerId::FIRST).with_amount(-60),
        );
        assert_eq!(state.player(PlayerId::FIRST).consciousness, -10, "no floor");

        run(
            &mut state,
            EffectKind::SetScale,
            EffectArgs::new().with_players(vec![PlayerId::FIRST, PlayerId::SECOND]).with_amount(-2),
        );
        assert_eq!(state.player(PlayerId::FIRST).scale, 0);
        assert_eq!(state.player(PlayerId::SECOND).scale, 0);
    }

    #[test]
    fn test_field_limit_decrease_below_field_size_fails() {
        let mut state = state();
        state.player_mut(PlayerId::FIRST).field_limit = 2;
        put(&mut state, "農場", PlayerId::FIRST, Pile::Field);
        put(&mut state, "農場", PlayerId::FIRST, Pile::Field);

        let res = run(
            &mut state,
            EffectKind::ModifyFieldLimit,
            EffectArgs::new().with_player(PlayerId::FIRST).with_amount(-1),
        );
        assert!(!res.result.is_success());
        assert_eq!(state.player(PlayerId::FIRST).field_limit, 2);

        run(
            &mut state,
            EffectKind::ModifyFieldLimit,
            EffectArgs::new().with_player(PlayerId::FIRST).with_amount(3),
        );
        assert_eq!(state.player(PlayerId::FIRST).field_limit, 5);
    }

    #[test]
    fn test_skip_registration() {
        let mut state = state();
        let mut args = EffectArgs::new().with_player(PlayerId::SECOND);
        args.effect_type = Some(EffectKind::DrawCard);

        run(&mut state, EffectKind::SkipEffect, args);

        assert_eq!(
            state.skips,
            vec![SkipRegistration { kind: EffectKind::DrawCard, player: PlayerId::SECOND }]
        );
    }

    #[test]
    fn test_play_event_card_goes_to_discard() {
        let mut state = state();
        let event = put(&mut state, "改革", PlayerId::FIRST, Pile::Hand);

        let res = run(
            &mut state,
            EffectKind::PlayerAction,
            EffectArgs::new().with_player(PlayerId::FIRST).with_card(event),
        );

        assert!(res.result.is_success());
        assert_eq!(state.player(PlayerId::FIRST).discard, vec![event]);
        assert_eq!(state.player(PlayerId::FIRST).cards_played_this_turn, 1);
        assert_eq!(state.player(PlayerId::FIRST).last_played_card_id, Some(event));
        state.check_integrity().unwrap();
    }

    #[test]
    fn test_placement_reactions_collected() {
        let mut echo = EffectArgs::new().with_amount(1);
        echo.player_id = Some(crate::effects::PlayerRef::Owner);
        let db = CardDatabase::from_templates([CardTemplate::new("工場", CardType::Wealth)
            .with_durability(2)
            .with_trigger(
                TriggerKind::CardPlacedThis,
                [EffectDescriptor::new(EffectKind::ModifyScale, echo)],
            )])
        .unwrap();
        let mut state = GameState::new(db, RulesConfig::default());
        let card = put(&mut state, "工場", PlayerId::FIRST, Pile::Hand);

        let res = run(
            &mut state,
            EffectKind::PlayerAction,
            EffectArgs::new().with_player(PlayerId::FIRST).with_card(card),
        );

        assert_eq!(res.entries.len(), 1);
        assert_eq!(state.player(PlayerId::FIRST).field, vec![card]);
    }
}
