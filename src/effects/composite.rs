//! Composite `PROCESS_*` handlers.
//!
//! A composite reads the state once, then either queues primitive
//! follow-ups in the order they should run or pauses for player input.
//! Follow-ups carry the composite's source card, so the events they raise
//! trace back to it.
//!
//! Input-driven composites come in pairs: the first half builds the
//! [`AwaitingInput`] and the `*_RESOLVED` half runs once the choice is in.

use std::cmp::Reverse;

use log::debug;

use super::args::{
    CardOperation, CardRef, EffectArgs, PlayerRef, PlayerSet, Resource, SelectionMethod,
};
use super::effect::{BoundEffect, EffectKind};
use super::resolver::{acting_player, exec_amount, target_players, Resolution};
use crate::cards::CardType;
use crate::core::{GameState, InstanceId, PlayerId};
use crate::stack::AwaitingInput;
use crate::triggers::GameEvent;
use crate::zones::Pile;

// === Follow-up Builders ===

fn follow_up(effect: &BoundEffect, kind: EffectKind, args: EffectArgs) -> BoundEffect {
    BoundEffect::new(kind, args).with_source(effect.source)
}

fn move_to(effect: &BoundEffect, card: InstanceId, from: Pile, to: Pile) -> BoundEffect {
    let args = EffectArgs::new()
        .with_card(card)
        .with_source_pile(from)
        .with_destination(to);
    follow_up(effect, EffectKind::MoveCard, args)
}

fn durability_reserve(effect: &BoundEffect, card: InstanceId, amount: i32) -> BoundEffect {
    let args = EffectArgs::new().with_card(card).with_amount(amount);
    follow_up(effect, EffectKind::ModifyCardDurabilityReserve, args)
}

fn scale_reserve(effect: &BoundEffect, player: PlayerId, amount: i32) -> BoundEffect {
    let args = EffectArgs::new().with_player(player).with_amount(amount);
    follow_up(effect, EffectKind::ModifyScaleReserve, args)
}

fn add_card(effect: &BoundEffect, player: PlayerId, template: &str, to: Pile) -> BoundEffect {
    let args = EffectArgs::new()
        .with_player(player)
        .with_template(template)
        .with_destination(to);
    follow_up(effect, EffectKind::AddCardToGame, args)
}

/// The continuation half of an input-driven composite. It keeps the
/// original arguments and fallbacks, including any chained effect.
fn resolved(effect: &BoundEffect, kind: EffectKind) -> BoundEffect {
    BoundEffect {
        kind,
        args: effect.args.clone(),
        source: effect.source,
        trigger: effect.trigger,
        fallbacks: effect.fallbacks.clone(),
    }
}

/// Skipped when nothing was queued.
fn queued(res: Resolution) -> Resolution {
    if res.entries.is_empty() {
        Resolution::skipped()
    } else {
        res
    }
}

/// Cards from `piles` of `player`, optionally filtered by type, never
/// including `exclude`.
fn pool(
    state: &GameState,
    player: PlayerId,
    piles: &[Pile],
    card_type: Option<CardType>,
    exclude: Option<InstanceId>,
) -> Vec<InstanceId> {
    piles
        .iter()
        .flat_map(|&pile| state.pile(player, pile).iter().copied())
        .filter(|&id| Some(id) != exclude)
        .filter(|&id| match card_type {
            Some(wanted) => state.card(id).is_some_and(|c| c.card_type == wanted),
            None => true,
        })
        .collect()
}

fn durability_of(state: &GameState, card: InstanceId) -> i32 {
    state.card(card).map_or(0, |c| c.current_durability)
}

fn required_scale_of(state: &GameState, card: InstanceId) -> i32 {
    state.card(card).map_or(0, |c| c.required_scale)
}

fn on_field(state: &GameState, card: InstanceId) -> bool {
    matches!(state.locate(card), Some((_, Pile::Field)))
}

macro_rules! actor_or_fail {
    ($state:expr, $effect:expr) => {
        match acting_player($state, $effect) {
            Some(player) => player,
            None => return Resolution::failed(format!("{} without player", $effect.kind)),
        }
    };
}

// === Card Operation ===

/// Pick cards by a selection method and apply one operation to each.
pub(crate) fn card_operation(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let Some(operation) = args.operation else {
        return Resolution::failed("card operation without operation");
    };
    let actor = acting_player(state, effect);
    let players: Vec<PlayerId> = match &args.player_ids {
        Some(PlayerSet::Players(ids)) => ids.clone(),
        _ => args.target_player().or(actor).into_iter().collect(),
    };
    if players.is_empty() {
        return Resolution::failed("card operation without player");
    }
    let method = args.selection_method.unwrap_or(SelectionMethod::All);

    if method == SelectionMethod::Choice && args.card().is_none() {
        let Some(actor) = actor else {
            return Resolution::failed("choice without a choosing player");
        };
        let options: Vec<InstanceId> = players
            .iter()
            .flat_map(|&player| operation_pool(state, effect, player))
            .collect();
        if options.is_empty() {
            return Resolution::skipped();
        }
        let count = args.count.map_or(options.len(), |count| count as usize);
        return Resolution::awaiting(AwaitingInput::cards_for_operation(
            actor,
            options,
            count,
            effect.clone(),
        ));
    }

    let mut res = Resolution::success();
    for player in players {
        let targets = match args.card() {
            Some(card) => match state.locate(card) {
                Some((holder, _)) if holder == player => vec![card],
                _ => Vec::new(),
            },
            None => {
                let available = operation_pool(state, effect, player);
                select(state, args, method, available)
            }
        };
        if targets.is_empty() {
            continue;
        }
        if let Some(key) = &args.store_count_key {
            state.set_temp(key.clone(), targets.len() as i32);
        }
        if let Err(reason) = apply_operation(state, effect, operation, player, &targets, &mut res) {
            return Resolution::failed(reason);
        }
    }
    queued(res)
}

fn operation_pool(state: &GameState, effect: &BoundEffect, player: PlayerId) -> Vec<InstanceId> {
    let args = &effect.args;
    let piles = match (&args.source_piles, args.source_pile) {
        (Some(piles), _) => piles.clone(),
        (None, Some(pile)) => vec![pile],
        (None, None) => vec![Pile::Field],
    };
    pool(state, player, &piles, args.card_type, effect.source)
}

fn select(
    state: &mut GameState,
    args: &EffectArgs,
    method: SelectionMethod,
    mut available: Vec<InstanceId>,
) -> Vec<InstanceId> {
    let len = available.len();
    let count = args.count.map(|count| (count as usize).min(len));
    match method {
        SelectionMethod::All => available,
        SelectionMethod::Random => state
            .rng
            .sample_indices(len, count.unwrap_or(len))
            .into_iter()
            .map(|index| available[index])
            .collect(),
        SelectionMethod::HighestRequiredScale => {
            available.sort_by_key(|&id| Reverse(required_scale_of(state, id)));
            available.truncate(count.unwrap_or(len));
            available
        }
        SelectionMethod::LowestDurability => {
            available.sort_by_key(|&id| durability_of(state, id));
            available.truncate(count.unwrap_or(1.min(len)));
            available
        }
        SelectionMethod::Top => {
            available.truncate(count.unwrap_or(len));
            available
        }
        SelectionMethod::Bottom => available.split_off(len - count.unwrap_or(len)),
        SelectionMethod::PreSelected => {
            let chosen = args.selected_cards.as_deref().unwrap_or_default();
            available.retain(|id| chosen.contains(id));
            available
        }
        SelectionMethod::Choice => Vec::new(),
    }
}

fn apply_operation(
    state: &GameState,
    effect: &BoundEffect,
    operation: CardOperation,
    player: PlayerId,
    targets: &[InstanceId],
    res: &mut Resolution,
) -> Result<(), String> {
    let args = &effect.args;
    match operation {
        CardOperation::ModifyDurability => {
            for &card in targets {
                let mut reserve = EffectArgs::new().with_card(card);
                reserve.amount = exec_amount(state, args);
                reserve.amount_percentage = args.amount_percentage;
                if reserve.amount.is_none() && reserve.amount_percentage.is_none() {
                    return Err("durability operation without amount".into());
                }
                res.push(follow_up(effect, EffectKind::ModifyCardDurabilityReserve, reserve));
            }
        }
        CardOperation::ModifyRequiredScale => {
            let amount = exec_amount(state, args).ok_or("required scale operation without amount")?;
            for &card in targets {
                let mut change = EffectArgs::new().with_card(card).with_amount(amount);
                change.min_value = Some(args.min_value.unwrap_or(0));
                change.set_value = args.set_value;
                res.push(follow_up(effect, EffectKind::ModifyCardRequiredScale, change));
            }
        }
        CardOperation::Move => {
            let to = args.destination_pile.ok_or("move operation without destination")?;
            for &card in targets {
                let Some((_, from)) = state.locate(card) else {
                    continue;
                };
                let mut mv = move_to(effect, card, from, to);
                mv.args.position = args.position;
                mv.args.maintain = args.maintain;
                res.push(mv);
            }
        }
        CardOperation::Remove => {
            for &card in targets {
                let args = EffectArgs::new().with_card(card);
                res.push(follow_up(effect, EffectKind::RemoveCardFromGame, args));
            }
        }
        CardOperation::GenerateCard => {
            let (Some(name), Some(to)) = (args.card_template_name.as_deref(), args.destination_pile)
            else {
                return Err("generate operation without template or destination".into());
            };
            let mut add = add_card(effect, player, name, to);
            add.args.count = args.count;
            res.push(add);
        }
    }
    Ok(())
}

pub(crate) fn deal_damage_to_all_wealth(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let players = match &effect.args.player_ids {
        Some(PlayerSet::Players(ids)) if !ids.is_empty() => ids.clone(),
        _ => return Resolution::failed("damage to all wealth without players"),
    };
    match exec_amount(state, &effect.args) {
        Some(amount) if amount != 0 => {
            wealth_operation(state, effect, players, -amount.abs())
        }
        _ => Resolution::failed("damage to all wealth without amount"),
    }
}

pub(crate) fn all_wealth_boost(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let players = target_players(state, effect);
    match exec_amount(state, &effect.args) {
        Some(amount) if !players.is_empty() => wealth_operation(state, effect, players, amount),
        _ => Resolution::failed("wealth boost without player or amount"),
    }
}

/// Queue a durability operation over every field wealth of `players`.
fn wealth_operation(
    state: &GameState,
    effect: &BoundEffect,
    players: Vec<PlayerId>,
    amount: i32,
) -> Resolution {
    let mut args = EffectArgs::new().with_players(players).with_amount(amount);
    args.player_id = acting_player(state, effect).map(PlayerRef::Player);
    args.operation = Some(CardOperation::ModifyDurability);
    args.selection_method = Some(SelectionMethod::All);
    args.source_piles = Some(vec![Pile::Field]);
    args.card_type = Some(CardType::Wealth);

    let mut res = Resolution::success();
    res.push(follow_up(effect, EffectKind::ProcessCardOperation, args));
    res
}

// === Ideology ===

pub(crate) fn choose_and_discard_ideology(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let options: Vec<InstanceId> = [player, player.opponent()]
        .into_iter()
        .filter_map(|p| state.player(p).ideology)
        .collect();
    if options.is_empty() {
        return Resolution::skipped();
    }
    let mut next = resolved(effect, EffectKind::ProcessChooseAndDiscardIdeologyResolved);
    next.args.player_id = Some(PlayerRef::Player(player));
    Resolution::awaiting(AwaitingInput::card_for_effect(player, options, next))
}

pub(crate) fn discard_chosen_ideology(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let Some(card) = effect.args.card() else {
        return Resolution::failed("no ideology chosen");
    };
    if !PlayerId::all().any(|p| state.player(p).ideology == Some(card)) {
        debug!("{card} left the ideology slot before it could be discarded");
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    res.push(move_to(effect, card, Pile::Ideology, Pile::Discard));
    res
}

pub(crate) fn discard_all_ideology(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let mut res = Resolution::success();
    for pile in [Pile::Hand, Pile::Deck] {
        for card in pool(state, player, &[pile], Some(CardType::Ideology), None) {
            res.push(move_to(effect, card, pile, Pile::Discard));
        }
    }
    queued(res)
}

// === Hand Rotation ===

/// Send every wealth in hand to `to`, then draw as many from the deck.
pub(crate) fn replace_hand_wealth(state: &mut GameState, effect: &BoundEffect, to: Pile) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let wealth = pool(state, player, &[Pile::Hand], Some(CardType::Wealth), None);
    if wealth.is_empty() {
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    for &card in &wealth {
        res.push(move_to(effect, card, Pile::Hand, to));
    }
    for _ in &wealth {
        let draw = EffectArgs::new()
            .with_player(player)
            .with_card_ref(CardRef::DrawFromDeck)
            .with_source_pile(Pile::Deck)
            .with_destination(Pile::Hand);
        res.push(follow_up(effect, EffectKind::MoveCard, draw));
    }
    res
}

/// Discard hand cards of one type and add as many copies of a template.
pub(crate) fn exchange_hand_cards(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let player = actor_or_fail!(state, effect);
    let (Some(discard_type), Some(name)) = (args.card_type_to_discard, args.card_template_name.as_deref())
    else {
        return Resolution::failed("exchange without card type or template");
    };
    let discards = pool(state, player, &[Pile::Hand], Some(discard_type), None);
    if discards.is_empty() {
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    for &card in &discards {
        res.push(move_to(effect, card, Pile::Hand, Pile::Discard));
    }
    let mut add = add_card(effect, player, name, args.destination_pile.unwrap_or(Pile::Hand));
    add.args.count = Some(discards.len() as u32);
    res.push(add);
    res
}

pub(crate) fn return_largest_to_deck(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let mut largest: Option<(InstanceId, i32)> = None;
    for &card in &state.player(player).hand {
        let scale = required_scale_of(state, card);
        if largest.map_or(true, |(_, best)| scale > best) {
            largest = Some((card, scale));
        }
    }
    let Some((card, _)) = largest else {
        return Resolution::failed_process(state, effect.source, "hand is empty");
    };
    let mut res = Resolution::success();
    res.push(move_to(effect, card, Pile::Hand, Pile::Deck));
    res.report(state, true, effect.source);
    res
}

/// Draw random deck cards of a type and discount their required scale.
pub(crate) fn draw_discounted(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let player = actor_or_fail!(state, effect);
    let candidates = pool(state, player, &[Pile::Deck], args.card_type, None);
    if candidates.is_empty() {
        return Resolution::skipped();
    }
    let count = args
        .count
        .map(|count| count as usize)
        .or(args.amount.map(|amount| amount.max(0) as usize))
        .unwrap_or(1);
    let picks: Vec<InstanceId> = state
        .rng
        .sample_indices(candidates.len(), count.min(candidates.len()))
        .into_iter()
        .map(|index| candidates[index])
        .collect();

    let mut res = Resolution::success();
    for card in picks {
        let current = required_scale_of(state, card);
        let reduction = args.scale_reduction.or_else(|| {
            args.scale_reduction_percentage
                .map(|pct| current * pct / 100)
        });
        let mut draw = move_to(effect, card, Pile::Deck, Pile::Hand);
        draw.args.maintain = true;
        res.push(draw);
        if let Some(reduction) = reduction.filter(|&r| r != 0) {
            let mut change = EffectArgs::new().with_card(card).with_amount(-reduction);
            change.min_value = Some(0);
            res.push(follow_up(effect, EffectKind::ModifyCardRequiredScale, change));
        }
    }
    res
}

// === Information ===

/// Reveal random cards of a type and tell the source card which ones.
pub(crate) fn expose_card_by_type(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let Some(player) = acting_player(state, effect) else {
        return Resolution::failed_process(state, effect.source, "expose without player");
    };
    let piles = args.source_piles.clone().unwrap_or_else(|| vec![Pile::Hand]);
    let candidates = pool(state, player, &piles, args.card_type, None);
    if candidates.is_empty() {
        return Resolution::failed_process(state, effect.source, "nothing to expose");
    }
    let count = (args.count.unwrap_or(1) as usize).min(candidates.len());
    let exposed: Vec<InstanceId> = state
        .rng
        .sample_indices(candidates.len(), count)
        .into_iter()
        .map(|index| candidates[index])
        .collect();
    state.exposed_cards.extend(exposed.iter().copied());

    let mut res = Resolution::success();
    if let Some(source) = effect.source {
        if let Some(owner) = state.card(source).map(|c| c.owner) {
            let event = GameEvent::process_outcome(true, owner, source).with_exposed(exposed);
            res.emit(state, event);
        }
    }
    res
}

// === Resources ===

pub(crate) fn scale_to_zero_and_reduce_consciousness(
    state: &mut GameState,
    effect: &BoundEffect,
) -> Resolution {
    let before: Vec<(PlayerId, i32)> = PlayerId::all().map(|p| (p, state.player(p).scale)).collect();
    let mut res = Resolution::success();
    let reset = EffectArgs::new()
        .with_players(PlayerId::all().collect())
        .with_amount(0);
    res.push(follow_up(effect, EffectKind::SetScale, reset));
    for (player, scale) in before.into_iter().filter(|&(_, scale)| scale > 0) {
        let args = EffectArgs::new().with_player(player).with_amount(-scale);
        res.push(follow_up(effect, EffectKind::ModifyConsciousnessReserve, args));
    }
    res
}

pub(crate) fn add_card_conditional(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let player = actor_or_fail!(state, effect);
    let (Some(resource), Some(threshold), Some(name)) =
        (args.condition_target, args.threshold, args.card_template_name.as_deref())
    else {
        return Resolution::failed("conditional add without resource, threshold or template");
    };
    let seat = state.player(player);
    let value = match resource {
        Resource::Consciousness => seat.consciousness,
        Resource::Scale => seat.scale,
    };
    if value < threshold {
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    res.push(add_card(effect, player, name, args.destination_pile.unwrap_or(Pile::Hand)));
    res
}

pub(crate) fn add_card_by_deck_count(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let player = actor_or_fail!(state, effect);
    let (Some(threshold), Some(above), Some(below)) =
        (args.threshold, args.card_if_above.as_deref(), args.card_if_below.as_deref())
    else {
        return Resolution::failed("deck count add without threshold or templates");
    };
    let deck_size = state.player(player).deck.len() as i32;
    let name = if deck_size >= threshold { above } else { below };
    let mut res = Resolution::success();
    res.push(add_card(effect, player, name, args.destination_pile.unwrap_or(Pile::Hand)));
    res
}

// === Scale Tokens ===

/// A newly placed token folds its durability into an existing one.
pub(crate) fn merge_scale_token(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let Some(played) = effect.args.card().or(effect.source) else {
        return Resolution::failed("token placement without card");
    };
    let Some((player, Pile::Field)) = state.locate(played) else {
        return Resolution::skipped();
    };
    let existing = state
        .player(player)
        .field
        .iter()
        .copied()
        .find(|&id| id != played && state.is_scale_token(id));
    let Some(existing) = existing else {
        return Resolution::skipped();
    };
    let durability = durability_of(state, played);
    let mut res = Resolution::success();
    res.push(move_to(effect, played, Pile::Field, Pile::Discard));
    res.push(durability_reserve(effect, existing, durability));
    res
}

/// Trade the two cheapest hand cards for the reward template and take the
/// token back to hand.
pub(crate) fn cash_in_scale_token(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let player = actor_or_fail!(state, effect);
    let token = args
        .card()
        .or_else(|| state.scale_token_on_field(player))
        .filter(|&id| state.locate(id) == Some((player, Pile::Field)));
    let Some(token) = token else {
        return Resolution::skipped();
    };
    if let Some(minimum) = args.require_durability_at_least {
        if durability_of(state, token) < minimum {
            return Resolution::skipped();
        }
    }

    let mut hand = state.player(player).hand.clone();
    hand.sort_by_key(|&id| required_scale_of(state, id));
    hand.truncate(2);

    let mut res = Resolution::success();
    for &card in &hand {
        res.push(move_to(effect, card, Pile::Hand, Pile::Discard));
    }
    if !hand.is_empty() {
        let reward = state.config.token_reward_name.clone();
        res.push(add_card(effect, player, &reward, Pile::Hand));
    }
    let mut back = move_to(effect, token, Pile::Field, Pile::Hand);
    back.args.maintain = true;
    res.push(back);
    res
}

pub(crate) fn trade_ideology_for_token(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let ideologies = pool(state, player, &[Pile::Hand], Some(CardType::Ideology), None);
    if ideologies.is_empty() {
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    for &card in &ideologies {
        res.push(move_to(effect, card, Pile::Hand, Pile::Discard));
    }
    let token = state.config.scale_token_name.clone();
    let mut add = add_card(effect, player, &token, Pile::Hand);
    add.args.initial_durability = Some(ideologies.len() as i32);
    res.push(add);
    res
}

/// Coin flip: the token loses or gains a percentage of its durability.
pub(crate) fn gamble_token_durability(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let player = actor_or_fail!(state, effect);
    let Some(token) = state.scale_token_on_field(player) else {
        return Resolution::skipped();
    };
    let durability = durability_of(state, token);
    let change = if state.rng.gen_bool(0.5) {
        -(durability * args.percent_decrease.unwrap_or(0) / 100)
    } else {
        durability * args.percent_increase.unwrap_or(0) / 100
    };
    if change == 0 {
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    res.push(durability_reserve(effect, token, change));
    res
}

pub(crate) fn ask_token_conversion(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let Some(token) = state.scale_token_on_field(player) else {
        return Resolution::skipped();
    };
    let durability = durability_of(state, token);
    let mut next = resolved(effect, EffectKind::ProcessReduceMoneyDurabilityAndGainScaleResolved);
    next.args = next.args.with_player(player).with_card(token);
    let prompt = format!(
        "「{}」の耐久値をどれだけ減らしますか？ (現在の耐久値: {durability})",
        state.config.scale_token_name
    );
    Resolution::awaiting(AwaitingInput::number(player, 0, durability, next).with_prompt(prompt))
}

pub(crate) fn convert_token_to_scale(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let (Some(token), Some(amount)) = (effect.args.card(), effect.args.amount) else {
        return Resolution::failed("conversion without token or amount");
    };
    if amount <= 0 {
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    res.push(durability_reserve(effect, token, -amount));
    res.push(scale_reserve(effect, player, amount));
    res
}

pub(crate) fn token_for_cards_played(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let played = state.player(player).cards_played_this_turn;
    if played == 0 {
        return Resolution::skipped();
    }
    let token = state.config.scale_token_name.clone();
    let mut add = add_card(effect, player, &token, Pile::Hand);
    add.args.initial_durability = Some(played as i32);
    let mut res = Resolution::success();
    res.push(add);
    res
}

/// Discard the token, then hit a random target wealth once per point of
/// its durability.
pub(crate) fn spend_token_on_random_wealth(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let target = effect.args.target_player().unwrap_or(player.opponent());
    let Some(token) = state.scale_token_on_field(player) else {
        return Resolution::skipped();
    };
    let hits = durability_of(state, token);
    let targets = state.field_wealth(target);
    if hits <= 0 || targets.is_empty() {
        return Resolution::skipped();
    }
    let Some(amount) = exec_amount(state, &effect.args) else {
        return Resolution::failed("token spend without amount");
    };

    let mut res = Resolution::success();
    res.push(move_to(effect, token, Pile::Field, Pile::Discard));
    for _ in 0..hits {
        let index = state.rng.gen_range_usize(0..targets.len());
        res.push(durability_reserve(effect, targets[index], amount));
    }
    res
}

// === Choices ===

pub(crate) fn choose_card_to_add(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let player = actor_or_fail!(state, effect);
    let names = effect.args.options.clone().unwrap_or_default();
    if names.is_empty() {
        return Resolution::skipped();
    }
    Resolution::awaiting(AwaitingInput::card_to_add(player, effect.source, names))
}

pub(crate) fn choose_card_from_pile(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let player = actor_or_fail!(state, effect);
    let piles = match (&args.source_piles, args.source_pile) {
        (Some(piles), _) => piles.clone(),
        (None, Some(pile)) => vec![pile],
        (None, None) => vec![Pile::Discard],
    };
    let options = pool(state, player, &piles, args.card_type, effect.source);
    if options.is_empty() {
        return Resolution::skipped();
    }
    let to = args.destination_pile.unwrap_or(Pile::Hand);
    Resolution::awaiting(AwaitingInput::card_from_pile(player, effect.source, options, piles, to))
}

/// Offer the target's field wealth and continue with `then` once one is
/// picked.
pub(crate) fn choose_wealth(state: &mut GameState, effect: &BoundEffect, then: EffectKind) -> Resolution {
    let chooser = actor_or_fail!(state, effect);
    let target = effect.args.target_player().unwrap_or(chooser.opponent());
    let options = state.field_wealth(target);
    if options.is_empty() {
        return Resolution::failed_process(state, effect.source, "no wealth to choose");
    }
    let mut next = resolved(effect, then);
    next.args = next.args.with_player(chooser);
    Resolution::awaiting(AwaitingInput::card_for_effect(chooser, options, next))
}

pub(crate) fn modify_chosen_wealth(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let args = &effect.args;
    let Some(card) = args.card().filter(|&id| on_field(state, id)) else {
        return Resolution::failed_process(state, effect.source, "chosen wealth is gone");
    };
    let Some(amount) = exec_amount(state, args) else {
        return Resolution::failed("durability choice without amount");
    };
    let mut res = Resolution::success();
    res.push(durability_reserve(effect, card, amount));
    if state.is_scale_token(card) {
        if let (Some(bonus), Some(player)) = (args.bonus_scale_if_token, acting_player(state, effect)) {
            res.push(scale_reserve(effect, player, bonus));
        }
    }
    res.report(state, true, effect.source);
    res
}

pub(crate) fn bounce_chosen_wealth(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let Some(card) = effect.args.card().filter(|&id| on_field(state, id)) else {
        return Resolution::failed_process(state, effect.source, "chosen wealth is gone");
    };
    let mut res = Resolution::success();
    res.push(move_to(effect, card, Pile::Field, Pile::Hand));
    res.report(state, true, effect.source);
    res
}

// === Reactions ===

/// Strike back at the card that caused the triggering event.
pub(crate) fn counter_attack(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let (Some(attacker), Some(damage)) = (effect.args.card(), effect.args.counter_damage) else {
        return Resolution::skipped();
    };
    if state.card(attacker).is_none() || damage == 0 {
        return Resolution::skipped();
    }
    let mut res = Resolution::success();
    res.push(durability_reserve(effect, attacker, -damage.abs()));
    res
}
