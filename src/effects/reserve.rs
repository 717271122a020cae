//! The reserve pipeline.
//!
//! A reserve change runs in four steps:
//!
//! 1. **PRE**: the directional pre-events are broadcast for the affected
//!    player and their reactions drained in a private queue. This is where
//!    cards inject corrections or register skips.
//! 2. **APPLY**: the player's matching corrections are folded into the
//!    amount, then every pending correction on that player is dropped.
//! 3. The folded delta is applied to the resource or card.
//! 4. **POST**: a non-zero change broadcasts the completion event and
//!    SUCCESS_PROCESS; a change folded to zero sends FAILED_PROCESS.

use log::{debug, warn};

use super::correction::{fold_corrections, CorrectionTarget, Direction};
use super::effect::{BoundEffect, EffectKind};
use super::resolver::{change_durability, exec_amount, target_players, Resolution};
use crate::core::{GameState, InstanceId, PlayerId, SkipRegistration};
use crate::stack::{drain_local, QueueEntry};
use crate::triggers::{
    last_consciousness_key, ConditionContext, ConditionEvaluator, Dispatcher, GameEvent, TriggerKind,
};

/// Pre-phase drains nest when a reaction runs another reserve.
const MAX_RESERVE_DEPTH: u32 = 8;

pub(super) fn consciousness(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    player_reserve(state, effect, CorrectionTarget::Consciousness)
}

pub(super) fn scale(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    player_reserve(state, effect, CorrectionTarget::Scale)
}

pub(super) fn card_durability(state: &mut GameState, effect: &BoundEffect) -> Resolution {
    let Some(card) = effect.args.card() else {
        return Resolution::failed("durability reserve without card");
    };
    let Some((owner, current, in_play)) = state
        .card(card)
        .map(|c| (c.owner, c.current_durability, c.location.is_in_play()))
    else {
        return Resolution::failed(format!("{card} does not exist"));
    };
    if !in_play {
        return Resolution::failed_process(state, effect.source, "card is not in play");
    }
    let Some(amount) = reserve_amount(state, effect, current) else {
        return Resolution::failed("durability reserve without amount");
    };

    let Some(delta) = pipeline(state, effect, CorrectionTarget::Wealth, owner, Some(card), amount)
    else {
        return Resolution::failed_process(state, effect.source, "durability change skipped");
    };

    let mut res = Resolution::success();
    let applied = if delta == 0 {
        0
    } else {
        match change_durability(state, &mut res, card, delta, effect.source) {
            Some(applied) => applied,
            None => return Resolution::failed_process(state, effect.source, "card left play"),
        }
    };
    if applied == 0 {
        res.fail("durability change folded to zero");
        res.report(state, false, effect.source);
        return res;
    }
    state.set_temp("last_durability_change", applied);
    res.emit(
        state,
        GameEvent::card(TriggerKind::ModifyCardDurability, owner, card)
            .with_amount(applied)
            .with_source(effect.source),
    );
    res.report(state, true, effect.source);
    res
}

fn player_reserve(state: &mut GameState, effect: &BoundEffect, target: CorrectionTarget) -> Resolution {
    let players = target_players(state, effect);
    if players.is_empty() {
        return Resolution::failed("reserve without player");
    }

    let mut res = Resolution::success();
    let mut changed = false;
    for player in players {
        let current = resource(state, player, target);
        let Some(amount) = reserve_amount(state, effect, current) else {
            return Resolution::failed("reserve without amount");
        };
        let Some(delta) = pipeline(state, effect, target, player, None, amount) else {
            continue;
        };
        if delta == 0 {
            continue;
        }

        let seat = state.player_mut(player);
        let key = match target {
            CorrectionTarget::Scale => {
                seat.scale += delta;
                format!("{}_last_scale_change", player.index())
            }
            _ => {
                seat.consciousness += delta;
                last_consciousness_key(player)
            }
        };
        let name = seat.name.clone();
        state.set_temp(key, delta);
        let label = match target {
            CorrectionTarget::Scale => "規模",
            _ => "意識",
        };
        state.log_event(format!("{name}の{label} {delta:+}"));
        res.emit(
            state,
            GameEvent::new(TriggerKind::reserve_completion(target), player)
                .with_amount(delta)
                .with_source(effect.source),
        );
        changed = true;
    }

    if changed {
        res.report(state, true, effect.source);
    } else {
        res.fail("reserve folded to zero");
        res.report(state, false, effect.source);
    }
    res
}

fn resource(state: &GameState, player: PlayerId, target: CorrectionTarget) -> i32 {
    let seat = state.player(player);
    match target {
        CorrectionTarget::Scale => seat.scale,
        _ => seat.consciousness,
    }
}

/// Signed amount, either literal or a percentage of `current`.
fn reserve_amount(state: &mut GameState, effect: &BoundEffect, current: i32) -> Option<i32> {
    let args = &effect.args;
    match args.amount_percentage {
        Some(pct) => {
            let magnitude = current * pct.abs() / 100;
            if let Some(key) = &args.store_key {
                state.set_temp(key.clone(), magnitude);
            }
            Some(if pct < 0 { -magnitude } else { magnitude })
        }
        None => exec_amount(state, args),
    }
}

/// Run PRE and APPLY for one player. Returns the folded delta, or `None`
/// when a skip blocked the change. A zero amount has no direction and
/// broadcasts nothing.
fn pipeline(
    state: &mut GameState,
    effect: &BoundEffect,
    target: CorrectionTarget,
    player: PlayerId,
    subject: Option<InstanceId>,
    amount: i32,
) -> Option<i32> {
    if amount == 0 {
        return Some(0);
    }
    let direction = Direction::of(amount);
    pre_phase(state, effect.source, target, direction, player, subject, amount);

    if consume_block(state, effect.kind, player) {
        debug!("{} on {player} blocked by a skip", effect.kind);
        return None;
    }

    let corrections = std::mem::take(&mut state.player_mut(player).corrections);
    let applicable: Vec<_> = corrections
        .iter()
        .filter(|c| c.matches(target, direction))
        .filter(|c| match &c.applies_if {
            Some(condition) => {
                let ctx = ConditionContext::new(state, c.injector).with_card(c.source);
                ConditionEvaluator::evaluate(condition, &ctx)
            }
            None => true,
        })
        .map(|c| (c.kind, c.amount))
        .collect();
    let delta = fold_corrections(amount, applicable);
    if delta != amount {
        debug!("{} on {player}: {amount} corrected to {delta}", effect.kind);
    }
    Some(delta)
}

fn pre_phase(
    state: &mut GameState,
    source: Option<InstanceId>,
    target: CorrectionTarget,
    direction: Direction,
    player: PlayerId,
    subject: Option<InstanceId>,
    amount: i32,
) {
    if state.status.reserve_depth >= MAX_RESERVE_DEPTH {
        warn!("reserve pre-phase nested {MAX_RESERVE_DEPTH} deep, not broadcasting");
        return;
    }
    let mut entries: Vec<QueueEntry> = Vec::new();
    for kind in TriggerKind::reserve_pre(target, direction) {
        let mut event = GameEvent::new(kind, player)
            .with_amount(amount)
            .with_source(source);
        event.subject = subject;
        entries.extend(
            Dispatcher::dispatch(state, &event)
                .into_iter()
                .map(QueueEntry::Effect),
        );
    }
    if entries.is_empty() {
        return;
    }
    state.status.reserve_depth += 1;
    drain_local(state, entries);
    state.status.reserve_depth -= 1;
}

/// The primitive kind a reserve ends up performing.
fn direct_kind(kind: EffectKind) -> EffectKind {
    match kind {
        EffectKind::ModifyConsciousnessReserve => EffectKind::ModifyConsciousness,
        EffectKind::ModifyScaleReserve => EffectKind::ModifyScale,
        EffectKind::ModifyCardDurabilityReserve => EffectKind::ModifyCardDurability,
        other => other,
    }
}

/// Consume a skip registered for this reserve or its direct kind.
fn consume_block(state: &mut GameState, kind: EffectKind, player: PlayerId) -> bool {
    let direct = direct_kind(kind);
    let matches = |skip: &SkipRegistration| {
        skip.player == player && (skip.kind == kind || skip.kind == direct)
    };
    match state.skips.iter().position(matches) {
        Some(index) => {
            state.skips.remove(index);
            true
        }
        None => false,
    }
}
