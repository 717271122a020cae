//! The FIFO effect queue.
//!
//! Entries run strictly in order. Whatever an entry produces (trigger
//! reactions, follow-up effects, fallbacks) is appended after everything
//! already waiting. A pending input request freezes the queue until it is
//! answered.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::{GamePhase, GameState, PlayerId};
use crate::effects::{BoundEffect, EffectResolver};
use crate::rules::turn::settle;
use crate::triggers::{Dispatcher, GameEvent};

/// One unit of queued work.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueEntry {
    Effect(BoundEffect),
    /// An event broadcast when it reaches the front of the queue.
    Event(GameEvent),
}

impl From<BoundEffect> for QueueEntry {
    fn from(effect: BoundEffect) -> Self {
        QueueEntry::Effect(effect)
    }
}

impl From<GameEvent> for QueueEntry {
    fn from(event: GameEvent) -> Self {
        QueueEntry::Event(event)
    }
}

/// Drain the queue until it is empty or input is needed.
///
/// A turn start or end left unfinished by an earlier capped drain is
/// completed once the queue empties. A no-op on an empty or blocked queue.
#[must_use]
pub fn process_effects(mut state: GameState) -> GameState {
    drain(&mut state);
    if state.status.transition_pending || state.phase == GamePhase::StartTurn {
        return settle(state);
    }
    state
}

/// In-place drain, bounded by `max_steps_per_drain`.
pub fn drain(state: &mut GameState) {
    let limit = state.config.max_steps_per_drain;
    let mut steps = 0;
    while !state.is_blocked() {
        if steps >= limit && !state.queue.is_empty() {
            warn!(
                "drain stopped after {steps} steps with {} entries queued",
                state.queue.len()
            );
            break;
        }
        let Some(entry) = state.queue.pop_front() else {
            break;
        };
        steps += 1;
        run_entry(state, entry);
    }
}

/// Run `entries` to completion in a private queue, leaving the outer queue
/// untouched.
///
/// Input requests raised here cannot be answered and are discarded.
pub(crate) fn drain_local(state: &mut GameState, entries: impl IntoIterator<Item = QueueEntry>) {
    let outer = std::mem::replace(&mut state.queue, entries.into_iter().collect());
    let outer_input_for = state.status.input_for;
    loop {
        drain(state);
        match state.awaiting_input.take() {
            Some(input) => warn!(
                "discarding {:?} request for {} raised during a reserve pre-phase",
                input.kind, input.player
            ),
            None => break,
        }
    }
    if !state.queue.is_empty() {
        warn!("dropping {} unfinished pre-phase entries", state.queue.len());
    }
    state.queue = outer;
    state.status.input_for = outer_input_for;
}

fn run_entry(state: &mut GameState, entry: QueueEntry) {
    match entry {
        QueueEntry::Event(event) => {
            let reactions = Dispatcher::dispatch(state, &event);
            state
                .queue
                .extend(reactions.into_iter().map(QueueEntry::Effect));
        }
        QueueEntry::Effect(effect) => {
            if consume_skip(state, &effect) {
                debug!("skipped {} ({:?})", effect.kind, effect.source);
                return;
            }
            let resolution = EffectResolver::resolve(state, &effect);
            state.queue.extend(resolution.entries);
            if !resolution.result.is_success() {
                state
                    .queue
                    .extend(effect.fallbacks.into_iter().map(QueueEntry::Effect));
            }
            if let Some(input) = resolution.input {
                state.status.input_for = Some(input.player);
                state.awaiting_input = Some(input);
            }
        }
    }
}

/// Player an effect is about, for skip matching.
fn effect_player(state: &GameState, effect: &BoundEffect) -> Option<PlayerId> {
    effect.skip_player().or_else(|| {
        effect
            .args
            .card()
            .and_then(|id| state.card(id))
            .map(|card| card.owner)
    })
}

/// Consume the first skip registration matching this effect.
fn consume_skip(state: &mut GameState, effect: &BoundEffect) -> bool {
    let Some(player) = effect_player(state, effect) else {
        return false;
    };
    match state
        .skips
        .iter()
        .position(|skip| skip.kind == effect.kind && skip.player == player)
    {
        Some(index) => {
            state.skips.remove(index);
            true
        }
        None => false,
    }
}
