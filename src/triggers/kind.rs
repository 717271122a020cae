//! Trigger kinds and their scopes.
//!
//! `TriggerKind` is the closed vocabulary of events a card can react to.
//! Card data names them in `SCREAMING_SNAKE_CASE` (`"CARD_PLACED_OWNER"`).
//!
//! ## Scope
//!
//! Every kind has a fixed [`Scope`] that decides which cards a broadcast
//! reaches, relative to the event's perspective player:
//!
//! | Suffix        | Scope      | Matches                                  |
//! |---------------|------------|------------------------------------------|
//! | `_OWNER`      | `Owner`    | cards owned by the perspective player    |
//! | `_OPPONENT`   | `Opponent` | cards owned by the other player          |
//! | `_THIS`       | `Subject`  | only the event's subject card            |
//! | none          | `Global`   | every live card                          |
//!
//! `DAMAGE_THIS`, `BOOST_THIS`, `SUCCESS_PROCESS` and `FAILED_PROCESS` are
//! subject-scoped as well.

use serde::{Deserialize, Serialize};

use crate::effects::{CorrectionTarget, Direction};

/// Which cards an event of a given kind reaches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    Owner,
    Opponent,
    Subject,
    Global,
}

/// Closed set of trigger kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    // === Turn ===
    StartTurn,
    StartTurnOwner,
    StartTurnOpponent,
    EndTurn,
    EndTurnOwner,
    EndTurnOpponent,

    // === Card Movement ===
    CardDrawn,
    CardDrawnThis,
    CardDrawnOwner,
    CardPlaced,
    CardPlacedThis,
    CardPlacedOwner,
    CardPlacedOpponent,
    CardDiscarded,
    CardDiscardedThis,
    CardDiscardedOwner,
    CardAddedToHand,
    CardAddedToHandThis,
    CardAddedToHandOwner,
    CardBouncedThis,
    CardBouncedOwner,

    // === Play ===
    PlayEvent,
    PlayEventThis,
    PlayEventOwner,
    PlayEventOpponent,
    PlayerPlayCardAction,
    PlayerPlayCardActionOwner,
    PlayerPlayCardActionOpponent,

    // === Durability ===
    DamageThis,
    BoostThis,
    WealthDurabilityZero,
    WealthDurabilityZeroThis,
    WealthDurabilityZeroOwner,
    WealthDurabilityZeroOpponent,

    // === Process Outcome ===
    SuccessProcess,
    FailedProcess,

    // === Reserve Pre-Events ===
    ModifyConsciousnessIncreaseReserveOwner,
    ModifyConsciousnessIncreaseReserveOpponent,
    ModifyConsciousnessDecreaseReserveOwner,
    ModifyConsciousnessDecreaseReserveOpponent,
    ModifyScaleIncreaseReserveOwner,
    ModifyScaleIncreaseReserveOpponent,
    ModifyScaleDecreaseReserveOwner,
    ModifyScaleDecreaseReserveOpponent,
    ModifyCardDurabilityIncreaseReserveOwner,
    ModifyCardDurabilityIncreaseReserveOpponent,
    ModifyCardDurabilityDecreaseReserveOwner,
    ModifyCardDurabilityDecreaseReserveOpponent,

    // === Reserve Completion ===
    ModifyConsciousness,
    ModifyScale,
    ModifyCardDurability,
}

impl TriggerKind {
    /// Scope of this kind.
    #[must_use]
    pub const fn scope(self) -> Scope {
        use TriggerKind::*;
        match self {
            StartTurnOwner | EndTurnOwner | CardDrawnOwner | CardPlacedOwner
            | CardDiscardedOwner | CardAddedToHandOwner | CardBouncedOwner | PlayEventOwner
            | PlayerPlayCardActionOwner | WealthDurabilityZeroOwner
            | ModifyConsciousnessIncreaseReserveOwner | ModifyConsciousnessDecreaseReserveOwner
            | ModifyScaleIncreaseReserveOwner | ModifyScaleDecreaseReserveOwner
            | ModifyCardDurabilityIncreaseReserveOwner
            | ModifyCardDurabilityDecreaseReserveOwner => Scope::Owner,

            StartTurnOpponent | EndTurnOpponent | CardPlacedOpponent | PlayEventOpponent
            | PlayerPlayCardActionOpponent | WealthDurabilityZeroOpponent
            | ModifyConsciousnessIncreaseReserveOpponent
            | ModifyConsciousnessDecreaseReserveOpponent | ModifyScaleIncreaseReserveOpponent
            | ModifyScaleDecreaseReserveOpponent | ModifyCardDurabilityIncreaseReserveOpponent
            | ModifyCardDurabilityDecreaseReserveOpponent => Scope::Opponent,

            CardDrawnThis | CardPlacedThis | CardDiscardedThis | CardAddedToHandThis
            | CardBouncedThis | PlayEventThis | DamageThis | BoostThis
            | WealthDurabilityZeroThis | SuccessProcess | FailedProcess => Scope::Subject,

            StartTurn | EndTurn | CardDrawn | CardPlaced | CardDiscarded | CardAddedToHand
            | PlayEvent | PlayerPlayCardAction | WealthDurabilityZero | ModifyConsciousness
            | ModifyScale | ModifyCardDurability => Scope::Global,
        }
    }

    /// The family of play-action kinds. A card never reacts to its own play
    /// through these.
    #[must_use]
    pub const fn is_play_action(self) -> bool {
        matches!(
            self,
            TriggerKind::PlayerPlayCardAction
                | TriggerKind::PlayerPlayCardActionOwner
                | TriggerKind::PlayerPlayCardActionOpponent
        )
    }

    /// `(owner, opponent)` pre-event kinds for a reserve on `target`.
    #[must_use]
    pub const fn reserve_pre(target: CorrectionTarget, direction: Direction) -> [TriggerKind; 2] {
        use TriggerKind::*;
        match (target, direction) {
            (CorrectionTarget::Consciousness, Direction::Increase) => [
                ModifyConsciousnessIncreaseReserveOwner,
                ModifyConsciousnessIncreaseReserveOpponent,
            ],
            (CorrectionTarget::Consciousness, Direction::Decrease) => [
                ModifyConsciousnessDecreaseReserveOwner,
                ModifyConsciousnessDecreaseReserveOpponent,
            ],
            (CorrectionTarget::Scale, Direction::Increase) => {
                [ModifyScaleIncreaseReserveOwner, ModifyScaleIncreaseReserveOpponent]
            }
            (CorrectionTarget::Scale, Direction::Decrease) => {
                [ModifyScaleDecreaseReserveOwner, ModifyScaleDecreaseReserveOpponent]
            }
            (CorrectionTarget::Wealth, Direction::Increase) => [
                ModifyCardDurabilityIncreaseReserveOwner,
                ModifyCardDurabilityIncreaseReserveOpponent,
            ],
            (CorrectionTarget::Wealth, Direction::Decrease) => [
                ModifyCardDurabilityDecreaseReserveOwner,
                ModifyCardDurabilityDecreaseReserveOpponent,
            ],
        }
    }

    /// Completion event broadcast after a reserve on `target` changed
    /// something.
    #[must_use]
    pub const fn reserve_completion(target: CorrectionTarget) -> TriggerKind {
        match target {
            CorrectionTarget::Consciousness => TriggerKind::ModifyConsciousness,
            CorrectionTarget::Scale => TriggerKind::ModifyScale,
            CorrectionTarget::Wealth => TriggerKind::ModifyCardDurability,
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        let kind: TriggerKind = serde_json::from_str("\"WEALTH_DURABILITY_ZERO_THIS\"").unwrap();
        assert_eq!(kind, TriggerKind::WealthDurabilityZeroThis);

        let json = serde_json::to_string(&TriggerKind::ModifyCardDurabilityDecreaseReserveOpponent).unwrap();
        assert_eq!(json, "\"MODIFY_CARD_DURABILITY_DECREASE_RESERVE_OPPONENT\"");

        assert!(serde_json::from_str::<TriggerKind>("\"ON_SUNRISE\"").is_err());
    }

    #[test]
    fn test_scopes() {
        assert_eq!(TriggerKind::StartTurnOwner.scope(), Scope::Owner);
        assert_eq!(TriggerKind::CardPlacedOpponent.scope(), Scope::Opponent);
        assert_eq!(TriggerKind::DamageThis.scope(), Scope::Subject);
        assert_eq!(TriggerKind::FailedProcess.scope(), Scope::Subject);
        assert_eq!(TriggerKind::ModifyScale.scope(), Scope::Global);
    }

    #[test]
    fn test_reserve_kinds() {
        let [owner, opponent] =
            TriggerKind::reserve_pre(CorrectionTarget::Consciousness, Direction::Decrease);
        assert_eq!(owner, TriggerKind::ModifyConsciousnessDecreaseReserveOwner);
        assert_eq!(opponent.scope(), Scope::Opponent);
        assert_eq!(
            TriggerKind::reserve_completion(CorrectionTarget::Wealth),
            TriggerKind::ModifyCardDurability
        );
    }
}
