//! Parameter corrections.
//!
//! A `ParameterCorrection` adjusts exactly one pending reserve operation.
//! Reactions to a reserve pre-event inject corrections onto the affected
//! player; the reserve then folds them into its magnitude and drops the
//! player's whole list.
//!
//! ## Folding
//!
//! Corrections apply in declaration order to the magnitude `|A|`:
//!
//! - `Limit(n)`: magnitude is capped at `n`; later corrections are ignored
//! - `Attenuation(n)`: magnitude shrinks by `n`, never below 0
//! - `Amplification(n)`: magnitude grows by `n`
//!
//! The sign of `A` is preserved, so a decrease can never become an increase.
//!
//! ```
//! use ideology_ccg::effects::{fold_corrections, CorrectionKind};
//!
//! assert_eq!(fold_corrections(-5, [(CorrectionKind::Attenuation, 3)]), -2);
//! assert_eq!(fold_corrections(-5, [(CorrectionKind::Attenuation, 9)]), 0);
//! assert_eq!(fold_corrections(-5, [(CorrectionKind::Limit, 0)]), 0);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{InstanceId, PlayerId};
use crate::triggers::Condition;

/// Resource a correction applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionTarget {
    Consciousness,
    Scale,
    /// Durability of a wealth card owned by the player.
    Wealth,
}

/// Sign of the change a correction applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// Direction of a signed delta. Zero counts as an increase.
    #[must_use]
    pub const fn of(amount: i32) -> Self {
        if amount < 0 {
            Direction::Decrease
        } else {
            Direction::Increase
        }
    }
}

/// How a correction changes the magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    Attenuation,
    Limit,
    Amplification,
}

/// A pending adjustment to the next matching reserve on a player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterCorrection {
    pub target: CorrectionTarget,
    pub direction: Direction,
    pub kind: CorrectionKind,
    pub amount: i32,
    /// Player whose effect injected the correction.
    pub injector: PlayerId,
    pub source: Option<InstanceId>,
    /// Checked at apply time from the injector's perspective.
    pub applies_if: Option<Condition>,
}

impl ParameterCorrection {
    #[must_use]
    pub fn new(
        target: CorrectionTarget,
        direction: Direction,
        kind: CorrectionKind,
        amount: i32,
        injector: PlayerId,
    ) -> Self {
        Self {
            target,
            direction,
            kind,
            amount,
            injector,
            source: None,
            applies_if: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<InstanceId>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Option<Condition>) -> Self {
        self.applies_if = condition;
        self
    }

    /// Whether this correction is aimed at a reserve of this shape.
    #[must_use]
    pub fn matches(&self, target: CorrectionTarget, direction: Direction) -> bool {
        self.target == target && self.direction == direction
    }
}

/// Fold `(kind, amount)` corrections into a signed delta.
pub fn fold_corrections(
    amount: i32,
    corrections: impl IntoIterator<Item = (CorrectionKind, i32)>,
) -> i32 {
    let sign = amount.signum();
    let mut magnitude = amount.abs();
    for (kind, value) in corrections {
        match kind {
            CorrectionKind::Limit => {
                magnitude = magnitude.min(value.max(0));
                break;
            }
            CorrectionKind::Attenuation => magnitude = (magnitude - value).max(0),
            CorrectionKind::Amplification => magnitude += value,
        }
    }
    sign * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_in_declaration_order() {
        let folded = fold_corrections(
            -4,
            [
                (CorrectionKind::Amplification, 2),
                (CorrectionKind::Attenuation, 1),
            ],
        );
        assert_eq!(folded, -5);
    }

    #[test]
    fn test_limit_stops_folding() {
        let folded = fold_corrections(
            -4,
            [
                (CorrectionKind::Limit, 1),
                (CorrectionKind::Amplification, 10),
            ],
        );
        assert_eq!(folded, -1);
    }

    #[test]
    fn test_limit_never_grows_a_change() {
        let folded = fold_corrections(
            -2,
            [
                (CorrectionKind::Attenuation, 1),
                (CorrectionKind::Limit, 5),
            ],
        );
        assert_eq!(folded, -1);
    }

    #[test]
    fn test_no_corrections_is_identity() {
        assert_eq!(fold_corrections(7, []), 7);
        assert_eq!(fold_corrections(0, [(CorrectionKind::Amplification, 3)]), 0);
    }

    #[test]
    fn test_direction_of() {
        assert_eq!(Direction::of(-1), Direction::Decrease);
        assert_eq!(Direction::of(3), Direction::Increase);
    }

    #[test]
    fn test_matches() {
        let correction = ParameterCorrection::new(
            CorrectionTarget::Consciousness,
            Direction::Decrease,
            CorrectionKind::Limit,
            0,
            PlayerId::FIRST,
        );
        assert!(correction.matches(CorrectionTarget::Consciousness, Direction::Decrease));
        assert!(!correction.matches(CorrectionTarget::Consciousness, Direction::Increase));
        assert!(!correction.matches(CorrectionTarget::Scale, Direction::Decrease));
    }
}
