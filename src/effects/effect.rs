//! Effect kinds, descriptors and bound invocations.
//!
//! - `EffectKind`: the closed vocabulary of effects, as named in card data
//! - `EffectDescriptor`: one entry of a card's trigger table
//! - `BoundEffect`: a descriptor whose references have been resolved for a
//!   particular reacting card, ready to sit in the queue

use serde::{Deserialize, Serialize};

use super::args::{AmountSource, EffectArgs};
use crate::core::{InstanceId, PlayerId};
use crate::triggers::{Condition, TriggerKind};

/// Closed set of effect kinds.
///
/// ## Primitive Effects
///
/// Act directly on state: card movement and creation, resource changes,
/// the reserve pipeline, corrections and skips.
///
/// ## Composite Effects
///
/// The `PROCESS_*` kinds select targets and expand into primitive
/// follow-ups, or pause for player input. A `*_RESOLVED` kind is the
/// continuation a choice resumes into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    // === Play ===
    PlayerAction,

    // === Cards ===
    DrawCard,
    MoveCard,
    AddCardToGame,
    RemoveCardFromGame,
    ModifyCardDurability,
    ModifyCardRequiredScale,

    // === Resources ===
    ModifyConsciousness,
    ModifyScale,
    SetConsciousness,
    SetScale,
    ModifyFieldLimit,

    // === Reserve Pipeline ===
    ModifyConsciousnessReserve,
    ModifyScaleReserve,
    ModifyCardDurabilityReserve,
    AddModifyParameterCorrection,

    // === Control ===
    SkipEffect,

    // === Composite ===
    ProcessCardOperation,
    ProcessDealDamageToAllWealth,
    ProcessAllWealthBoost,
    ProcessChooseAndDiscardIdeology,
    ProcessChooseAndDiscardIdeologyResolved,
    ProcessDiscardAllHandWealthCardsAndDraw,
    ProcessMoveHandWealthToDeckAndDraw,
    ProcessExposeCardByType,
    ProcessDiscardAllIdeologyFromHandAndDeck,
    ProcessSetAllScaleToZeroAndReduceConsciousness,
    ProcessMoneyCardPlacementEffect,
    ProcessMoneyCardTurnStartEffect,
    ProcessDiscardAllHandIdeologyAndAddMoney,
    ProcessModifyMoneyDurabilityRandom,
    ProcessReduceMoneyDurabilityAndGainScale,
    ProcessReduceMoneyDurabilityAndGainScaleResolved,
    ProcessAddMoneyTokenBasedOnCardsPlayed,
    ProcessMoneyDurabilityBasedCountModifyCardDurability,
    ProcessAddCardsBasedOnDiscardedCount,
    ProcessAddChoiceCardToHand,
    ProcessChooseAndMoveCardFromPile,
    ProcessChooseAndModifyDurabilityToWealth,
    ProcessChooseAndModifyDurabilityToWealthResolved,
    ProcessChooseAndBounceToWealth,
    ProcessChooseAndBounceToWealthResolved,
    ProcessReturnLargestRequiredScaleCardToDeck,
    ProcessDrawRandomCardAndModifyRequiredScale,
    ProcessCounterAttack,
    ProcessAddCardConditional,
    ProcessAddCardConditionalOnDeckCount,
}

impl EffectKind {
    /// Whether this is one of the `PROCESS_*` kinds.
    #[must_use]
    pub fn is_composite(self) -> bool {
        self >= EffectKind::ProcessCardOperation
    }

    /// Check that `args` carries what this kind needs.
    fn check_args(self, args: &EffectArgs) -> Result<(), String> {
        use EffectKind::*;
        let has_amount = args.amount.is_some() || args.amount_from.is_some();
        let has_reserve_amount = has_amount || args.amount_percentage.is_some();
        let missing = match self {
            PlayerAction => need(args.player_id.is_some(), "player_id")
                .or(need(args.card_id.is_some(), "card_id")),
            DrawCard => need(args.player_id.is_some(), "player_id"),
            MoveCard => need(args.card_id.is_some(), "card_id")
                .or(need(args.destination_pile.is_some(), "destination_pile")),
            AddCardToGame => need(args.card_template_name.is_some(), "card_template_name")
                .or(need(args.destination_pile.is_some(), "destination_pile")),
            RemoveCardFromGame => need(args.card_id.is_some(), "card_id"),
            ModifyCardDurability => need(args.card_id.is_some(), "card_id")
                .or(need(has_amount, "amount")),
            ModifyCardRequiredScale => need(args.card_id.is_some(), "card_id")
                .or(need(has_amount, "amount")),
            ModifyConsciousness | ModifyScale | SetConsciousness | SetScale | ModifyFieldLimit => {
                need(args.player_id.is_some(), "player_id").or(need(has_amount, "amount"))
            }
            ModifyConsciousnessReserve | ModifyScaleReserve => {
                need(args.player_id.is_some(), "player_id").or(need(has_reserve_amount, "amount"))
            }
            ModifyCardDurabilityReserve => {
                need(args.card_id.is_some(), "card_id").or(need(has_reserve_amount, "amount"))
            }
            AddModifyParameterCorrection => need(args.player_id.is_some(), "player_id")
                .or(need(args.correct_target.is_some(), "correct_target"))
                .or(need(args.correct_direction.is_some(), "correct_direction"))
                .or(need(args.correct_type.is_some(), "correct_type"))
                .or(need(has_amount, "amount")),
            SkipEffect => need(args.effect_type.is_some(), "effect_type")
                .or(need(args.player_id.is_some(), "player_id")),
            ProcessCardOperation => need(args.operation.is_some(), "operation"),
            ProcessDealDamageToAllWealth => need(args.player_ids.is_some(), "player_ids")
                .or(need(has_amount, "amount")),
            ProcessAllWealthBoost => need(has_amount, "amount"),
            ProcessExposeCardByType => need(args.card_type.is_some(), "card_type"),
            ProcessAddCardsBasedOnDiscardedCount => {
                need(args.card_template_name.is_some(), "card_template_name")
                    .or(need(args.card_type_to_discard.is_some(), "card_type_to_discard"))
            }
            ProcessAddChoiceCardToHand => need(args.options.is_some(), "options"),
            ProcessChooseAndMoveCardFromPile => need(args.source_piles.is_some(), "source_piles")
                .or(need(args.destination_pile.is_some(), "destination_pile")),
            ProcessAddCardConditional => need(args.condition_target.is_some(), "condition_target")
                .or(need(args.threshold.is_some(), "threshold"))
                .or(need(args.card_template_name.is_some(), "card_template_name")),
            ProcessAddCardConditionalOnDeckCount => need(args.threshold.is_some(), "threshold")
                .or(need(args.card_if_above.is_some(), "card_if_above"))
                .or(need(args.card_if_below.is_some(), "card_if_below")),
            ProcessDrawRandomCardAndModifyRequiredScale => need(
                args.scale_reduction.is_some() || args.scale_reduction_percentage.is_some(),
                "scale_reduction",
            ),
            ProcessModifyMoneyDurabilityRandom => {
                need(args.percent_decrease.is_some(), "percent_decrease")
                    .or(need(args.percent_increase.is_some(), "percent_increase"))
            }
            ProcessCounterAttack => need(args.counter_damage.is_some(), "counter_damage"),
            _ => None,
        };
        match missing {
            Some(arg) => Err(format!("{self:?} requires '{arg}'")),
            None => Ok(()),
        }
    }
}

fn need(present: bool, name: &'static str) -> Option<&'static str> {
    (!present).then_some(name)
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// One entry of a card's trigger table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub effect_type: EffectKind,

    #[serde(default)]
    pub args: EffectArgs,

    /// Bind-time condition from the reacting card's point of view.
    #[serde(default)]
    pub condition: Option<Condition>,

    /// Run only if the nearest preceding unflagged descriptor did not
    /// succeed.
    #[serde(default)]
    pub on_failure_of_previous: bool,
}

impl EffectDescriptor {
    #[must_use]
    pub fn new(effect_type: EffectKind, args: EffectArgs) -> Self {
        Self {
            effect_type,
            args,
            condition: None,
            on_failure_of_previous: false,
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    #[must_use]
    pub fn on_failure(mut self) -> Self {
        self.on_failure_of_previous = true;
        self
    }

    /// Validate the arguments against the kind, recursing into
    /// `next_effect`.
    pub fn check_args(&self) -> Result<(), String> {
        self.effect_type.check_args(&self.args)?;
        if let Some(AmountSource::Temp(key)) = &self.args.amount_from {
            if key.is_empty() {
                return Err("temp amount needs a key".to_string());
            }
        }
        match &self.args.next_effect {
            Some(next) => next.check_args(),
            None => Ok(()),
        }
    }

    /// Template names this descriptor refers to.
    #[must_use]
    pub fn referenced_templates(&self) -> Vec<&str> {
        self.args.referenced_templates()
    }
}

/// A queued effect invocation with bound arguments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundEffect {
    pub kind: EffectKind,
    pub args: EffectArgs,

    /// Card whose trigger produced this effect, if any.
    pub source: Option<InstanceId>,

    /// Trigger the effect reacted to.
    pub trigger: Option<TriggerKind>,

    /// Enqueued in order when this effect does not succeed.
    pub fallbacks: Vec<BoundEffect>,
}

impl BoundEffect {
    /// An engine-issued effect with no source card.
    #[must_use]
    pub fn new(kind: EffectKind, args: EffectArgs) -> Self {
        Self {
            kind,
            args,
            source: None,
            trigger: None,
            fallbacks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<InstanceId>) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, trigger: TriggerKind) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn with_fallbacks(mut self, fallbacks: Vec<BoundEffect>) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Player a `SKIP_EFFECT` registration is matched against.
    #[must_use]
    pub fn skip_player(&self) -> Option<PlayerId> {
        self.args.player().or_else(|| self.args.target_player())
    }
}
