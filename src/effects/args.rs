//! Effect arguments and the reference expressions they carry.
//!
//! Card data refers to players and cards relative to the reacting card
//! (`"self"`, `"opponent"`, `"front"`, ...). The dispatcher binds these
//! expressions once, when a reaction is enqueued, replacing them with
//! literal `Player(..)` / `Id(..)` values. Handlers only ever see bound
//! arguments, except for the few expressions that must be evaluated at
//! execution time (`draw_from_deck`, temp values, percentages).

use serde::{Deserialize, Serialize};

use super::correction::{CorrectionKind, CorrectionTarget, Direction};
use super::effect::{EffectDescriptor, EffectKind};
use crate::cards::CardType;
use crate::core::{InstanceId, PlayerId};
use crate::triggers::Condition;
use crate::zones::{Pile, ZonePosition};

/// A player, relative to the reacting card's owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerRef {
    #[serde(rename = "self")]
    Owner,
    Opponent,
    /// Either player, drawn from the game RNG.
    Random,
    /// Owner of the card that caused the triggering event.
    Source,
    Player(PlayerId),
}

/// A set of players, relative to the reacting card's owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSet {
    #[serde(rename = "self")]
    Owner,
    Opponent,
    SelfAndOpponent,
    Players(Vec<PlayerId>),
}

/// A card, relative to the reacting card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRef {
    /// The reacting card itself.
    #[serde(rename = "self")]
    This,
    /// The triggering event's subject.
    Target,
    /// The card that caused the triggering event.
    Source,
    /// First card revealed by the last expose effect.
    Exposed,
    SelfIdeology,
    OpponentIdeology,
    /// First scale token on the owner's field.
    #[serde(alias = "self_money_on_field")]
    SelfScaleToken,
    /// Opponent card at the same field index as this one.
    Front,
    /// Opponent's leftmost field card.
    LeftOpponent,
    /// Top of the player's deck, taken when the effect executes.
    DrawFromDeck,
    Id(InstanceId),
}

/// Derived amount, computed from the reacting card's point of view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSource {
    SelfDurability,
    /// Signed amount of the triggering event.
    TriggerAmount,
    /// Magnitude of a negative triggering amount, 0 otherwise.
    TriggerDamage,
    FieldWealthCount,
    OpponentFieldWealthCount,
    DiscardCount,
    HandCount,
    ScaleTokenDurability,
    /// Owner's field limit minus the opponent's.
    FieldLimitDiff,
    CardsPlayedThisTurn,
    /// Scratch value stored by an earlier effect. Read at execution time.
    Temp(String),
}

/// Derived starting durability for created cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurabilitySource {
    TriggerAmount,
    TriggerDamage,
    /// Owner's scale, at least 1.
    Scale,
    /// Percentage of the owner's scale, rounded down, at least 1.
    ScalePercentage(i32),
    FieldWealthCountPlusOne,
    /// Summed durability of the owner's field wealth.
    FieldWealthTotal,
}

/// Player resource used by thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Consciousness,
    Scale,
}

/// How `PROCESS_CARD_OPERATION` picks cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    All,
    Random,
    HighestRequiredScale,
    LowestDurability,
    Top,
    Bottom,
    /// Ask the player.
    Choice,
    /// Use `selected_cards`.
    PreSelected,
}

/// What `PROCESS_CARD_OPERATION` does to each picked card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardOperation {
    ModifyDurability,
    ModifyRequiredScale,
    Move,
    Remove,
    GenerateCard,
}

/// Flat argument bag shared by every effect kind.
///
/// Unknown keys are rejected at load time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectArgs {
    // === Players ===
    pub player_id: Option<PlayerRef>,
    pub target_player_id: Option<PlayerRef>,
    pub player_ids: Option<PlayerSet>,

    // === Cards ===
    pub card_id: Option<CardRef>,
    pub selected_cards: Option<Vec<InstanceId>>,
    pub card_template_name: Option<String>,
    pub card_if_above: Option<String>,
    pub card_if_below: Option<String>,
    /// Template names offered by a choice.
    pub options: Option<Vec<String>>,
    pub card_type: Option<CardType>,
    pub card_type_to_discard: Option<CardType>,

    // === Amounts ===
    pub amount: Option<i32>,
    pub amount_from: Option<AmountSource>,
    /// Negate the derived amount.
    pub negate: bool,
    pub amount_percentage: Option<i32>,
    /// Temp key receiving the magnitude of a percentage reserve.
    pub store_key: Option<String>,
    pub count: Option<u32>,
    pub initial_durability: Option<i32>,
    pub durability_from: Option<DurabilitySource>,
    pub min_value: Option<i32>,
    /// Set the value instead of adding to it.
    pub set_value: bool,
    pub threshold: Option<i32>,
    pub condition_target: Option<Resource>,
    pub percent_decrease: Option<i32>,
    pub percent_increase: Option<i32>,
    pub scale_reduction: Option<i32>,
    pub scale_reduction_percentage: Option<i32>,
    pub counter_damage: Option<i32>,
    /// Extra scale gained when the chosen card is a scale token.
    pub bonus_scale_if_token: Option<i32>,
    /// Minimum scale-token durability for the turn-start cash-in.
    pub require_durability_at_least: Option<i32>,

    // === Piles ===
    /// Source pile. Absent means wherever the card currently is.
    pub source_pile: Option<Pile>,
    pub source_piles: Option<Vec<Pile>>,
    pub destination_pile: Option<Pile>,
    pub position: Option<ZonePosition>,
    /// Keep durability and required scale when moving to hand or deck.
    pub maintain: bool,
    /// Skip creation when the field already holds `field_limit` wealth.
    pub respect_field_limit: bool,

    // === Operations ===
    pub operation: Option<CardOperation>,
    pub selection_method: Option<SelectionMethod>,
    /// Temp key receiving the number of selected cards.
    pub store_count_key: Option<String>,

    // === Corrections ===
    pub correct_target: Option<CorrectionTarget>,
    pub correct_direction: Option<Direction>,
    pub correct_type: Option<CorrectionKind>,
    pub applies_if: Option<Condition>,

    // === Misc ===
    /// Kind registered by `SKIP_EFFECT`.
    pub effect_type: Option<EffectKind>,
    /// Effect enqueued after a composite finishes.
    pub next_effect: Option<Box<EffectDescriptor>>,
}

impl EffectArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Bound Accessors ===

    /// Literal player, once bound.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self.player_id {
            Some(PlayerRef::Player(id)) => Some(id),
            _ => None,
        }
    }

    /// Literal target player, once bound.
    #[must_use]
    pub fn target_player(&self) -> Option<PlayerId> {
        match self.target_player_id {
            Some(PlayerRef::Player(id)) => Some(id),
            _ => None,
        }
    }

    /// Literal player list, once bound.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        match &self.player_ids {
            Some(PlayerSet::Players(ids)) => ids.clone(),
            _ => self.player().into_iter().collect(),
        }
    }

    /// Literal card, once bound.
    #[must_use]
    pub fn card(&self) -> Option<InstanceId> {
        match self.card_id {
            Some(CardRef::Id(id)) => Some(id),
            _ => None,
        }
    }

    // === Builders ===

    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player_id = Some(PlayerRef::Player(player));
        self
    }

    #[must_use]
    pub fn with_target_player(mut self, player: PlayerId) -> Self {
        self.target_player_id = Some(PlayerRef::Player(player));
        self
    }

    #[must_use]
    pub fn with_players(mut self, players: Vec<PlayerId>) -> Self {
        self.player_ids = Some(PlayerSet::Players(players));
        self
    }

    #[must_use]
    pub fn with_card(mut self, card: InstanceId) -> Self {
        self.card_id = Some(CardRef::Id(card));
        self
    }

    #[must_use]
    pub fn with_card_ref(mut self, card: CardRef) -> Self {
        self.card_id = Some(card);
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.card_template_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_destination(mut self, pile: Pile) -> Self {
        self.destination_pile = Some(pile);
        self
    }

    #[must_use]
    pub fn with_source_pile(mut self, pile: Pile) -> Self {
        self.source_pile = Some(pile);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: ZonePosition) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_durability(mut self, durability: i32) -> Self {
        self.initial_durability = Some(durability);
        self
    }

    #[must_use]
    pub fn maintaining(mut self) -> Self {
        self.maintain = true;
        self
    }

    #[must_use]
    pub fn with_correction(
        mut self,
        target: CorrectionTarget,
        direction: Direction,
        kind: CorrectionKind,
    ) -> Self {
        self.correct_target = Some(target);
        self.correct_direction = Some(direction);
        self.correct_type = Some(kind);
        self
    }

    /// Template names these arguments refer to, including chained effects.
    #[must_use]
    pub fn referenced_templates(&self) -> Vec<&str> {
        let mut names: Vec<&str> = [&self.card_template_name, &self.card_if_above, &self.card_if_below]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if let Some(options) = &self.options {
            names.extend(options.iter().map(String::as_str));
        }
        if let Some(next) = &self.next_effect {
            names.extend(next.referenced_templates());
        }
        names
    }
}
