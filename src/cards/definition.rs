//! Card templates - static card data.
//!
//! `CardTemplate` holds the immutable properties of a card: its type, the
//! scale needed to play it, its printed durability and the trigger table
//! mapping each `TriggerKind` to an ordered list of effect descriptors.
//!
//! Instance-specific data (current durability, location) is stored
//! separately in `CardInstance`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effects::EffectDescriptor;
use crate::triggers::TriggerKind;

/// The three card types.
///
/// Card data may use the English tags or the Japanese names of the
/// original game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardType {
    /// Field-resident cards with durability.
    #[serde(rename = "WEALTH", alias = "財")]
    Wealth,
    /// Occupies the single ideology slot.
    #[serde(rename = "IDEOLOGY", alias = "イデオロギー")]
    Ideology,
    /// Resolves once and goes to discard.
    #[serde(rename = "EVENT", alias = "事象")]
    Event,
}

impl CardType {
    /// Whether cards of this type stay in play after being played.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        matches!(self, CardType::Wealth | CardType::Ideology)
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CardType::Wealth => "WEALTH",
            CardType::Ideology => "IDEOLOGY",
            CardType::Event => "EVENT",
        };
        f.write_str(label)
    }
}

/// Static card template.
///
/// ## Example
///
/// ```
/// use ideology_ccg::cards::{CardTemplate, CardType};
///
/// let farm = CardTemplate::new("農場", CardType::Wealth)
///     .with_required_scale(2)
///     .with_durability(3);
///
/// assert_eq!(farm.required_scale, 2);
/// assert_eq!(farm.durability, Some(3));
/// assert!(farm.triggers.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub name: String,
    pub card_type: CardType,

    #[serde(default)]
    pub required_scale: i32,

    /// Printed durability. Wealth cards must have one.
    #[serde(default)]
    pub durability: Option<i32>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub triggers: BTreeMap<TriggerKind, Vec<EffectDescriptor>>,

    // === Flags ===
    /// Created by effects rather than built into decks.
    #[serde(default)]
    pub is_token: bool,

    /// Field durability counts toward effective scale, and the card keeps
    /// its durability when it returns to hand.
    #[serde(default)]
    pub scale_token: bool,

    /// Card types the owner may not play while this card is their ideology.
    #[serde(default)]
    pub bans: Vec<CardType>,

    /// Broadcast triggers also fire while the card is in its owner's hand.
    #[serde(default)]
    pub reacts_from_hand: bool,

    /// An event that stays in `resolving` instead of going to discard.
    #[serde(default)]
    pub persists_after_play: bool,
}

impl CardTemplate {
    /// Create a template with no triggers.
    #[must_use]
    pub fn new(name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            name: name.into(),
            card_type,
            required_scale: 0,
            durability: None,
            description: String::new(),
            triggers: BTreeMap::new(),
            is_token: false,
            scale_token: false,
            bans: Vec::new(),
            reacts_from_hand: false,
            persists_after_play: false,
        }
    }

    #[must_use]
    pub fn with_required_scale(mut self, scale: i32) -> Self {
        self.required_scale = scale;
        self
    }

    #[must_use]
    pub fn with_durability(mut self, durability: i32) -> Self {
        self.durability = Some(durability);
        self
    }

    /// Append descriptors to a trigger's list.
    #[must_use]
    pub fn with_trigger(
        mut self,
        kind: TriggerKind,
        effects: impl IntoIterator<Item = EffectDescriptor>,
    ) -> Self {
        self.triggers.entry(kind).or_default().extend(effects);
        self
    }

    #[must_use]
    pub fn as_token(mut self) -> Self {
        self.is_token = true;
        self
    }

    #[must_use]
    pub fn with_ban(mut self, card_type: CardType) -> Self {
        self.bans.push(card_type);
        self
    }

    /// Descriptors declared for a trigger kind.
    #[must_use]
    pub fn effects_for(&self, kind: TriggerKind) -> &[EffectDescriptor] {
        self.triggers.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Printed durability, or 0 for cards without one.
    #[must_use]
    pub fn base_durability(&self) -> i32 {
        self.durability.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_type_accepts_japanese_names() {
        let wealth: CardType = serde_json::from_str("\"財\"").unwrap();
        let ideology: CardType = serde_json::from_str("\"イデオロギー\"").unwrap();
        let event: CardType = serde_json::from_str("\"EVENT\"").unwrap();

        assert_eq!(wealth, CardType::Wealth);
        assert_eq!(ideology, CardType::Ideology);
        assert_eq!(event, CardType::Event);
        assert_eq!(serde_json::to_string(&CardType::Wealth).unwrap(), "\"WEALTH\"");
    }

    #[test]
    fn test_template_defaults_from_json() {
        let template: CardTemplate =
            serde_json::from_str(r#"{"name": "x", "card_type": "EVENT"}"#).unwrap();

        assert_eq!(template.required_scale, 0);
        assert!(template.durability.is_none());
        assert!(template.bans.is_empty());
        assert!(template.effects_for(TriggerKind::PlayEventThis).is_empty());
    }

    #[test]
    fn test_template_builder() {
        let template = CardTemplate::new("原始共産制", CardType::Ideology)
            .with_ban(CardType::Wealth)
            .with_required_scale(4);

        assert_eq!(template.bans, vec![CardType::Wealth]);
        assert_eq!(template.base_durability(), 0);
        assert!(CardType::Ideology.is_permanent());
        assert!(!CardType::Event.is_permanent());
    }
}
