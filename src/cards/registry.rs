//! Card database and deck presets.
//!
//! `CardDatabase` is the read-only name → template map a game is built
//! from. It is loaded once, validated at load time and carried inside the
//! game state so effects can stamp new instances by name.
//!
//! ## Validation
//!
//! Loading rejects, with a `DataError`:
//! - unknown trigger or effect kinds and unknown argument names (serde)
//! - a map key that differs from the template's `name`
//! - negative required scale, or a wealth card without positive durability
//! - an effect missing an argument its kind requires
//! - an argument naming a template that does not exist

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardTemplate, CardType};
use crate::core::error::DataError;
use crate::effects::EffectDescriptor;

/// Registry of card templates keyed by name.
///
/// ## Example
///
/// ```
/// use ideology_ccg::cards::CardDatabase;
///
/// let db = CardDatabase::from_json_str(
///     r#"{"農場": {"name": "農場", "card_type": "財", "required_scale": 2, "durability": 3}}"#,
/// ).unwrap();
///
/// assert_eq!(db.get("農場").unwrap().durability, Some(3));
/// assert!(db.get("missing").is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDatabase {
    templates: OrdMap<String, CardTemplate>,
}

impl CardDatabase {
    /// Create a new empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and validate a database from templates.
    pub fn from_templates(
        templates: impl IntoIterator<Item = CardTemplate>,
    ) -> Result<Self, DataError> {
        let db = Self {
            templates: templates
                .into_iter()
                .map(|t| (t.name.clone(), t))
                .collect(),
        };
        db.validate()?;
        Ok(db)
    }

    /// Parse a JSON object of `name → template` and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let raw: OrdMap<String, CardTemplate> = serde_json::from_str(json)?;
        for (key, template) in &raw {
            if *key != template.name {
                return Err(DataError::InvalidCard {
                    card: key.clone(),
                    reason: format!("key does not match template name '{}'", template.name),
                });
            }
        }
        let db = Self { templates: raw };
        db.validate()?;
        Ok(db)
    }

    /// Check every template against the rules listed in the module docs.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.templates.is_empty() {
            return Err(DataError::EmptyDatabase);
        }

        for (name, template) in &self.templates {
            if template.required_scale < 0 {
                return Err(DataError::InvalidCard {
                    card: name.clone(),
                    reason: "required_scale must not be negative".to_string(),
                });
            }
            if template.card_type == CardType::Wealth && template.base_durability() <= 0 {
                return Err(DataError::InvalidCard {
                    card: name.clone(),
                    reason: "wealth cards need a positive durability".to_string(),
                });
            }
            for descriptor in template.triggers.values().flatten() {
                self.validate_descriptor(name, descriptor)?;
            }
        }
        Ok(())
    }

    fn validate_descriptor(&self, card: &str, descriptor: &EffectDescriptor) -> Result<(), DataError> {
        descriptor
            .check_args()
            .map_err(|reason| DataError::InvalidCard {
                card: card.to_string(),
                reason,
            })?;
        for referenced in descriptor.referenced_templates() {
            if !self.contains(referenced) {
                return Err(DataError::UnknownReference {
                    card: card.to_string(),
                    referenced: referenced.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Get a template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CardTemplate> {
        self.templates.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over templates in name order.
    pub fn iter(&self) -> impl Iterator<Item = &CardTemplate> {
        self.templates.values()
    }
}

/// A named deck list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckPreset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Template names, one entry per copy.
    pub cards: Vec<String>,
}

impl DeckPreset {
    #[must_use]
    pub fn new(name: impl Into<String>, cards: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            cards: cards.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a JSON array of presets.
    pub fn list_from_json_str(json: &str) -> Result<Vec<Self>, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject a deck that lists a card the database does not know.
    pub fn validate(&self, db: &CardDatabase) -> Result<(), DataError> {
        match self.cards.iter().find(|name| !db.contains(name)) {
            Some(card) => Err(DataError::UnknownDeckCard {
                deck: self.name.clone(),
                card: card.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_lookup() {
        let db = CardDatabase::from_json_str(
            r#"{
                "農場": {"name": "農場", "card_type": "WEALTH", "required_scale": 2, "durability": 3},
                "革命": {"name": "革命", "card_type": "EVENT", "required_scale": 5}
            }"#,
        )
        .unwrap();

        assert_eq!(db.len(), 2);
        let names: Vec<_> = db.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(db.contains("革命"));
    }

    #[test]
    fn test_rejects_mismatched_key() {
        let err = CardDatabase::from_json_str(
            r#"{"a": {"name": "b", "card_type": "EVENT"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidCard { .. }));
    }

    #[test]
    fn test_rejects_wealth_without_durability() {
        let err = CardDatabase::from_json_str(
            r#"{"a": {"name": "a", "card_type": "WEALTH", "required_scale": 1}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("durability"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            CardDatabase::from_json_str("{}"),
            Err(DataError::EmptyDatabase)
        ));
    }

    #[test]
    fn test_deck_preset_validation() {
        let db = CardDatabase::from_templates([CardTemplate::new("革命", CardType::Event)]).unwrap();

        assert!(DeckPreset::new("ok", ["革命", "革命"]).validate(&db).is_ok());
        let err = DeckPreset::new("bad", ["革命", "幻"]).validate(&db).unwrap_err();
        assert!(matches!(err, DataError::UnknownDeckCard { ref card, .. } if card == "幻"));
    }

    #[test]
    fn test_preset_list_from_json() {
        let presets = DeckPreset::list_from_json_str(
            r#"[{"name": "test_deck", "description": "minimal", "cards": []}]"#,
        )
        .unwrap();
        assert_eq!(presets[0].name, "test_deck");
        assert!(presets[0].cards.is_empty());
    }
}
