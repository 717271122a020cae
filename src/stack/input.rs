//! Pending player choices.
//!
//! A composite effect that needs a decision returns an `AwaitingInput`
//! token instead of follow-ups. The processor parks it on the state and
//! stops; `rules::resolve_input` turns the player's [`Choice`] back into a
//! concrete effect through [`AwaitingInput::resume`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{GameState, InstanceId, PlayerId};
use crate::effects::{BoundEffect, EffectArgs, EffectKind, SelectionMethod};
use crate::zones::Pile;

/// What kind of decision is pending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    /// Pick a template name; a copy is added to hand.
    CardToAdd,
    /// Pick a card from one of `source_piles`; it moves to `destination`.
    CardFromPile,
    /// Pick up to `count` cards for a card operation.
    CardsForOperation,
    /// Pick a number in `min..=max`.
    Number,
    /// Pick one card for the stored effect.
    CardForEffect,
}

/// The player's answer to an `AwaitingInput`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Template(String),
    Card(InstanceId),
    Cards(Vec<InstanceId>),
    Number(i32),
}

/// A frozen continuation waiting for one player's decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AwaitingInput {
    pub kind: ChoiceKind,
    pub player: PlayerId,
    /// Card whose effect asked.
    pub source: Option<InstanceId>,
    /// Selectable cards.
    pub options: Vec<InstanceId>,
    /// Selectable template names, for `CardToAdd`.
    pub template_options: Vec<String>,
    /// Maximum number of cards for `CardsForOperation`.
    pub count: usize,
    pub min: i32,
    pub max: i32,
    pub source_piles: Vec<Pile>,
    pub destination: Option<Pile>,
    /// Effect re-issued with the choice filled in.
    pub source_effect: Option<Box<BoundEffect>>,
    pub prompt: Option<String>,
}

impl AwaitingInput {
    fn base(kind: ChoiceKind, player: PlayerId, source: Option<InstanceId>) -> Self {
        Self {
            kind,
            player,
            source,
            options: Vec::new(),
            template_options: Vec::new(),
            count: 0,
            min: 0,
            max: 0,
            source_piles: Vec::new(),
            destination: None,
            source_effect: None,
            prompt: None,
        }
    }

    // === Constructors ===

    #[must_use]
    pub fn card_to_add(player: PlayerId, source: Option<InstanceId>, names: Vec<String>) -> Self {
        Self {
            template_options: names,
            ..Self::base(ChoiceKind::CardToAdd, player, source)
        }
    }

    #[must_use]
    pub fn card_from_pile(
        player: PlayerId,
        source: Option<InstanceId>,
        options: Vec<InstanceId>,
        source_piles: Vec<Pile>,
        destination: Pile,
    ) -> Self {
        Self {
            options,
            source_piles,
            destination: Some(destination),
            ..Self::base(ChoiceKind::CardFromPile, player, source)
        }
    }

    /// Ask for up to `count` of `options`, then re-run `effect` with them
    /// pre-selected.
    #[must_use]
    pub fn cards_for_operation(
        player: PlayerId,
        options: Vec<InstanceId>,
        count: usize,
        effect: BoundEffect,
    ) -> Self {
        Self {
            options,
            count,
            source_effect: Some(Box::new(effect.clone())),
            ..Self::base(ChoiceKind::CardsForOperation, player, effect.source)
        }
    }

    #[must_use]
    pub fn number(player: PlayerId, min: i32, max: i32, effect: BoundEffect) -> Self {
        Self {
            min,
            max,
            source_effect: Some(Box::new(effect.clone())),
            ..Self::base(ChoiceKind::Number, player, effect.source)
        }
    }

    #[must_use]
    pub fn card_for_effect(player: PlayerId, options: Vec<InstanceId>, effect: BoundEffect) -> Self {
        Self {
            options,
            source_effect: Some(Box::new(effect.clone())),
            ..Self::base(ChoiceKind::CardForEffect, player, effect.source)
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    // === Continuation ===

    /// Build the effect that carries `choice` forward.
    ///
    /// Returns `None` when the choice does not fit this request.
    #[must_use]
    pub fn resume(&self, state: &GameState, choice: Choice) -> Option<BoundEffect> {
        let effect = match (self.kind, choice) {
            (ChoiceKind::CardToAdd, Choice::Template(name)) => {
                if !self.template_options.contains(&name) {
                    return None;
                }
                let args = EffectArgs::new()
                    .with_player(self.player)
                    .with_template(name)
                    .with_destination(Pile::Hand);
                BoundEffect::new(EffectKind::AddCardToGame, args)
            }
            (ChoiceKind::CardFromPile, Choice::Card(card)) => {
                if !self.options.contains(&card) {
                    return None;
                }
                let (owner, pile) = state.locate(card)?;
                if owner != self.player || !self.source_piles.contains(&pile) {
                    return None;
                }
                let args = EffectArgs::new()
                    .with_player(self.player)
                    .with_card(card)
                    .with_source_pile(pile)
                    .with_destination(self.destination?);
                BoundEffect::new(EffectKind::MoveCard, args)
            }
            (ChoiceKind::CardsForOperation, Choice::Cards(cards)) => {
                if cards.len() > self.count || cards.iter().any(|c| !self.options.contains(c)) {
                    return None;
                }
                let mut effect = (**self.source_effect.as_ref()?).clone();
                effect.args.selection_method = Some(SelectionMethod::PreSelected);
                effect.args.selected_cards = Some(cards);
                effect
            }
            (ChoiceKind::Number, Choice::Number(value)) => {
                if !(self.min..=self.max).contains(&value) {
                    return None;
                }
                let mut effect = (**self.source_effect.as_ref()?).clone();
                effect.args.amount = Some(value);
                effect
            }
            (ChoiceKind::CardForEffect, Choice::Card(card)) => {
                if !self.options.contains(&card) {
                    return None;
                }
                let mut effect = (**self.source_effect.as_ref()?).clone();
                effect.args = effect.args.with_card(card);
                effect
            }
            (kind, choice) => {
                debug!("choice {choice:?} does not answer a {kind:?} request");
                return None;
            }
        };
        Some(effect.with_source(self.source))
    }
}
