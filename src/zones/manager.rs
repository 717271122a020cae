//! Pile bookkeeping for card locations and movement.
//!
//! Every player owns six piles: hand, deck, field, discard, the ideology
//! slot (at most one card) and `resolving` for events mid-play. Piles hold
//! instance ids in order, index 0 being the top. An instance's `location`
//! and `owner` always name the pile that holds it; the operations here keep
//! both sides in step.
//!
//! These are raw moves. They emit no events; the effect handlers that call
//! them are responsible for broadcasting.

use serde::{Deserialize, Serialize};

use crate::cards::Location;
use crate::core::entity::InstanceId;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

/// A player's pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pile {
    Hand,
    Deck,
    Field,
    #[serde(alias = "discard_pile")]
    Discard,
    Ideology,
    Resolving,
}

impl Pile {
    /// All piles, in the order integrity checks walk them.
    pub const ALL: [Pile; 6] = [
        Pile::Ideology,
        Pile::Field,
        Pile::Resolving,
        Pile::Hand,
        Pile::Deck,
        Pile::Discard,
    ];

    /// Where a card lands when the effect names no position.
    #[must_use]
    pub const fn default_position(self) -> ZonePosition {
        match self {
            Pile::Deck => ZonePosition::Random,
            _ => ZonePosition::Bottom,
        }
    }
}

/// Position for inserting a card into a pile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZonePosition {
    /// Index 0 (e.g., top of deck).
    Top,
    /// After the last card.
    Bottom,
    /// Uniformly random slot, drawn from the game RNG.
    Random,
    /// Insert at specific index, clamped to the pile length.
    Index(usize),
}

impl GameState {
    /// Cards in a player's pile, top first.
    #[must_use]
    pub fn pile(&self, player: PlayerId, pile: Pile) -> &[InstanceId] {
        let state = &self.players[player];
        match pile {
            Pile::Hand => &state.hand,
            Pile::Deck => &state.deck,
            Pile::Field => &state.field,
            Pile::Discard => &state.discard,
            Pile::Resolving => &state.resolving,
            Pile::Ideology => state.ideology.as_slice(),
        }
    }

    fn pile_vec_mut(&mut self, player: PlayerId, pile: Pile) -> Option<&mut Vec<InstanceId>> {
        let state = &mut self.players[player];
        match pile {
            Pile::Hand => Some(&mut state.hand),
            Pile::Deck => Some(&mut state.deck),
            Pile::Field => Some(&mut state.field),
            Pile::Discard => Some(&mut state.discard),
            Pile::Resolving => Some(&mut state.resolving),
            Pile::Ideology => None,
        }
    }

    /// Where an instance is, checked against the pile contents.
    #[must_use]
    pub fn locate(&self, id: InstanceId) -> Option<(PlayerId, Pile)> {
        let card = self.card(id)?;
        let pile = card.location.pile()?;
        self.pile(card.owner, pile)
            .contains(&id)
            .then_some((card.owner, pile))
    }

    /// Take an instance out of whatever pile holds it.
    ///
    /// Returns the pile and index it was taken from. The instance's
    /// location becomes `Removed` until it is inserted somewhere.
    pub fn detach(&mut self, id: InstanceId) -> Option<(PlayerId, Pile, usize)> {
        let (player, pile) = self.locate(id)?;
        let index = match self.pile_vec_mut(player, pile) {
            Some(cards) => {
                let index = cards.iter().position(|&c| c == id)?;
                cards.remove(index);
                index
            }
            None => {
                self.players[player].ideology = None;
                0
            }
        };
        if let Some(card) = self.card_mut(id) {
            card.location = Location::Removed;
        }
        Some((player, pile, index))
    }

    /// Insert a detached instance into a pile, transferring ownership to
    /// `player`.
    ///
    /// Inserting into an occupied ideology slot pushes the previous
    /// ideology to the bottom of that player's discard and returns it.
    pub fn insert_into_pile(
        &mut self,
        id: InstanceId,
        player: PlayerId,
        pile: Pile,
        position: ZonePosition,
    ) -> Option<InstanceId> {
        let mut displaced = None;
        if pile == Pile::Ideology {
            displaced = self.players[player].ideology.replace(id);
            if let Some(prev) = displaced {
                self.players[player].discard.push(prev);
                if let Some(card) = self.card_mut(prev) {
                    card.location = Location::Discard;
                }
            }
        } else {
            let len = self.pile(player, pile).len();
            let index = match position {
                ZonePosition::Top => 0,
                ZonePosition::Bottom => len,
                ZonePosition::Random => self.rng.gen_range_usize(0..len + 1),
                ZonePosition::Index(i) => i.min(len),
            };
            if let Some(cards) = self.pile_vec_mut(player, pile) {
                cards.insert(index, id);
            }
        }
        if let Some(card) = self.card_mut(id) {
            card.owner = player;
            card.location = Location::from(pile);
        }
        displaced
    }

    /// Detach an instance and mark it removed from the game.
    pub fn remove_from_game(&mut self, id: InstanceId) -> bool {
        self.detach(id).is_some()
    }

    /// Top card of a player's deck.
    #[must_use]
    pub fn deck_top(&self, player: PlayerId) -> Option<InstanceId> {
        self.players[player].deck.first().copied()
    }

    pub fn shuffle_deck(&mut self, player: PlayerId) {
        let mut deck = std::mem::take(&mut self.players[player].deck);
        self.rng.shuffle(&mut deck);
        self.players[player].deck = deck;
    }
}
