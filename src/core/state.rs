//! Game state.
//!
//! ## PlayerState
//!
//! One seat's resources and piles:
//! - Consciousness, scale, field limit, hand capacity
//! - Ordered piles: hand, deck, field, discard, resolving
//! - The single ideology slot
//! - Pending parameter corrections
//!
//! ## GameState
//!
//! The complete, serializable game:
//! - Both players plus the global instance index
//! - Effect queue and the pending input request
//! - Turn counters and processing flags
//! - Append-only log and animation sinks
//! - RNG, card database and rules configuration
//!
//! Piles store `InstanceId`s only; the instance data lives in the index.
//! Index 0 of every pile is its top.

use std::collections::VecDeque;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::RulesConfig;
use super::entity::InstanceId;
use super::error::EngineError;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{CardDatabase, CardInstance, CardTemplate, CardType, Location};
use crate::effects::{EffectKind, ParameterCorrection};
use crate::stack::{AwaitingInput, QueueEntry};
use crate::zones::Pile;

/// Per-player resources and piles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    // === Identity ===
    pub id: PlayerId,
    pub name: String,

    // === Resources ===
    pub consciousness: i32,
    pub scale: i32,
    /// Wealth slots on the field.
    pub field_limit: i32,
    /// Cards entering a hand this full are diverted to discard.
    pub hand_capacity: usize,

    // === Piles ===
    pub ideology: Option<InstanceId>,
    pub hand: Vec<InstanceId>,
    pub deck: Vec<InstanceId>,
    pub field: Vec<InstanceId>,
    pub discard: Vec<InstanceId>,
    /// Event cards currently being played.
    pub resolving: Vec<InstanceId>,

    // === Transient ===
    /// Corrections waiting for the next reserve on this player.
    pub corrections: Vec<ParameterCorrection>,
    pub cards_played_this_turn: u32,
    pub last_played_card_id: Option<InstanceId>,
}

impl PlayerState {
    /// Create an empty seat with the configured starting resources.
    #[must_use]
    pub fn new(id: PlayerId, config: &RulesConfig) -> Self {
        Self {
            id,
            name: config.player_names[id.index()].clone(),
            consciousness: config.initial_consciousness,
            scale: config.initial_scale,
            field_limit: config.initial_field_limit,
            hand_capacity: config.max_hand_size,
            ideology: None,
            hand: Vec::new(),
            deck: Vec::new(),
            field: Vec::new(),
            discard: Vec::new(),
            resolving: Vec::new(),
            corrections: Vec::new(),
            cards_played_this_turn: 0,
            last_played_card_id: None,
        }
    }

    /// Whether the hand has room for another card.
    #[must_use]
    pub fn hand_has_room(&self) -> bool {
        self.hand.len() < self.hand_capacity
    }
}

/// Coarse phase of the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Both players may still exchange their opening hands.
    #[default]
    Mulligan,
    /// Start-of-turn effects are resolving.
    StartTurn,
    /// The current player may play cards.
    Play,
    /// End-of-turn effects are resolving.
    EndTurn,
    GameOver,
}

/// Flags that keep the turn machine consistent while a turn change waits
/// on queued effects or player input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub turn_end_in_progress: bool,
    pub transition_pending: bool,
    /// Player whose input the engine is waiting on.
    pub input_for: Option<PlayerId>,
    /// Nesting depth of reserve pre-phase drains.
    pub reserve_depth: u32,
}

/// Cue for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationCue {
    pub label: String,
    pub source: Option<InstanceId>,
    pub message: Option<String>,
}

impl AnimationCue {
    #[must_use]
    pub fn new(label: impl Into<String>, source: Option<InstanceId>) -> Self {
        Self {
            label: label.into(),
            source,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A one-shot skip registered by `SKIP_EFFECT`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipRegistration {
    pub kind: EffectKind,
    pub player: PlayerId,
}

/// Full game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    // === Players & Cards ===
    pub players: PlayerMap<PlayerState>,

    /// Every instance ever created, including removed ones.
    pub cards: FxHashMap<InstanceId, CardInstance>,

    // === Resolution ===
    pub queue: VecDeque<QueueEntry>,
    pub awaiting_input: Option<AwaitingInput>,
    pub skips: Vec<SkipRegistration>,

    /// Scratch values shared between effects of one resolution chain.
    pub temp: FxHashMap<String, i32>,

    /// Cards revealed by the last expose effect.
    pub exposed_cards: Vec<InstanceId>,

    // === Turn Progression ===
    pub phase: GamePhase,
    pub current_turn: PlayerId,
    pub first_player: PlayerId,
    /// Turn number (starts at 1).
    pub turn_number: u32,
    pub round_number: u32,
    /// 1 for the first player's turn of a round, 2 for the second.
    pub turn_in_round: u8,
    pub status: ProcessingStatus,
    /// Whether each player has made their mulligan decision.
    pub mulligan_done: PlayerMap<bool>,

    // === Outcome ===
    pub game_over: bool,
    pub winner: Option<PlayerId>,

    // === Sinks ===
    pub log: Vector<String>,
    pub animations: Vector<AnimationCue>,

    // === Environment ===
    pub rng: GameRng,
    pub database: CardDatabase,
    pub config: RulesConfig,

    next_instance_id: InstanceId,
}

impl GameState {
    /// Create a state with empty piles and the configured resources.
    ///
    /// Decks are filled by `rules::initialize_game`.
    #[must_use]
    pub fn new(database: CardDatabase, config: RulesConfig) -> Self {
        let players = PlayerMap::new(|id| PlayerState::new(id, &config));
        Self {
            players,
            cards: FxHashMap::default(),
            queue: VecDeque::new(),
            awaiting_input: None,
            skips: Vec::new(),
            temp: FxHashMap::default(),
            exposed_cards: Vec::new(),
            phase: GamePhase::Mulligan,
            current_turn: PlayerId::FIRST,
            first_player: PlayerId::FIRST,
            turn_number: 1,
            round_number: 1,
            turn_in_round: 1,
            status: ProcessingStatus::default(),
            mulligan_done: PlayerMap::with_value(false),
            game_over: false,
            winner: None,
            log: Vector::new(),
            animations: Vector::new(),
            rng: GameRng::new(config.seed),
            database,
            config,
            next_instance_id: InstanceId::new(1),
        }
    }

    // === Players ===

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        &mut self.players[id]
    }

    // === Instances ===

    /// Allocate a fresh instance id.
    pub fn alloc_instance_id(&mut self) -> InstanceId {
        let id = self.next_instance_id;
        self.next_instance_id = id.next();
        id
    }

    /// Stamp a new instance of `template` into the index, outside every pile.
    ///
    /// Returns `None` when the database has no such template.
    pub fn create_instance(&mut self, template: &str, owner: PlayerId) -> Option<InstanceId> {
        let template = self.database.get(template)?.clone();
        let id = self.alloc_instance_id();
        self.cards
            .insert(id, CardInstance::from_template(id, &template, owner));
        Some(id)
    }

    #[must_use]
    pub fn card(&self, id: InstanceId) -> Option<&CardInstance> {
        self.cards.get(&id)
    }

    pub fn card_mut(&mut self, id: InstanceId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&id)
    }

    /// The template an instance was stamped from.
    #[must_use]
    pub fn template_of(&self, id: InstanceId) -> Option<&CardTemplate> {
        self.card(id).and_then(|card| self.database.get(&card.name))
    }

    /// Whether the instance is a scale token ("Money").
    #[must_use]
    pub fn is_scale_token(&self, id: InstanceId) -> bool {
        match self.card(id) {
            Some(card) => {
                card.name == self.config.scale_token_name
                    || self.database.get(&card.name).is_some_and(|t| t.scale_token)
            }
            None => false,
        }
    }

    /// First scale token on the player's field.
    #[must_use]
    pub fn scale_token_on_field(&self, player: PlayerId) -> Option<InstanceId> {
        self.players[player]
            .field
            .iter()
            .copied()
            .find(|&id| self.is_scale_token(id))
    }

    /// Base scale plus the durability of every scale token on the field.
    #[must_use]
    pub fn effective_scale(&self, player: PlayerId) -> i32 {
        let state = &self.players[player];
        let tokens: i32 = state
            .field
            .iter()
            .filter(|&&id| self.is_scale_token(id))
            .filter_map(|&id| self.card(id))
            .map(|card| card.current_durability)
            .sum();
        state.scale + tokens
    }

    /// Wealth cards on the player's field, in pile order.
    #[must_use]
    pub fn field_wealth(&self, player: PlayerId) -> Vec<InstanceId> {
        self.cards_of_type(&self.players[player].field, CardType::Wealth)
    }

    /// Filter a pile by card type, keeping pile order.
    #[must_use]
    pub fn cards_of_type(&self, pile: &[InstanceId], card_type: CardType) -> Vec<InstanceId> {
        pile.iter()
            .copied()
            .filter(|&id| self.card(id).is_some_and(|c| c.card_type == card_type))
            .collect()
    }

    // === Temp Data ===

    #[must_use]
    pub fn temp_value(&self, key: &str) -> Option<i32> {
        self.temp.get(key).copied()
    }

    pub fn set_temp(&mut self, key: impl Into<String>, value: i32) {
        self.temp.insert(key.into(), value);
    }

    // === Sinks ===

    /// Append a line to the game log.
    pub fn log_event(&mut self, entry: impl Into<String>) {
        self.log.push_back(entry.into());
    }

    pub fn push_animation(&mut self, cue: AnimationCue) {
        self.animations.push_back(cue);
    }

    /// Whether the processor can make progress.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.awaiting_input.is_some()
    }

    // === Integrity ===

    /// Verify that every instance sits in exactly the pile its `location`
    /// names, and that every pile entry is registered.
    pub fn check_integrity(&self) -> Result<(), String> {
        let mut seen: FxHashMap<InstanceId, (PlayerId, Pile)> = FxHashMap::default();

        for (player_id, player) in self.players.iter() {
            for pile in Pile::ALL {
                for &id in self.pile(player_id, pile) {
                    if let Some(prev) = seen.insert(id, (player_id, pile)) {
                        return Err(format!(
                            "{id} appears in {:?} of {} and {pile:?} of {player_id}",
                            prev.1, prev.0
                        ));
                    }
                    let Some(card) = self.card(id) else {
                        return Err(format!("{id} in {pile:?} is not registered"));
                    };
                    if card.location != Location::from(pile) {
                        return Err(format!(
                            "{id} sits in {pile:?} but records {:?}",
                            card.location
                        ));
                    }
                }
            }
            if player.ideology.is_some_and(|id| {
                self.card(id).is_some_and(|c| c.card_type != CardType::Ideology)
            }) {
                return Err(format!("{player_id} holds a non-ideology card in the ideology slot"));
            }
        }

        for (id, card) in &self.cards {
            if card.location != Location::Removed && !seen.contains_key(id) {
                return Err(format!(
                    "{id} records {:?} but is in no pile",
                    card.location
                ));
            }
        }
        Ok(())
    }

    // === Snapshots ===

    /// Compact binary snapshot of the whole state.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a state from `to_bytes` output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDatabase;

    fn database() -> CardDatabase {
        CardDatabase::from_json_str(
            r#"{
                "マネー": {"name": "マネー", "card_type": "WEALTH", "required_scale": 0,
                          "durability": 4, "is_token": true, "scale_token": true},
                "農場": {"name": "農場", "card_type": "WEALTH", "required_scale": 2, "durability": 3}
            }"#,
        )
        .unwrap()
    }

    fn place(state: &mut GameState, name: &str, player: PlayerId, pile: Pile) -> InstanceId {
        let id = state.create_instance(name, player).unwrap();
        state.insert_into_pile(id, player, pile, crate::zones::ZonePosition::Bottom);
        id
    }

    #[test]
    fn test_new_state_uses_config() {
        let config = RulesConfig::default().with_initial_consciousness(30);
        let state = GameState::new(database(), config);

        assert_eq!(state.player(PlayerId::FIRST).consciousness, 30);
        assert_eq!(state.player(PlayerId::SECOND).field_limit, 5);
        assert_eq!(state.player(PlayerId::SECOND).name, "NPC");
        assert_eq!(state.phase, GamePhase::Mulligan);
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_alloc_is_unique() {
        let mut state = GameState::new(database(), RulesConfig::default());
        let a = state.alloc_instance_id();
        let b = state.alloc_instance_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_effective_scale_counts_tokens_on_field() {
        let mut state = GameState::new(database(), RulesConfig::default().with_initial_scale(2));
        let p = PlayerId::FIRST;
        place(&mut state, "マネー", p, Pile::Field);
        place(&mut state, "農場", p, Pile::Field);
        place(&mut state, "マネー", p, Pile::Hand);

        assert_eq!(state.effective_scale(p), 6);
        assert_eq!(state.field_wealth(p).len(), 2);
        assert!(state.scale_token_on_field(p).is_some());
    }

    #[test]
    fn test_integrity_detects_stray_location() {
        let mut state = GameState::new(database(), RulesConfig::default());
        let id = place(&mut state, "農場", PlayerId::FIRST, Pile::Hand);
        assert!(state.check_integrity().is_ok());

        state.card_mut(id).unwrap().location = Location::Field;
        assert!(state.check_integrity().is_err());
    }

    #[test]
    fn test_bincode_snapshot_round_trip() {
        let mut state = GameState::new(database(), RulesConfig::default().with_seed(3));
        place(&mut state, "農場", PlayerId::SECOND, Pile::Deck);
        state.log_event("turn 1");
        state.set_temp("k", 4);

        let bytes = state.to_bytes().unwrap();
        let restored = GameState::from_bytes(&bytes).unwrap();

        assert_eq!(restored.player(PlayerId::SECOND).deck, state.player(PlayerId::SECOND).deck);
        assert_eq!(restored.log, state.log);
        assert_eq!(restored.temp_value("k"), Some(4));
        assert_eq!(restored.rng.state(), state.rng.state());
    }
}
