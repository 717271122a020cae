//! Error types.
//!
//! Only setup can fail loudly. Everything that goes wrong once a game is
//! running (stale targets, empty piles, illegal plays) is a soft outcome
//! reported through `ResolveResult` or a silently unchanged state.

use thiserror::Error;

/// Errors raised while loading card data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to parse card data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("card '{card}': {reason}")]
    InvalidCard { card: String, reason: String },
    #[error("card '{card}' references unknown card '{referenced}'")]
    UnknownReference { card: String, referenced: String },
    #[error("deck '{deck}' lists unknown card '{card}'")]
    UnknownDeckCard { deck: String, card: String },
    #[error("card database is empty")]
    EmptyDatabase,
}

/// Errors raised while setting up a game.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("preset deck named \"{0}\" not found")]
    UnknownDeck(String),
    #[error("invalid card data: {0}")]
    Data(#[from] DataError),
    #[error("state snapshot could not be decoded: {0}")]
    Snapshot(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = EngineError::UnknownDeck("資本主義デッキ".to_string());
        assert_eq!(err.to_string(), "preset deck named \"資本主義デッキ\" not found");

        let err: EngineError = DataError::UnknownDeckCard {
            deck: "a".to_string(),
            card: "b".to_string(),
        }
        .into();
        assert!(err.to_string().contains("deck 'a' lists unknown card 'b'"));
    }
}
