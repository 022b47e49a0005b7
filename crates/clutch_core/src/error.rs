use thiserror::Error;

use crate::cards::{PlayType, TableError};

/// Bad input data or rules. Raised at load time, never mid-play.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Card {card_id} has an invalid {play} table: {source}")]
    InvalidTable {
        card_id: String,
        play: PlayType,
        #[source]
        source: TableError,
    },

    #[error("Duplicate card id: {id}")]
    DuplicateCard { id: String },

    #[error("Card or team with an empty id")]
    EmptyId,

    #[error("Roster for {team} points at unknown card {card_id}")]
    UnknownRosterCard { team: String, card_id: String },

    #[error("Unsupported schema version: found {found}, expected {expected}")]
    UnsupportedSchema { found: u32, expected: u32 },

    #[error("Unknown rules profile: {name}")]
    UnknownProfile { name: String },

    #[error("Invalid rules value for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Errors surfaced by the engine entry points.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Cannot {action} while {phase}")]
    InvalidStateTransition { action: &'static str, phase: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl EngineError {
    pub(crate) fn invalid(action: &'static str, phase: impl ToString) -> Self {
        EngineError::InvalidStateTransition { action, phase: phase.to_string() }
    }

    /// The caller can fix this by issuing a different command.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidStateTransition { .. })
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
