//! # clutch_core - Card-Driven American Football Drive Engine
//!
//! Resolves plays from player cards and 3d6 rolls and keeps the drive, clock
//! and score for a two-team game.
//!
//! ## Features
//! - Deterministic (same seed and inputs = same game)
//! - Card tables with a total result code grammar and generic fallback cards
//! - Defensive calls, a declarative penalty table and special teams
//! - JSON API for hosts without Rust bindings

// Game engine APIs often require many parameters for rolls, rules, state
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod cards;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod session;
pub mod state;

// Re-export main API functions
pub use api::{simulate_game_json, GameRequest, GameResponse};
pub use error::{ConfigurationError, EngineError, EngineResult};

// Re-export card types
pub use cards::{CardLibrary, CardRow, PlayType, PlayerCard, ResultCode, TeamMeta};

// Re-export engine and state
pub use config::RulesConfig;
pub use dice::Roll;
pub use engine::{
    DefenseCall, Engine, PlayReport, Resolution, SpecialTeamsContext, SpecialTeamsKind, TryChoice,
};
pub use session::{AutoplaySummary, GameSession, PlayCaller, SimplePlayCaller, StepResult};
pub use state::{GameState, Phase, PlayOutcome, Quarter, Side};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
