use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cards::library::Rosters;
use crate::cards::{CardLibrary, PlayerCard, TeamMeta};
use crate::config::RulesConfig;
use crate::error::{ConfigurationError, EngineResult};
use crate::session::{GameSession, SimplePlayCaller};
use crate::state::{Quarter, ScoringEvent};

pub const API_SCHEMA_VERSION: u32 = 1;

const DEFAULT_MAX_PLAYS: usize = 2_000;

fn default_max_plays() -> usize {
    DEFAULT_MAX_PLAYS
}

// ============================================================================
// Request / response
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GameRequest {
    pub schema_version: u32,
    pub seed: u64,
    /// Home team id, matched against card `teamId`
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub teams: Vec<TeamMeta>,
    #[serde(default)]
    pub cards: Vec<PlayerCard>,
    #[serde(default)]
    pub rosters: Rosters,
    /// Preset name: `default`, `classic` or `arcade`
    #[serde(default)]
    pub profile: Option<String>,
    /// Full rules; wins over `profile` when both are given
    #[serde(default)]
    pub rules: Option<RulesConfig>,
    #[serde(default = "default_max_plays")]
    pub max_plays: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResponse {
    pub schema_version: u32,
    pub seed: u64,
    pub home: String,
    pub away: String,
    pub score_home: u32,
    pub score_away: u32,
    pub finished: bool,
    pub quarter: Quarter,
    pub plays: usize,
    /// Plays resolved with a generic card or a degraded table lookup
    pub fallbacks: usize,
    pub scoring: Vec<ScoringEvent>,
    pub log: Vec<String>,
}

// ============================================================================
// Entry points
// ============================================================================

/// Autoplay a whole game described by a JSON [`GameRequest`] and return a
/// JSON [`GameResponse`]. Equal requests produce equal responses.
pub fn simulate_game_json(request_json: &str) -> EngineResult<String> {
    let request: GameRequest = serde_json::from_str(request_json).map_err(ConfigurationError::from)?;
    let response = simulate_game(request)?;
    let json = serde_json::to_string(&response).map_err(ConfigurationError::from)?;
    Ok(json)
}

pub fn simulate_game(request: GameRequest) -> EngineResult<GameResponse> {
    if request.schema_version != API_SCHEMA_VERSION {
        return Err(ConfigurationError::UnsupportedSchema {
            found: request.schema_version,
            expected: API_SCHEMA_VERSION,
        }
        .into());
    }
    for (field, team) in [("home", &request.home), ("away", &request.away)] {
        if team.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfig { field, reason: "team id is empty".into() }.into());
        }
    }

    let config = match (request.rules, request.profile.as_deref()) {
        (Some(rules), _) => rules,
        (None, Some(profile)) => RulesConfig::from_profile(profile)?,
        (None, None) => RulesConfig::default(),
    };
    config.validate()?;

    let library = CardLibrary {
        teams: request.teams,
        cards: request.cards,
        rosters: request.rosters,
        ..CardLibrary::default()
    };
    library.validate()?;

    let mut caller = SimplePlayCaller::default().with_kicking_rules(config.special_teams.clone());
    let mut session = GameSession::seeded_with_config(config, request.home, request.away, request.seed);
    let summary = session.autoplay(&library, &mut caller, request.max_plays)?;
    let state = session.into_state();

    info!(
        seed = request.seed,
        home = state.scoreboard.home,
        away = state.scoreboard.away,
        plays = summary.plays,
        "simulate_game_json completed"
    );

    Ok(GameResponse {
        schema_version: API_SCHEMA_VERSION,
        seed: request.seed,
        score_home: state.scoreboard.home,
        score_away: state.scoreboard.away,
        finished: summary.finished,
        quarter: state.quarter,
        plays: summary.plays,
        fallbacks: summary.fallbacks,
        scoring: state.scoreboard.events,
        log: state.log,
        home: state.home_team,
        away: state.away_team,
    })
}
