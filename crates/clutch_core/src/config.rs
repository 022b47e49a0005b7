//! Rules configuration
//!
//! Every tunable number the engine reads lives here instead of being
//! scattered through the resolvers. Presets cover the common variations and
//! a profile can be picked from the environment.
//!
//! ## Usage
//!
//! ```rust
//! use clutch_core::config::RulesConfig;
//!
//! // Default rules
//! let config = RulesConfig::default();
//!
//! // Classic preset (losses pin at the 1, no second-half kickoff)
//! let classic = RulesConfig::classic();
//!
//! // From environment variable
//! let from_env = RulesConfig::from_env_or_default();
//! ```
//!
//! ## Environment Variables
//!
//! - `CLUTCH_RULES_PROFILE`: Select preset (default, classic, arcade)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::engine::penalty::{default_penalty_table, PenaltyRule};
use crate::error::ConfigurationError;

pub const PROFILE_ENV_VAR: &str = "CLUTCH_RULES_PROFILE";

/// Complete rules configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Down, distance and field position rules
    pub drive: DriveRules,
    /// Game clock
    pub clock: ClockRules,
    /// Pre-snap and in-play flags
    pub penalty: PenaltyRules,
    /// Defensive call adjustments
    pub defense: DefenseRules,
    /// Punts, field goals, kickoffs and tries
    pub special_teams: SpecialTeamsRules,
}

impl RulesConfig {
    /// Classic preset - losses behind the goal line pin the ball at the 1 and
    /// the second half continues the first-half drive.
    pub fn classic() -> Self {
        Self {
            drive: DriveRules { safety_rule: SafetyRule::PinAtOne, ..DriveRules::default() },
            clock: ClockRules { second_half_kickoff: false, ..ClockRules::default() },
            ..Self::default()
        }
    }

    /// Arcade preset - more flags, longer returns
    pub fn arcade() -> Self {
        let base = PenaltyRules::default();
        Self {
            penalty: PenaltyRules {
                pre_snap_probability: 0.05,
                table: base
                    .table
                    .iter()
                    .map(|rule| rule.scaled(1.5))
                    .collect(),
                ..base
            },
            special_teams: SpecialTeamsRules {
                fair_catch_probability: 0.20,
                punt_return_mean: 12.0,
                kickoff_return_mean: 28.0,
                ..SpecialTeamsRules::default()
            },
            ..Self::default()
        }
    }

    /// Look a preset up by name.
    pub fn from_profile(name: &str) -> Result<Self, ConfigurationError> {
        match name.trim().to_lowercase().as_str() {
            "" | "default" => Ok(Self::default()),
            "classic" => Ok(Self::classic()),
            "arcade" => Ok(Self::arcade()),
            other => Err(ConfigurationError::UnknownProfile { name: other.to_string() }),
        }
    }

    /// Load from environment variable CLUTCH_RULES_PROFILE or use default
    pub fn from_env_or_default() -> Self {
        match env::var(PROFILE_ENV_VAR).unwrap_or_default().to_lowercase().as_str() {
            "classic" => Self::classic(),
            "arcade" => Self::arcade(),
            _ => Self::default(),
        }
    }

    /// Parse and validate a JSON rules file. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let d = &self.drive;
        ensure(d.first_down_distance > 0, "drive.first_down_distance", "must be positive")?;
        for (field, yl) in [
            ("drive.start_yard_line", d.start_yard_line),
            ("drive.post_touchdown_yard_line", d.post_touchdown_yard_line),
            ("drive.safety_restart_yard_line", d.safety_restart_yard_line),
            ("special_teams.punt_touchback_yard_line", self.special_teams.punt_touchback_yard_line),
            ("special_teams.kickoff_touchback_yard_line", self.special_teams.kickoff_touchback_yard_line),
            ("special_teams.kickoff_spot", self.special_teams.kickoff_spot),
            ("special_teams.fg_miss_min_yard_line", self.special_teams.fg_miss_min_yard_line),
        ] {
            ensure((1..=99).contains(&yl), field, "must be on the field (1..=99)")?;
        }

        ensure(self.clock.quarter_length > 0, "clock.quarter_length", "must be positive")?;
        ensure(self.clock.overtime_length > 0, "clock.overtime_length", "must be positive")?;

        let p = &self.penalty;
        probability(p.pre_snap_probability, "penalty.pre_snap_probability")?;
        for rule in &p.table {
            probability(rule.probability, "penalty.table.probability")?;
            if let Some(deep) = rule.deep_pass_probability {
                probability(deep, "penalty.table.deep_pass_probability")?;
            }
        }

        let def = &self.defense;
        ensure(def.yards_floor <= 0, "defense.yards_floor", "must not be positive")?;
        ensure(def.yards_cap >= 0, "defense.yards_cap", "must not be negative")?;

        let st = &self.special_teams;
        probability(st.fair_catch_probability, "special_teams.fair_catch_probability")?;
        probability(st.pat_probability, "special_teams.pat_probability")?;
        probability(st.two_point_probability, "special_teams.two_point_probability")?;
        for (field, sd) in [
            ("special_teams.punt_return_sd", st.punt_return_sd),
            ("special_teams.kickoff_return_sd", st.kickoff_return_sd),
        ] {
            ensure(sd.is_finite() && sd >= 0.0, field, "must be a non-negative number")?;
        }
        ensure(!st.fg_bands.is_empty(), "special_teams.fg_bands", "needs at least one band")?;
        for pair in st.fg_bands.windows(2) {
            ensure(
                pair[0].max_distance < pair[1].max_distance,
                "special_teams.fg_bands",
                "distances must increase",
            )?;
            ensure(
                pair[0].probability >= pair[1].probability,
                "special_teams.fg_bands",
                "probabilities must not increase with distance",
            )?;
        }
        for band in &st.fg_bands {
            probability(band.probability, "special_teams.fg_bands.probability")?;
        }
        probability(st.fg_long_probability, "special_teams.fg_long_probability")?;
        if let Some(last) = st.fg_bands.last() {
            ensure(
                st.fg_long_probability <= last.probability,
                "special_teams.fg_long_probability",
                "must not exceed the longest band's probability",
            )?;
        }
        ensure(st.fg_rating_slope.is_finite(), "special_teams.fg_rating_slope", "must be a finite number")?;

        Ok(())
    }
}

fn ensure(ok: bool, field: &'static str, reason: &str) -> Result<(), ConfigurationError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidConfig { field, reason: reason.to_string() })
    }
}

fn probability(p: f64, field: &'static str) -> Result<(), ConfigurationError> {
    ensure((0.0..=1.0).contains(&p), field, &format!("{p} is not a probability"))
}

// ============================================================================
// Drive
// ============================================================================

/// What happens when a loss carries the ball behind the offense's goal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyRule {
    /// Ball downed at or behind the goal line is a safety
    EndZone,
    /// Loss stops at the 1; no safeties from scrimmage
    PinAtOne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveRules {
    pub first_down_distance: u8,
    /// Opening possession spot
    pub start_yard_line: u8,
    /// Where the ball sits while a try is pending
    pub post_touchdown_yard_line: u8,
    /// New offense's spot after a safety
    pub safety_restart_yard_line: u8,
    pub safety_rule: SafetyRule,
}

impl Default for DriveRules {
    fn default() -> Self {
        Self {
            first_down_distance: 10,
            start_yard_line: 25,
            post_touchdown_yard_line: 25,
            safety_restart_yard_line: 35,
            safety_rule: SafetyRule::EndZone,
        }
    }
}

// ============================================================================
// Clock
// ============================================================================

/// Seconds off the clock per snap type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockRules {
    pub quarter_length: u32,
    pub play_runoff: u32,
    pub incomplete_runoff: u32,
    pub pre_snap_runoff: u32,
    pub penalty_runoff: u32,
    pub punt_runoff: u32,
    pub field_goal_runoff: u32,
    pub kickoff_runoff: u32,
    pub try_runoff: u32,
    /// Team that received the opening kick kicks off the 3rd quarter
    pub second_half_kickoff: bool,
    /// Play one extra period when tied after the 4th
    pub overtime: bool,
    pub overtime_length: u32,
}

impl Default for ClockRules {
    fn default() -> Self {
        Self {
            quarter_length: 900,
            play_runoff: 35,
            incomplete_runoff: 0,
            pre_snap_runoff: 0,
            penalty_runoff: 5,
            punt_runoff: 10,
            field_goal_runoff: 5,
            kickoff_runoff: 5,
            try_runoff: 0,
            second_half_kickoff: true,
            overtime: false,
            overtime_length: 600,
        }
    }
}

// ============================================================================
// Penalties
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyRules {
    pub enabled: bool,
    /// False start chance per scrimmage snap (0.0 - 1.0)
    pub pre_snap_probability: f64,
    pub false_start_yards: u8,
    /// Minimum yards for a spot foul
    pub spot_foul_floor: u8,
    /// Random bonus added to the floor, short passes
    pub spot_foul_bonus: u8,
    /// Random bonus added to the floor, deep passes
    pub deep_spot_foul_bonus: u8,
    /// Evaluated in order, first trigger wins
    pub table: Vec<PenaltyRule>,
}

impl Default for PenaltyRules {
    fn default() -> Self {
        Self {
            enabled: true,
            pre_snap_probability: 0.03,
            false_start_yards: 5,
            spot_foul_floor: 10,
            spot_foul_bonus: 20,
            deep_spot_foul_bonus: 25,
            table: default_penalty_table(),
        }
    }
}

// ============================================================================
// Defense
// ============================================================================

/// Yard adjustments applied to gains and sacks by the defensive call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenseRules {
    pub run_heavy_vs_run: i32,
    pub pass_heavy_vs_run: i32,
    pub blitz_vs_run: i32,
    pub zone_vs_pass: i32,
    pub man_vs_pass: i32,
    pub pass_heavy_vs_pass: i32,
    pub run_heavy_vs_pass: i32,
    pub blitz_vs_pass: i32,
    pub yards_floor: i32,
    pub yards_cap: i32,
}

impl Default for DefenseRules {
    fn default() -> Self {
        Self {
            run_heavy_vs_run: -2,
            pass_heavy_vs_run: 1,
            blitz_vs_run: -1,
            zone_vs_pass: -1,
            man_vs_pass: -1,
            pass_heavy_vs_pass: -1,
            run_heavy_vs_pass: 1,
            blitz_vs_pass: 1,
            yards_floor: -15,
            yards_cap: 99,
        }
    }
}

// ============================================================================
// Special teams
// ============================================================================

/// Field goal make probability for attempts up to `max_distance` yards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldGoalBand {
    pub max_distance: u8,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialTeamsRules {
    pub punt_base: i32,
    pub punt_min_net: u8,
    pub punt_touchback_yard_line: u8,
    pub fair_catch_probability: f64,
    pub punt_return_mean: f64,
    pub punt_return_sd: f64,

    pub kickoff_spot: u8,
    pub kickoff_touchback_yard_line: u8,
    pub kickoff_return_mean: f64,
    pub kickoff_return_sd: f64,

    /// Added to the distance to the goal line (end zone + hold)
    pub fg_distance_offset: u8,
    /// Kick spot is this far behind the line of scrimmage
    pub fg_spot_offset: u8,
    pub fg_max_distance: u8,
    /// Non-increasing make probability by distance
    pub fg_bands: Vec<FieldGoalBand>,
    /// Used between the last band and `fg_max_distance`
    pub fg_long_probability: f64,
    /// Probability shift per rating point above 50
    pub fg_rating_slope: f64,
    pub fg_miss_min_yard_line: u8,

    pub pat_probability: f64,
    pub two_point_probability: f64,
}

impl Default for SpecialTeamsRules {
    fn default() -> Self {
        Self {
            punt_base: 40,
            punt_min_net: 25,
            punt_touchback_yard_line: 20,
            fair_catch_probability: 0.35,
            punt_return_mean: 8.0,
            punt_return_sd: 5.0,

            kickoff_spot: 35,
            kickoff_touchback_yard_line: 25,
            kickoff_return_mean: 22.0,
            kickoff_return_sd: 8.0,

            fg_distance_offset: 17,
            fg_spot_offset: 7,
            fg_max_distance: 70,
            fg_bands: vec![
                FieldGoalBand { max_distance: 30, probability: 0.95 },
                FieldGoalBand { max_distance: 40, probability: 0.90 },
                FieldGoalBand { max_distance: 50, probability: 0.85 },
                FieldGoalBand { max_distance: 57, probability: 0.65 },
                FieldGoalBand { max_distance: 63, probability: 0.35 },
            ],
            fg_long_probability: 0.15,
            fg_rating_slope: 0.002,
            fg_miss_min_yard_line: 20,

            pat_probability: 0.94,
            two_point_probability: 0.48,
        }
    }
}
