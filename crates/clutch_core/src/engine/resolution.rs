//! Play resolution values
//!
//! A [`Resolution`] is produced by the play pipeline or the special teams
//! resolver and consumed once by the drive state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::special_teams::TryChoice;
use crate::cards::{PenaltySide, PlayType};
use crate::dice::Roll;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Turnover {
    #[default]
    None,
    #[serde(rename = "INT")]
    Interception,
    #[serde(rename = "FUM")]
    Fumble,
}

impl Turnover {
    pub fn is_some(self) -> bool {
        self != Turnover::None
    }
}

impl fmt::Display for Turnover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turnover::None => f.write_str("none"),
            Turnover::Interception => f.write_str("INT"),
            Turnover::Fumble => f.write_str("FUM"),
        }
    }
}

/// A data problem absorbed while resolving a play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fallback {
    /// No row covered the roll (`DataIntegrityFallback`)
    NoMatchingRow { card_id: String, roll: u8 },
    /// Row carried a code outside the grammar (`DataIntegrityFallback`)
    UnrecognizedCode { card_id: String, code: String },
    /// Generic card stood in (`MissingCard`)
    MissingCard { position: String, play: PlayType, card_id: Option<String> },
}

// ============================================================================
// Penalties
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    FalseStart,
    OffensiveHolding,
    IllegalContact,
    DefensiveOffside,
    DefensivePassInterference,
    DefensiveHolding,
    /// Flag printed on the player's card
    CardFlag,
}

impl PenaltyKind {
    pub fn label(self) -> &'static str {
        match self {
            PenaltyKind::FalseStart => "False start",
            PenaltyKind::OffensiveHolding => "Offensive holding",
            PenaltyKind::IllegalContact => "Illegal contact",
            PenaltyKind::DefensiveOffside => "Defensive offside",
            PenaltyKind::DefensivePassInterference => "Pass interference",
            PenaltyKind::DefensiveHolding => "Defensive holding",
            PenaltyKind::CardFlag => "Penalty",
        }
    }
}

/// An enforced penalty. `yards` is the enforced magnitude after the
/// half-distance limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyDetail {
    pub kind: PenaltyKind,
    pub yards: u8,
    pub on: PenaltySide,
    pub auto_first_down: bool,
    pub replay_down: bool,
    pub spot_foul: bool,
}

impl PenaltyDetail {
    /// Field movement from the offense's point of view.
    pub fn signed_yards(&self) -> i32 {
        match self.on {
            PenaltySide::Offense => -(self.yards as i32),
            PenaltySide::Defense => self.yards as i32,
        }
    }
}

// ============================================================================
// Kicks
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KickDetail {
    Punt {
        gross: u8,
        net: u8,
        return_yards: u8,
        fair_catch: bool,
        touchback: bool,
        receiving_yard_line: u8,
    },
    FieldGoal {
        distance: u8,
        probability: f64,
        draw: f64,
        good: bool,
        /// Where the defense takes over after a miss
        receiving_yard_line: Option<u8>,
    },
    Kickoff {
        distance: u8,
        touchback: bool,
        return_yards: u8,
        receiving_yard_line: u8,
    },
    Try {
        choice: TryChoice,
        probability: f64,
        good: bool,
        points: u8,
    },
}

// ============================================================================
// Resolution
// ============================================================================

/// What kind of snap produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "play", rename_all = "snake_case")]
pub enum PlayKind {
    Scrimmage(PlayType),
    Punt,
    FieldGoal,
    Kickoff,
    Try(TryChoice),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub kind: PlayKind,
    pub roll: Option<Roll>,
    /// Signed yards from the offense's point of view
    pub yards: i32,
    pub turnover: Turnover,
    pub touchdown: bool,
    /// Pass plays only
    pub complete: Option<bool>,
    pub penalty: Option<PenaltyDetail>,
    pub kick: Option<KickDetail>,
    pub clock_runoff: u32,
    pub description: String,
    pub fallback: Option<Fallback>,
}

impl Resolution {
    pub fn new(kind: PlayKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            roll: None,
            yards: 0,
            turnover: Turnover::None,
            touchdown: false,
            complete: None,
            penalty: None,
            kick: None,
            clock_runoff: 0,
            description: description.into(),
            fallback: None,
        }
    }

    pub fn is_incomplete(&self) -> bool {
        self.complete == Some(false) && !self.turnover.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_penalty_signed_yards() {
        let mut detail = PenaltyDetail {
            kind: PenaltyKind::OffensiveHolding,
            yards: 10,
            on: PenaltySide::Offense,
            auto_first_down: false,
            replay_down: true,
            spot_foul: false,
        };
        assert_eq!(detail.signed_yards(), -10);
        detail.on = PenaltySide::Defense;
        assert_eq!(detail.signed_yards(), 10);
    }

    #[test]
    fn test_turnover_wire_names() {
        assert_eq!(serde_json::to_string(&Turnover::Interception).unwrap(), "\"INT\"");
        assert_eq!(serde_json::to_string(&Turnover::Fumble).unwrap(), "\"FUM\"");
    }

    #[test]
    fn test_resolution_serializes() {
        let mut res = Resolution::new(PlayKind::Scrimmage(PlayType::ShortPass), "Incomplete");
        res.complete = Some(false);
        let value = serde_json::to_value(&res).unwrap();
        assert_eq!(value["kind"]["type"], "scrimmage");
        assert_eq!(value["kind"]["play"], "shortPass");
        assert!(res.is_incomplete());
    }
}
