//! Player cards
//!
//! A card is a player's table of outcomes keyed by play type and 3d6 band.
//! Result codes are parsed once when the card is deserialized, so the play
//! pipeline never touches raw strings.

pub mod fallback;
pub mod library;
pub mod result_code;
pub mod table;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use fallback::{generic_card, select_card};
pub use library::{CardLibrary, TeamMeta};
pub use result_code::{interpret, BaseOutcome, CardPenalty, PenaltySide, ResultCode};
pub use table::{lookup, resolve_code, validate_rows, CodeLookup, TableError};

// ============================================================================
// Play types
// ============================================================================

/// Play types a card can carry a table for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayType {
    InsideRun,
    OutsideRun,
    ShortPass,
    LongPass,
    QbScramble,
    Punt,
    FieldGoal,
}

/// Coarse grouping used by the defense modifier and penalty eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayFamily {
    Run,
    Pass,
    Kick,
}

impl PlayType {
    pub const SCRIMMAGE: [PlayType; 5] = [
        PlayType::InsideRun,
        PlayType::OutsideRun,
        PlayType::ShortPass,
        PlayType::LongPass,
        PlayType::QbScramble,
    ];

    pub fn family(self) -> PlayFamily {
        match self {
            PlayType::InsideRun | PlayType::OutsideRun | PlayType::QbScramble => PlayFamily::Run,
            PlayType::ShortPass | PlayType::LongPass => PlayFamily::Pass,
            PlayType::Punt | PlayType::FieldGoal => PlayFamily::Kick,
        }
    }

    pub fn is_pass(self) -> bool {
        self.family() == PlayFamily::Pass
    }

    pub fn is_deep_pass(self) -> bool {
        self == PlayType::LongPass
    }

    /// Position whose card drives this play.
    pub fn position(self) -> &'static str {
        match self {
            PlayType::InsideRun | PlayType::OutsideRun => "RB",
            PlayType::ShortPass | PlayType::LongPass | PlayType::QbScramble => "QB",
            PlayType::Punt => "P",
            PlayType::FieldGoal => "K",
        }
    }

    /// Wire name used in card JSON.
    pub fn key(self) -> &'static str {
        match self {
            PlayType::InsideRun => "insideRun",
            PlayType::OutsideRun => "outsideRun",
            PlayType::ShortPass => "shortPass",
            PlayType::LongPass => "longPass",
            PlayType::QbScramble => "qbScramble",
            PlayType::Punt => "punt",
            PlayType::FieldGoal => "fieldGoal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayType::InsideRun => "Inside run",
            PlayType::OutsideRun => "Outside run",
            PlayType::ShortPass => "Short pass",
            PlayType::LongPass => "Long pass",
            PlayType::QbScramble => "QB scramble",
            PlayType::Punt => "Punt",
            PlayType::FieldGoal => "Field goal",
        }
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Card data
// ============================================================================

/// One band of a card table: inclusive `[min, max]` over the 3d6 domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRow {
    pub min: u8,
    pub max: u8,
    pub result: ResultCode,
}

impl CardRow {
    pub fn new(min: u8, max: u8, result: impl Into<ResultCode>) -> Self {
        Self { min, max, result: result.into() }
    }

    pub fn contains(&self, roll: u8) -> bool {
        roll >= self.min && roll <= self.max
    }
}

/// A player's card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCard {
    pub id: String,
    pub name: String,
    pub position: String,
    pub team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// 0-100; only special teams math reads it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default)]
    pub tables: BTreeMap<PlayType, Vec<CardRow>>,
}

impl PlayerCard {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: impl Into<String>,
        team_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: position.into(),
            team_id: team_id.into(),
            year: None,
            rating: None,
            tables: BTreeMap::new(),
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating.min(100));
        self
    }

    pub fn with_table(mut self, play: PlayType, rows: Vec<CardRow>) -> Self {
        self.tables.insert(play, rows);
        self
    }

    pub fn table(&self, play: PlayType) -> Option<&[CardRow]> {
        self.tables.get(&play).map(Vec::as_slice).filter(|rows| !rows.is_empty())
    }

    /// Check every table on the card partitions the roll domain.
    pub fn validate(&self) -> Result<(), (PlayType, TableError)> {
        for (play, rows) in &self.tables {
            validate_rows(rows).map_err(|e| (*play, e))?;
        }
        Ok(())
    }
}
