//! Game state
//!
//! A single owned [`GameState`] value is threaded through every engine call.
//! Yard lines are always stored from the offense's point of view; every
//! possession change mirrors the spot (`100 - spot`) so the ball's absolute
//! position on the field is preserved.

pub mod clock;
pub mod drive;
pub mod scoreboard;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::play::Situation;
pub use clock::ClockEvent;
pub use drive::PlayOutcome;
pub use scoreboard::{ScoreKind, Scoreboard, ScoringEvent};

/// Home or away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quarter {
    First,
    Second,
    Third,
    Fourth,
    Overtime,
}

impl Quarter {
    pub fn number(self) -> u8 {
        match self {
            Quarter::First => 1,
            Quarter::Second => 2,
            Quarter::Third => 3,
            Quarter::Fourth => 4,
            Quarter::Overtime => 5,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quarter::Overtime => f.write_str("OT"),
            q => write!(f, "Q{}", q.number()),
        }
    }
}

/// Which entry point the state accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Scrimmage plays, punts and field goals
    LiveDown,
    /// Waiting for the scoring side's extra point or two-point try
    PendingTry { scoring: Side },
    /// Waiting for `kicking` to kick off
    PreKickoff { kicking: Side },
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::LiveDown => f.write_str("the ball is live"),
            Phase::PendingTry { scoring } => write!(f, "a try is pending for {scoring}"),
            Phase::PreKickoff { kicking } => write!(f, "{kicking} is due to kick off"),
            Phase::GameOver => f.write_str("the game is over"),
        }
    }
}

/// Complete, serializable game snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub home_team: String,
    pub away_team: String,
    pub scoreboard: Scoreboard,
    pub quarter: Quarter,
    /// Seconds left in the current period
    pub clock: u32,
    pub quarter_length: u32,
    pub possession: Side,
    pub down: u8,
    pub distance: u8,
    /// Offense's yard line from its own goal (1..=99)
    pub yard_line: u8,
    pub phase: Phase,
    /// Most recent entry last
    pub log: Vec<String>,
    pub play_count: u32,
    pub opening_receiver: Side,
    /// The period ran out on a scoring play; it ends once the try is done
    pub period_end_pending: bool,
}

impl GameState {
    pub fn new(
        home: impl Into<String>,
        away: impl Into<String>,
        quarter_length: u32,
        first_down_distance: u8,
        yard_line: u8,
    ) -> Self {
        let quarter_length = quarter_length.max(1);
        Self {
            home_team: home.into(),
            away_team: away.into(),
            scoreboard: Scoreboard::default(),
            quarter: Quarter::First,
            clock: quarter_length,
            quarter_length,
            possession: Side::Home,
            down: 1,
            distance: first_down_distance,
            yard_line,
            phase: Phase::LiveDown,
            log: Vec::new(),
            play_count: 0,
            opening_receiver: Side::Home,
            period_end_pending: false,
        }
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn offense_team(&self) -> &str {
        self.team(self.possession)
    }

    pub fn defense_team(&self) -> &str {
        self.team(self.possession.opponent())
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Ball position from the home team's goal line.
    pub fn field_position(&self) -> u8 {
        match self.possession {
            Side::Home => self.yard_line,
            Side::Away => 100 - self.yard_line,
        }
    }

    pub fn situation(&self) -> Situation {
        Situation { down: self.down, distance: self.distance, yard_line: self.yard_line }
    }

    /// `1st & 10 at own 25` style label.
    pub fn down_and_distance(&self) -> String {
        let ordinal = match self.down {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            _ => "4th",
        };
        let spot = match self.yard_line {
            50 => "the 50".to_string(),
            n if n < 50 => format!("own {n}"),
            n => format!("opp {}", 100 - n),
        };
        format!("{ordinal} & {} at {spot}", self.distance)
    }

    /// `Q2 07:45` style label.
    pub fn clock_label(&self) -> String {
        format!("{} {:02}:{:02}", self.quarter, self.clock / 60, self.clock % 60)
    }

    pub(crate) fn push_log(&mut self, entry: String) {
        self.log.push(entry);
    }
}
