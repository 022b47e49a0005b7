use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Quarter, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Touchdown,
    ExtraPoint,
    TwoPoint,
    FieldGoal,
    Safety,
}

impl ScoreKind {
    pub fn points(self) -> u32 {
        match self {
            ScoreKind::Touchdown => 6,
            ScoreKind::ExtraPoint => 1,
            ScoreKind::TwoPoint => 2,
            ScoreKind::FieldGoal => 3,
            ScoreKind::Safety => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringEvent {
    pub side: Side,
    pub kind: ScoreKind,
    pub points: u32,
    pub quarter: Quarter,
    pub clock: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub home: u32,
    pub away: u32,
    /// In scoring order
    pub events: Vec<ScoringEvent>,
}

impl Scoreboard {
    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.home == self.away
    }

    pub fn leader(&self) -> Option<Side> {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn record(&mut self, side: Side, kind: ScoreKind, quarter: Quarter, clock: u32) {
        let points = kind.points();
        match side {
            Side::Home => self.home += points,
            Side::Away => self.away += points,
        }
        self.events.push(ScoringEvent { side, kind, points, quarter, clock });
        info!(side = %side, kind = ?kind, home = self.home, away = self.away, "score");
    }
}
