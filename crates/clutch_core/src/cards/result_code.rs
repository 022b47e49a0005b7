//! Result code grammar
//!
//! `gain:<n>`, `sack:<n>`, `td`, `int`, `fum`, `inc`, `pen:<yards>:<off|def>`.
//! Parsing never fails: anything outside the grammar becomes
//! [`ResultCode::Unknown`], which resolves to a quiet zero-yard play. So do
//! yardages longer than the field.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::PlayType;
use crate::engine::resolution::Turnover;

/// Largest yardage a `gain` or `sack` code may carry.
pub const MAX_CODE_YARDS: u32 = 99;

/// Which side of the ball committed a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenaltySide {
    Offense,
    Defense,
}

impl PenaltySide {
    pub fn code(self) -> &'static str {
        match self {
            PenaltySide::Offense => "off",
            PenaltySide::Defense => "def",
        }
    }
}

/// Parsed card result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultCode {
    Gain(i32),
    /// Magnitude of the loss
    Sack(u32),
    Touchdown,
    Interception,
    Fumble,
    Incomplete,
    Penalty { yards: u8, on: PenaltySide },
    Unknown(String),
}

impl ResultCode {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().to_ascii_lowercase();
        let mut parts = text.split(':');
        let head = parts.next().unwrap_or_default();
        let arg = parts.next();
        let extra = parts.next();

        match (head, arg) {
            ("td", _) => ResultCode::Touchdown,
            ("int", _) => ResultCode::Interception,
            ("fum", _) | ("fumble", _) => ResultCode::Fumble,
            ("inc", _) => ResultCode::Incomplete,
            ("gain", Some(n)) => match n.trim().parse::<i32>() {
                Ok(yards) if yards.unsigned_abs() <= MAX_CODE_YARDS => ResultCode::Gain(yards),
                _ => ResultCode::Unknown(raw.to_string()),
            },
            ("sack", Some(n)) => match n.trim().parse::<i32>() {
                Ok(yards) if yards.unsigned_abs() <= MAX_CODE_YARDS => ResultCode::Sack(yards.unsigned_abs()),
                _ => ResultCode::Unknown(raw.to_string()),
            },
            ("pen", Some(n)) => {
                let Ok(yards) = n.trim().parse::<u8>() else {
                    return ResultCode::Unknown(raw.to_string());
                };
                let on = match extra {
                    Some(side) if side.trim().starts_with("def") => PenaltySide::Defense,
                    _ => PenaltySide::Offense,
                };
                ResultCode::Penalty { yards, on }
            }
            _ => ResultCode::Unknown(raw.to_string()),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ResultCode::Unknown(_))
    }
}

impl FromStr for ResultCode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ResultCode::parse(s))
    }
}

impl From<String> for ResultCode {
    fn from(raw: String) -> Self {
        ResultCode::parse(&raw)
    }
}

impl From<&str> for ResultCode {
    fn from(raw: &str) -> Self {
        ResultCode::parse(raw)
    }
}

impl From<ResultCode> for String {
    fn from(code: ResultCode) -> Self {
        code.to_string()
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Gain(n) => write!(f, "gain:{n}"),
            ResultCode::Sack(n) => write!(f, "sack:{n}"),
            ResultCode::Touchdown => f.write_str("td"),
            ResultCode::Interception => f.write_str("int"),
            ResultCode::Fumble => f.write_str("fum"),
            ResultCode::Incomplete => f.write_str("inc"),
            ResultCode::Penalty { yards, on } => write!(f, "pen:{yards}:{}", on.code()),
            ResultCode::Unknown(raw) => f.write_str(raw),
        }
    }
}

// ============================================================================
// Interpretation
// ============================================================================

/// Penalty printed on the card itself, enforced later by the penalty engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPenalty {
    pub yards: u8,
    pub on: PenaltySide,
}

/// What a code means before defense, penalties and field position apply.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseOutcome {
    pub yards: i32,
    pub turnover: Turnover,
    pub touchdown: bool,
    pub complete: Option<bool>,
    pub card_penalty: Option<CardPenalty>,
    /// Gain or sack: the only outcomes the defense modifier may move
    pub yardage_play: bool,
    pub unrecognized: bool,
    pub description: String,
}

impl BaseOutcome {
    fn new(yards: i32, description: impl Into<String>) -> Self {
        Self {
            yards,
            turnover: Turnover::None,
            touchdown: false,
            complete: None,
            card_penalty: None,
            yardage_play: false,
            unrecognized: false,
            description: description.into(),
        }
    }
}

/// Turn a result code into a base outcome for `play`.
///
/// `td` carries zero yards here; the pipeline normalizes it to exactly reach
/// the goal line once field position is known.
pub fn interpret(code: &ResultCode, play: PlayType) -> BaseOutcome {
    let pass = play.is_pass();
    match code {
        ResultCode::Gain(yards) => {
            let mut out = BaseOutcome::new(*yards, describe_gain(*yards, pass));
            out.yardage_play = true;
            out.complete = pass.then_some(true);
            out
        }
        ResultCode::Sack(loss) => {
            let yards = -((*loss).min(MAX_CODE_YARDS) as i32);
            let label = if pass { "Sacked" } else { "Tackled" };
            let mut out = BaseOutcome::new(yards, format!("{label} for a loss of {loss}"));
            out.yardage_play = true;
            out
        }
        ResultCode::Touchdown => {
            let mut out = BaseOutcome::new(0, "Touchdown");
            out.touchdown = true;
            out.complete = pass.then_some(true);
            out
        }
        ResultCode::Interception => {
            let mut out = BaseOutcome::new(0, "Intercepted");
            out.turnover = Turnover::Interception;
            out.complete = pass.then_some(false);
            out
        }
        ResultCode::Fumble => {
            let mut out = BaseOutcome::new(0, "Fumble, recovered by the defense");
            out.turnover = Turnover::Fumble;
            out
        }
        ResultCode::Incomplete => {
            let mut out = BaseOutcome::new(0, "Incomplete");
            out.complete = Some(false);
            out
        }
        ResultCode::Penalty { yards, on } => {
            let mut out = BaseOutcome::new(0, format!("Flag: {yards} yards on the {}", side_name(*on)));
            out.card_penalty = Some(CardPenalty { yards: *yards, on: *on });
            out
        }
        ResultCode::Unknown(raw) => {
            let mut out = BaseOutcome::new(0, format!("No gain ({raw})"));
            out.unrecognized = true;
            out
        }
    }
}

fn describe_gain(yards: i32, pass: bool) -> String {
    let verb = if pass { "Complete" } else { "Run" };
    match yards {
        0 => format!("{verb}, no gain"),
        n if n < 0 => format!("{verb}, loss of {}", n.unsigned_abs()),
        n => format!("{verb} for {n}"),
    }
}

fn side_name(side: PenaltySide) -> &'static str {
    match side {
        PenaltySide::Offense => "offense",
        PenaltySide::Defense => "defense",
    }
}
