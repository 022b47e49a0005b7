//! Defensive calls and the yardage modifier they apply

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::{PlayFamily, PlayType};
use crate::config::DefenseRules;
use crate::dice::chance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefensiveFront {
    #[default]
    Base,
    RunHeavy,
    PassHeavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Man,
    #[default]
    Zone,
}

/// The defense's call for one snap. `Default` is the neutral call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefenseCall {
    #[serde(rename = "box", default)]
    pub front: DefensiveFront,
    #[serde(default)]
    pub blitz: bool,
    #[serde(default)]
    pub coverage: Coverage,
}

impl DefenseCall {
    pub fn new(front: DefensiveFront, blitz: bool, coverage: Coverage) -> Self {
        Self { front, blitz, coverage }
    }

    /// A uniformly random call, used by computer-controlled defenses.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let front = match rng.gen_range(0..3) {
            0 => DefensiveFront::Base,
            1 => DefensiveFront::RunHeavy,
            _ => DefensiveFront::PassHeavy,
        };
        let blitz = chance(rng, 0.25);
        let coverage = if chance(rng, 0.5) { Coverage::Man } else { Coverage::Zone };
        Self { front, blitz, coverage }
    }
}

impl fmt::Display for DefenseCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let front = match self.front {
            DefensiveFront::Base => "base",
            DefensiveFront::RunHeavy => "run-heavy",
            DefensiveFront::PassHeavy => "pass-heavy",
        };
        let coverage = match self.coverage {
            Coverage::Man => "man",
            Coverage::Zone => "zone",
        };
        write!(f, "{front} {coverage}")?;
        if self.blitz {
            f.write_str(" blitz")?;
        }
        Ok(())
    }
}

/// Additive adjustment for `call` against `play`. Kicks are never modified.
pub fn modifier(call: &DefenseCall, play: PlayType, rules: &DefenseRules) -> i32 {
    match play.family() {
        PlayFamily::Run => {
            let front = match call.front {
                DefensiveFront::RunHeavy => rules.run_heavy_vs_run,
                DefensiveFront::PassHeavy => rules.pass_heavy_vs_run,
                DefensiveFront::Base => 0,
            };
            let blitz = if call.blitz { rules.blitz_vs_run } else { 0 };
            front + blitz
        }
        PlayFamily::Pass => {
            let coverage = match call.coverage {
                Coverage::Zone => rules.zone_vs_pass,
                Coverage::Man => rules.man_vs_pass,
            };
            let front = match call.front {
                DefensiveFront::PassHeavy => rules.pass_heavy_vs_pass,
                DefensiveFront::RunHeavy => rules.run_heavy_vs_pass,
                DefensiveFront::Base => 0,
            };
            // Rushed throws: the blitz gives up yardage when the pass gets off
            let blitz = if call.blitz { rules.blitz_vs_pass } else { 0 };
            coverage + front + blitz
        }
        PlayFamily::Kick => 0,
    }
}

/// Apply the modifier to a gain or sack and clamp to the configured bounds.
pub fn adjust_yards(yards: i32, call: &DefenseCall, play: PlayType, rules: &DefenseRules) -> i32 {
    yards.saturating_add(modifier(call, play, rules)).clamp(rules.yards_floor, rules.yards_cap)
}
