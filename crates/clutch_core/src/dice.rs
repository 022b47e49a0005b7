//! Dice model
//!
//! Every probability decision in the engine goes through the helpers in this
//! module. None of them touch a global random source: the caller always hands
//! in the `Rng`, so a seeded `ChaCha8Rng` reproduces a whole game.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest 3d6 total
pub const ROLL_MIN: u8 = 3;
/// Largest 3d6 total
pub const ROLL_MAX: u8 = 18;

/// A 3d6 total in `ROLL_MIN..=ROLL_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Roll(u8);

impl Roll {
    /// Build a roll, rejecting values outside the 3d6 domain.
    pub fn new(value: u8) -> Option<Self> {
        (ROLL_MIN..=ROLL_MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Every legal roll, lowest first.
    pub fn all() -> impl Iterator<Item = Roll> {
        (ROLL_MIN..=ROLL_MAX).map(Roll)
    }

    /// Number of d6 combinations (out of 216) that sum to this roll.
    pub fn ways(self) -> u32 {
        let mut ways = 0;
        for a in 1..=6u8 {
            for b in 1..=6u8 {
                let c = self.0 as i16 - a as i16 - b as i16;
                if (1..=6).contains(&c) {
                    ways += 1;
                }
            }
        }
        ways
    }

    /// Exact probability of this roll on 3d6.
    pub fn probability(self) -> f64 {
        self.ways() as f64 / 216.0
    }
}

impl TryFrom<u8> for Roll {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Roll::new(value).ok_or_else(|| format!("roll {value} outside {ROLL_MIN}..={ROLL_MAX}"))
    }
}

impl From<Roll> for u8 {
    fn from(roll: Roll) -> Self {
        roll.0
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single six-sided die (1..=6).
pub fn d6<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=6)
}

/// Sum of three independent d6 draws.
pub fn roll_3d6<R: Rng + ?Sized>(rng: &mut R) -> Roll {
    Roll(d6(rng) + d6(rng) + d6(rng))
}

/// Uniform draw in `[0, 1)`.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// True with probability `p`. Out-of-range probabilities saturate instead of
/// panicking the way `gen_bool` would.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    if !p.is_finite() || p <= 0.0 {
        return false;
    }
    uniform(rng) < p.min(1.0)
}
