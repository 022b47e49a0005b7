//! Special teams resolver
//!
//! Each kick has a pure `resolve_*` function that takes its random inputs
//! (roll, draw, return yardage) as parameters, and a thin wrapper that draws
//! those inputs from the caller's RNG. Tests drive the pure functions.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::cards::{resolve_code, PlayType, PlayerCard, ResultCode};
use crate::config::SpecialTeamsRules;
use crate::dice::{chance, roll_3d6, uniform, Roll};

const NEUTRAL_RATING: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialTeamsKind {
    Punt,
    FieldGoal,
    Kickoff,
}

/// Who is kicking. A missing kicker falls back to a neutral rating.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialTeamsContext<'a> {
    pub kicker: Option<&'a PlayerCard>,
}

impl<'a> SpecialTeamsContext<'a> {
    pub fn with_kicker(kicker: &'a PlayerCard) -> Self {
        Self { kicker: Some(kicker) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TryChoice {
    Kick,
    TwoPoint,
}

impl TryChoice {
    pub fn points(self) -> u8 {
        match self {
            TryChoice::Kick => 1,
            TryChoice::TwoPoint => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TryChoice::Kick => "Extra point",
            TryChoice::TwoPoint => "Two-point try",
        }
    }
}

fn rating_of(card: Option<&PlayerCard>) -> i32 {
    card.and_then(|c| c.rating).map_or(NEUTRAL_RATING, i32::from)
}

/// Normal sample rounded and floored at zero. A bad spread yields the mean.
fn sample_return<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> u8 {
    let yards = match Normal::new(mean, sd) {
        Ok(dist) => dist.sample(rng),
        Err(_) => mean,
    };
    yards.round().clamp(0.0, 99.0) as u8
}

// ============================================================================
// Punt
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuntResult {
    pub gross: u8,
    pub net: u8,
    pub return_yards: u8,
    pub fair_catch: bool,
    pub touchback: bool,
    /// Receiving team's yard line from its own goal
    pub receiving_yard_line: u8,
}

/// Gross punt distance: the card's `punt` table when it has one, otherwise
/// the rating formula `base + (rating - 50) / 5 + (roll - 10)`.
pub fn punt_gross(punter: Option<&PlayerCard>, roll: Roll, rules: &SpecialTeamsRules) -> u8 {
    let from_table = punter.and_then(|card| {
        let rows = card.table(PlayType::Punt)?;
        match resolve_code(&card.id, rows, roll).code {
            ResultCode::Gain(yards) if yards > 0 => Some(yards),
            _ => None,
        }
    });

    let gross = from_table.unwrap_or_else(|| {
        rules.punt_base + (rating_of(punter) - NEUTRAL_RATING) / 5 + (roll.value() as i32 - 10)
    });
    gross.clamp(10, 80) as u8
}

/// Place a punt of `gross` yards from `spot` (kicking team's yard line).
pub fn resolve_punt(
    spot: u8,
    gross: u8,
    fair_catch: bool,
    return_yards: u8,
    rules: &SpecialTeamsRules,
) -> PuntResult {
    let to_goal = 100u8.saturating_sub(spot);

    if gross >= to_goal {
        let receiving = rules.punt_touchback_yard_line;
        return PuntResult {
            gross,
            net: to_goal.saturating_sub(receiving),
            return_yards: 0,
            fair_catch: false,
            touchback: true,
            receiving_yard_line: receiving,
        };
    }

    let net = if fair_catch {
        gross
    } else {
        gross.saturating_sub(return_yards).max(rules.punt_min_net.min(gross))
    };

    PuntResult {
        gross,
        net,
        return_yards: gross - net,
        fair_catch,
        touchback: false,
        receiving_yard_line: (100 - (spot + net)).clamp(1, 99),
    }
}

pub fn punt<R: Rng + ?Sized>(
    rng: &mut R,
    spot: u8,
    punter: Option<&PlayerCard>,
    rules: &SpecialTeamsRules,
) -> (Roll, PuntResult) {
    let roll = roll_3d6(rng);
    let gross = punt_gross(punter, roll, rules);
    let fair_catch = chance(rng, rules.fair_catch_probability);
    let return_yards =
        if fair_catch { 0 } else { sample_return(rng, rules.punt_return_mean, rules.punt_return_sd) };
    (roll, resolve_punt(spot, gross, fair_catch, return_yards, rules))
}

// ============================================================================
// Field goal
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldGoalResult {
    pub distance: u8,
    pub probability: f64,
    pub draw: f64,
    pub good: bool,
    /// Defense's yard line after a miss
    pub receiving_yard_line: Option<u8>,
}

/// Attempt distance: yards to the goal line plus end zone and hold.
pub fn field_goal_distance(yard_line: u8, rules: &SpecialTeamsRules) -> u8 {
    100u8.saturating_sub(yard_line).saturating_add(rules.fg_distance_offset)
}

/// Make probability for an attempt of `distance` yards. Non-increasing in
/// distance for any fixed rating.
pub fn make_probability(distance: u8, rating: Option<u8>, rules: &SpecialTeamsRules) -> f64 {
    if distance > rules.fg_max_distance {
        return 0.0;
    }
    let base = rules
        .fg_bands
        .iter()
        .find(|band| distance <= band.max_distance)
        .map_or(rules.fg_long_probability, |band| band.probability);
    let rating = rating.map_or(NEUTRAL_RATING, i32::from);
    let shift = (rating - NEUTRAL_RATING) as f64 * rules.fg_rating_slope;
    (base + shift).clamp(0.0, 0.99)
}

/// Kick from `yard_line` with a fixed `draw` in `[0, 1)`; good when
/// `draw < probability`.
pub fn resolve_field_goal(
    yard_line: u8,
    rating: Option<u8>,
    draw: f64,
    rules: &SpecialTeamsRules,
) -> FieldGoalResult {
    let distance = field_goal_distance(yard_line, rules);
    let probability = make_probability(distance, rating, rules);
    let good = draw < probability;

    let receiving_yard_line = (!good).then(|| {
        let spot = yard_line as i32 - rules.fg_spot_offset as i32;
        if (1..=99).contains(&spot) {
            ((100 - spot) as u8).max(rules.fg_miss_min_yard_line).min(99)
        } else {
            rules.fg_miss_min_yard_line
        }
    });

    FieldGoalResult { distance, probability, draw, good, receiving_yard_line }
}

pub fn field_goal<R: Rng + ?Sized>(
    rng: &mut R,
    yard_line: u8,
    kicker: Option<&PlayerCard>,
    rules: &SpecialTeamsRules,
) -> FieldGoalResult {
    let draw = uniform(rng);
    resolve_field_goal(yard_line, kicker.and_then(|k| k.rating), draw, rules)
}

// ============================================================================
// Kickoff
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KickoffResult {
    pub distance: u8,
    pub touchback: bool,
    pub return_yards: u8,
    pub receiving_yard_line: u8,
}

/// Kick length by 3d6 band.
pub fn kickoff_distance(roll: Roll) -> u8 {
    match roll.value() {
        3..=4 => 45,
        5..=6 => 52,
        7..=8 => 57,
        9..=10 => 61,
        11..=12 => 64,
        13..=14 => 66,
        15..=16 => 70,
        _ => 74,
    }
}

pub fn resolve_kickoff(distance: u8, return_yards: u8, rules: &SpecialTeamsRules) -> KickoffResult {
    let landing = rules.kickoff_spot as i32 + distance as i32;
    if landing >= 100 {
        return KickoffResult {
            distance,
            touchback: true,
            return_yards: 0,
            receiving_yard_line: rules.kickoff_touchback_yard_line,
        };
    }

    let caught_at = 100 - landing;
    let receiving = (caught_at + return_yards as i32).clamp(1, 99);
    KickoffResult {
        distance,
        touchback: false,
        return_yards: (receiving - caught_at) as u8,
        receiving_yard_line: receiving as u8,
    }
}

pub fn kickoff<R: Rng + ?Sized>(rng: &mut R, rules: &SpecialTeamsRules) -> (Roll, KickoffResult) {
    let roll = roll_3d6(rng);
    let distance = kickoff_distance(roll);
    let return_yards = sample_return(rng, rules.kickoff_return_mean, rules.kickoff_return_sd);
    (roll, resolve_kickoff(distance, return_yards, rules))
}

// ============================================================================
// Try
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TryResult {
    pub choice: TryChoice,
    pub probability: f64,
    pub good: bool,
    pub points: u8,
}

pub fn try_probability(choice: TryChoice, rules: &SpecialTeamsRules) -> f64 {
    match choice {
        TryChoice::Kick => rules.pat_probability,
        TryChoice::TwoPoint => rules.two_point_probability,
    }
}

pub fn resolve_try(choice: TryChoice, draw: f64, rules: &SpecialTeamsRules) -> TryResult {
    let probability = try_probability(choice, rules);
    let good = draw < probability;
    TryResult { choice, probability, good, points: if good { choice.points() } else { 0 } }
}

pub fn attempt_try<R: Rng + ?Sized>(rng: &mut R, choice: TryChoice, rules: &SpecialTeamsRules) -> TryResult {
    resolve_try(choice, uniform(rng), rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardRow;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rules() -> SpecialTeamsRules {
        SpecialTeamsRules::default()
    }

    fn roll(v: u8) -> Roll {
        Roll::new(v).unwrap()
    }

    #[test]
    fn test_punt_fair_catch_keeps_gross() {
        // From the 30, 40 yards, no return: receiver at 100 - 70 = 30
        let result = resolve_punt(30, 40, true, 0, &rules());
        assert_eq!(result.net, 40);
        assert_eq!(result.receiving_yard_line, 30);
        assert!(!result.touchback);
    }

    #[test]
    fn test_punt_touchback() {
        let result = resolve_punt(70, 45, false, 10, &rules());
        assert!(result.touchback);
        assert_eq!(result.receiving_yard_line, 20);
        assert_eq!(result.net, 10);
    }

    #[test]
    fn test_punt_return_floored_at_min_net() {
        let result = resolve_punt(20, 45, false, 30, &rules());
        assert_eq!(result.net, 25);
        assert_eq!(result.return_yards, 20);
        assert_eq!(result.receiving_yard_line, 55);

        let short = resolve_punt(20, 18, false, 12, &rules());
        assert_eq!(short.net, 18);
    }

    #[test]
    fn test_punt_gross_formula_and_table() {
        let none = punt_gross(None, roll(10), &rules());
        assert_eq!(none, 40);

        let strong = PlayerCard::new("P-1", "Boomer", "P", "T").with_rating(80);
        assert_eq!(punt_gross(Some(&strong), roll(12), &rules()), 40 + 6 + 2);

        let tabled = PlayerCard::new("P-2", "Table", "P", "T")
            .with_table(PlayType::Punt, vec![CardRow::new(3, 18, "gain:51")]);
        assert_eq!(punt_gross(Some(&tabled), roll(4), &rules()), 51);
    }

    #[test]
    fn test_field_goal_distance() {
        assert_eq!(field_goal_distance(75, &rules()), 42);
        assert_eq!(field_goal_distance(99, &rules()), 18);
    }

    #[test]
    fn test_make_probability_non_increasing() {
        for rating in [None, Some(0), Some(50), Some(100)] {
            let mut last = 1.0;
            for distance in 18..=80u8 {
                let p = make_probability(distance, rating, &rules());
                assert!((0.0..=0.99).contains(&p));
                assert!(p <= last, "p({distance}) = {p} rose above {last}");
                last = p;
            }
        }
        assert_eq!(make_probability(71, Some(100), &rules()), 0.0);
        assert!(make_probability(40, Some(90), &rules()) > make_probability(40, Some(40), &rules()));
    }

    #[test]
    fn test_field_goal_miss_spot() {
        // Long attempt, draw above the threshold: miss at the spot of the kick
        let result = resolve_field_goal(45, None, 0.9, &rules());
        assert_eq!(result.distance, 72);
        assert!(!result.good);
        assert_eq!(result.receiving_yard_line, Some(62));

        let close_miss = resolve_field_goal(30, None, 0.999, &rules());
        assert!(!close_miss.good);
        assert_eq!(close_miss.receiving_yard_line, Some(77));

        // Spot of the kick inside the defense's 20 gives the 20
        let deep_miss = resolve_field_goal(90, None, 0.999, &rules());
        assert_eq!(deep_miss.receiving_yard_line, Some(20));
    }

    #[test]
    fn test_field_goal_good() {
        let result = resolve_field_goal(80, None, 0.1, &rules());
        assert!(result.good);
        assert_eq!(result.receiving_yard_line, None);
    }

    #[test]
    fn test_kickoff_touchback_and_return() {
        let tb = resolve_kickoff(66, 30, &rules());
        assert!(tb.touchback);
        assert_eq!(tb.receiving_yard_line, 25);

        let returned = resolve_kickoff(57, 20, &rules());
        assert!(!returned.touchback);
        assert_eq!(returned.receiving_yard_line, 8 + 20);

        let huge = resolve_kickoff(45, 99, &rules());
        assert_eq!(huge.receiving_yard_line, 99);
    }

    #[test]
    fn test_kickoff_distance_monotone() {
        let distances: Vec<u8> = Roll::all().map(kickoff_distance).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_try_points() {
        let kick = resolve_try(TryChoice::Kick, 0.5, &rules());
        assert!(kick.good);
        assert_eq!(kick.points, 1);

        let two = resolve_try(TryChoice::TwoPoint, 0.5, &rules());
        assert!(!two.good);
        assert_eq!(two.points, 0);

        let two = resolve_try(TryChoice::TwoPoint, 0.1, &rules());
        assert_eq!(two.points, 2);
    }

    #[test]
    fn test_random_kicks_stay_on_field() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        for spot in [1u8, 20, 45, 70, 95] {
            for _ in 0..100 {
                let (_, p) = punt(&mut rng, spot, None, &rules());
                assert!((1..=99).contains(&p.receiving_yard_line));
                let (_, k) = kickoff(&mut rng, &rules());
                assert!((1..=99).contains(&k.receiving_yard_line));
            }
        }
    }
}
