//! Penalty engine
//!
//! Two independent chances per scrimmage snap: a pre-snap false start that
//! replaces the play entirely, then a declarative table of in-play fouls
//! evaluated in order. At most one flag survives per play, and enforcement is
//! limited to half the distance to the goal so a flag alone never scores.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::play::Situation;
use super::resolution::{PenaltyDetail, PenaltyKind, Turnover};
use crate::cards::{CardPenalty, PenaltySide, PlayFamily, PlayType};
use crate::config::PenaltyRules;
use crate::dice::chance;

// ============================================================================
// Declarative table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Any,
    RunOnly,
    PassOnly,
}

/// One row of the in-play penalty table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRule {
    pub kind: PenaltyKind,
    pub probability: f64,
    /// Replaces `probability` on deep passes when set
    #[serde(default)]
    pub deep_pass_probability: Option<f64>,
    /// Ignored for spot fouls, which draw their own yardage
    pub yards: u8,
    pub on: PenaltySide,
    pub eligibility: Eligibility,
    #[serde(default)]
    pub auto_first_down: bool,
    #[serde(default)]
    pub replay_down: bool,
    #[serde(default)]
    pub spot_foul: bool,
}

impl PenaltyRule {
    pub fn applies_to(&self, play: PlayType) -> bool {
        match self.eligibility {
            Eligibility::Any => play.family() != PlayFamily::Kick,
            Eligibility::RunOnly => play.family() == PlayFamily::Run,
            Eligibility::PassOnly => play.family() == PlayFamily::Pass,
        }
    }

    pub fn probability_for(&self, play: PlayType) -> f64 {
        match self.deep_pass_probability {
            Some(deep) if play.is_deep_pass() => deep,
            _ => self.probability,
        }
    }

    /// Same rule with its trigger chances multiplied by `factor`, capped at 1.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            probability: (self.probability * factor).min(1.0),
            deep_pass_probability: self.deep_pass_probability.map(|p| (p * factor).min(1.0)),
            ..self.clone()
        }
    }
}

pub fn default_penalty_table() -> Vec<PenaltyRule> {
    vec![
        PenaltyRule {
            kind: PenaltyKind::OffensiveHolding,
            probability: 0.04,
            deep_pass_probability: None,
            yards: 10,
            on: PenaltySide::Offense,
            eligibility: Eligibility::Any,
            auto_first_down: false,
            replay_down: true,
            spot_foul: false,
        },
        PenaltyRule {
            kind: PenaltyKind::IllegalContact,
            probability: 0.015,
            deep_pass_probability: None,
            yards: 5,
            on: PenaltySide::Defense,
            eligibility: Eligibility::PassOnly,
            auto_first_down: true,
            replay_down: false,
            spot_foul: false,
        },
        PenaltyRule {
            kind: PenaltyKind::DefensiveOffside,
            probability: 0.02,
            deep_pass_probability: None,
            yards: 5,
            on: PenaltySide::Defense,
            eligibility: Eligibility::Any,
            auto_first_down: false,
            replay_down: true,
            spot_foul: false,
        },
        PenaltyRule {
            kind: PenaltyKind::DefensivePassInterference,
            probability: 0.02,
            deep_pass_probability: Some(0.045),
            yards: 0,
            on: PenaltySide::Defense,
            eligibility: Eligibility::PassOnly,
            auto_first_down: true,
            replay_down: false,
            spot_foul: true,
        },
        PenaltyRule {
            kind: PenaltyKind::DefensiveHolding,
            probability: 0.02,
            deep_pass_probability: None,
            yards: 5,
            on: PenaltySide::Defense,
            eligibility: Eligibility::PassOnly,
            auto_first_down: true,
            replay_down: false,
            spot_foul: false,
        },
    ]
}

// ============================================================================
// Flags
// ============================================================================

/// A flag on the field, before accept/decline and enforcement limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Foul {
    pub kind: PenaltyKind,
    pub yards: u8,
    pub on: PenaltySide,
    pub auto_first_down: bool,
    pub replay_down: bool,
    pub spot_foul: bool,
}

impl Foul {
    fn from_rule(rule: &PenaltyRule, yards: u8) -> Self {
        Self {
            kind: rule.kind,
            yards,
            on: rule.on,
            auto_first_down: rule.auto_first_down,
            replay_down: rule.replay_down,
            spot_foul: rule.spot_foul,
        }
    }
}

/// False start check. Runs before the card is consulted.
pub fn roll_pre_snap<R: Rng + ?Sized>(rng: &mut R, rules: &PenaltyRules) -> Option<Foul> {
    if !rules.enabled || !chance(rng, rules.pre_snap_probability) {
        return None;
    }
    Some(Foul {
        kind: PenaltyKind::FalseStart,
        yards: rules.false_start_yards,
        on: PenaltySide::Offense,
        auto_first_down: false,
        replay_down: true,
        spot_foul: false,
    })
}

/// Walk the in-play table in order; the first rule that triggers is the flag.
pub fn roll_in_play<R: Rng + ?Sized>(rng: &mut R, rules: &PenaltyRules, play: PlayType) -> Option<Foul> {
    if !rules.enabled {
        return None;
    }
    for rule in rules.table.iter().filter(|r| r.applies_to(play)) {
        if chance(rng, rule.probability_for(play)) {
            let yards = if rule.spot_foul { spot_foul_yards(rng, rules, play) } else { rule.yards };
            return Some(Foul::from_rule(rule, yards));
        }
    }
    None
}

/// Floor plus a random bonus; deep passes draw from a wider bonus.
pub fn spot_foul_yards<R: Rng + ?Sized>(rng: &mut R, rules: &PenaltyRules, play: PlayType) -> u8 {
    let bonus = if play.is_deep_pass() { rules.deep_spot_foul_bonus } else { rules.spot_foul_bonus };
    rules.spot_foul_floor.saturating_add(rng.gen_range(0..=bonus))
}

/// Flag printed on the card. Defensive flags on passes are spot fouls worth at
/// least the card's yardage; every other card flag replays the down.
pub fn card_foul<R: Rng + ?Sized>(
    rng: &mut R,
    rules: &PenaltyRules,
    card: CardPenalty,
    play: PlayType,
) -> Foul {
    match card.on {
        PenaltySide::Defense if play.is_pass() => Foul {
            kind: PenaltyKind::CardFlag,
            yards: card.yards.max(spot_foul_yards(rng, rules, play)),
            on: PenaltySide::Defense,
            auto_first_down: true,
            replay_down: false,
            spot_foul: true,
        },
        on => Foul {
            kind: PenaltyKind::CardFlag,
            yards: card.yards,
            on,
            auto_first_down: false,
            replay_down: true,
            spot_foul: false,
        },
    }
}

// ============================================================================
// Accept / decline and enforcement
// ============================================================================

/// What the snap produced before any flag is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapResult {
    pub yards: i32,
    pub turnover: Turnover,
    pub scored: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    Enforced(PenaltyDetail),
    Declined(PenaltyKind),
}

/// Yards actually walked off from `yard_line`: never more than half the
/// distance to the goal being approached.
pub fn half_distance_limit(on: PenaltySide, yards: u8, yard_line: u8) -> u8 {
    let room = match on {
        PenaltySide::Offense => yard_line,
        PenaltySide::Defense => 100u8.saturating_sub(yard_line),
    };
    yards.min(room / 2)
}

/// Apply the half-distance limit and produce the enforced detail.
pub fn enforce(foul: Foul, yard_line: u8) -> PenaltyDetail {
    PenaltyDetail {
        kind: foul.kind,
        yards: half_distance_limit(foul.on, foul.yards, yard_line),
        on: foul.on,
        auto_first_down: foul.auto_first_down,
        replay_down: foul.replay_down,
        spot_foul: foul.spot_foul,
    }
}

/// Whether the non-offending side takes the penalty or the play.
///
/// The defense declines an offensive foul after a turnover or when the play
/// already lost at least as much. The offense declines a defensive foul when
/// the play scored, or when the play gained at least the penalty yardage and
/// the flag would not have bought a first down the play did not.
pub fn decide(foul: Foul, snap: SnapResult, situation: &Situation) -> Enforcement {
    let detail = enforce(foul, situation.yard_line);
    let enforced = detail.yards as i32;

    let declined = match foul.on {
        PenaltySide::Offense => snap.turnover.is_some() || snap.yards <= -enforced,
        PenaltySide::Defense => {
            let play_better = !snap.turnover.is_some()
                && snap.yards >= enforced
                && (!foul.auto_first_down || snap.yards >= situation.distance as i32);
            snap.scored || play_better
        }
    };

    if declined {
        Enforcement::Declined(foul.kind)
    } else {
        Enforcement::Enforced(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn situation(yard_line: u8, distance: u8) -> Situation {
        Situation { down: 2, distance, yard_line }
    }

    fn rule(kind: PenaltyKind) -> PenaltyRule {
        default_penalty_table().into_iter().find(|r| r.kind == kind).unwrap()
    }

    fn snap(yards: i32) -> SnapResult {
        SnapResult { yards, turnover: Turnover::None, scored: false }
    }

    #[test]
    fn test_table_eligibility() {
        let dpi = rule(PenaltyKind::DefensivePassInterference);
        assert!(dpi.applies_to(PlayType::LongPass));
        assert!(!dpi.applies_to(PlayType::InsideRun));
        assert!(dpi.probability_for(PlayType::LongPass) > dpi.probability_for(PlayType::ShortPass));

        let holding = rule(PenaltyKind::OffensiveHolding);
        assert!(holding.applies_to(PlayType::QbScramble));
        assert!(!holding.applies_to(PlayType::Punt));
    }

    #[test]
    fn test_disabled_rules_never_flag() {
        let rules = PenaltyRules { enabled: false, ..PenaltyRules::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..500 {
            assert!(roll_pre_snap(&mut rng, &rules).is_none());
            assert!(roll_in_play(&mut rng, &rules, PlayType::LongPass).is_none());
        }
    }

    #[test]
    fn test_certain_rule_fires_first() {
        let mut rules = PenaltyRules::default();
        for r in &mut rules.table {
            r.probability = 1.0;
            r.deep_pass_probability = None;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let foul = roll_in_play(&mut rng, &rules, PlayType::ShortPass).unwrap();
        assert_eq!(foul.kind, PenaltyKind::OffensiveHolding);
        assert_eq!(foul.yards, 10);
    }

    #[test]
    fn test_spot_foul_yards_bounds() {
        let rules = PenaltyRules::default();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..200 {
            let short = spot_foul_yards(&mut rng, &rules, PlayType::ShortPass);
            assert!((10..=30).contains(&short));
            let deep = spot_foul_yards(&mut rng, &rules, PlayType::LongPass);
            assert!((10..=35).contains(&deep));
        }
    }

    #[test]
    fn test_card_foul_on_pass_is_spot_foul() {
        let rules = PenaltyRules::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let card = CardPenalty { yards: 40, on: PenaltySide::Defense };
        let foul = card_foul(&mut rng, &rules, card, PlayType::LongPass);
        assert!(foul.spot_foul && foul.auto_first_down);
        assert_eq!(foul.yards, 40);

        let run = card_foul(&mut rng, &rules, CardPenalty { yards: 5, on: PenaltySide::Defense }, PlayType::InsideRun);
        assert!(!run.spot_foul && !run.auto_first_down);
        assert_eq!(run.yards, 5);
    }

    #[test]
    fn test_half_distance() {
        assert_eq!(half_distance_limit(PenaltySide::Offense, 10, 6), 3);
        assert_eq!(half_distance_limit(PenaltySide::Offense, 10, 1), 0);
        assert_eq!(half_distance_limit(PenaltySide::Defense, 15, 96), 2);
        assert_eq!(half_distance_limit(PenaltySide::Defense, 15, 50), 15);
    }

    #[test]
    fn test_offensive_foul_declines() {
        let holding = Foul::from_rule(&rule(PenaltyKind::OffensiveHolding), 10);
        let at = situation(50, 10);

        assert!(matches!(decide(holding, snap(6), &at), Enforcement::Enforced(_)));
        assert!(matches!(decide(holding, snap(-12), &at), Enforcement::Declined(_)));

        let pick = SnapResult { yards: 0, turnover: Turnover::Interception, scored: false };
        assert!(matches!(decide(holding, pick, &at), Enforcement::Declined(_)));

        let td = SnapResult { yards: 50, turnover: Turnover::None, scored: true };
        assert!(matches!(decide(holding, td, &at), Enforcement::Enforced(_)));
    }

    #[test]
    fn test_defensive_foul_declines() {
        let holding = Foul::from_rule(&rule(PenaltyKind::DefensiveHolding), 5);
        let at = situation(40, 8);

        // Incomplete: take the flag and the first down
        assert!(matches!(decide(holding, snap(0), &at), Enforcement::Enforced(_)));
        // Six yards is short of the line to gain; the flag's first down is better
        assert!(matches!(decide(holding, snap(6), &at), Enforcement::Enforced(_)));
        // Twenty yards already moved the chains
        assert!(matches!(decide(holding, snap(20), &at), Enforcement::Declined(_)));

        let td = SnapResult { yards: 60, turnover: Turnover::None, scored: true };
        assert!(matches!(decide(holding, td, &at), Enforcement::Declined(_)));

        let fumble = SnapResult { yards: 0, turnover: Turnover::Fumble, scored: false };
        match decide(holding, fumble, &at) {
            Enforcement::Enforced(detail) => assert_eq!(detail.signed_yards(), 5),
            other => panic!("expected enforcement, got {other:?}"),
        }
    }
}
