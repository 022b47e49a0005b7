//! Scrimmage play pipeline
//!
//! pre-snap flag -> card selection -> 3d6 -> table lookup -> interpretation
//! -> defensive modifier -> in-play flag -> touchdown normalization.
//!
//! The pipeline only reads the situation; it never touches the game state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::defense::{adjust_yards, DefenseCall};
use super::penalty::{self, Enforcement, Foul, SnapResult};
use super::resolution::{PenaltyDetail, PlayKind, Resolution};
use crate::cards::{interpret, resolve_code, select_card, PlayType, PlayerCard};
use crate::config::RulesConfig;
use crate::dice::roll_3d6;

/// Down, distance and field position at the snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    pub down: u8,
    pub distance: u8,
    /// Offense's yard line from its own goal (1..=99)
    pub yard_line: u8,
}

impl Situation {
    pub fn yards_to_goal(&self) -> i32 {
        100 - self.yard_line as i32
    }
}

/// Resolve one scrimmage play into a [`Resolution`].
pub fn resolve_scrimmage<R: Rng + ?Sized>(
    rng: &mut R,
    config: &RulesConfig,
    situation: &Situation,
    card: Option<&PlayerCard>,
    play: PlayType,
    defense: Option<DefenseCall>,
) -> Resolution {
    let kind = PlayKind::Scrimmage(play);

    if let Some(foul) = penalty::roll_pre_snap(rng, &config.penalty) {
        let detail = penalty::enforce(foul, situation.yard_line);
        let mut res = Resolution::new(kind, describe_penalty(&detail));
        res.yards = detail.signed_yards();
        res.penalty = Some(detail);
        res.clock_runoff = config.clock.pre_snap_runoff;
        debug!(play = %play, "false start");
        return res;
    }

    let (card, fallback) = select_card(card, play);
    let roll = roll_3d6(rng);
    let rows = card.table(play).unwrap_or(&[]);
    let lookup = resolve_code(&card.id, rows, roll);
    let mut base = interpret(&lookup.code, play);
    let call = defense.unwrap_or_default();

    if base.yardage_play {
        base.yards = adjust_yards(base.yards, &call, play, &config.defense);
    }

    let scored = base.touchdown
        || (base.yardage_play && situation.yard_line as i32 + base.yards >= 100);

    let mut res = Resolution::new(kind, format!("{}: {}", play.label(), base.description));
    res.roll = Some(roll);
    res.fallback = lookup.fallback.or(fallback);

    let foul: Option<Foul> = match base.card_penalty {
        Some(card_penalty) => Some(penalty::card_foul(rng, &config.penalty, card_penalty, play)),
        None => penalty::roll_in_play(rng, &config.penalty, play),
    };

    let enforcement = foul.map(|foul| {
        if base.card_penalty.is_some() {
            Enforcement::Enforced(penalty::enforce(foul, situation.yard_line))
        } else {
            let snap = SnapResult { yards: base.yards, turnover: base.turnover, scored };
            penalty::decide(foul, snap, situation)
        }
    });

    match enforcement {
        Some(Enforcement::Enforced(detail)) => {
            res.yards = detail.signed_yards();
            res.penalty = Some(detail);
            res.clock_runoff = config.clock.penalty_runoff;
            if base.card_penalty.is_some() {
                res.description = format!("{}: {}", play.label(), describe_penalty(&detail));
            } else {
                res.description = format!("{}, nullified by {}", res.description, describe_penalty(&detail));
            }
        }
        declined => {
            if let Some(Enforcement::Declined(kind)) = declined {
                res.description = format!("{} ({} declined)", res.description, kind.label().to_lowercase());
            }
            res.turnover = base.turnover;
            res.complete = base.complete;
            if scored {
                res.touchdown = true;
                res.yards = situation.yards_to_goal();
                res.complete = play.is_pass().then_some(true);
            } else {
                res.yards = base.yards;
            }
            res.clock_runoff = runoff_for(&res, config);
        }
    }

    debug!(
        play = %play,
        roll = roll.value(),
        code = %lookup.code,
        yards = res.yards,
        turnover = %res.turnover,
        touchdown = res.touchdown,
        "resolved scrimmage play"
    );

    res
}

fn runoff_for(res: &Resolution, config: &RulesConfig) -> u32 {
    if res.is_incomplete() {
        config.clock.incomplete_runoff
    } else {
        config.clock.play_runoff
    }
}

fn describe_penalty(detail: &PenaltyDetail) -> String {
    let side = match detail.signed_yards() {
        n if n < 0 => "offense",
        _ => "defense",
    };
    let mut text = format!("{}, {} yards on the {side}", detail.kind.label(), detail.yards);
    if detail.auto_first_down {
        text.push_str(", automatic first down");
    } else if detail.replay_down {
        text.push_str(", replay the down");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRow, PenaltySide};
    use crate::engine::defense::{Coverage, DefensiveFront};
    use crate::engine::resolution::{Fallback, PenaltyKind, Turnover};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet() -> RulesConfig {
        let mut config = RulesConfig::default();
        config.penalty.enabled = false;
        config
    }

    fn single(play: PlayType, code: &str) -> PlayerCard {
        PlayerCard::new("T-1", "Test", play.position(), "T").with_table(play, vec![CardRow::new(3, 18, code)])
    }

    fn at(yard_line: u8) -> Situation {
        Situation { down: 1, distance: 10, yard_line }
    }

    #[test]
    fn test_gain_with_neutral_defense() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let card = single(PlayType::InsideRun, "gain:12");
        let res = resolve_scrimmage(&mut rng, &quiet(), &at(25), Some(&card), PlayType::InsideRun, None);
        assert_eq!(res.yards, 12);
        assert!(res.roll.is_some());
        assert_eq!(res.clock_runoff, 35);
        assert!(res.fallback.is_none());
    }

    #[test]
    fn test_defense_moves_yardage_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let call = DefenseCall::new(DefensiveFront::RunHeavy, true, Coverage::Zone);

        let gain = single(PlayType::InsideRun, "gain:5");
        let res = resolve_scrimmage(&mut rng, &quiet(), &at(40), Some(&gain), PlayType::InsideRun, Some(call));
        assert_eq!(res.yards, 2);

        let fumble = single(PlayType::InsideRun, "fum");
        let res = resolve_scrimmage(&mut rng, &quiet(), &at(40), Some(&fumble), PlayType::InsideRun, Some(call));
        assert_eq!(res.yards, 0);
        assert_eq!(res.turnover, Turnover::Fumble);

        let inc = single(PlayType::ShortPass, "inc");
        let res = resolve_scrimmage(&mut rng, &quiet(), &at(40), Some(&inc), PlayType::ShortPass, Some(call));
        assert_eq!(res.yards, 0);
        assert_eq!(res.complete, Some(false));
        assert_eq!(res.clock_runoff, 0);
    }

    #[test]
    fn test_touchdown_normalized_to_goal_line() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let td = single(PlayType::LongPass, "td");
        let res = resolve_scrimmage(&mut rng, &quiet(), &at(10), Some(&td), PlayType::LongPass, None);
        assert!(res.touchdown);
        assert_eq!(res.yards, 90);

        let long = single(PlayType::InsideRun, "gain:30");
        let res = resolve_scrimmage(&mut rng, &quiet(), &at(80), Some(&long), PlayType::InsideRun, None);
        assert!(res.touchdown);
        assert_eq!(res.yards, 20);
    }

    #[test]
    fn test_missing_card_uses_generic() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let res = resolve_scrimmage(&mut rng, &quiet(), &at(25), None, PlayType::OutsideRun, None);
        assert!(matches!(res.fallback, Some(Fallback::MissingCard { .. })));
    }

    #[test]
    fn test_gap_in_table_is_no_gain() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        // Only roll 3 is covered, so nearly every roll misses the table
        let card = PlayerCard::new("GAP", "Gap", "RB", "T")
            .with_table(PlayType::InsideRun, vec![CardRow::new(3, 3, "gain:50")]);
        let mut saw_fallback = false;
        for _ in 0..20 {
            let res = resolve_scrimmage(&mut rng, &quiet(), &at(25), Some(&card), PlayType::InsideRun, None);
            if let Some(Fallback::NoMatchingRow { roll, .. }) = res.fallback {
                assert_ne!(roll, 3);
                assert_eq!(res.yards, 0);
                saw_fallback = true;
            }
        }
        assert!(saw_fallback);
    }

    #[test]
    fn test_card_penalty_on_pass_is_spot_foul() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let card = single(PlayType::LongPass, "pen:15:def");
        let res = resolve_scrimmage(&mut rng, &quiet_with_card_flags(), &at(30), Some(&card), PlayType::LongPass, None);
        let detail = res.penalty.expect("card flag is always enforced");
        assert_eq!(detail.kind, PenaltyKind::CardFlag);
        assert_eq!(detail.on, PenaltySide::Defense);
        assert!(detail.spot_foul && detail.auto_first_down);
        assert!(detail.yards >= 15);
        assert_eq!(res.yards, detail.yards as i32);
    }

    // Card flags are resolved even with random flags turned off
    fn quiet_with_card_flags() -> RulesConfig {
        let mut config = RulesConfig::default();
        config.penalty.pre_snap_probability = 0.0;
        for rule in &mut config.penalty.table {
            rule.probability = 0.0;
            rule.deep_pass_probability = None;
        }
        config
    }

    #[test]
    fn test_false_start_replaces_play() {
        let mut config = quiet_with_card_flags();
        config.penalty.pre_snap_probability = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let card = single(PlayType::InsideRun, "td");
        let res = resolve_scrimmage(&mut rng, &config, &at(40), Some(&card), PlayType::InsideRun, None);
        assert!(!res.touchdown);
        assert!(res.roll.is_none());
        assert_eq!(res.yards, -5);
        assert_eq!(res.penalty.unwrap().kind, PenaltyKind::FalseStart);
        assert_eq!(res.clock_runoff, 0);
    }

    #[test]
    fn test_defensive_flag_wipes_out_turnover() {
        let mut config = quiet_with_card_flags();
        let offside = config
            .penalty
            .table
            .iter_mut()
            .find(|r| r.kind == PenaltyKind::DefensiveOffside)
            .unwrap();
        offside.probability = 1.0;

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let card = single(PlayType::ShortPass, "int");
        let res = resolve_scrimmage(&mut rng, &config, &at(40), Some(&card), PlayType::ShortPass, None);
        assert_eq!(res.turnover, Turnover::None);
        assert_eq!(res.yards, 5);
        assert_eq!(res.clock_runoff, 5);
    }
}
