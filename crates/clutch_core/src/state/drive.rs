//! Drive state machine
//!
//! Consumes a resolved play and moves down, distance, field position,
//! possession, score and phase. Clock handling is separate (see `clock`).

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{GameState, Phase, ScoreKind, Side};
use crate::config::{DriveRules, SafetyRule};
use crate::engine::resolution::Resolution;
use crate::engine::special_teams::{FieldGoalResult, KickoffResult, PuntResult, TryChoice, TryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayOutcome {
    FirstDown,
    NextDown,
    /// Penalty enforced, same down again
    ReplayDown,
    TurnoverOnDowns,
    Turnover,
    Touchdown,
    Safety,
    FieldGoalGood,
    FieldGoalMissed,
    Punted,
    KickedOff,
    TryGood { points: u8 },
    TryFailed,
}

impl fmt::Display for PlayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayOutcome::FirstDown => f.write_str("First down"),
            PlayOutcome::NextDown => f.write_str("Next down"),
            PlayOutcome::ReplayDown => f.write_str("Replay the down"),
            PlayOutcome::TurnoverOnDowns => f.write_str("Turnover on downs"),
            PlayOutcome::Turnover => f.write_str("Turnover"),
            PlayOutcome::Touchdown => f.write_str("Touchdown"),
            PlayOutcome::Safety => f.write_str("Safety"),
            PlayOutcome::FieldGoalGood => f.write_str("Field goal is good"),
            PlayOutcome::FieldGoalMissed => f.write_str("Field goal missed"),
            PlayOutcome::Punted => f.write_str("Punt"),
            PlayOutcome::KickedOff => f.write_str("Kickoff"),
            PlayOutcome::TryGood { points } => write!(f, "Try good ({points})"),
            PlayOutcome::TryFailed => f.write_str("Try failed"),
        }
    }
}

/// Mirror a spot into the other team's perspective.
pub fn mirror(spot: i32) -> u8 {
    (100 - spot.clamp(1, 99)) as u8
}

pub fn first_and_ten(state: &mut GameState, yard_line: u8, rules: &DriveRules) {
    state.down = 1;
    state.distance = rules.first_down_distance;
    state.yard_line = yard_line.clamp(1, 99);
}

/// Give the ball to the other team, 1st & 10 at `yard_line` (theirs).
pub fn flip_possession(state: &mut GameState, yard_line: u8, rules: &DriveRules) {
    state.possession = state.possession.opponent();
    first_and_ten(state, yard_line, rules);
}

fn touchdown(state: &mut GameState, rules: &DriveRules) -> PlayOutcome {
    let scoring = state.possession;
    state.scoreboard.record(scoring, ScoreKind::Touchdown, state.quarter, state.clock);
    state.phase = Phase::PendingTry { scoring };
    first_and_ten(state, rules.post_touchdown_yard_line, rules);
    PlayOutcome::Touchdown
}

fn safety(state: &mut GameState, rules: &DriveRules) -> PlayOutcome {
    let defense = state.possession.opponent();
    state.scoreboard.record(defense, ScoreKind::Safety, state.quarter, state.clock);
    flip_possession(state, rules.safety_restart_yard_line, rules);
    PlayOutcome::Safety
}

/// Apply a scrimmage resolution to the drive.
pub fn apply_scrimmage(state: &mut GameState, res: &Resolution, rules: &DriveRules) -> PlayOutcome {
    let start = state.yard_line as i32;

    if let Some(penalty) = res.penalty {
        let spot = (start + penalty.signed_yards()).clamp(1, 99);
        let gained = spot - start;
        state.yard_line = spot as u8;
        return if penalty.auto_first_down || gained >= state.distance as i32 {
            first_and_ten(state, spot as u8, rules);
            PlayOutcome::FirstDown
        } else {
            state.distance = (state.distance as i32 - gained).clamp(1, 99) as u8;
            PlayOutcome::ReplayDown
        };
    }

    let mut spot = start + res.yards;

    if res.touchdown || (!res.turnover.is_some() && spot >= 100) {
        return touchdown(state, rules);
    }

    if res.turnover.is_some() {
        flip_possession(state, mirror(spot), rules);
        return PlayOutcome::Turnover;
    }

    if spot <= 0 {
        match rules.safety_rule {
            SafetyRule::EndZone => return safety(state, rules),
            SafetyRule::PinAtOne => spot = 1,
        }
    }

    let gained = spot - start;
    if gained >= state.distance as i32 {
        first_and_ten(state, spot as u8, rules);
        return PlayOutcome::FirstDown;
    }

    if state.down >= 4 {
        debug!(spot, "turnover on downs");
        flip_possession(state, mirror(spot), rules);
        return PlayOutcome::TurnoverOnDowns;
    }

    state.yard_line = spot as u8;
    state.down += 1;
    state.distance = (state.distance as i32 - gained).clamp(1, 99) as u8;
    PlayOutcome::NextDown
}

pub fn apply_punt(state: &mut GameState, punt: &PuntResult, rules: &DriveRules) -> PlayOutcome {
    flip_possession(state, punt.receiving_yard_line, rules);
    PlayOutcome::Punted
}

pub fn apply_field_goal(state: &mut GameState, kick: &FieldGoalResult, rules: &DriveRules) -> PlayOutcome {
    match kick.receiving_yard_line {
        None => {
            let kicking = state.possession;
            state.scoreboard.record(kicking, ScoreKind::FieldGoal, state.quarter, state.clock);
            state.phase = Phase::PreKickoff { kicking };
            PlayOutcome::FieldGoalGood
        }
        Some(yard_line) => {
            flip_possession(state, yard_line, rules);
            PlayOutcome::FieldGoalMissed
        }
    }
}

pub fn apply_kickoff(
    state: &mut GameState,
    kicking: Side,
    kick: &KickoffResult,
    rules: &DriveRules,
) -> PlayOutcome {
    state.possession = kicking.opponent();
    first_and_ten(state, kick.receiving_yard_line, rules);
    state.phase = Phase::LiveDown;
    PlayOutcome::KickedOff
}

pub fn apply_try(state: &mut GameState, scoring: Side, attempt: &TryResult) -> PlayOutcome {
    state.phase = Phase::PreKickoff { kicking: scoring };
    if !attempt.good {
        return PlayOutcome::TryFailed;
    }
    let kind = match attempt.choice {
        TryChoice::Kick => ScoreKind::ExtraPoint,
        TryChoice::TwoPoint => ScoreKind::TwoPoint,
    };
    state.scoreboard.record(scoring, kind, state.quarter, state.clock);
    PlayOutcome::TryGood { points: attempt.points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{PenaltySide, PlayType};
    use crate::engine::resolution::{PenaltyDetail, PenaltyKind, PlayKind, Turnover};

    fn state_at(yard_line: u8, down: u8, distance: u8) -> GameState {
        let mut s = GameState::new("H", "A", 900, 10, yard_line);
        s.down = down;
        s.distance = distance;
        s
    }

    fn gain(yards: i32) -> Resolution {
        let mut res = Resolution::new(PlayKind::Scrimmage(PlayType::InsideRun), "run");
        res.yards = yards;
        res
    }

    fn flag(yards: u8, on: PenaltySide, auto_first_down: bool) -> Resolution {
        let mut res = Resolution::new(PlayKind::Scrimmage(PlayType::ShortPass), "flag");
        res.penalty = Some(PenaltyDetail {
            kind: PenaltyKind::DefensiveHolding,
            yards,
            on,
            auto_first_down,
            replay_down: !auto_first_down,
            spot_foul: false,
        });
        res
    }

    #[test]
    fn test_first_down_resets_chains() {
        let mut s = state_at(25, 1, 10);
        let out = apply_scrimmage(&mut s, &gain(12), &DriveRules::default());
        assert_eq!(out, PlayOutcome::FirstDown);
        assert_eq!((s.down, s.distance, s.yard_line), (1, 10, 37));
    }

    #[test]
    fn test_short_gain_advances_down() {
        let mut s = state_at(25, 2, 7);
        let out = apply_scrimmage(&mut s, &gain(3), &DriveRules::default());
        assert_eq!(out, PlayOutcome::NextDown);
        assert_eq!((s.down, s.distance, s.yard_line), (3, 4, 28));
    }

    #[test]
    fn test_loss_grows_distance() {
        let mut s = state_at(40, 1, 10);
        apply_scrimmage(&mut s, &gain(-6), &DriveRules::default());
        assert_eq!((s.down, s.distance, s.yard_line), (2, 16, 34));
    }

    #[test]
    fn test_turnover_on_downs_keeps_ball_in_place() {
        let mut s = state_at(40, 4, 3);
        let before = s.field_position();
        let out = apply_scrimmage(&mut s, &gain(2), &DriveRules::default());
        assert_eq!(out, PlayOutcome::TurnoverOnDowns);
        assert_eq!(s.possession, Side::Away);
        assert_eq!((s.down, s.distance), (1, 10));
        assert_eq!(s.yard_line, 58);
        assert_eq!(s.field_position(), before + 2);
    }

    #[test]
    fn test_turnover_flips_at_spot() {
        let mut s = state_at(30, 2, 5);
        let mut res = gain(0);
        res.turnover = Turnover::Interception;
        assert_eq!(apply_scrimmage(&mut s, &res, &DriveRules::default()), PlayOutcome::Turnover);
        assert_eq!(s.possession, Side::Away);
        assert_eq!(s.yard_line, 70);
    }

    #[test]
    fn test_touchdown_pending_try() {
        let mut s = state_at(90, 3, 10);
        let out = apply_scrimmage(&mut s, &gain(15), &DriveRules::default());
        assert_eq!(out, PlayOutcome::Touchdown);
        assert_eq!(s.scoreboard.home, 6);
        assert_eq!(s.phase, Phase::PendingTry { scoring: Side::Home });
        assert_eq!(s.yard_line, 25);
        assert_eq!(s.possession, Side::Home);
    }

    #[test]
    fn test_safety_in_end_zone() {
        let mut s = state_at(3, 2, 10);
        let out = apply_scrimmage(&mut s, &gain(-5), &DriveRules::default());
        assert_eq!(out, PlayOutcome::Safety);
        assert_eq!(s.scoreboard.away, 2);
        assert_eq!(s.possession, Side::Away);
        assert_eq!((s.down, s.distance, s.yard_line), (1, 10, 35));
        assert_eq!(s.phase, Phase::LiveDown);
    }

    #[test]
    fn test_pin_at_one() {
        let rules = DriveRules { safety_rule: SafetyRule::PinAtOne, ..DriveRules::default() };
        let mut s = state_at(5, 1, 10);
        let out = apply_scrimmage(&mut s, &gain(-8), &rules);
        assert_eq!(out, PlayOutcome::NextDown);
        assert_eq!((s.down, s.distance, s.yard_line), (2, 14, 1));
        assert_eq!(s.scoreboard.away, 0);
    }

    #[test]
    fn test_penalty_replays_or_moves_chains() {
        let rules = DriveRules::default();

        let mut s = state_at(50, 3, 8);
        assert_eq!(apply_scrimmage(&mut s, &flag(5, PenaltySide::Defense, false), &rules), PlayOutcome::ReplayDown);
        assert_eq!((s.down, s.distance, s.yard_line), (3, 3, 55));

        assert_eq!(apply_scrimmage(&mut s, &flag(5, PenaltySide::Defense, false), &rules), PlayOutcome::FirstDown);
        assert_eq!((s.down, s.distance, s.yard_line), (1, 10, 60));

        let mut s = state_at(50, 2, 4);
        assert_eq!(apply_scrimmage(&mut s, &flag(10, PenaltySide::Offense, false), &rules), PlayOutcome::ReplayDown);
        assert_eq!((s.down, s.distance, s.yard_line), (2, 14, 40));

        let mut s = state_at(50, 3, 12);
        assert_eq!(apply_scrimmage(&mut s, &flag(5, PenaltySide::Defense, true), &rules), PlayOutcome::FirstDown);
        assert_eq!((s.down, s.distance, s.yard_line), (1, 10, 55));
    }

    #[test]
    fn test_try_and_field_goal_phases() {
        let rules = DriveRules::default();
        let mut s = state_at(70, 4, 5);
        let good = FieldGoalResult { distance: 47, probability: 0.85, draw: 0.2, good: true, receiving_yard_line: None };
        assert_eq!(apply_field_goal(&mut s, &good, &rules), PlayOutcome::FieldGoalGood);
        assert_eq!(s.scoreboard.home, 3);
        assert_eq!(s.phase, Phase::PreKickoff { kicking: Side::Home });

        let kick = KickoffResult { distance: 70, touchback: true, return_yards: 0, receiving_yard_line: 25 };
        assert_eq!(apply_kickoff(&mut s, Side::Home, &kick, &rules), PlayOutcome::KickedOff);
        assert_eq!(s.possession, Side::Away);
        assert_eq!(s.yard_line, 25);
        assert_eq!(s.phase, Phase::LiveDown);

        s.phase = Phase::PendingTry { scoring: Side::Away };
        let attempt = TryResult { choice: TryChoice::TwoPoint, probability: 0.48, good: true, points: 2 };
        assert_eq!(apply_try(&mut s, Side::Away, &attempt), PlayOutcome::TryGood { points: 2 });
        assert_eq!(s.scoreboard.away, 2);
        assert_eq!(s.phase, Phase::PreKickoff { kicking: Side::Away });
    }
}
