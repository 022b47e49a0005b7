//! Clock manager
//!
//! Runoff is deducted after the drive transition. When a period hits zero it
//! rolls to the next one, except while a try is pending: then the period end
//! waits for the tick that follows the try.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{GameState, Phase, Quarter};
use crate::config::ClockRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockEvent {
    #[default]
    None,
    QuarterEnded,
    HalfTime,
    Overtime,
    GameOver,
}

/// Take `runoff` seconds off the clock and roll the period if it expired.
pub fn tick(state: &mut GameState, runoff: u32, rules: &ClockRules) -> ClockEvent {
    if state.is_game_over() {
        return ClockEvent::None;
    }

    state.clock = state.clock.saturating_sub(runoff);
    if state.clock > 0 {
        return ClockEvent::None;
    }

    if matches!(state.phase, Phase::PendingTry { .. }) {
        state.period_end_pending = true;
        return ClockEvent::None;
    }

    state.period_end_pending = false;
    end_period(state, rules)
}

/// Advance to the next period, or end the game.
pub fn end_period(state: &mut GameState, rules: &ClockRules) -> ClockEvent {
    let event = match state.quarter {
        Quarter::First => {
            state.quarter = Quarter::Second;
            ClockEvent::QuarterEnded
        }
        Quarter::Second => {
            state.quarter = Quarter::Third;
            if rules.second_half_kickoff {
                state.phase = Phase::PreKickoff { kicking: state.opening_receiver };
            }
            ClockEvent::HalfTime
        }
        Quarter::Third => {
            state.quarter = Quarter::Fourth;
            ClockEvent::QuarterEnded
        }
        Quarter::Fourth if rules.overtime && state.scoreboard.is_tied() => {
            state.quarter = Quarter::Overtime;
            state.clock = rules.overtime_length;
            state.phase = Phase::PreKickoff { kicking: state.opening_receiver };
            info!(home = state.scoreboard.home, away = state.scoreboard.away, "overtime");
            return ClockEvent::Overtime;
        }
        Quarter::Fourth | Quarter::Overtime => {
            state.phase = Phase::GameOver;
            info!(home = state.scoreboard.home, away = state.scoreboard.away, "game over");
            return ClockEvent::GameOver;
        }
    };

    state.clock = state.quarter_length;
    info!(quarter = %state.quarter, "period started");
    event
}
