use rand::RngCore;

use crate::cards::PlayType;
use crate::config::SpecialTeamsRules;
use crate::dice::chance;
use crate::engine::special_teams::{field_goal_distance, make_probability};
use crate::engine::{DefenseCall, TryChoice};
use crate::state::{GameState, Quarter};

/// Decides plays for one or both teams during autoplay.
pub trait PlayCaller {
    fn call_play(&mut self, state: &GameState, rng: &mut dyn RngCore) -> PlayType;

    /// `None` lets the engine use its neutral call.
    fn call_defense(&mut self, state: &GameState, rng: &mut dyn RngCore) -> Option<DefenseCall>;

    fn choose_try(&mut self, state: &GameState, rng: &mut dyn RngCore) -> TryChoice;
}

/// Coin-flip play calling with sensible 4th-down decisions.
#[derive(Debug, Clone)]
pub struct SimplePlayCaller {
    /// Chance of calling a pass on downs 1-3
    pub pass_probability: f64,
    /// Share of passes thrown deep
    pub deep_share: f64,
    /// Kick a field goal on 4th down when the make chance is at least this
    pub field_goal_threshold: f64,
    /// Go for it on 4th and this many or fewer past midfield
    pub go_for_it_distance: u8,
    kicking: SpecialTeamsRules,
}

impl Default for SimplePlayCaller {
    fn default() -> Self {
        Self {
            pass_probability: 0.55,
            deep_share: 0.3,
            field_goal_threshold: 0.5,
            go_for_it_distance: 1,
            kicking: SpecialTeamsRules::default(),
        }
    }
}

impl SimplePlayCaller {
    /// Use the kicking rules the engine is configured with for 4th-down math.
    pub fn with_kicking_rules(mut self, rules: SpecialTeamsRules) -> Self {
        self.kicking = rules;
        self
    }

    fn fourth_down(&self, state: &GameState) -> Option<PlayType> {
        if state.down < 4 {
            return None;
        }
        let distance = field_goal_distance(state.yard_line, &self.kicking);
        if make_probability(distance, None, &self.kicking) >= self.field_goal_threshold {
            return Some(PlayType::FieldGoal);
        }
        if state.yard_line >= 50 && state.distance <= self.go_for_it_distance {
            return None;
        }
        Some(PlayType::Punt)
    }
}

impl PlayCaller for SimplePlayCaller {
    fn call_play(&mut self, state: &GameState, rng: &mut dyn RngCore) -> PlayType {
        if let Some(kick) = self.fourth_down(state) {
            return kick;
        }

        if chance(rng, self.pass_probability) {
            if chance(rng, self.deep_share) {
                PlayType::LongPass
            } else {
                PlayType::ShortPass
            }
        } else {
            match rng.next_u32() % 10 {
                0..=4 => PlayType::InsideRun,
                5..=8 => PlayType::OutsideRun,
                _ => PlayType::QbScramble,
            }
        }
    }

    fn call_defense(&mut self, _state: &GameState, rng: &mut dyn RngCore) -> Option<DefenseCall> {
        Some(DefenseCall::random(rng))
    }

    /// Kick, unless a late two-pointer ties the game.
    fn choose_try(&mut self, state: &GameState, _rng: &mut dyn RngCore) -> TryChoice {
        let us = state.scoreboard.points(state.possession) as i64;
        let them = state.scoreboard.points(state.possession.opponent()) as i64;
        if state.quarter >= Quarter::Fourth && them - us == 2 {
            TryChoice::TwoPoint
        } else {
            TryChoice::Kick
        }
    }
}
