//! Play engine
//!
//! [`Engine`] owns the rules and exposes the entry points that move a
//! [`GameState`]: scrimmage plays, special teams and tries. Every entry point
//! checks the phase first and leaves the state untouched on rejection.

pub mod defense;
pub mod penalty;
pub mod play;
pub mod resolution;
pub mod special_teams;


use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{select_card, PlayType, PlayerCard};
use crate::config::RulesConfig;
use crate::error::{EngineError, EngineResult};
use crate::state::{clock, drive, ClockEvent, GameState, Phase, PlayOutcome};

pub use defense::{Coverage, DefenseCall, DefensiveFront};
pub use play::Situation;
pub use resolution::{Fallback, KickDetail, PenaltyDetail, PenaltyKind, PlayKind, Resolution, Turnover};
pub use special_teams::{SpecialTeamsContext, SpecialTeamsKind, TryChoice};

/// What one entry point call did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayReport {
    pub resolution: Resolution,
    pub outcome: PlayOutcome,
    pub clock: ClockEvent,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: RulesConfig,
}

impl Engine {
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    /// Home ball, 1st & 10 at the 25, full clock. The opening kickoff is
    /// treated as a touchback.
    pub fn start_game(&self, home: impl Into<String>, away: impl Into<String>) -> GameState {
        self.start_game_with_quarter_length(home, away, self.config.clock.quarter_length)
    }

    pub fn start_game_with_quarter_length(
        &self,
        home: impl Into<String>,
        away: impl Into<String>,
        quarter_length: u32,
    ) -> GameState {
        let drive = &self.config.drive;
        let state = GameState::new(home, away, quarter_length, drive.first_down_distance, drive.start_yard_line);
        debug!(home = %state.home_team, away = %state.away_team, "game started");
        state
    }

    /// Run one offensive play. Punts and field goals are routed to the
    /// special teams resolver with `card` as the kicker.
    pub fn apply_play<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
        card: Option<&PlayerCard>,
        play: PlayType,
        defense: Option<DefenseCall>,
    ) -> EngineResult<PlayReport> {
        match play {
            PlayType::Punt => {
                return self.resolve_special_teams(
                    state,
                    rng,
                    SpecialTeamsKind::Punt,
                    SpecialTeamsContext { kicker: card },
                )
            }
            PlayType::FieldGoal => {
                return self.resolve_special_teams(
                    state,
                    rng,
                    SpecialTeamsKind::FieldGoal,
                    SpecialTeamsContext { kicker: card },
                )
            }
            _ => {}
        }

        if state.phase != Phase::LiveDown {
            return Err(EngineError::invalid("run a scrimmage play", state.phase));
        }

        let situation = state.situation();
        let resolution = play::resolve_scrimmage(rng, &self.config, &situation, card, play, defense);
        let outcome = drive::apply_scrimmage(state, &resolution, &self.config.drive);
        Ok(self.finish(state, resolution, outcome))
    }

    pub fn resolve_special_teams<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
        kind: SpecialTeamsKind,
        context: SpecialTeamsContext<'_>,
    ) -> EngineResult<PlayReport> {
        let rules = &self.config.special_teams;
        let drive_rules = &self.config.drive;

        let (resolution, outcome) = match kind {
            SpecialTeamsKind::Punt => {
                if state.phase != Phase::LiveDown {
                    return Err(EngineError::invalid("punt", state.phase));
                }
                let (punter, fallback) = select_card(context.kicker, PlayType::Punt);
                let (roll, punt) = special_teams::punt(rng, state.yard_line, Some(punter), rules);

                let mut res = Resolution::new(PlayKind::Punt, describe_punt(&punt));
                res.roll = Some(roll);
                res.fallback = fallback;
                res.clock_runoff = self.config.clock.punt_runoff;
                res.kick = Some(KickDetail::Punt {
                    gross: punt.gross,
                    net: punt.net,
                    return_yards: punt.return_yards,
                    fair_catch: punt.fair_catch,
                    touchback: punt.touchback,
                    receiving_yard_line: punt.receiving_yard_line,
                });
                let outcome = drive::apply_punt(state, &punt, drive_rules);
                (res, outcome)
            }
            SpecialTeamsKind::FieldGoal => {
                if state.phase != Phase::LiveDown {
                    return Err(EngineError::invalid("attempt a field goal", state.phase));
                }
                let (kicker, fallback) = select_card(context.kicker, PlayType::FieldGoal);
                let kick = special_teams::field_goal(rng, state.yard_line, Some(kicker), rules);

                let verdict = if kick.good { "good" } else { "no good" };
                let mut res =
                    Resolution::new(PlayKind::FieldGoal, format!("{}-yard field goal is {verdict}", kick.distance));
                res.fallback = fallback;
                res.clock_runoff = self.config.clock.field_goal_runoff;
                res.kick = Some(KickDetail::FieldGoal {
                    distance: kick.distance,
                    probability: kick.probability,
                    draw: kick.draw,
                    good: kick.good,
                    receiving_yard_line: kick.receiving_yard_line,
                });
                let outcome = drive::apply_field_goal(state, &kick, drive_rules);
                (res, outcome)
            }
            SpecialTeamsKind::Kickoff => {
                let Phase::PreKickoff { kicking } = state.phase else {
                    return Err(EngineError::invalid("kick off", state.phase));
                };
                let (roll, kick) = special_teams::kickoff(rng, rules);

                let description = if kick.touchback {
                    format!("Kickoff of {} yards, touchback", kick.distance)
                } else {
                    format!("Kickoff of {} yards, returned {} yards", kick.distance, kick.return_yards)
                };
                let mut res = Resolution::new(PlayKind::Kickoff, description);
                res.roll = Some(roll);
                res.clock_runoff = self.config.clock.kickoff_runoff;
                res.kick = Some(KickDetail::Kickoff {
                    distance: kick.distance,
                    touchback: kick.touchback,
                    return_yards: kick.return_yards,
                    receiving_yard_line: kick.receiving_yard_line,
                });
                let outcome = drive::apply_kickoff(state, kicking, &kick, drive_rules);
                (res, outcome)
            }
        };

        Ok(self.finish(state, resolution, outcome))
    }

    /// Extra point or two-point try after a touchdown.
    pub fn resolve_pat<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
        choice: TryChoice,
    ) -> EngineResult<PlayReport> {
        let Phase::PendingTry { scoring } = state.phase else {
            return Err(EngineError::invalid("attempt a try", state.phase));
        };

        let attempt = special_teams::attempt_try(rng, choice, &self.config.special_teams);
        let verdict = if attempt.good { "good" } else { "no good" };
        let mut res = Resolution::new(PlayKind::Try(choice), format!("{} is {verdict}", choice.label()));
        res.clock_runoff = self.config.clock.try_runoff;
        res.kick = Some(KickDetail::Try {
            choice,
            probability: attempt.probability,
            good: attempt.good,
            points: attempt.points,
        });

        let outcome = drive::apply_try(state, scoring, &attempt);
        Ok(self.finish(state, res, outcome))
    }

    /// Clock, counters and the play log: shared tail of every entry point.
    fn finish(&self, state: &mut GameState, resolution: Resolution, outcome: PlayOutcome) -> PlayReport {
        let header = state.clock_label();
        let clock = clock::tick(state, resolution.clock_runoff, &self.config.clock);
        state.play_count += 1;

        let mut entry = format!("{header} {}. {outcome}.", resolution.description);
        match clock {
            ClockEvent::None => {}
            ClockEvent::QuarterEnded => entry.push_str(" End of quarter."),
            ClockEvent::HalfTime => entry.push_str(" Halftime."),
            ClockEvent::Overtime => entry.push_str(" Overtime."),
            ClockEvent::GameOver => entry.push_str(" Final."),
        }
        state.push_log(entry);

        debug!(
            outcome = %outcome,
            down = state.down,
            distance = state.distance,
            yard_line = state.yard_line,
            possession = %state.possession,
            "play applied"
        );

        PlayReport { resolution, outcome, clock }
    }
}

fn describe_punt(punt: &special_teams::PuntResult) -> String {
    if punt.touchback {
        format!("Punt of {} yards, touchback", punt.gross)
    } else if punt.fair_catch {
        format!("Punt of {} yards, fair catch", punt.gross)
    } else {
        format!("Punt of {} yards, returned {} yards", punt.gross, punt.return_yards)
    }
}
