//! Game session
//!
//! Bundles an [`Engine`], a [`GameState`] and the RNG that drives it, so a
//! front end can step a game one call at a time or let a [`PlayCaller`] run
//! it to the end.

mod caller;

pub use caller::{PlayCaller, SimplePlayCaller};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::cards::{CardLibrary, PlayType, PlayerCard};
use crate::config::RulesConfig;
use crate::engine::{DefenseCall, Engine, PlayReport, SpecialTeamsContext, SpecialTeamsKind, TryChoice};
use crate::error::EngineResult;
use crate::state::{GameState, Phase};

/// Result of one [`GameSession::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// One entry point ran
    Played(PlayReport),
    /// Nothing left to play
    Finished,
}

/// Totals from [`GameSession::autoplay`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplaySummary {
    pub plays: usize,
    /// Plays that needed a generic card or hit a data problem
    pub fallbacks: usize,
    pub finished: bool,
}

pub struct GameSession<R: Rng = ChaCha8Rng> {
    engine: Engine,
    state: GameState,
    rng: R,
}

impl GameSession<ChaCha8Rng> {
    /// Default rules, reproducible from `seed`.
    pub fn seeded(home: impl Into<String>, away: impl Into<String>, seed: u64) -> Self {
        Self::seeded_with_config(RulesConfig::default(), home, away, seed)
    }

    pub fn seeded_with_config(
        config: RulesConfig,
        home: impl Into<String>,
        away: impl Into<String>,
        seed: u64,
    ) -> Self {
        let engine = Engine::new(config);
        let state = engine.start_game(home, away);
        Self::new(engine, state, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn new(engine: Engine, state: GameState, rng: R) -> Self {
        Self { engine, state, rng }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn apply_play(
        &mut self,
        card: Option<&PlayerCard>,
        play: PlayType,
        defense: Option<DefenseCall>,
    ) -> EngineResult<PlayReport> {
        self.engine.apply_play(&mut self.state, &mut self.rng, card, play, defense)
    }

    pub fn resolve_special_teams(
        &mut self,
        kind: SpecialTeamsKind,
        context: SpecialTeamsContext<'_>,
    ) -> EngineResult<PlayReport> {
        self.engine.resolve_special_teams(&mut self.state, &mut self.rng, kind, context)
    }

    pub fn resolve_pat(&mut self, choice: TryChoice) -> EngineResult<PlayReport> {
        self.engine.resolve_pat(&mut self.state, &mut self.rng, choice)
    }

    /// Let `caller` pick the next action for whatever phase the game is in
    /// and run it, taking cards from `library`.
    pub fn step(&mut self, library: &CardLibrary, caller: &mut dyn PlayCaller) -> EngineResult<StepResult> {
        let report = match self.state.phase {
            Phase::GameOver => return Ok(StepResult::Finished),
            Phase::LiveDown => {
                let play = caller.call_play(&self.state, &mut self.rng);
                let defense = caller.call_defense(&self.state, &mut self.rng);
                let card = library.card_for(self.state.offense_team(), play.position());
                self.engine.apply_play(&mut self.state, &mut self.rng, card, play, defense)?
            }
            Phase::PendingTry { .. } => {
                let choice = caller.choose_try(&self.state, &mut self.rng);
                self.engine.resolve_pat(&mut self.state, &mut self.rng, choice)?
            }
            Phase::PreKickoff { kicking } => {
                let kicker = library.card_for(self.state.team(kicking), "K");
                let context = SpecialTeamsContext { kicker };
                self.engine.resolve_special_teams(
                    &mut self.state,
                    &mut self.rng,
                    SpecialTeamsKind::Kickoff,
                    context,
                )?
            }
        };
        Ok(StepResult::Played(report))
    }

    /// Step until the game ends or `max_plays` calls have run.
    pub fn autoplay(
        &mut self,
        library: &CardLibrary,
        caller: &mut dyn PlayCaller,
        max_plays: usize,
    ) -> EngineResult<AutoplaySummary> {
        let mut summary = AutoplaySummary::default();

        while summary.plays < max_plays {
            match self.step(library, caller)? {
                StepResult::Finished => break,
                StepResult::Played(report) => {
                    summary.plays += 1;
                    if report.resolution.fallback.is_some() {
                        summary.fallbacks += 1;
                    }
                }
            }
        }

        summary.finished = self.state.is_game_over();
        if summary.finished {
            info!(
                home = %self.state.home_team,
                away = %self.state.away_team,
                home_score = self.state.scoreboard.home,
                away_score = self.state.scoreboard.away,
                plays = summary.plays,
                "autoplay finished"
            );
        } else {
            debug!(plays = summary.plays, "autoplay stopped at play limit");
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Side;

    #[test]
    fn test_seeded_session_starts_at_25() {
        let session = GameSession::seeded("NYG", "DAL", 1);
        let state = session.state();
        assert_eq!(state.yard_line, 25);
        assert_eq!(state.possession, Side::Home);
        assert_eq!(state.clock, 900);
    }

    #[test]
    fn test_autoplay_finishes_with_generic_cards() {
        let library = CardLibrary::default();
        let mut session = GameSession::seeded("NYG", "DAL", 42);
        let mut caller = SimplePlayCaller::default();

        let summary = session.autoplay(&library, &mut caller, 2_000).unwrap();

        assert!(summary.finished);
        assert!(summary.fallbacks > 0);
        assert_eq!(summary.plays as u32, session.state().play_count);
        assert_eq!(session.state().log.len(), summary.plays);
        assert!(matches!(session.step(&library, &mut caller), Ok(StepResult::Finished)));
    }

    #[test]
    fn test_autoplay_respects_limit() {
        let library = CardLibrary::default();
        let mut session = GameSession::seeded("A", "B", 3);
        let mut caller = SimplePlayCaller::default();
        let summary = session.autoplay(&library, &mut caller, 10).unwrap();
        assert_eq!(summary.plays, 10);
        assert!(!summary.finished);
    }

    #[test]
    fn test_same_seed_same_game() {
        let library = CardLibrary::default();
        let run = |seed| {
            let mut session = GameSession::seeded("A", "B", seed);
            session.autoplay(&library, &mut SimplePlayCaller::default(), 2_000).unwrap();
            session.into_state()
        };
        assert_eq!(run(7), run(7));
    }
}
