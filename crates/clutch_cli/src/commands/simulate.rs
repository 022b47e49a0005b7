//! Autoplay a game between two teams from card files.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use clutch_core::{CardLibrary, GameSession, GameState, RulesConfig, Side, SimplePlayCaller};

use super::load_library;

/// Autoplay a full game
#[derive(Parser)]
pub struct Simulate {
    /// Card library files; later files override earlier ones by card id
    #[arg(short, long = "cards", value_name = "FILE")]
    cards: Vec<PathBuf>,

    /// Team metadata file (JSON array of {id, abbr, name})
    #[arg(short, long, value_name = "FILE")]
    teams: Option<PathBuf>,

    /// Home team id
    #[arg(long, default_value = "HOME")]
    home: String,

    /// Away team id
    #[arg(long, default_value = "AWAY")]
    away: String,

    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Rules preset (default, classic, arcade); falls back to CLUTCH_RULES_PROFILE
    #[arg(short, long, value_name = "NAME")]
    profile: Option<String>,

    /// Full rules file; wins over --profile
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    #[arg(long, default_value_t = 2_000)]
    max_plays: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Final score and scoring plays
    Summary,
    /// Summary plus the play-by-play log
    Log,
    /// Final game state as JSON
    Json,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let library = load_library(&self.cards, self.teams.as_deref())?;
        let config = self.rules_config()?;

        for team in [&self.home, &self.away] {
            if !library.cards.is_empty() && library.cards_for_team(team).next().is_none() {
                tracing::warn!(team = %team, "no cards for team, every play uses generic cards");
            }
        }

        let mut caller = SimplePlayCaller::default().with_kicking_rules(config.special_teams.clone());
        let mut session = GameSession::seeded_with_config(config, &self.home, &self.away, self.seed);
        let summary = session.autoplay(&library, &mut caller, self.max_plays)?;
        let state = session.into_state();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            OutputFormat::Summary | OutputFormat::Log => {
                if matches!(self.format, OutputFormat::Log) {
                    for entry in &state.log {
                        println!("{entry}");
                    }
                    println!();
                }
                let home = team_name(&library, &state.home_team);
                let away = team_name(&library, &state.away_team);
                print_summary(&state, &home, &away);
                println!("Plays: {} ({} with generic cards)", summary.plays, summary.fallbacks);
                if !summary.finished {
                    println!("Stopped at the {}-play limit", self.max_plays);
                }
            }
        }

        Ok(())
    }

    fn rules_config(&self) -> Result<RulesConfig> {
        let config = match (&self.rules, &self.profile) {
            (Some(path), _) => RulesConfig::from_path(path)
                .with_context(|| format!("failed to load rules from {}", path.display()))?,
            (None, Some(name)) => RulesConfig::from_profile(name)?,
            (None, None) => RulesConfig::from_env_or_default(),
        };
        config.validate()?;
        Ok(config)
    }
}

fn team_name(library: &CardLibrary, team: &str) -> String {
    library.team(team).map_or_else(|| team.to_string(), |meta| meta.name.clone())
}

fn print_summary(state: &GameState, home: &str, away: &str) {
    println!("{home} {} - {} {away} ({})", state.scoreboard.home, state.scoreboard.away, state.quarter);
    for event in &state.scoreboard.events {
        let team = match event.side {
            Side::Home => home,
            Side::Away => away,
        };
        println!(
            "  {} {:02}:{:02}  {team} {:?} (+{})",
            event.quarter,
            event.clock / 60,
            event.clock % 60,
            event.kind,
            event.points
        );
    }
}
