//! Check card libraries before a game uses them.

use anyhow::{ensure, Result};
use clap::Parser;
use std::path::PathBuf;

use clutch_core::cards::PlayType;
use clutch_core::CardLibrary;

use super::load_library;

/// Validate card and team files
#[derive(Parser)]
pub struct Validate {
    /// Card library files, merged in order
    #[arg(value_name = "FILE", required = true)]
    cards: Vec<PathBuf>,

    /// Team metadata file
    #[arg(short, long, value_name = "FILE")]
    teams: Option<PathBuf>,

    /// Fail when a result code is outside the grammar instead of warning
    #[arg(long)]
    strict: bool,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let library = load_library(&self.cards, self.teams.as_deref())?;
        let unknown = unknown_codes(&library);

        println!("{} cards, {} teams", library.cards.len(), library.teams.len());
        for team in &library.teams {
            println!("  {} ({}): {} cards", team.name, team.abbr, library.cards_for_team(&team.id).count());
        }
        for (card_id, play, code) in &unknown {
            println!("  warning: {card_id} {play} has unrecognized code {code:?}");
        }

        ensure!(!self.strict || unknown.is_empty(), "{} unrecognized result codes", unknown.len());
        Ok(())
    }
}

/// Codes that will resolve as no gain at play time.
fn unknown_codes(library: &CardLibrary) -> Vec<(String, PlayType, String)> {
    library
        .cards
        .iter()
        .flat_map(|card| {
            card.tables.iter().flat_map(move |(play, rows)| {
                rows.iter()
                    .filter(|row| row.result.is_unknown())
                    .map(move |row| (card.id.clone(), *play, row.result.to_string()))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn cards_file(code: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "T-RB", "name": "Back", "position": "RB", "teamId": "T",
                "tables": {{"insideRun": [{{"min": 3, "max": 18, "result": "{code}"}}]}}}}]"#
        )
        .unwrap();
        file
    }

    fn validate(file: &tempfile::NamedTempFile, strict: bool) -> Result<()> {
        Validate { cards: vec![file.path().to_path_buf()], teams: None, strict }.execute()
    }

    #[test]
    fn test_valid_file_passes() {
        let file = cards_file("gain:4");
        assert!(validate(&file, true).is_ok());
    }

    #[test]
    fn test_unknown_code_only_fails_when_strict() {
        let file = cards_file("breakaway");
        assert!(validate(&file, false).is_ok());
        assert!(validate(&file, true).is_err());
    }

    #[test]
    fn test_bundled_sample_files() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/cards");
        let cmd = Validate {
            cards: vec![root.join("sample-cards.json")],
            teams: Some(root.join("team-meta.json")),
            strict: true,
        };
        assert!(cmd.execute().is_ok());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cmd = Validate { cards: vec![PathBuf::from("/definitely/not/here.json")], teams: None, strict: false };
        let err = cmd.execute().unwrap_err();
        assert!(err.to_string().contains("failed to load cards"));
    }
}
