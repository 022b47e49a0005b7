mod simulate;
mod validate;

pub use simulate::Simulate;
pub use validate::Validate;

use anyhow::{Context, Result};
use clutch_core::CardLibrary;
use std::path::{Path, PathBuf};

/// Load the base library, layer override files on top in order, then
/// attach a team metadata file if one is given.
pub(crate) fn load_library(cards: &[PathBuf], teams: Option<&Path>) -> Result<CardLibrary> {
    let mut library = CardLibrary::default();
    for path in cards {
        let layer = CardLibrary::from_path(path)
            .with_context(|| format!("failed to load cards from {}", path.display()))?;
        library
            .merge_overrides(layer)
            .with_context(|| format!("cards in {} conflict with earlier files", path.display()))?;
    }

    if let Some(path) = teams {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let teams = CardLibrary::teams_from_json_str(&json)
            .with_context(|| format!("invalid team metadata in {}", path.display()))?;
        let overlay = CardLibrary::default().with_teams(teams);
        library.merge_overrides(overlay)?;
    }

    Ok(library)
}
