//! Card library
//!
//! Cards, team metadata and optional rosters loaded from JSON. The library is
//! the only place structural table problems are rejected; the engine itself
//! tolerates whatever it is handed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::PlayerCard;
use crate::error::ConfigurationError;

pub const LIBRARY_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMeta {
    pub id: String,
    pub abbr: String,
    pub name: String,
}

/// team id -> position -> card id
pub type Rosters = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLibrary {
    #[serde(default = "default_schema")]
    pub schema_version: u32,
    #[serde(default)]
    pub teams: Vec<TeamMeta>,
    #[serde(default)]
    pub cards: Vec<PlayerCard>,
    #[serde(default)]
    pub rosters: Rosters,
}

fn default_schema() -> u32 {
    LIBRARY_SCHEMA_VERSION
}

impl Default for CardLibrary {
    fn default() -> Self {
        Self {
            schema_version: LIBRARY_SCHEMA_VERSION,
            teams: Vec::new(),
            cards: Vec::new(),
            rosters: Rosters::new(),
        }
    }
}

/// Accepted file shapes: a full library document or a bare card array.
#[derive(Deserialize)]
#[serde(untagged)]
enum LibraryDocument {
    Library(CardLibrary),
    Cards(Vec<PlayerCard>),
}

impl CardLibrary {
    pub fn new(cards: Vec<PlayerCard>) -> Self {
        Self { cards, ..Default::default() }
    }

    pub fn with_teams(mut self, teams: Vec<TeamMeta>) -> Self {
        self.teams = teams;
        self
    }

    /// Parse and validate a library document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let library = match serde_json::from_str::<LibraryDocument>(json) {
            Ok(LibraryDocument::Library(library)) => library,
            Ok(LibraryDocument::Cards(cards)) => CardLibrary::new(cards),
            // Untagged errors are opaque; re-parse for a useful message
            Err(_) => serde_json::from_str::<CardLibrary>(json)?,
        };
        library.validate()?;
        debug!(cards = library.cards.len(), teams = library.teams.len(), "card library parsed");
        Ok(library)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let library = Self::from_json_str(&json)?;
        info!(path = %path.display(), cards = library.cards.len(), "loaded card library");
        Ok(library)
    }

    /// Team metadata file: a JSON array of `{id, abbr, name}`.
    pub fn teams_from_json_str(json: &str) -> Result<Vec<TeamMeta>, ConfigurationError> {
        let teams: Vec<TeamMeta> = serde_json::from_str(json)?;
        if teams.iter().any(|t| t.id.trim().is_empty()) {
            return Err(ConfigurationError::EmptyId);
        }
        Ok(teams)
    }

    /// Reject structural problems: schema, empty or duplicate ids, table
    /// gaps and overlaps, roster entries pointing nowhere. Unknown result
    /// codes are tolerated; they degrade at resolution time.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.schema_version != LIBRARY_SCHEMA_VERSION {
            return Err(ConfigurationError::UnsupportedSchema {
                found: self.schema_version,
                expected: LIBRARY_SCHEMA_VERSION,
            });
        }

        let mut seen = HashSet::new();
        for card in &self.cards {
            if card.id.trim().is_empty() {
                return Err(ConfigurationError::EmptyId);
            }
            if !seen.insert(card.id.as_str()) {
                return Err(ConfigurationError::DuplicateCard { id: card.id.clone() });
            }
            card.validate().map_err(|(play, source)| ConfigurationError::InvalidTable {
                card_id: card.id.clone(),
                play,
                source,
            })?;
        }

        if self.teams.iter().any(|t| t.id.trim().is_empty()) {
            return Err(ConfigurationError::EmptyId);
        }

        for (team, slots) in &self.rosters {
            for card_id in slots.values() {
                if !seen.contains(card_id.as_str()) {
                    return Err(ConfigurationError::UnknownRosterCard {
                        team: team.clone(),
                        card_id: card_id.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Overlay `overrides` on top of this library. Cards with a matching id
    /// are replaced, new ones appended; teams likewise; roster slots are
    /// merged per team. Nothing changes unless the merged library validates.
    pub fn merge_overrides(&mut self, overrides: CardLibrary) -> Result<(), ConfigurationError> {
        let mut merged = self.clone();
        let mut replaced = 0usize;
        for card in overrides.cards {
            match merged.cards.iter_mut().find(|c| c.id == card.id) {
                Some(slot) => {
                    *slot = card;
                    replaced += 1;
                }
                None => merged.cards.push(card),
            }
        }

        for team in overrides.teams {
            match merged.teams.iter_mut().find(|t| t.id == team.id) {
                Some(slot) => *slot = team,
                None => merged.teams.push(team),
            }
        }

        for (team, slots) in overrides.rosters {
            merged.rosters.entry(team).or_default().extend(slots);
        }

        merged.validate()?;
        debug!(replaced, total = merged.cards.len(), "merged card overrides");
        *self = merged;
        Ok(())
    }

    pub fn card(&self, id: &str) -> Option<&PlayerCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn team(&self, id: &str) -> Option<&TeamMeta> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn cards_for_team<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a PlayerCard> + 'a {
        self.cards.iter().filter(move |c| c.team_id == team)
    }

    /// Card for `position` on `team`: the roster slot if one is set, else
    /// the first card on the team at that position.
    pub fn card_for(&self, team: &str, position: &str) -> Option<&PlayerCard> {
        let rostered = self
            .rosters
            .get(team)
            .and_then(|slots| slots.get(position))
            .and_then(|id| self.card(id));

        rostered.or_else(|| {
            self.cards
                .iter()
                .find(|c| c.team_id == team && c.position.eq_ignore_ascii_case(position))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardRow, PlayType, TableError};
    use std::io::Write;

    fn qb(id: &str, team: &str, gain: i32) -> PlayerCard {
        PlayerCard::new(id, id, "QB", team)
            .with_table(PlayType::ShortPass, vec![CardRow::new(3, 18, format!("gain:{gain}"))])
    }

    #[test]
    fn test_load_bare_card_array() {
        let json = r#"[
            {"id": "A-QB", "name": "A", "position": "QB", "teamId": "A",
             "tables": {"shortPass": [{"min": 3, "max": 18, "result": "gain:5"}]}}
        ]"#;
        let library = CardLibrary::from_json_str(json).unwrap();
        assert_eq!(library.cards.len(), 1);
        assert_eq!(library.card_for("A", "QB").unwrap().id, "A-QB");
        assert!(library.card_for("A", "RB").is_none());
    }

    #[test]
    fn test_load_library_document() {
        let json = r#"{
            "schemaVersion": 1,
            "teams": [{"id": "A", "abbr": "AAA", "name": "Alphas"}],
            "cards": [
                {"id": "A-QB-1", "name": "One", "position": "QB", "teamId": "A"},
                {"id": "A-QB-2", "name": "Two", "position": "QB", "teamId": "A"}
            ],
            "rosters": {"A": {"QB": "A-QB-2"}}
        }"#;
        let library = CardLibrary::from_json_str(json).unwrap();
        assert_eq!(library.team("A").unwrap().abbr, "AAA");
        assert_eq!(library.card_for("A", "QB").unwrap().id, "A-QB-2");
    }

    #[test]
    fn test_validate_rejects_table_gap() {
        let json = r#"[
            {"id": "A-RB", "name": "A", "position": "RB", "teamId": "A",
             "tables": {"insideRun": [
                {"min": 3, "max": 9, "result": "gain:2"},
                {"min": 11, "max": 18, "result": "gain:6"}
             ]}}
        ]"#;
        let err = CardLibrary::from_json_str(json).unwrap_err();
        match err {
            ConfigurationError::InvalidTable { card_id, play, source } => {
                assert_eq!(card_id, "A-RB");
                assert_eq!(play, PlayType::InsideRun);
                assert_eq!(source, TableError::Gap { roll: 10 });
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_tolerates_unknown_codes() {
        let library = CardLibrary::new(vec![PlayerCard::new("X", "X", "RB", "T")
            .with_table(PlayType::InsideRun, vec![CardRow::new(3, 18, "breakaway")])]);
        assert!(library.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_schema() {
        let dup = CardLibrary::new(vec![qb("Q", "A", 1), qb("Q", "A", 2)]);
        assert!(matches!(dup.validate(), Err(ConfigurationError::DuplicateCard { .. })));

        let mut future = CardLibrary::new(vec![]);
        future.schema_version = 9;
        assert!(matches!(
            future.validate(),
            Err(ConfigurationError::UnsupportedSchema { found: 9, expected: 1 })
        ));

        let mut dangling = CardLibrary::new(vec![qb("Q", "A", 1)]);
        dangling.rosters.entry("A".into()).or_default().insert("RB".into(), "missing".into());
        assert!(matches!(dangling.validate(), Err(ConfigurationError::UnknownRosterCard { .. })));
    }

    #[test]
    fn test_merge_overrides_replaces_by_id() {
        let mut base = CardLibrary::new(vec![qb("A-QB", "A", 3), qb("B-QB", "B", 4)]);
        let overrides = CardLibrary::new(vec![qb("A-QB", "A", 40), qb("C-QB", "C", 9)]);

        base.merge_overrides(overrides).unwrap();

        assert_eq!(base.cards.len(), 3);
        let rows = base.card("A-QB").unwrap().table(PlayType::ShortPass).unwrap();
        assert_eq!(rows[0].result.to_string(), "gain:40");
        assert!(base.card("C-QB").is_some());
    }

    #[test]
    fn test_failed_merge_leaves_library_untouched() {
        let mut base = CardLibrary::new(vec![qb("A-QB", "A", 3)]);
        let before = base.clone();

        let mut overrides = CardLibrary::new(vec![qb("A-QB", "A", 40), qb("B-QB", "B", 1)]);
        overrides.rosters.entry("B".into()).or_default().insert("QB".into(), "nobody".into());

        assert!(matches!(
            base.merge_overrides(overrides),
            Err(ConfigurationError::UnknownRosterCard { .. })
        ));
        assert_eq!(base, before);
    }

    #[test]
    fn test_from_path_and_team_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "Z-K", "name": "Kicker", "position": "K", "teamId": "Z", "rating": 80}}]"#
        )
        .unwrap();

        let library = CardLibrary::from_path(file.path()).unwrap();
        assert_eq!(library.card_for("Z", "k").unwrap().rating, Some(80));

        let teams = CardLibrary::teams_from_json_str(
            r#"[{"id": "Z", "abbr": "ZED", "name": "Zeds"}]"#,
        )
        .unwrap();
        assert_eq!(teams[0].name, "Zeds");

        let missing = CardLibrary::from_path(file.path().with_extension("nope"));
        assert!(matches!(missing, Err(ConfigurationError::Io(_))));
    }

    #[test]
    fn test_bundled_sample_library() {
        let library = CardLibrary::from_json_str(include_str!("../../../../data/cards/sample-cards.json")).unwrap();
        assert_eq!(library.teams.len(), 2);
        assert_eq!(library.cards_for_team("NYG").count(), 4);
        assert_eq!(library.card_for("NYG", "P").unwrap().rating, Some(62));
        // Dallas has no kicker card; the engine falls back to the generic one
        assert!(library.card_for("DAL", "K").is_none());

        let shouted = library.card("DAL-QB-1").unwrap().table(PlayType::ShortPass).unwrap();
        assert_eq!(shouted.last().unwrap().result.to_string(), "td");

        let teams = CardLibrary::teams_from_json_str(include_str!("../../../../data/cards/team-meta.json")).unwrap();
        assert_eq!(teams.len(), 3);
    }
}
