//! Generic placeholder cards
//!
//! Used whenever the caller has no card for the position a play needs, or the
//! card it passed has no table for the play type.

use once_cell::sync::Lazy;
use tracing::warn;

use super::{CardRow, PlayFamily, PlayType, PlayerCard};
use crate::engine::resolution::Fallback;

pub const GENERIC_TEAM: &str = "GEN";

static GENERIC_QB: Lazy<PlayerCard> = Lazy::new(|| {
    PlayerCard::new("GEN-QB", "Generic Quarterback", "QB", GENERIC_TEAM)
        .with_rating(50)
        .with_table(
            PlayType::ShortPass,
            rows(&[
                (3, 3, "int"),
                (4, 4, "sack:6"),
                (5, 7, "inc"),
                (8, 8, "gain:3"),
                (9, 10, "gain:5"),
                (11, 11, "gain:7"),
                (12, 12, "gain:8"),
                (13, 13, "gain:10"),
                (14, 14, "inc"),
                (15, 15, "gain:12"),
                (16, 16, "gain:15"),
                (17, 17, "gain:22"),
                (18, 18, "td"),
            ]),
        )
        .with_table(
            PlayType::LongPass,
            rows(&[
                (3, 4, "int"),
                (5, 5, "sack:8"),
                (6, 9, "inc"),
                (10, 10, "gain:18"),
                (11, 11, "inc"),
                (12, 12, "gain:22"),
                (13, 13, "pen:15:def"),
                (14, 14, "gain:27"),
                (15, 15, "inc"),
                (16, 16, "gain:35"),
                (17, 17, "gain:45"),
                (18, 18, "td"),
            ]),
        )
        .with_table(
            PlayType::QbScramble,
            rows(&[
                (3, 3, "fum"),
                (4, 5, "sack:4"),
                (6, 8, "gain:2"),
                (9, 11, "gain:4"),
                (12, 13, "gain:7"),
                (14, 15, "gain:10"),
                (16, 16, "gain:14"),
                (17, 17, "gain:20"),
                (18, 18, "gain:30"),
            ]),
        )
});

static GENERIC_RB: Lazy<PlayerCard> = Lazy::new(|| {
    PlayerCard::new("GEN-RB", "Generic Running Back", "RB", GENERIC_TEAM)
        .with_rating(50)
        .with_table(
            PlayType::InsideRun,
            rows(&[
                (3, 3, "fum"),
                (4, 4, "sack:2"),
                (5, 6, "gain:0"),
                (7, 8, "gain:2"),
                (9, 10, "gain:3"),
                (11, 12, "gain:4"),
                (13, 13, "gain:6"),
                (14, 14, "gain:8"),
                (15, 15, "gain:11"),
                (16, 16, "gain:15"),
                (17, 17, "gain:25"),
                (18, 18, "td"),
            ]),
        )
        .with_table(
            PlayType::OutsideRun,
            rows(&[
                (3, 3, "fum"),
                (4, 5, "sack:3"),
                (6, 7, "gain:1"),
                (8, 9, "gain:3"),
                (10, 11, "gain:5"),
                (12, 12, "gain:7"),
                (13, 13, "gain:9"),
                (14, 14, "gain:12"),
                (15, 15, "pen:5:def"),
                (16, 16, "gain:18"),
                (17, 17, "gain:30"),
                (18, 18, "td"),
            ]),
        )
});

static GENERIC_P: Lazy<PlayerCard> = Lazy::new(|| {
    PlayerCard::new("GEN-P", "Generic Punter", "P", GENERIC_TEAM).with_rating(50).with_table(
        PlayType::Punt,
        rows(&[
            (3, 3, "gain:30"),
            (4, 5, "gain:35"),
            (6, 8, "gain:39"),
            (9, 12, "gain:43"),
            (13, 15, "gain:47"),
            (16, 17, "gain:52"),
            (18, 18, "gain:58"),
        ]),
    )
});

static GENERIC_K: Lazy<PlayerCard> =
    Lazy::new(|| PlayerCard::new("GEN-K", "Generic Kicker", "K", GENERIC_TEAM).with_rating(50));

fn rows(bands: &[(u8, u8, &str)]) -> Vec<CardRow> {
    bands.iter().map(|&(min, max, code)| CardRow::new(min, max, code)).collect()
}

/// Placeholder card for the position `play` needs.
pub fn generic_card(play: PlayType) -> &'static PlayerCard {
    match play {
        PlayType::InsideRun | PlayType::OutsideRun => &*GENERIC_RB,
        PlayType::ShortPass | PlayType::LongPass | PlayType::QbScramble => &*GENERIC_QB,
        PlayType::Punt => &*GENERIC_P,
        PlayType::FieldGoal => &*GENERIC_K,
    }
}

/// Pick the card to resolve `play` with, substituting the generic card when
/// the given one is missing or has no table for the play.
pub fn select_card(card: Option<&PlayerCard>, play: PlayType) -> (&PlayerCard, Option<Fallback>) {
    let needs_table = play.family() != PlayFamily::Kick;
    match card {
        Some(card) if !needs_table || card.table(play).is_some() => (card, None),
        Some(card) => {
            warn!(card = %card.id, play = %play, "card has no table for play, using generic card");
            let fallback = Fallback::MissingCard {
                position: play.position().to_string(),
                play,
                card_id: Some(card.id.clone()),
            };
            (generic_card(play), Some(fallback))
        }
        None => {
            warn!(position = play.position(), play = %play, "no card supplied, using generic card");
            let fallback =
                Fallback::MissingCard { position: play.position().to_string(), play, card_id: None };
            (generic_card(play), Some(fallback))
        }
    }
}
