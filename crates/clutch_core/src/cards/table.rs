//! Card table lookup and validation

use thiserror::Error;
use tracing::warn;

use super::{CardRow, ResultCode};
use crate::dice::{Roll, ROLL_MAX, ROLL_MIN};
use crate::engine::resolution::Fallback;

/// Structural problem in a card table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no rows")]
    Empty,

    #[error("row {index} has inverted range {min}..={max}")]
    Inverted { index: usize, min: u8, max: u8 },

    #[error("row {index} range {min}..={max} leaves the 3..=18 roll domain")]
    OutOfDomain { index: usize, min: u8, max: u8 },

    #[error("roll {roll} is not covered by any row")]
    Gap { roll: u8 },

    #[error("roll {roll} is covered by more than one row")]
    Overlap { roll: u8 },
}

/// First row whose inclusive range contains `roll`.
pub fn lookup(rows: &[CardRow], roll: Roll) -> Option<&CardRow> {
    rows.iter().find(|row| row.contains(roll.value()))
}

/// Check that `rows` partition the roll domain exactly once.
pub fn validate_rows(rows: &[CardRow]) -> Result<(), TableError> {
    if rows.is_empty() {
        return Err(TableError::Empty);
    }

    for (index, row) in rows.iter().enumerate() {
        if row.min > row.max {
            return Err(TableError::Inverted { index, min: row.min, max: row.max });
        }
        if row.min < ROLL_MIN || row.max > ROLL_MAX {
            return Err(TableError::OutOfDomain { index, min: row.min, max: row.max });
        }
    }

    for roll in Roll::all() {
        match rows.iter().filter(|row| row.contains(roll.value())).count() {
            0 => return Err(TableError::Gap { roll: roll.value() }),
            1 => {}
            _ => return Err(TableError::Overlap { roll: roll.value() }),
        }
    }

    Ok(())
}

/// Result of resolving a roll against a table.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeLookup {
    pub code: ResultCode,
    pub fallback: Option<Fallback>,
}

/// Resolve a roll to a code. A missing row is a data problem, not a play
/// outcome: it resolves to `gain:0` and is reported as a fallback.
pub fn resolve_code(card_id: &str, rows: &[CardRow], roll: Roll) -> CodeLookup {
    match lookup(rows, roll) {
        Some(row) => {
            let fallback = row.result.is_unknown().then(|| {
                warn!(card = card_id, code = %row.result, "unrecognized result code, treating as no gain");
                Fallback::UnrecognizedCode { card_id: card_id.to_string(), code: row.result.to_string() }
            });
            CodeLookup { code: row.result.clone(), fallback }
        }
        None => {
            warn!(card = card_id, roll = roll.value(), "no card row matches roll, treating as no gain");
            CodeLookup {
                code: ResultCode::Gain(0),
                fallback: Some(Fallback::NoMatchingRow { card_id: card_id.to_string(), roll: roll.value() }),
            }
        }
    }
}
