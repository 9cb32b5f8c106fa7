//! Consistency checks for a stage submission

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::StageEntry;

pub const DUPLICATE_POSITION_ERROR: &str = "Duplicate positions are not allowed";
pub const DUPLICATE_PLAYER_ERROR: &str = "A player cannot appear more than once in the same stage";
pub const NON_CONSECUTIVE_ERROR: &str = "Positions must be consecutive starting from 1st place";

/// Outcome of validating a submission. Advisory only; the caller decides
/// whether to abort the write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Check that positions form exactly `1..=N` and no player repeats.
///
/// Every violated rule is reported, not just the first.
pub fn validate_stage_results(entries: &[StageEntry]) -> ValidationReport {
    let mut errors = Vec::new();

    let mut seen_positions = HashSet::with_capacity(entries.len());
    if !entries.iter().all(|e| seen_positions.insert(e.final_position)) {
        errors.push(DUPLICATE_POSITION_ERROR.to_string());
    }

    let mut seen_players = HashSet::with_capacity(entries.len());
    if !entries.iter().all(|e| seen_players.insert(e.player_id)) {
        errors.push(DUPLICATE_PLAYER_ERROR.to_string());
    }

    let mut positions: Vec<u32> = entries.iter().map(|e| e.final_position).collect();
    positions.sort_unstable();
    let consecutive = positions
        .iter()
        .enumerate()
        .all(|(idx, &pos)| pos as usize == idx + 1);
    if !consecutive {
        errors.push(NON_CONSECUTIVE_ERROR.to_string());
    }

    ValidationReport::from_errors(errors)
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod validation_tests;
