//! Points tables and the per-position points calculation

use std::collections::BTreeMap;

use crate::types::{ScoredEntry, StageEntry};

/// Base points for the top positions of a stage.
///
/// Positions past the end of `top_positions` all receive `tail_base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsTable {
    pub top_positions: [u32; 9],
    pub tail_base: u32,
}

/// Table used for stages 1 through 11
pub const NORMAL_STAGE_TABLE: PointsTable = PointsTable {
    top_positions: [46, 37, 29, 22, 16, 11, 7, 4, 2],
    tail_base: 1,
};

/// Table used for the final stage
pub const FINAL_STAGE_TABLE: PointsTable = PointsTable {
    top_positions: [69, 55, 43, 33, 24, 16, 10, 6, 3],
    tail_base: 1,
};

impl PointsTable {
    pub fn for_stage(is_final_stage: bool) -> &'static PointsTable {
        if is_final_stage {
            &FINAL_STAGE_TABLE
        } else {
            &NORMAL_STAGE_TABLE
        }
    }

    /// Base value for a 1-indexed position
    pub fn base_points(&self, position: u32) -> u32 {
        position
            .checked_sub(1)
            .and_then(|idx| self.top_positions.get(idx as usize))
            .copied()
            .unwrap_or(self.tail_base)
    }
}

/// Points for finishing at `position` in a field of `total_participants`.
///
/// Base value from the matching table plus one point for every player who
/// finished below. Callers validate `1 <= position <= total_participants`
/// first; out-of-range input never panics but the value is meaningless.
pub fn calculate_points(position: u32, total_participants: u32, is_final_stage: bool) -> u32 {
    let table = PointsTable::for_stage(is_final_stage);
    let finished_below = total_participants.saturating_sub(position);
    table.base_points(position) + finished_below
}

/// Points for every requested position in one stage
pub fn calculate_all_position_points(
    positions: &[u32],
    total_participants: u32,
    is_final_stage: bool,
) -> BTreeMap<u32, u32> {
    positions
        .iter()
        .map(|&pos| (pos, calculate_points(pos, total_participants, is_final_stage)))
        .collect()
}

/// Score a validated submission. The field size is the number of entries.
pub fn score_stage_entries(entries: &[StageEntry], is_final_stage: bool) -> Vec<ScoredEntry> {
    let total = entries.len() as u32;
    entries
        .iter()
        .map(|e| ScoredEntry {
            player_id: e.player_id,
            final_position: e.final_position,
            points_earned: calculate_points(e.final_position, total, is_final_stage),
        })
        .collect()
}

#[cfg(test)]
#[path = "scoring_tests.rs"]
mod scoring_tests;
