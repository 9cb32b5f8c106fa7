//! Stage-by-stage score grid for a tournament

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Player, PlayerId, Stage, StageId, TournamentResult};

/// Column header of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageColumn {
    pub id: StageId,
    pub stage_number: u32,
    pub name: String,
}

/// One player's outcome in one stage; both fields are `None` when the player
/// sat that stage out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCell {
    pub stage_number: u32,
    pub final_position: Option<u32>,
    pub points_earned: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStageScores {
    pub player_id: PlayerId,
    pub player_name: String,
    /// One cell per column, in column order
    pub stages: Vec<StageCell>,
}

/// Completed stages as columns, players as rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageScores {
    pub stages: Vec<StageColumn>,
    pub players: Vec<PlayerStageScores>,
}

/// Build the grid from a tournament's stages and results.
///
/// Only completed stages become columns. Rows are ordered by player name.
pub fn build_stage_scores(
    stages: &[Stage],
    players: &[Player],
    results: &[TournamentResult],
) -> StageScores {
    let mut columns: Vec<StageColumn> = stages
        .iter()
        .filter(|s| s.is_completed)
        .map(|s| StageColumn {
            id: s.id,
            stage_number: s.stage_number,
            name: s.name.clone(),
        })
        .collect();
    columns.sort_by_key(|c| c.stage_number);

    let by_cell: HashMap<(PlayerId, StageId), &TournamentResult> = results
        .iter()
        .map(|r| ((r.player_id, r.stage_id), r))
        .collect();

    let mut rows: Vec<PlayerStageScores> = players
        .iter()
        .map(|player| PlayerStageScores {
            player_id: player.id,
            player_name: player.full_name.clone(),
            stages: columns
                .iter()
                .map(|col| {
                    let hit = by_cell.get(&(player.id, col.id));
                    StageCell {
                        stage_number: col.stage_number,
                        final_position: hit.map(|r| r.final_position),
                        points_earned: hit.map(|r| r.points_earned),
                    }
                })
                .collect(),
        })
        .collect();
    rows.sort_by(|a, b| {
        a.player_name
            .cmp(&b.player_name)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    StageScores {
        stages: columns,
        players: rows,
    }
}

#[cfg(test)]
#[path = "breakdown_tests.rs"]
mod breakdown_tests;
