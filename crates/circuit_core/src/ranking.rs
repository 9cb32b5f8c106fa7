//! Per-tournament ranking aggregation

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::{Player, PlayerId, TournamentId, TournamentResult};

/// One player's standing within one tournament. Derived on every request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub pix_key: String,
    pub total_points: u32,
    pub stages_played: u32,
    /// Rounded to two decimals, 0 when no stage was played
    pub average_points: f64,
    pub best_position: Option<u32>,
    pub worst_position: Option<u32>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    total_points: u32,
    stages_played: u32,
    best: Option<u32>,
    worst: Option<u32>,
}

impl Tally {
    fn add(&mut self, result: &TournamentResult) {
        self.total_points += result.points_earned;
        self.stages_played += 1;
        self.best = Some(self.best.map_or(result.final_position, |b| b.min(result.final_position)));
        self.worst = Some(self.worst.map_or(result.final_position, |w| w.max(result.final_position)));
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn average_points(total_points: u32, stages_played: u32) -> f64 {
    if stages_played == 0 {
        return 0.0;
    }
    round_to_cents(total_points as f64 / stages_played as f64)
}

/// A missing best position sorts after any recorded one
fn compare_best_position(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ranking order: most points first, then best finish, then name and id so
/// repeated reads of the same data always come back in the same order.
pub fn compare_ranking_rows(a: &RankingRow, b: &RankingRow) -> Ordering {
    b.total_points
        .cmp(&a.total_points)
        .then_with(|| compare_best_position(a.best_position, b.best_position))
        .then_with(|| a.player_name.cmp(&b.player_name))
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Build the ranking of `tournament_id` for every player in `players`.
///
/// Results belonging to another tournament, or to players missing from
/// `players` (deactivated), are ignored. Zero-point players are kept.
pub fn aggregate_ranking(
    tournament_id: TournamentId,
    players: &[Player],
    results: &[TournamentResult],
) -> Vec<RankingRow> {
    let mut tallies: HashMap<PlayerId, Tally> = HashMap::with_capacity(players.len());
    for result in results.iter().filter(|r| r.tournament_id == tournament_id) {
        tallies.entry(result.player_id).or_default().add(result);
    }

    let mut rows: Vec<RankingRow> = players
        .iter()
        .map(|player| {
            let tally = tallies.get(&player.id).copied().unwrap_or_default();
            RankingRow {
                player_id: player.id,
                player_name: player.full_name.clone(),
                pix_key: player.pix_key.clone(),
                total_points: tally.total_points,
                stages_played: tally.stages_played,
                average_points: average_points(tally.total_points, tally.stages_played),
                best_position: tally.best,
                worst_position: tally.worst,
            }
        })
        .collect();

    rows.sort_by(compare_ranking_rows);
    rows
}

/// Rows that a display should show: players who scored at least one point
pub fn scoring_rows(rows: &[RankingRow]) -> impl Iterator<Item = &RankingRow> {
    rows.iter().filter(|r| r.total_points > 0)
}

#[cfg(test)]
#[path = "ranking_tests.rs"]
mod ranking_tests;
