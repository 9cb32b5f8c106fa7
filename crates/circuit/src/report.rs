//! Ranking reports: text tables and JSON export

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use circuit_core::{scoring_rows, PlayerId, PlayerStageScores, RankingRow, StageScores, Tournament};

/// A tournament's standings at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingReport {
    pub tournament: Tournament,
    /// Full ranking, zero-point players included
    pub ranking: Vec<RankingRow>,
    pub stage_scores: StageScores,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Export file stem for a tournament, e.g. `ranking_Season_2026_2026-03-01`
pub fn report_file_name(tournament_name: &str, date: NaiveDate) -> String {
    let safe: String = tournament_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("ranking_{}_{}", safe, date.format("%Y-%m-%d"))
}

fn position_cell(pos: Option<u32>) -> String {
    pos.map_or_else(|| "-".to_string(), |p| p.to_string())
}

impl RankingReport {
    pub fn new(tournament: Tournament, ranking: Vec<RankingRow>, stage_scores: StageScores) -> Self {
        Self {
            tournament,
            ranking,
            stage_scores,
            generated_at: Utc::now(),
        }
    }

    /// Rows that make it into the printed tables
    pub fn displayed_rows(&self, hide_zero_points: bool) -> Vec<&RankingRow> {
        if hide_zero_points {
            scoring_rows(&self.ranking).collect()
        } else {
            self.ranking.iter().collect()
        }
    }

    /// Stage grid rows in ranking order, limited to the displayed players
    pub fn stage_rows_by_rank(&self, hide_zero_points: bool) -> Vec<(usize, &PlayerStageScores)> {
        let rank_of: HashMap<PlayerId, usize> = self
            .displayed_rows(hide_zero_points)
            .iter()
            .enumerate()
            .map(|(idx, row)| (row.player_id, idx + 1))
            .collect();

        let mut rows: Vec<(usize, &PlayerStageScores)> = self
            .stage_scores
            .players
            .iter()
            .filter_map(|p| rank_of.get(&p.player_id).map(|&rank| (rank, p)))
            .collect();
        rows.sort_by_key(|(rank, _)| *rank);
        rows
    }

    /// Generate a text report
    pub fn generate_report(&self, hide_zero_points: bool) -> String {
        let mut report = String::new();
        report.push_str(&format!("=== Ranking: {} ===\n\n", self.tournament.name));

        let rows = self.displayed_rows(hide_zero_points);
        if rows.is_empty() {
            report.push_str("No player has scored yet.\n");
            return report;
        }

        report.push_str(&format!(
            "{:>4}  {:<28} {:>6} {:>6} {:>5} {:>5}  {}\n",
            "Pos", "Player", "Points", "Stages", "Best", "Worst", "PIX"
        ));
        report.push_str(&"-".repeat(72));
        report.push('\n');
        for (idx, row) in rows.iter().enumerate() {
            report.push_str(&format!(
                "{:>4}  {:<28} {:>6} {:>6} {:>5} {:>5}  {}\n",
                idx + 1,
                row.player_name,
                row.total_points,
                row.stages_played,
                position_cell(row.best_position),
                position_cell(row.worst_position),
                row.pix_key
            ));
        }

        if self.stage_scores.stages.is_empty() {
            return report;
        }

        report.push_str("\n=== Points per stage ===\n\n");
        report.push_str(&format!("{:>4}  {:<28}", "Pos", "Player"));
        for stage in &self.stage_scores.stages {
            report.push_str(&format!(" {:>4}", format!("E{}", stage.stage_number)));
        }
        report.push_str(&format!(" {:>7}\n", "Avg"));

        let averages: HashMap<PlayerId, f64> = self
            .ranking
            .iter()
            .map(|r| (r.player_id, r.average_points))
            .collect();
        for (rank, player) in self.stage_rows_by_rank(hide_zero_points) {
            report.push_str(&format!("{:>4}  {:<28}", rank, player.player_name));
            for cell in &player.stages {
                report.push_str(&format!(" {:>4}", position_cell(cell.points_earned)));
            }
            let avg = averages.get(&player.player_id).copied().unwrap_or(0.0);
            report.push_str(&format!(" {:>7.1}\n", avg));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self, hide_zero_points: bool) {
        println!("{}", self.generate_report(hide_zero_points));
    }

    /// Save report to JSON file
    pub fn save_json(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ReportError::IoError(e.to_string()))?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::SerializeError(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| ReportError::IoError(e.to_string()))
    }

    /// Load report from JSON file
    pub fn load_json(path: &Path) -> Result<Self, ReportError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ReportError::IoError(e.to_string()))?;
        serde_json::from_str(&contents).map_err(|e| ReportError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
