use super::*;
use circuit_core::{StageCell, StageColumn};

fn tournament() -> Tournament {
    let now = Utc::now();
    Tournament {
        id: 1,
        name: "Liga SAC 2026".to_string(),
        description: None,
        start_date: None,
        end_date: None,
        year: Some(2026),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn row(id: PlayerId, name: &str, total: u32, played: u32, best: Option<u32>) -> RankingRow {
    RankingRow {
        player_id: id,
        player_name: name.to_string(),
        pix_key: format!("{}@pix", name.to_lowercase()),
        total_points: total,
        stages_played: played,
        average_points: circuit_core::average_points(total, played),
        best_position: best,
        worst_position: best,
    }
}

fn grid_row(id: PlayerId, name: &str, points: Option<u32>) -> PlayerStageScores {
    PlayerStageScores {
        player_id: id,
        player_name: name.to_string(),
        stages: vec![StageCell {
            stage_number: 1,
            final_position: points.map(|_| 1),
            points_earned: points,
        }],
    }
}

fn sample_report() -> RankingReport {
    let ranking = vec![
        row(2, "Bruno", 47, 1, Some(1)),
        row(1, "Ana", 37, 1, Some(2)),
        row(3, "Caio", 0, 0, None),
    ];
    let stage_scores = StageScores {
        stages: vec![StageColumn {
            id: 10,
            stage_number: 1,
            name: "Etapa 1".to_string(),
        }],
        players: vec![
            grid_row(1, "Ana", Some(37)),
            grid_row(2, "Bruno", Some(47)),
            grid_row(3, "Caio", None),
        ],
    };
    RankingReport::new(tournament(), ranking, stage_scores)
}

#[test]
fn test_report_file_name_is_sanitized() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(
        report_file_name("Liga SAC 2026/1", date),
        "ranking_Liga_SAC_2026_1_2026-03-01"
    );
}

#[test]
fn test_zero_point_players_hidden() {
    let report = sample_report();
    assert_eq!(report.displayed_rows(true).len(), 2);
    assert_eq!(report.displayed_rows(false).len(), 3);

    let text = report.generate_report(true);
    assert!(text.contains("=== Ranking: Liga SAC 2026 ==="));
    assert!(text.contains("Bruno"));
    assert!(!text.contains("Caio"));

    let text = report.generate_report(false);
    assert!(text.contains("Caio"));
}

#[test]
fn test_stage_rows_follow_ranking() {
    let report = sample_report();
    let order: Vec<(usize, PlayerId)> = report
        .stage_rows_by_rank(true)
        .iter()
        .map(|(rank, p)| (*rank, p.player_id))
        .collect();
    assert_eq!(order, vec![(1, 2), (2, 1)]);
}

#[test]
fn test_stage_table_rendered() {
    let text = sample_report().generate_report(false);
    assert!(text.contains("=== Points per stage ==="));
    assert!(text.contains("E1"));
    assert!(text.contains("47.0"));
    // Caio's empty cell
    let caio_line = text.lines().filter(|l| l.contains("Caio")).last().unwrap();
    assert!(caio_line.contains(" -"));
}

#[test]
fn test_empty_ranking_message() {
    let report = RankingReport::new(tournament(), vec![row(1, "Ana", 0, 0, None)], StageScores::default());
    let text = report.generate_report(true);
    assert!(text.contains("No player has scored yet."));
}

#[test]
fn test_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("ranking.json");
    let report = sample_report();

    report.save_json(&path).unwrap();
    let loaded = RankingReport::load_json(&path).unwrap();
    assert_eq!(loaded, report);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        RankingReport::load_json(&dir.path().join("missing.json")),
        Err(ReportError::IoError(_))
    ));
}
