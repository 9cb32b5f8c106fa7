use super::*;
use chrono::Utc;

fn stage(id: StageId, number: u32, completed: bool) -> Stage {
    let now = Utc::now();
    Stage {
        id,
        tournament_id: 1,
        stage_number: number,
        name: Stage::default_name(number),
        stage_date: None,
        is_final_stage: Stage::is_final_number(number),
        is_completed: completed,
        total_participants: if completed { 2 } else { 0 },
        created_at: now,
        updated_at: now,
    }
}

fn player(id: PlayerId, name: &str) -> Player {
    let now = Utc::now();
    Player {
        id,
        full_name: name.to_string(),
        pix_key: String::new(),
        unique_identifier: format!("ID{}", id),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn result(stage_id: StageId, stage_number: u32, player_id: PlayerId, pos: u32, pts: u32) -> TournamentResult {
    TournamentResult {
        tournament_id: 1,
        stage_id,
        stage_number,
        player_id,
        final_position: pos,
        points_earned: pts,
    }
}

#[test]
fn test_only_completed_stages_become_columns() {
    let stages = vec![stage(12, 3, true), stage(10, 1, true), stage(11, 2, false)];
    let grid = build_stage_scores(&stages, &[], &[]);

    let numbers: Vec<u32> = grid.stages.iter().map(|c| c.stage_number).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(grid.stages[0].name, "Etapa 1");
    assert!(grid.players.is_empty());
}

#[test]
fn test_cells_follow_columns() {
    let stages = vec![stage(10, 1, true), stage(11, 2, true)];
    let players = vec![player(2, "Bruno"), player(1, "Ana")];
    let results = vec![
        result(10, 1, 1, 1, 47),
        result(10, 1, 2, 2, 37),
        result(11, 2, 2, 1, 46),
    ];

    let grid = build_stage_scores(&stages, &players, &results);
    assert_eq!(grid.players.len(), 2);

    let ana = &grid.players[0];
    assert_eq!(ana.player_name, "Ana");
    assert_eq!(ana.stages.len(), 2);
    assert_eq!(ana.stages[0].final_position, Some(1));
    assert_eq!(ana.stages[0].points_earned, Some(47));
    assert_eq!(ana.stages[1].stage_number, 2);
    assert_eq!(ana.stages[1].final_position, None);
    assert_eq!(ana.stages[1].points_earned, None);

    let bruno = &grid.players[1];
    assert_eq!(bruno.stages[1].points_earned, Some(46));
}

#[test]
fn test_results_for_pending_stages_are_not_shown() {
    let stages = vec![stage(10, 1, false)];
    let players = vec![player(1, "Ana")];
    let results = vec![result(10, 1, 1, 1, 46)];

    let grid = build_stage_scores(&stages, &players, &results);
    assert!(grid.stages.is_empty());
    assert!(grid.players[0].stages.is_empty());
}
