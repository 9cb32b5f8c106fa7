use super::*;
use crate::sqlite::SqliteStore;
use circuit_core::validation::{DUPLICATE_PLAYER_ERROR, NON_CONSECUTIVE_ERROR};

fn circuit() -> Circuit<SqliteStore> {
    Circuit::new(SqliteStore::open_in_memory().unwrap())
}

fn new_player(name: &str, ident: &str) -> NewPlayer {
    NewPlayer {
        full_name: name.to_string(),
        pix_key: format!("{}@pix", ident),
        unique_identifier: ident.to_string(),
    }
}

fn season(circuit: &mut Circuit<SqliteStore>, name: &str) -> (Tournament, Vec<Stage>) {
    let t = circuit
        .create_tournament(NewTournament {
            name: name.to_string(),
            ..Default::default()
        })
        .unwrap();
    let stages = circuit.stages(t.id).unwrap();
    (t, stages)
}

#[test]
fn test_register_player_trims_and_validates() {
    let mut c = circuit();
    let p = c.register_player(new_player("  Ana Souza ", " A1 ")).unwrap();
    assert_eq!(p.full_name, "Ana Souza");
    assert_eq!(p.unique_identifier, "A1");

    let err = c.register_player(new_player("A", "A2")).unwrap_err();
    assert!(matches!(err, CircuitError::InvalidInput(_)));

    let mut missing_pix = new_player("Bruno", "B1");
    missing_pix.pix_key = "   ".to_string();
    assert!(matches!(
        c.register_player(missing_pix),
        Err(CircuitError::InvalidInput(_))
    ));
}

#[test]
fn test_duplicate_identifier() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let bia = c.register_player(new_player("Bia", "B1")).unwrap();

    assert!(matches!(
        c.register_player(new_player("Other", "A1")),
        Err(CircuitError::DuplicateIdentifier(_))
    ));

    let steal = PlayerUpdate {
        unique_identifier: Some("A1".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        c.update_player(bia.id, steal),
        Err(CircuitError::DuplicateIdentifier(_))
    ));

    // Re-saving your own identifier is fine
    let keep = PlayerUpdate {
        unique_identifier: Some("A1".to_string()),
        full_name: Some("Ana Lima".to_string()),
        ..Default::default()
    };
    let updated = c.update_player(ana.id, keep).unwrap();
    assert_eq!(updated.full_name, "Ana Lima");
}

#[test]
fn test_update_player_errors() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();

    assert!(matches!(
        c.update_player(ana.id, PlayerUpdate::default()),
        Err(CircuitError::NothingToUpdate)
    ));

    let rename = PlayerUpdate {
        full_name: Some("Zoe".to_string()),
        ..Default::default()
    };
    assert!(c.update_player(999, rename).unwrap_err().is_not_found());
}

#[test]
fn test_deactivated_player_leaves_ranking() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let bia = c.register_player(new_player("Bia", "B1")).unwrap();
    let (t, stages) = season(&mut c, "Season");

    c.submit_stage_results(
        stages[0].id,
        &[StageEntry::new(ana.id, 1), StageEntry::new(bia.id, 2)],
    )
    .unwrap();

    c.deactivate_player(bia.id).unwrap();
    let ranking = c.compute_ranking(t.id).unwrap();
    assert_eq!(ranking.len(), 1);
    assert_eq!(ranking[0].player_id, ana.id);

    // Results stay stored
    assert_eq!(c.stage_results(stages[0].id).unwrap().len(), 2);
    assert!(c.deactivate_player(12345).unwrap_err().is_not_found());
}

#[test]
fn test_create_tournament_has_twelve_stages() {
    let mut c = circuit();
    let (t, stages) = season(&mut c, "  Season 2026 ");
    assert_eq!(t.name, "Season 2026");
    assert_eq!(stages.len(), 12);
    assert_eq!(stages.iter().filter(|s| s.is_final_stage).count(), 1);
    assert!(stages[11].is_final_stage);

    assert!(matches!(
        c.create_tournament(NewTournament::default()),
        Err(CircuitError::InvalidInput(_))
    ));
}

#[test]
fn test_update_and_delete_tournament() {
    let mut c = circuit();
    let (t, _) = season(&mut c, "Season");

    let updated = c
        .update_tournament(
            t.id,
            TournamentUpdate {
                description: Some(Some("Monday nights".to_string())),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Monday nights"));

    assert!(matches!(
        c.update_tournament(t.id, TournamentUpdate::default()),
        Err(CircuitError::NothingToUpdate)
    ));
    assert!(matches!(
        c.update_tournament(
            t.id,
            TournamentUpdate {
                name: Some("  ".to_string()),
                ..Default::default()
            }
        ),
        Err(CircuitError::InvalidInput(_))
    ));

    c.delete_tournament(t.id).unwrap();
    assert!(c.tournament(t.id).unwrap_err().is_not_found());
    assert!(c.stages(t.id).unwrap_err().is_not_found());
    assert!(c.delete_tournament(t.id).unwrap_err().is_not_found());
    assert!(c.list_tournaments().unwrap().is_empty());
}

#[test]
fn test_submit_scores_with_field_size() {
    let mut c = circuit();
    let ids: Vec<PlayerId> = (0..10)
        .map(|i| c.register_player(new_player(&format!("Player {:02}", i), &format!("P{}", i))).unwrap().id)
        .collect();
    let (_, stages) = season(&mut c, "Season");

    let entries: Vec<StageEntry> = ids
        .iter()
        .enumerate()
        .map(|(idx, &id)| StageEntry::new(id, idx as u32 + 1))
        .collect();
    let stage = c.submit_stage_results(stages[0].id, &entries).unwrap();
    assert!(stage.is_completed);
    assert_eq!(stage.total_participants, 10);

    let results = c.stage_results(stages[0].id).unwrap();
    let points: Vec<u32> = results.iter().map(|r| r.points_earned).collect();
    assert_eq!(points, vec![55, 45, 36, 28, 21, 15, 10, 6, 3, 1]);
}

#[test]
fn test_final_stage_uses_final_table() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let bia = c.register_player(new_player("Bia", "B1")).unwrap();
    let (_, stages) = season(&mut c, "Season");

    c.submit_stage_results(
        stages[11].id,
        &[StageEntry::new(ana.id, 1), StageEntry::new(bia.id, 2)],
    )
    .unwrap();
    let results = c.stage_results(stages[11].id).unwrap();
    assert_eq!(results[0].points_earned, 70);
    assert_eq!(results[1].points_earned, 55);
}

#[test]
fn test_invalid_submission_writes_nothing() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let bia = c.register_player(new_player("Bia", "B1")).unwrap();
    let (_, stages) = season(&mut c, "Season");
    let stage_id = stages[0].id;

    c.submit_stage_results(stage_id, &[StageEntry::new(ana.id, 1)]).unwrap();

    let err = c
        .submit_stage_results(
            stage_id,
            &[StageEntry::new(bia.id, 1), StageEntry::new(bia.id, 3)],
        )
        .unwrap_err();
    match err {
        CircuitError::Validation(errors) => {
            assert!(errors.contains(&DUPLICATE_PLAYER_ERROR.to_string()));
            assert!(errors.contains(&NON_CONSECUTIVE_ERROR.to_string()));
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let results = c.stage_results(stage_id).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].player_id, ana.id);
}

#[test]
fn test_submit_rejects_unknown_references() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let (_, stages) = season(&mut c, "Season");

    let err = c.submit_stage_results(9999, &[StageEntry::new(ana.id, 1)]).unwrap_err();
    assert!(matches!(
        err,
        CircuitError::NotFound {
            kind: EntityKind::Stage,
            id: 9999
        }
    ));

    let err = c
        .submit_stage_results(stages[0].id, &[StageEntry::new(ana.id, 1), StageEntry::new(77, 2)])
        .unwrap_err();
    assert!(matches!(
        err,
        CircuitError::NotFound {
            kind: EntityKind::Player,
            id: 77
        }
    ));
    assert!(c.stage_results(stages[0].id).unwrap().is_empty());

    assert!(matches!(
        c.submit_stage_results(stages[0].id, &[]),
        Err(CircuitError::InvalidInput(_))
    ));
}

#[test]
fn test_submit_rejects_inactive_player() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let (_, stages) = season(&mut c, "Season");
    c.deactivate_player(ana.id).unwrap();

    assert!(matches!(
        c.submit_stage_results(stages[0].id, &[StageEntry::new(ana.id, 1)]),
        Err(CircuitError::InvalidInput(_))
    ));
}

#[test]
fn test_clear_returns_stage_to_pending() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let (_, stages) = season(&mut c, "Season");

    c.submit_stage_results(stages[2].id, &[StageEntry::new(ana.id, 1)]).unwrap();
    let stage = c.clear_stage_results(stages[2].id).unwrap();
    assert!(!stage.is_completed);
    assert_eq!(stage.total_participants, 0);
    assert!(c.stage_results(stages[2].id).unwrap().is_empty());

    assert!(c.clear_stage_results(4242).unwrap_err().is_not_found());
}

#[test]
fn test_ranking_unknown_tournament() {
    let c = circuit();
    assert!(matches!(
        c.compute_ranking(5),
        Err(CircuitError::NotFound {
            kind: EntityKind::Tournament,
            id: 5
        })
    ));
}

#[test]
fn test_stage_scores_and_report() {
    let mut c = circuit();
    let ana = c.register_player(new_player("Ana", "A1")).unwrap();
    let bia = c.register_player(new_player("Bia", "B1")).unwrap();
    let _idle = c.register_player(new_player("Caio", "C1")).unwrap();
    let (t, stages) = season(&mut c, "Season");

    c.submit_stage_results(stages[0].id, &[StageEntry::new(ana.id, 1), StageEntry::new(bia.id, 2)])
        .unwrap();
    c.submit_stage_results(stages[4].id, &[StageEntry::new(bia.id, 1)]).unwrap();

    let grid = c.stage_scores(t.id).unwrap();
    let numbers: Vec<u32> = grid.stages.iter().map(|s| s.stage_number).collect();
    assert_eq!(numbers, vec![1, 5]);
    assert_eq!(grid.players.len(), 3);
    let ana_row = grid.players.iter().find(|p| p.player_id == ana.id).unwrap();
    assert_eq!(ana_row.stages[0].points_earned, Some(47));
    assert_eq!(ana_row.stages[1].points_earned, None);

    let report = c.ranking_report(t.id).unwrap();
    assert_eq!(report.tournament.id, t.id);
    assert_eq!(report.ranking.len(), 3);
    assert_eq!(report.ranking[0].player_id, bia.id);
    assert_eq!(report.ranking[0].total_points, 37 + 46);
    assert_eq!(report.displayed_rows(true).len(), 2);
}
