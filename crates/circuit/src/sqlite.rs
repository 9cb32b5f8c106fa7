//! SQLite-backed [`CircuitStore`] using rusqlite

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;

use circuit_core::{
    NewPlayer, NewTournament, Player, PlayerId, PlayerUpdate, ScoredEntry, Stage, StageId,
    StageResultWithPlayer, Tournament, TournamentId, TournamentResult, TournamentUpdate,
};

use crate::error::DatabaseError;
use crate::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use crate::store::{CircuitStore, StoreResult};

const PLAYER_COLUMNS: &str =
    "id, full_name, pix_key, unique_identifier, is_active, created_at, updated_at";

const TOURNAMENT_COLUMNS: &str =
    "id, name, description, start_date, end_date, year, is_active, created_at, updated_at";

const STAGE_COLUMNS: &str = "id, tournament_id, stage_number, name, stage_date, is_final_stage, \
     is_completed, total_participants, created_at, updated_at";

/// Circuit database on a single SQLite connection
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a database file, running migrations as needed
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
            }
        }
        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, DatabaseError> {
        // Cascading deletes depend on this; SQLite leaves it off per connection
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.schema_version()?;
        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32, DatabaseError> {
        self.conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))
    }

    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
                    params![CURRENT_VERSION, Utc::now()],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        full_name: row.get(1)?,
        pix_key: row.get(2)?,
        unique_identifier: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn tournament_from_row(row: &Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        year: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn stage_from_row(row: &Row<'_>) -> rusqlite::Result<Stage> {
    Ok(Stage {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        stage_number: row.get(2)?,
        name: row.get(3)?,
        stage_date: row.get(4)?,
        is_final_stage: row.get(5)?,
        is_completed: row.get(6)?,
        total_participants: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

/// Run `UPDATE <table> SET ... WHERE id = ?` for the collected assignments
fn apply_update(
    conn: &Connection,
    table: &str,
    id: i64,
    mut sets: Vec<&'static str>,
    mut values: Vec<Box<dyn ToSql>>,
) -> StoreResult<bool> {
    sets.push("updated_at = ?");
    values.push(Box::new(Utc::now()));
    values.push(Box::new(id));

    let sql = format!("UPDATE {} SET {} WHERE id = ?", table, sets.join(", "));
    let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
    Ok(changed > 0)
}

impl CircuitStore for SqliteStore {
    fn insert_player(&mut self, player: &NewPlayer) -> StoreResult<Player> {
        let now: DateTime<Utc> = Utc::now();
        self.conn.execute(
            "INSERT INTO players (full_name, pix_key, unique_identifier, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, 1, ?4, ?4)",
            params![player.full_name, player.pix_key, player.unique_identifier, now],
        )?;

        Ok(Player {
            id: self.conn.last_insert_rowid(),
            full_name: player.full_name.clone(),
            pix_key: player.pix_key.clone(),
            unique_identifier: player.unique_identifier.clone(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    fn get_player(&self, id: PlayerId) -> StoreResult<Option<Player>> {
        let sql = format!("SELECT {} FROM players WHERE id = ?1", PLAYER_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![id], player_from_row)
            .optional()?)
    }

    fn find_player_by_identifier(
        &self,
        unique_identifier: &str,
        except: Option<PlayerId>,
    ) -> StoreResult<Option<Player>> {
        let sql = format!(
            "SELECT {} FROM players WHERE unique_identifier = ?1 AND (?2 IS NULL OR id != ?2)",
            PLAYER_COLUMNS
        );
        Ok(self
            .conn
            .query_row(&sql, params![unique_identifier, except], player_from_row)
            .optional()?)
    }

    fn update_player(&mut self, id: PlayerId, update: &PlayerUpdate) -> StoreResult<bool> {
        let mut sets = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(name) = &update.full_name {
            sets.push("full_name = ?");
            values.push(Box::new(name.clone()));
        }
        if let Some(pix) = &update.pix_key {
            sets.push("pix_key = ?");
            values.push(Box::new(pix.clone()));
        }
        if let Some(ident) = &update.unique_identifier {
            sets.push("unique_identifier = ?");
            values.push(Box::new(ident.clone()));
        }
        apply_update(&self.conn, "players", id, sets, values)
    }

    fn deactivate_player(&mut self, id: PlayerId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE players SET is_active = 0, updated_at = ?1 WHERE id = ?2",
            params![Utc::now(), id],
        )?;
        Ok(changed > 0)
    }

    fn active_players(&self) -> StoreResult<Vec<Player>> {
        let sql = format!(
            "SELECT {} FROM players WHERE is_active = 1 ORDER BY full_name, id",
            PLAYER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let players = stmt
            .query_map([], player_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(players)
    }

    fn create_tournament(
        &mut self,
        tournament: &NewTournament,
        stage_count: u32,
    ) -> StoreResult<Tournament> {
        let now = Utc::now();
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute(
            "INSERT INTO tournaments (name, description, start_date, end_date, year, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
            params![
                tournament.name,
                tournament.description,
                tournament.start_date,
                tournament.end_date,
                tournament.year,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO stages (tournament_id, stage_number, name, is_final_stage, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            )?;
            for number in 1..=stage_count {
                stmt.execute(params![
                    id,
                    number,
                    Stage::default_name(number),
                    Stage::is_final_number(number),
                    now,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(Tournament {
            id,
            name: tournament.name.clone(),
            description: tournament.description.clone(),
            start_date: tournament.start_date.clone(),
            end_date: tournament.end_date.clone(),
            year: tournament.year,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    fn get_tournament(&self, id: TournamentId) -> StoreResult<Option<Tournament>> {
        let sql = format!("SELECT {} FROM tournaments WHERE id = ?1", TOURNAMENT_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![id], tournament_from_row)
            .optional()?)
    }

    fn update_tournament(
        &mut self,
        id: TournamentId,
        update: &TournamentUpdate,
    ) -> StoreResult<bool> {
        let mut sets = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(name) = &update.name {
            sets.push("name = ?");
            values.push(Box::new(name.clone()));
        }
        if let Some(description) = &update.description {
            sets.push("description = ?");
            values.push(Box::new(description.clone()));
        }
        if let Some(start) = &update.start_date {
            sets.push("start_date = ?");
            values.push(Box::new(start.clone()));
        }
        if let Some(end) = &update.end_date {
            sets.push("end_date = ?");
            values.push(Box::new(end.clone()));
        }
        if let Some(year) = update.year {
            sets.push("year = ?");
            values.push(Box::new(year));
        }
        apply_update(&self.conn, "tournaments", id, sets, values)
    }

    fn delete_tournament(&mut self, id: TournamentId) -> StoreResult<bool> {
        // stages and stage_results follow through ON DELETE CASCADE
        let changed = self
            .conn
            .execute("DELETE FROM tournaments WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn active_tournaments(&self) -> StoreResult<Vec<Tournament>> {
        let sql = format!(
            "SELECT {} FROM tournaments WHERE is_active = 1 ORDER BY created_at DESC, id DESC",
            TOURNAMENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tournaments = stmt
            .query_map([], tournament_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tournaments)
    }

    fn get_stage(&self, id: StageId) -> StoreResult<Option<Stage>> {
        let sql = format!("SELECT {} FROM stages WHERE id = ?1", STAGE_COLUMNS);
        Ok(self
            .conn
            .query_row(&sql, params![id], stage_from_row)
            .optional()?)
    }

    fn stages_for_tournament(&self, tournament_id: TournamentId) -> StoreResult<Vec<Stage>> {
        let sql = format!(
            "SELECT {} FROM stages WHERE tournament_id = ?1 ORDER BY stage_number",
            STAGE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let stages = stmt
            .query_map(params![tournament_id], stage_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stages)
    }

    fn stage_results(&self, stage_id: StageId) -> StoreResult<Vec<StageResultWithPlayer>> {
        let mut stmt = self.conn.prepare(
            "SELECT sr.id, sr.stage_id, sr.player_id, p.full_name, sr.final_position,
                    sr.points_earned, sr.created_at, sr.updated_at
             FROM stage_results sr
             JOIN players p ON sr.player_id = p.id
             WHERE sr.stage_id = ?1
             ORDER BY sr.final_position",
        )?;
        let results = stmt
            .query_map(params![stage_id], |row| {
                Ok(StageResultWithPlayer {
                    id: row.get(0)?,
                    stage_id: row.get(1)?,
                    player_id: row.get(2)?,
                    player_name: row.get(3)?,
                    final_position: row.get(4)?,
                    points_earned: row.get(5)?,
                    created_at: row.get(6)?,
                    updated_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }

    fn tournament_results(
        &self,
        tournament_id: TournamentId,
    ) -> StoreResult<Vec<TournamentResult>> {
        tracing::debug!(tournament_id, "loading tournament results");
        let mut stmt = self.conn.prepare(
            "SELECT s.tournament_id, s.id, s.stage_number, sr.player_id,
                    sr.final_position, sr.points_earned
             FROM stage_results sr
             JOIN stages s ON sr.stage_id = s.id
             WHERE s.tournament_id = ?1
             ORDER BY s.stage_number, sr.final_position",
        )?;
        let results = stmt
            .query_map(params![tournament_id], |row| {
                Ok(TournamentResult {
                    tournament_id: row.get(0)?,
                    stage_id: row.get(1)?,
                    stage_number: row.get(2)?,
                    player_id: row.get(3)?,
                    final_position: row.get(4)?,
                    points_earned: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }

    fn replace_stage_results(
        &mut self,
        stage_id: StageId,
        results: &[ScoredEntry],
        total_participants: u32,
    ) -> StoreResult<()> {
        let now = Utc::now();
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute(
            "DELETE FROM stage_results WHERE stage_id = ?1",
            params![stage_id],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO stage_results (stage_id, player_id, final_position, points_earned, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            )?;
            for result in results {
                stmt.execute(params![
                    stage_id,
                    result.player_id,
                    result.final_position,
                    result.points_earned,
                    now,
                ])?;
            }
        }

        tx.execute(
            "UPDATE stages SET is_completed = 1, total_participants = ?1, updated_at = ?2 WHERE id = ?3",
            params![total_participants, now, stage_id],
        )?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }

    fn clear_stage_results(&mut self, stage_id: StageId) -> StoreResult<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tx.execute(
            "DELETE FROM stage_results WHERE stage_id = ?1",
            params![stage_id],
        )?;
        tx.execute(
            "UPDATE stages SET is_completed = 0, total_participants = 0, updated_at = ?1 WHERE id = ?2",
            params![Utc::now(), stage_id],
        )?;

        tx.commit()
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod sqlite_tests;
