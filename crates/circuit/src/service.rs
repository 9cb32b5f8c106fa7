//! The circuit service: validation, scoring and ranking on top of a store

use circuit_core::{
    aggregate_ranking, build_stage_scores, score_stage_entries, validate_stage_results, NewPlayer,
    NewTournament, Player, PlayerId, PlayerUpdate, RankingRow, Stage, StageEntry, StageId,
    StageResultWithPlayer, StageScores, Tournament, TournamentId, TournamentUpdate,
    STAGES_PER_TOURNAMENT,
};

use crate::error::{CircuitError, CircuitResult, EntityKind};
use crate::report::RankingReport;
use crate::store::CircuitStore;

/// Minimum length of a player's full name
pub const MIN_NAME_LEN: usize = 2;

/// Runs circuit operations against a [`CircuitStore`].
///
/// Every call is a self-contained request: nothing is cached between calls,
/// so rankings always reflect the store's committed state.
pub struct Circuit<S: CircuitStore> {
    store: S,
}

impl<S: CircuitStore> Circuit<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ---- players ----

    pub fn register_player(&mut self, player: NewPlayer) -> CircuitResult<Player> {
        let player = NewPlayer {
            full_name: player.full_name.trim().to_string(),
            pix_key: player.pix_key.trim().to_string(),
            unique_identifier: player.unique_identifier.trim().to_string(),
        };
        check_player_fields(
            Some(&player.full_name),
            Some(&player.pix_key),
            Some(&player.unique_identifier),
        )?;
        self.ensure_identifier_free(&player.unique_identifier, None)?;

        let created = self
            .store
            .insert_player(&player)
            .map_err(CircuitError::storage("create player"))?;
        tracing::info!(player_id = created.id, name = %created.full_name, "registered player");
        Ok(created)
    }

    pub fn update_player(&mut self, id: PlayerId, update: PlayerUpdate) -> CircuitResult<Player> {
        if update.is_empty() {
            return Err(CircuitError::NothingToUpdate);
        }
        let update = PlayerUpdate {
            full_name: update.full_name.map(|s| s.trim().to_string()),
            pix_key: update.pix_key.map(|s| s.trim().to_string()),
            unique_identifier: update.unique_identifier.map(|s| s.trim().to_string()),
        };
        check_player_fields(
            update.full_name.as_deref(),
            update.pix_key.as_deref(),
            update.unique_identifier.as_deref(),
        )?;
        if let Some(ident) = &update.unique_identifier {
            self.ensure_identifier_free(ident, Some(id))?;
        }

        let found = self
            .store
            .update_player(id, &update)
            .map_err(CircuitError::storage("update player"))?;
        if !found {
            return Err(CircuitError::not_found(EntityKind::Player, id));
        }
        self.player(id)
    }

    /// Soft delete; past results stay stored but drop out of rankings
    pub fn deactivate_player(&mut self, id: PlayerId) -> CircuitResult<()> {
        let found = self
            .store
            .deactivate_player(id)
            .map_err(CircuitError::storage("deactivate player"))?;
        if !found {
            return Err(CircuitError::not_found(EntityKind::Player, id));
        }
        tracing::info!(player_id = id, "deactivated player");
        Ok(())
    }

    pub fn player(&self, id: PlayerId) -> CircuitResult<Player> {
        self.store
            .get_player(id)
            .map_err(CircuitError::storage("fetch player"))?
            .ok_or_else(|| CircuitError::not_found(EntityKind::Player, id))
    }

    pub fn list_players(&self) -> CircuitResult<Vec<Player>> {
        self.store
            .active_players()
            .map_err(CircuitError::storage("fetch active players"))
    }

    fn ensure_identifier_free(&self, ident: &str, except: Option<PlayerId>) -> CircuitResult<()> {
        let taken = self
            .store
            .find_player_by_identifier(ident, except)
            .map_err(CircuitError::storage("look up player identifier"))?;
        match taken {
            Some(_) => Err(CircuitError::DuplicateIdentifier(ident.to_string())),
            None => Ok(()),
        }
    }

    // ---- tournaments ----

    /// Create a tournament together with its twelve stages
    pub fn create_tournament(&mut self, tournament: NewTournament) -> CircuitResult<Tournament> {
        let name = tournament.name.trim().to_string();
        if name.is_empty() {
            return Err(CircuitError::InvalidInput(
                "tournament name is required".to_string(),
            ));
        }
        let tournament = NewTournament { name, ..tournament };

        let created = self
            .store
            .create_tournament(&tournament, STAGES_PER_TOURNAMENT)
            .map_err(CircuitError::storage("create tournament"))?;
        tracing::info!(tournament_id = created.id, name = %created.name, "created tournament");
        Ok(created)
    }

    pub fn update_tournament(
        &mut self,
        id: TournamentId,
        update: TournamentUpdate,
    ) -> CircuitResult<Tournament> {
        if update.is_empty() {
            return Err(CircuitError::NothingToUpdate);
        }
        let update = TournamentUpdate {
            name: update.name.map(|s| s.trim().to_string()),
            ..update
        };
        if update.name.as_deref().is_some_and(str::is_empty) {
            return Err(CircuitError::InvalidInput(
                "tournament name is required".to_string(),
            ));
        }

        let found = self
            .store
            .update_tournament(id, &update)
            .map_err(CircuitError::storage("update tournament"))?;
        if !found {
            return Err(CircuitError::not_found(EntityKind::Tournament, id));
        }
        self.tournament(id)
    }

    /// Remove a tournament with all its stages and results
    pub fn delete_tournament(&mut self, id: TournamentId) -> CircuitResult<()> {
        let found = self
            .store
            .delete_tournament(id)
            .map_err(CircuitError::storage("delete tournament"))?;
        if !found {
            return Err(CircuitError::not_found(EntityKind::Tournament, id));
        }
        tracing::info!(tournament_id = id, "deleted tournament");
        Ok(())
    }

    pub fn tournament(&self, id: TournamentId) -> CircuitResult<Tournament> {
        self.store
            .get_tournament(id)
            .map_err(CircuitError::storage("fetch tournament"))?
            .ok_or_else(|| CircuitError::not_found(EntityKind::Tournament, id))
    }

    pub fn list_tournaments(&self) -> CircuitResult<Vec<Tournament>> {
        self.store
            .active_tournaments()
            .map_err(CircuitError::storage("fetch tournaments"))
    }

    pub fn stages(&self, tournament_id: TournamentId) -> CircuitResult<Vec<Stage>> {
        self.tournament(tournament_id)?;
        self.store
            .stages_for_tournament(tournament_id)
            .map_err(CircuitError::storage("fetch stages"))
    }

    // ---- stage results ----

    pub fn stage(&self, id: StageId) -> CircuitResult<Stage> {
        self.store
            .get_stage(id)
            .map_err(CircuitError::storage("fetch stage"))?
            .ok_or_else(|| CircuitError::not_found(EntityKind::Stage, id))
    }

    pub fn stage_results(&self, stage_id: StageId) -> CircuitResult<Vec<StageResultWithPlayer>> {
        self.stage(stage_id)?;
        self.store
            .stage_results(stage_id)
            .map_err(CircuitError::storage("fetch stage results"))
    }

    /// Validate, score and store a stage's full result set, replacing any
    /// previous submission. Rejected submissions write nothing.
    pub fn submit_stage_results(
        &mut self,
        stage_id: StageId,
        entries: &[StageEntry],
    ) -> CircuitResult<Stage> {
        if entries.is_empty() {
            return Err(CircuitError::InvalidInput(
                "a submission needs at least one result; clear the stage instead".to_string(),
            ));
        }

        let report = validate_stage_results(entries);
        if !report.is_valid {
            tracing::warn!(stage_id, errors = ?report.errors, "rejected stage results");
            return Err(CircuitError::Validation(report.errors));
        }

        let stage = self.stage(stage_id)?;
        for entry in entries {
            let player = self
                .store
                .get_player(entry.player_id)
                .map_err(CircuitError::storage("fetch player"))?
                .ok_or_else(|| CircuitError::not_found(EntityKind::Player, entry.player_id))?;
            if !player.is_active {
                return Err(CircuitError::InvalidInput(format!(
                    "player {} is inactive",
                    player.id
                )));
            }
        }

        let total_participants = entries.len() as u32;
        let scored = score_stage_entries(entries, stage.is_final_stage);
        self.store
            .replace_stage_results(stage_id, &scored, total_participants)
            .map_err(CircuitError::storage("save stage results"))?;

        tracing::info!(
            stage_id,
            stage_number = stage.stage_number,
            participants = total_participants,
            final_stage = stage.is_final_stage,
            "saved stage results"
        );
        self.stage(stage_id)
    }

    /// Delete every result of a stage and return it to pending
    pub fn clear_stage_results(&mut self, stage_id: StageId) -> CircuitResult<Stage> {
        self.stage(stage_id)?;
        self.store
            .clear_stage_results(stage_id)
            .map_err(CircuitError::storage("clear stage results"))?;
        tracing::info!(stage_id, "cleared stage results");
        self.stage(stage_id)
    }

    // ---- rankings ----

    /// Ranking rows for every active player, best first. Includes players
    /// with zero points.
    pub fn compute_ranking(&self, tournament_id: TournamentId) -> CircuitResult<Vec<RankingRow>> {
        self.tournament(tournament_id)?;
        let players = self.list_players()?;
        let results = self
            .store
            .tournament_results(tournament_id)
            .map_err(CircuitError::storage("fetch tournament results"))?;
        Ok(aggregate_ranking(tournament_id, &players, &results))
    }

    /// Position and points of every active player in each completed stage
    pub fn stage_scores(&self, tournament_id: TournamentId) -> CircuitResult<StageScores> {
        let stages = self.stages(tournament_id)?;
        let players = self.list_players()?;
        let results = self
            .store
            .tournament_results(tournament_id)
            .map_err(CircuitError::storage("fetch tournament results"))?;
        Ok(build_stage_scores(&stages, &players, &results))
    }

    /// Ranking plus stage grid, ready to print or export
    pub fn ranking_report(&self, tournament_id: TournamentId) -> CircuitResult<RankingReport> {
        let tournament = self.tournament(tournament_id)?;
        let ranking = self.compute_ranking(tournament_id)?;
        let stage_scores = self.stage_scores(tournament_id)?;
        Ok(RankingReport::new(tournament, ranking, stage_scores))
    }
}

fn check_player_fields(
    full_name: Option<&str>,
    pix_key: Option<&str>,
    unique_identifier: Option<&str>,
) -> CircuitResult<()> {
    if let Some(name) = full_name {
        if name.chars().count() < MIN_NAME_LEN {
            return Err(CircuitError::InvalidInput(format!(
                "full name must have at least {} characters",
                MIN_NAME_LEN
            )));
        }
    }
    if pix_key.is_some_and(str::is_empty) {
        return Err(CircuitError::InvalidInput("pix key is required".to_string()));
    }
    if unique_identifier.is_some_and(str::is_empty) {
        return Err(CircuitError::InvalidInput(
            "unique identifier is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
