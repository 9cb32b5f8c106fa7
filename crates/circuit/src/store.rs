//! Storage interface consumed by the circuit service
//!
//! Plain CRUD; the only transactional requirement is that
//! [`CircuitStore::replace_stage_results`] and
//! [`CircuitStore::create_tournament`] apply as a single unit.

use circuit_core::{
    NewPlayer, NewTournament, Player, PlayerId, PlayerUpdate, ScoredEntry, Stage, StageId,
    StageResultWithPlayer, Tournament, TournamentId, TournamentResult, TournamentUpdate,
};

use crate::error::DatabaseError;

pub type StoreResult<T> = Result<T, DatabaseError>;

pub trait CircuitStore {
    // ---- players ----

    fn insert_player(&mut self, player: &NewPlayer) -> StoreResult<Player>;

    fn get_player(&self, id: PlayerId) -> StoreResult<Option<Player>>;

    /// Any player (active or not) holding this identifier, excluding `except`
    fn find_player_by_identifier(
        &self,
        unique_identifier: &str,
        except: Option<PlayerId>,
    ) -> StoreResult<Option<Player>>;

    /// Returns false when no such player exists
    fn update_player(&mut self, id: PlayerId, update: &PlayerUpdate) -> StoreResult<bool>;

    /// Soft delete. Returns false when no such player exists
    fn deactivate_player(&mut self, id: PlayerId) -> StoreResult<bool>;

    /// Active players ordered by name
    fn active_players(&self) -> StoreResult<Vec<Player>>;

    // ---- tournaments ----

    /// Insert the tournament and its `stage_count` stages as one unit
    fn create_tournament(
        &mut self,
        tournament: &NewTournament,
        stage_count: u32,
    ) -> StoreResult<Tournament>;

    fn get_tournament(&self, id: TournamentId) -> StoreResult<Option<Tournament>>;

    fn update_tournament(&mut self, id: TournamentId, update: &TournamentUpdate)
        -> StoreResult<bool>;

    /// Removes the tournament with its stages and their results
    fn delete_tournament(&mut self, id: TournamentId) -> StoreResult<bool>;

    /// Active tournaments, newest first
    fn active_tournaments(&self) -> StoreResult<Vec<Tournament>>;

    // ---- stages and results ----

    fn get_stage(&self, id: StageId) -> StoreResult<Option<Stage>>;

    /// Stages of a tournament ordered by stage number
    fn stages_for_tournament(&self, tournament_id: TournamentId) -> StoreResult<Vec<Stage>>;

    /// Results of one stage ordered by finishing position
    fn stage_results(&self, stage_id: StageId) -> StoreResult<Vec<StageResultWithPlayer>>;

    /// Every result recorded under the tournament's stages
    fn tournament_results(&self, tournament_id: TournamentId)
        -> StoreResult<Vec<TournamentResult>>;

    /// Delete the stage's results, insert `results`, mark the stage completed
    /// with `total_participants`. Readers never see old and new rows together.
    fn replace_stage_results(
        &mut self,
        stage_id: StageId,
        results: &[ScoredEntry],
        total_participants: u32,
    ) -> StoreResult<()>;

    /// Delete the stage's results and reset it to pending
    fn clear_stage_results(&mut self, stage_id: StageId) -> StoreResult<()>;
}
