//! Domain records shared by the scoring engine and the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PlayerId = i64;
pub type TournamentId = i64;
pub type StageId = i64;

/// Every tournament is played over this many stages
pub const STAGES_PER_TOURNAMENT: u32 = 12;

/// Stage number that uses the final-stage points table
pub const FINAL_STAGE_NUMBER: u32 = 12;

/// A registered circuit player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub full_name: String,
    /// Payment key used to pay out prizes
    pub pix_key: String,
    /// Club-assigned identifier, unique across all players
    pub unique_identifier: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub full_name: String,
    pub pix_key: String,
    pub unique_identifier: String,
}

/// Partial player edit; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub full_name: Option<String>,
    pub pix_key: Option<String>,
    pub unique_identifier: Option<String>,
}

impl PlayerUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.pix_key.is_none() && self.unique_identifier.is_none()
    }
}

/// A season of the circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub year: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a tournament
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub year: Option<i32>,
}

/// Partial tournament edit.
///
/// The optional columns use a nested option: `Some(None)` clears the column,
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<Option<String>>,
    pub end_date: Option<Option<String>>,
    pub year: Option<Option<i32>>,
}

impl TournamentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.year.is_none()
    }
}

/// One scored event within a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub tournament_id: TournamentId,
    pub stage_number: u32,
    pub name: String,
    pub stage_date: Option<String>,
    pub is_final_stage: bool,
    pub is_completed: bool,
    /// Field size recorded at the last submission (0 while pending)
    pub total_participants: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stage {
    /// Display name given to a freshly created stage
    pub fn default_name(stage_number: u32) -> String {
        format!("Etapa {}", stage_number)
    }

    pub fn is_final_number(stage_number: u32) -> bool {
        stage_number == FINAL_STAGE_NUMBER
    }
}

/// A submitted finishing position, before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEntry {
    pub player_id: PlayerId,
    pub final_position: u32,
}

impl StageEntry {
    pub fn new(player_id: PlayerId, final_position: u32) -> Self {
        Self {
            player_id,
            final_position,
        }
    }
}

/// A finishing position with its awarded points, ready to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub player_id: PlayerId,
    pub final_position: u32,
    pub points_earned: u32,
}

/// A stored result joined with the player's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResultWithPlayer {
    pub id: i64,
    pub stage_id: StageId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub final_position: u32,
    pub points_earned: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored result flattened with its owning stage, as read for one tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResult {
    pub tournament_id: TournamentId,
    pub stage_id: StageId,
    pub stage_number: u32,
    pub player_id: PlayerId,
    pub final_position: u32,
    pub points_earned: u32,
}
