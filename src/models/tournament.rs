//! Tournament, its format and status, and the engine's error type.

use crate::models::game::MatchId;
use crate::models::team::TeamId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// Fixtures (or this knockout round) were already generated.
    AlreadyGenerated,
    /// No match with this id in the tournament.
    MatchNotFound(MatchId),
    /// A result was already recorded for this match.
    AlreadyResolved(MatchId),
    /// Fewer than two teams at generation time.
    InvalidTeamCount { found: usize },
    /// No tournament with this id.
    TournamentNotFound(TournamentId),
    /// Team is not part of the tournament (or has no standings row).
    TeamNotFound(TeamId),
    /// The same team was passed twice to fixture generation.
    DuplicateTeam(TeamId),
    /// A team with this name already exists (names are unique, case-insensitive).
    DuplicateTeamName,
    /// Names must not be empty.
    EmptyName,
    /// Teams cannot be added after fixtures exist.
    RosterFrozen,
    /// `Pending` is not a recordable outcome.
    InvalidOutcome,
    /// Reading or writing CSV failed.
    Csv(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::AlreadyGenerated => write!(f, "Fixtures already generated"),
            EngineError::MatchNotFound(_) => write!(f, "Match not found"),
            EngineError::AlreadyResolved(_) => write!(f, "A result was already recorded for this match"),
            EngineError::InvalidTeamCount { found } => {
                write!(f, "Need at least 2 teams to generate fixtures (found {})", found)
            }
            EngineError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            EngineError::TeamNotFound(_) => write!(f, "Team not found"),
            EngineError::DuplicateTeam(_) => write!(f, "The same team was listed twice"),
            EngineError::DuplicateTeamName => write!(f, "A team with this name already exists"),
            EngineError::EmptyName => write!(f, "Name must not be empty"),
            EngineError::RosterFrozen => write!(f, "Teams cannot be added once fixtures exist"),
            EngineError::InvalidOutcome => write!(f, "Outcome must be team1_win, team2_win or draw"),
            EngineError::Csv(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<csv::Error> for EngineError {
    fn from(e: csv::Error) -> Self {
        EngineError::Csv(e.to_string())
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How fixtures are generated. Fixed once the tournament is created.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Every team plays every other team once.
    #[default]
    RoundRobin,
    /// Single elimination; winners are paired into the next round.
    Knockout,
}

/// Terminal marker so a decided bracket is not re-scanned.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Open,
    Finished { champion: TeamId },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub start_date: NaiveDate,
    pub status: TournamentStatus,
}

impl Tournament {
    /// Create an open tournament. The name is trimmed and must not be empty.
    pub fn new(
        name: impl Into<String>,
        format: TournamentFormat,
        start_date: NaiveDate,
    ) -> Result<Self, EngineError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            format,
            start_date,
            status: TournamentStatus::Open,
        })
    }

    pub fn champion(&self) -> Option<TeamId> {
        match self.status {
            TournamentStatus::Finished { champion } => Some(champion),
            TournamentStatus::Open => None,
        }
    }
}
