//! Match (fixture) and its outcome.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Result of a match. Written once, while the match is still `Pending`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    #[default]
    Pending,
    Team1Win,
    Team2Win,
    Draw,
}

impl MatchOutcome {
    pub fn is_pending(self) -> bool {
        self == MatchOutcome::Pending
    }
}

/// A match to be created: round label and the two participants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NewMatch {
    pub round: u32,
    pub team_1: TeamId,
    pub team_2: TeamId,
}

/// A single match between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// Round number (1-based). For round-robin this is the pair's sequence number.
    pub round: u32,
    pub team_1: TeamId,
    pub team_2: TeamId,
    pub outcome: MatchOutcome,
    /// Some only for `Team1Win` / `Team2Win`.
    pub winner: Option<TeamId>,
}

impl GameMatch {
    pub fn new(tournament_id: TournamentId, fixture: NewMatch) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round: fixture.round,
            team_1: fixture.team_1,
            team_2: fixture.team_2,
            outcome: MatchOutcome::Pending,
            winner: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.outcome.is_pending()
    }
}
