//! Standings rows and the increments applied to them.

use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// What a single match meant for one team.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamResult {
    Win,
    Loss,
    Draw,
}

/// Counter increments for one standings row.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StandingsDelta {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: u32,
}

impl StandingsDelta {
    pub fn for_result(result: TeamResult) -> Self {
        match result {
            TeamResult::Win => Self {
                games_played: 1,
                wins: 1,
                points: POINTS_FOR_WIN,
                ..Self::default()
            },
            TeamResult::Loss => Self {
                games_played: 1,
                losses: 1,
                ..Self::default()
            },
            TeamResult::Draw => Self {
                games_played: 1,
                draws: 1,
                points: POINTS_FOR_DRAW,
                ..Self::default()
            },
        }
    }
}

/// Aggregate record for one team in one tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_id: TeamId,
    pub tournament_id: TournamentId,
    /// Display name, copied from the team when the row is created.
    pub team_name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: u32,
}

impl StandingsRow {
    /// Fresh row with all counters at zero.
    pub fn new(tournament_id: TournamentId, team_id: TeamId, team_name: impl Into<String>) -> Self {
        Self {
            team_id,
            tournament_id,
            team_name: team_name.into(),
            ..Self::default()
        }
    }

    pub fn apply(&mut self, delta: StandingsDelta) {
        self.games_played += delta.games_played;
        self.wins += delta.wins;
        self.losses += delta.losses;
        self.draws += delta.draws;
        self.points += delta.points;
    }

    pub fn reset(&mut self) {
        self.games_played = 0;
        self.wins = 0;
        self.losses = 0;
        self.draws = 0;
        self.points = 0;
    }
}
