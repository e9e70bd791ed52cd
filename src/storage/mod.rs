//! Storage collaborator: the row-level operations the engine needs.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    EngineError, GameMatch, MatchId, MatchOutcome, NewMatch, StandingsDelta, StandingsRow, Team,
    TeamId, Tournament, TournamentFormat, TournamentId, TournamentStatus,
};

/// Persistence for tournaments, teams, matches and standings.
///
/// Each engine operation runs inside [`Storage::transaction`]; if the closure returns an error
/// none of its writes may be observable afterwards.
pub trait Storage {
    fn insert_tournament(&mut self, tournament: Tournament) -> Result<(), EngineError>;
    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, EngineError>;
    fn list_tournaments(&self) -> Vec<Tournament>;
    /// Remove the tournament with all of its teams, matches and standings.
    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), EngineError>;
    fn set_tournament_status(
        &mut self,
        id: TournamentId,
        status: TournamentStatus,
    ) -> Result<(), EngineError>;

    fn tournament_format(&self, id: TournamentId) -> Result<TournamentFormat, EngineError> {
        self.get_tournament(id).map(|t| t.format)
    }

    fn insert_team(&mut self, team: Team) -> Result<(), EngineError>;
    /// Teams in insertion order.
    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, EngineError>;

    fn create_matches(
        &mut self,
        tournament_id: TournamentId,
        fixtures: &[NewMatch],
    ) -> Result<Vec<MatchId>, EngineError>;
    fn matches_exist(&self, tournament_id: TournamentId) -> bool;
    fn round_exists(&self, tournament_id: TournamentId, round: u32) -> bool;
    fn get_match(&self, id: MatchId) -> Result<GameMatch, EngineError>;
    fn update_match_result(
        &mut self,
        id: MatchId,
        outcome: MatchOutcome,
        winner: Option<TeamId>,
    ) -> Result<(), EngineError>;
    /// Matches in creation order, optionally restricted to one round.
    fn list_matches(&self, tournament_id: TournamentId, round: Option<u32>) -> Vec<GameMatch>;

    /// Insert a zeroed row unless the team already has one.
    fn upsert_standings_row(
        &mut self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> Result<(), EngineError>;
    fn increment_standings(
        &mut self,
        tournament_id: TournamentId,
        team_id: TeamId,
        delta: StandingsDelta,
    ) -> Result<(), EngineError>;
    /// Rows in creation order.
    fn list_standings(&self, tournament_id: TournamentId) -> Vec<StandingsRow>;
    fn reset_standings(&mut self, tournament_id: TournamentId) -> Result<(), EngineError>;

    /// Run `f` as one unit: either all of its writes persist or none do.
    ///
    /// `MemoryStore` snapshots the whole store for this, so each call costs O(store size).
    fn transaction<T, F>(&mut self, f: F) -> Result<T, EngineError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, EngineError>;
}
