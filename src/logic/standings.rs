//! Standings ledger: per-team win/loss/draw/points bookkeeping.

use crate::models::{EngineError, StandingsDelta, StandingsRow, TeamId, TeamResult, TournamentId};
use crate::storage::Storage;
use std::cmp::Reverse;

/// Create a zeroed row for the team unless it already has one.
pub fn init_row<S: Storage>(
    store: &mut S,
    tournament_id: TournamentId,
    team_id: TeamId,
) -> Result<(), EngineError> {
    store.upsert_standings_row(tournament_id, team_id)
}

/// Apply one match result to a team's row.
pub fn apply_outcome<S: Storage>(
    store: &mut S,
    tournament_id: TournamentId,
    team_id: TeamId,
    result: TeamResult,
) -> Result<(), EngineError> {
    store.increment_standings(tournament_id, team_id, StandingsDelta::for_result(result))
}

/// Zero every counter in the tournament. Match history is left alone.
pub fn reset<S: Storage>(store: &mut S, tournament_id: TournamentId) -> Result<(), EngineError> {
    store.reset_standings(tournament_id)?;
    log::info!("Standings reset for tournament {}", tournament_id);
    Ok(())
}

/// Standings sorted by points, then wins (both descending), then creation order.
pub fn list<S: Storage>(store: &S, tournament_id: TournamentId) -> Vec<StandingsRow> {
    let mut rows = store.list_standings(tournament_id);
    sort_rows(&mut rows);
    rows
}

/// Stable sort, so rows tied on points and wins keep their creation order.
pub fn sort_rows(rows: &mut [StandingsRow]) {
    rows.sort_by_key(|r| (Reverse(r.points), Reverse(r.wins)));
}
