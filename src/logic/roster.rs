//! Tournament creation and team enrolment.

use crate::models::{EngineError, Team, Tournament, TournamentFormat, TournamentId};
use crate::storage::Storage;
use chrono::NaiveDate;

/// Create and persist a new open tournament.
pub fn create_tournament<S: Storage>(
    store: &mut S,
    name: &str,
    format: TournamentFormat,
    start_date: NaiveDate,
) -> Result<Tournament, EngineError> {
    let tournament = Tournament::new(name, format, start_date)?;
    store.insert_tournament(tournament.clone())?;
    log::info!(
        "Created {:?} tournament '{}' ({})",
        format,
        tournament.name,
        tournament.id
    );
    Ok(tournament)
}

/// Enrol a team. Names are trimmed and unique (case-insensitive) within the tournament.
/// The roster is frozen once fixtures exist.
pub fn add_team<S: Storage>(
    store: &mut S,
    tournament_id: TournamentId,
    name: &str,
) -> Result<Team, EngineError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(EngineError::EmptyName);
    }
    if store.matches_exist(tournament_id) {
        return Err(EngineError::RosterFrozen);
    }
    let is_duplicate = store
        .list_teams(tournament_id)?
        .iter()
        .any(|t| t.name.eq_ignore_ascii_case(name));
    if is_duplicate {
        return Err(EngineError::DuplicateTeamName);
    }
    let team = Team::new(tournament_id, name);
    store.insert_team(team.clone())?;
    log::info!("Team '{}' joined tournament {}", team.name, tournament_id);
    Ok(team)
}

/// Enrol several teams as one unit: a single bad name adds none of them.
pub fn add_teams<S: Storage>(
    store: &mut S,
    tournament_id: TournamentId,
    names: &[String],
) -> Result<Vec<Team>, EngineError> {
    store.transaction(|s| {
        names
            .iter()
            .map(|name| add_team(s, tournament_id, name))
            .collect()
    })
}
