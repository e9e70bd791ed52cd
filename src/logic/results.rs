//! Result recording: resolve one match and update both teams' standings.

use crate::logic::standings;
use crate::models::{EngineError, GameMatch, MatchId, MatchOutcome, TeamResult, TournamentId};
use crate::storage::Storage;

/// Record `outcome` for a pending match of the tournament.
///
/// Standings and the match row change together or not at all. A match belonging to another
/// tournament is reported as `MatchNotFound`.
pub fn record_result<S: Storage>(
    store: &mut S,
    tournament_id: TournamentId,
    match_id: MatchId,
    outcome: MatchOutcome,
) -> Result<GameMatch, EngineError> {
    let (team_1_result, team_2_result) = match outcome {
        MatchOutcome::Team1Win => (TeamResult::Win, TeamResult::Loss),
        MatchOutcome::Team2Win => (TeamResult::Loss, TeamResult::Win),
        MatchOutcome::Draw => (TeamResult::Draw, TeamResult::Draw),
        MatchOutcome::Pending => return Err(EngineError::InvalidOutcome),
    };

    let resolved = store.transaction(|s| {
        let m = s.get_match(match_id)?;
        if m.tournament_id != tournament_id {
            return Err(EngineError::MatchNotFound(match_id));
        }
        if !m.is_pending() {
            return Err(EngineError::AlreadyResolved(match_id));
        }

        standings::apply_outcome(s, tournament_id, m.team_1, team_1_result)?;
        standings::apply_outcome(s, tournament_id, m.team_2, team_2_result)?;

        let winner = match outcome {
            MatchOutcome::Team1Win => Some(m.team_1),
            MatchOutcome::Team2Win => Some(m.team_2),
            _ => None,
        };
        s.update_match_result(match_id, outcome, winner)?;
        s.get_match(match_id)
    })?;

    log::info!(
        "Recorded {:?} for match {} (round {}, tournament {})",
        outcome,
        match_id,
        resolved.round,
        tournament_id
    );
    Ok(resolved)
}
