//! Knockout bracket progression: generate the next round once a round is fully resolved,
//! or declare the champion when a round leaves a single winner.
//!
//! Rounds are checked in ascending order on every call. A round with a pending match stops
//! the scan, a round whose successor exists is skipped, and the first resolved round without
//! a successor is acted upon. At most one round is generated per call.
//!
//! Draws carry nobody forward. Odd winner counts drop the team shuffled into the last slot,
//! the same as round 1.

use crate::logic::fixtures;
use crate::models::{
    EngineError, GameMatch, TeamId, TournamentFormat, TournamentId, TournamentStatus,
};
use crate::storage::Storage;
use rand::Rng;
use serde::Serialize;

/// What a progression check did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progress {
    /// Round-robin tournament; nothing to advance.
    NotKnockout,
    /// No matches generated yet.
    NotStarted,
    /// This round still has pending matches.
    Waiting { round: u32 },
    /// A new round was created.
    RoundGenerated { round: u32, matches: Vec<GameMatch> },
    /// This call decided the tournament.
    ChampionDeclared { champion: TeamId },
    /// Decided by an earlier call.
    Finished { champion: TeamId },
    /// The round resolved without any winner (every match drawn).
    Stalled { round: u32 },
}

/// Inspect the bracket and advance it by at most one step.
pub fn advance_bracket<S: Storage, R: Rng + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    rng: &mut R,
) -> Result<Progress, EngineError> {
    let tournament = store.get_tournament(tournament_id)?;
    if tournament.format != TournamentFormat::Knockout {
        return Ok(Progress::NotKnockout);
    }
    if let Some(champion) = tournament.champion() {
        return Ok(Progress::Finished { champion });
    }

    let max_round = match store
        .list_matches(tournament_id, None)
        .iter()
        .map(|m| m.round)
        .max()
    {
        Some(r) => r,
        None => return Ok(Progress::NotStarted),
    };

    for round in 1..=max_round {
        let matches = store.list_matches(tournament_id, Some(round));
        if matches.iter().any(GameMatch::is_pending) {
            log::debug!("Knockout round {} still has pending matches", round);
            return Ok(Progress::Waiting { round });
        }
        if store.round_exists(tournament_id, round + 1) {
            continue;
        }

        let winners: Vec<TeamId> = matches.iter().filter_map(|m| m.winner).collect();
        return match winners.as_slice() {
            [] => {
                log::warn!(
                    "Knockout round {} produced no winners; bracket cannot advance (tournament {})",
                    round,
                    tournament_id
                );
                Ok(Progress::Stalled { round })
            }
            [champion] => {
                let champion = *champion;
                store.transaction(|s| {
                    s.set_tournament_status(tournament_id, TournamentStatus::Finished { champion })
                })?;
                log::info!("Team {} wins tournament {}", champion, tournament_id);
                Ok(Progress::ChampionDeclared { champion })
            }
            _ => {
                let next = round + 1;
                let matches =
                    fixtures::generate_knockout_round(store, tournament_id, next, &winners, rng)?;
                Ok(Progress::RoundGenerated { round: next, matches })
            }
        };
    }

    // Unreachable with contiguous rounds: the last round never has a successor.
    Ok(Progress::Waiting { round: max_round })
}
