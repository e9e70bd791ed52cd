//! Fixture generation: round-robin schedules and knockout rounds.

use crate::logic::standings;
use crate::models::{EngineError, GameMatch, NewMatch, TeamId, TournamentId};
use crate::storage::Storage;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Every unordered pair of `teams`, in input order: (0,1), (0,2), ..., (1,2), ...
pub fn round_robin_pairs(teams: &[TeamId]) -> Vec<(TeamId, TeamId)> {
    teams
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| teams[i + 1..].iter().map(move |&b| (a, b)))
        .collect()
}

/// Pair consecutive teams. With an odd count the last team is left out.
pub fn knockout_pairs(teams: &[TeamId]) -> Vec<(TeamId, TeamId)> {
    teams
        .chunks_exact(2)
        .map(|chunk| (chunk[0], chunk[1]))
        .collect()
}

fn check_teams(teams: &[TeamId]) -> Result<(), EngineError> {
    if teams.len() < 2 {
        return Err(EngineError::InvalidTeamCount { found: teams.len() });
    }
    let mut seen = HashSet::with_capacity(teams.len());
    for &id in teams {
        if !seen.insert(id) {
            return Err(EngineError::DuplicateTeam(id));
        }
    }
    Ok(())
}

/// Create one match per unordered pair, numbered 1..=n(n-1)/2, and a standings row per team.
///
/// Runs at most once per tournament: fails with `AlreadyGenerated` if any match exists.
pub fn generate_round_robin<S: Storage>(
    store: &mut S,
    tournament_id: TournamentId,
    teams: &[TeamId],
) -> Result<Vec<GameMatch>, EngineError> {
    check_teams(teams)?;
    let fixtures: Vec<NewMatch> = round_robin_pairs(teams)
        .into_iter()
        .zip(1..)
        .map(|((team_1, team_2), round)| NewMatch { round, team_1, team_2 })
        .collect();

    let matches = store.transaction(|s| {
        if s.matches_exist(tournament_id) {
            return Err(EngineError::AlreadyGenerated);
        }
        persist_round(s, tournament_id, &fixtures, teams)
    })?;
    log::info!(
        "Generated {} round-robin matches for {} teams (tournament {})",
        matches.len(),
        teams.len(),
        tournament_id
    );
    Ok(matches)
}

/// Shuffle `teams` and pair them into knockout round `round`.
///
/// Fails with `AlreadyGenerated` if the round already has matches. With an odd count the
/// team shuffled into the last slot gets no match this round.
pub fn generate_knockout_round<S: Storage, R: Rng + ?Sized>(
    store: &mut S,
    tournament_id: TournamentId,
    round: u32,
    teams: &[TeamId],
    rng: &mut R,
) -> Result<Vec<GameMatch>, EngineError> {
    check_teams(teams)?;
    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);

    if shuffled.len() % 2 == 1 {
        if let Some(dropped) = shuffled.last() {
            log::warn!(
                "Odd number of teams ({}) in knockout round {}: team {} is left without a match",
                shuffled.len(),
                round,
                dropped
            );
        }
    }

    let fixtures: Vec<NewMatch> = knockout_pairs(&shuffled)
        .into_iter()
        .map(|(team_1, team_2)| NewMatch { round, team_1, team_2 })
        .collect();

    let matches = store.transaction(|s| {
        if s.round_exists(tournament_id, round) {
            return Err(EngineError::AlreadyGenerated);
        }
        persist_round(s, tournament_id, &fixtures, teams)
    })?;
    log::info!(
        "Generated knockout round {} with {} matches (tournament {})",
        round,
        matches.len(),
        tournament_id
    );
    Ok(matches)
}

fn persist_round<S: Storage>(
    store: &mut S,
    tournament_id: TournamentId,
    fixtures: &[NewMatch],
    teams: &[TeamId],
) -> Result<Vec<GameMatch>, EngineError> {
    let ids = store.create_matches(tournament_id, fixtures)?;
    for &team_id in teams {
        standings::init_row(store, tournament_id, team_id)?;
    }
    ids.into_iter().map(|id| store.get_match(id)).collect()
}
