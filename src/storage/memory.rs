//! In-memory store. Transactions snapshot the whole store and restore it on error.

use crate::models::{
    EngineError, GameMatch, MatchId, MatchOutcome, NewMatch, StandingsDelta, StandingsRow, Team,
    TeamId, Tournament, TournamentId, TournamentStatus,
};
use crate::storage::Storage;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    tournaments: Vec<Tournament>,
    teams: Vec<Team>,
    matches: Vec<GameMatch>,
    standings: Vec<StandingsRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tournament_mut(&mut self, id: TournamentId) -> Result<&mut Tournament, EngineError> {
        self.tournaments
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(EngineError::TournamentNotFound(id))
    }

    fn ensure_tournament(&self, id: TournamentId) -> Result<(), EngineError> {
        if self.tournaments.iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(EngineError::TournamentNotFound(id))
        }
    }
}

impl Storage for MemoryStore {
    fn insert_tournament(&mut self, tournament: Tournament) -> Result<(), EngineError> {
        self.tournaments.push(tournament);
        Ok(())
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, EngineError> {
        self.tournaments
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(EngineError::TournamentNotFound(id))
    }

    fn list_tournaments(&self) -> Vec<Tournament> {
        self.tournaments.clone()
    }

    fn delete_tournament(&mut self, id: TournamentId) -> Result<(), EngineError> {
        self.ensure_tournament(id)?;
        self.standings.retain(|r| r.tournament_id != id);
        self.matches.retain(|m| m.tournament_id != id);
        self.teams.retain(|t| t.tournament_id != id);
        self.tournaments.retain(|t| t.id != id);
        Ok(())
    }

    fn set_tournament_status(
        &mut self,
        id: TournamentId,
        status: TournamentStatus,
    ) -> Result<(), EngineError> {
        self.tournament_mut(id)?.status = status;
        Ok(())
    }

    fn insert_team(&mut self, team: Team) -> Result<(), EngineError> {
        self.ensure_tournament(team.tournament_id)?;
        self.teams.push(team);
        Ok(())
    }

    fn list_teams(&self, tournament_id: TournamentId) -> Result<Vec<Team>, EngineError> {
        self.ensure_tournament(tournament_id)?;
        Ok(self
            .teams
            .iter()
            .filter(|t| t.tournament_id == tournament_id)
            .cloned()
            .collect())
    }

    fn create_matches(
        &mut self,
        tournament_id: TournamentId,
        fixtures: &[NewMatch],
    ) -> Result<Vec<MatchId>, EngineError> {
        self.ensure_tournament(tournament_id)?;
        let created: Vec<GameMatch> = fixtures
            .iter()
            .map(|f| GameMatch::new(tournament_id, *f))
            .collect();
        let ids = created.iter().map(|m| m.id).collect();
        self.matches.extend(created);
        Ok(ids)
    }

    fn matches_exist(&self, tournament_id: TournamentId) -> bool {
        self.matches.iter().any(|m| m.tournament_id == tournament_id)
    }

    fn round_exists(&self, tournament_id: TournamentId, round: u32) -> bool {
        self.matches
            .iter()
            .any(|m| m.tournament_id == tournament_id && m.round == round)
    }

    fn get_match(&self, id: MatchId) -> Result<GameMatch, EngineError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(EngineError::MatchNotFound(id))
    }

    fn update_match_result(
        &mut self,
        id: MatchId,
        outcome: MatchOutcome,
        winner: Option<TeamId>,
    ) -> Result<(), EngineError> {
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(EngineError::MatchNotFound(id))?;
        m.outcome = outcome;
        m.winner = winner;
        Ok(())
    }

    fn list_matches(&self, tournament_id: TournamentId, round: Option<u32>) -> Vec<GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .filter(|m| round.map_or(true, |r| m.round == r))
            .cloned()
            .collect()
    }

    fn upsert_standings_row(
        &mut self,
        tournament_id: TournamentId,
        team_id: TeamId,
    ) -> Result<(), EngineError> {
        if self
            .standings
            .iter()
            .any(|r| r.tournament_id == tournament_id && r.team_id == team_id)
        {
            return Ok(());
        }
        let team = self
            .teams
            .iter()
            .find(|t| t.id == team_id && t.tournament_id == tournament_id)
            .ok_or(EngineError::TeamNotFound(team_id))?;
        let row = StandingsRow::new(tournament_id, team_id, team.name.clone());
        self.standings.push(row);
        Ok(())
    }

    fn increment_standings(
        &mut self,
        tournament_id: TournamentId,
        team_id: TeamId,
        delta: StandingsDelta,
    ) -> Result<(), EngineError> {
        self.standings
            .iter_mut()
            .find(|r| r.tournament_id == tournament_id && r.team_id == team_id)
            .ok_or(EngineError::TeamNotFound(team_id))?
            .apply(delta);
        Ok(())
    }

    fn list_standings(&self, tournament_id: TournamentId) -> Vec<StandingsRow> {
        self.standings
            .iter()
            .filter(|r| r.tournament_id == tournament_id)
            .cloned()
            .collect()
    }

    fn reset_standings(&mut self, tournament_id: TournamentId) -> Result<(), EngineError> {
        self.ensure_tournament(tournament_id)?;
        self.standings
            .iter_mut()
            .filter(|r| r.tournament_id == tournament_id)
            .for_each(StandingsRow::reset);
        Ok(())
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Self) -> Result<T, EngineError>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}
