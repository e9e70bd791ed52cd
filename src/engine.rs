//! Tournament engine: the API the web layer calls. Composes fixture generation, result
//! recording, knockout progression and the standings ledger over a [`Storage`].

use crate::events::{EngineEvent, EventSink};
use crate::logic::{export, fixtures, knockout, results, roster, standings, Progress};
use crate::models::{
    EngineError, GameMatch, MatchId, MatchOutcome, StandingsRow, Team, TeamId, Tournament,
    TournamentFormat, TournamentId,
};
use crate::storage::Storage;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// The tournament a caller is working on. Owned by the caller (per request or session) and
/// passed into every engine call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentContext {
    pub tournament_id: TournamentId,
    pub format: TournamentFormat,
}

pub struct TournamentEngine<S> {
    store: S,
    rng: StdRng,
    sinks: Vec<Box<dyn EventSink + Send>>,
}

impl<S: Storage> TournamentEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            rng: StdRng::from_entropy(),
            sinks: Vec::new(),
        }
    }

    /// Engine with reproducible knockout draws.
    pub fn with_seed(store: S, seed: u64) -> Self {
        Self {
            store,
            rng: StdRng::seed_from_u64(seed),
            sinks: Vec::new(),
        }
    }

    /// Register a sink for fixture, round and champion events.
    pub fn subscribe(&mut self, sink: impl EventSink + Send + 'static) {
        self.sinks.push(Box::new(sink));
    }

    fn emit(&mut self, event: EngineEvent) {
        for sink in &mut self.sinks {
            sink.on_event(&event);
        }
    }

    pub fn create_tournament(
        &mut self,
        name: &str,
        format: TournamentFormat,
        start_date: NaiveDate,
    ) -> Result<TournamentContext, EngineError> {
        let t = roster::create_tournament(&mut self.store, name, format, start_date)?;
        Ok(TournamentContext {
            tournament_id: t.id,
            format: t.format,
        })
    }

    /// Build the context for an existing tournament.
    pub fn load(&self, tournament_id: TournamentId) -> Result<TournamentContext, EngineError> {
        let t = self.store.get_tournament(tournament_id)?;
        Ok(TournamentContext {
            tournament_id: t.id,
            format: t.format,
        })
    }

    pub fn tournament(&self, ctx: &TournamentContext) -> Result<Tournament, EngineError> {
        self.store.get_tournament(ctx.tournament_id)
    }

    pub fn list_tournaments(&self) -> Vec<Tournament> {
        self.store.list_tournaments()
    }

    /// Whole-tournament teardown: teams, matches and standings go with it.
    pub fn delete_tournament(&mut self, ctx: TournamentContext) -> Result<(), EngineError> {
        self.store
            .transaction(|s| s.delete_tournament(ctx.tournament_id))?;
        log::info!("Deleted tournament {}", ctx.tournament_id);
        Ok(())
    }

    pub fn add_team(&mut self, ctx: &TournamentContext, name: &str) -> Result<Team, EngineError> {
        roster::add_team(&mut self.store, ctx.tournament_id, name)
    }

    /// Enrol every team listed in a CSV roster (`name` column).
    pub fn import_teams<R: Read>(
        &mut self,
        ctx: &TournamentContext,
        reader: R,
    ) -> Result<Vec<Team>, EngineError> {
        let names = export::read_team_names(reader)?;
        roster::add_teams(&mut self.store, ctx.tournament_id, &names)
    }

    pub fn teams(&self, ctx: &TournamentContext) -> Result<Vec<Team>, EngineError> {
        self.store.list_teams(ctx.tournament_id)
    }

    /// Generate the tournament's fixtures: every pairing for round-robin, round 1 for
    /// knockout. Runs once per tournament.
    pub fn generate_fixtures(
        &mut self,
        ctx: &TournamentContext,
    ) -> Result<Vec<GameMatch>, EngineError> {
        let id = ctx.tournament_id;
        let format = self.store.tournament_format(id)?;
        if self.store.matches_exist(id) {
            return Err(EngineError::AlreadyGenerated);
        }
        let team_ids: Vec<TeamId> = self.store.list_teams(id)?.iter().map(|t| t.id).collect();
        let matches = match format {
            TournamentFormat::RoundRobin => {
                fixtures::generate_round_robin(&mut self.store, id, &team_ids)?
            }
            TournamentFormat::Knockout => {
                fixtures::generate_knockout_round(&mut self.store, id, 1, &team_ids, &mut self.rng)?
            }
        };
        self.emit(EngineEvent::FixturesGenerated {
            tournament_id: id,
            matches: matches.len(),
        });
        Ok(matches)
    }

    /// Record a match result, then check the bracket. The returned [`Progress`] says what that
    /// check did; it is `NotKnockout` when the stored format is round-robin.
    ///
    /// The result is committed before the check runs, so an `Err` from the check does not
    /// undo it.
    pub fn record_result(
        &mut self,
        ctx: &TournamentContext,
        match_id: MatchId,
        outcome: MatchOutcome,
    ) -> Result<Progress, EngineError> {
        results::record_result(&mut self.store, ctx.tournament_id, match_id, outcome)?;
        self.progress(ctx)
    }

    /// Advance a knockout bracket by at most one step.
    pub fn progress(&mut self, ctx: &TournamentContext) -> Result<Progress, EngineError> {
        let id = ctx.tournament_id;
        let progress = knockout::advance_bracket(&mut self.store, id, &mut self.rng)?;
        match &progress {
            Progress::RoundGenerated { round, matches } => {
                self.emit(EngineEvent::RoundGenerated {
                    tournament_id: id,
                    round: *round,
                    matches: matches.len(),
                });
            }
            Progress::ChampionDeclared { champion } => {
                self.emit(EngineEvent::ChampionDeclared {
                    tournament_id: id,
                    champion: *champion,
                });
            }
            _ => {}
        }
        Ok(progress)
    }

    /// All matches ordered by round, then creation order.
    pub fn fixtures(&self, ctx: &TournamentContext) -> Vec<GameMatch> {
        let mut matches = self.store.list_matches(ctx.tournament_id, None);
        matches.sort_by_key(|m| m.round);
        matches
    }

    /// Standings ordered by points, wins, then creation order.
    pub fn standings(&self, ctx: &TournamentContext) -> Vec<StandingsRow> {
        standings::list(&self.store, ctx.tournament_id)
    }

    pub fn reset_standings(&mut self, ctx: &TournamentContext) -> Result<(), EngineError> {
        standings::reset(&mut self.store, ctx.tournament_id)
    }

    /// Write the sorted standings as CSV.
    pub fn export_standings<W: Write>(
        &self,
        ctx: &TournamentContext,
        writer: W,
    ) -> Result<(), EngineError> {
        export::write_standings(&self.standings(ctx), writer)
    }
}
