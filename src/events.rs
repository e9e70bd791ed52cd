//! Notifications the engine pushes to subscribers, so a UI can react without polling.

use crate::models::{TeamId, TournamentId};
use serde::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    FixturesGenerated { tournament_id: TournamentId, matches: usize },
    RoundGenerated { tournament_id: TournamentId, round: u32, matches: usize },
    ChampionDeclared { tournament_id: TournamentId, champion: TeamId },
}

/// Receives engine events. Implemented for any `FnMut(&EngineEvent)` closure.
pub trait EventSink {
    fn on_event(&mut self, event: &EngineEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&EngineEvent),
{
    fn on_event(&mut self, event: &EngineEvent) {
        self(event)
    }
}
