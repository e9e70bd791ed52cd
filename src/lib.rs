//! Tournament manager: library with models, storage and the bracket & standings engine.

pub mod config;
pub mod engine;
pub mod events;
pub mod logic;
pub mod models;
pub mod storage;

pub use engine::{TournamentContext, TournamentEngine};
pub use events::{EngineEvent, EventSink};
pub use logic::{
    advance_bracket, generate_knockout_round, generate_round_robin, record_result, Progress,
};
pub use models::{
    EngineError, GameMatch, MatchId, MatchOutcome, NewMatch, StandingsRow, Team, TeamId,
    TeamResult, Tournament, TournamentFormat, TournamentId, TournamentStatus,
};
pub use storage::{MemoryStore, Storage};
