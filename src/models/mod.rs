//! Data structures for tournaments: teams, matches, standings.

mod game;
mod standings;
mod team;
mod tournament;

pub use game::{GameMatch, MatchId, MatchOutcome, NewMatch};
pub use standings::{StandingsDelta, StandingsRow, TeamResult, POINTS_FOR_DRAW, POINTS_FOR_WIN};
pub use team::{Team, TeamId};
pub use tournament::{EngineError, Tournament, TournamentFormat, TournamentId, TournamentStatus};
