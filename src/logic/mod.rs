//! Tournament business logic: fixtures, results, knockout progression, standings.

pub mod export;
pub mod fixtures;
pub mod knockout;
pub mod results;
pub mod roster;
pub mod standings;

pub use fixtures::{generate_knockout_round, generate_round_robin, knockout_pairs, round_robin_pairs};
pub use knockout::{advance_bracket, Progress};
pub use results::record_result;
