//! League progression engine.
//!
//! Fixture generation, match simulation, the standings ledger and the season
//! lifecycle rules, plus the persistence queries they run on.

pub mod error;
pub mod fixtures;
pub mod prediction;
pub mod progression;
pub mod roster;
pub mod season;
pub mod simulator;
pub mod standings;
pub mod store;

#[cfg(test)]
pub mod testing;

pub use error::{EngineError, ErrorKind, Result};
pub use progression::{LeagueEngine, PlayedWeek};
pub use season::{SeasonViolation, phase};
pub use store::LeagueDetails;
