//! Domain types shared by the engine and the HTTP layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle phase of a league season, derived from its week counter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPhase {
    /// Week 0, the season has not been started yet
    Unstarted,
    /// Weeks 1..=38
    Active,
    /// Past week 38, no further weeks can be played
    Ended,
}

/// Estimated chance of a team winning the championship.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TeamPrediction {
    pub league_id: i32,
    pub team_id: i32,
    pub team_name: String,
    /// Probability in 0.0..=1.0; the four predictions of a league sum to 1.0
    pub win_probability: f64,
}
