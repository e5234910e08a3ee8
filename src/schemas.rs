use common::{SeasonPhase, TeamPrediction};
use engine::LeagueEngine;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use utoipa::{OpenApi, ToSchema};

use crate::config::Settings;
use crate::handlers::leagues::{
    CreateLeagueRequest, LeagueDetailsResponse, LeagueResponse, PlayedWeekResponse,
    StandingResponse, UpdateLeagueRequest,
};
use crate::handlers::matches::{EditMatchRequest, MatchResponse};
use crate::handlers::teams::{CreateTeamRequest, TeamResponse, UpdateTeamRequest};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Cache for expensive operations
    pub cache: Cache<String, CachedData>,
    /// Season operations and the shared random source
    pub engine: LeagueEngine,
    pub settings: Settings,
    /// Bumped on every invalidation
    pub cache_epoch: Arc<AtomicU64>,
}

impl AppState {
    /// Drops every cached value derived from the season of `league_id`.
    pub async fn invalidate_league(&self, league_id: i32) {
        self.cache_epoch.fetch_add(1, Ordering::SeqCst);
        self.cache.invalidate(&prediction_cache_key(league_id)).await;
    }

    /// Current invalidation epoch, read before computing a value to cache.
    pub fn cache_epoch(&self) -> u64 {
        self.cache_epoch.load(Ordering::SeqCst)
    }

    /// Caches a prediction computed at `epoch`.
    ///
    /// If any league was invalidated since `epoch`, the entry is dropped again
    /// as it may have been computed from data that changed in the meantime.
    pub async fn cache_prediction(&self, league_id: i32, predictions: Vec<TeamPrediction>, epoch: u64) {
        let key = prediction_cache_key(league_id);
        self.cache.insert(key.clone(), CachedData::Prediction(predictions)).await;
        if self.cache_epoch() != epoch {
            self.cache.invalidate(&key).await;
        }
    }
}

/// Cached data types
#[derive(Clone, Debug)]
pub enum CachedData {
    Prediction(Vec<TeamPrediction>),
}

pub fn prediction_cache_key(league_id: i32) -> String {
    format!("prediction_{}", league_id)
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
#[aliases(
    TeamApiResponse = ApiResponse<TeamResponse>,
    TeamListApiResponse = ApiResponse<Vec<TeamResponse>>,
    LeagueApiResponse = ApiResponse<LeagueResponse>,
    LeagueListApiResponse = ApiResponse<Vec<LeagueResponse>>,
    LeagueDetailsApiResponse = ApiResponse<LeagueDetailsResponse>,
    PlayedWeekApiResponse = ApiResponse<PlayedWeekResponse>,
    PlayedWeekListApiResponse = ApiResponse<Vec<PlayedWeekResponse>>,
    MatchApiResponse = ApiResponse<MatchResponse>,
    MatchListApiResponse = ApiResponse<Vec<MatchResponse>>,
    StandingListApiResponse = ApiResponse<Vec<StandingResponse>>,
    PredictionApiResponse = ApiResponse<Vec<TeamPrediction>>,
    MessageApiResponse = ApiResponse<String>
)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::teams::create_team,
        crate::handlers::teams::get_teams,
        crate::handlers::teams::get_team,
        crate::handlers::teams::update_team,
        crate::handlers::teams::delete_team,
        crate::handlers::teams::get_team_leagues,
        crate::handlers::leagues::create_league,
        crate::handlers::leagues::get_leagues,
        crate::handlers::leagues::get_league,
        crate::handlers::leagues::update_league,
        crate::handlers::leagues::delete_league,
        crate::handlers::leagues::add_team_to_league,
        crate::handlers::leagues::remove_team_from_league,
        crate::handlers::leagues::start_league,
        crate::handlers::leagues::advance_week,
        crate::handlers::leagues::play_all_matches,
        crate::handlers::leagues::get_match_results,
        crate::handlers::leagues::get_standings,
        crate::handlers::leagues::predict_champion,
        crate::handlers::leagues::create_demo_league,
        crate::handlers::matches::get_match,
        crate::handlers::matches::edit_match_results,
    ),
    components(
        schemas(
            TeamApiResponse,
            TeamListApiResponse,
            LeagueApiResponse,
            LeagueListApiResponse,
            LeagueDetailsApiResponse,
            PlayedWeekApiResponse,
            PlayedWeekListApiResponse,
            MatchApiResponse,
            MatchListApiResponse,
            StandingListApiResponse,
            PredictionApiResponse,
            MessageApiResponse,
            ErrorResponse,
            HealthResponse,
            CreateTeamRequest,
            UpdateTeamRequest,
            TeamResponse,
            CreateLeagueRequest,
            UpdateLeagueRequest,
            LeagueResponse,
            LeagueDetailsResponse,
            PlayedWeekResponse,
            StandingResponse,
            EditMatchRequest,
            MatchResponse,
            TeamPrediction,
            SeasonPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "teams", description = "Team management endpoints"),
        (name = "leagues", description = "League, roster and season endpoints"),
        (name = "matches", description = "Match result endpoints"),
        (name = "demo", description = "Demo data endpoints"),
    ),
    info(
        title = "League Manager API",
        description = "Sports league backend: teams, leagues, simulated weekly fixtures, standings and champion predictions",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
