use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDateTime;
use common::{SeasonPhase, TeamPrediction};
use engine::{LeagueDetails, PlayedWeek, phase, roster, store};
use model::entities::{league, standing, team};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use super::errors::{ApiError, engine_error};
use super::matches::MatchResponse;
use super::teams::TeamResponse;
use crate::schemas::{ApiResponse, AppState, CachedData, prediction_cache_key};

/// Name of the league created by the demo endpoint
const DEMO_LEAGUE_NAME: &str = "Demo League";

/// Request body for creating a new league
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateLeagueRequest {
    /// League name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Request body for renaming a league
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateLeagueRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// League response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeagueResponse {
    pub id: i32,
    pub name: String,
    /// 0 before the season starts, 1..=38 while running, above 38 once ended
    pub current_week: i32,
    pub phase: SeasonPhase,
    pub created_at: NaiveDateTime,
}

impl From<league::Model> for LeagueResponse {
    fn from(model: league::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            current_week: model.current_week,
            phase: phase(model.current_week),
            created_at: model.created_at,
        }
    }
}

/// One row of a league table
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StandingResponse {
    pub id: i32,
    pub league_id: i32,
    pub team_id: i32,
    /// Absent when the team has left the league since playing
    pub team_name: Option<String>,
    pub points: i32,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub goal_difference: i32,
}

impl StandingResponse {
    fn new(model: standing::Model, teams: &[team::Model]) -> Self {
        let team_name = teams.iter().find(|t| t.id == model.team_id).map(|t| t.name.clone());
        Self {
            id: model.id,
            league_id: model.league_id,
            team_id: model.team_id,
            team_name,
            points: model.points,
            played: model.played,
            wins: model.wins,
            draws: model.draws,
            losses: model.losses,
            goal_difference: model.goal_difference,
        }
    }
}

/// A league with its roster, matches and standings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeagueDetailsResponse {
    pub league: LeagueResponse,
    pub teams: Vec<TeamResponse>,
    pub matches: Vec<MatchResponse>,
    pub standings: Vec<StandingResponse>,
}

impl From<LeagueDetails> for LeagueDetailsResponse {
    fn from(details: LeagueDetails) -> Self {
        let standings = details
            .standings
            .into_iter()
            .map(|row| StandingResponse::new(row, &details.teams))
            .collect();
        Self {
            league: LeagueResponse::from(details.league),
            teams: details.teams.into_iter().map(TeamResponse::from).collect(),
            matches: details.matches.into_iter().map(MatchResponse::from).collect(),
            standings,
        }
    }
}

/// Matches played in one week
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlayedWeekResponse {
    pub week: i32,
    pub matches: Vec<MatchResponse>,
}

impl From<PlayedWeek> for PlayedWeekResponse {
    fn from(played: PlayedWeek) -> Self {
        Self {
            week: played.week,
            matches: played.matches.into_iter().map(MatchResponse::from).collect(),
        }
    }
}

/// Create a new league
#[utoipa::path(
    post,
    path = "/api/v1/leagues",
    tag = "leagues",
    request_body = CreateLeagueRequest,
    responses(
        (status = 201, description = "League created successfully", body = LeagueApiResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_league(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateLeagueRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<LeagueResponse>>), ApiError> {
    trace!("Entering create_league function");
    let created = store::create_league(&state.db, request.name).await.map_err(engine_error)?;

    info!("League created successfully with ID: {}, name: {}", created.id, created.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LeagueResponse::from(created), "League created successfully")),
    ))
}

/// Get all leagues
#[utoipa::path(
    get,
    path = "/api/v1/leagues",
    tag = "leagues",
    responses(
        (status = 200, description = "Leagues retrieved successfully", body = LeagueListApiResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_leagues(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LeagueResponse>>>, ApiError> {
    let leagues = store::list_leagues(&state.db).await.map_err(engine_error)?;
    debug!("Retrieved {} leagues from database", leagues.len());

    let data = leagues.into_iter().map(LeagueResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Leagues retrieved successfully")))
}

/// Get a league with its teams, matches and standings
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "League retrieved successfully", body = LeagueDetailsApiResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeagueDetailsResponse>>, ApiError> {
    let details = store::load_league(&state.db, league_id).await.map_err(engine_error)?;
    debug!(
        "League {} has {} teams, {} matches, {} standings",
        league_id,
        details.teams.len(),
        details.matches.len(),
        details.standings.len()
    );
    Ok(Json(ApiResponse::ok(
        LeagueDetailsResponse::from(details),
        "League retrieved successfully",
    )))
}

/// Rename a league
#[utoipa::path(
    put,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    request_body = UpdateLeagueRequest,
    responses(
        (status = 200, description = "League updated successfully", body = LeagueApiResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateLeagueRequest>>,
) -> Result<Json<ApiResponse<LeagueResponse>>, ApiError> {
    let updated = store::rename_league(&state.db, league_id, request.name)
        .await
        .map_err(engine_error)?;

    info!("League with ID {} renamed to {}", league_id, updated.name);
    Ok(Json(ApiResponse::ok(LeagueResponse::from(updated), "League updated successfully")))
}

/// Delete a league with its matches and standings
#[utoipa::path(
    delete,
    path = "/api/v1/leagues/{league_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "League deleted successfully", body = MessageApiResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state.engine.delete_league(&state.db, league_id).await.map_err(engine_error)?;
    state.invalidate_league(league_id).await;

    Ok(Json(ApiResponse::ok(
        format!("League {} deleted", league_id),
        "League deleted successfully",
    )))
}

/// Attach a team to a league
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/teams/{team_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team added, returns the roster", body = TeamListApiResponse),
        (status = 400, description = "Roster full, duplicate team or season running", body = ErrorResponse),
        (status = 404, description = "League or team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn add_team_to_league(
    Path((league_id, team_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, ApiError> {
    let roster = roster::add_team_to_league(&state.db, league_id, team_id)
        .await
        .map_err(engine_error)?;
    state.invalidate_league(league_id).await;

    let data = roster.into_iter().map(TeamResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Team added to league successfully")))
}

/// Detach a team from a league
#[utoipa::path(
    delete,
    path = "/api/v1/leagues/{league_id}/teams/{team_id}",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team removed, returns the roster", body = TeamListApiResponse),
        (status = 400, description = "Team not in league or season running", body = ErrorResponse),
        (status = 404, description = "League or team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn remove_team_from_league(
    Path((league_id, team_id)): Path<(i32, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, ApiError> {
    let roster = roster::remove_team_from_league(&state.db, league_id, team_id)
        .await
        .map_err(engine_error)?;
    state.invalidate_league(league_id).await;

    let data = roster.into_iter().map(TeamResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Team removed from league successfully")))
}

/// Start the season of a league
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/start",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "League started", body = LeagueApiResponse),
        (status = 400, description = "Wrong roster size or league already started", body = ErrorResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn start_league(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LeagueResponse>>, ApiError> {
    let league = state.engine.start_league(&state.db, league_id).await.map_err(engine_error)?;
    state.invalidate_league(league_id).await;

    Ok(Json(ApiResponse::ok(LeagueResponse::from(league), "League started successfully")))
}

/// Play the current week
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/advance",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Week played", body = PlayedWeekApiResponse),
        (status = 400, description = "League not started or season ended", body = ErrorResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn advance_week(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PlayedWeekResponse>>, ApiError> {
    let played = state.engine.advance_week(&state.db, league_id).await.map_err(engine_error)?;
    state.invalidate_league(league_id).await;

    Ok(Json(ApiResponse::ok(
        PlayedWeekResponse::from(played),
        "Week played successfully",
    )))
}

/// Play every remaining week of the season
#[utoipa::path(
    post,
    path = "/api/v1/leagues/{league_id}/play-all",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Remaining weeks played", body = PlayedWeekListApiResponse),
        (status = 400, description = "League not started or season ended", body = ErrorResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn play_all_matches(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlayedWeekResponse>>>, ApiError> {
    let weeks = state.engine.play_all_matches(&state.db, league_id).await.map_err(engine_error)?;
    state.invalidate_league(league_id).await;

    let data = weeks.into_iter().map(PlayedWeekResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "All remaining matches played successfully")))
}

/// Results of the most recently played week
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}/results",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Match results retrieved", body = MatchListApiResponse),
        (status = 400, description = "League not active", body = ErrorResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_match_results(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MatchResponse>>>, ApiError> {
    let matches = state
        .engine
        .view_match_results(&state.db, league_id)
        .await
        .map_err(engine_error)?;

    let data = matches.into_iter().map(MatchResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Match results retrieved successfully")))
}

/// League table
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}/standings",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Standings retrieved", body = StandingListApiResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_standings(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<StandingResponse>>>, ApiError> {
    let table = state.engine.league_table(&state.db, league_id).await.map_err(engine_error)?;
    let teams = store::list_teams(&state.db).await.map_err(engine_error)?;

    let data = table
        .into_iter()
        .map(|row| StandingResponse::new(row, &teams))
        .collect();
    Ok(Json(ApiResponse::ok(data, "Standings retrieved successfully")))
}

/// Championship win probabilities
#[utoipa::path(
    get,
    path = "/api/v1/leagues/{league_id}/prediction",
    tag = "leagues",
    params(
        ("league_id" = i32, Path, description = "League ID"),
    ),
    responses(
        (status = 200, description = "Prediction computed", body = PredictionApiResponse),
        (status = 400, description = "League not active, too early or incomplete data", body = ErrorResponse),
        (status = 404, description = "League not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn predict_champion(
    Path(league_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamPrediction>>>, ApiError> {
    let cache_key = prediction_cache_key(league_id);

    // Check cache first
    if let Some(CachedData::Prediction(predictions)) = state.cache.get(&cache_key).await {
        return Ok(Json(ApiResponse::ok(predictions, "Prediction retrieved from cache")));
    }

    let epoch = state.cache_epoch();
    let predictions = state
        .engine
        .predict_champion(&state.db, league_id)
        .await
        .map_err(engine_error)?;
    state.cache_prediction(league_id, predictions.clone(), epoch).await;

    Ok(Json(ApiResponse::ok(predictions, "Prediction computed successfully")))
}

/// Create a started demo league with a few weeks played
#[utoipa::path(
    post,
    path = "/api/v1/demo/league",
    tag = "demo",
    responses(
        (status = 201, description = "Demo league created", body = LeagueDetailsApiResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_demo_league(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<LeagueDetailsResponse>>), ApiError> {
    let details = state
        .engine
        .create_demo_league(&state.db, DEMO_LEAGUE_NAME)
        .await
        .map_err(engine_error)?;

    info!("Demo league created with ID: {}", details.league.id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            LeagueDetailsResponse::from(details),
            "Demo league created successfully",
        )),
    ))
}
