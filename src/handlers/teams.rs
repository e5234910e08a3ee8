use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use engine::{roster, store};
use model::entities::team;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use super::errors::{ApiError, engine_error};
use super::leagues::LeagueResponse;
use crate::schemas::{ApiResponse, AppState};

/// Request body for creating a new team
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    /// Team name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Attack rating, weighs on goals scored
    #[validate(range(min = 0, max = 1000))]
    pub attack_strength: i32,
    /// Defense rating, weighs on goals conceded by the opponent
    #[validate(range(min = 0, max = 1000))]
    pub defense_strength: i32,
}

/// Request body for updating a team (full replace)
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0, max = 1000))]
    pub attack_strength: i32,
    #[validate(range(min = 0, max = 1000))]
    pub defense_strength: i32,
}

/// Team response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub id: i32,
    pub name: String,
    pub attack_strength: i32,
    pub defense_strength: i32,
}

impl From<team::Model> for TeamResponse {
    fn from(model: team::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            attack_strength: model.attack_strength,
            defense_strength: model.defense_strength,
        }
    }
}

/// Create a new team
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created successfully", body = TeamApiResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_team(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTeamRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TeamResponse>>), ApiError> {
    trace!("Entering create_team function");

    let created = store::create_team(
        &state.db,
        request.name,
        request.attack_strength,
        request.defense_strength,
    )
        .await
        .map_err(engine_error)?;

    info!("Team created successfully with ID: {}, name: {}", created.id, created.name);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(TeamResponse::from(created), "Team created successfully")),
    ))
}

/// Get all teams
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "teams",
    responses(
        (status = 200, description = "Teams retrieved successfully", body = TeamListApiResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_teams(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, ApiError> {
    let teams = store::list_teams(&state.db).await.map_err(engine_error)?;
    debug!("Retrieved {} teams from database", teams.len());

    let data = teams.into_iter().map(TeamResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Teams retrieved successfully")))
}

/// Get a specific team by ID
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team retrieved successfully", body = TeamApiResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    let team = store::find_team(&state.db, team_id).await.map_err(engine_error)?;
    Ok(Json(ApiResponse::ok(TeamResponse::from(team), "Team retrieved successfully")))
}

/// Update a team
#[utoipa::path(
    put,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated successfully", body = TeamApiResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTeamRequest>>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    let updated = store::update_team(
        &state.db,
        team_id,
        request.name,
        request.attack_strength,
        request.defense_strength,
    )
        .await
        .map_err(engine_error)?;

    // Ratings feed the prediction of every league the team plays in
    let leagues = store::leagues_for_team(&state.db, team_id).await.map_err(engine_error)?;
    for league in &leagues {
        state.invalidate_league(league.id).await;
    }

    info!("Team with ID {} updated successfully", team_id);
    Ok(Json(ApiResponse::ok(TeamResponse::from(updated), "Team updated successfully")))
}

/// Delete a team
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{team_id}",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Team deleted successfully", body = MessageApiResponse),
        (status = 400, description = "Team plays in an active league", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_team(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    roster::delete_team(&state.db, team_id).await.map_err(engine_error)?;

    info!("Team with ID {} deleted successfully", team_id);
    Ok(Json(ApiResponse::ok(
        format!("Team {} deleted", team_id),
        "Team deleted successfully",
    )))
}

/// Get the leagues a team belongs to
#[utoipa::path(
    get,
    path = "/api/v1/teams/{team_id}/leagues",
    tag = "teams",
    params(
        ("team_id" = i32, Path, description = "Team ID"),
    ),
    responses(
        (status = 200, description = "Leagues retrieved successfully", body = LeagueListApiResponse),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_team_leagues(
    Path(team_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<LeagueResponse>>>, ApiError> {
    let leagues = store::leagues_for_team(&state.db, team_id).await.map_err(engine_error)?;
    debug!("Team {} plays in {} leagues", team_id, leagues.len());

    let data = leagues.into_iter().map(LeagueResponse::from).collect();
    Ok(Json(ApiResponse::ok(data, "Leagues retrieved successfully")))
}
