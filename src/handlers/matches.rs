use axum::{
    extract::{Path, State},
    response::Json,
};
use axum_valid::Valid;
use engine::store;
use model::entities::league_match;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use super::errors::{ApiError, engine_error};
use crate::schemas::{ApiResponse, AppState};

/// Request body for correcting a match result
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct EditMatchRequest {
    #[validate(range(min = 0))]
    pub home_team_score: i32,
    #[validate(range(min = 0))]
    pub away_team_score: i32,
}

/// Match response model
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MatchResponse {
    pub id: i32,
    pub league_id: i32,
    pub week: i32,
    pub home_team_id: i32,
    pub away_team_id: i32,
    pub home_team_score: i32,
    pub away_team_score: i32,
}

impl From<league_match::Model> for MatchResponse {
    fn from(model: league_match::Model) -> Self {
        Self {
            id: model.id,
            league_id: model.league_id,
            week: model.week,
            home_team_id: model.home_team_id,
            away_team_id: model.away_team_id,
            home_team_score: model.home_team_score,
            away_team_score: model.away_team_score,
        }
    }
}

/// Get a specific match by ID
#[utoipa::path(
    get,
    path = "/api/v1/matches/{match_id}",
    tag = "matches",
    params(
        ("match_id" = i32, Path, description = "Match ID"),
    ),
    responses(
        (status = 200, description = "Match retrieved successfully", body = MatchApiResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_match(
    Path(match_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MatchResponse>>, ApiError> {
    let found = store::find_match(&state.db, match_id).await.map_err(engine_error)?;
    Ok(Json(ApiResponse::ok(MatchResponse::from(found), "Match retrieved successfully")))
}

/// Correct the score of a played match
///
/// The old result is taken out of both teams' standings before the new one is applied.
#[utoipa::path(
    put,
    path = "/api/v1/matches/{match_id}",
    tag = "matches",
    params(
        ("match_id" = i32, Path, description = "Match ID"),
    ),
    request_body = EditMatchRequest,
    responses(
        (status = 200, description = "Match result updated successfully", body = MatchApiResponse),
        (status = 400, description = "Invalid scores", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
        (status = 409, description = "Standings do not contain the stored result", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn edit_match_results(
    Path(match_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<EditMatchRequest>>,
) -> Result<Json<ApiResponse<MatchResponse>>, ApiError> {
    let updated = state
        .engine
        .edit_match_results(&state.db, match_id, request.home_team_score, request.away_team_score)
        .await
        .map_err(engine_error)?;
    state.invalidate_league(updated.league_id).await;

    info!("Match {} now reads {}-{}", match_id, updated.home_team_score, updated.away_team_score);
    Ok(Json(ApiResponse::ok(MatchResponse::from(updated), "Match result updated successfully")))
}
