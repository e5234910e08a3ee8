use axum::{http::StatusCode, response::Json};
use engine::{EngineError, ErrorKind, SeasonViolation};
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Machine readable code for a rejected season or roster operation.
fn violation_code(violation: &SeasonViolation) -> &'static str {
    match violation {
        SeasonViolation::InvalidRosterSize { .. } => "INVALID_ROSTER_SIZE",
        SeasonViolation::AlreadyActive => "ALREADY_ACTIVE",
        SeasonViolation::AlreadyEnded => "ALREADY_ENDED",
        SeasonViolation::NotStarted => "NOT_STARTED",
        SeasonViolation::SeasonEnded => "SEASON_ENDED",
        SeasonViolation::LeagueNotActive => "LEAGUE_NOT_ACTIVE",
        SeasonViolation::TooEarly { .. } => "TOO_EARLY",
        SeasonViolation::IncompleteData(_) => "INCOMPLETE_DATA",
        SeasonViolation::RosterFull => "ROSTER_FULL",
        SeasonViolation::TeamAlreadyInLeague { .. } => "TEAM_ALREADY_IN_LEAGUE",
        SeasonViolation::TeamNotInLeague { .. } => "TEAM_NOT_IN_LEAGUE",
        SeasonViolation::RosterLocked => "ROSTER_LOCKED",
        SeasonViolation::TeamInActiveLeague { .. } => "TEAM_IN_ACTIVE_LEAGUE",
        SeasonViolation::InvalidScore { .. } => "INVALID_SCORE",
    }
}

/// Status code and error code for an engine error.
pub fn classify(err: &EngineError) -> (StatusCode, &'static str) {
    match (err.kind(), err) {
        (_, EngineError::Validation(violation)) => (StatusCode::BAD_REQUEST, violation_code(violation)),
        (ErrorKind::NotFound, _) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        (ErrorKind::InconsistentState, _) => (StatusCode::CONFLICT, "INCONSISTENT_STATE"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
    }
}

/// Translates an engine error into a JSON error response, logging it on the way.
pub fn engine_error(err: EngineError) -> ApiError {
    let (status, code) = classify(&err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Engine operation failed: {}", err);
        "Internal server error".to_string()
    } else {
        warn!(code, "Engine operation rejected: {}", err);
        err.to_string()
    };

    (
        status,
        Json(ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        }),
    )
}
