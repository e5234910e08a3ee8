use crate::handlers::{
    health::health_check,
    leagues::{
        add_team_to_league, advance_week, create_demo_league, create_league, delete_league,
        get_league, get_leagues, get_match_results, get_standings, play_all_matches,
        predict_champion, remove_team_from_league, start_league, update_league,
    },
    matches::{edit_match_results, get_match},
    teams::{create_team, delete_team, get_team, get_team_leagues, get_teams, update_team},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.settings.request_timeout_secs);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Team CRUD routes
        .route("/api/v1/teams", post(create_team).get(get_teams))
        .route(
            "/api/v1/teams/:team_id",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/api/v1/teams/:team_id/leagues", get(get_team_leagues))
        // League CRUD and roster routes
        .route("/api/v1/leagues", post(create_league).get(get_leagues))
        .route(
            "/api/v1/leagues/:league_id",
            get(get_league).put(update_league).delete(delete_league),
        )
        .route(
            "/api/v1/leagues/:league_id/teams/:team_id",
            post(add_team_to_league).delete(remove_team_from_league),
        )
        // Season routes
        .route("/api/v1/leagues/:league_id/start", post(start_league))
        .route("/api/v1/leagues/:league_id/advance", post(advance_week))
        .route("/api/v1/leagues/:league_id/play-all", post(play_all_matches))
        .route("/api/v1/leagues/:league_id/results", get(get_match_results))
        .route("/api/v1/leagues/:league_id/standings", get(get_standings))
        .route("/api/v1/leagues/:league_id/prediction", get(predict_champion))
        // Match routes
        .route("/api/v1/matches/:match_id", get(get_match).put(edit_match_results))
        .route("/api/v1/demo/league", post(create_demo_league))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
