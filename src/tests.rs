#[cfg(test)]
mod integration_tests {
    use crate::handlers::leagues::{CreateLeagueRequest, UpdateLeagueRequest};
    use crate::handlers::matches::EditMatchRequest;
    use crate::handlers::teams::{CreateTeamRequest, UpdateTeamRequest};
    use crate::schemas::{ApiResponse, ErrorResponse};
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;

    const TEAMS: [(&str, i32, i32); 4] = [
        ("Chelsea", 80, 75),
        ("Arsenal", 70, 80),
        ("Manchester City", 65, 70),
        ("Liverpool", 60, 65),
    ];

    async fn test_server() -> TestServer {
        let app = setup_test_app().await;
        TestServer::new(app).unwrap()
    }

    async fn create_team(server: &TestServer, name: &str, attack: i32, defense: i32) -> i64 {
        let response = server
            .post("/api/v1/teams")
            .json(&CreateTeamRequest {
                name: name.to_string(),
                attack_strength: attack,
                defense_strength: defense,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn create_league(server: &TestServer, name: &str) -> i64 {
        let response = server
            .post("/api/v1/leagues")
            .json(&CreateLeagueRequest { name: name.to_string() })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    /// League with the four reference teams attached, not started yet.
    async fn create_full_league(server: &TestServer) -> (i64, Vec<i64>) {
        let league_id = create_league(server, "Premier League").await;
        let mut team_ids = Vec::new();
        for (name, attack, defense) in TEAMS {
            let team_id = create_team(server, name, attack, defense).await;
            server
                .post(&format!("/api/v1/leagues/{}/teams/{}", league_id, team_id))
                .await
                .assert_status(StatusCode::OK);
            team_ids.push(team_id);
        }
        (league_id, team_ids)
    }

    async fn started_league(server: &TestServer) -> (i64, Vec<i64>) {
        let (league_id, team_ids) = create_full_league(server).await;
        server
            .post(&format!("/api/v1/leagues/{}/start", league_id))
            .await
            .assert_status(StatusCode::OK);
        (league_id, team_ids)
    }

    async fn league_details(server: &TestServer, league_id: i64) -> Value {
        let response = server.get(&format!("/api/v1/leagues/{}", league_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        body.data
    }

    fn assert_standing_consistent(row: &Value) {
        let played = row["played"].as_i64().unwrap();
        let wins = row["wins"].as_i64().unwrap();
        let draws = row["draws"].as_i64().unwrap();
        let losses = row["losses"].as_i64().unwrap();
        assert_eq!(played, wins + draws + losses);
        assert_eq!(row["points"].as_i64().unwrap(), 3 * wins + draws);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = test_server().await;

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_team_crud() {
        let server = test_server().await;
        let team_id = create_team(&server, "Rovers", 55, 45).await;

        let response = server.get(&format!("/api/v1/teams/{}", team_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.message, "Team retrieved successfully");
        assert_eq!(body.data["name"], "Rovers");
        assert_eq!(body.data["attack_strength"], 55);

        let response = server
            .put(&format!("/api/v1/teams/{}", team_id))
            .json(&UpdateTeamRequest {
                name: "United".to_string(),
                attack_strength: 60,
                defense_strength: 50,
            })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["name"], "United");
        assert_eq!(body.data["defense_strength"], 50);

        let response = server.get("/api/v1/teams").await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);

        server
            .delete(&format!("/api/v1/teams/{}", team_id))
            .await
            .assert_status(StatusCode::OK);
        server
            .get(&format!("/api/v1/teams/{}", team_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_team_is_rejected() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/teams")
            .json(&CreateTeamRequest {
                name: String::new(),
                attack_strength: 50,
                defense_strength: 50,
            })
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/api/v1/teams")
            .json(&CreateTeamRequest {
                name: "Negative".to_string(),
                attack_strength: -1,
                defense_strength: 50,
            })
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_ratings_above_limit_rejected() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/teams")
            .json(&CreateTeamRequest {
                name: "Giants".to_string(),
                attack_strength: 1_000_000_000,
                defense_strength: 50,
            })
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let team_id = create_team(&server, "Bounded", 1000, 1000).await;
        let response = server
            .put(&format!("/api/v1/teams/{}", team_id))
            .json(&UpdateTeamRequest {
                name: "Bounded".to_string(),
                attack_strength: 50,
                defense_strength: 1001,
            })
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_error_body() {
        let server = test_server().await;

        let response = server.get("/api/v1/leagues/99999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "NOT_FOUND");
        assert!(!body.success);
        assert!(body.error.contains("league"));
    }

    #[tokio::test]
    async fn test_league_rename_and_team_leagues() {
        let server = test_server().await;
        let (league_id, team_ids) = create_full_league(&server).await;

        let response = server
            .put(&format!("/api/v1/leagues/{}", league_id))
            .json(&UpdateLeagueRequest { name: "Championship".to_string() })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["name"], "Championship");
        assert_eq!(body.data["phase"], "unstarted");

        let response = server.get(&format!("/api/v1/teams/{}/leagues", team_ids[0])).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["id"].as_i64().unwrap(), league_id);
    }

    #[tokio::test]
    async fn test_start_and_advance_one_week() {
        let server = test_server().await;
        let (league_id, _) = started_league(&server).await;

        let response = server.post(&format!("/api/v1/leagues/{}/advance", league_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["week"], 1);
        assert_eq!(body.data["matches"].as_array().unwrap().len(), 2);

        let details = league_details(&server, league_id).await;
        assert_eq!(details["league"]["current_week"], 2);
        assert_eq!(details["league"]["phase"], "active");
        assert_eq!(details["matches"].as_array().unwrap().len(), 2);
        let standings = details["standings"].as_array().unwrap();
        assert_eq!(standings.len(), 4);
        for row in standings {
            assert_eq!(row["played"], 1);
            assert_standing_consistent(row);
        }
    }

    #[tokio::test]
    async fn test_fifth_team_is_rejected() {
        let server = test_server().await;
        let (league_id, _) = create_full_league(&server).await;
        let extra = create_team(&server, "Extra", 50, 50).await;

        let response = server
            .post(&format!("/api/v1/leagues/{}/teams/{}", league_id, extra))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "ROSTER_FULL");
        let details = league_details(&server, league_id).await;
        assert_eq!(details["teams"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_season_state_errors() {
        let server = test_server().await;
        let (league_id, _) = create_full_league(&server).await;

        let response = server.post(&format!("/api/v1/leagues/{}/advance", league_id)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "NOT_STARTED");

        let response = server.get(&format!("/api/v1/leagues/{}/results", league_id)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "LEAGUE_NOT_ACTIVE");

        let short = create_league(&server, "Short").await;
        let response = server.post(&format!("/api/v1/leagues/{}/start", short)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_ROSTER_SIZE");

        server
            .post(&format!("/api/v1/leagues/{}/start", league_id))
            .await
            .assert_status(StatusCode::OK);
        let response = server.post(&format!("/api/v1/leagues/{}/start", league_id)).await;
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "ALREADY_ACTIVE");
    }

    #[tokio::test]
    async fn test_play_all_matches() {
        let server = test_server().await;
        let (league_id, _) = started_league(&server).await;

        let response = server.post(&format!("/api/v1/leagues/{}/play-all", league_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 37);

        let details = league_details(&server, league_id).await;
        assert_eq!(details["league"]["current_week"], 38);
        assert_eq!(details["matches"].as_array().unwrap().len(), 74);
        for row in details["standings"].as_array().unwrap() {
            assert_eq!(row["played"], 37);
            assert_standing_consistent(row);
        }

        // Week 38 is played by a final advance, after which the season is over
        server
            .post(&format!("/api/v1/leagues/{}/advance", league_id))
            .await
            .assert_status(StatusCode::OK);
        let response = server.post(&format!("/api/v1/leagues/{}/advance", league_id)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "SEASON_ENDED");
    }

    #[tokio::test]
    async fn test_edit_match_results() {
        let server = test_server().await;
        let (league_id, _) = started_league(&server).await;
        server
            .post(&format!("/api/v1/leagues/{}/advance", league_id))
            .await
            .assert_status(StatusCode::OK);

        let response = server.get(&format!("/api/v1/leagues/{}/results", league_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 2);
        let played = &body.data[0];
        let match_id = played["id"].as_i64().unwrap();
        let home_id = played["home_team_id"].as_i64().unwrap();
        let away_id = played["away_team_id"].as_i64().unwrap();

        let response = server
            .put(&format!("/api/v1/matches/{}", match_id))
            .json(&EditMatchRequest {
                home_team_score: 2,
                away_team_score: 2,
            })
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["home_team_score"], 2);
        assert_eq!(body.data["away_team_score"], 2);

        let response = server.get(&format!("/api/v1/leagues/{}/standings", league_id)).await;
        let body: ApiResponse<Vec<Value>> = response.json();
        for row in &body.data {
            let team_id = row["team_id"].as_i64().unwrap();
            if team_id == home_id || team_id == away_id {
                assert_eq!(row["played"], 1);
                assert_eq!(row["draws"], 1);
                assert_eq!(row["points"], 1);
                assert_eq!(row["goal_difference"], 0);
            }
            assert_standing_consistent(row);
            assert!(row["team_name"].is_string());
        }

        let response = server.get(&format!("/api/v1/matches/{}", match_id)).await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["home_team_score"], 2);

        server
            .put("/api/v1/matches/99999")
            .json(&EditMatchRequest {
                home_team_score: 1,
                away_team_score: 0,
            })
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_standings_are_ordered() {
        let server = test_server().await;
        let (league_id, _) = started_league(&server).await;
        for _ in 0..5 {
            server
                .post(&format!("/api/v1/leagues/{}/advance", league_id))
                .await
                .assert_status(StatusCode::OK);
        }

        let response = server.get(&format!("/api/v1/leagues/{}/standings", league_id)).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        let points: Vec<i64> = body.data.iter().map(|r| r["points"].as_i64().unwrap()).collect();
        assert!(points.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_prediction_window_and_cache() {
        let server = test_server().await;
        let (league_id, _) = started_league(&server).await;
        let prediction_path = format!("/api/v1/leagues/{}/prediction", league_id);
        let advance_path = format!("/api/v1/leagues/{}/advance", league_id);

        let response = server.get(&prediction_path).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "TOO_EARLY");

        for _ in 0..3 {
            server.post(&advance_path).await.assert_status(StatusCode::OK);
        }

        let response = server.get(&prediction_path).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.message, "Prediction computed successfully");
        assert_eq!(body.data.len(), 4);
        let sum: f64 = body.data.iter().map(|p| p["win_probability"].as_f64().unwrap()).sum();
        assert!((sum - 1.0).abs() < 1e-6);

        let body: ApiResponse<Vec<Value>> = server.get(&prediction_path).await.json();
        assert_eq!(body.message, "Prediction retrieved from cache");

        // Playing another week invalidates the cached prediction
        server.post(&advance_path).await.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = server.get(&prediction_path).await.json();
        assert_eq!(body.message, "Prediction computed successfully");
    }

    #[tokio::test]
    async fn test_roster_guards_during_season() {
        let server = test_server().await;
        let (league_id, team_ids) = started_league(&server).await;

        let response = server
            .delete(&format!("/api/v1/leagues/{}/teams/{}", league_id, team_ids[0]))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "ROSTER_LOCKED");

        let response = server.delete(&format!("/api/v1/teams/{}", team_ids[0])).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "TEAM_IN_ACTIVE_LEAGUE");
    }

    #[tokio::test]
    async fn test_delete_league() {
        let server = test_server().await;
        let (league_id, team_ids) = started_league(&server).await;
        server
            .post(&format!("/api/v1/leagues/{}/advance", league_id))
            .await
            .assert_status(StatusCode::OK);

        server
            .delete(&format!("/api/v1/leagues/{}", league_id))
            .await
            .assert_status(StatusCode::OK);
        server
            .get(&format!("/api/v1/leagues/{}", league_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // Teams outlive the league and can now be deleted
        server
            .delete(&format!("/api/v1/teams/{}", team_ids[0]))
            .await
            .assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_demo_league() {
        let server = test_server().await;

        let response = server.post("/api/v1/demo/league").await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["league"]["current_week"], 6);
        assert_eq!(body.data["teams"].as_array().unwrap().len(), 4);
        assert_eq!(body.data["matches"].as_array().unwrap().len(), 10);
        assert_eq!(body.data["standings"].as_array().unwrap().len(), 4);

        let league_id = body.data["league"]["id"].as_i64().unwrap();
        server
            .get(&format!("/api/v1/leagues/{}/prediction", league_id))
            .await
            .assert_status(StatusCode::OK);
    }
}
