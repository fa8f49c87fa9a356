use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{admin, recruits, teams, users, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/users/login", post(users::login))
        .route("/api/users/register-riot", post(users::register_riot))
        .route("/api/users/me", get(users::me))
        .route("/api/users/me/top-tier", put(users::update_top_tier))
        .route("/api/users", get(users::list_users))
        .route("/api/users/available", get(users::available_users))
        .route("/api/teams", post(teams::create_team).get(teams::list_teams))
        .route("/api/teams/my-team", get(teams::my_team))
        .route("/api/teams/leave", post(teams::leave_team))
        .route("/api/teams/kick/:user_id", post(teams::kick_member))
        .route("/api/teams/:team_id", get(teams::get_team))
        .route("/api/recruits", post(recruits::send_request))
        .route("/api/recruits/pending", get(recruits::pending_requests))
        .route("/api/recruits/team-requests", get(recruits::team_requests))
        .route("/api/recruits/:request_id/respond", post(recruits::respond_to_request))
        .route("/api/admin/recalculate-scores", post(admin::recalculate_scores))
        .route("/api/admin/refresh-ranks", post(admin::refresh_ranks))
        .route("/api/admin/refresh-levels", post(admin::refresh_levels))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::ACCOUNT_HEADER;
    use crate::api::models::ApiResponse;
    use crate::api::{RiotClient, SchoolClient};
    use crate::config::settings::AppConfig;
    use crate::database::connection::{create_test_pool, get_connection};
    use crate::fetchers::PeakRankScraper;
    use crate::test_support::seed_player;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let config = AppConfig::new();
        Arc::new(AppState {
            pool: create_test_pool(),
            school: SchoolClient::new(&config.school).unwrap(),
            riot: RiotClient::new(&config.riot).unwrap(),
            peaks: PeakRankScraper::new(&config.peak_rank).unwrap(),
            config,
        })
    }

    async fn call(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, ApiResponse<Value>) {
        let response = create_router(Arc::clone(state)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn json_request(method: &str, uri: &str, account: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        if let Some(account) = account {
            builder = builder.header(ACCOUNT_HEADER, account);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, account: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(account) = account {
            builder = builder.header(ACCOUNT_HEADER, account);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let state = test_state();
        let (status, body) = call(&state, get_request("/api/users/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.success);
        assert!(body.data.is_none());
    }

    #[tokio::test]
    async fn test_team_flow() {
        let state = test_state();
        {
            let conn = get_connection(&state.pool).unwrap();
            seed_player(&conn, "lead", 12);
            seed_player(&conn, "target", 9);
        }

        let (status, body) = call(
            &state,
            json_request("POST", "/api/teams", Some("lead"), serde_json::json!({"name": "Night Owls"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.success);
        let team = body.data.unwrap();
        assert_eq!(team["name"], "Night Owls");
        assert_eq!(team["memberCount"], 1);
        assert_eq!(team["leader"]["isTeamLeader"], true);

        let target_id = {
            let conn = get_connection(&state.pool).unwrap();
            crate::database::players::find_by_account_id(&conn, "target").unwrap().unwrap().id
        };
        let (status, body) = call(
            &state,
            json_request(
                "POST",
                "/api/recruits",
                Some("lead"),
                serde_json::json!({"targetUserId": target_id, "message": "join us"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let request_id = body.data.unwrap()["id"].as_i64().unwrap();

        let (_, inbox) = call(&state, get_request("/api/recruits/pending", Some("target"))).await;
        assert_eq!(inbox.data.unwrap()["total"], 1);

        let (status, body) = call(
            &state,
            json_request(
                "POST",
                &format!("/api/recruits/{}/respond", request_id),
                Some("target"),
                serde_json::json!({"accept": true}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.unwrap()["status"], "ACCEPTED");

        let (_, teams) = call(&state, get_request("/api/teams", None)).await;
        let teams = teams.data.unwrap();
        assert_eq!(teams["total"], 1);
        assert_eq!(teams["teams"][0]["totalScore"], 21);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let state = test_state();
        {
            let conn = get_connection(&state.pool).unwrap();
            seed_player(&conn, "solo", 5);
        }

        let (status, body) = call(&state, get_request("/api/teams/404", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Team not found");

        let (status, _) = call(
            &state,
            json_request("POST", "/api/teams", Some("solo"), serde_json::json!({"name": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&state, get_request("/api/recruits/team-requests", Some("solo"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_input_gets_enveloped_bad_request() {
        let state = test_state();
        {
            let conn = get_connection(&state.pool).unwrap();
            seed_player(&conn, "lead", 12);
        }

        let requests = vec![
            json_request(
                "POST",
                "/api/recruits",
                Some("lead"),
                serde_json::json!({"targetUserId": "abc"}),
            ),
            get_request("/api/teams/abc", None),
            get_request("/api/users?tier=WOOD", None),
        ];
        for request in requests {
            let uri = request.uri().to_string();
            let (status, body) = call(&state, request).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert!(!body.success, "{}", uri);
            assert!(body.data.is_none(), "{}", uri);
            assert!(!body.message.is_empty(), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_admin_requires_token() {
        let state = test_state();
        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/recalculate-scores")
            .body(Body::empty())
            .unwrap();
        let (status, _) = call(&state, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("POST")
            .uri("/api/admin/recalculate-scores")
            .header("Authorization", format!("Bearer {}", state.config.server.admin_token))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(&state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.unwrap()["total"], 0);
    }

    #[tokio::test]
    async fn test_user_listing_filters() {
        let state = test_state();
        {
            let conn = get_connection(&state.pool).unwrap();
            seed_player(&conn, "alpha", 20);
            seed_player(&conn, "beta", 10);
        }

        let (_, body) = call(&state, get_request("/api/users?name=alp", None)).await;
        let data = body.data.unwrap();
        assert_eq!(data["total"], 1);
        assert_eq!(data["users"][0]["accountId"], "alpha");

        let (_, body) = call(&state, get_request("/api/users/available", None)).await;
        assert_eq!(body.data.unwrap()["total"], 2);
    }
}
