use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{account_from_headers, failure, rejected, run_blocking, success, AppState};
use crate::api::models::{TeamCreateRequest, TeamListResponse, TeamResponse, UserResponse};
use crate::services::TeamService;

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<TeamCreateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(rejection.body_text()),
    };

    let result = run_blocking(&state, move |state| {
        TeamService::new(&state.pool, &state.config).create(&account_id, &body.name)
    })
    .await;
    match result {
        Ok(details) => success("Team created", TeamResponse::from(&details)),
        Err(e) => failure(e),
    }
}

pub async fn list_teams(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = run_blocking(&state, |state| TeamService::new(&state.pool, &state.config).list()).await;
    match result {
        Ok(all) => {
            let teams: Vec<TeamResponse> = all.iter().map(TeamResponse::from).collect();
            success(
                "OK",
                TeamListResponse {
                    total: teams.len(),
                    teams,
                },
            )
        }
        Err(e) => failure(e),
    }
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    team_id: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    let Path(team_id) = match team_id {
        Ok(path) => path,
        Err(rejection) => return rejected(rejection.body_text()),
    };

    let result = run_blocking(&state, move |state| {
        TeamService::new(&state.pool, &state.config).get(team_id)
    })
    .await;
    match result {
        Ok(details) => success("OK", TeamResponse::from(&details)),
        Err(e) => failure(e),
    }
}

pub async fn my_team(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let result = run_blocking(&state, move |state| {
        TeamService::new(&state.pool, &state.config).my_team(&account_id)
    })
    .await;
    match result {
        Ok(Some(details)) => success("OK", Some(TeamResponse::from(&details))),
        Ok(None) => success("You are not in a team", None::<TeamResponse>),
        Err(e) => failure(e),
    }
}

pub async fn leave_team(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let result = run_blocking(&state, move |state| {
        TeamService::new(&state.pool, &state.config).leave(&account_id)
    })
    .await;
    match result {
        Ok(outcome) => success(outcome.message(), ()),
        Err(e) => failure(e),
    }
}

pub async fn kick_member(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    user_id: Result<Path<i64>, PathRejection>,
) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Path(user_id) = match user_id {
        Ok(path) => path,
        Err(rejection) => return rejected(rejection.body_text()),
    };

    let result = run_blocking(&state, move |state| {
        TeamService::new(&state.pool, &state.config).kick(&account_id, user_id)
    })
    .await;
    match result {
        Ok(kicked) => success(
            format!("{} was removed from the team", kicked.name),
            UserResponse::new(&kicked, None),
        ),
        Err(e) => failure(e),
    }
}
