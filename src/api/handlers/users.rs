use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{account_from_headers, failure, rejected, run_blocking, success, AppState};
use crate::api::models::{LoginRequest, RiotAccountRequest, TopTierRequest, UserListResponse, UserQuery, UserResponse};
use crate::database::PlayerFilter;
use crate::domain::SchoolCredentials;
use crate::errors::LeagueResult;
use crate::scoring::RankPoint;
use crate::services::{AccountService, LinkRequest, PlayerEntry};

pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    let credentials = SchoolCredentials {
        account_id: body.account_id,
        password: body.password,
    };

    let service = AccountService::new(&state.pool, &state.config);
    match service.login(&state.school, &credentials).await {
        Ok(player) => current_user(&state, player.account_id, "Login successful".to_string()).await,
        Err(e) => failure(e),
    }
}

pub async fn register_riot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<RiotAccountRequest>, JsonRejection>,
) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    let request = LinkRequest {
        game_name: body.game_name,
        tag_line: body.tag_line,
        most_lane: body.most_lane,
        second_lane: body.second_lane,
    };

    let service = AccountService::new(&state.pool, &state.config);
    match service
        .link_riot_account(&state.riot, &state.peaks, &account_id, &request)
        .await
    {
        Ok(player) => current_user(&state, player.account_id, "Riot account linked".to_string()).await,
        Err(e) => failure(e),
    }
}

pub async fn me(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    current_user(&state, account_id, "OK".to_string()).await
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    let filter = PlayerFilter {
        tier: query.tier,
        name_contains: query.name,
        has_team: query.has_team,
    };

    let result = run_blocking(&state, move |state| {
        AccountService::new(&state.pool, &state.config).list_users(&filter)
    })
    .await;
    user_list(result)
}

pub async fn available_users(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> impl IntoResponse {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return rejected(rejection.body_text()),
    };

    let result = run_blocking(&state, move |state| {
        AccountService::new(&state.pool, &state.config).available_users(query.tier, query.name)
    })
    .await;
    user_list(result)
}

pub async fn update_top_tier(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<TopTierRequest>, JsonRejection>,
) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    let rank = RankPoint::new(body.tier, body.rank);

    let result = run_blocking(&state, move |state| {
        let service = AccountService::new(&state.pool, &state.config);
        let player = service.update_all_time_highest(&account_id, rank)?;
        service.profile(&player.account_id)
    })
    .await;
    match result {
        Ok(entry) => success(format!("All-time highest set to {}", rank), UserResponse::from(&entry)),
        Err(e) => failure(e),
    }
}

/// Reloads the player with their team so the response carries team details
async fn current_user(state: &Arc<AppState>, account_id: String, message: String) -> Response {
    let result = run_blocking(state, move |state| {
        AccountService::new(&state.pool, &state.config).profile(&account_id)
    })
    .await;
    match result {
        Ok(entry) => success(message, UserResponse::from(&entry)),
        Err(e) => failure(e),
    }
}

fn user_list(result: LeagueResult<Vec<PlayerEntry>>) -> Response {
    match result {
        Ok(entries) => success("OK", UserListResponse::new(&entries)),
        Err(e) => failure(e),
    }
}
