use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::HeaderMap,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{account_from_headers, failure, rejected, run_blocking, success, AppState};
use crate::api::models::{RecruitCreateRequest, RecruitDecisionRequest, RecruitListResponse, RecruitResponse};
use crate::errors::LeagueResult;
use crate::services::{RecruitEntry, RecruitService};

pub async fn send_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<RecruitCreateRequest>, JsonRejection>,
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
        RecruitService::new(&state.pool, &state.config).send(
            &account_id,
            body.target_user_id,
            body.message.as_deref(),
        )
    })
    .await;
    match result {
        Ok(entry) => success("Recruit request sent", RecruitResponse::from(&entry)),
        Err(e) => failure(e),
    }
}

pub async fn respond_to_request(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request_id: Result<Path<i64>, PathRejection>,
    body: Result<Json<RecruitDecisionRequest>, JsonRejection>,
) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Path(request_id) = match request_id {
        Ok(path) => path,
        Err(rejection) => return rejected(rejection.body_text()),
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected(rejection.body_text()),
    };

    let result = run_blocking(&state, move |state| {
        RecruitService::new(&state.pool, &state.config).respond(&account_id, request_id, body.accept)
    })
    .await;
    match result {
        Ok(resolution) => success(resolution.message(), RecruitResponse::from(&resolution.entry)),
        Err(e) => failure(e),
    }
}

pub async fn pending_requests(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let result = run_blocking(&state, move |state| {
        RecruitService::new(&state.pool, &state.config).inbox(&account_id)
    })
    .await;
    recruit_list(result)
}

pub async fn team_requests(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let account_id = match account_from_headers(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let result = run_blocking(&state, move |state| {
        RecruitService::new(&state.pool, &state.config).outbox(&account_id)
    })
    .await;
    recruit_list(result)
}

fn recruit_list(result: LeagueResult<Vec<RecruitEntry>>) -> Response {
    match result {
        Ok(entries) => success("OK", RecruitListResponse::new(&entries)),
        Err(e) => failure(e),
    }
}
