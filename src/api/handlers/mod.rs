use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::error;
use serde::Serialize;
use std::sync::Arc;

use crate::api::models::ApiResponse;
use crate::api::{RiotClient, SchoolClient};
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::errors::{LeagueError, LeagueResult};
use crate::fetchers::PeakRankScraper;

pub mod admin;
pub mod recruits;
pub mod teams;
pub mod users;

/// Header the fronting auth layer sets to the caller's school account id
pub const ACCOUNT_HEADER: &str = "X-Account-Id";

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub school: SchoolClient,
    pub riot: RiotClient,
    pub peaks: PeakRankScraper,
}

pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(message, data))).into_response()
}

pub fn failure(err: LeagueError) -> Response {
    let status = match &err {
        LeagueError::NotFound(_) => StatusCode::NOT_FOUND,
        LeagueError::Conflict(_) => StatusCode::CONFLICT,
        LeagueError::Forbidden(_) => StatusCode::FORBIDDEN,
        LeagueError::CapacityExceeded(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LeagueError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        LeagueError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        LeagueError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let message = if err.is_internal() {
        error!("Request failed: {:?}", err);
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

/// Malformed body, path or query string; `message` is the extractor's rejection text
pub fn rejected(message: String) -> Response {
    failure(LeagueError::InvalidInput(message))
}

/// Runs a synchronous service call on the blocking pool; database waits stay off the async workers
pub async fn run_blocking<T, F>(state: &Arc<AppState>, work: F) -> LeagueResult<T>
where
    F: FnOnce(&AppState) -> LeagueResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| LeagueError::Internal(anyhow::Error::new(e).context("Blocking task failed")))?
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(ApiResponse::<()>::error(message))).into_response()
}

/// Caller's account id, or a 401 response when the header is missing
pub fn account_from_headers(headers: &HeaderMap) -> Result<String, Response> {
    headers
        .get(ACCOUNT_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| unauthorized("Login required"))
}

pub fn require_admin(headers: &HeaderMap, config: &AppConfig) -> Result<(), Response> {
    let expected = format!("Bearer {}", config.server.admin_token);
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    if auth_header != Some(expected.as_str()) {
        return Err(unauthorized("Admin token required"));
    }
    Ok(())
}
