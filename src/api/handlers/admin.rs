use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{failure, require_admin, run_blocking, success, AppState};
use crate::api::models::ApiResponse;
use crate::services::SweepService;

pub async fn recalculate_scores(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&headers, &state.config) {
        return response;
    }

    log::info!("Admin triggered score recompute");
    let result = run_blocking(&state, |state| {
        SweepService::new(&state.pool, &state.config).recompute_all()
    })
    .await;
    match result {
        Ok(report) => success(report.summary(), report),
        Err(e) => failure(e),
    }
}

pub async fn refresh_ranks(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&headers, &state.config) {
        return response;
    }

    tokio::spawn(async move {
        log::info!("Admin triggered rank refresh started");
        let sweeps = SweepService::new(&state.pool, &state.config);
        match sweeps.refresh_ranks_all(&state.riot, &state.peaks).await {
            Ok(report) => log::info!("Admin triggered rank refresh completed: {}", report.summary()),
            Err(e) => log::error!("Rank refresh failed: {:?}", e),
        }
    });

    accepted("Rank refresh triggered")
}

pub async fn refresh_levels(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&headers, &state.config) {
        return response;
    }

    tokio::spawn(async move {
        log::info!("Admin triggered level refresh started");
        let sweeps = SweepService::new(&state.pool, &state.config);
        match sweeps.refresh_levels_all(&state.riot).await {
            Ok(report) => log::info!("Admin triggered level refresh completed: {}", report.summary()),
            Err(e) => log::error!("Level refresh failed: {:?}", e),
        }
    });

    accepted("Level refresh triggered")
}

fn accepted(message: &str) -> axum::response::Response {
    (StatusCode::ACCEPTED, Json(ApiResponse::ok(message, ()))).into_response()
}
