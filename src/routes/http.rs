// GET handlers: version, health, instances, alb, costs, metrics

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::models::round_dp;
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /health — liveness; explicitly never client-cached.
pub(super) async fn health_handler() -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        axum::Json(serde_json::json!({ "status": "healthy" })),
    )
}

/// GET /instances — one normalized record per live resource.
pub(super) async fn instances_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .aggregator
        .get_aggregate()
        .await
        .map_err(ApiError::Aggregation)?;
    Ok(axum::Json(records))
}

/// GET /alb — raw load-balancer discovery list.
pub(super) async fn alb_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let albs = state
        .aws
        .list_load_balancers()
        .await
        .map_err(ApiError::Aggregation)?;
    Ok(axum::Json(albs))
}

#[derive(Debug, Deserialize)]
pub(super) struct CostsParams {
    days: Option<u16>,
}

/// GET /costs?days=N — cost estimates. `days` is validated (1-365, default
/// 30) but the estimator always bills from resource creation to now.
pub(super) async fn costs_handler(
    State(state): State<AppState>,
    Query(params): Query<CostsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let days = params.days.unwrap_or(30);
    if !(1..=365).contains(&days) {
        return Err(ApiError::BadRequest(format!(
            "days must be between 1 and 365, got {days}"
        )));
    }
    let costs = state
        .aggregator
        .get_costs()
        .await
        .map_err(ApiError::Aggregation)?;
    Ok(axum::Json(costs))
}

/// GET /metrics — latest metrics for all three kinds, values to 2 decimals.
pub(super) async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let mut records = state
        .aggregator
        .get_latest_all()
        .await
        .map_err(ApiError::Aggregation)?;
    for record in &mut records {
        for sample in record.metrics.values_mut() {
            sample.value = sample.value.map(|v| round_dp(v, 2));
        }
    }
    Ok(axum::Json(records))
}
