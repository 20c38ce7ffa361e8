use artifact_store::StoreStats;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub store: StoreStats,
    pub users: usize,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let users = state.service.user_count().await?;
    let uptime_secs = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        store: state.service.pipeline().store_stats(),
        users,
    }))
}
