use crate::signaling::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub timestamp: String,
    pub connection_count: usize,
    pub room_count: usize,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = Utc::now().to_rfc3339();

    match state.relay.stats().await {
        Ok(stats) => (
            StatusCode::OK,
            Json(HealthReport {
                status: "ok".to_string(),
                timestamp,
                connection_count: stats.connection_count,
                room_count: stats.room_count,
            }),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReport {
                    status: "unavailable".to_string(),
                    timestamp,
                    connection_count: 0,
                    room_count: 0,
                }),
            )
        }
    }
}
