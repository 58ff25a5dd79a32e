use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    success: bool,
    status: &'static str,
    uptime_seconds: u64,
    timestamp: String,
}

pub async fn health(State(state): State<AppState>) -> Response {
    Json(HealthResponse {
        success: true,
        status: "ok",
        uptime_seconds: state.uptime_seconds(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
    .into_response()
}
