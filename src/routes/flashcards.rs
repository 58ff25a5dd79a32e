use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::response::AppError;
use crate::scheduler::Difficulty;
use crate::services::review::SessionError;
use crate::session::SessionState;
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    user_id: String,
    language: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    difficulty: String,
}

fn session_error(err: SessionError) -> AppError {
    match err {
        SessionError::DataUnavailable(source) => {
            tracing::warn!(error = %source, "due-item query failed");
            AppError::data_unavailable("could not load due vocabulary")
        }
        SessionError::OutOfRange => AppError::out_of_range("session has no current card"),
        SessionError::NotFound => AppError::not_found("session not found"),
    }
}

pub async fn start_session(
    State(state): State<AppState>,
    Json(payload): Json<StartSessionRequest>,
) -> Response {
    if payload.user_id.trim().is_empty() || payload.language.trim().is_empty() {
        return AppError::validation("userId and language are required").into_response();
    }

    match state
        .sessions()
        .start_session(&payload.user_id, &payload.language, Utc::now())
        .await
    {
        Ok(session) => Json(SuccessResponse {
            success: true,
            data: session,
        })
        .into_response(),
        Err(err) => session_error(err).into_response(),
    }
}

pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.sessions().get_session(&id).await {
        Some(session) => Json(SuccessResponse::<SessionState> {
            success: true,
            data: session,
        })
        .into_response(),
        None => AppError::not_found("session not found").into_response(),
    }
}

pub async fn rate_current(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RateRequest>,
) -> Response {
    // The scheduler tolerates unknown labels, but the session counters only
    // have easy/medium/hard buckets, so reject anything else up front.
    let Some(difficulty) = Difficulty::parse(&payload.difficulty) else {
        return AppError::validation("difficulty must be one of easy, medium, hard")
            .into_response();
    };

    match state.sessions().rate(&id, difficulty, Utc::now()).await {
        Ok(session) => Json(SuccessResponse {
            success: true,
            data: session,
        })
        .into_response(),
        Err(err) => session_error(err).into_response(),
    }
}

pub async fn reset_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.sessions().reset(&id, Utc::now()).await {
        Ok(session) => Json(SuccessResponse {
            success: true,
            data: session,
        })
        .into_response(),
        Err(err) => session_error(err).into_response(),
    }
}

pub async fn discard_session(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    if state.sessions().discard(&id).await {
        Json(MessageResponse {
            success: true,
            message: "session discarded",
        })
        .into_response()
    } else {
        AppError::not_found("session not found").into_response()
    }
}
