mod flashcards;
mod health;
mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/words", get(words::list_words).post(words::create_word))
        .route(
            "/api/words/:id",
            put(words::update_word).delete(words::delete_word),
        )
        .route("/api/flashcards/sessions", post(flashcards::start_session))
        .route(
            "/api/flashcards/sessions/:id",
            get(flashcards::get_session).delete(flashcards::discard_session),
        )
        .route(
            "/api/flashcards/sessions/:id/rate",
            post(flashcards::rate_current),
        )
        .route(
            "/api/flashcards/sessions/:id/reset",
            post(flashcards::reset_session),
        )
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
