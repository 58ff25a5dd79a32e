pub mod config;
pub mod db;
pub mod logging;
pub mod response;
pub mod routes;
pub mod scheduler;
pub mod services;
pub mod session;
pub mod state;

use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn create_app(pool: SqlitePool) -> axum::Router {
    let state = AppState::new(pool);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
