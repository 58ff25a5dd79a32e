use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

use crate::services::review::SessionService;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    pool: SqlitePool,
    sessions: Arc<SessionService>,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            started_at: Instant::now(),
            sessions: Arc::new(SessionService::new(pool.clone())),
            pool,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn sessions(&self) -> Arc<SessionService> {
        Arc::clone(&self.sessions)
    }
}
