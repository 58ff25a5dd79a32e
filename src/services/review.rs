use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::db::operations::{reviews, vocabulary};
use crate::scheduler::Difficulty;
use crate::session::{SessionState, SESSION_SIZE};

#[derive(Debug, Error)]
pub enum SessionError {
    /// The due-item query failed; no session was created. Retrying is the
    /// caller's call.
    #[error("failed to load due vocabulary")]
    DataUnavailable(#[source] sqlx::Error),
    /// Rating requested with no current card (queue empty or already
    /// complete). A caller logic error, not retryable.
    #[error("no current card to rate")]
    OutOfRange,
    #[error("unknown session")]
    NotFound,
}

/// Registry of in-flight review sessions.
///
/// Sessions are ephemeral: they live only in this map and vanish on restart
/// or discard; there is no persisted session entity to reconcile. Each
/// `(user, language)` pair owns at most one live session — starting a new
/// one evicts the previous, so abandoned sessions cannot accumulate. The
/// write lock serializes ratings per session, so cursor advancement is
/// never racy even if a client misbehaves and sends two ratings at once.
pub struct SessionService {
    pool: SqlitePool,
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl SessionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn start_session(
        &self,
        user_id: &str,
        language: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionState, SessionError> {
        let items = vocabulary::query_due(&self.pool, user_id, language, now, SESSION_SIZE)
            .await
            .map_err(SessionError::DataUnavailable)?;

        let session = SessionState::new(user_id, language, items);
        tracing::debug!(
            session_id = %session.id,
            user_id,
            language,
            total = session.stats.total,
            "review session started"
        );

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| {
            existing.user_id != session.user_id || existing.language != session.language
        });
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Applies one rating and advances the session.
    ///
    /// Persistence is optimistic: the counters and cursor move first, and a
    /// failed store write is logged rather than rolled back, so practice
    /// continues while the persisted item may briefly lag the session.
    pub async fn rate(
        &self,
        session_id: &str,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<SessionState, SessionError> {
        let (snapshot, update) = {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(session_id).ok_or(SessionError::NotFound)?;
            let update = session
                .rate_current(difficulty, now)
                .ok_or(SessionError::OutOfRange)?;
            (session.clone(), update)
        };

        if let Err(err) = vocabulary::apply_review(
            &self.pool,
            &update.item_id,
            update.new_mastery_level,
            update.reviewed_at,
            update.next_review_at,
        )
        .await
        {
            tracing::warn!(error = %err, item_id = %update.item_id, "mastery update failed");
        }

        if let Err(err) = reviews::insert_event(
            &self.pool,
            &update.item_id,
            &snapshot.user_id,
            update.difficulty,
            now,
        )
        .await
        {
            tracing::warn!(error = %err, item_id = %update.item_id, "review event insert failed");
        }

        Ok(snapshot)
    }

    /// Discards the session and rebuilds it with a fresh queue and zeroed
    /// counters (and a fresh id).
    pub async fn reset(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionState, SessionError> {
        let old = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .ok_or(SessionError::NotFound)?;

        self.start_session(&old.user_id, &old.language, now).await
    }

    /// Abandoning a session needs no cleanup beyond dropping the state.
    pub async fn discard(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }
}
