use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::operations::vocabulary::VocabularyItem;
use crate::scheduler::{compute_next_review, Difficulty};

/// Cards served per review session.
pub const SESSION_SIZE: i64 = 20;

/// A session value only exists once its queue is populated, so there is no
/// loading state to represent; the due-item query runs before construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Complete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: u32,
    pub reviewed: u32,
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

/// Fields to persist after one rating. The session advances whether or not
/// these writes succeed.
#[derive(Debug, Clone)]
pub struct ItemUpdate {
    pub item_id: String,
    pub difficulty: Difficulty,
    pub new_mastery_level: i32,
    pub reviewed_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
}

/// One bounded review sitting: a queue of item snapshots fixed at start,
/// a cursor, and per-difficulty counters.
///
/// Invariants: `reviewed == easy + medium + hard` and
/// `position <= queue.len()` hold after every mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub id: String,
    pub user_id: String,
    pub language: String,
    pub status: SessionStatus,
    pub queue: Vec<VocabularyItem>,
    pub position: usize,
    pub stats: SessionStats,
}

impl SessionState {
    /// An empty due set completes immediately.
    pub fn new(user_id: &str, language: &str, queue: Vec<VocabularyItem>) -> Self {
        let status = if queue.is_empty() {
            SessionStatus::Complete
        } else {
            SessionStatus::Active
        };
        let stats = SessionStats {
            total: queue.len() as u32,
            ..SessionStats::default()
        };

        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            language: language.to_string(),
            status,
            queue,
            position: 0,
            stats,
        }
    }

    pub fn current_item(&self) -> Option<&VocabularyItem> {
        self.queue.get(self.position)
    }

    /// Rates the card at the cursor. Returns `None` without touching any
    /// state when the queue is exhausted (the caller reports `OutOfRange`).
    pub fn rate_current(&mut self, difficulty: Difficulty, now: DateTime<Utc>) -> Option<ItemUpdate> {
        let item = self.queue.get(self.position)?;
        let outcome = compute_next_review(Some(difficulty), item.mastery_level, now);
        let update = ItemUpdate {
            item_id: item.id.clone(),
            difficulty,
            new_mastery_level: outcome.new_mastery_level,
            reviewed_at: now,
            next_review_at: outcome.next_review_at,
        };

        self.stats.reviewed += 1;
        match difficulty {
            Difficulty::Easy => self.stats.easy += 1,
            Difficulty::Medium => self.stats.medium += 1,
            Difficulty::Hard => self.stats.hard += 1,
        }

        self.position += 1;
        if self.position == self.queue.len() {
            self.status = SessionStatus::Complete;
        }

        Some(update)
    }
}
