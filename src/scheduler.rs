use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_MASTERY: i32 = 0;
pub const MAX_MASTERY: i32 = 5;

/// User-supplied recall judgment driving the next-review computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub next_review_at: DateTime<Utc>,
    pub new_mastery_level: i32,
}

/// SM-2 inspired scheduling heuristic.
///
/// Easy pushes the item out by `max(7, level * 2)` days and raises mastery;
/// medium keeps mastery and waits `max(3, level)` days; hard drops back to a
/// 1-day cadence and lowers mastery. `None` (an unrecognized rating at the
/// boundary) takes a 3-day/no-change fallback so the function stays total.
/// An out-of-range stored level is clamped into `[0, 5]` before the policy
/// runs, so the arithmetic cannot overflow and the returned level is always
/// in range.
pub fn compute_next_review(
    difficulty: Option<Difficulty>,
    mastery_level: i32,
    now: DateTime<Utc>,
) -> ReviewOutcome {
    let level = mastery_level.clamp(MIN_MASTERY, MAX_MASTERY);
    let (days, new_level) = match difficulty {
        Some(Difficulty::Easy) => ((level * 2).max(7), level + 1),
        Some(Difficulty::Medium) => (level.max(3), level),
        Some(Difficulty::Hard) => (1, level - 1),
        None => (3, level),
    };

    ReviewOutcome {
        next_review_at: now + Duration::days(days as i64),
        new_mastery_level: new_level.clamp(MIN_MASTERY, MAX_MASTERY),
    }
}
