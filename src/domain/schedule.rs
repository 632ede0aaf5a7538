use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grading verdict of one review event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
  Remembered,
  Partial,
  Forgot,
}

impl ReviewOutcome {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "remembered" => Some(Self::Remembered),
      "partial" => Some(Self::Partial),
      "forgot" => Some(Self::Forgot),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Remembered => "remembered",
      Self::Partial => "partial",
      Self::Forgot => "forgot",
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Self::Remembered)
  }
}

/// Active scheduling record for one (user, content) pair.
///
/// `next_due_at` is always derived from `interval_index` and the outcome
/// applied at the most recent review; before the first review the item is
/// due unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSchedule {
  pub user_id: i64,
  pub content_id: i64,
  pub interval_index: usize,
  pub initial_review_completed: bool,
  pub next_due_at: DateTime<Utc>,
  pub last_outcome: Option<ReviewOutcome>,
  pub consecutive_successes: i64,
}

impl ReviewSchedule {
  /// Fresh schedule for a never-reviewed item: due immediately.
  pub fn new(user_id: i64, content_id: i64, now: DateTime<Utc>) -> Self {
    Self {
      user_id,
      content_id,
      interval_index: 0,
      initial_review_completed: false,
      next_due_at: now,
      last_outcome: None,
      consecutive_successes: 0,
    }
  }
}

/// Append-only audit record for one completed review.
/// Written fire-and-forget; the scheduler never reads these back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLogEntry {
  pub id: i64,
  pub content_id: i64,
  pub outcome: ReviewOutcome,
  pub time_spent_seconds: Option<i64>,
  pub reviewed_at: DateTime<Utc>,
  pub resulting_interval_index: usize,
}

impl ReviewLogEntry {
  pub fn new(
    content_id: i64,
    outcome: ReviewOutcome,
    time_spent_seconds: Option<i64>,
    resulting_interval_index: usize,
  ) -> Self {
    Self {
      id: 0,
      content_id,
      outcome,
      time_spent_seconds,
      reviewed_at: Utc::now(),
      resulting_interval_index,
    }
  }
}
