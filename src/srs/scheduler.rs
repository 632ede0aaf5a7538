//! Pure spaced-repetition state machine.
//!
//! `apply_outcome` is a pure function of (schedule, outcome, now, table);
//! it never touches storage. Queue assembly and persistence live in
//! `srs::queue`.

use chrono::{DateTime, Duration, Utc};

use crate::config;
use crate::domain::{ReviewOutcome, ReviewSchedule};

/// Ordered day offsets defining how far out each successive successful
/// review pushes the due date. `max_index` caps how far `interval_index`
/// may advance (bounded externally by subscription plan).
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTable {
  days: Vec<i64>,
  max_index: usize,
}

impl IntervalTable {
  /// An empty `days` list falls back to the default table so index 0
  /// always resolves to a real offset.
  pub fn new(days: Vec<i64>, max_index: usize) -> Self {
    let days = if days.is_empty() {
      config::DEFAULT_REVIEW_INTERVALS.to_vec()
    } else {
      days
    };
    let max_index = max_index.min(days.len() - 1);
    Self { days, max_index }
  }

  pub fn max_index(&self) -> usize {
    self.max_index
  }

  /// Day offset for an interval index, clamped to the table bounds.
  pub fn offset_days(&self, index: usize) -> i64 {
    self.days[index.min(self.days.len() - 1)]
  }
}

impl Default for IntervalTable {
  fn default() -> Self {
    let days = config::DEFAULT_REVIEW_INTERVALS.to_vec();
    let max_index = days.len() - 1;
    Self { days, max_index }
  }
}

/// An item is due once its scheduled timestamp has passed, or always if it
/// has never been reviewed.
pub fn is_due(schedule: &ReviewSchedule, now: DateTime<Utc>) -> bool {
  !schedule.initial_review_completed || now >= schedule.next_due_at
}

/// Apply a review outcome and compute the next schedule state.
///
/// - `remembered`: advance the interval index (capped at the table's max),
///   increment the success streak.
/// - `partial`: reapply the same interval; index and streak untouched.
/// - `forgot`: reset index and streak to 0.
///
/// Every branch records the outcome, refreshes `next_due_at` from the
/// resulting index, and marks the initial review as completed.
pub fn apply_outcome(
  schedule: &ReviewSchedule,
  outcome: ReviewOutcome,
  now: DateTime<Utc>,
  table: &IntervalTable,
) -> ReviewSchedule {
  let (interval_index, consecutive_successes) = match outcome {
    ReviewOutcome::Remembered => (
      (schedule.interval_index + 1).min(table.max_index()),
      schedule.consecutive_successes + 1,
    ),
    ReviewOutcome::Partial => (schedule.interval_index, schedule.consecutive_successes),
    ReviewOutcome::Forgot => (0, 0),
  };

  ReviewSchedule {
    user_id: schedule.user_id,
    content_id: schedule.content_id,
    interval_index,
    initial_review_completed: true,
    next_due_at: now + Duration::days(table.offset_days(interval_index)),
    last_outcome: Some(outcome),
    consecutive_successes,
  }
}
