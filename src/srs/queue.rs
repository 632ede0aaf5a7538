//! Session queue assembly and mutation.
//!
//! A session behaves like a depleting work queue: built once from schedule
//! state, then mutated in place as reviews complete. Remembered and partial
//! remove the head item; forgot rotates it to the back for an in-session
//! retry. The queue is only mutated after the updated schedule has been
//! persisted, so a failed save never desynchronizes session state from
//! durable state.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{self, LogOnError};
use crate::domain::{ContentItem, ReviewLogEntry, ReviewOutcome, ReviewSchedule};
use crate::error::ReviewError;

use super::scheduler::{self, IntervalTable};

/// What happened to the head item after a completed review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueVerdict {
  /// Item left the session: remembered, or partial ("seen for today",
  /// retried on a later day rather than immediately).
  Removed,
  /// Item moved to the end of the queue for a retry later this session.
  RequeuedToEnd,
}

/// Progress counters for the active session, reset only on queue build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
  pub reviews_completed: u32,
  pub total_schedules: usize,
  pub remaining: usize,
}

/// Ephemeral ordered working set of due items for one review session.
#[derive(Debug, Clone, Default)]
pub struct SessionQueue {
  pub user_id: i64,
  pub category_filter: Option<i64>,
  items: VecDeque<i64>,
  reviews_completed: u32,
  total_schedules: usize,
}

impl SessionQueue {
  pub fn new(user_id: i64, category_filter: Option<i64>, content_ids: Vec<i64>) -> Self {
    let total_schedules = content_ids.len();
    Self {
      user_id,
      category_filter,
      items: VecDeque::from(content_ids),
      reviews_completed: 0,
      total_schedules,
    }
  }

  /// Content id at the cursor (queue head).
  pub fn current(&self) -> Option<i64> {
    self.items.front().copied()
  }

  pub fn contains(&self, content_id: i64) -> bool {
    self.items.contains(&content_id)
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn progress(&self) -> SessionProgress {
    SessionProgress {
      reviews_completed: self.reviews_completed,
      total_schedules: self.total_schedules,
      remaining: self.items.len(),
    }
  }

  /// Reposition the head item according to the review outcome.
  /// Callers must persist the updated schedule before invoking this.
  fn settle(&mut self, outcome: ReviewOutcome) -> QueueVerdict {
    self.reviews_completed += 1;
    match outcome {
      ReviewOutcome::Remembered | ReviewOutcome::Partial => {
        self.items.pop_front();
        QueueVerdict::Removed
      }
      ReviewOutcome::Forgot => {
        if let Some(id) = self.items.pop_front() {
          self.items.push_back(id);
        }
        QueueVerdict::RequeuedToEnd
      }
    }
  }
}

/// Assemble the ordered due queue for a user at `now`.
///
/// Never-scheduled items get a fresh schedule (due immediately). Ordering:
/// never-reviewed content first, then ascending due date, then priority
/// (high > medium > low), then content id for determinism.
///
/// Returns the queue together with the content items in queue order.
pub fn build_queue(
  conn: &Connection,
  user_id: i64,
  category_filter: Option<i64>,
  now: DateTime<Utc>,
) -> Result<(SessionQueue, Vec<ContentItem>), ReviewError> {
  let contents = db::list_content(conn, user_id, category_filter)?;

  let mut due: Vec<(ContentItem, ReviewSchedule)> = Vec::new();
  for item in contents {
    let schedule = db::get_or_create_schedule(conn, user_id, item.id, now)?;
    if scheduler::is_due(&schedule, now) {
      due.push((item, schedule));
    }
  }

  due.sort_by(|(a_item, a_sched), (b_item, b_sched)| {
    a_sched
      .initial_review_completed
      .cmp(&b_sched.initial_review_completed)
      .then(a_sched.next_due_at.cmp(&b_sched.next_due_at))
      .then(a_item.priority.rank().cmp(&b_item.priority.rank()))
      .then(a_item.id.cmp(&b_item.id))
  });

  let ids: Vec<i64> = due.iter().map(|(item, _)| item.id).collect();
  let items: Vec<ContentItem> = due.into_iter().map(|(item, _)| item).collect();

  tracing::debug!(
    user_id,
    total = ids.len(),
    "built review queue"
  );

  Ok((SessionQueue::new(user_id, category_filter, ids), items))
}

/// Result of completing the review at the queue head.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedReview {
  pub schedule: ReviewSchedule,
  pub verdict: QueueVerdict,
  pub progress: SessionProgress,
}

/// Complete the review at the queue head.
///
/// Validates the submission, applies the scheduler, persists the updated
/// schedule, appends the audit log entry (fire-and-forget), then mutates
/// the queue. On a persistence error the queue is left untouched so the
/// caller can retry with the same outcome.
pub fn complete_current(
  conn: &Connection,
  queue: &mut SessionQueue,
  content_id: i64,
  outcome: ReviewOutcome,
  time_spent_seconds: Option<i64>,
  now: DateTime<Utc>,
  table: &IntervalTable,
) -> Result<CompletedReview, ReviewError> {
  let head = queue.current().ok_or(ReviewError::EmptyQueue)?;
  if head != content_id {
    if queue.contains(content_id) {
      return Err(ReviewError::StaleCursor { expected: head, got: content_id });
    }
    return Err(ReviewError::NotDue(content_id));
  }

  let item = db::get_content_by_id(conn, content_id)?
    .ok_or(ReviewError::UnknownContent(content_id))?;
  if outcome == ReviewOutcome::Partial && !item.review_mode.supports_partial() {
    return Err(ReviewError::PartialNotSupported(content_id));
  }

  let schedule = db::get_schedule(conn, queue.user_id, content_id)?
    .ok_or(ReviewError::UnknownContent(content_id))?;
  let updated = scheduler::apply_outcome(&schedule, outcome, now, table);

  // Persist first; the queue mutation below must never run on a failed save
  db::save_schedule(conn, &updated)?;

  let entry = ReviewLogEntry::new(content_id, outcome, time_spent_seconds, updated.interval_index);
  db::insert_review_log(conn, &entry).log_warn("Failed to append review log entry");

  let verdict = queue.settle(outcome);
  tracing::debug!(
    content_id,
    outcome = outcome.as_str(),
    ?verdict,
    remaining = queue.len(),
    "review completed"
  );

  Ok(CompletedReview {
    schedule: updated,
    verdict,
    progress: queue.progress(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Priority, ReviewMode};
  use crate::testing::TestEnv;
  use chrono::Duration;

  fn insert_item(env: &TestEnv, user_id: i64, body: &str, priority: Priority, mode: ReviewMode) -> i64 {
    let item = ContentItem::new(user_id, body.to_string(), priority, mode);
    db::insert_content(&env.conn, &item).unwrap()
  }

  fn table() -> IntervalTable {
    IntervalTable::new(vec![1, 3, 7, 14], 3)
  }

  // Pure queue mutation

  #[test]
  fn test_settle_remembered_removes() {
    let mut q = SessionQueue::new(1, None, vec![10, 20]);
    let verdict = q.settle(ReviewOutcome::Remembered);
    assert_eq!(verdict, QueueVerdict::Removed);
    assert_eq!(q.current(), Some(20));
    assert_eq!(q.len(), 1);
  }

  #[test]
  fn test_settle_partial_removes() {
    let mut q = SessionQueue::new(1, None, vec![10, 20]);
    assert_eq!(q.settle(ReviewOutcome::Partial), QueueVerdict::Removed);
    assert_eq!(q.current(), Some(20));
  }

  #[test]
  fn test_settle_forgot_requeues_to_end() {
    let mut q = SessionQueue::new(1, None, vec![10, 20, 30]);
    assert_eq!(q.settle(ReviewOutcome::Forgot), QueueVerdict::RequeuedToEnd);
    assert_eq!(q.current(), Some(20));
    assert_eq!(q.len(), 3);
  }

  #[test]
  fn test_forgot_keeps_queue_size_invariant() {
    // N forgot calls on a single-item queue always leave exactly one item
    let mut q = SessionQueue::new(1, None, vec![10]);
    for _ in 0..5 {
      q.settle(ReviewOutcome::Forgot);
      assert_eq!(q.len(), 1);
      assert_eq!(q.current(), Some(10));
    }
    assert_eq!(q.progress().reviews_completed, 5);
  }

  #[test]
  fn test_remembered_depletion_terminates() {
    let mut q = SessionQueue::new(1, None, (1..=50).collect());
    let mut steps = 0;
    while !q.is_empty() {
      q.settle(ReviewOutcome::Remembered);
      steps += 1;
    }
    assert_eq!(steps, 50);
    assert_eq!(q.progress().remaining, 0);
    assert_eq!(q.progress().total_schedules, 50);
  }

  #[test]
  fn test_progress_counters() {
    let mut q = SessionQueue::new(1, None, vec![10, 20]);
    assert_eq!(
      q.progress(),
      SessionProgress { reviews_completed: 0, total_schedules: 2, remaining: 2 }
    );
    q.settle(ReviewOutcome::Remembered);
    assert_eq!(
      q.progress(),
      SessionProgress { reviews_completed: 1, total_schedules: 2, remaining: 1 }
    );
  }

  // Queue build

  #[test]
  fn test_build_queue_only_due_items() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();

    let due_a = insert_item(&env, 1, "due a", Priority::Medium, ReviewMode::Objective);
    let due_b = insert_item(&env, 1, "due b", Priority::Medium, ReviewMode::Objective);
    let due_c = insert_item(&env, 1, "due c", Priority::Medium, ReviewMode::Objective);
    let later_a = insert_item(&env, 1, "later a", Priority::Medium, ReviewMode::Objective);
    let later_b = insert_item(&env, 1, "later b", Priority::Medium, ReviewMode::Objective);

    // Push the two "later" items into the future
    for id in [later_a, later_b] {
      let mut s = ReviewSchedule::new(1, id, now);
      s.initial_review_completed = true;
      s.next_due_at = now + Duration::days(3);
      db::save_schedule(&env.conn, &s).unwrap();
    }

    let (queue, items) = build_queue(&env.conn, 1, None, now).unwrap();
    assert_eq!(queue.len(), 3);
    assert_eq!(items.len(), 3);
    for id in [due_a, due_b, due_c] {
      assert!(queue.contains(id));
    }
    assert!(!queue.contains(later_a));
    assert!(!queue.contains(later_b));
  }

  #[test]
  fn test_build_queue_lazily_creates_schedules() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let id = insert_item(&env, 1, "new", Priority::Medium, ReviewMode::Objective);

    assert!(db::get_schedule(&env.conn, 1, id).unwrap().is_none());
    let (queue, _) = build_queue(&env.conn, 1, None, now).unwrap();
    assert!(queue.contains(id));
    assert!(db::get_schedule(&env.conn, 1, id).unwrap().is_some());
  }

  #[test]
  fn test_build_queue_orders_unreviewed_first_then_priority_then_id() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();

    // Three never-reviewed items sharing next_due_at = now:
    // priority breaks the tie, then id
    let low = insert_item(&env, 1, "low", Priority::Low, ReviewMode::Objective);
    let high = insert_item(&env, 1, "high", Priority::High, ReviewMode::Objective);
    let med_a = insert_item(&env, 1, "med a", Priority::Medium, ReviewMode::Objective);
    let med_b = insert_item(&env, 1, "med b", Priority::Medium, ReviewMode::Objective);

    // One overdue repeat: reviewed before, due yesterday. Sorts after the
    // never-reviewed block despite the earlier due date.
    let repeat = insert_item(&env, 1, "repeat", Priority::High, ReviewMode::Objective);
    let mut s = ReviewSchedule::new(1, repeat, now);
    s.initial_review_completed = true;
    s.next_due_at = now - Duration::days(1);
    db::save_schedule(&env.conn, &s).unwrap();

    // Pin the fresh schedules to the same instant for a deterministic tie
    for id in [low, high, med_a, med_b] {
      db::save_schedule(&env.conn, &ReviewSchedule::new(1, id, now)).unwrap();
    }

    let (queue, items) = build_queue(&env.conn, 1, None, now).unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![high, med_a, med_b, low, repeat]);
    assert_eq!(queue.current(), Some(high));
  }

  #[test]
  fn test_build_queue_category_filter() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let cat = db::insert_category(&env.conn, 1, "chemistry").unwrap();

    let tagged = ContentItem {
      category_id: Some(cat),
      ..ContentItem::new(1, "tagged".to_string(), Priority::Medium, ReviewMode::Objective)
    };
    let tagged_id = db::insert_content(&env.conn, &tagged).unwrap();
    insert_item(&env, 1, "untagged", Priority::Medium, ReviewMode::Objective);

    let (queue, _) = build_queue(&env.conn, 1, Some(cat), now).unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.current(), Some(tagged_id));
  }

  // Review completion

  #[test]
  fn test_complete_remembered_removes_and_advances_schedule() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    let id = insert_item(&env, 1, "item", Priority::Medium, ReviewMode::Objective);

    let (mut queue, _) = build_queue(&env.conn, 1, None, now).unwrap();
    let result =
      complete_current(&env.conn, &mut queue, id, ReviewOutcome::Remembered, Some(10), now, &table)
        .unwrap();

    assert_eq!(result.verdict, QueueVerdict::Removed);
    assert_eq!(result.schedule.interval_index, 1);
    assert!(result.schedule.initial_review_completed);
    assert!(queue.is_empty());

    // Durable state matches what was returned
    let stored = db::get_schedule(&env.conn, 1, id).unwrap().unwrap();
    assert_eq!(stored, result.schedule);
    // And the audit log got its entry
    assert_eq!(db::count_review_logs(&env.conn, id).unwrap(), 1);
  }

  #[test]
  fn test_complete_forgot_requeues_in_session() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    let first = insert_item(&env, 1, "first", Priority::High, ReviewMode::Objective);
    let second = insert_item(&env, 1, "second", Priority::Low, ReviewMode::Objective);

    let (mut queue, _) = build_queue(&env.conn, 1, None, now).unwrap();
    assert_eq!(queue.current(), Some(first));

    let result =
      complete_current(&env.conn, &mut queue, first, ReviewOutcome::Forgot, None, now, &table)
        .unwrap();
    assert_eq!(result.verdict, QueueVerdict::RequeuedToEnd);
    assert_eq!(result.schedule.interval_index, 0);
    assert_eq!(result.schedule.consecutive_successes, 0);

    // Still in the session even though its next_due_at is now in the future
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.current(), Some(second));
    assert!(queue.contains(first));
  }

  #[test]
  fn test_complete_partial_removes_but_keeps_interval() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    let id = insert_item(&env, 1, "item", Priority::Medium, ReviewMode::Objective);

    let mut s = ReviewSchedule::new(1, id, now);
    s.interval_index = 2;
    s.initial_review_completed = true;
    s.next_due_at = now - Duration::hours(1);
    s.consecutive_successes = 2;
    db::save_schedule(&env.conn, &s).unwrap();

    let (mut queue, _) = build_queue(&env.conn, 1, None, now).unwrap();
    let result =
      complete_current(&env.conn, &mut queue, id, ReviewOutcome::Partial, None, now, &table)
        .unwrap();

    assert_eq!(result.verdict, QueueVerdict::Removed);
    assert_eq!(result.schedule.interval_index, 2);
    assert_eq!(result.schedule.consecutive_successes, 2);
    assert_eq!(result.schedule.next_due_at, now + Duration::days(7));
    assert!(queue.is_empty());
  }

  #[test]
  fn test_partial_rejected_for_subjective_content() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    let id = insert_item(&env, 1, "essay", Priority::Medium, ReviewMode::Subjective);

    let (mut queue, _) = build_queue(&env.conn, 1, None, now).unwrap();
    let err =
      complete_current(&env.conn, &mut queue, id, ReviewOutcome::Partial, None, now, &table)
        .unwrap_err();
    assert!(matches!(err, ReviewError::PartialNotSupported(_)));
    // Rejected submission leaves the queue untouched
    assert_eq!(queue.len(), 1);
  }

  #[test]
  fn test_complete_on_empty_queue_is_invalid_state() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    let mut queue = SessionQueue::new(1, None, vec![]);

    let err = complete_current(&env.conn, &mut queue, 1, ReviewOutcome::Remembered, None, now, &table)
      .unwrap_err();
    assert!(matches!(err, ReviewError::EmptyQueue));
  }

  #[test]
  fn test_complete_wrong_head_is_stale_cursor() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    let first = insert_item(&env, 1, "first", Priority::High, ReviewMode::Objective);
    let second = insert_item(&env, 1, "second", Priority::Low, ReviewMode::Objective);

    let (mut queue, _) = build_queue(&env.conn, 1, None, now).unwrap();
    let err = complete_current(&env.conn, &mut queue, second, ReviewOutcome::Remembered, None, now, &table)
      .unwrap_err();
    assert!(matches!(err, ReviewError::StaleCursor { expected, got } if expected == first && got == second));
    assert_eq!(queue.len(), 2);
  }

  #[test]
  fn test_complete_absent_item_is_not_due() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    insert_item(&env, 1, "only", Priority::Medium, ReviewMode::Objective);

    let (mut queue, _) = build_queue(&env.conn, 1, None, now).unwrap();
    let err = complete_current(&env.conn, &mut queue, 9999, ReviewOutcome::Remembered, None, now, &table)
      .unwrap_err();
    assert!(matches!(err, ReviewError::NotDue(9999)));
  }

  #[test]
  fn test_full_session_drains_with_retries() {
    let env = TestEnv::new().unwrap();
    let now = Utc::now();
    let table = table();
    let a = insert_item(&env, 1, "a", Priority::Medium, ReviewMode::Objective);
    let b = insert_item(&env, 1, "b", Priority::Medium, ReviewMode::Objective);

    let (mut queue, _) = build_queue(&env.conn, 1, None, now).unwrap();

    // Forget the first, remember the second, then remember the retried first
    complete_current(&env.conn, &mut queue, a, ReviewOutcome::Forgot, None, now, &table).unwrap();
    complete_current(&env.conn, &mut queue, b, ReviewOutcome::Remembered, None, now, &table).unwrap();
    let last =
      complete_current(&env.conn, &mut queue, a, ReviewOutcome::Remembered, None, now, &table)
        .unwrap();

    assert!(queue.is_empty());
    assert_eq!(last.progress.reviews_completed, 3);
    assert_eq!(last.progress.total_schedules, 2);
    assert_eq!(last.progress.remaining, 0);

    // Forgot then remembered lands back at index 1
    assert_eq!(last.schedule.interval_index, 1);
  }
}
