//! Review schedule store: one row per (user, content) pair.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{ReviewOutcome, ReviewSchedule};

pub fn get_schedule(conn: &Connection, user_id: i64, content_id: i64) -> Result<Option<ReviewSchedule>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT user_id, content_id, interval_index, initial_review_completed,
           next_due_at, last_outcome, consecutive_successes
    FROM review_schedules
    WHERE user_id = ?1 AND content_id = ?2
    "#,
  )?;

  let mut rows = stmt.query(params![user_id, content_id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_schedule(row)?))
  } else {
    Ok(None)
  }
}

/// Upsert the full schedule state.
pub fn save_schedule(conn: &Connection, schedule: &ReviewSchedule) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO review_schedules
      (user_id, content_id, interval_index, initial_review_completed,
       next_due_at, last_outcome, consecutive_successes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT (user_id, content_id) DO UPDATE SET
      interval_index = excluded.interval_index,
      initial_review_completed = excluded.initial_review_completed,
      next_due_at = excluded.next_due_at,
      last_outcome = excluded.last_outcome,
      consecutive_successes = excluded.consecutive_successes
    "#,
    params![
      schedule.user_id,
      schedule.content_id,
      schedule.interval_index as i64,
      if schedule.initial_review_completed { 1 } else { 0 },
      schedule.next_due_at.to_rfc3339(),
      schedule.last_outcome.map(|o| o.as_str()),
      schedule.consecutive_successes,
    ],
  )?;
  Ok(())
}

/// Fetch the schedule, lazily creating a fresh one for never-scheduled items.
pub fn get_or_create_schedule(
  conn: &Connection,
  user_id: i64,
  content_id: i64,
  now: DateTime<Utc>,
) -> Result<ReviewSchedule> {
  if let Some(schedule) = get_schedule(conn, user_id, content_id)? {
    return Ok(schedule);
  }
  let schedule = ReviewSchedule::new(user_id, content_id, now);
  save_schedule(conn, &schedule)?;
  Ok(schedule)
}

fn row_to_schedule(row: &rusqlite::Row) -> Result<ReviewSchedule> {
  let next_due_str: String = row.get(4)?;
  let outcome_str: Option<String> = row.get(5)?;
  let interval_index: i64 = row.get(2)?;
  let completed: i64 = row.get(3)?;

  Ok(ReviewSchedule {
    user_id: row.get(0)?,
    content_id: row.get(1)?,
    interval_index: interval_index.max(0) as usize,
    initial_review_completed: completed != 0,
    next_due_at: DateTime::parse_from_rfc3339(&next_due_str)
      .map(|dt| dt.with_timezone(&Utc))
      .unwrap_or_else(|_| Utc::now()),
    last_outcome: outcome_str.as_deref().and_then(ReviewOutcome::from_str),
    consecutive_successes: row.get(6)?,
  })
}
