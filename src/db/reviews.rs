//! Append-only review log sink.
//!
//! Entries feed streak/success-rate reporting consumers; the scheduler
//! itself never reads them back.

use rusqlite::{params, Connection, Result};

use crate::domain::ReviewLogEntry;

pub fn insert_review_log(conn: &Connection, entry: &ReviewLogEntry) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO review_logs (content_id, outcome, time_spent_seconds, reviewed_at, resulting_interval_index)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![
      entry.content_id,
      entry.outcome.as_str(),
      entry.time_spent_seconds,
      entry.reviewed_at.to_rfc3339(),
      entry.resulting_interval_index as i64,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn count_review_logs(conn: &Connection, content_id: i64) -> Result<i64> {
  conn.query_row(
    "SELECT COUNT(*) FROM review_logs WHERE content_id = ?1",
    params![content_id],
    |row| row.get(0),
  )
}
