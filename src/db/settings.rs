//! Key/value settings access, including the configured interval table.

use rusqlite::{params, Connection, Result};

use crate::config;
use crate::srs::IntervalTable;

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
  let result = conn.query_row(
    "SELECT value FROM settings WHERE key = ?1",
    params![key],
    |row| row.get(0),
  );
  match result {
    Ok(value) => Ok(Some(value)),
    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
    Err(e) => Err(e),
  }
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
  conn.execute(
    "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT (key) DO UPDATE SET value = excluded.value",
    params![key, value],
  )?;
  Ok(())
}

/// Interval table from settings: day offsets from `interval_days`, maximum
/// reachable index capped by the configured subscription plan.
pub fn get_interval_table(conn: &Connection) -> Result<IntervalTable> {
  let days = get_setting(conn, "interval_days")?
    .map(|csv| parse_interval_days(&csv))
    .unwrap_or_else(|| config::DEFAULT_REVIEW_INTERVALS.to_vec());

  let plan = get_setting(conn, "plan")?.unwrap_or_else(|| "free".to_string());
  let max_index = config::max_interval_index_for_plan(&plan);

  Ok(IntervalTable::new(days, max_index))
}

fn parse_interval_days(csv: &str) -> Vec<i64> {
  csv
    .split(',')
    .filter_map(|part| part.trim().parse::<i64>().ok())
    .filter(|days| *days > 0)
    .collect()
}
