//! Content and category store.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};

use crate::domain::{Category, ContentItem, Priority, ReviewMode};

pub fn insert_content(conn: &Connection, item: &ContentItem) -> Result<i64> {
  conn.execute(
    r#"
    INSERT INTO content_items (user_id, category_id, body, priority, review_mode, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
    params![
      item.user_id,
      item.category_id,
      item.body,
      item.priority.as_str(),
      item.review_mode.as_str(),
      item.created_at.to_rfc3339(),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_content_by_id(conn: &Connection, id: i64) -> Result<Option<ContentItem>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, user_id, category_id, body, priority, review_mode, created_at
    FROM content_items WHERE id = ?1
    "#,
  )?;

  let mut rows = stmt.query(params![id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(row_to_content(row)?))
  } else {
    Ok(None)
  }
}

/// All content for a user, optionally restricted to one category.
pub fn list_content(
  conn: &Connection,
  user_id: i64,
  category_filter: Option<i64>,
) -> Result<Vec<ContentItem>> {
  if let Some(category_id) = category_filter {
    let mut stmt = conn.prepare(
      r#"
      SELECT id, user_id, category_id, body, priority, review_mode, created_at
      FROM content_items
      WHERE user_id = ?1 AND category_id = ?2
      ORDER BY id ASC
      "#,
    )?;
    let items = stmt
      .query_map(params![user_id, category_id], |row| row_to_content(row))?
      .collect::<Result<Vec<_>>>()?;
    return Ok(items);
  }

  let mut stmt = conn.prepare(
    r#"
    SELECT id, user_id, category_id, body, priority, review_mode, created_at
    FROM content_items
    WHERE user_id = ?1
    ORDER BY id ASC
    "#,
  )?;
  let items = stmt
    .query_map(params![user_id], |row| row_to_content(row))?
    .collect::<Result<Vec<_>>>()?;
  Ok(items)
}

pub fn insert_category(conn: &Connection, user_id: i64, name: &str) -> Result<i64> {
  conn.execute(
    "INSERT INTO categories (user_id, name) VALUES (?1, ?2)",
    params![user_id, name],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn get_category(conn: &Connection, id: i64) -> Result<Option<Category>> {
  let mut stmt = conn.prepare("SELECT id, user_id, name FROM categories WHERE id = ?1")?;
  let mut rows = stmt.query(params![id])?;
  if let Some(row) = rows.next()? {
    Ok(Some(Category {
      id: row.get(0)?,
      user_id: row.get(1)?,
      name: row.get(2)?,
    }))
  } else {
    Ok(None)
  }
}

fn row_to_content(row: &rusqlite::Row) -> Result<ContentItem> {
  let priority_str: String = row.get(4)?;
  let mode_str: String = row.get(5)?;
  let created_at_str: String = row.get(6)?;

  Ok(ContentItem {
    id: row.get(0)?,
    user_id: row.get(1)?,
    category_id: row.get(2)?,
    body: row.get(3)?,
    priority: Priority::from_str(&priority_str).unwrap_or_default(),
    review_mode: ReviewMode::from_str(&mode_str).unwrap_or_default(),
    created_at: DateTime::parse_from_rfc3339(&created_at_str)
      .map(|dt| dt.with_timezone(&Utc))
      .unwrap_or_else(|_| Utc::now()),
  })
}
