//! Minimal content authoring handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::db::{self, DbPool};
use crate::domain::{ContentItem, Priority, ReviewMode};
use crate::error::ReviewError;

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
  pub user_id: i64,
  pub body: String,
  #[serde(default)]
  pub priority: Priority,
  #[serde(default)]
  pub review_mode: ReviewMode,
  pub category_id: Option<i64>,
}

/// POST /content — author a new learnable item.
pub async fn create_content(
  State(pool): State<DbPool>,
  Json(req): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ContentItem>), ReviewError> {
  let conn = db::try_lock(&pool)?;

  let mut item = ContentItem::new(req.user_id, req.body, req.priority, req.review_mode);
  item.category_id = req.category_id;
  item.id = db::insert_content(&conn, &item)?;

  Ok((StatusCode::CREATED, Json(item)))
}
