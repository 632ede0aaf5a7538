//! Queue build and session lifecycle handlers.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{self, DbPool};
use crate::domain::ContentItem;
use crate::error::ReviewError;
use crate::session;
use crate::srs;

#[derive(Debug, Deserialize)]
pub struct QueueParams {
  pub user_id: i64,
  pub category_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct QueueResponse {
  pub items: Vec<ContentItem>,
  pub total_count: usize,
}

/// GET /queue — build a fresh session queue, superseding any active one.
pub async fn get_queue(
  State(pool): State<DbPool>,
  Query(params): Query<QueueParams>,
) -> Result<Json<QueueResponse>, ReviewError> {
  let conn = db::try_lock(&pool)?;
  let (queue, items) = srs::build_queue(&conn, params.user_id, params.category_id, Utc::now())?;
  drop(conn);

  session::store_session(params.user_id, queue);
  Ok(Json(QueueResponse {
    total_count: items.len(),
    items,
  }))
}

#[derive(Debug, Deserialize)]
pub struct SessionParams {
  pub user_id: i64,
}

/// DELETE /session — discard the active session queue.
pub async fn end_session(Query(params): Query<SessionParams>) -> StatusCode {
  if session::end_session(params.user_id) {
    StatusCode::NO_CONTENT
  } else {
    StatusCode::NOT_FOUND
  }
}
