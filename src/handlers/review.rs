//! Review completion handler.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{self, DbPool};
use crate::domain::{ReviewMode, ReviewOutcome, ReviewSchedule};
use crate::error::ReviewError;
use crate::evaluate::{AnswerEvaluator, Evaluation, KeywordEvaluator};
use crate::session;
use crate::srs::{self, QueueVerdict, SessionProgress};

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  pub user_id: i64,
  pub content_id: i64,
  /// Explicit grade (objective mode, or a pre-scored subjective result)
  pub outcome: Option<String>,
  /// Free-text answer to run through the evaluator (subjective mode)
  pub answer_text: Option<String>,
  pub time_spent_seconds: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
  pub updated_schedule: ReviewSchedule,
  pub verdict: QueueVerdict,
  pub session_progress: SessionProgress,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub evaluation: Option<Evaluation>,
}

/// POST /review — grade the head of the active session queue.
pub async fn submit_review(
  State(pool): State<DbPool>,
  Json(req): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ReviewError> {
  let conn = db::try_lock(&pool)?;

  let item = db::get_content_by_id(&conn, req.content_id)?
    .ok_or(ReviewError::UnknownContent(req.content_id))?;

  // Resolve the outcome: explicit grade, or evaluator-scored free text
  let (outcome, evaluation) = match (&req.outcome, &req.answer_text) {
    (Some(s), _) => {
      let outcome =
        ReviewOutcome::from_str(s).ok_or_else(|| ReviewError::InvalidOutcome(s.clone()))?;
      (outcome, None)
    }
    (None, Some(answer)) if item.review_mode == ReviewMode::Subjective => {
      let evaluation = KeywordEvaluator.evaluate(&item, answer);
      (evaluation.auto_result, Some(evaluation))
    }
    _ => return Err(ReviewError::InvalidOutcome("missing outcome".to_string())),
  };

  let mut queue = session::active_session(req.user_id)
    .ok_or(ReviewError::NoActiveSession(req.user_id))?;

  let table = db::get_interval_table(&conn)?;
  let completed = srs::complete_current(
    &conn,
    &mut queue,
    req.content_id,
    outcome,
    req.time_spent_seconds,
    Utc::now(),
    &table,
  )?;
  drop(conn);

  // The in-memory queue already reflects the persisted schedule; on any
  // error above the stored session was never touched
  session::store_session(req.user_id, queue);

  Ok(Json(ReviewResponse {
    updated_schedule: completed.schedule,
    verdict: completed.verdict,
    session_progress: completed.progress,
    evaluation,
  }))
}
