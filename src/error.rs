//! Error taxonomy for the scheduling core and its HTTP surface.
//!
//! Each kind maps to a distinct status code so callers can tell a retryable
//! persistence failure apart from a bad submission or a drained session.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbLockError;

#[derive(Debug)]
pub enum ReviewError {
  /// Outcome string not in the review vocabulary, or missing entirely.
  InvalidOutcome(String),
  /// The `partial` grade submitted for an item whose mode only accepts
  /// the binary vocabulary.
  PartialNotSupported(i64),
  /// Content id does not exist for this user.
  UnknownContent(i64),
  /// Content exists but is not in the active queue and not currently due.
  NotDue(i64),
  /// Review submitted without an active session queue.
  NoActiveSession(i64),
  /// Review submitted while the session queue is already drained.
  EmptyQueue,
  /// Submitted content id is in the queue but not at its head.
  StaleCursor { expected: i64, got: i64 },
  /// Storage failure; the in-memory queue was left untouched.
  Persistence(rusqlite::Error),
  /// Database mutex unavailable.
  Lock(DbLockError),
}

impl ReviewError {
  /// Stable machine-readable kind for API consumers.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::InvalidOutcome(_) => "invalid_outcome",
      Self::PartialNotSupported(_) => "partial_not_supported",
      Self::UnknownContent(_) => "unknown_content",
      Self::NotDue(_) => "not_due",
      Self::NoActiveSession(_) => "no_active_session",
      Self::EmptyQueue => "empty_queue",
      Self::StaleCursor { .. } => "stale_cursor",
      Self::Persistence(_) => "persistence",
      Self::Lock(_) => "lock",
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      Self::InvalidOutcome(_) | Self::PartialNotSupported(_) => StatusCode::BAD_REQUEST,
      Self::UnknownContent(_) => StatusCode::NOT_FOUND,
      Self::NotDue(_) | Self::NoActiveSession(_) | Self::EmptyQueue | Self::StaleCursor { .. } => {
        StatusCode::CONFLICT
      }
      Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Self::Lock(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl std::fmt::Display for ReviewError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::InvalidOutcome(s) => write!(f, "Invalid review outcome: {:?}", s),
      Self::PartialNotSupported(id) => {
        write!(f, "Content {} does not accept the partial outcome", id)
      }
      Self::UnknownContent(id) => write!(f, "Unknown content id {}", id),
      Self::NotDue(id) => write!(f, "Content {} is not due for review", id),
      Self::NoActiveSession(user_id) => {
        write!(f, "No active review session for user {}", user_id)
      }
      Self::EmptyQueue => write!(f, "Session queue is already empty"),
      Self::StaleCursor { expected, got } => {
        write!(f, "Expected review of content {}, got {}", expected, got)
      }
      Self::Persistence(e) => write!(f, "Storage failure: {}", e),
      Self::Lock(e) => write!(f, "{}", e),
    }
  }
}

impl std::error::Error for ReviewError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Persistence(e) => Some(e),
      Self::Lock(e) => Some(e),
      _ => None,
    }
  }
}

impl From<rusqlite::Error> for ReviewError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Persistence(e)
  }
}

impl From<DbLockError> for ReviewError {
  fn from(e: DbLockError) -> Self {
    Self::Lock(e)
  }
}

impl IntoResponse for ReviewError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("{}", self);
    }
    let body = Json(json!({
      "error": self.kind(),
      "message": self.to_string(),
    }));
    (status, body).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_kinds_are_distinct() {
    let errors = [
      ReviewError::InvalidOutcome("ok".into()),
      ReviewError::PartialNotSupported(1),
      ReviewError::UnknownContent(1),
      ReviewError::NotDue(1),
      ReviewError::NoActiveSession(1),
      ReviewError::EmptyQueue,
      ReviewError::StaleCursor { expected: 1, got: 2 },
      ReviewError::Lock(DbLockError),
    ];
    let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
    kinds.sort();
    kinds.dedup();
    assert_eq!(kinds.len(), errors.len());
  }

  #[test]
  fn test_session_complete_distinct_from_persistence() {
    assert_ne!(
      ReviewError::EmptyQueue.status(),
      ReviewError::Persistence(rusqlite::Error::InvalidQuery).status()
    );
  }

  #[test]
  fn test_display_names_the_ids() {
    let e = ReviewError::StaleCursor { expected: 3, got: 9 };
    let msg = e.to_string();
    assert!(msg.contains('3') && msg.contains('9'));
  }
}
