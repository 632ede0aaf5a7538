pub mod content;
pub mod queue;
pub mod review;

pub use content::create_content;
pub use queue::{end_session, get_queue};
pub use review::submit_review;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::db::DbPool;

/// Route table, shared between `main` and the HTTP tests.
pub fn router(pool: DbPool) -> Router {
  Router::new()
    .route("/queue", get(get_queue))
    .route("/review", post(submit_review))
    .route("/session", delete(end_session))
    .route("/content", post(create_content))
    .with_state(pool)
}
