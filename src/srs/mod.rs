pub mod queue;
pub mod scheduler;

pub use queue::{build_queue, complete_current, CompletedReview, QueueVerdict, SessionProgress, SessionQueue};
pub use scheduler::{apply_outcome, is_due, IntervalTable};
