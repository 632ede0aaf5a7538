pub mod content;
pub mod schedule;

pub use content::{Category, ContentItem, Priority, ReviewMode};
pub use schedule::{ReviewLogEntry, ReviewOutcome, ReviewSchedule};
