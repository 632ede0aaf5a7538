use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-assigned priority tag, independent of scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
  High,
  #[default]
  Medium,
  Low,
}

impl Priority {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "high" => Some(Self::High),
      "medium" => Some(Self::Medium),
      "low" => Some(Self::Low),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::High => "high",
      Self::Medium => "medium",
      Self::Low => "low",
    }
  }

  /// Sort rank: lower sorts earlier in the queue (high > medium > low).
  pub fn rank(&self) -> u8 {
    match self {
      Self::High => 0,
      Self::Medium => 1,
      Self::Low => 2,
    }
  }
}

/// How review outcomes for an item are produced.
///
/// Objective items are graded directly by the learner with the full ternary
/// vocabulary. Subjective items route a free-text answer through an answer
/// evaluator that yields a binary remembered/forgot result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
  #[default]
  Objective,
  Subjective,
}

impl ReviewMode {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "objective" => Some(Self::Objective),
      "subjective" => Some(Self::Subjective),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Objective => "objective",
      Self::Subjective => "subjective",
    }
  }

  /// Whether the `partial` outcome is a valid grade for this mode.
  /// Evaluator-scored answers collapse to the binary vocabulary.
  pub fn supports_partial(&self) -> bool {
    matches!(self, Self::Objective)
  }
}

/// Optional many-to-one grouping for content items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
  pub id: i64,
  pub user_id: i64,
  pub name: String,
}

/// A learnable unit authored by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
  pub id: i64,
  pub user_id: i64,
  pub category_id: Option<i64>,
  pub body: String,
  pub priority: Priority,
  pub review_mode: ReviewMode,
  pub created_at: DateTime<Utc>,
}

impl ContentItem {
  pub fn new(user_id: i64, body: String, priority: Priority, review_mode: ReviewMode) -> Self {
    Self {
      id: 0,
      user_id,
      category_id: None,
      body,
      priority,
      review_mode,
      created_at: Utc::now(),
    }
  }
}
