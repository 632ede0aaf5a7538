//! Free-text answer evaluation for subjective review mode.
//!
//! The scheduler only ever sees a binary remembered/forgot result; scoring
//! free text is an external concern behind the `AnswerEvaluator` trait. The
//! bundled `KeywordEvaluator` grades normalized keyword overlap against the
//! content body, which lets subjective review run without an AI backend.
//! Production deployments plug an AI-backed scorer in behind the same trait.

use serde::Serialize;
use std::collections::HashSet;

use crate::domain::{ContentItem, ReviewOutcome};

/// Score at or above which an answer counts as remembered
const PASS_THRESHOLD: f64 = 0.6;

/// Tokens shorter than this carry no signal (articles, particles)
const MIN_TOKEN_LEN: usize = 3;

/// Result of evaluating a free-text answer.
///
/// `auto_result` is always drawn from the binary vocabulary
/// (remembered/forgot); evaluators never emit `partial`.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
  pub auto_result: ReviewOutcome,
  pub score: f64,
  pub feedback: String,
}

pub trait AnswerEvaluator {
  fn evaluate(&self, item: &ContentItem, answer: &str) -> Evaluation;
}

/// Keyword-overlap evaluator: what fraction of the content's significant
/// tokens appear in the answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEvaluator;

impl AnswerEvaluator for KeywordEvaluator {
  fn evaluate(&self, item: &ContentItem, answer: &str) -> Evaluation {
    let expected = significant_tokens(&item.body);
    let given = significant_tokens(answer);

    if expected.is_empty() {
      // Nothing to match against; an empty answer still fails
      let remembered = !given.is_empty();
      return Evaluation {
        auto_result: if remembered { ReviewOutcome::Remembered } else { ReviewOutcome::Forgot },
        score: if remembered { 1.0 } else { 0.0 },
        feedback: "Content has no gradable keywords".to_string(),
      };
    }

    let matched = expected.intersection(&given).count();
    let score = matched as f64 / expected.len() as f64;
    let auto_result = if score >= PASS_THRESHOLD {
      ReviewOutcome::Remembered
    } else {
      ReviewOutcome::Forgot
    };

    Evaluation {
      auto_result,
      score,
      feedback: format!("Matched {} of {} key terms", matched, expected.len()),
    }
  }
}

/// Lowercase, strip punctuation, keep tokens long enough to carry meaning.
fn significant_tokens(text: &str) -> HashSet<String> {
  text
    .to_lowercase()
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
    .map(|t| t.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Priority, ReviewMode};

  fn item(body: &str) -> ContentItem {
    ContentItem::new(1, body.to_string(), Priority::Medium, ReviewMode::Subjective)
  }

  #[test]
  fn test_full_match_is_remembered() {
    let item = item("Mitochondria produce cellular energy");
    let result = KeywordEvaluator.evaluate(&item, "cellular energy is produced by the mitochondria produce");
    assert_eq!(result.auto_result, ReviewOutcome::Remembered);
    assert!(result.score >= 0.99);
  }

  #[test]
  fn test_no_match_is_forgot() {
    let item = item("Mitochondria produce cellular energy");
    let result = KeywordEvaluator.evaluate(&item, "I have no idea");
    assert_eq!(result.auto_result, ReviewOutcome::Forgot);
    assert!(result.score < PASS_THRESHOLD);
  }

  #[test]
  fn test_never_emits_partial() {
    let item = item("one two-word answer");
    for answer in ["", "one", "one two word answer", "unrelated text entirely"] {
      let result = KeywordEvaluator.evaluate(&item, answer);
      assert_ne!(result.auto_result, ReviewOutcome::Partial);
    }
  }

  #[test]
  fn test_matching_ignores_case_and_punctuation() {
    let item = item("The Krebs cycle");
    let result = KeywordEvaluator.evaluate(&item, "krebs... CYCLE!");
    assert_eq!(result.auto_result, ReviewOutcome::Remembered);
  }

  #[test]
  fn test_short_tokens_carry_no_signal() {
    // "of", "a", "in" never count as keywords
    let tokens = significant_tokens("a map of the world in color");
    assert!(!tokens.contains("of"));
    assert!(!tokens.contains("a"));
    assert!(tokens.contains("map"));
    assert!(tokens.contains("world"));
  }

  #[test]
  fn test_empty_answer_fails() {
    let item = item("anything meaningful");
    let result = KeywordEvaluator.evaluate(&item, "");
    assert_eq!(result.auto_result, ReviewOutcome::Forgot);
  }

  #[test]
  fn test_feedback_reports_match_count() {
    let item = item("alpha beta gamma");
    let result = KeywordEvaluator.evaluate(&item, "alpha gamma");
    assert_eq!(result.feedback, "Matched 2 of 3 key terms");
  }
}
