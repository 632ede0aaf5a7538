//! Application configuration constants.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
  database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
  path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
  // Load .env file if present
  let _ = dotenvy::dotenv();

  // Priority 1: config.toml
  if let Ok(contents) = std::fs::read_to_string("config.toml") {
    if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
      if let Some(db) = config.database {
        if let Some(path) = db.path {
          tracing::info!("Using database from config.toml: {}", path);
          return PathBuf::from(path);
        }
      }
    }
  }

  // Priority 2: .env DATABASE_PATH
  if let Ok(path) = std::env::var("DATABASE_PATH") {
    tracing::info!("Using database from DATABASE_PATH env: {}", path);
    return PathBuf::from(path);
  }

  // Default
  let default = PathBuf::from("data/recall.db");
  tracing::info!("Using default database path: {}", default.display());
  default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
  format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Session Configuration ====================

/// Session queue expiration time in hours
pub const SESSION_EXPIRY_HOURS: i64 = 12;

/// Probability threshold for session cleanup (0-255, lower = more frequent)
/// Value of 25 means ~10% chance (25/256) on each session access
pub const SESSION_CLEANUP_THRESHOLD: u8 = 25;

// ==================== Scheduling Configuration ====================

/// Default interval table: day offsets applied at each successive index
pub const DEFAULT_REVIEW_INTERVALS: [i64; 7] = [1, 3, 7, 14, 30, 90, 180];

/// Subscription plan info: how deep into the interval table a schedule may
/// advance. Billing itself is handled elsewhere; only the cap matters here.
pub struct PlanInfo {
  pub name: &'static str,
  pub max_interval_index: usize,
}

/// All plan definitions
pub const PLANS: [PlanInfo; 3] = [
  PlanInfo {
    name: "free",
    max_interval_index: 3, // up to 14 days
  },
  PlanInfo {
    name: "standard",
    max_interval_index: 5, // up to 90 days
  },
  PlanInfo {
    name: "premium",
    max_interval_index: 6, // full table
  },
];

/// Max reachable interval index for a plan; unknown plans get the free cap.
pub fn max_interval_index_for_plan(plan: &str) -> usize {
  PLANS
    .iter()
    .find(|p| p.name == plan)
    .map(|p| p.max_interval_index)
    .unwrap_or(PLANS[0].max_interval_index)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_plan_caps() {
    assert_eq!(max_interval_index_for_plan("free"), 3);
    assert_eq!(max_interval_index_for_plan("standard"), 5);
    assert_eq!(max_interval_index_for_plan("premium"), 6);
  }

  #[test]
  fn test_unknown_plan_gets_free_cap() {
    assert_eq!(max_interval_index_for_plan("enterprise"), 3);
    assert_eq!(max_interval_index_for_plan(""), 3);
  }

  #[test]
  fn test_default_intervals_monotonic() {
    for pair in DEFAULT_REVIEW_INTERVALS.windows(2) {
      assert!(pair[0] < pair[1]);
    }
  }
}
