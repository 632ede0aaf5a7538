//! Test utilities for database setup.
//!
//! Reuses the authoritative schema initialization so test databases never
//! drift from production migrations.

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

/// Test environment with a migrated database in a temporary directory,
/// cleaned up automatically when dropped.
pub struct TestEnv {
  /// Temporary directory (kept alive for database file persistence)
  pub temp: TempDir,
  /// Connection with the full schema (all migrations applied)
  pub conn: Connection,
}

impl TestEnv {
  pub fn new() -> rusqlite::Result<Self> {
    let temp = TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    let db_path = temp.path().join("recall.db");
    let conn = Connection::open(&db_path)?;
    crate::db::schema::run_migrations(&conn)?;

    Ok(Self { temp, conn })
  }

  /// Temporary directory path for creating test files.
  pub fn path(&self) -> &Path {
    self.temp.path()
  }
}
