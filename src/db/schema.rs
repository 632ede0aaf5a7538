use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS categories (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS content_items (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER NOT NULL,
      category_id INTEGER,
      body TEXT NOT NULL,
      priority TEXT NOT NULL DEFAULT 'medium',
      review_mode TEXT NOT NULL DEFAULT 'objective',
      created_at TEXT NOT NULL,
      FOREIGN KEY (category_id) REFERENCES categories(id)
    );

    CREATE TABLE IF NOT EXISTS review_schedules (
      user_id INTEGER NOT NULL,
      content_id INTEGER NOT NULL,
      interval_index INTEGER NOT NULL DEFAULT 0,
      initial_review_completed INTEGER NOT NULL DEFAULT 0,
      next_due_at TEXT NOT NULL,
      last_outcome TEXT,
      consecutive_successes INTEGER NOT NULL DEFAULT 0,
      PRIMARY KEY (user_id, content_id),
      FOREIGN KEY (content_id) REFERENCES content_items(id)
    );

    CREATE TABLE IF NOT EXISTS review_logs (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      content_id INTEGER NOT NULL,
      outcome TEXT NOT NULL,
      time_spent_seconds INTEGER,
      reviewed_at TEXT NOT NULL,
      resulting_interval_index INTEGER NOT NULL,
      FOREIGN KEY (content_id) REFERENCES content_items(id)
    );

    CREATE TABLE IF NOT EXISTS settings (
      key TEXT PRIMARY KEY,
      value TEXT NOT NULL
    );

    -- Default settings
    INSERT OR IGNORE INTO settings (key, value) VALUES ('interval_days', '1,3,7,14,30,90,180');
    INSERT OR IGNORE INTO settings (key, value) VALUES ('plan', 'free');

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_content_items_user ON content_items(user_id);
    CREATE INDEX IF NOT EXISTS idx_content_items_category ON content_items(category_id);
    CREATE INDEX IF NOT EXISTS idx_schedules_next_due ON review_schedules(next_due_at);
    CREATE INDEX IF NOT EXISTS idx_review_logs_content ON review_logs(content_id);
    CREATE INDEX IF NOT EXISTS idx_review_logs_reviewed_at ON review_logs(reviewed_at);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: time spent tracking on review logs
  add_column_if_missing(conn, "review_logs", "time_spent_seconds", "INTEGER")?;

  // Migration: per-item review mode (everything was objective before)
  add_column_if_missing(conn, "content_items", "review_mode", "TEXT NOT NULL DEFAULT 'objective'")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}
