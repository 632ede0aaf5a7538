//! In-memory store for active review session queues.
//!
//! One active SessionQueue per user. Queues auto-expire after a period of
//! inactivity; a fresh build always supersedes the stored queue.

use crate::config;
use crate::srs::SessionQueue;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// Session entry with last access time for expiration
struct SessionEntry {
  queue: SessionQueue,
  last_access: DateTime<Utc>,
}

/// Global session store
static SESSIONS: LazyLock<Mutex<HashMap<i64, SessionEntry>>> =
  LazyLock::new(|| Mutex::new(HashMap::new()));

/// Active session queue for a user, if one exists and has not expired.
pub fn active_session(user_id: i64) -> Option<SessionQueue> {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");

  // Clean up expired sessions occasionally (~10% chance)
  if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
    cleanup_expired(&mut sessions);
  }

  let entry = sessions.get_mut(&user_id)?;
  if entry.last_access < Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS) {
    sessions.remove(&user_id);
    return None;
  }
  entry.last_access = Utc::now();
  Some(entry.queue.clone())
}

/// Store (or replace) a user's session queue.
pub fn store_session(user_id: i64, queue: SessionQueue) {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");
  sessions.insert(
    user_id,
    SessionEntry {
      queue,
      last_access: Utc::now(),
    },
  );
}

/// Discard a user's session queue. Returns true if one was active.
pub fn end_session(user_id: i64) -> bool {
  let mut sessions = SESSIONS.lock().expect("Session store lock poisoned");
  sessions.remove(&user_id).is_some()
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<i64, SessionEntry>) {
  let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}
