//! Presence table: which usernames are currently online.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Set of usernames considered online, with the time they first appeared.
///
/// Accuracy is best-effort: a username may be claimed by several concurrent
/// sessions, and nothing downstream depends on the table being strict.
#[derive(Debug, Default)]
pub struct PresenceTable {
    online: DashMap<String, DateTime<Utc>>,
}

impl PresenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a username online. Idempotent; keeps the original login time.
    pub fn mark_online(&self, username: &str) {
        self.online
            .entry(username.to_owned())
            .or_insert_with(Utc::now);
    }

    /// Remove a username. A no-op when absent.
    pub fn mark_offline(&self, username: &str) {
        self.online.remove(username);
    }

    pub fn is_online(&self, username: &str) -> bool {
        self.online.contains_key(username)
    }

    /// Current usernames, sorted for stable output.
    pub fn users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.online.iter().map(|e| e.key().clone()).collect();
        users.sort();
        users
    }

    pub fn len(&self) -> usize {
        self.online.len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.is_empty()
    }
}
