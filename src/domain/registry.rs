//! Session registry: the central mutable map of live connections.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::session::{DropPolicy, RegisteredSession, SessionId};

/// Registry mutation failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("session registry is full")]
    Full,
}

/// Maps each live connection to its session handle.
///
/// Backed by a concurrent map: enumeration never blocks registration, and a
/// snapshot never observes a session mid-construction. Deregistration is
/// idempotent; removing an absent ID is a no-op.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, Arc<RegisteredSession>>,
    count: AtomicUsize,
    max_sessions: usize,
    queue_capacity: usize,
    drop_policy: DropPolicy,
}

impl SessionRegistry {
    /// A `max_sessions` of 0 disables the capacity ceiling.
    pub fn new(max_sessions: usize, queue_capacity: usize, drop_policy: DropPolicy) -> Self {
        Self {
            sessions: DashMap::new(),
            count: AtomicUsize::new(0),
            max_sessions,
            queue_capacity,
            drop_policy,
        }
    }

    /// Allocate a fresh session with an empty outbound queue and insert it.
    pub fn register(&self, username: &str) -> Result<Arc<RegisteredSession>, RegistryError> {
        self.reserve_slot()?;

        let session = Arc::new(RegisteredSession::new(
            username.to_owned(),
            self.queue_capacity,
            self.drop_policy,
        ));
        self.sessions.insert(session.id(), Arc::clone(&session));
        tracing::info!(
            session_id = %session.id(),
            username = %username,
            "session registered"
        );
        Ok(session)
    }

    /// Remove a session and close its outbound queue. Idempotent.
    pub fn deregister(&self, id: SessionId) {
        if let Some((_, session)) = self.sessions.remove(&id) {
            session.outbound().close();
            self.count.fetch_sub(1, Ordering::AcqRel);
            tracing::info!(
                session_id = %id,
                username = %session.username(),
                "session deregistered"
            );
        }
    }

    /// Point-in-time view of the registered sessions, ordered by join time.
    ///
    /// Safe to call while other tasks register or deregister; no lock is
    /// held once the snapshot is returned.
    pub fn snapshot(&self) -> Vec<Arc<RegisteredSession>> {
        let mut sessions: Vec<_> = self
            .sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        sessions.sort_by_key(|s| (s.connected_at(), s.id()));
        sessions
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    // Reserve a slot under the ceiling so concurrent registrations cannot
    // overshoot it.
    fn reserve_slot(&self) -> Result<(), RegistryError> {
        if self.max_sessions == 0 {
            self.count.fetch_add(1, Ordering::AcqRel);
            return Ok(());
        }
        let mut current = self.count.load(Ordering::Acquire);
        loop {
            if current >= self.max_sessions {
                return Err(RegistryError::Full);
            }
            match self.count.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Ok(()),
                Err(observed) => current = observed,
            }
        }
    }
}
