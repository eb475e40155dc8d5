//! Room Service
//!
//! The broadcast fan-out engine: login and presence, history replay, batch
//! recording, and per-message delivery to every connected session except
//! the sender.

use std::sync::Arc;

use crate::config::RoomSettings;
use crate::domain::{
    ChatMessage, DropPolicy, MessageArchive, MessageRing, PresenceTable, PushOutcome,
    RegisteredSession, RegistryError, SessionId, SessionRegistry,
};
use crate::infrastructure::metrics;

/// Result of a login attempt. Rejection is an outcome, not an error: the
/// caller always gets a (success, message) pair to relay.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub accepted: bool,
    pub message: String,
}

/// Chat room orchestration: owns the session registry, the history ring,
/// the presence table, and the optional archive.
///
/// The registry and the ring are the only shared mutable state in the
/// process; everything else is owned by one session's tasks.
pub struct RoomService {
    registry: SessionRegistry,
    history: MessageRing,
    presence: PresenceTable,
    archive: Option<Arc<dyn MessageArchive>>,
    reject_duplicate_logins: bool,
}

impl RoomService {
    pub fn new(settings: &RoomSettings, archive: Option<Arc<dyn MessageArchive>>) -> Self {
        let drop_policy = parse_drop_policy(&settings.drop_policy);
        Self {
            registry: SessionRegistry::new(
                settings.max_sessions,
                settings.outbound_capacity,
                drop_policy,
            ),
            history: MessageRing::new(settings.history_capacity),
            presence: PresenceTable::new(),
            archive,
            reject_duplicate_logins: settings.reject_duplicate_logins,
        }
    }

    /// Unary login: mark the username online.
    ///
    /// Duplicate names are accepted unless `reject_duplicate_logins` is
    /// configured; presence stays best-effort either way.
    pub fn login(&self, username: &str) -> LoginOutcome {
        if self.reject_duplicate_logins && self.presence.is_online(username) {
            metrics::record_login("rejected");
            return LoginOutcome {
                accepted: false,
                message: format!("username {username} is already in use"),
            };
        }
        self.presence.mark_online(username);
        metrics::record_login("accepted");
        tracing::info!(username = %username, "user logged in");
        LoginOutcome {
            accepted: true,
            message: format!("Welcome, {username}!"),
        }
    }

    /// Register a live chat session and mark its username online.
    pub fn join(&self, username: &str) -> Result<Arc<RegisteredSession>, RegistryError> {
        let session = self.registry.register(username)?;
        self.presence.mark_online(username);
        metrics::set_active_sessions(self.registry.len());
        Ok(session)
    }

    /// Deregister a session. The username goes offline once no other live
    /// session claims it.
    pub fn leave(&self, session: &RegisteredSession) {
        self.registry.deregister(session.id());
        let username = session.username();
        let still_claimed = self
            .registry
            .snapshot()
            .iter()
            .any(|s| s.username() == username);
        if !still_claimed {
            self.presence.mark_offline(username);
        }
        metrics::set_active_sessions(self.registry.len());
    }

    /// Deliver one message to every registered session except the sender.
    ///
    /// Appends to the history ring, hands the message to the archive in the
    /// background, then enqueues onto each recipient queue taken from a
    /// registry snapshot. Enqueueing never blocks; drops are logged and
    /// counted, not surfaced to the publisher. Publishing to an empty room
    /// is valid.
    pub fn publish(&self, sender: SessionId, message: ChatMessage) {
        let message = Arc::new(message);
        self.history.append(Arc::clone(&message));
        self.archive_in_background(Arc::clone(&message));
        metrics::record_publish();

        for session in self.registry.snapshot() {
            if session.id() == sender {
                continue;
            }
            match session.outbound().push(Arc::clone(&message)) {
                PushOutcome::Queued => {}
                PushOutcome::DroppedNewest => {
                    metrics::record_delivery_dropped("newest");
                    tracing::warn!(
                        session_id = %session.id(),
                        username = %session.username(),
                        "outbound queue full, message dropped"
                    );
                }
                PushOutcome::DroppedOldest => {
                    metrics::record_delivery_dropped("oldest");
                    tracing::warn!(
                        session_id = %session.id(),
                        username = %session.username(),
                        "outbound queue full, oldest message evicted"
                    );
                }
                PushOutcome::Closed => {
                    tracing::debug!(
                        session_id = %session.id(),
                        "skipped delivery to a closing session"
                    );
                }
            }
        }
    }

    /// Record a message into history and the archive without fan-out, for
    /// the batch submission call.
    pub async fn record(&self, message: ChatMessage) {
        let message = Arc::new(message);
        self.history.append(Arc::clone(&message));
        if let Some(archive) = &self.archive {
            if let Err(e) = archive.record(&message).await {
                tracing::warn!(error = %e, "failed to archive message");
            }
        }
    }

    /// Point-in-time replay of the recent-message ring, oldest first.
    pub fn recent_messages(&self) -> Vec<Arc<ChatMessage>> {
        self.history.snapshot()
    }

    pub fn online_users(&self) -> Vec<String> {
        self.presence.users()
    }

    pub fn is_online(&self, username: &str) -> bool {
        self.presence.is_online(username)
    }

    /// Current live sessions, ordered by join time.
    pub fn sessions(&self) -> Vec<Arc<RegisteredSession>> {
        self.registry.snapshot()
    }

    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn archive(&self) -> Option<&Arc<dyn MessageArchive>> {
        self.archive.as_ref()
    }

    fn archive_in_background(&self, message: Arc<ChatMessage>) {
        let Some(archive) = self.archive.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(e) = archive.record(&message).await {
                tracing::warn!(error = %e, "failed to archive message");
            }
        });
    }
}

fn parse_drop_policy(raw: &str) -> DropPolicy {
    match raw.to_ascii_lowercase().as_str() {
        "oldest" => DropPolicy::Oldest,
        "newest" => DropPolicy::Newest,
        other => {
            tracing::warn!(policy = %other, "unknown drop policy, falling back to \"newest\"");
            DropPolicy::Newest
        }
    }
}
