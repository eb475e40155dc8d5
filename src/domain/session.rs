//! Live session handle and its outbound delivery queue.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

use super::message::ChatMessage;

/// Opaque session identifier. UUID-based, so IDs are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What to discard when an outbound queue is at capacity.
///
/// Either way the publisher never blocks; one slow consumer must not stall
/// the whole room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropPolicy {
    /// Reject the incoming message, keep what is already queued.
    #[default]
    Newest,
    /// Evict the oldest queued message to make room.
    Oldest,
}

/// Result of a non-blocking enqueue attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Queue full, incoming message discarded (`DropPolicy::Newest`).
    DroppedNewest,
    /// Queue full, oldest queued message evicted (`DropPolicy::Oldest`).
    DroppedOldest,
    /// Session already deregistered; nothing was queued.
    Closed,
}

#[derive(Debug, Default)]
struct QueueInner {
    buf: VecDeque<Arc<ChatMessage>>,
    closed: bool,
}

/// Pending outbound messages for one session.
///
/// Written by the fan-out engine, drained by the session's own delivery
/// task. `push` never blocks; `pop` suspends until a message arrives or the
/// queue is closed. Single consumer.
#[derive(Debug)]
pub struct OutboundQueue {
    capacity: usize,
    policy: DropPolicy,
    inner: Mutex<QueueInner>,
    notify: Notify,
}

impl OutboundQueue {
    /// A `capacity` of 0 means unbounded.
    pub fn new(capacity: usize, policy: DropPolicy) -> Self {
        Self {
            capacity,
            policy,
            inner: Mutex::new(QueueInner::default()),
            notify: Notify::new(),
        }
    }

    /// Non-blocking enqueue following the configured drop policy.
    pub fn push(&self, message: Arc<ChatMessage>) -> PushOutcome {
        let outcome;
        {
            let mut inner = self.inner.lock();
            if inner.closed {
                return PushOutcome::Closed;
            }
            if self.capacity > 0 && inner.buf.len() >= self.capacity {
                match self.policy {
                    DropPolicy::Newest => return PushOutcome::DroppedNewest,
                    DropPolicy::Oldest => {
                        inner.buf.pop_front();
                        inner.buf.push_back(message);
                        outcome = PushOutcome::DroppedOldest;
                    }
                }
            } else {
                inner.buf.push_back(message);
                outcome = PushOutcome::Queued;
            }
        }
        self.notify.notify_one();
        outcome
    }

    /// Wait for the next message. Returns `None` once the queue is closed.
    ///
    /// Cancel-safe: a cancelled `pop` leaves the queue untouched.
    pub async fn pop(&self) -> Option<Arc<ChatMessage>> {
        loop {
            {
                let mut inner = self.inner.lock();
                if let Some(message) = inner.buf.pop_front() {
                    return Some(message);
                }
                if inner.closed {
                    return None;
                }
            }
            // notify_one stores a permit when nobody is waiting yet, so a
            // push racing the gap before this await is not lost.
            self.notify.notified().await;
        }
    }

    /// Close the queue and discard anything still pending. Idempotent.
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock();
            inner.closed = true;
            inner.buf.clear();
        }
        self.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().buf.is_empty()
    }
}

/// One live bidirectional connection as seen by the registry and the
/// fan-out engine.
#[derive(Debug)]
pub struct RegisteredSession {
    id: SessionId,
    username: String,
    outbound: Arc<OutboundQueue>,
    connected_at: DateTime<Utc>,
}

impl RegisteredSession {
    pub(crate) fn new(username: String, queue_capacity: usize, policy: DropPolicy) -> Self {
        Self {
            id: SessionId::new(),
            username,
            outbound: Arc::new(OutboundQueue::new(queue_capacity, policy)),
            connected_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn outbound(&self) -> &Arc<OutboundQueue> {
        &self.outbound
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// A session is active until its queue has been closed by deregistration.
    pub fn is_active(&self) -> bool {
        !self.outbound.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn msg(text: &str) -> Arc<ChatMessage> {
        Arc::new(ChatMessage::new("tester", text))
    }

    #[tokio::test]
    async fn delivers_in_fifo_order() {
        let queue = OutboundQueue::new(8, DropPolicy::Newest);
        assert_eq!(queue.push(msg("one")), PushOutcome::Queued);
        assert_eq!(queue.push(msg("two")), PushOutcome::Queued);
        assert_eq!(queue.pop().await.unwrap().text, "one");
        assert_eq!(queue.pop().await.unwrap().text, "two");
    }

    #[tokio::test]
    async fn drop_newest_rejects_the_incoming_message() {
        let queue = OutboundQueue::new(1, DropPolicy::Newest);
        assert_eq!(queue.push(msg("kept")), PushOutcome::Queued);
        assert_eq!(queue.push(msg("rejected")), PushOutcome::DroppedNewest);
        assert_eq!(queue.pop().await.unwrap().text, "kept");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn drop_oldest_evicts_the_front() {
        let queue = OutboundQueue::new(2, DropPolicy::Oldest);
        queue.push(msg("m1"));
        queue.push(msg("m2"));
        assert_eq!(queue.push(msg("m3")), PushOutcome::DroppedOldest);
        assert_eq!(queue.pop().await.unwrap().text, "m2");
        assert_eq!(queue.pop().await.unwrap().text, "m3");
    }

    #[tokio::test]
    async fn zero_capacity_is_unbounded() {
        let queue = OutboundQueue::new(0, DropPolicy::Newest);
        for i in 0..1000 {
            assert_eq!(queue.push(msg(&format!("m{i}"))), PushOutcome::Queued);
        }
        assert_eq!(queue.len(), 1000);
    }

    #[tokio::test]
    async fn close_discards_pending_messages() {
        let queue = OutboundQueue::new(8, DropPolicy::Newest);
        queue.push(msg("gone"));
        queue.close();
        assert!(queue.pop().await.is_none());
        assert_eq!(queue.push(msg("late")), PushOutcome::Closed);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let queue = OutboundQueue::new(8, DropPolicy::Newest);
        queue.close();
        queue.close();
        assert!(queue.is_closed());
    }

    #[tokio::test]
    async fn pop_wakes_on_push() {
        let queue = Arc::new(OutboundQueue::new(8, DropPolicy::Newest));
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(msg("wake"));
        let delivered = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(delivered.unwrap().text, "wake");
    }

    #[tokio::test]
    async fn pop_wakes_on_close() {
        let queue = Arc::new(OutboundQueue::new(8, DropPolicy::Newest));
        let consumer = {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.close();
        let delivered = tokio::time::timeout(Duration::from_secs(1), consumer)
            .await
            .unwrap()
            .unwrap();
        assert!(delivered.is_none());
    }

    #[test]
    fn session_ids_are_unique() {
        let a = RegisteredSession::new("alice".into(), 8, DropPolicy::Newest);
        let b = RegisteredSession::new("alice".into(), 8, DropPolicy::Newest);
        assert_ne!(a.id(), b.id());
    }
}
