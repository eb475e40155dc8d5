//! Recent-message ring used to replay history to joining clients.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use super::message::ChatMessage;

/// Bounded FIFO buffer of the last N chat messages.
///
/// Append evicts the oldest entry once the capacity is reached. Replay is a
/// point-in-time copy and does not subscribe the caller to future messages.
#[derive(Debug)]
pub struct MessageRing {
    capacity: usize,
    buf: RwLock<VecDeque<Arc<ChatMessage>>>,
}

impl MessageRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            buf: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append a message, evicting the oldest entry on overflow.
    pub fn append(&self, message: Arc<ChatMessage>) {
        if self.capacity == 0 {
            return;
        }
        let mut buf = self.buf.write();
        if buf.len() == self.capacity {
            buf.pop_front();
        }
        buf.push_back(message);
    }

    /// Point-in-time copy of the buffered messages, oldest first.
    pub fn snapshot(&self) -> Vec<Arc<ChatMessage>> {
        self.buf.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buf.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
