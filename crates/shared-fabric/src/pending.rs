//! # Pending Request Store
//!
//! Maps request message IDs to callers waiting on a correlated response.
//!
//! Flow:
//! 1. Caller registers the request ID and receives a oneshot receiver
//! 2. The request is dispatched to the owning service
//! 3. The service response is routed to `complete()`
//! 4. Caller awaits the receiver, or times out and calls `expire()`

use crate::message::{MessageId, Response};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// A request waiting for its response.
struct PendingRequest {
    sender: oneshot::Sender<Response>,
    created_at: Instant,
    /// Destination topic (for logging)
    topic: String,
    timeout: Duration,
}

/// Counters for the pending request store.
#[derive(Debug, Default)]
pub struct PendingStats {
    pub total_registered: AtomicU64,
    pub total_completed: AtomicU64,
    pub total_timeouts: AtomicU64,
    /// Cancelled by the caller or dropped receivers
    pub total_cancelled: AtomicU64,
}

/// Correlates in-flight requests with their responses.
pub struct PendingRequestStore {
    pending: DashMap<MessageId, PendingRequest>,
    stats: PendingStats,
}

impl PendingRequestStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            stats: PendingStats::default(),
        }
    }

    /// Register a pending request and get a receiver for its response.
    pub fn register(
        &self,
        message_id: MessageId,
        topic: &str,
        timeout: Duration,
    ) -> oneshot::Receiver<Response> {
        let (tx, rx) = oneshot::channel();

        self.pending.insert(
            message_id,
            PendingRequest {
                sender: tx,
                created_at: Instant::now(),
                topic: topic.to_string(),
                timeout,
            },
        );
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        debug!(message_id = %message_id, topic = topic, "Registered pending request");

        rx
    }

    /// Complete a pending request with its response.
    ///
    /// Returns true if the request was found and the waiter received the
    /// response.
    pub fn complete(&self, response: Response) -> bool {
        let request_id = response.request_message_id;
        let Some((_, pending)) = self.pending.remove(&request_id) else {
            warn!(
                message_id = %request_id,
                "Response for unknown or expired request"
            );
            return false;
        };

        let response_time = pending.created_at.elapsed();
        match pending.sender.send(response) {
            Ok(()) => {
                self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    message_id = %request_id,
                    topic = pending.topic,
                    response_time_ms = response_time.as_millis(),
                    "Completed pending request"
                );
                true
            }
            Err(_) => {
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                debug!(
                    message_id = %request_id,
                    topic = pending.topic,
                    "Pending request receiver dropped"
                );
                false
            }
        }
    }

    /// Cancel a pending request.
    pub fn cancel(&self, message_id: &MessageId) -> bool {
        if self.pending.remove(message_id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Drop a request whose waiter gave up after its timeout.
    ///
    /// Counted as a timeout rather than a cancellation.
    pub fn expire(&self, message_id: &MessageId) -> bool {
        let Some((_, request)) = self.pending.remove(message_id) else {
            return false;
        };

        warn!(
            message_id = %message_id,
            topic = request.topic,
            elapsed_ms = request.created_at.elapsed().as_millis(),
            timeout_ms = request.timeout.as_millis(),
            "Pending request timed out"
        );
        self.stats.total_timeouts.fetch_add(1, Ordering::Relaxed);
        true
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, message_id: &MessageId) -> bool {
        self.pending.contains_key(message_id)
    }

    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

impl Default for PendingRequestStore {
    fn default() -> Self {
        Self::new()
    }
}
