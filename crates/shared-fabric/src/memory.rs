//! # In-Memory Fabric
//!
//! Single-process fabric that routes requests to registered service
//! callbacks. Suitable for tests and local tooling; a networked broker
//! client would implement [`FabricClient`] directly.

use crate::client::FabricClient;
use crate::errors::{codes, FabricError};
use crate::message::{MessageId, Request, Response};
use crate::pending::PendingRequestStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Trait for a service that answers requests sent to its topic.
#[async_trait]
pub trait RequestCallback: Send + Sync {
    /// Handle a request and produce the response to send back.
    ///
    /// Use [`Response::error`] to report a service-side failure.
    async fn on_request(&self, request: Request) -> Response;
}

/// In-process implementation of the fabric.
pub struct InMemoryFabric {
    connected: AtomicBool,

    /// Registered services by topic.
    services: RwLock<HashMap<String, Arc<dyn RequestCallback>>>,

    /// In-flight requests awaiting a response.
    pending: Arc<PendingRequestStore>,

    requests_sent: AtomicU64,
}

impl InMemoryFabric {
    /// Create a disconnected fabric with no services.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            services: RwLock::new(HashMap::new()),
            pending: Arc::new(PendingRequestStore::new()),
            requests_sent: AtomicU64::new(0),
        }
    }

    /// Create a fabric that is already connected.
    #[must_use]
    pub fn connected() -> Self {
        let fabric = Self::new();
        fabric.connect();
        fabric
    }

    pub fn connect(&self) {
        self.connected.store(true, Ordering::SeqCst);
        debug!("Fabric client connected");
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        debug!("Fabric client disconnected");
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Register a service callback for a topic, replacing any previous owner.
    pub fn register_service<S>(&self, topic: impl Into<String>, service: S)
    where
        S: RequestCallback + 'static,
    {
        let topic = topic.into();
        debug!(topic = %topic, "Service registered");
        self.services.write().insert(topic, Arc::new(service));
    }

    /// Remove the service registered for a topic.
    pub fn unregister_service(&self, topic: &str) -> bool {
        let removed = self.services.write().remove(topic).is_some();
        if removed {
            debug!(topic = topic, "Service unregistered");
        }
        removed
    }

    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.read().len()
    }

    /// Total requests accepted for delivery.
    #[must_use]
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Store of requests still awaiting a response.
    #[must_use]
    pub fn pending(&self) -> &PendingRequestStore {
        &self.pending
    }
}

impl Default for InMemoryFabric {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FabricClient for InMemoryFabric {
    async fn sync_request(
        &self,
        request: Request,
        timeout: Duration,
    ) -> Result<Response, FabricError> {
        if !self.is_connected() {
            return Err(FabricError::NotConnected);
        }

        let topic = request.destination_topic.clone();
        let message_id = request.message_id;

        let service = self.services.read().get(&topic).cloned();
        let Some(service) = service else {
            debug!(topic = %topic, message_id = %message_id, "No service for request topic");
            return Ok(Response::error(
                &request,
                codes::SERVICE_UNAVAILABLE,
                format!("unable to locate service for request: {topic}"),
            ));
        };

        let rx = self.pending.register(message_id, &topic, timeout);
        self.requests_sent.fetch_add(1, Ordering::Relaxed);

        let handler = tokio::spawn(async move { service.on_request(request).await });
        let mut in_flight = InFlight {
            pending: &self.pending,
            message_id,
            handler: handler.abort_handle(),
            armed: true,
        };

        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            let response = match handler.await {
                Ok(mut response) => {
                    response.request_message_id = message_id;
                    response
                }
                Err(e) if e.is_cancelled() => {
                    debug!(message_id = %message_id, "Service callback aborted");
                    return;
                }
                Err(e) => {
                    warn!(message_id = %message_id, error = %e, "Service callback failed");
                    Response::error_to(message_id, codes::SERVICE_FAILURE, "service callback failed")
                }
            };
            pending.complete(response);
        });

        let outcome = tokio::time::timeout(timeout, rx).await;
        in_flight.armed = false;

        match outcome {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(FabricError::ResponseChannelClosed),
            Err(_) => {
                in_flight.handler.abort();
                self.pending.expire(&message_id);
                Err(FabricError::Timeout { topic, timeout })
            }
        }
    }
}

/// Cleans up a request whose caller stopped waiting before it finished.
struct InFlight<'a> {
    pending: &'a PendingRequestStore,
    message_id: MessageId,
    handler: AbortHandle,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.handler.abort();
            self.pending.cancel(&self.message_id);
        }
    }
}
