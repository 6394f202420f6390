//! # Fabric Client
//!
//! The collaborator interface service wrappers depend on.

use crate::errors::FabricError;
use crate::message::{Request, Response};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Trait for performing request/response exchanges over the fabric.
///
/// Implementations own connection management, topic routing and response
/// correlation. Callers only see the correlated [`Response`].
#[async_trait]
pub trait FabricClient: Send + Sync {
    /// Send a request and wait for its response.
    ///
    /// # Arguments
    ///
    /// * `request` - The request to send
    /// * `timeout` - Maximum time to wait for the response
    ///
    /// # Returns
    ///
    /// The correlated response, which may itself be error-typed (see
    /// [`Response::is_error`]).
    ///
    /// # Errors
    ///
    /// Returns a [`FabricError`] if the request could not be delivered or no
    /// response arrived within `timeout`.
    async fn sync_request(
        &self,
        request: Request,
        timeout: Duration,
    ) -> Result<Response, FabricError>;
}

#[async_trait]
impl<T: FabricClient + ?Sized> FabricClient for Arc<T> {
    async fn sync_request(
        &self,
        request: Request,
        timeout: Duration,
    ) -> Result<Response, FabricError> {
        (**self).sync_request(request, timeout).await
    }
}
