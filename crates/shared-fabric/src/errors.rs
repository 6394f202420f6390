//! # Fabric Errors
//!
//! Transport-level failures raised by a fabric client. Service-side failures
//! are not errors at this layer; they arrive as error-typed responses.

use std::time::Duration;
use thiserror::Error;

/// Error codes used in error-typed responses produced by the fabric itself.
pub mod codes {
    /// No service is registered for the destination topic.
    pub const SERVICE_UNAVAILABLE: i32 = 0x8000_0001_u32 as i32;
    /// A service callback failed without producing its own error response.
    pub const SERVICE_FAILURE: i32 = 0x8000_0002_u32 as i32;
}

/// Errors from fabric request operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FabricError {
    /// The client is not connected to the fabric.
    #[error("Fabric client is not connected")]
    NotConnected,

    /// No response arrived within the allotted time.
    #[error("Timeout waiting for response to request on {topic} after {timeout:?}")]
    Timeout { topic: String, timeout: Duration },

    /// The response channel was dropped before a response arrived.
    #[error("Response channel closed")]
    ResponseChannelClosed,
}
