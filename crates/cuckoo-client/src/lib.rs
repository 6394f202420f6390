//! # Cuckoo Client
//!
//! Invokes Cuckoo remote commands over the messaging fabric without the
//! caller having to know the Cuckoo service topic or its message format.
//!
//! ```ignore
//! let fabric = Arc::new(connected_fabric_client);
//! let client = CuckooClient::new(Arc::clone(&fabric));
//! let tasks = client.run_command("tasks/list").await?;
//! ```

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod client;
pub mod config;
pub mod errors;
pub mod payload;

pub use client::{CuckooClient, DXL_SERVICE_TYPE};
pub use config::{ClientConfig, DEFAULT_RESPONSE_TIMEOUT_SECS, MIN_RESPONSE_TIMEOUT_SECS};
pub use errors::{ConfigError, CuckooError};
pub use payload::CommandPayload;

/// Version of the Cuckoo client library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
