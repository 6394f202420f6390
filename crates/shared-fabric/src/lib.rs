//! # Shared Fabric - Request/Response Contract over the Messaging Fabric
//!
//! Defines the message model and the collaborator trait that fabric clients
//! expose to higher-level service wrappers.
//!
//! ## Request Flow
//!
//! ```text
//! ┌──────────────┐   sync_request()   ┌──────────────┐   on_request()   ┌──────────────┐
//! │   Caller     │ ─────────────────→ │    Fabric    │ ───────────────→ │   Service    │
//! │              │ ←───────────────── │  (pending)   │ ←─────────────── │  (callback)  │
//! └──────────────┘  Response / Error  └──────────────┘     Response     └──────────────┘
//! ```
//!
//! Responses are correlated to requests by `MessageId`. A service that fails
//! answers with an error-typed response carrying a code and message; transport
//! failures (not connected, timeout) surface as [`FabricError`].

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod client;
pub mod errors;
pub mod memory;
pub mod message;
pub mod pending;

pub use client::FabricClient;
pub use errors::{codes, FabricError};
pub use memory::{InMemoryFabric, RequestCallback};
pub use message::{ErrorEnvelope, MessageId, MessageType, Request, Response};
pub use pending::{PendingRequestStore, PendingStats};
