//! # Fabric Messages
//!
//! Requests travel to a destination topic; the service owning that topic
//! answers with either a normal response or an error-typed response.
//! Request/response pairs are matched via `request_message_id`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a message on the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random message ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of message carried by the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Request addressed to a service topic.
    Request,
    /// Normal reply to a request.
    Response,
    /// Reply signaling that the service failed to handle the request.
    Error,
}

/// A request addressed to a service topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unique ID of this request.
    pub message_id: MessageId,
    /// Topic of the service that should handle the request.
    pub destination_topic: String,
    /// Raw request payload.
    pub payload: Vec<u8>,
}

impl Request {
    /// Create an empty request for a destination topic.
    pub fn new(destination_topic: impl Into<String>) -> Self {
        Self {
            message_id: MessageId::new(),
            destination_topic: destination_topic.into(),
            payload: Vec::new(),
        }
    }

    /// Builder-style payload setter.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Always [`MessageType::Request`].
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        MessageType::Request
    }
}

/// Code and message carried by an error-typed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: i32,
    pub message: String,
}

/// Reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Unique ID of this response.
    pub message_id: MessageId,
    /// ID of the request being answered.
    pub request_message_id: MessageId,
    /// `Response` or `Error`.
    pub message_type: MessageType,
    /// Raw response payload (empty for error responses).
    pub payload: Vec<u8>,
    /// Present only when `message_type` is `Error`.
    pub error: Option<ErrorEnvelope>,
}

impl Response {
    /// Normal response to `request`.
    pub fn ok(request: &Request, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            message_id: MessageId::new(),
            request_message_id: request.message_id,
            message_type: MessageType::Response,
            payload: payload.into(),
            error: None,
        }
    }

    /// Error-typed response to `request`.
    pub fn error(request: &Request, code: i32, message: impl Into<String>) -> Self {
        Self::error_to(request.message_id, code, message)
    }

    /// Error-typed response addressed by request ID alone.
    pub fn error_to(request_message_id: MessageId, code: i32, message: impl Into<String>) -> Self {
        Self {
            message_id: MessageId::new(),
            request_message_id,
            message_type: MessageType::Error,
            payload: Vec::new(),
            error: Some(ErrorEnvelope {
                code,
                message: message.into(),
            }),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.message_type == MessageType::Error
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Error code, if this is an error response.
    #[must_use]
    pub fn error_code(&self) -> Option<i32> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Error message, if this is an error response.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}
