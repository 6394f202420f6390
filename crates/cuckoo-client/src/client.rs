//! # Cuckoo Client
//!
//! High-level wrapper for invoking Cuckoo remote commands via the fabric.
//!
//! Callers invoke commands by name without dealing with the Cuckoo service
//! topic or its message format. Each call is a single request/response
//! exchange:
//!
//! ```text
//! run_command("tasks/list")
//!     │  {"command": "tasks/list"}
//!     ▼
//! FabricClient::sync_request("/mcafee/service/cuckoo/remote", timeout)
//!     │
//!     ├── Response ───────→ Ok(payload as UTF-8 text)
//!     ├── Error response ─→ Err(CuckooError::RemoteService)
//!     └── FabricError ────→ Err(CuckooError::Transport)
//! ```

use crate::config::ClientConfig;
use crate::errors::CuckooError;
use crate::payload::CommandPayload;
use shared_fabric::{FabricClient, Request};
use std::time::Duration;
use tracing::{debug, debug_span, Instrument, Level, Span};

/// Topic of the Cuckoo service registered with the fabric.
pub const DXL_SERVICE_TYPE: &str = "/mcafee/service/cuckoo/remote";

/// Client for the Cuckoo remote command service.
///
/// The fabric handle is supplied by the caller, who keeps responsibility for
/// connecting and disconnecting it. Pass `Arc<F>` to share one connection
/// between several clients.
pub struct CuckooClient<F> {
    fabric: F,
    response_timeout: Duration,
    min_response_timeout: Duration,
    /// Parent span for every trace emitted by this client.
    span: Span,
}

impl<F: FabricClient> CuckooClient<F> {
    /// Create a client with the default configuration.
    pub fn new(fabric: F) -> Self {
        let config = ClientConfig::default();
        Self::build(fabric, &config)
    }

    /// Create a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `CuckooError::InvalidArgument` if the configuration does not
    /// validate (for example a default timeout below the minimum).
    pub fn with_config(fabric: F, config: &ClientConfig) -> Result<Self, CuckooError> {
        config.validate()?;
        Ok(Self::build(fabric, config))
    }

    fn build(fabric: F, config: &ClientConfig) -> Self {
        Self {
            fabric,
            response_timeout: config.response_timeout(),
            min_response_timeout: config.min_response_timeout(),
            span: debug_span!("cuckoo_client", service = DXL_SERVICE_TYPE),
        }
    }

    /// The maximum time to wait for a response from the Cuckoo service.
    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    /// The smallest value accepted by [`set_response_timeout`](Self::set_response_timeout).
    pub fn min_response_timeout(&self) -> Duration {
        self.min_response_timeout
    }

    /// Change the response timeout.
    ///
    /// # Errors
    ///
    /// Returns `CuckooError::InvalidArgument` if `timeout` is below the
    /// minimum; the current timeout is left unchanged.
    pub fn set_response_timeout(&mut self, timeout: Duration) -> Result<(), CuckooError> {
        if timeout < self.min_response_timeout {
            return Err(CuckooError::InvalidArgument(format!(
                "Response timeout must be greater than or equal to {}",
                self.min_response_timeout.as_secs()
            )));
        }
        self.response_timeout = timeout;
        Ok(())
    }

    /// The fabric handle this client sends requests through.
    pub fn fabric(&self) -> &F {
        &self.fabric
    }

    /// Invoke a Cuckoo remote command.
    ///
    /// # Arguments
    ///
    /// * `command_name` - Name of the remote command, e.g. `"tasks/list"`
    ///
    /// # Returns
    ///
    /// The response payload as text, untouched. By convention it is JSON
    /// shaped by the command itself.
    ///
    /// # Errors
    ///
    /// - `CuckooError::RemoteService` if the service answered with an error
    /// - `CuckooError::Transport` for any fabric failure (timeout, disconnect)
    /// - `CuckooError::InvalidUtf8` if the response payload is not UTF-8
    pub async fn run_command(&self, command_name: &str) -> Result<String, CuckooError> {
        let span = debug_span!(parent: &self.span, "run_command", command = command_name);
        self.invoke(CommandPayload::command(command_name))
            .instrument(span)
            .await
    }

    async fn invoke(&self, payload: CommandPayload) -> Result<String, CuckooError> {
        let request = Request::new(DXL_SERVICE_TYPE).with_payload(payload.to_bytes()?);

        if tracing::enabled!(Level::DEBUG) {
            debug!("Request:\n{}", payload.to_pretty_string()?);
        }

        let response = self
            .fabric
            .sync_request(request, self.response_timeout)
            .await?;

        if response.is_error() {
            let (code, message) = response
                .error
                .map(|e| (e.code, e.message))
                .unwrap_or_default();
            return Err(CuckooError::RemoteService { code, message });
        }

        let text = String::from_utf8(response.payload)?;
        debug!("Response:\n{text}");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_RESPONSE_TIMEOUT_SECS;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use shared_fabric::{FabricError, Response};
    use std::sync::Arc;

    enum Reply {
        Payload(Vec<u8>),
        Error(i32, &'static str),
        Fail(FabricError),
    }

    /// Records every request and answers with a fixed reply.
    struct StubFabric {
        reply: Reply,
        seen: Mutex<Vec<(Request, Duration)>>,
    }

    impl StubFabric {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl FabricClient for StubFabric {
        async fn sync_request(
            &self,
            request: Request,
            timeout: Duration,
        ) -> Result<Response, FabricError> {
            self.seen.lock().push((request.clone(), timeout));
            match &self.reply {
                Reply::Payload(bytes) => Ok(Response::ok(&request, bytes.clone())),
                Reply::Error(code, message) => Ok(Response::error(&request, *code, *message)),
                Reply::Fail(err) => Err(err.clone()),
            }
        }
    }

    #[tokio::test]
    async fn test_run_command_returns_payload_unchanged() {
        let client = CuckooClient::new(StubFabric::new(Reply::Payload(br#"{"ok": true}"#.to_vec())));

        let result = client.run_command("tasks/list").await.unwrap();
        assert_eq!(result, r#"{"ok": true}"#);
    }

    #[tokio::test]
    async fn test_run_command_sends_exact_payload() {
        let client = CuckooClient::new(StubFabric::new(Reply::Payload(b"[]".to_vec())));

        client.run_command("tasks/list").await.unwrap();

        let seen = client.fabric().seen.lock();
        assert_eq!(seen.len(), 1);
        let (request, timeout) = &seen[0];
        assert_eq!(request.destination_topic, DXL_SERVICE_TYPE);
        assert_eq!(request.payload, br#"{"command":"tasks/list"}"#.to_vec());
        assert_eq!(*timeout, Duration::from_secs(30));

        let decoded: serde_json::Value = serde_json::from_slice(&request.payload).unwrap();
        assert_eq!(decoded, serde_json::json!({"command": "tasks/list"}));
    }

    /// Decoded body of the only request the stub has seen.
    fn sent_body(fabric: &StubFabric) -> serde_json::Value {
        let seen = fabric.seen.lock();
        assert_eq!(seen.len(), 1);
        serde_json::from_slice(&seen[0].0.payload).unwrap()
    }

    #[tokio::test]
    async fn test_run_command_escapes_awkward_names() {
        let names = ["", "a\"b", "back\\slash", "\u{0}\n\t\u{1f}", "😀/tasks", "{\"command\": 1}"];

        for name in names {
            let client = CuckooClient::new(StubFabric::new(Reply::Payload(Vec::new())));
            client.run_command(name).await.unwrap();
            assert_eq!(sent_body(client.fabric()), serde_json::json!({ "command": name }));
        }
    }

    proptest! {
        #[test]
        fn test_run_command_payload_decodes_to_command(name in any::<String>()) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let client = CuckooClient::new(StubFabric::new(Reply::Payload(Vec::new())));

            runtime.block_on(client.run_command(&name)).unwrap();
            prop_assert_eq!(sent_body(client.fabric()), serde_json::json!({ "command": name }));
        }
    }

    #[tokio::test]
    async fn test_run_command_error_response() {
        let client = CuckooClient::new(StubFabric::new(Reply::Error(5, "bad command")));

        let err = client.run_command("tasks/bogus").await.unwrap_err();
        assert!(matches!(err, CuckooError::RemoteService { code: 5, .. }));
        assert_eq!(err.to_string(), "Error: bad command (5)");
    }

    #[tokio::test]
    async fn test_run_command_propagates_transport_failure() {
        let failure = FabricError::Timeout {
            topic: DXL_SERVICE_TYPE.into(),
            timeout: Duration::from_secs(30),
        };
        let client = CuckooClient::new(StubFabric::new(Reply::Fail(failure.clone())));

        let err = client.run_command("tasks/list").await.unwrap_err();
        match err {
            CuckooError::Transport(inner) => assert_eq!(inner, failure),
            other => panic!("Expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_command_rejects_non_utf8_payload() {
        let client = CuckooClient::new(StubFabric::new(Reply::Payload(vec![0xff, 0xfe])));

        let err = client.run_command("tasks/list").await.unwrap_err();
        assert!(matches!(err, CuckooError::InvalidUtf8(_)));
    }

    #[tokio::test]
    async fn test_run_command_uses_updated_timeout() {
        let mut client = CuckooClient::new(StubFabric::new(Reply::Payload(Vec::new())));
        client.set_response_timeout(Duration::from_secs(600)).unwrap();

        assert_eq!(client.run_command("tasks/list").await.unwrap(), "");
        assert_eq!(client.fabric().seen.lock()[0].1, Duration::from_secs(600));
    }

    #[test]
    fn test_default_timeout() {
        let client = CuckooClient::new(StubFabric::new(Reply::Payload(Vec::new())));
        assert_eq!(client.response_timeout(), Duration::from_secs(30));
        assert_eq!(
            client.min_response_timeout(),
            Duration::from_secs(MIN_RESPONSE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_set_timeout_below_minimum_keeps_previous() {
        let mut client = CuckooClient::new(StubFabric::new(Reply::Payload(Vec::new())));

        let err = client.set_response_timeout(Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, CuckooError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Invalid argument: Response timeout must be greater than or equal to 5"
        );
        assert_eq!(client.response_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_set_timeout_at_minimum_accepted() {
        let mut client = CuckooClient::new(StubFabric::new(Reply::Payload(Vec::new())));

        client
            .set_response_timeout(Duration::from_secs(MIN_RESPONSE_TIMEOUT_SECS))
            .unwrap();
        assert_eq!(
            client.response_timeout(),
            Duration::from_secs(MIN_RESPONSE_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_with_config_rejects_default_below_minimum() {
        let config = ClientConfig {
            response_timeout_secs: 30,
            min_response_timeout_secs: 300,
        };
        let result = CuckooClient::with_config(StubFabric::new(Reply::Payload(Vec::new())), &config);
        assert!(matches!(result, Err(CuckooError::InvalidArgument(_))));
    }

    #[test]
    fn test_with_config_applies_values() {
        let config = ClientConfig {
            response_timeout_secs: 900,
            min_response_timeout_secs: 300,
        };
        let mut client =
            CuckooClient::with_config(StubFabric::new(Reply::Payload(Vec::new())), &config).unwrap();

        assert_eq!(client.response_timeout(), Duration::from_secs(900));
        assert!(client.set_response_timeout(Duration::from_secs(299)).is_err());
        assert!(client.set_response_timeout(Duration::from_secs(300)).is_ok());
    }

    #[tokio::test]
    async fn test_shared_fabric_handle() {
        let fabric = Arc::new(StubFabric::new(Reply::Payload(b"{}".to_vec())));
        let first = CuckooClient::new(Arc::clone(&fabric));
        let second = CuckooClient::new(Arc::clone(&fabric));

        first.run_command("tasks/list").await.unwrap();
        second.run_command("cuckoo/status").await.unwrap();

        assert_eq!(fabric.seen.lock().len(), 2);
    }
}
