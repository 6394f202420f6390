//! # Cuckoo Task List Demo
//!
//! Invokes the `tasks/list` command through [`CuckooClient`] and prints the
//! JSON response.
//!
//! Runs against an in-process fabric with a stand-in Cuckoo service, so no
//! broker is needed. Pass a different command name as the first argument to
//! see how error responses surface.
//!
//! ## Environment
//!
//! - `CUCKOO_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
//! - `CUCKOO_RESPONSE_TIMEOUT_SECS`: Response timeout (default: 30)

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use cuckoo_client::{ClientConfig, CuckooClient, DXL_SERVICE_TYPE};
use serde_json::{json, Value};
use shared_fabric::{InMemoryFabric, Request, RequestCallback, Response};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CUCKOO_COMMAND: &str = "tasks/list";

/// Error code the stand-in service uses for unknown commands.
const UNKNOWN_COMMAND: i32 = 404;

/// Stand-in for the Cuckoo remote service.
struct StandInCuckooService;

#[async_trait]
impl RequestCallback for StandInCuckooService {
    async fn on_request(&self, request: Request) -> Response {
        let command = serde_json::from_slice::<Value>(&request.payload)
            .ok()
            .and_then(|v| v.get("command").and_then(Value::as_str).map(str::to_owned));

        match command.as_deref() {
            Some("tasks/list") => {
                let body = json!({
                    "tasks": [
                        {"id": 1, "category": "file", "target": "/tmp/sample.exe", "status": "reported"},
                        {"id": 2, "category": "url", "target": "http://example.com", "status": "pending"},
                    ]
                });
                Response::ok(&request, body.to_string())
            }
            Some(other) => {
                warn!(command = other, "Unknown command");
                Response::error(&request, UNKNOWN_COMMAND, format!("unknown command: {other}"))
            }
            None => Response::error(&request, UNKNOWN_COMMAND, "missing command"),
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = std::env::var("CUCKOO_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter).context("invalid log filter")?)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config = ClientConfig::from_env();
    let command = std::env::args()
        .nth(1)
        .unwrap_or_else(|| CUCKOO_COMMAND.to_string());

    // Connect to the fabric
    let fabric = Arc::new(InMemoryFabric::connected());
    fabric.register_service(DXL_SERVICE_TYPE, StandInCuckooService);

    // Create the Cuckoo client
    let client = CuckooClient::with_config(Arc::clone(&fabric), &config)
        .context("invalid client configuration")?;
    info!(
        version = cuckoo_client::version(),
        timeout_secs = client.response_timeout().as_secs(),
        "Cuckoo client ready"
    );

    let res = client
        .run_command(&command)
        .await
        .with_context(|| format!("command {command} failed"))?;

    let pretty = serde_json::from_str::<Value>(&res)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or(res);
    println!("{pretty}");

    fabric.disconnect();
    Ok(())
}
