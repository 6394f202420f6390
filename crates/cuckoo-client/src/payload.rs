//! # Command Payload
//!
//! JSON object sent as the body of every Cuckoo service request.

use crate::errors::CuckooError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Key holding the remote command name.
pub const COMMAND_KEY: &str = "command";

/// String-keyed JSON mapping sent to the Cuckoo service.
///
/// Keys are kept sorted so the encoded form is stable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandPayload(BTreeMap<String, Value>);

impl CommandPayload {
    /// Payload invoking `command_name`: `{"command": <name>}`.
    pub fn command(command_name: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(COMMAND_KEY.to_string(), Value::String(command_name.into()));
        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compact UTF-8 JSON encoding used on the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Pretty-printed form (4-space indent, sorted keys) for debug traces.
    pub fn to_pretty_string(&self) -> Result<String, CuckooError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8(out)?)
    }
}
