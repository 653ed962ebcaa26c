//! External sink abstraction
//!
//! The synchronization core pushes three kinds of calls to the external
//! system: named event messages, keyed object upserts and object removals.
//! The transport behind them is owned by the sink implementation.

pub mod interface;
pub mod error;
pub mod mock;
pub mod json;

pub use interface::SyncSink;
pub use error::{SinkError, SinkResult};
pub use mock::RecordingSink;
pub use json::JsonLinesSink;

use serde::{Deserialize, Serialize};

/// One key/value attribute of a payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadEntry {
    pub key: String,
    pub value: f64,
}

/// Ordered list of attributes; order is preserved on the wire
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload {
    entries: Vec<PayloadEntry>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: f64) {
        self.entries.push(PayloadEntry {
            key: key.into(),
            value,
        });
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.push(key, value);
        self
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PayloadEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single call made against a sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SinkCall {
    SendMessage {
        event_name: String,
        payload: Payload,
    },
    UpdateObject {
        identity: String,
        type_tag: String,
        payload: Payload,
    },
    RemoveObject {
        identity: String,
    },
}

impl SinkCall {
    /// Identity of the object this call refers to, if any
    pub fn identity(&self) -> Option<&str> {
        match self {
            SinkCall::SendMessage { .. } => None,
            SinkCall::UpdateObject { identity, .. } | SinkCall::RemoveObject { identity } => {
                Some(identity.as_str())
            }
        }
    }
}
