//! Emission backends for the [`Logger`](super::Logger) capability.

use std::sync::Mutex;

use serde_json::Value;

use super::{Level, Record};

/// Destination for assembled log records.
///
/// Implementations must be safe for concurrent use: records from all in-flight
/// requests funnel through one shared sink.
pub trait Sink: Send + Sync {
    fn emit(&self, record: Record);
}

/// Production sink forwarding records to the `tracing` backend.
///
/// The merged field map is serialised as one JSON object under the `fields`
/// key; the JSON fmt layer installed by [`crate::telemetry::init`] renders the
/// rest of the event.
#[derive(Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&self, record: Record) {
        let fields = Value::Object(record.fields);
        match record.level {
            Level::Debug => tracing::debug!(fields = %fields, "{}", record.message),
            Level::Info => tracing::info!(fields = %fields, "{}", record.message),
            Level::Warn => tracing::warn!(fields = %fields, "{}", record.message),
            Level::Error => tracing::error!(fields = %fields, "{}", record.message),
        }
    }
}

/// Capturing sink retaining every record in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    /// Snapshot of all records emitted so far, in emission order.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().expect("sink lock poisoned").clone()
    }
}

impl Sink for MemorySink {
    fn emit(&self, record: Record) {
        self.records
            .lock()
            .expect("sink lock poisoned")
            .push(record);
    }
}
