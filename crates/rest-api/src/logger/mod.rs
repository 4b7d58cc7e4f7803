//! Structured logging capability attached to every request.
//!
//! A [`Logger`] is a cheap cloneable handle carrying a base field-set (seeded
//! with `service_name`) and an emission [`Sink`]. Deriving a new handle with
//! [`Logger::with_fields`] never mutates shared state, so one process-wide
//! logger can safely back every in-flight request.
//!
//! The middleware stores the handle in the request extensions (a typed slot,
//! keyed by `TypeId`); any downstream layer retrieves it with
//! [`Logger::from_extensions`], which returns `None` rather than failing when
//! no logger was attached.

pub mod sink;

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::Extensions;
use serde_json::{Map, Value};

pub use sink::{MemorySink, Sink, TracingSink};

/// Severity of a single log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// One key/value pair attached to a log record.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A fully assembled log record handed to a [`Sink`].
///
/// `fields` is a mapping: keys are unique within one record, later writers
/// win. Sub-mappings (e.g. `http_request` vs `http_response`) are distinct
/// namespaces and may repeat keys between them.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub fields: Map<String, Value>,
}

/// Leveled structured logger with attachable fields.
#[derive(Clone)]
pub struct Logger {
    fields: Map<String, Value>,
    error: Option<String>,
    sink: Arc<dyn Sink>,
}

impl Logger {
    /// Create a logger seeded with a `service_name` base field.
    pub fn new(service_name: &str, sink: Arc<dyn Sink>) -> Self {
        let mut fields = Map::new();
        fields.insert("service_name".into(), Value::String(service_name.into()));
        Self {
            fields,
            error: None,
            sink,
        }
    }

    /// Derive a new logger with `fields` merged into the base field-set.
    pub fn with_fields(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut derived = self.clone();
        for f in fields {
            derived.fields.insert(f.key, f.value);
        }
        derived
    }

    /// Derive a new logger with an attached error, emitted under the `error` key.
    pub fn with_error(&self, err: impl fmt::Display) -> Self {
        let mut derived = self.clone();
        derived.error = Some(err.to_string());
        derived
    }

    pub fn debug(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.emit(Level::Debug, msg, fields);
    }

    pub fn info(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.emit(Level::Info, msg, fields);
    }

    pub fn warn(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.emit(Level::Warn, msg, fields);
    }

    pub fn error(&self, msg: &str, fields: impl IntoIterator<Item = Field>) {
        self.emit(Level::Error, msg, fields);
    }

    /// Retrieve the logger attached to a request's extensions, if any.
    pub fn from_extensions(extensions: &Extensions) -> Option<Logger> {
        extensions.get::<Logger>().cloned()
    }

    fn emit(&self, level: Level, msg: &str, fields: impl IntoIterator<Item = Field>) {
        let mut merged = self.fields.clone();
        if let Some(err) = &self.error {
            merged.insert("error".into(), Value::String(err.clone()));
        }
        for f in fields {
            merged.insert(f.key, f.value);
        }
        self.sink.emit(Record {
            level,
            message: msg.into(),
            fields: merged,
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("fields", &self.fields)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Axum extractor for the request-scoped [`Logger`].
///
/// Extraction never rejects: when no logger was attached (e.g. a router built
/// without the context middleware in a test) the inner value is `None`.
#[derive(Debug, Clone)]
pub struct RequestLogger(pub Option<Logger>);

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestLogger {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestLogger(Logger::from_extensions(&parts.extensions)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn capture() -> (Logger, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::default());
        (Logger::new("test-svc", sink.clone()), sink)
    }

    #[test]
    fn emit_includes_service_name() {
        let (logger, sink) = capture();
        logger.info("hello", []);
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields["service_name"], json!("test-svc"));
        assert_eq!(records[0].message, "hello");
        assert_eq!(records[0].level, Level::Info);
    }

    #[test]
    fn with_fields_derives_without_mutating_parent() {
        let (logger, sink) = capture();
        let derived = logger.with_fields([Field::new("request", "a")]);
        derived.info("derived", []);
        logger.info("parent", []);

        let records = sink.records();
        assert_eq!(records[0].fields["request"], json!("a"));
        assert!(!records[1].fields.contains_key("request"));
    }

    #[test]
    fn with_error_adds_error_field() {
        let (logger, sink) = capture();
        logger.with_error("boom").error("failed", []);
        assert_eq!(sink.records()[0].fields["error"], json!("boom"));
    }

    #[test]
    fn call_site_fields_win_over_base_fields() {
        let (logger, sink) = capture();
        let derived = logger.with_fields([Field::new("k", "base")]);
        derived.info("msg", [Field::new("k", "call")]);
        assert_eq!(sink.records()[0].fields["k"], json!("call"));
    }

    #[test]
    fn from_extensions_absent_is_none() {
        let extensions = Extensions::new();
        assert!(Logger::from_extensions(&extensions).is_none());
    }

    #[test]
    fn from_extensions_present_is_some() {
        let (logger, _sink) = capture();
        let mut extensions = Extensions::new();
        extensions.insert(logger);
        assert!(Logger::from_extensions(&extensions).is_some());
    }
}
