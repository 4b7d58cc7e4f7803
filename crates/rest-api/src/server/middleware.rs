//! Request-scoped structured observability middleware.
//!
//! Two layers wrap every route:
//!
//! - [`logger_context`] attaches the process [`Logger`] to the request
//!   extensions so any downstream layer (handler, service, storage) can log
//!   without the logger being threaded through every constructor.
//! - [`log_request`] captures a [`RequestSnapshot`] before the handler runs,
//!   invokes the handler under a panic guard, observes the response through a
//!   [`ResponseRecorder`], and emits exactly one consolidated log record per
//!   request: `info` below 400, `warn` for 4xx (plus response body), `error`
//!   for 5xx (plus response body), or `error` with a stack trace when the
//!   handler panicked. A panicking handler never takes the process down.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use futures_util::FutureExt;
use http_body_util::BodyExt;
use serde_json::{Map, Value};
use tower_http::request_id::RequestId;

use crate::logger::{Field, Logger};

/// Maximum number of request-body bytes included in a log record. The body
/// forwarded to the handler is never truncated.
pub const MAX_LOGGED_BODY_BYTES: usize = 1_024_000;

/// Header names whose values are masked before logging.
const MASKED_HEADERS: [&str; 4] = ["authorization", "cookie", "set-cookie", "x-api-key"];

/// Replacement token for masked header values.
const MASK: &str = "[***]";

/// Attach the process logger to the request extensions.
///
/// Downstream code retrieves it via [`Logger::from_extensions`] or the
/// [`crate::logger::RequestLogger`] extractor.
pub async fn logger_context(
    State(logger): State<Logger>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(logger);
    next.run(request).await
}

/// Log every request that passes through the router.
///
/// The request snapshot is taken before the handler runs, so the panic path
/// can still report what came in. Exactly one record is emitted per request,
/// always with message `http.req`.
pub async fn log_request(State(logger): State<Logger>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let (snapshot, request) = RequestSnapshot::capture(request).await;

    let outcome = AssertUnwindSafe(next.run(request)).catch_unwind().await;

    let response = match outcome {
        Ok(response) => response,
        Err(panic) => {
            logger
                .with_fields([
                    Field::new("stack_trace", Backtrace::force_capture().to_string()),
                    Field::new("err", panic_message(panic.as_ref())),
                    Field::new("http_request", Value::Object(snapshot.into_fields())),
                ])
                .error("http.req", []);
            // The faulting request is abandoned; the client gets a bare 500.
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let elapsed = start.elapsed();

    let (parts, body) = response.into_parts();
    let mut recorder = ResponseRecorder::new();
    recorder.set_status(parts.status);
    let forwarded = recorder.drain(body).await;

    let mut response_fields = Map::new();
    response_fields.insert(
        "header".into(),
        Value::Object(redacted_headers(&parts.headers)),
    );
    response_fields.insert("status".into(), Value::from(recorder.status().as_u16()));
    response_fields.insert("bytes".into(), Value::from(recorder.observed_len()));
    response_fields.insert(
        "time_elapsed".into(),
        Value::String(format!("{:.3}ms", elapsed.as_secs_f64() * 1000.0)),
    );

    let status = recorder.status().as_u16();
    if status >= 400 {
        if let Some(body) = recorder.observed() {
            response_fields.insert(
                "body".into(),
                Value::String(String::from_utf8_lossy(body).into_owned()),
            );
        }
    }

    let request_field = Field::new("http_request", Value::Object(snapshot.into_fields()));
    let response_field = Field::new("http_response", Value::Object(response_fields));

    if status < 400 {
        logger.info("http.req", [request_field, response_field]);
    } else if status >= 500 {
        logger.error("http.req", [request_field, response_field]);
    } else {
        logger.warn("http.req", [request_field, response_field]);
    }

    Response::from_parts(parts, Body::from(forwarded))
}

/// Render a panic payload as a loggable string.
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".into()
    }
}

/// Immutable snapshot of an inbound request, built once per request.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    scheme: &'static str,
    url: String,
    method: String,
    path: String,
    proto: String,
    request_id: Option<String>,
    header: Option<Map<String, Value>>,
    body: Option<String>,
}

impl RequestSnapshot {
    /// Build a snapshot of `request`, returning an equivalent request whose
    /// body carries the same bytes so inspection does not consume it.
    pub async fn capture(request: Request) -> (Self, Request) {
        let (parts, body) = request.into_parts();

        // A failed body read reaches the handler as an empty body either way;
        // the log records whatever could be read.
        let bytes = to_bytes(body, usize::MAX)
            .await
            .unwrap_or_else(|_| Bytes::new());

        let scheme = if parts.uri.scheme_str() == Some("https") {
            "https"
        } else {
            "http"
        };
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();
        let request_target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| parts.uri.path().to_owned());

        let snapshot = RequestSnapshot {
            scheme,
            url: format!("{scheme}://{host}{request_target}"),
            method: parts.method.to_string(),
            path: parts.uri.path().to_owned(),
            proto: format!("{:?}", parts.version),
            request_id: parts
                .extensions
                .get::<RequestId>()
                .and_then(|id| id.header_value().to_str().ok())
                .filter(|id| !id.is_empty())
                .map(str::to_owned),
            header: (!parts.headers.is_empty()).then(|| redacted_headers(&parts.headers)),
            body: (!bytes.is_empty()).then(|| {
                let capped = &bytes[..bytes.len().min(MAX_LOGGED_BODY_BYTES)];
                String::from_utf8_lossy(capped).into_owned()
            }),
        };

        let request = Request::from_parts(parts, Body::from(bytes));
        (snapshot, request)
    }

    /// Convert the snapshot into the `http_request` field mapping.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("scheme".into(), Value::String(self.scheme.into()));
        fields.insert("url".into(), Value::String(self.url));
        fields.insert("method".into(), Value::String(self.method));
        fields.insert("path".into(), Value::String(self.path));
        fields.insert("proto".into(), Value::String(self.proto));
        if let Some(id) = self.request_id {
            fields.insert("request_id".into(), Value::String(id));
        }
        if let Some(header) = self.header {
            fields.insert("header".into(), Value::Object(header));
        }
        if let Some(body) = self.body {
            fields.insert("body".into(), Value::String(body));
        }
        fields
    }
}

/// Observes the status and body written by the inner handler while forwarding
/// every byte unchanged.
///
/// Known limitation: when a handler emits multiple body frames, only the most
/// recent frame is retained for logging. [`ResponseRecorder::drain`] still
/// forwards the complete stream.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    body: Option<Bytes>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the observed status. Multiple calls: last one wins.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// The observed status, defaulting to `200 OK` if never set.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Record one observed body write. Last write wins.
    pub fn record(&mut self, bytes: Bytes) {
        self.body = Some(bytes);
    }

    /// The most recently observed body write, if any write happened.
    pub fn observed(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Byte length of the most recently observed write.
    pub fn observed_len(&self) -> usize {
        self.body.as_ref().map_or(0, Bytes::len)
    }

    /// Pull every frame out of `body`, recording each data frame as one
    /// observed write, and return the full forwarded byte stream. Trailers
    /// are dropped; a frame error ends the drain with whatever was collected.
    pub async fn drain(&mut self, body: Body) -> Bytes {
        let mut body = body;
        let mut forwarded = BytesMut::new();
        while let Some(frame) = body.frame().await {
            let Ok(frame) = frame else { break };
            if let Ok(data) = frame.into_data() {
                forwarded.extend_from_slice(&data);
                self.record(data);
            }
        }
        forwarded.freeze()
    }
}

/// Turn a header collection into a loggable string-to-string mapping, masking
/// sensitive values.
///
/// Multi-valued headers are joined with `", "`. Keys are the lowercased forms
/// the `http` crate stores; matching against the masked set is therefore
/// case-insensitive by construction. Headers with zero values are omitted.
pub fn redacted_headers(headers: &HeaderMap) -> Map<String, Value> {
    let mut fields = Map::new();
    for name in headers.keys() {
        let values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        if values.is_empty() {
            continue;
        }
        let value = if MASKED_HEADERS.contains(&name.as_str()) {
            MASK.to_owned()
        } else {
            values.join(", ")
        };
        fields.insert(name.as_str().to_owned(), Value::String(value));
    }
    fields
}
