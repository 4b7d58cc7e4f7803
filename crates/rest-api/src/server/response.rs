//! Uniform response envelope returned by every handler.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::error::RestError;

/// Response envelope: `{ok, data?, err?, msg?, ts}`.
///
/// `ts` (unix seconds) is stamped when the body is rendered, not when the
/// envelope is constructed.
#[derive(Debug, Clone, Serialize)]
pub struct RespBody {
    #[serde(skip)]
    status: StatusCode,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "msg")]
    message: Option<String>,
    ts: i64,
}

impl RespBody {
    /// Success envelope carrying `data`, rendered with status `200 OK`.
    pub fn success(data: impl Serialize) -> Self {
        Self {
            status: StatusCode::OK,
            ok: true,
            data: serde_json::to_value(data).ok(),
            err: None,
            message: None,
            ts: 0,
        }
    }

    /// Error envelope carrying the REST error's code and message.
    pub fn error(err: RestError) -> Self {
        Self {
            status: err.status,
            ok: false,
            data: None,
            err: Some(err.code.to_owned()),
            message: Some(err.message),
            ts: 0,
        }
    }
}

impl IntoResponse for RespBody {
    fn into_response(mut self) -> Response {
        self.ts = unix_now();
        (self.status, Json(self)).into_response()
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_skips_error_fields() {
        let body = RespBody::success("It works!");
        let rendered = serde_json::to_value(&body).unwrap();
        assert_eq!(rendered["ok"], json!(true));
        assert_eq!(rendered["data"], json!("It works!"));
        assert!(rendered.get("err").is_none());
        assert!(rendered.get("msg").is_none());
    }

    #[test]
    fn error_skips_data_field() {
        let body = RespBody::error(RestError::bad_request("nope"));
        let rendered = serde_json::to_value(&body).unwrap();
        assert_eq!(rendered["ok"], json!(false));
        assert_eq!(rendered["err"], json!("ERR_BAD_REQUEST"));
        assert_eq!(rendered["msg"], json!("nope"));
        assert!(rendered.get("data").is_none());
    }

    #[tokio::test]
    async fn into_response_uses_error_status_and_stamps_ts() {
        let response = RespBody::error(RestError::not_found("missing")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let rendered: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(rendered["ts"].as_i64().unwrap() > 0);
    }
}
