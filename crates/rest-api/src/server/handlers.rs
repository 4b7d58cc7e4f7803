//! Axum request handlers for all skeleton endpoints.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use super::error::RestError;
use super::response::RespBody;
use super::state::AppState;
use crate::logger::RequestLogger;

/// `GET /` — smoke-test endpoint.
pub async fn index() -> Response {
    RespBody::success("It works!").into_response()
}

/// `GET /entity/{entity}` — greet the named entity via the dummy service.
pub async fn hello_entity(
    State(state): State<AppState>,
    RequestLogger(logger): RequestLogger,
    Path(entity): Path<String>,
) -> Response {
    match state.hello_service.hello(logger, &entity).await {
        Ok(message) => RespBody::success(message).into_response(),
        Err(err) => RespBody::error(RestError::from(err)).into_response(),
    }
}

/// Catch-all 404 handler.
pub async fn not_found() -> Response {
    RespBody::error(RestError::not_found("the requested resource does not exist")).into_response()
}
