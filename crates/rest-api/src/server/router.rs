//! Axum router construction.

use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

use super::{handlers, middleware, state::AppState};
use crate::logger::Logger;

/// Build the application [`Router`] with all routes and middleware attached.
///
/// Layer order (outermost first): request-id assignment, logger-context
/// injection, request logging, timeout. The timeout sits innermost so a
/// timed-out request is still logged with its 408 response.
pub fn build(state: AppState, logger: Logger, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/entity/:entity", get(handlers::hello_entity))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(from_fn_with_state(
                    logger.clone(),
                    middleware::logger_context,
                ))
                .layer(from_fn_with_state(logger, middleware::log_request))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
