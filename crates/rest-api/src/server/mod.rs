//! Axum HTTP server: routing, handlers, middleware, and the response envelope.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;
