//! `rest-api` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the tracing subscriber (structured JSON logs).
//! 3. Build the process [`Logger`] over the tracing sink.
//! 4. Wire the dummy storage and dummy service.
//! 5. Build the Axum router and serve until SIGINT/SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use rest_api::config::Config;
use rest_api::logger::{Logger, TracingSink};
use rest_api::server::{router, state::AppState};
use rest_api::service::DummyService;
use rest_api::storage::DummyStorage;
use rest_api::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        "rest-api starting"
    );

    // -----------------------------------------------------------------------
    // 3. Logger
    // -----------------------------------------------------------------------
    let logger = Logger::new(&cfg.service_name, Arc::new(TracingSink));

    // -----------------------------------------------------------------------
    // 4. Dummy storage + service
    // -----------------------------------------------------------------------
    let service = Arc::new(DummyService::new(Arc::new(DummyStorage)));

    // -----------------------------------------------------------------------
    // 5. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(service);
    let app = router::build(state, logger, Duration::from_secs(cfg.read_timeout_secs));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves once SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received, terminating");
}
