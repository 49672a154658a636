//! Room price service
//!
//! Answers `getRoomPrice` JSON-RPC calls with the nightly price of a room
//! type. The hotel server calls it whenever it prices a room or a booking.

pub mod config;
pub mod pricing;
pub mod rpc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Creates the service router.
pub fn create_app() -> Router {
    Router::new()
        .route(rpc_protocol::RPC_PATH, post(rpc::handle_rpc))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
