//! Hotel reservation server
//!
//! Serves users, hotels, rooms and bookings over a JSON HTTP API. Booking
//! costs are quoted by the room price service, reached over JSON-RPC.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use auth::{JwtConfig, JwtManager};
use axum::Router;
use hotel_store::Store;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::services::price_client::PriceLookup;
use crate::state::{AppState, SharedState};

/// Creates the application router with all routes configured.
pub fn create_app<S: Store>(state: SharedState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::optional_auth_middleware::<S>,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration, store and
/// price source.
pub fn create_state<S: Store>(
    config: Config,
    store: S,
    prices: Arc<dyn PriceLookup>,
) -> SharedState<S> {
    let jwt_config = JwtConfig::new(config.jwt_secret.clone())
        .with_expiration_hours(config.jwt_expiration_hours);
    let jwt_manager = JwtManager::new(jwt_config);

    Arc::new(AppState::new(config, store, jwt_manager, prices))
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
