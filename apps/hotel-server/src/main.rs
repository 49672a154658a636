//! Hotel reservation server binary.

use std::{net::SocketAddr, sync::Arc};

use hotel_server::{
    config::Config,
    create_app, create_state, init_tracing,
    services::{price_client::RpcPriceClient, user::bootstrap_admin},
    state::SharedState,
};
use hotel_store::{MemoryStore, SqliteStore, Store};

async fn serve<S: Store>(state: SharedState<S>, addr: SocketAddr) -> anyhow::Result<()> {
    if let Some((email, password)) = state.config.admin_credentials() {
        bootstrap_admin(&state, email, password).await?;
    }

    let app = create_app(state);

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        database = %config.database_url,
        room_prices = %config.room_prices_url,
        "Starting hotel server"
    );

    let prices = Arc::new(RpcPriceClient::new(
        &config.room_prices_url,
        config.room_prices_timeout(),
    )?);

    let addr: SocketAddr = config.server_addr().parse()?;

    if config.uses_memory_store() {
        let state = create_state(config, MemoryStore::new(), prices);
        serve(state, addr).await
    } else {
        let store = SqliteStore::connect(&config.database_url).await?;
        let state = create_state(config, store, prices);
        serve(state, addr).await
    }
}
