//! Room price service binary.

use room_prices::{Config, create_app, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    let app = create_app();

    let listener = tokio::net::TcpListener::bind(&config.listen_url).await?;
    tracing::info!(addr = %config.listen_url, "Room price service listening");

    axum::serve(listener, app).await?;

    Ok(())
}
