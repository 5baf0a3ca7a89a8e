//! # forecast-api
//!
//! HTTP server answering backtested price forecasts from CSV uploads
//! and remote price feeds.

use std::net::SocketAddr;

use forecast_api::{router, AppConfig, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forecast_api=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();

    // Log the token's presence only, never its value
    tracing::info!(eia_key_present = config.eia_token.is_some(), "configuration loaded");

    let state = AppState::new(&config);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST:PORT configuration");

    tracing::info!(
        "forecast-api v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
