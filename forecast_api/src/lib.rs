//! # Forecast API
//!
//! HTTP surface for the forecast service. Price series come from CSV
//! uploads or from the remote feeds in [`price_feed`]; every series is
//! backtested by [`forecast_core`] and answered as a dated forecast.

pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use price_feed::{EiaClient, YahooClient};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// EIA API token, when configured
    pub eia_token: Option<String>,
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// `EIA_API_KEY` is the documented variable, `EIA_TOKEN` a legacy
    /// fallback; blank values count as absent.
    pub fn from_env() -> Self {
        let eia_token = std::env::var("EIA_API_KEY")
            .or_else(|_| std::env::var("EIA_TOKEN"))
            .ok()
            .filter(|token| !token.trim().is_empty());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8000);

        Self {
            eia_token,
            host,
            port,
        }
    }
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Quotes client
    pub yahoo: YahooClient,
    /// Statistics client, present only when a token was configured
    pub eia: Option<EiaClient>,
}

impl AppState {
    /// Build clients from resolved configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            yahoo: YahooClient::new(),
            eia: config.eia_token.clone().map(EiaClient::new),
        }
    }
}

/// Build the application router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/price", get(routes::price))
        .route("/api/upload", post(routes::upload))
        .route("/api/online", get(routes::online))
        .route("/api/eia_status", get(routes::eia_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
