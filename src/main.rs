mod config;
mod error;
mod handlers;
mod proxy;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::Config;
pub use error::{AppError, Result};

use proxy::SearchProxy;

pub struct AppState {
    pub proxy: SearchProxy,
}

/// Every request lands in the search handler, which does its own routing.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(handlers::search::proxy_search)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let config = Config::from_env()?;
    tracing::debug!("Loaded config: {:?}", config);

    let proxy = SearchProxy::new(&config)?;
    let state = Arc::new(AppState { proxy });

    let addr = config.bind_addr();
    tracing::info!(
        "Starting video search proxy on {} (upstream {})",
        addr,
        config.upstream_base_url
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
