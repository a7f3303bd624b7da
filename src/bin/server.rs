//! Stockcast Server - HTTP prediction API
//!
//! Serves `/predict/{ticker}`, `/history/{ticker}`, `/health` and
//! `/metrics` until Ctrl+C.
//!
//! # Usage
//! ```sh
//! MODEL_DIR=./models PORT=8000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODE` - Market data source: yahoo, csv or mock (default: yahoo)
//! - `MODEL_DIR` - Directory holding the model artifacts (default: ./models)
//! - `HOST` / `PORT` - Listen address (default: 0.0.0.0:8000)
//! - `OBSERVABILITY_ENABLED` - Expose Prometheus metrics (default: true)
//! - `LOG_FORMAT` - pretty or json (default: pretty)

use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use stockcast::application::bootstrap::ServicesBootstrap;
use stockcast::config::Config;
use stockcast::infrastructure::observability::{Metrics, init_tracing};
use stockcast::interfaces::{AppState, router};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.observability.log_format);

    info!("Stockcast Server {} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: Mode={:?}, ModelDir={}, Timeout={:?}",
        config.market_data.mode,
        config.model.model_dir.display(),
        config.market_data.fetch_timeout
    );

    let metrics = if config.observability.enabled {
        let metrics = Metrics::new()?;
        let uptime = metrics.uptime_seconds.clone();
        let started = Instant::now();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(5));
            loop {
                ticker.tick().await;
                uptime.set(started.elapsed().as_secs_f64());
            }
        });
        info!("Metrics enabled on /metrics");
        Some(metrics)
    } else {
        info!("Metrics disabled.");
        None
    };

    let services = ServicesBootstrap::init(&config, metrics.clone())?;
    info!(
        "Models loaded. Market data source: {}",
        services.market_data.name()
    );

    let app = router(AppState {
        prediction: services.prediction,
        history: services.history,
        metrics,
    });

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}. Press Ctrl+C to shutdown.", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await?;

    Ok(())
}
