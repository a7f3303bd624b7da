use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::application::ml::ModelContext;
use crate::application::prediction::{HistoryService, PredictionService};
use crate::config::Config;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::factory::ServiceFactory;
use crate::infrastructure::observability::Metrics;

/// Everything the HTTP and CLI surfaces need, built once at startup.
#[derive(Clone)]
pub struct ServicesHandle {
    pub market_data: Arc<dyn MarketDataService>,
    pub models: Arc<ModelContext>,
    pub prediction: Arc<PredictionService>,
    pub history: Arc<HistoryService>,
}

pub struct ServicesBootstrap;

impl ServicesBootstrap {
    /// Loads the model artifacts and wires the pipeline.
    ///
    /// Any artifact problem aborts startup; the service never runs with a
    /// partial ensemble.
    pub fn init(config: &Config, metrics: Option<Metrics>) -> Result<ServicesHandle> {
        // 1. Model artifacts
        let artifacts = config.model.artifacts()?;
        let models = ModelContext::load(&artifacts).with_context(|| {
            format!(
                "Failed to load model artifacts from {}",
                artifacts.model_dir.display()
            )
        })?;
        info!("ServicesBootstrap: {:?}", models);

        // 2. Market data gateway
        let market_data = ServiceFactory::create_market_data_service(&config.market_data)
            .context("Failed to create market data client")?;

        Ok(Self::assemble(
            market_data,
            Arc::new(models),
            config.market_data.fetch_timeout,
            metrics,
        ))
    }

    /// Wires already-built parts; used directly by tests with mock models.
    pub fn assemble(
        market_data: Arc<dyn MarketDataService>,
        models: Arc<ModelContext>,
        fetch_timeout: Duration,
        metrics: Option<Metrics>,
    ) -> ServicesHandle {
        let mut prediction =
            PredictionService::new(market_data.clone(), models.clone(), fetch_timeout);
        if let Some(metrics) = metrics {
            prediction = prediction.with_metrics(metrics);
        }
        let history = HistoryService::new(market_data.clone(), fetch_timeout);

        ServicesHandle {
            market_data,
            models,
            prediction: Arc::new(prediction),
            history: Arc::new(history),
        }
    }
}
