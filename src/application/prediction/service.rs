use super::reconstructor::reconstruct_prices;
use super::signal::determine_recommendation;
use crate::application::features::derive_live_features;
use crate::application::ml::ModelContext;
use crate::domain::errors::PredictionError;
use crate::domain::market::bar::BarPair;
use crate::domain::ml::ModelId;
use crate::domain::ports::MarketDataService;
use crate::domain::prediction::{PredictionReport, PredictionResponse, RealTimeData};
use crate::infrastructure::observability::Metrics;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

/// Stages of one prediction request, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Fetching,
    DataUnavailable,
    Featurizing,
    Scaling,
    Inferring,
    Reconstructing,
    Synthesizing,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Fetching => "FETCHING",
            PipelineState::DataUnavailable => "DATA_UNAVAILABLE",
            PipelineState::Featurizing => "FEATURIZING",
            PipelineState::Scaling => "SCALING",
            PipelineState::Inferring => "INFERRING",
            PipelineState::Reconstructing => "RECONSTRUCTING",
            PipelineState::Synthesizing => "SYNTHESIZING",
            PipelineState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Runs the fetch → features → scale → infer → reconstruct → signal pipeline.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct PredictionService {
    market_data: Arc<dyn MarketDataService>,
    models: Arc<ModelContext>,
    fetch_timeout: Duration,
    metrics: Option<Metrics>,
}

impl PredictionService {
    pub fn new(
        market_data: Arc<dyn MarketDataService>,
        models: Arc<ModelContext>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            market_data,
            models,
            fetch_timeout,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Single entry point for callers. Always returns one of the two response shapes.
    pub async fn predict(&self, ticker: &str) -> PredictionResponse {
        let ticker = ticker.trim().to_uppercase();
        let span = info_span!("predict", ticker = %ticker, request_id = %Uuid::new_v4());

        async {
            let outcome = self.run(&ticker).await;
            debug!("PredictionService: state {}", PipelineState::Done);

            match outcome {
                Ok(report) => {
                    let verdict = report.recommendation;
                    info!(
                        "PredictionService: {} -> {} ({:.1}%)",
                        ticker, verdict.signal, verdict.confidence
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_predictions(verdict.signal.as_str());
                    }
                    PredictionResponse::Success(report)
                }
                Err(e) => {
                    match &e {
                        PredictionError::DataUnavailable { .. } => {
                            warn!("PredictionService: {}", e)
                        }
                        PredictionError::InferenceFailed { .. } => {
                            error!("PredictionService: {}", e)
                        }
                    }
                    if let Some(metrics) = &self.metrics {
                        metrics.inc_prediction_errors(e.kind());
                    }
                    PredictionResponse::error(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, ticker: &str) -> Result<PredictionReport, PredictionError> {
        let bars = self.fetch_bars(ticker).await?;
        self.predict_from_bars(ticker, &bars)
    }

    async fn fetch_bars(&self, ticker: &str) -> Result<BarPair, PredictionError> {
        debug!("PredictionService: state {}", PipelineState::Fetching);
        let unavailable = || {
            debug!("PredictionService: state {}", PipelineState::DataUnavailable);
            PredictionError::DataUnavailable {
                ticker: ticker.to_string(),
            }
        };

        if ticker.is_empty() {
            return Err(unavailable());
        }

        let started = Instant::now();
        let result =
            tokio::time::timeout(self.fetch_timeout, self.market_data.get_latest_bars(ticker))
                .await;
        if let Some(metrics) = &self.metrics {
            metrics.observe_market_data_latency(
                self.market_data.name(),
                started.elapsed().as_secs_f64(),
            );
        }

        match result {
            Ok(Ok(Some(bars))) => Ok(bars),
            Ok(Ok(None)) => {
                warn!(
                    "PredictionService: {} returned fewer than two valid bars for {}",
                    self.market_data.name(),
                    ticker
                );
                Err(unavailable())
            }
            Ok(Err(e)) => {
                warn!("PredictionService: market data error for {}: {}", ticker, e);
                Err(unavailable())
            }
            Err(_) => {
                warn!(
                    "PredictionService: market data timed out after {}ms for {}",
                    self.fetch_timeout.as_millis(),
                    ticker
                );
                Err(unavailable())
            }
        }
    }

    /// Everything after the fetch. Synchronous and free of I/O.
    pub fn predict_from_bars(
        &self,
        ticker: &str,
        bars: &BarPair,
    ) -> Result<PredictionReport, PredictionError> {
        debug!("PredictionService: state {}", PipelineState::Featurizing);
        let features = derive_live_features(&bars.latest, &bars.previous);

        debug!("PredictionService: state {}", PipelineState::Scaling);
        let scaled = self.models.scale(&features);

        debug!("PredictionService: state {}", PipelineState::Inferring);
        let outputs =
            self.models
                .infer(&scaled)
                .map_err(|source| PredictionError::InferenceFailed {
                    ticker: ticker.to_string(),
                    source,
                })?;
        if let Some(metrics) = &self.metrics {
            for id in ModelId::ALL {
                metrics.set_model_output(id.as_str(), outputs.get(id));
            }
        }

        debug!("PredictionService: state {}", PipelineState::Reconstructing);
        let current_close = bars.latest.close;
        let predictions = reconstruct_prices(current_close, &outputs);

        debug!("PredictionService: state {}", PipelineState::Synthesizing);
        let recommendation = determine_recommendation(current_close, &predictions);

        Ok(PredictionReport {
            real_time_data: RealTimeData::from_bar(&bars.latest, features.log_return),
            predictions,
            recommendation,
        })
    }
}
