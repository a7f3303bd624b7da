use thiserror::Error;

/// Errors related to market data retrieval
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("No market data found for {symbol}")]
    NotFound { symbol: String },

    #[error("Service timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

/// Errors raised while loading or running the regression models
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to load {artifact} from {path}: {reason}")]
    LoadFailed {
        artifact: String,
        path: String,
        reason: String,
    },

    /// Artifact shape does not match the feature registry. Never recovered per request.
    #[error("Contract violation in {artifact}: {reason}")]
    ContractViolation { artifact: String, reason: String },

    #[error("{model} inference failed: {reason}")]
    InferenceFailed { model: String, reason: String },
}

/// Errors surfaced by the prediction pipeline to its caller
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(
        "No real-time data available for {ticker}. Try adding .NS for Indian stocks (e.g. RELIANCE.NS)"
    )]
    DataUnavailable { ticker: String },

    #[error("Prediction failed for {ticker}: {source}")]
    InferenceFailed {
        ticker: String,
        #[source]
        source: ModelError,
    },
}

impl PredictionError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::DataUnavailable { .. } => "data_unavailable",
            PredictionError::InferenceFailed { .. } => "inference_failed",
        }
    }
}
