use crate::domain::errors::MarketDataError;
use crate::domain::market::history::{HistoryPeriod, HistoryResponse, PriceHistory};
use crate::domain::ports::MarketDataService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Pass-through of daily closes for charting.
pub struct HistoryService {
    market_data: Arc<dyn MarketDataService>,
    fetch_timeout: Duration,
}

impl HistoryService {
    pub fn new(market_data: Arc<dyn MarketDataService>, fetch_timeout: Duration) -> Self {
        Self {
            market_data,
            fetch_timeout,
        }
    }

    /// `period` defaults to one month when absent.
    pub async fn get_history(&self, ticker: &str, period: Option<&str>) -> HistoryResponse {
        let period = match period.map(str::parse::<HistoryPeriod>).transpose() {
            Ok(p) => p.unwrap_or_default(),
            Err(message) => return HistoryResponse::error(message),
        };
        let ticker = ticker.trim().to_uppercase();
        debug!("HistoryService: fetching {} for {}", period, ticker);

        let result = tokio::time::timeout(
            self.fetch_timeout,
            self.market_data.get_price_history(&ticker, period),
        )
        .await;

        match result {
            Ok(Ok(closes)) if closes.is_empty() => {
                HistoryResponse::error("No historical data found")
            }
            Ok(Err(MarketDataError::NotFound { .. })) => {
                HistoryResponse::error("No historical data found")
            }
            Ok(Ok(closes)) => HistoryResponse::Success(PriceHistory::from_closes(&ticker, &closes)),
            Ok(Err(e)) => {
                warn!("HistoryService: {} history failed: {}", ticker, e);
                HistoryResponse::error(e.to_string())
            }
            Err(_) => {
                warn!("HistoryService: {} history timed out", ticker);
                let err = MarketDataError::Timeout {
                    duration_ms: self.fetch_timeout.as_millis() as u64,
                };
                HistoryResponse::error(err.to_string())
            }
        }
    }
}
