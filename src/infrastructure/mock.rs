use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::{BarPair, OhlcvBar};
use crate::domain::market::history::{DailyClose, HistoryPeriod};
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// In-memory market data source for tests and `MODE=mock`.
///
/// Bars are kept per ticker in time order; history is derived from their
/// closes, one per day going backwards from the last bar.
#[derive(Clone, Default)]
pub struct MockMarketDataService {
    bars: Arc<RwLock<HashMap<String, Vec<OhlcvBar>>>>,
    fetches: Arc<AtomicUsize>,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl MockMarketDataService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preloaded with a few liquid tickers so the server is usable offline.
    pub fn with_sample_data() -> Self {
        let bars: HashMap<String, Vec<OhlcvBar>> =
            [("AAPL", 189.5), ("MSFT", 412.0), ("RELIANCE.NS", 2925.0)]
                .into_iter()
                .map(|(symbol, base)| (symbol.to_string(), sample_series(base, 30)))
                .collect();
        info!("MockMarketDataService: Loaded sample data for AAPL, MSFT, RELIANCE.NS");
        Self {
            bars: Arc::new(RwLock::new(bars)),
            ..Self::default()
        }
    }

    /// Builder form of [`set_bars`](Self::set_bars); call before cloning.
    pub fn with_bars(self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        if let Ok(mut map) = self.bars.try_write() {
            map.insert(symbol.to_uppercase(), bars);
        }
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call fails with a `RequestFailed` carrying `reason`.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    pub async fn set_bars(&self, symbol: &str, bars: Vec<OhlcvBar>) {
        self.bars.write().await.insert(symbol.to_uppercase(), bars);
    }

    /// Number of gateway calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn lookup(&self, symbol: &str) -> Result<Option<Vec<OhlcvBar>>, MarketDataError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.failure {
            return Err(MarketDataError::RequestFailed {
                provider: "mock".to_string(),
                reason: reason.clone(),
            });
        }

        Ok(self.bars.read().await.get(symbol).cloned())
    }
}

/// Gentle deterministic zig-zag around `base`, one bar per day.
fn sample_series(base: f64, len: usize) -> Vec<OhlcvBar> {
    const DAY: i64 = 86_400;
    const START: i64 = 1_704_153_600; // 2024-01-02

    (0..len)
        .map(|i| {
            let drift = (i as f64 * 0.7).sin() * base * 0.01;
            let close = base + drift;
            OhlcvBar {
                timestamp: START + i as i64 * DAY,
                open: close - base * 0.002,
                high: close + base * 0.004,
                low: close - base * 0.005,
                close,
                volume: 1_000_000.0 + (i as f64 * 10_000.0),
            }
        })
        .collect()
}

#[async_trait]
impl MarketDataService for MockMarketDataService {
    async fn get_latest_bars(&self, symbol: &str) -> Result<Option<BarPair>, MarketDataError> {
        Ok(self
            .lookup(symbol)
            .await?
            .and_then(|bars| BarPair::from_series(&bars)))
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DailyClose>, MarketDataError> {
        let Some(bars) = self.lookup(symbol).await? else {
            return Err(MarketDataError::NotFound {
                symbol: symbol.to_string(),
            });
        };

        let valid: Vec<&OhlcvBar> = bars.iter().filter(|b| b.is_valid()).collect();
        let keep = period.trading_days().unwrap_or(valid.len()).min(valid.len());
        let recent = &valid[valid.len() - keep..];

        Ok(recent
            .iter()
            .filter_map(|b| {
                let date = chrono::DateTime::from_timestamp(b.timestamp, 0)?.date_naive();
                Some(DailyClose {
                    date,
                    close: b.close,
                })
            })
            .collect())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
