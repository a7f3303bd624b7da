use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::BarPair;
use crate::domain::market::history::{DailyClose, HistoryPeriod};
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Latest bar and the bar right before it.
    ///
    /// Returns `Ok(None)` when the source holds fewer than two valid bars.
    async fn get_latest_bars(&self, symbol: &str) -> Result<Option<BarPair>, MarketDataError>;

    /// Daily closes covering `period`, oldest first.
    async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DailyClose>, MarketDataError>;

    /// Identifier used in logs and metrics labels
    fn name(&self) -> &str;
}
