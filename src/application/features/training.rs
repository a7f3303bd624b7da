use crate::domain::market::bar::OhlcvBar;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Column order of the training matrix the stored models were fitted on.
pub const TRAINING_FEATURE_NAMES: &[&str] =
    &["Volume", "price_change", "momentum", "volatility", "spread"];

/// Window used for the rolling close volatility.
pub const VOLATILITY_WINDOW: usize = 5;

/// Lag (in bars) of the log-return target.
pub const TARGET_LAG: usize = 5;

/// One row of the training matrix plus its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingRow {
    pub timestamp: i64,
    pub volume: f64,
    /// (close - open) / open
    pub price_change: f64,
    /// Percent change of close against the previous bar
    pub momentum: f64,
    /// Sample standard deviation of the last `VOLATILITY_WINDOW` closes
    pub volatility: f64,
    /// high - low
    pub spread: f64,
    /// ln(close_t / close_{t-TARGET_LAG}), the regression target
    pub log_return: f64,
}

impl TrainingRow {
    /// Feature values in `TRAINING_FEATURE_NAMES` order.
    pub fn features(&self) -> [f64; 5] {
        [
            self.volume,
            self.price_change,
            self.momentum,
            self.volatility,
            self.spread,
        ]
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Training-time feature transform over a time-ordered bar series.
///
/// Values that are undefined for the first rows (no previous close, short
/// rolling window, missing lag) are filled with 0.
pub fn derive_training_features(bars: &[OhlcvBar]) -> Vec<TrainingRow> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let momentum = if i >= 1 {
                let prev = bars[i - 1].close;
                (bar.close - prev) / prev
            } else {
                f64::NAN
            };

            let volatility = if i + 1 >= VOLATILITY_WINDOW {
                bars[i + 1 - VOLATILITY_WINDOW..=i]
                    .iter()
                    .map(|b| b.close)
                    .std_dev()
            } else {
                f64::NAN
            };

            let log_return = if i >= TARGET_LAG {
                (bar.close / bars[i - TARGET_LAG].close).ln()
            } else {
                f64::NAN
            };

            TrainingRow {
                timestamp: bar.timestamp,
                volume: bar.volume,
                price_change: finite_or_zero((bar.close - bar.open) / bar.open),
                momentum: finite_or_zero(momentum),
                volatility: finite_or_zero(volatility),
                spread: bar.high - bar.low,
                log_return: finite_or_zero(log_return),
            }
        })
        .collect()
}
