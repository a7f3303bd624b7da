use serde::{Deserialize, Serialize};

/// One OHLCV observation for a fixed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Unix seconds, used for ordering only
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// A bar is usable when every price is finite, the close is strictly
    /// positive (log-returns need it) and `high >= low`.
    pub fn is_valid(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite())
            && self.close > 0.0
            && self.high >= self.low
            && self.volume.is_finite()
            && self.volume >= 0.0
    }
}

/// The latest bar and the one immediately preceding it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPair {
    pub latest: OhlcvBar,
    pub previous: OhlcvBar,
}

impl BarPair {
    /// Picks the two most recent valid bars of a time-ordered series.
    ///
    /// Fewer than two valid bars means no pair, never a zero-filled one.
    pub fn from_series(bars: &[OhlcvBar]) -> Option<Self> {
        let mut valid = bars.iter().rev().filter(|b| b.is_valid());
        let latest = *valid.next()?;
        let previous = *valid.next()?;
        Some(Self { latest, previous })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(timestamp: i64, close: f64) -> OhlcvBar {
        OhlcvBar {
            timestamp,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn test_pair_uses_last_two_bars() {
        let bars = vec![bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)];
        let pair = BarPair::from_series(&bars).unwrap();
        assert_eq!(pair.latest.timestamp, 3);
        assert_eq!(pair.previous.timestamp, 2);
    }

    #[test]
    fn test_pair_skips_invalid_bars() {
        let mut broken = bar(3, 12.0);
        broken.close = f64::NAN;
        let bars = vec![bar(1, 10.0), bar(2, 11.0), broken];

        let pair = BarPair::from_series(&bars).unwrap();
        assert_eq!(pair.latest.timestamp, 2);
        assert_eq!(pair.previous.timestamp, 1);
    }

    #[test]
    fn test_single_bar_is_unavailable() {
        assert!(BarPair::from_series(&[bar(1, 10.0)]).is_none());
        assert!(BarPair::from_series(&[]).is_none());
    }

    #[test]
    fn test_zero_close_is_invalid() {
        let bars = vec![bar(1, 10.0), bar(2, 0.0)];
        assert!(BarPair::from_series(&bars).is_none());
    }

    #[test]
    fn test_zero_volume_is_still_valid() {
        let mut quiet = bar(2, 11.0);
        quiet.volume = 0.0;
        assert!(quiet.is_valid());
    }
}
