use crate::domain::market::bar::OhlcvBar;
use crate::domain::ml::FeatureVector;
use tracing::debug;

/// Volume fed to the scaler when the latest bar reports none.
pub const ZERO_VOLUME_SUBSTITUTE: f64 = 1.0;

/// One-bar log-return between consecutive closes.
pub fn live_log_return(latest: &OhlcvBar, previous: &OhlcvBar) -> f64 {
    (latest.close / previous.close).ln()
}

/// Builds the inference feature vector from the latest bar and its predecessor.
///
/// A zero volume is replaced by [`ZERO_VOLUME_SUBSTITUTE`] in the returned
/// vector only; the bars themselves are left untouched so the reported
/// real-time data keeps the original value.
pub fn derive_live_features(latest: &OhlcvBar, previous: &OhlcvBar) -> FeatureVector {
    let volume = if latest.volume == 0.0 {
        debug!("FeatureDeriver: zero volume, substituting {}", ZERO_VOLUME_SUBSTITUTE);
        ZERO_VOLUME_SUBSTITUTE
    } else {
        latest.volume
    };

    FeatureVector {
        volume,
        log_return: live_log_return(latest, previous),
        momentum: latest.close - latest.low,
        volatility: latest.high - latest.low,
        spread: latest.close - latest.open,
    }
}
