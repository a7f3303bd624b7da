use crate::domain::prediction::{ModelOutputs, PredictionSet};

/// Rounds to `decimals` places using the exact binary value.
///
/// `1.115` is stored as `1.11499...` and rounds to `1.11`. Scaling by a
/// power of ten first would round the inexact product instead.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let places = decimals.max(0) as usize;
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// Turns a predicted log-return back into an absolute close, rounded to cents.
pub fn reconstruct_price(current_close: f64, log_return: f64) -> f64 {
    round_to(current_close * log_return.exp(), 2)
}

/// Applies [`reconstruct_price`] to every model output.
///
/// `current_close` must be the unmodified close of the latest bar.
pub fn reconstruct_prices(current_close: f64, outputs: &ModelOutputs) -> PredictionSet {
    PredictionSet {
        linear_regression: reconstruct_price(current_close, outputs.linear_regression),
        random_forest: reconstruct_price(current_close, outputs.random_forest),
        xgboost: reconstruct_price(current_close, outputs.xgboost),
    }
}
