//! Ensemble vote → discrete trading signal.
//!
//! A BUY needs the average prediction more than 0.5% above the current price
//! and at least two of three models predicting a rise; STRONG BUY needs all
//! three and more than 2%. SELL mirrors this downwards. All comparisons are
//! strict, so exactly 0.5% or 2.0% never crosses a threshold.

use super::reconstructor::round_to;
use crate::domain::prediction::{PredictionSet, RecommendationVerdict, Signal};

const SIGNAL_THRESHOLD_PCT: f64 = 0.5;
const STRONG_THRESHOLD_PCT: f64 = 2.0;
const MIN_VOTES: usize = 2;
const UNANIMOUS_VOTES: usize = 3;

const HOLD_CONFIDENCE: f64 = 50.0;
const BASE_CONFIDENCE: f64 = 60.0;
const STRONG_BASE_CONFIDENCE: f64 = 90.0;
const MAX_CONFIDENCE: f64 = 99.0;

/// Confidence of a plain BUY/SELL given the agreeing votes and |diff|.
fn directional_confidence(votes: usize, magnitude_pct: f64) -> f64 {
    BASE_CONFIDENCE + (votes as f64 * 10.0).min(30.0) + (magnitude_pct * 10.0).min(10.0)
}

/// Confidence of a STRONG signal; replaces the directional value.
fn strong_confidence(magnitude_pct: f64) -> f64 {
    STRONG_BASE_CONFIDENCE + magnitude_pct.min(10.0)
}

/// Combines the three predicted prices and the current price into a verdict.
pub fn determine_recommendation(
    current_price: f64,
    predictions: &PredictionSet,
) -> RecommendationVerdict {
    let values = predictions.values();
    let avg_pred = values.iter().sum::<f64>() / values.len() as f64;
    let diff_percent = ((avg_pred - current_price) / current_price) * 100.0;

    let votes_up = values.iter().filter(|&&p| p > current_price).count();
    let votes_down = values.iter().filter(|&&p| p < current_price).count();

    let mut signal = Signal::Hold;
    let mut confidence = HOLD_CONFIDENCE;

    if diff_percent > SIGNAL_THRESHOLD_PCT && votes_up >= MIN_VOTES {
        signal = Signal::Buy;
        confidence = directional_confidence(votes_up, diff_percent);

        if diff_percent > STRONG_THRESHOLD_PCT && votes_up == UNANIMOUS_VOTES {
            signal = Signal::StrongBuy;
            confidence = strong_confidence(diff_percent);
        }
    } else if diff_percent < -SIGNAL_THRESHOLD_PCT && votes_down >= MIN_VOTES {
        let magnitude = diff_percent.abs();
        signal = Signal::Sell;
        confidence = directional_confidence(votes_down, magnitude);

        if diff_percent < -STRONG_THRESHOLD_PCT && votes_down == UNANIMOUS_VOTES {
            signal = Signal::StrongSell;
            confidence = strong_confidence(magnitude);
        }
    }

    RecommendationVerdict {
        signal,
        confidence: round_to(confidence.min(MAX_CONFIDENCE), 1),
    }
}
