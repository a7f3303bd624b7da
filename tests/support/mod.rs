#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use stockcast::application::ml::{FeatureScaler, ModelContext, ModelEnsemble, Regressor};
use stockcast::domain::errors::ModelError;
use stockcast::domain::market::bar::OhlcvBar;
use stockcast::domain::ml::{FeatureVector, ScaledFeatures};

pub fn bar(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Two valid minute bars ending at a close of exactly 100.
pub fn sample_bars() -> Vec<OhlcvBar> {
    vec![
        bar(1_709_560_800, 99.0, 99.8, 98.9, 99.5, 12_000.0),
        bar(1_709_560_860, 99.5, 100.4, 99.2, 100.0, 15_000.0),
    ]
}

/// Returns a fixed log-return and counts calls.
pub struct FixedModel {
    pub log_return: f64,
    pub calls: Arc<AtomicUsize>,
}

impl Regressor for FixedModel {
    fn predict(&self, _features: &ScaledFeatures) -> Result<f64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.log_return)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Behaves during the startup warmup, then fails on real input.
pub struct BrokenModel {
    pub nan: bool,
}

impl Regressor for BrokenModel {
    fn predict(&self, features: &ScaledFeatures) -> Result<f64, ModelError> {
        let probing = features.as_slice().iter().all(|v| *v == 0.0);
        match (probing, self.nan) {
            (true, _) => Ok(0.0),
            (false, true) => Ok(f64::NAN),
            (false, false) => Err(ModelError::InferenceFailed {
                model: "broken".to_string(),
                reason: "tree walk failed".to_string(),
            }),
        }
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Identity scaler that records every raw vector it sees.
#[derive(Default)]
pub struct RecordingScaler {
    pub seen: Arc<Mutex<Vec<FeatureVector>>>,
}

impl FeatureScaler for RecordingScaler {
    fn transform(&self, features: &FeatureVector) -> ScaledFeatures {
        self.seen.lock().unwrap().push(*features);
        ScaledFeatures::from_scaled(features.to_array())
    }

    fn n_features(&self) -> usize {
        5
    }
}

/// Handles for asserting on what the models and scaler were asked to do.
pub struct Recorders {
    pub model_calls: Arc<AtomicUsize>,
    pub scaled: Arc<Mutex<Vec<FeatureVector>>>,
}

impl Recorders {
    pub fn model_calls(&self) -> usize {
        self.model_calls.load(Ordering::SeqCst)
    }

    pub fn scaled(&self) -> Vec<FeatureVector> {
        self.scaled.lock().unwrap().clone()
    }
}

/// Context whose three models predict the given log-returns.
pub fn fixed_context(lr: f64, rf: f64, xgb: f64) -> (Arc<ModelContext>, Recorders) {
    let calls = Arc::new(AtomicUsize::new(0));
    let scaler = RecordingScaler::default();
    let recorders = Recorders {
        model_calls: calls.clone(),
        scaled: scaler.seen.clone(),
    };

    let model = |log_return| {
        Box::new(FixedModel {
            log_return,
            calls: calls.clone(),
        }) as Box<dyn Regressor>
    };
    let context = ModelContext::new(
        Box::new(scaler),
        ModelEnsemble::new(model(lr), model(rf), model(xgb)),
    )
    .expect("fixed models satisfy the contract");

    // forget the startup warmup
    recorders.model_calls.store(0, Ordering::SeqCst);
    recorders.scaled.lock().unwrap().clear();

    (Arc::new(context), recorders)
}

pub fn broken_context(nan: bool) -> Arc<ModelContext> {
    let ok = || {
        Box::new(FixedModel {
            log_return: 0.0,
            calls: Arc::new(AtomicUsize::new(0)),
        }) as Box<dyn Regressor>
    };
    let context = ModelContext::new(
        Box::new(RecordingScaler::default()),
        ModelEnsemble::new(ok(), Box::new(BrokenModel { nan }), ok()),
    )
    .expect("broken model passes the warmup");
    Arc::new(context)
}
