use serde::Serialize;

/// Ordered list of feature names.
/// This order MUST match exactly with the order the scaler and the models were fitted on.
/// Any change here is a breaking change for ML models.
pub const FEATURE_NAMES: &[&str] = &["volume", "log_return", "momentum", "volatility", "spread"];

pub const FEATURE_COUNT: usize = 5;

/// Raw (unscaled) model inputs derived from a bar pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeatureVector {
    pub volume: f64,
    pub log_return: f64,
    pub momentum: f64,
    pub volatility: f64,
    pub spread: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_NAMES` order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.volume,
            self.log_return,
            self.momentum,
            self.volatility,
            self.spread,
        ]
    }
}

/// Features after the fitted scaler has been applied.
///
/// Models only accept this type, so unscaled inputs cannot reach them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFeatures([f64; FEATURE_COUNT]);

impl ScaledFeatures {
    /// Wraps values that are already in model input space.
    pub fn from_scaled(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }
}

/// Checks a list of feature names (as stored in an artifact) against the registry.
pub fn validate_feature_names<S: AsRef<str>>(names: &[S]) -> Result<(), String> {
    if names.len() != FEATURE_COUNT {
        return Err(format!(
            "expected {} features, artifact declares {}",
            FEATURE_COUNT,
            names.len()
        ));
    }

    for (position, (expected, actual)) in FEATURE_NAMES.iter().zip(names).enumerate() {
        if !expected.eq_ignore_ascii_case(actual.as_ref()) {
            return Err(format!(
                "feature {} is '{}', expected '{}'",
                position,
                actual.as_ref(),
                expected
            ));
        }
    }
    Ok(())
}

/// Position of a named feature in the registry.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))
}
