use super::predictor::FeatureScaler;
use super::read_json_artifact;
use crate::application::features::training::TRAINING_FEATURE_NAMES;
use crate::domain::errors::ModelError;
use crate::domain::ml::feature_registry::validate_feature_names;
use crate::domain::ml::{FEATURE_COUNT, FeatureVector, ScaledFeatures};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

const ARTIFACT: &str = "scaler";

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Exported min-max scaler parameters.
#[derive(Debug, Clone, Deserialize)]
struct MinMaxScalerArtifact {
    #[serde(default)]
    feature_names: Option<Vec<String>>,
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    feature_range: (f64, f64),
}

/// Min-max scaler: maps each column from `[data_min, data_max]` into `feature_range`.
///
/// Columns with a zero range use a unit range, so constant training columns
/// shift instead of dividing by zero.
#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    scale: [f64; FEATURE_COUNT],
    offset: [f64; FEATURE_COUNT],
}

impl MinMaxScaler {
    pub fn new(
        data_min: &[f64],
        data_max: &[f64],
        feature_range: (f64, f64),
    ) -> Result<Self, ModelError> {
        let violation = |reason: String| ModelError::ContractViolation {
            artifact: ARTIFACT.to_string(),
            reason,
        };

        if data_min.len() != FEATURE_COUNT || data_max.len() != FEATURE_COUNT {
            return Err(violation(format!(
                "fitted on {} / {} columns, feature registry has {}",
                data_min.len(),
                data_max.len(),
                FEATURE_COUNT
            )));
        }

        let (range_min, range_max) = feature_range;
        if !(range_min < range_max) {
            return Err(violation(format!(
                "invalid feature_range ({}, {})",
                range_min, range_max
            )));
        }

        let mut scale = [0.0; FEATURE_COUNT];
        let mut offset = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            let (lo, hi) = (data_min[i], data_max[i]);
            if !lo.is_finite() || !hi.is_finite() || hi < lo {
                return Err(violation(format!(
                    "column {} has invalid bounds [{}, {}]",
                    i, lo, hi
                )));
            }
            let data_range = if hi - lo == 0.0 { 1.0 } else { hi - lo };
            scale[i] = (range_max - range_min) / data_range;
            offset[i] = range_min - lo * scale[i];
        }

        Ok(Self { scale, offset })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact: MinMaxScalerArtifact = read_json_artifact(ARTIFACT, path)?;

        if let Some(names) = &artifact.feature_names {
            check_fitted_names(names)?;
        }

        let scaler = Self::new(&artifact.data_min, &artifact.data_max, artifact.feature_range)?;
        info!("Successfully loaded scaler from {:?}", path);
        Ok(scaler)
    }
}

/// Columns are matched by position. A scaler fitted on the training
/// transform's column names is accepted; its columns 1-3 mean something
/// else at inference time, which is logged once at load.
fn check_fitted_names(names: &[String]) -> Result<(), ModelError> {
    let Err(reason) = validate_feature_names(names) else {
        return Ok(());
    };

    let fitted_on_training_columns = names.len() == TRAINING_FEATURE_NAMES.len()
        && names
            .iter()
            .zip(TRAINING_FEATURE_NAMES)
            .all(|(name, training)| name.eq_ignore_ascii_case(training));

    if fitted_on_training_columns {
        warn!(
            "MinMaxScaler: fitted on training columns {:?}; live features are fed by position (train/serve skew)",
            TRAINING_FEATURE_NAMES
        );
        return Ok(());
    }

    Err(ModelError::ContractViolation {
        artifact: ARTIFACT.to_string(),
        reason,
    })
}

impl FeatureScaler for MinMaxScaler {
    fn transform(&self, features: &FeatureVector) -> ScaledFeatures {
        let raw = features.to_array();
        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = raw[i] * self.scale[i] + self.offset[i];
        }
        ScaledFeatures::from_scaled(scaled)
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }
}
