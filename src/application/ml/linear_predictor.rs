use super::predictor::Regressor;
use super::read_json_artifact;
use crate::domain::errors::ModelError;
use crate::domain::ml::{FEATURE_COUNT, ScaledFeatures};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
struct LinearArtifact {
    coefficients: Vec<f64>,
    intercept: f64,
}

/// Ordinary least squares model: `intercept + Σ coef_i * x_i`.
#[derive(Debug, Clone)]
pub struct LinearPredictor {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearPredictor {
    pub fn new(coefficients: &[f64], intercept: f64) -> Result<Self, ModelError> {
        let coefficients: [f64; FEATURE_COUNT] =
            coefficients
                .try_into()
                .map_err(|_| ModelError::ContractViolation {
                    artifact: "linear_regression".to_string(),
                    reason: format!(
                        "{} coefficients, feature registry has {}",
                        coefficients.len(),
                        FEATURE_COUNT
                    ),
                })?;

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact: LinearArtifact = read_json_artifact("linear_regression", path)?;
        let model = Self::new(&artifact.coefficients, artifact.intercept)?;
        info!("Successfully loaded linear model from {:?}", path);
        Ok(model)
    }
}

impl Regressor for LinearPredictor {
    fn predict(&self, features: &ScaledFeatures) -> Result<f64, ModelError> {
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn name(&self) -> &str {
        "Linear Regression"
    }

    fn n_features(&self) -> Option<usize> {
        Some(FEATURE_COUNT)
    }
}
