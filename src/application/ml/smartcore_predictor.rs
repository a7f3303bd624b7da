use super::predictor::Regressor;
use super::read_json_artifact;
use crate::domain::errors::ModelError;
use crate::domain::ml::ScaledFeatures;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;
use tracing::info;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor backed by smartcore.
pub struct SmartCorePredictor {
    model: ForestModel,
}

impl SmartCorePredictor {
    pub fn new(model: ForestModel) -> Self {
        Self { model }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        // Smartcore deserialization (serde_json)
        let model: ForestModel = read_json_artifact("random_forest", path)?;
        info!("Successfully loaded random forest model from {:?}", path);
        Ok(Self::new(model))
    }
}

impl Regressor for SmartCorePredictor {
    fn predict(&self, features: &ScaledFeatures) -> Result<f64, ModelError> {
        let failed = |reason: String| ModelError::InferenceFailed {
            model: "random_forest".to_string(),
            reason,
        };

        let input_matrix = DenseMatrix::from_2d_vec(&vec![features.as_slice().to_vec()])
            .map_err(|e| failed(format!("Matrix creation failed: {}", e)))?;

        let predictions = self
            .model
            .predict(&input_matrix)
            .map_err(|e| failed(format!("Prediction failed: {}", e)))?;

        predictions
            .first()
            .copied()
            .ok_or_else(|| failed("No prediction returned".to_string()))
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}
