use crate::domain::errors::ModelError;
use crate::domain::ml::{FeatureVector, ScaledFeatures};

/// Interface for the pre-trained regression models.
pub trait Regressor: Send + Sync {
    /// Predict the next-bar log-return from scaled features
    fn predict(&self, features: &ScaledFeatures) -> Result<f64, ModelError>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Number of input columns the model was fitted on, when the artifact records it
    fn n_features(&self) -> Option<usize> {
        None
    }
}

/// Interface for the fitted feature normalization.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &FeatureVector) -> ScaledFeatures;

    /// Width of the input the scaler was fitted on
    fn n_features(&self) -> usize;
}
