pub mod ensemble;
pub mod linear_predictor;
pub mod predictor;
pub mod scaler;
pub mod smartcore_predictor;
pub mod xgboost_predictor;

use crate::domain::errors::ModelError;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use ensemble::{ModelContext, ModelEnsemble};
pub use predictor::{FeatureScaler, Regressor};

/// Reads a JSON model artifact from disk.
pub(crate) fn read_json_artifact<T: DeserializeOwned>(
    artifact: &str,
    path: &Path,
) -> Result<T, ModelError> {
    let load_failed = |reason: String| ModelError::LoadFailed {
        artifact: artifact.to_string(),
        path: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_failed(e.to_string()))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| load_failed(e.to_string()))
}
