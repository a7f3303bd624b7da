use super::linear_predictor::LinearPredictor;
use super::predictor::{FeatureScaler, Regressor};
use super::scaler::MinMaxScaler;
use super::smartcore_predictor::SmartCorePredictor;
use super::xgboost_predictor::XgBoostPredictor;
use crate::config::ModelArtifacts;
use crate::domain::errors::ModelError;
use crate::domain::ml::{FEATURE_COUNT, FeatureVector, ModelId, ScaledFeatures};
use crate::domain::prediction::ModelOutputs;
use tracing::{debug, info};

/// The three regressors, one per `ModelId`.
pub struct ModelEnsemble {
    linear_regression: Box<dyn Regressor>,
    random_forest: Box<dyn Regressor>,
    xgboost: Box<dyn Regressor>,
}

impl ModelEnsemble {
    pub fn new(
        linear_regression: Box<dyn Regressor>,
        random_forest: Box<dyn Regressor>,
        xgboost: Box<dyn Regressor>,
    ) -> Self {
        Self {
            linear_regression,
            random_forest,
            xgboost,
        }
    }

    pub fn model(&self, id: ModelId) -> &dyn Regressor {
        match id {
            ModelId::LinearRegression => self.linear_regression.as_ref(),
            ModelId::RandomForest => self.random_forest.as_ref(),
            ModelId::XgBoost => self.xgboost.as_ref(),
        }
    }

    fn predict_one(&self, id: ModelId, features: &ScaledFeatures) -> Result<f64, ModelError> {
        let value = self.model(id).predict(features)?;
        if !value.is_finite() {
            return Err(ModelError::InferenceFailed {
                model: id.to_string(),
                reason: format!("non-finite output {}", value),
            });
        }
        debug!("ModelEnsemble: {} -> {:.6}", id, value);
        Ok(value)
    }

    /// Runs every model on the same scaled input. Models are independent.
    pub fn infer(&self, features: &ScaledFeatures) -> Result<ModelOutputs, ModelError> {
        Ok(ModelOutputs {
            linear_regression: self.predict_one(ModelId::LinearRegression, features)?,
            random_forest: self.predict_one(ModelId::RandomForest, features)?,
            xgboost: self.predict_one(ModelId::XgBoost, features)?,
        })
    }
}

/// Scaler and models loaded once at startup.
///
/// Immutable after construction; share it behind an `Arc` for concurrent reads.
pub struct ModelContext {
    scaler: Box<dyn FeatureScaler>,
    ensemble: ModelEnsemble,
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("n_features", &self.scaler.n_features())
            .finish_non_exhaustive()
    }
}

impl ModelContext {
    /// Validates the artifacts against the feature registry before accepting them.
    pub fn new(
        scaler: Box<dyn FeatureScaler>,
        ensemble: ModelEnsemble,
    ) -> Result<Self, ModelError> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(ModelError::ContractViolation {
                artifact: "scaler".to_string(),
                reason: format!(
                    "expects {} features, feature registry has {}",
                    scaler.n_features(),
                    FEATURE_COUNT
                ),
            });
        }

        let warmup = scaler.transform(&FeatureVector::default());
        for id in ModelId::ALL {
            let model = ensemble.model(id);
            if let Some(width) = model.n_features()
                && width != FEATURE_COUNT
            {
                return Err(ModelError::ContractViolation {
                    artifact: id.to_string(),
                    reason: format!(
                        "expects {} features, feature registry has {}",
                        width, FEATURE_COUNT
                    ),
                });
            }

            ensemble
                .predict_one(id, &warmup)
                .map_err(|e| ModelError::ContractViolation {
                    artifact: id.to_string(),
                    reason: format!("warmup prediction failed: {}", e),
                })?;
        }

        Ok(Self { scaler, ensemble })
    }

    /// Loads the scaler and the three models from their artifact files.
    pub fn load(artifacts: &ModelArtifacts) -> Result<Self, ModelError> {
        info!("Loading model artifacts from {:?}", artifacts.model_dir);

        let scaler = MinMaxScaler::load(&artifacts.scaler)?;
        let ensemble = ModelEnsemble::new(
            Box::new(LinearPredictor::load(&artifacts.linear_regression)?),
            Box::new(SmartCorePredictor::load(&artifacts.random_forest)?),
            Box::new(XgBoostPredictor::load(&artifacts.xgboost)?),
        );

        let context = Self::new(Box::new(scaler), ensemble)?;
        info!("Model context ready ({} features)", FEATURE_COUNT);
        Ok(context)
    }

    pub fn scale(&self, features: &FeatureVector) -> ScaledFeatures {
        self.scaler.transform(features)
    }

    pub fn infer(&self, features: &ScaledFeatures) -> Result<ModelOutputs, ModelError> {
        self.ensemble.infer(features)
    }

    pub fn model_name(&self, id: ModelId) -> &str {
        self.ensemble.model(id).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl Regressor for Fixed {
        fn predict(&self, _features: &ScaledFeatures) -> Result<f64, ModelError> {
            Ok(self.0)
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Wide;

    impl Regressor for Wide {
        fn predict(&self, _features: &ScaledFeatures) -> Result<f64, ModelError> {
            Ok(0.0)
        }
        fn name(&self) -> &str {
            "wide"
        }
        fn n_features(&self) -> Option<usize> {
            Some(15)
        }
    }

    fn scaler() -> Box<dyn FeatureScaler> {
        Box::new(MinMaxScaler::new(&[0.0; 5], &[1.0; 5], (0.0, 1.0)).unwrap())
    }

    #[test]
    fn test_infer_collects_each_model() {
        let context = ModelContext::new(
            scaler(),
            ModelEnsemble::new(Box::new(Fixed(0.01)), Box::new(Fixed(0.02)), Box::new(Fixed(-0.01))),
        )
        .unwrap();

        let outputs = context
            .infer(&context.scale(&FeatureVector::default()))
            .unwrap();
        assert_eq!(outputs.linear_regression, 0.01);
        assert_eq!(outputs.random_forest, 0.02);
        assert_eq!(outputs.xgboost, -0.01);
    }

    #[test]
    fn test_model_width_mismatch_fails_at_construction() {
        let err = ModelContext::new(
            scaler(),
            ModelEnsemble::new(Box::new(Fixed(0.0)), Box::new(Wide), Box::new(Fixed(0.0))),
        )
        .unwrap_err();

        assert!(matches!(err, ModelError::ContractViolation { ref artifact, .. } if artifact == "random_forest"));
    }

    #[test]
    fn test_non_finite_warmup_fails_at_construction() {
        let err = ModelContext::new(
            scaler(),
            ModelEnsemble::new(Box::new(Fixed(0.0)), Box::new(Fixed(0.0)), Box::new(Fixed(f64::NAN))),
        )
        .unwrap_err();

        assert!(err.to_string().contains("xgboost"));
    }
}
