pub mod bootstrap;

// Live and training feature transforms
pub mod features;

// Scaler, regressors and the model context
pub mod ml;

// Prediction pipeline and history pass-through
pub mod prediction;
