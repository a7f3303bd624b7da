pub mod feature_registry;
pub mod model_id;

pub use feature_registry::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, ScaledFeatures};
pub use model_id::ModelId;
