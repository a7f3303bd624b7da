pub mod types;

pub use types::{
    ModelOutputs, PredictionReport, PredictionResponse, PredictionSet, RealTimeData,
    RecommendationVerdict, Signal,
};
