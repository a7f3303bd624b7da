use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of regressors in the ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    LinearRegression,
    RandomForest,
    #[serde(rename = "xgboost")]
    XgBoost,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [
        ModelId::LinearRegression,
        ModelId::RandomForest,
        ModelId::XgBoost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::LinearRegression => "linear_regression",
            ModelId::RandomForest => "random_forest",
            ModelId::XgBoost => "xgboost",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
