use crate::domain::market::bar::OhlcvBar;
use crate::domain::ml::ModelId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw log-return predicted by each model, before price reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ModelOutputs {
    pub linear_regression: f64,
    pub random_forest: f64,
    pub xgboost: f64,
}

impl ModelOutputs {
    pub fn get(&self, id: ModelId) -> f64 {
        match id {
            ModelId::LinearRegression => self.linear_regression,
            ModelId::RandomForest => self.random_forest,
            ModelId::XgBoost => self.xgboost,
        }
    }
}

/// Predicted close per model, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub linear_regression: f64,
    pub random_forest: f64,
    pub xgboost: f64,
}

impl PredictionSet {
    pub fn get(&self, id: ModelId) -> f64 {
        match id {
            ModelId::LinearRegression => self.linear_regression,
            ModelId::RandomForest => self.random_forest,
            ModelId::XgBoost => self.xgboost,
        }
    }

    pub fn values(&self) -> [f64; 3] {
        [self.linear_regression, self.random_forest, self.xgboost]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelId, f64)> + '_ {
        ModelId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "STRONG SELL")]
    StrongSell,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::StrongSell => "STRONG SELL",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::Buy => "BUY",
            Signal::StrongBuy => "STRONG BUY",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecommendationVerdict {
    pub signal: Signal,
    /// In [0, 99], one decimal
    pub confidence: f64,
}

/// Latest bar as reported back to the caller, with the unmodified volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealTimeData {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub log_return: f64,
}

impl RealTimeData {
    pub fn from_bar(bar: &OhlcvBar, log_return: f64) -> Self {
        Self {
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            log_return,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub real_time_data: RealTimeData,
    pub predictions: PredictionSet,
    pub recommendation: RecommendationVerdict,
}

/// Complete report or error object; never a partial result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    Success(PredictionReport),
    Failure { error: String },
}

impl PredictionResponse {
    pub fn error(message: impl Into<String>) -> Self {
        PredictionResponse::Failure {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionResponse::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PredictionResponse::Success(_) => None,
            PredictionResponse::Failure { error } => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_serialization() {
        assert_eq!(
            serde_json::to_string(&Signal::StrongBuy).unwrap(),
            "\"STRONG BUY\""
        );
        assert_eq!(serde_json::to_string(&Signal::Hold).unwrap(), "\"HOLD\"");
        let parsed: Signal = serde_json::from_str("\"STRONG SELL\"").unwrap();
        assert_eq!(parsed, Signal::StrongSell);
    }

    #[test]
    fn test_success_shape() {
        let report = PredictionReport {
            real_time_data: RealTimeData {
                open: 99.0,
                high: 101.0,
                low: 98.5,
                close: 100.0,
                volume: 0.0,
                log_return: 0.001,
            },
            predictions: PredictionSet {
                linear_regression: 102.0,
                random_forest: 103.0,
                xgboost: 101.0,
            },
            recommendation: RecommendationVerdict {
                signal: Signal::Buy,
                confidence: 99.0,
            },
        };

        let json = serde_json::to_value(PredictionResponse::Success(report)).unwrap();
        assert_eq!(json["predictions"]["xgboost"], 101.0);
        assert_eq!(json["recommendation"]["signal"], "BUY");
        assert_eq!(json["real_time_data"]["volume"], 0.0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_shape() {
        let response = PredictionResponse::error("No real-time data available for XYZ");
        assert!(!response.is_success());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No real-time data available for XYZ"}));
    }

    #[test]
    fn test_prediction_set_iterates_all_models() {
        let set = PredictionSet {
            linear_regression: 1.0,
            random_forest: 2.0,
            xgboost: 3.0,
        };
        let ids: Vec<ModelId> = set.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ModelId::ALL.to_vec());
        assert_eq!(set.get(ModelId::RandomForest), 2.0);
    }
}
