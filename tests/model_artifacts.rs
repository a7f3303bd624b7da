mod support;

use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use stockcast::application::bootstrap::ServicesBootstrap;
use stockcast::application::ml::ModelContext;
use stockcast::config::{
    Config, DEFAULT_YAHOO_BASE_URL, MarketDataEnvConfig, Mode, ModelArtifacts, ModelEnvConfig,
    ObservabilityEnvConfig, ServerEnvConfig,
};
use stockcast::domain::errors::ModelError;
use stockcast::domain::ml::{FeatureVector, ModelId};
use stockcast::domain::prediction::PredictionResponse;
use stockcast::infrastructure::mock::MockMarketDataService;
use support::sample_bars;
use tempfile::TempDir;

const SCALER: &str = r#"{
    "data_min": [0.0, -0.05, 0.0, 0.0, -5.0],
    "data_max": [100000.0, 0.05, 10.0, 10.0, 5.0],
    "feature_range": [0.0, 1.0]
}"#;

const LINEAR: &str = r#"{
    "coefficients": [0.0, 0.02, 0.0, 0.0, 0.0],
    "intercept": 0.0
}"#;

// One stump on the log-return column
const XGBOOST: &str = r#"{
    "base_score": 0.0,
    "trees": [
        {"nodeid": 0, "depth": 0, "split": "f1", "split_condition": 0.5,
         "yes": 1, "no": 2, "missing": 1, "children": [
            {"nodeid": 1, "leaf": -0.01},
            {"nodeid": 2, "leaf": 0.01}
        ]}
    ]
}"#;

fn write_forest(path: &Path) {
    let mut rows = Vec::new();
    let mut targets = Vec::new();
    for i in 0..40 {
        let x = i as f64 / 40.0;
        rows.push(vec![x; 5]);
        targets.push(if x < 0.5 { -0.01 } else { 0.01 });
    }
    let x = DenseMatrix::from_2d_vec(&rows).unwrap();
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(10)
        .with_max_depth(3);
    let forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>> =
        RandomForestRegressor::fit(&x, &targets, params).unwrap();
    std::fs::write(path, serde_json::to_vec(&forest).unwrap()).unwrap();
}

fn model_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("all_scaler.json"), SCALER).unwrap();
    std::fs::write(dir.path().join("lr_all_model.json"), LINEAR).unwrap();
    std::fs::write(dir.path().join("xgb_all_model.json"), XGBOOST).unwrap();
    write_forest(&dir.path().join("rf_all_model.json"));
    dir
}

#[test]
fn test_loads_all_four_artifacts() {
    let dir = model_dir();
    let context = ModelContext::load(&ModelArtifacts::in_dir(dir.path())).unwrap();

    // rising bar: log-return above the midpoint of the scaler range
    let features = FeatureVector {
        volume: 50_000.0,
        log_return: 0.03,
        momentum: 5.0,
        volatility: 5.0,
        spread: 1.0,
    };
    let scaled = context.scale(&features);
    assert!((scaled.get(1).unwrap() - 0.8).abs() < 1e-12);

    let outputs = context.infer(&scaled).unwrap();
    assert!((outputs.linear_regression - 0.016).abs() < 1e-12);
    assert_eq!(outputs.xgboost, 0.01);
    assert!(outputs.random_forest.is_finite());
    assert_eq!(context.model_name(ModelId::XgBoost), "XGBoost");
}

#[test]
fn test_missing_artifact_fails_to_load() {
    let dir = model_dir();
    std::fs::remove_file(dir.path().join("xgb_all_model.json")).unwrap();

    let err = ModelContext::load(&ModelArtifacts::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, ModelError::LoadFailed { .. }), "{:?}", err);
}

#[test]
fn test_scaler_width_mismatch_is_rejected() {
    let dir = model_dir();
    std::fs::write(
        dir.path().join("all_scaler.json"),
        r#"{"data_min": [0.0, 0.0, 0.0], "data_max": [1.0, 1.0, 1.0]}"#,
    )
    .unwrap();

    let err = ModelContext::load(&ModelArtifacts::in_dir(dir.path())).unwrap_err();
    assert!(
        matches!(
            err,
            ModelError::ContractViolation { .. } | ModelError::LoadFailed { .. }
        ),
        "{:?}",
        err
    );
}

#[test]
fn test_linear_width_mismatch_is_rejected() {
    let dir = model_dir();
    std::fs::write(
        dir.path().join("lr_all_model.json"),
        r#"{"coefficients": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7], "intercept": 0.0}"#,
    )
    .unwrap();

    let err = ModelContext::load(&ModelArtifacts::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, ModelError::ContractViolation { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_bootstrap_serves_predictions_from_disk() {
    let dir = model_dir();
    let config = Config {
        market_data: MarketDataEnvConfig {
            mode: Mode::Mock,
            base_url: DEFAULT_YAHOO_BASE_URL.parse().unwrap(),
            data_dir: "./data".into(),
            fetch_timeout: Duration::from_secs(2),
        },
        model: ModelEnvConfig {
            model_dir: dir.path().to_path_buf(),
        },
        server: ServerEnvConfig::default(),
        observability: ObservabilityEnvConfig::default(),
    };

    // from disk, then rewired onto a gateway holding a known ticker
    let services = ServicesBootstrap::init(&config, None).unwrap();
    let mock = MockMarketDataService::new().with_bars("AAPL", sample_bars());
    let services = ServicesBootstrap::assemble(
        Arc::new(mock),
        services.models,
        config.market_data.fetch_timeout,
        None,
    );

    let response = services.prediction.predict("AAPL").await;
    let PredictionResponse::Success(report) = response else {
        panic!("expected a report, got {:?}", response);
    };
    assert_eq!(report.real_time_data.close, 100.0);
    for (_, price) in report.predictions.iter() {
        assert!(price > 90.0 && price < 110.0);
    }
}

#[test]
fn test_bootstrap_fails_without_models() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        market_data: MarketDataEnvConfig {
            mode: Mode::Mock,
            base_url: DEFAULT_YAHOO_BASE_URL.parse().unwrap(),
            data_dir: "./data".into(),
            fetch_timeout: Duration::from_secs(2),
        },
        model: ModelEnvConfig {
            model_dir: dir.path().to_path_buf(),
        },
        server: ServerEnvConfig::default(),
        observability: ObservabilityEnvConfig::default(),
    };

    let err = ServicesBootstrap::init(&config, None).err().unwrap();
    assert!(err.to_string().contains("Failed to load model artifacts"));
}
