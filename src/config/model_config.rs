//! Model artifact locations.
//!
//! Artifacts default to the file names below inside `MODEL_DIR`. A
//! `manifest.toml` in the same directory may override any of them.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.toml";

#[derive(Debug, Clone)]
pub struct ModelEnvConfig {
    pub model_dir: PathBuf,
}

impl ModelEnvConfig {
    pub fn from_env() -> Self {
        Self {
            model_dir: PathBuf::from(
                env::var("MODEL_DIR").unwrap_or_else(|_| "./models".to_string()),
            ),
        }
    }

    /// Resolves artifact paths, applying `manifest.toml` when present.
    pub fn artifacts(&self) -> Result<ModelArtifacts> {
        let manifest_path = self.model_dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            let raw = std::fs::read_to_string(&manifest_path)
                .with_context(|| format!("Failed to read {:?}", manifest_path))?;
            toml::from_str::<ModelManifest>(&raw)
                .with_context(|| format!("Failed to parse {:?}", manifest_path))?
        } else {
            ModelManifest::default()
        };

        Ok(ModelArtifacts::resolve(&self.model_dir, &manifest))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ModelManifest {
    scaler: String,
    linear_regression: String,
    random_forest: String,
    xgboost: String,
}

impl Default for ModelManifest {
    fn default() -> Self {
        Self {
            scaler: "all_scaler.json".to_string(),
            linear_regression: "lr_all_model.json".to_string(),
            random_forest: "rf_all_model.json".to_string(),
            xgboost: "xgb_all_model.json".to_string(),
        }
    }
}

/// Absolute locations of the four artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub model_dir: PathBuf,
    pub scaler: PathBuf,
    pub linear_regression: PathBuf,
    pub random_forest: PathBuf,
    pub xgboost: PathBuf,
}

impl ModelArtifacts {
    fn resolve(dir: &Path, manifest: &ModelManifest) -> Self {
        Self {
            model_dir: dir.to_path_buf(),
            scaler: dir.join(&manifest.scaler),
            linear_regression: dir.join(&manifest.linear_regression),
            random_forest: dir.join(&manifest.random_forest),
            xgboost: dir.join(&manifest.xgboost),
        }
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::resolve(dir.as_ref(), &ModelManifest::default())
    }
}
