//! Configuration module for Stockcast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Market Data, Models, Server, and Observability.

mod market_data_config;
mod model_config;
mod observability_config;
mod server_config;

pub use market_data_config::{DEFAULT_YAHOO_BASE_URL, MarketDataEnvConfig, Mode};
pub use model_config::{ModelArtifacts, ModelEnvConfig};
pub use observability_config::{LogFormat, ObservabilityEnvConfig};
pub use server_config::ServerEnvConfig;

use anyhow::Result;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub market_data: MarketDataEnvConfig,
    pub model: ModelEnvConfig,
    pub server: ServerEnvConfig,
    pub observability: ObservabilityEnvConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            market_data: MarketDataEnvConfig::from_env()?,
            model: ModelEnvConfig::from_env(),
            server: ServerEnvConfig::from_env()?,
            observability: ObservabilityEnvConfig::from_env()?,
        })
    }
}
