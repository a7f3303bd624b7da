//! Market data source configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Which market data adapter backs the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Yahoo,
    Csv,
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(Mode::Yahoo),
            "csv" => Ok(Mode::Csv),
            "mock" => Ok(Mode::Mock),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'yahoo', 'csv' or 'mock'", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketDataEnvConfig {
    pub mode: Mode,
    pub base_url: Url,
    /// Directory holding `{TICKER}_stock_data.csv` files (csv mode)
    pub data_dir: PathBuf,
    pub fetch_timeout: Duration,
}

impl MarketDataEnvConfig {
    pub fn from_env() -> Result<Self> {
        let mode_str = env::var("MODE").unwrap_or_else(|_| "yahoo".to_string());
        let mode = Mode::from_str(&mode_str)?;

        let base_url_str =
            env::var("MARKET_DATA_BASE_URL").unwrap_or_else(|_| DEFAULT_YAHOO_BASE_URL.to_string());
        let base_url = Url::parse(&base_url_str)
            .with_context(|| format!("Invalid MARKET_DATA_BASE_URL: {}", base_url_str))?;

        let data_dir =
            PathBuf::from(env::var("MARKET_DATA_DIR").unwrap_or_else(|_| "./data".to_string()));

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .context("Failed to parse FETCH_TIMEOUT_SECS")?;
        if fetch_timeout_secs == 0 {
            anyhow::bail!("FETCH_TIMEOUT_SECS must be greater than 0");
        }

        Ok(Self {
            mode,
            base_url,
            data_dir,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
        })
    }
}
