use crate::config::{MarketDataEnvConfig, Mode};
use crate::domain::errors::MarketDataError;
use crate::domain::ports::MarketDataService;
use crate::infrastructure::csv_market_data::CsvMarketDataService;
use crate::infrastructure::mock::MockMarketDataService;
use crate::infrastructure::yahoo::YahooMarketDataService;
use std::sync::Arc;
use tracing::info;

pub struct ServiceFactory;

impl ServiceFactory {
    pub fn create_market_data_service(
        config: &MarketDataEnvConfig,
    ) -> Result<Arc<dyn MarketDataService>, MarketDataError> {
        let service: Arc<dyn MarketDataService> = match config.mode {
            Mode::Yahoo => {
                info!("ServiceFactory: Using Yahoo chart API at {}", config.base_url);
                Arc::new(YahooMarketDataService::new(
                    config.base_url.clone(),
                    config.fetch_timeout,
                )?)
            }
            Mode::Csv => {
                info!(
                    "ServiceFactory: Using CSV market data from {}",
                    config.data_dir.display()
                );
                Arc::new(CsvMarketDataService::new(config.data_dir.clone()))
            }
            Mode::Mock => {
                info!("ServiceFactory: Using in-memory mock market data");
                Arc::new(MockMarketDataService::with_sample_data())
            }
        };
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_YAHOO_BASE_URL;
    use std::time::Duration;
    use url::Url;

    fn config(mode: Mode) -> MarketDataEnvConfig {
        MarketDataEnvConfig {
            mode,
            base_url: Url::parse(DEFAULT_YAHOO_BASE_URL).unwrap(),
            data_dir: "./data".into(),
            fetch_timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_mode_selects_adapter() {
        let name = |mode| {
            ServiceFactory::create_market_data_service(&config(mode))
                .unwrap()
                .name()
                .to_string()
        };
        assert_eq!(name(Mode::Yahoo), "yahoo");
        assert_eq!(name(Mode::Csv), "csv");
        assert_eq!(name(Mode::Mock), "mock");
    }
}
