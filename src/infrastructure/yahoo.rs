//! Yahoo Finance chart API adapter.
//!
//! Both the intraday bar pair and the daily history come from
//! `/v8/finance/chart/{symbol}`; only `range` and `interval` differ.

use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::{BarPair, OhlcvBar};
use crate::domain::market::history::{DailyClose, HistoryPeriod};
use crate::domain::ports::MarketDataService;
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

const PROVIDER: &str = "yahoo";

/// Window requested for the latest bar pair
const INTRADAY_RANGE: &str = "5d";
const INTRADAY_INTERVAL: &str = "1m";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parsed chart: bars in time order plus the exchange UTC offset.
#[derive(Debug)]
struct Chart {
    bars: Vec<OhlcvBar>,
    gmtoffset: i64,
}

fn parse_chart(symbol: &str, body: &str) -> Result<Chart, MarketDataError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: format!("unexpected chart payload: {}", e),
        })?;

    if let Some(err) = envelope.chart.error {
        return Err(if err.code.eq_ignore_ascii_case("Not Found") {
            MarketDataError::NotFound {
                symbol: symbol.to_string(),
            }
        } else {
            MarketDataError::InvalidData {
                symbol: symbol.to_string(),
                reason: format!("{}: {}", err.code, err.description),
            }
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(MarketDataError::NotFound {
            symbol: symbol.to_string(),
        });
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    // Rows with any missing price are dropped; a missing volume reads as zero.
    let bars = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &timestamp)| {
            Some(OhlcvBar {
                timestamp,
                open: at(&quote.open, i)?,
                high: at(&quote.high, i)?,
                low: at(&quote.low, i)?,
                close: at(&quote.close, i)?,
                volume: at(&quote.volume, i).unwrap_or(0.0),
            })
        })
        .collect();

    Ok(Chart {
        bars,
        gmtoffset: result.meta.gmtoffset,
    })
}

fn to_daily_closes(chart: &Chart) -> Vec<DailyClose> {
    chart
        .bars
        .iter()
        .filter(|b| b.is_valid())
        .filter_map(|b| {
            // Session dates are reported in exchange local time
            let local = DateTime::from_timestamp(b.timestamp + chart.gmtoffset, 0)?;
            Some(DailyClose {
                date: local.date_naive(),
                close: b.close,
            })
        })
        .collect()
}

pub struct YahooMarketDataService {
    client: Client,
    base_url: Url,
}

impl YahooMarketDataService {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, MarketDataError> {
        let client = HttpClientFactory::create_client(timeout).map_err(|e| {
            MarketDataError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("cannot build HTTP client: {}", e),
            }
        })?;
        Ok(Self { client, base_url })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, MarketDataError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketDataError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        Ok(url)
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<Chart, MarketDataError> {
        let url = self.chart_url(symbol)?;
        debug!("YahooMarketDataService: GET {} range={} interval={}", url, range, interval);

        let request_failed = |e: reqwest::Error| MarketDataError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .query(&[("range", range), ("interval", interval)])
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        let body = response.text().await.map_err(request_failed)?;
        trace!("YahooMarketDataService: {} -> {} bytes", status, body.len());

        // Error payloads (e.g. unknown symbol) still carry a chart envelope
        match parse_chart(symbol, &body) {
            Ok(chart) => Ok(chart),
            Err(e @ MarketDataError::NotFound { .. }) => Err(e),
            Err(_) if !status.is_success() => Err(MarketDataError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("HTTP {}", status),
            }),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl MarketDataService for YahooMarketDataService {
    async fn get_latest_bars(&self, symbol: &str) -> Result<Option<BarPair>, MarketDataError> {
        let chart = self
            .fetch_chart(symbol, INTRADAY_RANGE, INTRADAY_INTERVAL)
            .await?;
        debug!(
            "YahooMarketDataService: {} intraday bars for {}",
            chart.bars.len(),
            symbol
        );
        Ok(BarPair::from_series(&chart.bars))
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DailyClose>, MarketDataError> {
        let chart = self.fetch_chart(symbol, period.as_str(), "1d").await?;
        Ok(to_daily_closes(&chart))
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}
