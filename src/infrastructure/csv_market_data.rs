//! Offline market data backed by `{TICKER}_stock_data.csv` exports.
//!
//! Files carry one daily row per session with the columns
//! `Date,Open,High,Low,Close,Volume`. The last two rows stand in for the
//! intraday bar pair.

use crate::domain::errors::MarketDataError;
use crate::domain::market::bar::{BarPair, OhlcvBar};
use crate::domain::market::history::{DailyClose, HistoryPeriod};
use crate::domain::ports::MarketDataService;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

const PROVIDER: &str = "csv";

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
struct DailyBar {
    date: NaiveDate,
    bar: OhlcvBar,
}

pub struct CsvMarketDataService {
    data_dir: PathBuf,
}

impl CsvMarketDataService {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn file_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}_stock_data.csv", symbol))
    }

    async fn load(&self, symbol: &str) -> Result<Vec<DailyBar>, MarketDataError> {
        let path = self.file_for(symbol);
        let symbol = symbol.to_string();
        debug!("CsvMarketDataService: reading {}", path.display());

        tokio::task::spawn_blocking(move || read_daily_bars(&symbol, &path))
            .await
            .map_err(|e| MarketDataError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("reader task failed: {}", e),
            })?
    }
}

/// Timestamps come from the session date at midnight UTC.
fn parse_record(symbol: &str, record: CsvRecord) -> Result<DailyBar, MarketDataError> {
    // Exports may carry a time and offset after the date
    let day = record.date.get(..10).unwrap_or(&record.date);
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
        MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: format!("bad date '{}': {}", record.date, e),
        }
    })?;
    let timestamp = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default();

    Ok(DailyBar {
        date,
        bar: OhlcvBar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume.unwrap_or(0.0),
        },
    })
}

fn read_daily_bars(symbol: &str, path: &Path) -> Result<Vec<DailyBar>, MarketDataError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MarketDataError::NotFound {
            symbol: symbol.to_string(),
        },
        _ => MarketDataError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("{}: {}", path.display(), e),
        },
    })?;

    let mut rdr = csv::Reader::from_reader(BufReader::new(file));
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: CsvRecord = result.map_err(|e| MarketDataError::InvalidData {
            symbol: symbol.to_string(),
            reason: e.to_string(),
        })?;
        rows.push(parse_record(symbol, record)?);
    }

    rows.sort_by_key(|r| r.date);
    Ok(rows)
}

/// Trims a date-ordered series to the requested window.
fn window(rows: &[DailyBar], period: HistoryPeriod) -> &[DailyBar] {
    match period {
        HistoryPeriod::Max => rows,
        HistoryPeriod::YearToDate => {
            let Some(last) = rows.last() else {
                return rows;
            };
            let start = rows.partition_point(|r| r.date.year() < last.date.year());
            &rows[start..]
        }
        _ => {
            let days = period.trading_days().unwrap_or(rows.len());
            &rows[rows.len().saturating_sub(days)..]
        }
    }
}

#[async_trait]
impl MarketDataService for CsvMarketDataService {
    async fn get_latest_bars(&self, symbol: &str) -> Result<Option<BarPair>, MarketDataError> {
        let rows = self.load(symbol).await?;
        let bars: Vec<OhlcvBar> = rows.iter().map(|r| r.bar).collect();
        Ok(BarPair::from_series(&bars))
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DailyClose>, MarketDataError> {
        let rows = self.load(symbol).await?;
        Ok(window(&rows, period)
            .iter()
            .filter(|r| r.bar.is_valid())
            .map(|r| DailyClose {
                date: r.date,
                close: r.bar.close,
            })
            .collect())
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const CSV: &str = "\
Date,Open,High,Low,Close,Volume
2023-12-28 00:00:00-05:00,194.1,194.6,193.1,193.5,34049900
2023-12-29 00:00:00-05:00,193.9,194.4,191.7,192.5,42628800
2024-01-02 00:00:00-05:00,187.1,188.4,183.8,185.6,82488700
2024-01-03 00:00:00-05:00,184.2,185.8,183.4,184.2,58414500
";

    fn service_with(symbol: &str, contents: &str) -> (TempDir, CsvMarketDataService) {
        let dir = TempDir::new().unwrap();
        let mut file = File::create(dir.path().join(format!("{}_stock_data.csv", symbol))).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let service = CsvMarketDataService::new(dir.path());
        (dir, service)
    }

    #[tokio::test]
    async fn test_latest_bars_are_last_two_rows() {
        let (_dir, service) = service_with("AAPL", CSV);
        let pair = service.get_latest_bars("AAPL").await.unwrap().unwrap();
        assert_eq!(pair.latest.close, 184.2);
        assert_eq!(pair.previous.close, 185.6);
        assert_eq!(pair.latest.volume, 58414500.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let service = CsvMarketDataService::new(dir.path());
        let err = service.get_latest_bars("NOPE").await.unwrap_err();
        assert!(matches!(err, MarketDataError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_history_windows() {
        let (_dir, service) = service_with("AAPL", CSV);

        let five = service
            .get_price_history("AAPL", HistoryPeriod::FiveDays)
            .await
            .unwrap();
        assert_eq!(five.len(), 4);

        let one = service
            .get_price_history("AAPL", HistoryPeriod::OneDay)
            .await
            .unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].date.to_string(), "2024-01-03");

        let ytd = service
            .get_price_history("AAPL", HistoryPeriod::YearToDate)
            .await
            .unwrap();
        assert_eq!(ytd.len(), 2);
        assert_eq!(ytd[0].date.to_string(), "2024-01-02");
    }

    #[tokio::test]
    async fn test_bad_date_is_invalid_data() {
        let (_dir, service) = service_with("BAD", "Date,Open,High,Low,Close,Volume\nyesterday,1,1,1,1,1\n");
        let err = service.get_latest_bars("BAD").await.unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidData { .. }));
    }

    #[tokio::test]
    async fn test_single_row_has_no_pair() {
        let (_dir, service) = service_with(
            "ONE",
            "Date,Open,High,Low,Close,Volume\n2024-01-03,1,2,0.5,1.5,10\n",
        );
        assert!(service.get_latest_bars("ONE").await.unwrap().is_none());
    }
}
