use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look-back window accepted by the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPeriod {
    OneDay,
    FiveDays,
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl HistoryPeriod {
    pub const ALL: [HistoryPeriod; 11] = [
        HistoryPeriod::OneDay,
        HistoryPeriod::FiveDays,
        HistoryPeriod::OneMonth,
        HistoryPeriod::ThreeMonths,
        HistoryPeriod::SixMonths,
        HistoryPeriod::OneYear,
        HistoryPeriod::TwoYears,
        HistoryPeriod::FiveYears,
        HistoryPeriod::TenYears,
        HistoryPeriod::YearToDate,
        HistoryPeriod::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryPeriod::OneDay => "1d",
            HistoryPeriod::FiveDays => "5d",
            HistoryPeriod::OneMonth => "1mo",
            HistoryPeriod::ThreeMonths => "3mo",
            HistoryPeriod::SixMonths => "6mo",
            HistoryPeriod::OneYear => "1y",
            HistoryPeriod::TwoYears => "2y",
            HistoryPeriod::FiveYears => "5y",
            HistoryPeriod::TenYears => "10y",
            HistoryPeriod::YearToDate => "ytd",
            HistoryPeriod::Max => "max",
        }
    }

    /// Approximate number of daily sessions in the window.
    /// `None` for windows that are not a fixed length (ytd, max).
    pub fn trading_days(&self) -> Option<usize> {
        match self {
            HistoryPeriod::OneDay => Some(1),
            HistoryPeriod::FiveDays => Some(5),
            HistoryPeriod::OneMonth => Some(21),
            HistoryPeriod::ThreeMonths => Some(63),
            HistoryPeriod::SixMonths => Some(126),
            HistoryPeriod::OneYear => Some(252),
            HistoryPeriod::TwoYears => Some(504),
            HistoryPeriod::FiveYears => Some(1260),
            HistoryPeriod::TenYears => Some(2520),
            HistoryPeriod::YearToDate | HistoryPeriod::Max => None,
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        HistoryPeriod::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = HistoryPeriod::ALL.iter().map(|p| p.as_str()).collect();
                format!(
                    "Unsupported period '{}'. Must be one of: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

/// One daily closing price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

/// Chart-ready close series returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
    pub symbol: String,
}

impl PriceHistory {
    pub fn from_closes(symbol: &str, closes: &[DailyClose]) -> Self {
        Self {
            dates: closes
                .iter()
                .map(|c| c.date.format("%Y-%m-%d").to_string())
                .collect(),
            prices: closes.iter().map(|c| c.close).collect(),
            symbol: symbol.to_string(),
        }
    }
}

/// Either a history payload or an error object, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryResponse {
    Success(PriceHistory),
    Failure { error: String },
}

impl HistoryResponse {
    pub fn error(message: impl Into<String>) -> Self {
        HistoryResponse::Failure {
            error: message.into(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            HistoryResponse::Success(_) => None,
            HistoryResponse::Failure { error } => Some(error),
        }
    }
}
