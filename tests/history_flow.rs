mod support;

use std::sync::Arc;
use std::time::Duration;
use stockcast::application::prediction::HistoryService;
use stockcast::domain::market::history::HistoryResponse;
use stockcast::infrastructure::mock::MockMarketDataService;
use support::bar;

const DAY: i64 = 86_400;
const MONDAY: i64 = 1_709_510_400; // 2024-03-04 00:00 UTC

fn daily_bars(count: usize) -> Vec<stockcast::domain::market::bar::OhlcvBar> {
    (0..count)
        .map(|i| {
            let close = 170.0 + i as f64;
            bar(MONDAY + i as i64 * DAY, close, close + 1.0, close - 1.0, close, 1e6)
        })
        .collect()
}

fn service(mock: MockMarketDataService, timeout: Duration) -> HistoryService {
    HistoryService::new(Arc::new(mock), timeout)
}

#[tokio::test]
async fn test_default_period_is_one_month() {
    let mock = MockMarketDataService::new().with_bars("AAPL", daily_bars(40));

    let response = service(mock, Duration::from_secs(1))
        .get_history("aapl", None)
        .await;

    let HistoryResponse::Success(history) = response else {
        panic!("expected history, got {:?}", response);
    };
    assert_eq!(history.symbol, "AAPL");
    assert_eq!(history.prices.len(), 21);
    assert_eq!(history.dates.len(), 21);
    assert_eq!(history.prices.last().copied(), Some(209.0));
}

#[tokio::test]
async fn test_invalid_period() {
    let mock = MockMarketDataService::new().with_bars("AAPL", daily_bars(5));
    let response = service(mock.clone(), Duration::from_secs(1))
        .get_history("AAPL", Some("fortnight"))
        .await;

    assert!(response.error_message().unwrap().contains("Unsupported period 'fortnight'"));
    assert_eq!(mock.fetch_count(), 0);
}

#[tokio::test]
async fn test_unknown_symbol() {
    let response = service(MockMarketDataService::new(), Duration::from_secs(1))
        .get_history("NOPE", Some("1y"))
        .await;

    assert_eq!(response.error_message(), Some("No historical data found"));
}

#[tokio::test]
async fn test_timeout() {
    let mock = MockMarketDataService::new()
        .with_bars("AAPL", daily_bars(5))
        .with_delay(Duration::from_millis(300));

    let response = service(mock, Duration::from_millis(20))
        .get_history("AAPL", Some("5d"))
        .await;

    assert_eq!(response.error_message(), Some("Service timeout after 20ms"));
}
