//! Prometheus metrics definitions for Stockcast
//!
//! All metrics use the `stockcast_` prefix and are read-only.

use prometheus::{
    CounterVec, Gauge, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
    core::{AtomicF64, GenericGauge},
};
use std::sync::Arc;

/// Prometheus metrics for the prediction service
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Completed predictions by signal
    pub predictions_total: CounterVec,
    /// Failed predictions by error kind
    pub prediction_errors_total: CounterVec,
    /// Market data fetch latency in seconds
    pub market_data_latency_seconds: HistogramVec,
    /// Last raw log-return produced by each model
    pub model_output_log_return: GaugeVec,
    /// Uptime in seconds
    pub uptime_seconds: GenericGauge<AtomicF64>,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = CounterVec::new(
            Opts::new("stockcast_predictions_total", "Completed predictions by signal"),
            &["signal"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let prediction_errors_total = CounterVec::new(
            Opts::new(
                "stockcast_prediction_errors_total",
                "Failed predictions by error kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(prediction_errors_total.clone()))?;

        let market_data_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "stockcast_market_data_latency_seconds",
                "Market data fetch latency in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["source"],
        )?;
        registry.register(Box::new(market_data_latency_seconds.clone()))?;

        let model_output_log_return = GaugeVec::new(
            Opts::new(
                "stockcast_model_output_log_return",
                "Last predicted log-return per model",
            ),
            &["model"],
        )?;
        registry.register(Box::new(model_output_log_return.clone()))?;

        let uptime_seconds = Gauge::with_opts(Opts::new(
            "stockcast_uptime_seconds",
            "Server uptime in seconds",
        ))?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            prediction_errors_total,
            market_data_latency_seconds,
            model_output_log_return,
            uptime_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Increment completed predictions
    pub fn inc_predictions(&self, signal: &str) {
        self.predictions_total.with_label_values(&[signal]).inc();
    }

    /// Increment failed predictions
    pub fn inc_prediction_errors(&self, kind: &str) {
        self.prediction_errors_total.with_label_values(&[kind]).inc();
    }

    /// Observe market data latency
    pub fn observe_market_data_latency(&self, source: &str, latency: f64) {
        self.market_data_latency_seconds
            .with_label_values(&[source])
            .observe(latency);
    }

    pub fn set_model_output(&self, model: &str, log_return: f64) {
        self.model_output_log_return
            .with_label_values(&[model])
            .set(log_return);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.uptime_seconds.set(1.0);
        assert!(metrics.render().contains("stockcast_"));
    }

    #[test]
    fn test_prediction_counter() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_predictions("STRONG BUY");
        metrics.inc_predictions("STRONG BUY");
        let output = metrics.render();
        assert!(output.contains("stockcast_predictions_total{signal=\"STRONG BUY\"} 2"));
    }

    #[test]
    fn test_error_counter_and_latency() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.inc_prediction_errors("data_unavailable");
        metrics.observe_market_data_latency("yahoo", 0.2);
        let output = metrics.render();
        assert!(output.contains("stockcast_prediction_errors_total{kind=\"data_unavailable\"} 1"));
        assert!(output.contains("stockcast_market_data_latency_seconds_count{source=\"yahoo\"} 1"));
    }

    #[test]
    fn test_model_output_gauge() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.set_model_output("xgboost", 0.25);
        assert!(metrics
            .render()
            .contains("stockcast_model_output_log_return{model=\"xgboost\"} 0.25"));
    }
}
