//! Observability for Stockcast
//!
//! 1. **Structured logs**: `tracing` with a pretty or JSON fmt layer
//! 2. **Prometheus metrics**: rendered on the `/metrics` route

pub mod metrics;
pub mod tracing_setup;

pub use metrics::Metrics;
pub use tracing_setup::init_tracing;
