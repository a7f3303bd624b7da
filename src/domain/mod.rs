// Market data domain
pub mod market;

// Feature registry and model identifiers
pub mod ml;

// Prediction results
pub mod prediction;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
