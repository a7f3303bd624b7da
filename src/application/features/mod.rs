//! Feature derivation.
//!
//! Two transforms live here and they are deliberately NOT interchangeable:
//!
//! - [`live`] builds the inference vector from a single pair of bars
//!   (one-bar log-return, intrabar momentum/volatility/spread).
//! - [`training`] reproduces the transform the stored models were fitted on
//!   (5-bar log-return target, percent-change momentum, rolling volatility).
//!
//! The two disagree on what the second, third and fourth columns mean. That
//! is a known train/serve skew of the current model artifacts; changing
//! either side requires refitting the scaler and all three models.

pub mod live;
pub mod training;

pub use live::{derive_live_features, live_log_return};
pub use training::{TrainingRow, derive_training_features};
