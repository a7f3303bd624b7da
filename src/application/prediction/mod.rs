pub mod history_service;
pub mod reconstructor;
pub mod service;
pub mod signal;

pub use history_service::HistoryService;
pub use reconstructor::reconstruct_prices;
pub use service::PredictionService;
pub use signal::determine_recommendation;
