//! Business logic services for Brew Lens

pub mod analysis;
pub mod history;
pub mod image;

pub use analysis::AnalysisService;
pub use history::{HistoryStore, HistoryUpdate};
