//! HTTP request handlers

pub mod analysis;
pub mod catalog;
pub mod health;
pub mod history;
pub mod statistics;

pub use analysis::{create_analysis, get_analysis_status};
pub use catalog::{list_coffee_categories, list_coffee_types, list_roast_levels};
pub use health::health_check;
pub use history::{
    clear_history, delete_history_entry, export_history, get_history_entry, get_history_image,
    list_history, update_history_entry,
};
pub use statistics::get_statistics;
