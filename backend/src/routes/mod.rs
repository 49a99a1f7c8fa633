//! Route definitions for Brew Lens

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/analyses", analysis_routes())
        .nest("/history", history_routes())
        .route("/statistics", get(handlers::get_statistics))
        .nest("/catalog", catalog_routes())
}

/// Photo analysis routes
fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_analysis))
        .route("/status", get(handlers::get_analysis_status))
}

/// Analysis history routes
fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_history).delete(handlers::clear_history))
        .route("/export", get(handlers::export_history))
        .route(
            "/:id",
            get(handlers::get_history_entry)
                .patch(handlers::update_history_entry)
                .delete(handlers::delete_history_entry),
        )
        .route("/:id/image", get(handlers::get_history_image))
}

/// Static reference data routes
fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/coffee-types", get(handlers::list_coffee_types))
        .route("/categories", get(handlers::list_coffee_categories))
        .route("/roast-levels", get(handlers::list_roast_levels))
}
