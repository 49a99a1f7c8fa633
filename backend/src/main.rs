//! Brew Lens - Backend Server
//!
//! Photograph a coffee, get its type, flavor profile, brew method and
//! recommendations, and keep a history of past analyses.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::{HttpImageClassifier, ImageClassifier, UnavailableClassifier};
use services::{AnalysisService, HistoryStore};

/// Multipart framing overhead allowed on top of the image limit
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analysis: AnalysisService,
    pub history: HistoryStore,
}

impl AppState {
    /// Wire the analysis session around a classifier
    pub fn new(config: Config, classifier: Arc<dyn ImageClassifier>) -> Self {
        let history = HistoryStore::new();
        let analysis = AnalysisService::new(classifier, history.clone(), config.analysis.clone());
        Self {
            config: Arc::new(config),
            analysis,
            history,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brew_lens_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Brew Lens Server");
    tracing::info!("Environment: {}", config.environment);

    let classifier: Arc<dyn ImageClassifier> = if config.classifier.is_configured() {
        tracing::info!("Using image classifier at {}", config.classifier.endpoint);
        Arc::new(HttpImageClassifier::new(&config.classifier)?)
    } else {
        tracing::warn!("No classifier endpoint configured; analyses will report the model as unavailable");
        Arc::new(UnavailableClassifier)
    };

    // Create application state
    let state = AppState::new(config.clone(), classifier);

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server.host {}: {}", config.server.host, e))?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = upload_body_limit(&state.config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Request body limit for photo uploads
fn upload_body_limit(config: &Config) -> usize {
    config
        .analysis
        .max_image_bytes
        .saturating_add(UPLOAD_OVERHEAD_BYTES)
}

/// Root endpoint
async fn root() -> &'static str {
    "Brew Lens API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use shared::ClassificationObservation;
    use tower::ServiceExt;

    use crate::services::analysis::test_support::FixedClassifier;
    use crate::services::image::test_support::png_bytes;

    const BOUNDARY: &str = "brewlensboundary";

    fn app_with(observations: Vec<ClassificationObservation>) -> (Router, AppState) {
        let state = AppState::new(Config::default(), Arc::new(FixedClassifier(observations)));
        (create_app(state.clone()), state)
    }

    fn multipart_body(field: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"coffee.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload(field: &str, bytes: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(field, bytes)))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upload_analyzes_and_records() {
        let (app, state) = app_with(vec![
            ClassificationObservation::new("espresso", 0.91),
            ClassificationObservation::new("cup", 0.3),
        ]);

        let response = app.clone().oneshot(upload("image", &png_bytes())).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["coffee_type"], "espresso");
        assert_eq!(body["display_name"], "Espresso");
        assert_eq!(body["confidence_tier"], "high");
        assert_eq!(body["has_image"], true);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
        assert!(body.get("image_data").is_none());
        assert_eq!(state.history.len().await, 1);

        let id = body["id"].as_str().unwrap().to_string();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/history/{}/image", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");
    }

    #[tokio::test]
    async fn test_upload_without_image_field() {
        let (app, _) = app_with(vec![ClassificationObservation::new("espresso", 0.9)]);
        let response = app.oneshot(upload("photo", &png_bytes())).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "MISSING_IMAGE");
    }

    #[tokio::test]
    async fn test_upload_unreadable_image() {
        let (app, _) = app_with(vec![ClassificationObservation::new("espresso", 0.9)]);
        let response = app.oneshot(upload("image", b"garbage")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "IMAGE_UNREADABLE");
        assert!(body["error"]["suggestion"].is_string());
    }

    #[tokio::test]
    async fn test_model_unavailable() {
        let state = AppState::new(Config::default(), Arc::new(UnavailableClassifier));
        let app = create_app(state);
        let response = app.oneshot(upload("image", &png_bytes())).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_rate_and_list_history() {
        let (app, _) = app_with(vec![ClassificationObservation::new("latte", 0.66)]);
        let created = json_body(app.clone().oneshot(upload("image", &png_bytes())).await.unwrap()).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/v1/history/{}", id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"rating":4.5,"notes":"Silky"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = json_body(response).await;
        assert_eq!(updated["rating"], 4.5);
        assert_eq!(updated["notes"], "Silky");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/history?min_rating=4&category=milk_based")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = json_body(response).await;
        assert_eq!(page["pagination"]["total_items"], 1);
        assert_eq!(page["data"][0]["display_name"], "Latte");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/statistics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let stats = json_body(response).await;
        assert_eq!(stats["total_analyses"], 1);
        assert_eq!(stats["favorite_coffee_type"], "latte");
        assert_eq!(stats["average_rating"], 4.5);
    }

    #[tokio::test]
    async fn test_invalid_rating_rejected() {
        let (app, _) = app_with(vec![ClassificationObservation::new("mocha", 0.7)]);
        let created = json_body(app.clone().oneshot(upload("image", &png_bytes())).await.unwrap()).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri(format!("/api/v1/history/{}", id))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"rating":9}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["field"], "rating");
    }

    #[tokio::test]
    async fn test_unknown_history_entry() {
        let (app, _) = app_with(vec![]);
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/history/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_catalog_lists_every_type() {
        let (app, _) = app_with(vec![]);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/catalog/coffee-types")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 21);
    }

    #[tokio::test]
    async fn test_catalog_groups_types_by_category() {
        let (app, _) = app_with(vec![]);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/catalog/categories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let categories = body.as_array().unwrap();
        assert_eq!(categories.len(), 6);

        let grouped: usize = categories
            .iter()
            .map(|c| c["coffee_types"].as_array().unwrap().len())
            .sum();
        assert_eq!(grouped, 21);

        let specialty = categories
            .iter()
            .find(|c| c["category"] == "specialty")
            .unwrap();
        let types = specialty["coffee_types"].as_array().unwrap();
        assert!(types.iter().any(|t| *t == "affogato"));
        assert!(types.iter().any(|t| *t == "vietnamese"));
    }

    #[test]
    fn test_upload_body_limit_saturates() {
        let mut config = Config::default();
        assert_eq!(
            upload_body_limit(&config),
            config.analysis.max_image_bytes + UPLOAD_OVERHEAD_BYTES
        );

        config.analysis.max_image_bytes = usize::MAX;
        assert_eq!(upload_body_limit(&config), usize::MAX);
    }
}
