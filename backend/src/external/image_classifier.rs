//! Image Classification Client
//!
//! Client for the hosted image classification model that labels coffee photos.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::{rank_by_confidence, validate_observations, ClassificationObservation};

use crate::config::ClassifierConfig;
use crate::error::{AppError, AppResult};

/// Produces ranked labels for a photo
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    /// Classify a JPEG image. Observations are ranked highest confidence first.
    async fn classify(&self, jpeg: &[u8]) -> AppResult<Vec<ClassificationObservation>>;

    /// Name reported in logs and the health endpoint
    fn name(&self) -> &str;
}

/// Request to classify an image
#[derive(Debug, Serialize)]
pub struct ClassifyImageRequest {
    pub image_base64: String,
    pub max_results: usize,
}

/// Response from the classification API
#[derive(Debug, Deserialize)]
pub struct ClassifyImageResponse {
    pub observations: Vec<WireObservation>,
}

/// A single label as returned by the API
#[derive(Debug, Deserialize)]
pub struct WireObservation {
    pub identifier: String,
    pub confidence: f32,
}

impl From<WireObservation> for ClassificationObservation {
    fn from(w: WireObservation) -> Self {
        ClassificationObservation::new(w.identifier, w.confidence)
    }
}

/// Sort observations highest confidence first and keep the top `top_k`
pub fn rank_observations(
    observations: Vec<WireObservation>,
    top_k: usize,
) -> Vec<ClassificationObservation> {
    let mut ranked: Vec<ClassificationObservation> =
        observations.into_iter().map(Into::into).collect();
    rank_by_confidence(&mut ranked);
    ranked.truncate(top_k);
    ranked
}

/// Client for the classification microservice
#[derive(Clone)]
pub struct HttpImageClassifier {
    api_endpoint: String,
    api_key: String,
    top_k: usize,
    http_client: Client,
}

impl HttpImageClassifier {
    /// Create a new classification client
    pub fn new(config: &ClassifierConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            top_k: config.top_k,
            http_client,
        })
    }
}

#[async_trait]
impl ImageClassifier for HttpImageClassifier {
    async fn classify(&self, jpeg: &[u8]) -> AppResult<Vec<ClassificationObservation>> {
        let request = ClassifyImageRequest {
            image_base64: STANDARD.encode(jpeg),
            max_results: self.top_k,
        };

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AppError::ModelUnavailable
                } else {
                    AppError::ClassifierInvocationFailed(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(AppError::ModelUnavailable);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ClassifierInvocationFailed(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: ClassifyImageResponse = response.json().await.map_err(|e| {
            AppError::ClassifierInvocationFailed(format!("Failed to parse response: {}", e))
        })?;

        let observations = rank_observations(result.observations, self.top_k);
        validate_observations(&observations).map_err(|e| {
            AppError::ClassifierInvocationFailed(format!("Invalid observation: {}", e))
        })?;

        tracing::debug!(
            count = observations.len(),
            top = observations.first().map(|o| o.label.as_str()).unwrap_or(""),
            "Image classified"
        );

        Ok(observations)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Stand-in used when no classification model is configured
#[derive(Clone, Default)]
pub struct UnavailableClassifier;

#[async_trait]
impl ImageClassifier for UnavailableClassifier {
    async fn classify(&self, _jpeg: &[u8]) -> AppResult<Vec<ClassificationObservation>> {
        Err(AppError::ModelUnavailable)
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
