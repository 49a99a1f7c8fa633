//! HTTP handlers for coffee photo analysis

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shared::{AnalyzedCoffee, BrewingTemperature, CoffeeCategory, ConfidenceTier};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Multipart field carrying the photo
const IMAGE_FIELD: &str = "image";

/// Analysis record enriched with display data for the result screen
#[derive(Debug, Serialize)]
pub struct AnalysisView {
    #[serde(flatten)]
    pub coffee: AnalyzedCoffee,
    pub display_name: String,
    pub description: String,
    pub emoji: String,
    pub category: CoffeeCategory,
    pub confidence_tier: ConfidenceTier,
    pub roast_description: String,
    pub brewing_temperature: BrewingTemperature,
    pub has_image: bool,
}

impl From<AnalyzedCoffee> for AnalysisView {
    fn from(coffee: AnalyzedCoffee) -> Self {
        let t = coffee.coffee_type;
        AnalysisView {
            display_name: t.display_name().to_string(),
            description: t.description().to_string(),
            emoji: t.emoji().to_string(),
            category: t.category(),
            confidence_tier: coffee.confidence_tier(),
            roast_description: coffee.roast_level.description().to_string(),
            brewing_temperature: coffee.roast_level.brewing_temperature(),
            has_image: coffee.has_image(),
            coffee,
        }
    }
}

#[derive(Serialize)]
pub struct AnalysisStatus {
    pub is_analyzing: bool,
}

/// Analyze an uploaded coffee photo
pub async fn create_analysis(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<AnalysisView>)> {
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(IMAGE_FIELD, format!("Malformed upload: {}", e)))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(IMAGE_FIELD, format!("Malformed upload: {}", e)))?;
            image = Some(bytes.to_vec());
        }
    }

    let image = image.ok_or(AppError::MissingImage)?;
    let coffee = state.analysis.analyze(image).await?;
    Ok((StatusCode::CREATED, Json(coffee.into())))
}

/// Report whether an analysis is currently running
pub async fn get_analysis_status(State(state): State<AppState>) -> Json<AnalysisStatus> {
    Json(AnalysisStatus {
        is_analyzing: state.analysis.is_analyzing(),
    })
}
