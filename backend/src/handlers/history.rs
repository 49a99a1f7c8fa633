//! HTTP handlers for the analysis history

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    CoffeeCategory, CoffeeType, HistoryEntry, HistoryFilter, HistorySort, PaginatedResponse,
    Pagination,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::analysis::AnalysisView;
use crate::services::HistoryUpdate;
use crate::AppState;

/// Query parameters for listing and exporting the history
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub category: Option<String>,
    pub coffee_type: Option<String>,
    pub min_confidence: Option<f32>,
    pub min_rating: Option<f64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub sort: Option<String>, // "newest", "oldest", "confidence", "rating", "name"
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl HistoryQuery {
    fn filter_and_sort(&self) -> AppResult<(HistoryFilter, HistorySort)> {
        let category = self
            .category
            .as_deref()
            .map(str::parse::<CoffeeCategory>)
            .transpose()
            .map_err(|e| AppError::validation("category", e.to_string()))?;
        let coffee_type = self
            .coffee_type
            .as_deref()
            .map(str::parse::<CoffeeType>)
            .transpose()
            .map_err(|e| AppError::validation("coffee_type", e.to_string()))?;
        let sort = self
            .sort
            .as_deref()
            .map(str::parse::<HistorySort>)
            .transpose()
            .map_err(|e| AppError::validation("sort", e.to_string()))?
            .unwrap_or_default();

        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(AppError::validation("from", "Start date must be before end date"));
            }
        }

        let filter = HistoryFilter {
            category,
            coffee_type,
            min_confidence: self.min_confidence,
            min_rating: self.min_rating,
            from: self.from,
            to: self.to,
            search: self.search.clone(),
        };
        Ok((filter, sort))
    }
}

/// Input for updating notes and rating on an analysis
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateHistoryInput {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    /// Remove an existing rating
    #[serde(default)]
    pub clear_rating: bool,
}

#[derive(Serialize)]
pub struct ClearHistoryResponse {
    pub removed: usize,
}

/// List the history with filters, sorting and pagination
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<PaginatedResponse<HistoryEntry>>> {
    let (filter, sort) = query.filter_and_sort()?;
    let entries: Vec<HistoryEntry> = state
        .history
        .list(&filter, sort)
        .await
        .iter()
        .map(HistoryEntry::from)
        .collect();

    let pagination = Pagination::from_query(query.page, query.per_page);
    Ok(Json(pagination.paginate(&entries)))
}

/// Export the filtered history as CSV
pub async fn export_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let (filter, sort) = query.filter_and_sort()?;
    let csv = state.history.export_csv(&filter, sort).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"coffee_history.csv\"",
            ),
        ],
        csv,
    ))
}

/// Get one analysis by ID
pub async fn get_history_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AnalysisView>> {
    let coffee = state.history.get(id).await?;
    Ok(Json(coffee.into()))
}

/// Get the stored JPEG of an analysis
pub async fn get_history_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let coffee = state.history.get(id).await?;
    let image = coffee
        .image_data
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::NotFound("Image".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], image))
}

/// Update notes and/or rating
pub async fn update_history_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateHistoryInput>,
) -> AppResult<Json<AnalysisView>> {
    input.validate()?;

    let rating = if input.clear_rating {
        Some(None)
    } else {
        input.rating.map(Some)
    };
    let coffee = state
        .history
        .update(
            id,
            HistoryUpdate {
                notes: input.notes,
                rating,
            },
        )
        .await?;
    Ok(Json(coffee.into()))
}

/// Delete one analysis
pub async fn delete_history_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.history.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the whole history
pub async fn clear_history(State(state): State<AppState>) -> Json<ClearHistoryResponse> {
    let removed = state.history.clear().await;
    tracing::info!(removed, "History cleared");
    Json(ClearHistoryResponse { removed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parses_enums() {
        let query = HistoryQuery {
            category: Some("milk_based".to_string()),
            coffee_type: Some("Flat White".to_string()),
            sort: Some("rating".to_string()),
            ..Default::default()
        };
        let (filter, sort) = query.filter_and_sort().unwrap();
        assert_eq!(filter.category, Some(CoffeeCategory::MilkBased));
        assert_eq!(filter.coffee_type, Some(CoffeeType::FlatWhite));
        assert_eq!(sort, HistorySort::Rating);
    }

    #[test]
    fn test_query_rejects_unknown_values() {
        let query = HistoryQuery {
            category: Some("decaf".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.filter_and_sort(),
            Err(AppError::Validation { ref field, .. }) if field == "category"
        ));

        let query = HistoryQuery {
            sort: Some("random".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.filter_and_sort(),
            Err(AppError::Validation { ref field, ref message })
                if field == "sort" && message == "unrecognised sort order: random"
        ));
    }

    #[test]
    fn test_query_rejects_inverted_range() {
        let now = Utc::now();
        let query = HistoryQuery {
            from: Some(now),
            to: Some(now - chrono::Duration::days(1)),
            ..Default::default()
        };
        assert!(query.filter_and_sort().is_err());
    }

    #[test]
    fn test_update_input_validation() {
        let input = UpdateHistoryInput {
            notes: None,
            rating: Some(6.0),
            clear_rating: false,
        };
        assert!(input.validate().is_err());

        let input = UpdateHistoryInput {
            notes: Some("Nutty".to_string()),
            rating: Some(4.5),
            clear_rating: false,
        };
        assert!(input.validate().is_ok());
    }
}
