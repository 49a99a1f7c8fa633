//! In-memory analysis history
//!
//! Newest analyses first, no deduplication and no size bound. Records are
//! never edited in place: updates swap in a modified copy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    apply_filter_and_sort, validate_notes, validate_rating, AnalyzedCoffee, HistoryFilter,
    HistorySort, HistoryStatistics,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Shared handle to the analysis history
#[derive(Clone, Default)]
pub struct HistoryStore {
    entries: Arc<RwLock<Vec<AnalyzedCoffee>>>,
}

/// User-editable fields of an analysis
#[derive(Debug, Default)]
pub struct HistoryUpdate {
    pub notes: Option<String>,
    /// `Some(None)` clears the rating
    pub rating: Option<Option<f64>>,
}

/// One row of the CSV export
#[derive(Debug, Serialize)]
pub struct HistoryExportRow {
    pub id: Uuid,
    pub analysis_date: DateTime<Utc>,
    pub coffee_type: String,
    pub confidence: f32,
    pub roast_level: String,
    pub brew_method: String,
    pub origin: String,
    pub rating: Option<f64>,
    pub notes: String,
}

impl From<&AnalyzedCoffee> for HistoryExportRow {
    fn from(c: &AnalyzedCoffee) -> Self {
        HistoryExportRow {
            id: c.id,
            analysis_date: c.analysis_date,
            coffee_type: c.coffee_type.display_name().to_string(),
            confidence: c.confidence,
            roast_level: c.roast_level.to_string(),
            brew_method: c.brew_method.clone().unwrap_or_default(),
            origin: c.origin.clone().unwrap_or_default(),
            rating: c.rating,
            notes: c.notes.clone(),
        }
    }
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an analysis
    pub async fn add(&self, coffee: AnalyzedCoffee) {
        let mut entries = self.entries.write().await;
        entries.insert(0, coffee);
    }

    pub async fn get(&self, id: Uuid) -> AppResult<AnalyzedCoffee> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Analysis".to_string()))
    }

    /// Filtered, sorted copy of the history
    pub async fn list(&self, filter: &HistoryFilter, sort: HistorySort) -> Vec<AnalyzedCoffee> {
        let entries = self.entries.read().await;
        apply_filter_and_sort(&entries, filter, sort)
    }

    /// Replace notes and/or rating on an analysis
    pub async fn update(&self, id: Uuid, update: HistoryUpdate) -> AppResult<AnalyzedCoffee> {
        if let Some(notes) = update.notes.as_deref() {
            validate_notes(notes).map_err(|e| AppError::validation("notes", e))?;
        }
        if let Some(Some(rating)) = update.rating {
            validate_rating(rating).map_err(|e| AppError::validation("rating", e))?;
        }

        let mut entries = self.entries.write().await;
        let slot = entries
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("Analysis".to_string()))?;

        let mut updated = slot.clone();
        if let Some(notes) = update.notes {
            updated = updated.with_notes(notes);
        }
        if let Some(rating) = update.rating {
            updated = updated.with_rating(rating);
        }
        *slot = updated.clone();

        tracing::info!(analysis_id = %id, "Analysis updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|c| c.id != id);
        if entries.len() == before {
            return Err(AppError::NotFound("Analysis".to_string()));
        }
        Ok(())
    }

    /// Remove every analysis, returning how many were removed
    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn statistics(&self, now: DateTime<Utc>) -> HistoryStatistics {
        let entries = self.entries.read().await;
        HistoryStatistics::compute(&entries, now)
    }

    /// Export the filtered history as CSV
    pub async fn export_csv(&self, filter: &HistoryFilter, sort: HistorySort) -> AppResult<String> {
        let rows: Vec<HistoryExportRow> = self
            .list(filter, sort)
            .await
            .iter()
            .map(HistoryExportRow::from)
            .collect();

        let mut wtr = csv::Writer::from_writer(vec![]);
        for row in &rows {
            wtr.serialize(row)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::{analyze, ClassificationObservation, CoffeeType};

    fn coffee(label: &str, seed: u64, minutes_ago: i64) -> AnalyzedCoffee {
        analyze(
            &[ClassificationObservation::new(label, 0.9)],
            None,
            &mut StdRng::seed_from_u64(seed),
            Utc::now() - Duration::minutes(minutes_ago),
        )
    }

    #[tokio::test]
    async fn test_add_prepends() {
        let store = HistoryStore::new();
        store.add(coffee("espresso", 1, 10)).await;
        store.add(coffee("latte", 2, 0)).await;

        let all = store.list(&HistoryFilter::default(), HistorySort::Newest).await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].coffee_type, CoffeeType::Latte);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let store = HistoryStore::new();
        let c = coffee("espresso", 1, 0);
        store.add(c.clone()).await;
        store.add(c).await;
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_replaces_notes_and_rating() {
        let store = HistoryStore::new();
        let c = coffee("mocha", 3, 0);
        let id = c.id;
        store.add(c).await;

        let updated = store
            .update(
                id,
                HistoryUpdate {
                    notes: Some("Great with cake".to_string()),
                    rating: Some(Some(4.0)),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.notes, "Great with cake");
        assert_eq!(updated.rating, Some(4.0));

        let cleared = store
            .update(
                id,
                HistoryUpdate {
                    notes: None,
                    rating: Some(None),
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.notes, "Great with cake");
        assert!(cleared.rating.is_none());
        assert_eq!(store.get(id).await.unwrap(), cleared);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_rating() {
        let store = HistoryStore::new();
        let c = coffee("latte", 4, 0);
        let id = c.id;
        store.add(c).await;

        let result = store
            .update(
                id,
                HistoryUpdate {
                    notes: None,
                    rating: Some(Some(7.0)),
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert!(store.get(id).await.unwrap().rating.is_none());
    }

    #[tokio::test]
    async fn test_missing_entry() {
        let store = HistoryStore::new();
        assert!(matches!(
            store.get(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = HistoryStore::new();
        let a = coffee("espresso", 1, 0);
        let id = a.id;
        store.add(a).await;
        store.add(coffee("latte", 2, 0)).await;

        store.delete(id).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert_eq!(store.clear().await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_export_csv_has_header_and_rows() {
        let store = HistoryStore::new();
        store.add(coffee("espresso", 1, 0)).await;
        store.add(coffee("latte", 2, 0)).await;

        let csv = store
            .export_csv(&HistoryFilter::default(), HistorySort::Newest)
            .await
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,analysis_date,coffee_type"));
        assert!(csv.contains("Espresso"));
    }
}
