//! Coffee photo analysis service
//!
//! Runs one photo through intake, classification and the attribute engine,
//! then records the result in the history. Only one analysis runs at a time;
//! a request arriving while another is in flight is rejected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use shared::{AnalyzedCoffee, ConfidenceTier};

use crate::config::AnalysisConfig;
use crate::error::{AppError, AppResult};
use crate::external::ImageClassifier;
use crate::services::history::HistoryStore;
use crate::services::image::prepare_image_blocking;

/// Analysis service shared by all handlers
#[derive(Clone)]
pub struct AnalysisService {
    classifier: Arc<dyn ImageClassifier>,
    history: HistoryStore,
    in_flight: Arc<AtomicBool>,
    config: AnalysisConfig,
}

/// Clears the in-flight flag when the analysis finishes or is dropped
struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag: flag.clone() })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl AnalysisService {
    pub fn new(
        classifier: Arc<dyn ImageClassifier>,
        history: HistoryStore,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            classifier,
            history,
            in_flight: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Analyze an uploaded photo and prepend the result to the history.
    ///
    /// Dropping the returned future abandons the analysis and releases the
    /// in-flight slot; nothing is recorded in that case.
    pub async fn analyze(&self, image_bytes: Vec<u8>) -> AppResult<AnalyzedCoffee> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            tracing::warn!("Rejected analysis: another analysis is in progress");
            AppError::AnalysisInProgress
        })?;

        let upload_size = image_bytes.len();
        let jpeg = prepare_image_blocking(
            image_bytes,
            self.config.jpeg_quality,
            self.config.max_image_bytes,
        )
        .await?;
        tracing::debug!(upload_size, jpeg_size = jpeg.len(), "Photo prepared");

        let observations = self.classifier.classify(&jpeg).await?;
        if observations.is_empty() {
            return Err(AppError::NoResultsFound);
        }

        let coffee = shared::analyze(&observations, Some(jpeg), &mut rand::thread_rng(), Utc::now());

        tracing::info!(
            analysis_id = %coffee.id,
            coffee_type = coffee.coffee_type.as_str(),
            confidence = coffee.confidence,
            high_confidence = coffee.confidence_tier() == ConfidenceTier::High,
            "Coffee analyzed"
        );

        self.history.add(coffee.clone()).await;
        Ok(coffee)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::services::image::test_support::png_bytes;
    use shared::{ClassificationObservation, CoffeeType, HistoryFilter, HistorySort, RoastLevel};
    use tokio::sync::Notify;

    fn service(classifier: Arc<dyn ImageClassifier>) -> (AnalysisService, HistoryStore) {
        let history = HistoryStore::new();
        let service = AnalysisService::new(classifier, history.clone(), AnalysisConfig::default());
        (service, history)
    }

    #[tokio::test]
    async fn test_analyze_records_result() {
        let (service, history) = service(Arc::new(FixedClassifier(vec![
            ClassificationObservation::new("coffee mug", 0.72),
            ClassificationObservation::new("milk", 0.2),
            ClassificationObservation::new("dark roast", 0.05),
        ])));

        let coffee = service.analyze(png_bytes()).await.unwrap();
        assert_eq!(coffee.coffee_type, CoffeeType::Latte);
        assert_eq!(coffee.roast_level, RoastLevel::Dark);
        assert_eq!(coffee.confidence, 0.72);
        assert!(coffee.has_image());
        assert!(!service.is_analyzing());

        let stored = history.list(&HistoryFilter::default(), HistorySort::Newest).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, coffee.id);
    }

    #[tokio::test]
    async fn test_zero_results_is_an_error() {
        let (service, history) = service(Arc::new(FixedClassifier(vec![])));
        let result = service.analyze(png_bytes()).await;
        assert!(matches!(result, Err(AppError::NoResultsFound)));
        assert!(history.is_empty().await);
        assert!(!service.is_analyzing());
    }

    #[tokio::test]
    async fn test_unreadable_image() {
        let (service, history) = service(Arc::new(FixedClassifier(vec![
            ClassificationObservation::new("espresso", 0.9),
        ])));
        let result = service.analyze(b"not a photo".to_vec()).await;
        assert!(matches!(result, Err(AppError::ImageUnreadable)));
        assert!(history.is_empty().await);
    }

    #[tokio::test]
    async fn test_classifier_failure_propagates() {
        let (service, history) = service(Arc::new(FailingClassifier));
        let result = service.analyze(png_bytes()).await;
        assert!(matches!(result, Err(AppError::ClassifierInvocationFailed(_))));
        assert!(history.is_empty().await);
        assert!(!service.is_analyzing());
    }

    #[tokio::test]
    async fn test_concurrent_request_rejected() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let (service, history) = service(Arc::new(GatedClassifier {
            entered: entered.clone(),
            release: release.clone(),
        }));

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.analyze(png_bytes()).await })
        };
        entered.notified().await;
        assert!(service.is_analyzing());

        let second = service.analyze(png_bytes()).await;
        assert!(matches!(second, Err(AppError::AnalysisInProgress)));

        release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.coffee_type, CoffeeType::Espresso);
        assert!(!service.is_analyzing());
        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn test_dropped_analysis_releases_slot() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let (service, history) = service(Arc::new(GatedClassifier {
            entered: entered.clone(),
            release,
        }));

        let handle = {
            let service = service.clone();
            tokio::spawn(async move { service.analyze(png_bytes()).await })
        };
        entered.notified().await;
        handle.abort();
        let _ = handle.await;

        assert!(!service.is_analyzing());
        assert!(history.is_empty().await);
    }
}
