//! Analysis result models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CoffeeType, FlavorProfile, RoastLevel};

/// Maximum rating a user can give an analysis
pub const MAX_RATING: f64 = 5.0;

/// A single label reported by the image classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationObservation {
    pub label: String,
    /// 0.0-1.0
    pub confidence: f32,
}

impl ClassificationObservation {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// How much trust to place in a classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Above 0.8
    High,
    /// Above 0.5
    Moderate,
    Low,
}

impl ConfidenceTier {
    /// Both thresholds are exclusive: 0.8 is Moderate, 0.5 is Low
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > 0.8 {
            ConfidenceTier::High
        } else if confidence > 0.5 {
            ConfidenceTier::Moderate
        } else {
            ConfidenceTier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "High confidence",
            ConfidenceTier::Moderate => "Moderate confidence",
            ConfidenceTier::Low => "Low confidence",
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The complete result of analyzing one coffee photo
///
/// Only `notes` and `rating` change after creation, and only through
/// [`AnalyzedCoffee::with_notes`] and [`AnalyzedCoffee::with_rating`], which
/// return an updated copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzedCoffee {
    pub id: Uuid,
    /// JPEG-encoded photo; never serialized with the record
    #[serde(skip)]
    pub image_data: Option<Vec<u8>>,
    pub coffee_type: CoffeeType,
    pub confidence: f32,
    pub analysis_date: DateTime<Utc>,
    pub brew_method: Option<String>,
    pub roast_level: RoastLevel,
    pub notes: String,
    pub recommendations: Vec<String>,
    pub flavor_profile: FlavorProfile,
    pub origin: Option<String>,
    pub rating: Option<f64>,
    pub analysis_summary: String,
}

impl AnalyzedCoffee {
    pub fn confidence_tier(&self) -> ConfidenceTier {
        ConfidenceTier::from_confidence(self.confidence)
    }

    pub fn has_image(&self) -> bool {
        self.image_data.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// Copy of this analysis with the user's notes replaced
    pub fn with_notes(&self, notes: impl Into<String>) -> Self {
        Self {
            notes: notes.into(),
            ..self.clone()
        }
    }

    /// Copy of this analysis with the rating replaced, clamped to 0-5
    pub fn with_rating(&self, rating: Option<f64>) -> Self {
        Self {
            rating: rating.map(|r| r.clamp(0.0, MAX_RATING)),
            ..self.clone()
        }
    }
}
