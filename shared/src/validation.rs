//! Validation utilities for Brew Lens

use crate::models::{ClassificationObservation, MAX_RATING};

/// Maximum length of the free-text notes attached to an analysis
pub const MAX_NOTES_LENGTH: usize = 2000;

// ============================================================================
// Classification Validations
// ============================================================================

/// Validate a confidence value lies within 0.0-1.0
pub fn validate_confidence(confidence: f32) -> Result<(), &'static str> {
    if confidence.is_nan() {
        return Err("Confidence must be a number");
    }
    if !(0.0..=1.0).contains(&confidence) {
        return Err("Confidence must be between 0 and 1");
    }
    Ok(())
}

/// Validate classifier output before it reaches the engine
pub fn validate_observations(observations: &[ClassificationObservation]) -> Result<(), &'static str> {
    for observation in observations {
        if observation.label.trim().is_empty() {
            return Err("Observation label cannot be empty");
        }
        validate_confidence(observation.confidence)?;
    }
    Ok(())
}

/// Check observations are ranked highest confidence first
pub fn is_ranked(observations: &[ClassificationObservation]) -> bool {
    observations
        .windows(2)
        .all(|pair| pair[0].confidence >= pair[1].confidence)
}

// ============================================================================
// User Input Validations
// ============================================================================

/// Validate a user rating (0-5, fractional ratings allowed)
pub fn validate_rating(rating: f64) -> Result<(), &'static str> {
    if rating.is_nan() {
        return Err("Rating must be a number");
    }
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err("Rating must be between 0 and 5");
    }
    Ok(())
}

/// Validate user notes length
pub fn validate_notes(notes: &str) -> Result<(), &'static str> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err("Notes must be at most 2000 characters");
    }
    Ok(())
}
