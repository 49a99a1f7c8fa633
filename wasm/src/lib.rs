//! WebAssembly module for Brew Lens
//!
//! Provides client-side computation for:
//! - Coffee type classification from on-device labels
//! - Flavor, brew method and roast lookups
//! - Offline history statistics

use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::engine::*;
pub use shared::models::*;
pub use shared::validation::*;

fn parse_observations(observations_json: &str) -> Result<Vec<ClassificationObservation>, JsValue> {
    let mut observations: Vec<ClassificationObservation> = serde_json::from_str(observations_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid observations JSON: {}", e)))?;
    validate_observations(&observations).map_err(JsValue::from_str)?;
    rank_by_confidence(&mut observations);
    Ok(observations)
}

fn timestamp(timestamp_ms: f64) -> Result<DateTime<Utc>, JsValue> {
    DateTime::from_timestamp_millis(timestamp_ms as i64)
        .ok_or_else(|| JsValue::from_str("Timestamp out of range"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Classify ranked observations, returning the coffee type identifier
#[wasm_bindgen]
pub fn classify_observations(observations_json: &str) -> Result<String, JsValue> {
    let observations = parse_observations(observations_json)?;
    Ok(map_classification_to_coffee_type(&observations)
        .as_str()
        .to_string())
}

/// Run the full analysis on ranked observations.
///
/// `seed` drives the id and origin draw; `timestamp_ms` is the analysis time
/// in milliseconds since the Unix epoch.
#[wasm_bindgen]
pub fn analyze_observations(
    observations_json: &str,
    seed: u64,
    timestamp_ms: f64,
) -> Result<String, JsValue> {
    let observations = parse_observations(observations_json)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let coffee = analyze(&observations, None, &mut rng, timestamp(timestamp_ms)?);
    to_json(&coffee)
}

/// Confidence tier label, e.g. "High confidence"
#[wasm_bindgen]
pub fn confidence_tier(confidence: f32) -> String {
    ConfidenceTier::from_confidence(confidence).label().to_string()
}

/// Flavor profile of a coffee type as JSON
#[wasm_bindgen]
pub fn flavor_profile(coffee_type: &str) -> Result<String, JsValue> {
    let coffee_type: CoffeeType = coffee_type
        .parse()
        .map_err(|e: ParseCoffeeError| JsValue::from_str(&e.to_string()))?;
    to_json(&flavor_profile_for(coffee_type))
}

/// Suggested brew method for a coffee type
#[wasm_bindgen]
pub fn brew_method(coffee_type: &str) -> Result<String, JsValue> {
    let coffee_type: CoffeeType = coffee_type
        .parse()
        .map_err(|e: ParseCoffeeError| JsValue::from_str(&e.to_string()))?;
    Ok(brew_method_for(coffee_type).to_string())
}

/// Roast estimate from ranked observations
#[wasm_bindgen]
pub fn estimate_roast(observations_json: &str) -> Result<String, JsValue> {
    let observations = parse_observations(observations_json)?;
    Ok(estimate_roast_level(&observations).as_str().to_string())
}

/// Profile statistics over a JSON array of analyses
#[wasm_bindgen]
pub fn compute_statistics(history_json: &str, now_ms: f64) -> Result<String, JsValue> {
    let history: Vec<AnalyzedCoffee> = serde_json::from_str(history_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid history JSON: {}", e)))?;
    to_json(&HistoryStatistics::compute(&history, timestamp(now_ms)?))
}
