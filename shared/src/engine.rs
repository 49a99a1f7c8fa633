//! Coffee classification and attribute derivation
//!
//! Maps the ranked labels of an image classifier onto the coffee taxonomy and
//! derives the flavor profile, roast estimate, brew method and
//! recommendations for the result. Everything here is deterministic except
//! the origin suggestion, and both the random source and the clock are
//! supplied by the caller.

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::models::{
    flavor_profile_for, AnalyzedCoffee, ClassificationObservation, CoffeeType, ConfidenceTier,
    RoastLevel,
};
use crate::validation::is_ranked;

/// Number of top-ranked observations consulted for secondary signals
pub const TOP_OBSERVATIONS: usize = 5;

/// Origins the analyzer suggests from
pub const ORIGINS: [&str; 10] = [
    "Ethiopia",
    "Colombia",
    "Brazil",
    "Guatemala",
    "Kenya",
    "Jamaica",
    "Hawaii",
    "Yemen",
    "Costa Rica",
    "Peru",
];

/// Brew method suggested for coffee types without a specific entry
pub const DEFAULT_BREW_METHOD: &str = "Various Methods";

// ============================================================================
// Type Classification
// ============================================================================

/// Order observations highest confidence first. Ties keep their input order.
pub fn rank_by_confidence(observations: &mut [ClassificationObservation]) {
    if !is_ranked(observations) {
        observations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    }
}

/// Resolve the coffee type from observations ranked highest-confidence first.
///
/// Only the top label decides the type, through substring rules checked in a
/// fixed order where the first match wins. Generic vessel labels ("cup",
/// "mug", "beverage") fall through to [`disambiguate_generic`].
pub fn map_classification_to_coffee_type(observations: &[ClassificationObservation]) -> CoffeeType {
    let Some(top) = observations.first() else {
        return CoffeeType::Unknown;
    };
    let label = top.label.to_lowercase();
    let has = |needle: &str| label.contains(needle);

    if has("espresso") || (has("coffee") && has("black")) {
        CoffeeType::Espresso
    } else if has("cappuccino") || has("foam") {
        CoffeeType::Cappuccino
    } else if has("latte") || has("milk") {
        CoffeeType::Latte
    } else if has("americano") {
        CoffeeType::Americano
    } else if has("mocha") || has("chocolate") {
        CoffeeType::Mocha
    } else if has("macchiato") {
        CoffeeType::Macchiato
    } else if has("cold") && has("coffee") {
        CoffeeType::ColdBrew
    } else if has("cup") || has("mug") || has("beverage") {
        disambiguate_generic(&top_labels(observations))
    } else {
        CoffeeType::Unknown
    }
}

/// Pick a type for a generic coffee vessel from secondary labels.
///
/// `labels` are lower-cased; position does not matter, only which signal is
/// present. Falls back to Espresso when nothing stands out.
pub fn disambiguate_generic(labels: &[String]) -> CoffeeType {
    let any = |needles: &[&str]| {
        labels
            .iter()
            .any(|label| needles.iter().any(|n| label.contains(n)))
    };

    if any(&["foam", "froth"]) {
        CoffeeType::Cappuccino
    } else if any(&["milk", "cream"]) {
        CoffeeType::Latte
    } else if any(&["dark", "black"]) {
        CoffeeType::Americano
    } else {
        CoffeeType::Espresso
    }
}

/// Lower-cased labels of the top-ranked observations
pub fn top_labels(observations: &[ClassificationObservation]) -> Vec<String> {
    observations
        .iter()
        .take(TOP_OBSERVATIONS)
        .map(|o| o.label.to_lowercase())
        .collect()
}

/// Confidence of the top observation, 0.0 when there is none
pub fn top_confidence(observations: &[ClassificationObservation]) -> f32 {
    observations.first().map(|o| o.confidence).unwrap_or(0.0)
}

// ============================================================================
// Attribute Derivation
// ============================================================================

/// Estimate the roast from the top-ranked labels, independently of the type
pub fn estimate_roast_level(observations: &[ClassificationObservation]) -> RoastLevel {
    let labels = top_labels(observations);
    let any = |needles: &[&str]| {
        labels
            .iter()
            .any(|label| needles.iter().any(|n| label.contains(n)))
    };

    if any(&["dark", "black"]) {
        RoastLevel::Dark
    } else if any(&["light", "blonde"]) {
        RoastLevel::Light
    } else {
        RoastLevel::Medium
    }
}

pub fn brew_method_for(coffee_type: CoffeeType) -> &'static str {
    match coffee_type {
        CoffeeType::Espresso | CoffeeType::Macchiato => "Espresso Machine",
        CoffeeType::Cappuccino => "Espresso Machine + Milk Frother",
        CoffeeType::Latte => "Espresso Machine + Steam Wand",
        CoffeeType::Americano => "Espresso Machine + Hot Water",
        CoffeeType::Mocha => "Espresso Machine + Chocolate Syrup",
        CoffeeType::PourOver => "Pour Over (V60, Chemex)",
        CoffeeType::FrenchPress => "French Press",
        CoffeeType::ColdBrew => "Cold Brew Steeping",
        CoffeeType::AeroPress => "AeroPress",
        _ => DEFAULT_BREW_METHOD,
    }
}

/// Three tips for enjoying or improving a coffee type
pub fn recommendations_for(coffee_type: CoffeeType) -> Vec<String> {
    let tips: [&str; 3] = match coffee_type {
        CoffeeType::Espresso => [
            "Try a single-origin espresso to taste regional character",
            "Pair with dark chocolate to bring out its richness",
            "Aim for a 25-30 second extraction for balanced flavor",
        ],
        CoffeeType::Cappuccino => [
            "Sprinkle cinnamon or cocoa on the foam",
            "Try oat milk for a naturally sweet variation",
            "Enjoy it in the morning alongside a pastry",
        ],
        CoffeeType::Latte => [
            "Add a flavored syrup such as vanilla or caramel",
            "Practice latte art with well-textured microfoam",
            "Try it iced on a warm day",
        ],
        CoffeeType::Americano => [
            "Add the espresso to the water to keep the crema",
            "Experiment with the water ratio to tune strength",
            "Try a splash of milk to soften the bitterness",
        ],
        CoffeeType::Mocha => [
            "Top with whipped cream for an indulgent treat",
            "Use dark chocolate for a less sweet version",
            "Add a pinch of chili for a Mexican-style mocha",
        ],
        CoffeeType::Macchiato => [
            "Try a caramel macchiato for extra sweetness",
            "Keep the milk to a small dollop to let the espresso shine",
            "Drink it quickly while the layers are distinct",
        ],
        CoffeeType::ColdBrew => [
            "Steep for 12-24 hours for the smoothest result",
            "Serve over ice with a splash of milk",
            "Dilute the concentrate to taste",
        ],
        _ => [
            "Experiment with different brewing ratios",
            "Try beans from different origins",
            "Keep a tasting journal to track your preferences",
        ],
    };
    tips.iter().map(|t| t.to_string()).collect()
}

/// Uniform random origin. The draw does not look at the classified type.
pub fn suggest_origin<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    ORIGINS[rng.gen_range(0..ORIGINS.len())]
}

/// Summary line describing the classification, e.g.
/// "High confidence - identified as Espresso"
pub fn analysis_summary(confidence: f32, coffee_type: CoffeeType) -> String {
    format!(
        "{} - identified as {}",
        ConfidenceTier::from_confidence(confidence).label(),
        coffee_type.display_name()
    )
}

// ============================================================================
// Assembly
// ============================================================================

/// Build an analysis record from ranked observations.
///
/// `image_data` should already be in its stored encoding. Never fails: an
/// empty observation list yields an Unknown result with zero confidence.
pub fn analyze<R: Rng + ?Sized>(
    observations: &[ClassificationObservation],
    image_data: Option<Vec<u8>>,
    rng: &mut R,
    now: DateTime<Utc>,
) -> AnalyzedCoffee {
    let coffee_type = map_classification_to_coffee_type(observations);
    let confidence = top_confidence(observations);

    AnalyzedCoffee {
        id: new_analysis_id(rng),
        image_data,
        coffee_type,
        confidence,
        analysis_date: now,
        brew_method: Some(brew_method_for(coffee_type).to_string()),
        roast_level: estimate_roast_level(observations),
        notes: String::new(),
        recommendations: recommendations_for(coffee_type),
        flavor_profile: flavor_profile_for(coffee_type),
        origin: Some(suggest_origin(rng).to_string()),
        rating: None,
        analysis_summary: analysis_summary(confidence, coffee_type),
    }
}

/// Fresh identifier drawn from the supplied random source
pub fn new_analysis_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
