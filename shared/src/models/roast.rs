//! Roast level models

use serde::{Deserialize, Serialize};

/// Roast levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoastLevel {
    Light,
    #[default]
    Medium,
    MediumDark,
    Dark,
}

/// Optimal water temperature window for brewing, in degrees Celsius
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrewingTemperature {
    pub min_celsius: u8,
    pub max_celsius: u8,
}

impl RoastLevel {
    pub const ALL: [RoastLevel; 4] = [
        RoastLevel::Light,
        RoastLevel::Medium,
        RoastLevel::MediumDark,
        RoastLevel::Dark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoastLevel::Light => "light",
            RoastLevel::Medium => "medium",
            RoastLevel::MediumDark => "medium_dark",
            RoastLevel::Dark => "dark",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RoastLevel::Light => "Bright acidity with floral and fruity origin character",
            RoastLevel::Medium => "Balanced acidity and body with caramel sweetness",
            RoastLevel::MediumDark => "Fuller body with bittersweet chocolate and spice notes",
            RoastLevel::Dark => "Heavy body, low acidity, smoky and roasty flavors",
        }
    }

    /// Lighter roasts are denser and extract better with hotter water
    pub fn brewing_temperature(&self) -> BrewingTemperature {
        let (min_celsius, max_celsius) = match self {
            RoastLevel::Light => (93, 96),
            RoastLevel::Medium => (90, 94),
            RoastLevel::MediumDark => (88, 92),
            RoastLevel::Dark => (85, 90),
        };
        BrewingTemperature {
            min_celsius,
            max_celsius,
        }
    }
}

impl std::fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoastLevel::Light => write!(f, "Light"),
            RoastLevel::Medium => write!(f, "Medium"),
            RoastLevel::MediumDark => write!(f, "Medium Dark"),
            RoastLevel::Dark => write!(f, "Dark"),
        }
    }
}
