//! Coffee beverage taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Beverage categories recognised by the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CoffeeType {
    Espresso,
    Cappuccino,
    Latte,
    Americano,
    Macchiato,
    Mocha,
    FlatWhite,
    Cortado,
    PourOver,
    FrenchPress,
    ColdBrew,
    NitroColdBrew,
    AeroPress,
    Turkish,
    Vietnamese,
    Affogato,
    Gibraltar,
    Breve,
    RedEye,
    BlackEye,
    Unknown,
}

impl CoffeeType {
    /// Every variant in declaration order
    pub const ALL: [CoffeeType; 21] = [
        CoffeeType::Espresso,
        CoffeeType::Cappuccino,
        CoffeeType::Latte,
        CoffeeType::Americano,
        CoffeeType::Macchiato,
        CoffeeType::Mocha,
        CoffeeType::FlatWhite,
        CoffeeType::Cortado,
        CoffeeType::PourOver,
        CoffeeType::FrenchPress,
        CoffeeType::ColdBrew,
        CoffeeType::NitroColdBrew,
        CoffeeType::AeroPress,
        CoffeeType::Turkish,
        CoffeeType::Vietnamese,
        CoffeeType::Affogato,
        CoffeeType::Gibraltar,
        CoffeeType::Breve,
        CoffeeType::RedEye,
        CoffeeType::BlackEye,
        CoffeeType::Unknown,
    ];

    /// Identifier used in query strings and serialized payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            CoffeeType::Espresso => "espresso",
            CoffeeType::Cappuccino => "cappuccino",
            CoffeeType::Latte => "latte",
            CoffeeType::Americano => "americano",
            CoffeeType::Macchiato => "macchiato",
            CoffeeType::Mocha => "mocha",
            CoffeeType::FlatWhite => "flat_white",
            CoffeeType::Cortado => "cortado",
            CoffeeType::PourOver => "pour_over",
            CoffeeType::FrenchPress => "french_press",
            CoffeeType::ColdBrew => "cold_brew",
            CoffeeType::NitroColdBrew => "nitro_cold_brew",
            CoffeeType::AeroPress => "aero_press",
            CoffeeType::Turkish => "turkish",
            CoffeeType::Vietnamese => "vietnamese",
            CoffeeType::Affogato => "affogato",
            CoffeeType::Gibraltar => "gibraltar",
            CoffeeType::Breve => "breve",
            CoffeeType::RedEye => "red_eye",
            CoffeeType::BlackEye => "black_eye",
            CoffeeType::Unknown => "unknown",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CoffeeType::Espresso => "Espresso",
            CoffeeType::Cappuccino => "Cappuccino",
            CoffeeType::Latte => "Latte",
            CoffeeType::Americano => "Americano",
            CoffeeType::Macchiato => "Macchiato",
            CoffeeType::Mocha => "Mocha",
            CoffeeType::FlatWhite => "Flat White",
            CoffeeType::Cortado => "Cortado",
            CoffeeType::PourOver => "Pour Over",
            CoffeeType::FrenchPress => "French Press",
            CoffeeType::ColdBrew => "Cold Brew",
            CoffeeType::NitroColdBrew => "Nitro Cold Brew",
            CoffeeType::AeroPress => "AeroPress",
            CoffeeType::Turkish => "Turkish Coffee",
            CoffeeType::Vietnamese => "Vietnamese Coffee",
            CoffeeType::Affogato => "Affogato",
            CoffeeType::Gibraltar => "Gibraltar",
            CoffeeType::Breve => "Breve",
            CoffeeType::RedEye => "Red Eye",
            CoffeeType::BlackEye => "Black Eye",
            CoffeeType::Unknown => "Unknown Coffee",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CoffeeType::Espresso => {
                "A concentrated shot of coffee brewed by forcing hot water through finely-ground beans"
            }
            CoffeeType::Cappuccino => {
                "Equal parts espresso, steamed milk, and a thick cap of milk foam"
            }
            CoffeeType::Latte => "Espresso with plenty of steamed milk and a thin layer of foam",
            CoffeeType::Americano => "Espresso diluted with hot water for a drip-like strength",
            CoffeeType::Macchiato => "Espresso marked with a small dollop of milk foam",
            CoffeeType::Mocha => "Espresso combined with chocolate and steamed milk",
            CoffeeType::FlatWhite => "Espresso with velvety microfoam and a high coffee-to-milk ratio",
            CoffeeType::Cortado => "Espresso cut with an equal amount of warm milk",
            CoffeeType::PourOver => "Hand-poured filter coffee with a clean, bright cup",
            CoffeeType::FrenchPress => "Full-immersion brew pressed through a metal mesh filter",
            CoffeeType::ColdBrew => "Coffee steeped in cold water for 12 to 24 hours",
            CoffeeType::NitroColdBrew => "Cold brew infused with nitrogen for a creamy, stout-like head",
            CoffeeType::AeroPress => "Pressure-assisted immersion brew with a smooth, low-bitterness cup",
            CoffeeType::Turkish => "Unfiltered, very finely ground coffee simmered in a cezve",
            CoffeeType::Vietnamese => "Dark-roast drip coffee served over sweetened condensed milk",
            CoffeeType::Affogato => "A scoop of vanilla ice cream drowned in a shot of espresso",
            CoffeeType::Gibraltar => "A double shot with a small amount of steamed milk, served in a short glass",
            CoffeeType::Breve => "Espresso made with steamed half-and-half instead of milk",
            CoffeeType::RedEye => "Drip coffee with a single shot of espresso added",
            CoffeeType::BlackEye => "Drip coffee with a double shot of espresso added",
            CoffeeType::Unknown => "The coffee type could not be determined from the photo",
        }
    }

    /// Display glyph shown next to the coffee name
    pub fn emoji(&self) -> &'static str {
        match self {
            CoffeeType::Espresso => "☕",
            CoffeeType::Cappuccino => "🥛",
            CoffeeType::Latte => "🍼",
            CoffeeType::Americano => "🇺🇸",
            CoffeeType::Macchiato => "🎯",
            CoffeeType::Mocha => "🍫",
            CoffeeType::FlatWhite => "⚪",
            CoffeeType::Cortado => "✂️",
            CoffeeType::PourOver => "💧",
            CoffeeType::FrenchPress => "🇫🇷",
            CoffeeType::ColdBrew => "🧊",
            CoffeeType::NitroColdBrew => "💨",
            CoffeeType::AeroPress => "🚀",
            CoffeeType::Turkish => "🇹🇷",
            CoffeeType::Vietnamese => "🇻🇳",
            CoffeeType::Affogato => "🍨",
            CoffeeType::Gibraltar => "🪨",
            CoffeeType::Breve => "🧈",
            CoffeeType::RedEye => "🔴",
            CoffeeType::BlackEye => "⚫",
            CoffeeType::Unknown => "❓",
        }
    }

    pub fn category(&self) -> CoffeeCategory {
        match self {
            CoffeeType::Espresso
            | CoffeeType::Americano
            | CoffeeType::RedEye
            | CoffeeType::BlackEye => CoffeeCategory::EspressoBased,
            CoffeeType::Cappuccino
            | CoffeeType::Latte
            | CoffeeType::Macchiato
            | CoffeeType::Mocha
            | CoffeeType::FlatWhite
            | CoffeeType::Cortado
            | CoffeeType::Gibraltar
            | CoffeeType::Breve => CoffeeCategory::MilkBased,
            CoffeeType::PourOver
            | CoffeeType::FrenchPress
            | CoffeeType::AeroPress
            | CoffeeType::Turkish => CoffeeCategory::Brewed,
            CoffeeType::ColdBrew | CoffeeType::NitroColdBrew => CoffeeCategory::Cold,
            CoffeeType::Vietnamese | CoffeeType::Affogato => CoffeeCategory::Specialty,
            CoffeeType::Unknown => CoffeeCategory::Other,
        }
    }
}

impl std::fmt::Display for CoffeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when parsing an unrecognised coffee type or category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised {kind}: {value}")]
pub struct ParseCoffeeError {
    pub kind: &'static str,
    pub value: String,
}

impl std::str::FromStr for CoffeeType {
    type Err = ParseCoffeeError;

    /// Accepts the snake_case identifier or the display name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        CoffeeType::ALL
            .into_iter()
            .find(|t| {
                t.as_str().eq_ignore_ascii_case(needle)
                    || t.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ParseCoffeeError {
                kind: "coffee type",
                value: s.to_string(),
            })
    }
}

/// Coarse grouping used to filter the analysis history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CoffeeCategory {
    EspressoBased,
    MilkBased,
    Brewed,
    Cold,
    Specialty,
    Other,
}

impl CoffeeCategory {
    pub const ALL: [CoffeeCategory; 6] = [
        CoffeeCategory::EspressoBased,
        CoffeeCategory::MilkBased,
        CoffeeCategory::Brewed,
        CoffeeCategory::Cold,
        CoffeeCategory::Specialty,
        CoffeeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CoffeeCategory::EspressoBased => "espresso_based",
            CoffeeCategory::MilkBased => "milk_based",
            CoffeeCategory::Brewed => "brewed",
            CoffeeCategory::Cold => "cold",
            CoffeeCategory::Specialty => "specialty",
            CoffeeCategory::Other => "other",
        }
    }

    /// Coffee types belonging to this category
    pub fn coffee_types(&self) -> Vec<CoffeeType> {
        CoffeeType::ALL
            .into_iter()
            .filter(|t| t.category() == *self)
            .collect()
    }
}

impl std::fmt::Display for CoffeeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoffeeCategory::EspressoBased => write!(f, "Espresso Based"),
            CoffeeCategory::MilkBased => write!(f, "Milk Based"),
            CoffeeCategory::Brewed => write!(f, "Brewed"),
            CoffeeCategory::Cold => write!(f, "Cold"),
            CoffeeCategory::Specialty => write!(f, "Specialty"),
            CoffeeCategory::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for CoffeeCategory {
    type Err = ParseCoffeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoffeeCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCoffeeError {
                kind: "coffee category",
                value: s.to_string(),
            })
    }
}
