//! Flavor profile models

use serde::{Deserialize, Serialize};

use super::CoffeeType;

/// Four-dimensional taste descriptor, each attribute on a 0.0-1.0 scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlavorProfile {
    pub acidity: f64,
    pub body: f64,
    pub sweetness: f64,
    pub bitterness: f64,
    pub flavor_notes: Vec<String>,
}

impl FlavorProfile {
    pub fn new(
        acidity: f64,
        body: f64,
        sweetness: f64,
        bitterness: f64,
        flavor_notes: &[&str],
    ) -> Self {
        Self {
            acidity,
            body,
            sweetness,
            bitterness,
            flavor_notes: flavor_notes.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Check that every attribute lies within 0.0-1.0
    pub fn is_valid(&self) -> bool {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        unit(self.acidity) && unit(self.body) && unit(self.sweetness) && unit(self.bitterness)
    }
}

impl Default for FlavorProfile {
    fn default() -> Self {
        FlavorProfile::new(0.5, 0.5, 0.5, 0.5, &["Balanced"])
    }
}

/// Static flavor profile for a coffee type
pub fn flavor_profile_for(coffee_type: CoffeeType) -> FlavorProfile {
    match coffee_type {
        CoffeeType::Espresso => {
            FlavorProfile::new(0.7, 0.9, 0.3, 0.8, &["Rich", "Intense", "Caramel", "Dark Chocolate"])
        }
        CoffeeType::Cappuccino => {
            FlavorProfile::new(0.4, 0.7, 0.6, 0.5, &["Creamy", "Balanced", "Velvety", "Nutty"])
        }
        CoffeeType::Latte => FlavorProfile::new(0.3, 0.6, 0.7, 0.3, &["Smooth", "Milky", "Sweet", "Mild"]),
        CoffeeType::Americano => {
            FlavorProfile::new(0.6, 0.5, 0.3, 0.6, &["Bold", "Clean", "Bright", "Roasted"])
        }
        CoffeeType::Mocha => {
            FlavorProfile::new(0.3, 0.8, 0.9, 0.4, &["Chocolate", "Sweet", "Rich", "Indulgent"])
        }
        CoffeeType::ColdBrew => {
            FlavorProfile::new(0.2, 0.7, 0.6, 0.3, &["Smooth", "Low Acid", "Chocolatey", "Refreshing"])
        }
        _ => FlavorProfile::default(),
    }
}
