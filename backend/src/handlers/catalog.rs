//! Static reference data: the coffee taxonomy and roast levels

use axum::Json;
use serde::Serialize;
use shared::{
    brew_method_for, flavor_profile_for, recommendations_for, BrewingTemperature, CoffeeCategory,
    CoffeeType, FlavorProfile, RoastLevel,
};

#[derive(Debug, Serialize)]
pub struct CoffeeTypeInfo {
    pub coffee_type: CoffeeType,
    pub display_name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub category: CoffeeCategory,
    pub brew_method: &'static str,
    pub flavor_profile: FlavorProfile,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CoffeeCategoryInfo {
    pub category: CoffeeCategory,
    pub display_name: String,
    pub coffee_types: Vec<CoffeeType>,
}

#[derive(Debug, Serialize)]
pub struct RoastLevelInfo {
    pub roast_level: RoastLevel,
    pub display_name: String,
    pub description: &'static str,
    pub brewing_temperature: BrewingTemperature,
}

/// List every coffee type the analyzer can report
pub async fn list_coffee_types() -> Json<Vec<CoffeeTypeInfo>> {
    let types = CoffeeType::ALL
        .into_iter()
        .map(|t| CoffeeTypeInfo {
            coffee_type: t,
            display_name: t.display_name(),
            description: t.description(),
            emoji: t.emoji(),
            category: t.category(),
            brew_method: brew_method_for(t),
            flavor_profile: flavor_profile_for(t),
            recommendations: recommendations_for(t),
        })
        .collect();
    Json(types)
}

/// List categories with the coffee types grouped under each
pub async fn list_coffee_categories() -> Json<Vec<CoffeeCategoryInfo>> {
    let categories = CoffeeCategory::ALL
        .into_iter()
        .map(|c| CoffeeCategoryInfo {
            category: c,
            display_name: c.to_string(),
            coffee_types: c.coffee_types(),
        })
        .collect();
    Json(categories)
}

/// List roast levels with their brewing temperatures
pub async fn list_roast_levels() -> Json<Vec<RoastLevelInfo>> {
    let levels = RoastLevel::ALL
        .into_iter()
        .map(|r| RoastLevelInfo {
            roast_level: r,
            display_name: r.to_string(),
            description: r.description(),
            brewing_temperature: r.brewing_temperature(),
        })
        .collect();
    Json(levels)
}
