//! Analysis history views: filtering, sorting and list summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AnalyzedCoffee, CoffeeCategory, CoffeeType, ConfidenceTier, ParseCoffeeError, RoastLevel,
};

/// Criteria for narrowing the history list; unset fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub category: Option<CoffeeCategory>,
    pub coffee_type: Option<CoffeeType>,
    pub min_confidence: Option<f32>,
    /// Unrated analyses never satisfy a rating threshold
    pub min_rating: Option<f64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive match against name, notes and origin
    pub search: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, coffee: &AnalyzedCoffee) -> bool {
        if let Some(category) = self.category {
            if coffee.coffee_type.category() != category {
                return false;
            }
        }
        if let Some(coffee_type) = self.coffee_type {
            if coffee.coffee_type != coffee_type {
                return false;
            }
        }
        if let Some(min) = self.min_confidence {
            if coffee.confidence < min {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            match coffee.rating {
                Some(rating) if rating >= min => {}
                _ => return false,
            }
        }
        if let Some(from) = self.from {
            if coffee.analysis_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if coffee.analysis_date > to {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let haystacks = [
                coffee.coffee_type.display_name(),
                coffee.notes.as_str(),
                coffee.origin.as_deref().unwrap_or(""),
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
                return false;
            }
        }
        true
    }
}

/// History ordering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HistorySort {
    #[default]
    Newest,
    Oldest,
    /// Highest confidence first
    Confidence,
    /// Highest rating first, unrated last
    Rating,
    /// Alphabetical by display name
    Name,
}

impl std::str::FromStr for HistorySort {
    type Err = ParseCoffeeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(HistorySort::Newest),
            "oldest" => Ok(HistorySort::Oldest),
            "confidence" => Ok(HistorySort::Confidence),
            "rating" => Ok(HistorySort::Rating),
            "name" => Ok(HistorySort::Name),
            _ => Err(ParseCoffeeError {
                kind: "sort order",
                value: s.to_string(),
            }),
        }
    }
}

/// Filter then stably sort a history slice. Entries that compare equal keep
/// their history (newest-first) order.
pub fn apply_filter_and_sort(
    entries: &[AnalyzedCoffee],
    filter: &HistoryFilter,
    sort: HistorySort,
) -> Vec<AnalyzedCoffee> {
    let mut result: Vec<AnalyzedCoffee> = entries
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect();

    match sort {
        HistorySort::Newest => result.sort_by(|a, b| b.analysis_date.cmp(&a.analysis_date)),
        HistorySort::Oldest => result.sort_by(|a, b| a.analysis_date.cmp(&b.analysis_date)),
        HistorySort::Confidence => result.sort_by(|a, b| b.confidence.total_cmp(&a.confidence)),
        HistorySort::Rating => result.sort_by(|a, b| match (a.rating, b.rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }),
        HistorySort::Name => result.sort_by(|a, b| {
            a.coffee_type
                .display_name()
                .cmp(b.coffee_type.display_name())
        }),
    }

    result
}

/// List view of an analysis, without the photo bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub coffee_type: CoffeeType,
    pub display_name: String,
    pub emoji: String,
    pub category: CoffeeCategory,
    pub confidence: f32,
    pub confidence_tier: ConfidenceTier,
    pub analysis_date: DateTime<Utc>,
    pub roast_level: RoastLevel,
    pub brew_method: Option<String>,
    pub origin: Option<String>,
    pub rating: Option<f64>,
    pub notes: String,
    pub has_image: bool,
}

impl From<&AnalyzedCoffee> for HistoryEntry {
    fn from(c: &AnalyzedCoffee) -> Self {
        HistoryEntry {
            id: c.id,
            coffee_type: c.coffee_type,
            display_name: c.coffee_type.display_name().to_string(),
            emoji: c.coffee_type.emoji().to_string(),
            category: c.coffee_type.category(),
            confidence: c.confidence,
            confidence_tier: c.confidence_tier(),
            analysis_date: c.analysis_date,
            roast_level: c.roast_level,
            brew_method: c.brew_method.clone(),
            origin: c.origin.clone(),
            rating: c.rating,
            notes: c.notes.clone(),
            has_image: c.has_image(),
        }
    }
}
