//! Aggregate statistics over the analysis history

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{AnalyzedCoffee, CoffeeType, ConfidenceTier, RoastLevel};

/// Number of analyses for one coffee type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoffeeTypeCount {
    pub coffee_type: CoffeeType,
    pub count: usize,
}

/// Number of analyses for one roast level
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoastLevelCount {
    pub roast_level: RoastLevel,
    pub count: usize,
}

/// Profile statistics computed over the history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryStatistics {
    pub total_analyses: usize,
    pub rated_analyses: usize,
    /// 0.0 when the history is empty
    pub average_confidence: f64,
    /// Mean over rated analyses only
    pub average_rating: Option<f64>,
    pub favorite_coffee_type: Option<CoffeeType>,
    pub distinct_types_tried: usize,
    /// Descending by count, ties in declaration order
    pub type_counts: Vec<CoffeeTypeCount>,
    pub roast_counts: Vec<RoastLevelCount>,
    pub high_confidence_analyses: usize,
    pub analyses_last_7_days: usize,
    pub first_analysis: Option<DateTime<Utc>>,
    pub latest_analysis: Option<DateTime<Utc>>,
    pub favorite_origin: Option<String>,
}

impl HistoryStatistics {
    pub fn compute(entries: &[AnalyzedCoffee], now: DateTime<Utc>) -> Self {
        let total_analyses = entries.len();

        let average_confidence = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(|c| f64::from(c.confidence)).sum::<f64>() / total_analyses as f64
        };

        let ratings: Vec<f64> = entries.iter().filter_map(|c| c.rating).collect();
        let average_rating = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };

        let mut type_counts: Vec<CoffeeTypeCount> = CoffeeType::ALL
            .into_iter()
            .map(|coffee_type| CoffeeTypeCount {
                coffee_type,
                count: entries.iter().filter(|c| c.coffee_type == coffee_type).count(),
            })
            .filter(|tc| tc.count > 0)
            .collect();
        // Stable sort keeps declaration order among equal counts
        type_counts.sort_by(|a, b| b.count.cmp(&a.count));

        let mut roast_counts: Vec<RoastLevelCount> = RoastLevel::ALL
            .into_iter()
            .map(|roast_level| RoastLevelCount {
                roast_level,
                count: entries.iter().filter(|c| c.roast_level == roast_level).count(),
            })
            .filter(|rc| rc.count > 0)
            .collect();
        roast_counts.sort_by(|a, b| b.count.cmp(&a.count));

        let week_ago = now - Duration::days(7);

        Self {
            total_analyses,
            rated_analyses: ratings.len(),
            average_confidence,
            average_rating,
            favorite_coffee_type: type_counts.first().map(|tc| tc.coffee_type),
            distinct_types_tried: type_counts.len(),
            type_counts,
            roast_counts,
            high_confidence_analyses: entries
                .iter()
                .filter(|c| c.confidence_tier() == ConfidenceTier::High)
                .count(),
            analyses_last_7_days: entries
                .iter()
                .filter(|c| c.analysis_date > week_ago && c.analysis_date <= now)
                .count(),
            first_analysis: entries.iter().map(|c| c.analysis_date).min(),
            latest_analysis: entries.iter().map(|c| c.analysis_date).max(),
            favorite_origin: favorite_origin(entries),
        }
    }
}

/// Most frequent origin; ties resolve alphabetically
fn favorite_origin(entries: &[AnalyzedCoffee]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for origin in entries.iter().filter_map(|c| c.origin.as_deref()) {
        *counts.entry(origin).or_default() += 1;
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (origin, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((origin, count)),
        })
        .map(|(origin, _)| origin.to_string())
}
