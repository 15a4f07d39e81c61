//! Reporting utilities: estimate insights, market trends and formatted output.
//!
//! Everything here is a pure function of the sample, the query and the
//! prediction; formatting lives in [`format`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::MarketConfig;
use crate::domain::{PriceQuery, Prediction, PropertyRecord};

pub mod format;

pub use format::*;

/// Price per sq ft above which a property is graded premium.
pub const PREMIUM_PRICE_PER_SQFT: f64 = 8_000.0;
/// Price per sq ft above which a property is graded good.
pub const GOOD_PRICE_PER_SQFT: f64 = 5_000.0;
/// Bin count used for the market price distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// ±10% band around a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub lower: u64,
    pub upper: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentGrade {
    Premium,
    Good,
    BudgetFriendly,
}

impl InvestmentGrade {
    pub fn display_name(self) -> &'static str {
        match self {
            InvestmentGrade::Premium => "Premium",
            InvestmentGrade::Good => "Good",
            InvestmentGrade::BudgetFriendly => "Budget-Friendly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPosition {
    Above,
    Below,
}

/// Prediction versus homes in the sample with the same city and bedrooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarComparison {
    pub n_similar: usize,
    pub average_price: f64,
    pub position: MarketPosition,
}

/// Everything shown next to a price estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub price: u64,
    pub price_per_sqft: f64,
    pub range: PriceRange,
    pub grade: InvestmentGrade,
    pub similar: Option<SimilarComparison>,
}

/// One answered query: what was asked, what the model said, and the insight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateOutcome {
    pub query: PriceQuery,
    pub prediction: Prediction,
    pub insight: Insight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityAverage {
    pub city: String,
    pub n: usize,
    pub average_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

pub fn price_range(prediction: u64) -> PriceRange {
    PriceRange {
        lower: prediction / 10 * 9 + prediction % 10 * 9 / 10,
        upper: prediction / 10 * 11 + prediction % 10 * 11 / 10,
    }
}

pub fn price_per_sqft(price: u64, area: u32) -> f64 {
    if area == 0 {
        return 0.0;
    }
    price as f64 / f64::from(area)
}

pub fn investment_grade(price_per_sqft: f64) -> InvestmentGrade {
    if price_per_sqft > PREMIUM_PRICE_PER_SQFT {
        InvestmentGrade::Premium
    } else if price_per_sqft > GOOD_PRICE_PER_SQFT {
        InvestmentGrade::Good
    } else {
        InvestmentGrade::BudgetFriendly
    }
}

pub fn compare_similar(
    records: &[PropertyRecord],
    query: &PriceQuery,
    prediction: u64,
) -> Option<SimilarComparison> {
    let prices: Vec<f64> = records
        .iter()
        .filter(|r| r.bedrooms == query.bedrooms() && r.city == query.city())
        .map(|r| r.price as f64)
        .collect();
    if prices.is_empty() {
        return None;
    }

    let average_price = prices.iter().sum::<f64>() / prices.len() as f64;
    let position = if prediction as f64 > average_price {
        MarketPosition::Above
    } else {
        MarketPosition::Below
    };
    Some(SimilarComparison {
        n_similar: prices.len(),
        average_price,
        position,
    })
}

pub fn build_insight(records: &[PropertyRecord], query: &PriceQuery, prediction: u64) -> Insight {
    let per_sqft = price_per_sqft(prediction, query.area());
    Insight {
        price: prediction,
        price_per_sqft: per_sqft,
        range: price_range(prediction),
        grade: investment_grade(per_sqft),
        similar: compare_similar(records, query, prediction),
    }
}

/// Mean price per city, sorted by city name.
pub fn average_price_by_city(records: &[PropertyRecord]) -> Vec<CityAverage> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for r in records {
        let entry = groups.entry(r.city.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += r.price as f64;
    }
    groups
        .into_iter()
        .map(|(city, (n, total))| CityAverage {
            city: city.to_string(),
            n,
            average_price: total / n as f64,
        })
        .collect()
}

/// Equal-width histogram of prices over `[min, max]`.
///
/// The maximum lands in the last bin. A constant sample yields one bin.
pub fn price_histogram(records: &[PropertyRecord], bins: usize) -> Vec<HistogramBin> {
    if records.is_empty() || bins == 0 {
        return Vec::new();
    }
    let lo = records.iter().map(|r| r.price).min().unwrap_or(0) as f64;
    let hi = records.iter().map(|r| r.price).max().unwrap_or(0) as f64;
    if hi <= lo {
        return vec![HistogramBin {
            lower: lo,
            upper: hi,
            count: records.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for r in records {
        let slot = (((r.price as f64 - lo) / width) as usize).min(bins - 1);
        out[slot].count += 1;
    }
    out
}

/// City table for display, most expensive market first.
pub fn city_table(market: &MarketConfig) -> Vec<(String, f64)> {
    let mut rows: Vec<(String, f64)> = market
        .cities
        .iter()
        .map(|c| (c.name.clone(), c.multiplier))
        .collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}
