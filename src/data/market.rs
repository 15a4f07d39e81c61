//! Fixed market configuration: cities, price multipliers and feature weights.
//!
//! These tables are configuration data, not derived from anything.

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

/// Number of records generated per session unless overridden.
pub const DEFAULT_SAMPLE_SIZE: usize = 500;

/// Bedroom counts and their sampling weights.
pub const BEDROOM_CHOICES: [u8; 5] = [1, 2, 3, 4, 5];
pub const BEDROOM_WEIGHTS: [f64; 5] = [0.10, 0.20, 0.40, 0.25, 0.05];

/// Weights for `Bathrooms::ALL` (1, 1.5, ... 4).
pub const BATHROOM_WEIGHTS: [f64; 7] = [0.15, 0.10, 0.30, 0.20, 0.15, 0.05, 0.05];

/// Per-city price multipliers applied to the base price formula.
pub const CITY_MULTIPLIERS: [(&str, f64); 30] = [
    ("Mumbai", 2.5),
    ("Delhi", 2.2),
    ("Bangalore", 2.0),
    ("Chennai", 1.5),
    ("Hyderabad", 1.4),
    ("Pune", 1.6),
    ("Kolkata", 1.3),
    ("Ahmedabad", 1.2),
    ("Jaipur", 1.1),
    ("Surat", 1.0),
    ("Lucknow", 0.9),
    ("Kanpur", 0.8),
    ("Nagpur", 0.9),
    ("Indore", 0.9),
    ("Thane", 2.0),
    ("Bhopal", 0.8),
    ("Visakhapatnam", 0.9),
    ("Pimpri-Chinchwad", 1.5),
    ("Patna", 0.7),
    ("Vadodara", 1.0),
    ("Ghaziabad", 1.4),
    ("Ludhiana", 0.9),
    ("Agra", 0.7),
    ("Nashik", 1.0),
    ("Faridabad", 1.3),
    ("Meerut", 0.8),
    ("Rajkot", 0.9),
    ("Kalyan-Dombivali", 1.8),
    ("Vasai-Virar", 1.6),
    ("Varanasi", 0.7),
];

/// Look up the default multiplier for a city (exact, case-sensitive name).
pub fn city_multiplier(name: &str) -> Option<f64> {
    CITY_MULTIPLIERS
        .iter()
        .find(|(city, _)| *city == name)
        .map(|(_, m)| *m)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityFactor {
    pub name: String,
    pub multiplier: f64,
}

/// Everything the generator needs besides the sample size and the seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    pub cities: Vec<CityFactor>,
    pub bedroom_weights: [f64; 5],
    pub bathroom_weights: [f64; 7],
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cities: CITY_MULTIPLIERS
                .iter()
                .map(|(name, multiplier)| CityFactor {
                    name: name.to_string(),
                    multiplier: *multiplier,
                })
                .collect(),
            bedroom_weights: BEDROOM_WEIGHTS,
            bathroom_weights: BATHROOM_WEIGHTS,
        }
    }
}

impl MarketConfig {
    pub fn validate(&self) -> Result<(), EstimatorError> {
        if self.cities.is_empty() {
            return Err(EstimatorError::InvalidConfig("city list is empty".into()));
        }
        for city in &self.cities {
            if city.name.trim().is_empty() {
                return Err(EstimatorError::InvalidConfig("city name is empty".into()));
            }
            if !(city.multiplier.is_finite() && city.multiplier > 0.0) {
                return Err(EstimatorError::InvalidConfig(format!(
                    "multiplier for {} must be finite and > 0 (got {})",
                    city.name, city.multiplier
                )));
            }
        }
        validate_weights("bedroom", &self.bedroom_weights)?;
        validate_weights("bathroom", &self.bathroom_weights)?;
        Ok(())
    }

    pub fn multiplier(&self, city: &str) -> Option<f64> {
        self.cities
            .iter()
            .find(|c| c.name == city)
            .map(|c| c.multiplier)
    }
}

fn validate_weights(label: &str, weights: &[f64]) -> Result<(), EstimatorError> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(EstimatorError::InvalidConfig(format!(
            "{label} weights must be finite and non-negative"
        )));
    }
    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(EstimatorError::InvalidConfig(format!(
            "{label} weights must not all be zero"
        )));
    }
    Ok(())
}
