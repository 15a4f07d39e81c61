//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during generation and fitting
//! - exported to CSV/JSON
//! - reloaded later for display

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

/// Smallest and largest bedroom counts a property may have.
pub const MIN_BEDROOMS: u8 = 1;
pub const MAX_BEDROOMS: u8 = 5;

/// Bathroom count in half-bathroom steps: 1, 1.5, 2, ... 4.
///
/// Stored as a number of halves so equality and hashing are exact.
/// Serialized as a plain number (`2.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Bathrooms(u8);

impl Bathrooms {
    /// Every allowed value, in ascending order.
    pub const ALL: [Bathrooms; 7] = [
        Bathrooms(2),
        Bathrooms(3),
        Bathrooms(4),
        Bathrooms(5),
        Bathrooms(6),
        Bathrooms(7),
        Bathrooms(8),
    ];

    /// Parse a bathroom count; only values in [`Bathrooms::ALL`] are accepted.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let halves = value * 2.0;
        if halves.fract() != 0.0 {
            return None;
        }
        Self::ALL.into_iter().find(|b| f64::from(b.0) == halves)
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl TryFrom<f64> for Bathrooms {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Bathrooms::from_f64(value)
            .ok_or_else(|| format!("bathrooms must be one of 1, 1.5, 2, 2.5, 3, 3.5, 4 (got {value})"))
    }
}

impl From<Bathrooms> for f64 {
    fn from(value: Bathrooms) -> Self {
        value.value()
    }
}

impl std::fmt::Display for Bathrooms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// One synthetic market observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Area in square feet.
    pub area: u32,
    pub bedrooms: u8,
    pub bathrooms: Bathrooms,
    pub city: String,
    /// Price in INR.
    pub price: u64,
}

impl PropertyRecord {
    /// Check every field is inside its domain.
    pub fn validate(&self) -> Result<(), String> {
        if self.area == 0 {
            return Err("area must be positive".to_string());
        }
        if !(MIN_BEDROOMS..=MAX_BEDROOMS).contains(&self.bedrooms) {
            return Err(format!(
                "bedrooms must be in {MIN_BEDROOMS}..={MAX_BEDROOMS} (got {})",
                self.bedrooms
            ));
        }
        if self.city.trim().is_empty() {
            return Err("city is missing".to_string());
        }
        if self.price == 0 {
            return Err("price must be positive".to_string());
        }
        Ok(())
    }
}

/// A user-supplied price question.
///
/// The city may be any non-empty name; cities the estimator has never seen are
/// handled by its fallback. Deserialization goes through [`PriceQuery::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceQuery")]
pub struct PriceQuery {
    area: u32,
    bedrooms: u8,
    bathrooms: Bathrooms,
    city: String,
}

#[derive(Deserialize)]
struct RawPriceQuery {
    area: u32,
    bedrooms: u8,
    bathrooms: Bathrooms,
    city: String,
}

impl TryFrom<RawPriceQuery> for PriceQuery {
    type Error = EstimatorError;

    fn try_from(raw: RawPriceQuery) -> Result<Self, Self::Error> {
        PriceQuery::new(raw.area, raw.bedrooms, raw.bathrooms, raw.city)
    }
}

impl PriceQuery {
    pub fn new(
        area: u32,
        bedrooms: u8,
        bathrooms: Bathrooms,
        city: impl Into<String>,
    ) -> Result<Self, EstimatorError> {
        let city = city.into().trim().to_string();
        if area == 0 {
            return Err(EstimatorError::InvalidQuery("area must be positive".into()));
        }
        if !(MIN_BEDROOMS..=MAX_BEDROOMS).contains(&bedrooms) {
            return Err(EstimatorError::InvalidQuery(format!(
                "bedrooms must be in {MIN_BEDROOMS}..={MAX_BEDROOMS} (got {bedrooms})"
            )));
        }
        if city.is_empty() {
            return Err(EstimatorError::InvalidQuery("city is missing".into()));
        }
        Ok(Self {
            area,
            bedrooms,
            bathrooms,
            city,
        })
    }

    pub fn area(&self) -> u32 {
        self.area
    }

    pub fn bedrooms(&self) -> u8 {
        self.bedrooms
    }

    pub fn bathrooms(&self) -> Bathrooms {
        self.bathrooms
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// Random forest hyper-parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    /// Seed for bootstrap resampling; fixed so training is reproducible.
    pub seed: u64,
    /// `None` grows every tree until its leaves are pure.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<(), EstimatorError> {
        if self.n_trees == 0 {
            return Err(EstimatorError::InvalidConfig("forest needs at least one tree".into()));
        }
        if self.min_samples_split < 2 {
            return Err(EstimatorError::InvalidConfig("min_samples_split must be >= 2".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(EstimatorError::InvalidConfig("min_samples_leaf must be >= 1".into()));
        }
        Ok(())
    }
}

/// The estimator's answer to a single query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Rounded price, never below the estimator's floor.
    pub price: u64,
    /// Category code fed to the model for the query's city.
    pub city_code: usize,
    /// False when the city was unseen during fitting and code 0 was used.
    pub city_known: bool,
}
