//! Shared "market pipeline" used by every command and by the session.
//!
//! sample generation -> estimator fit

use crate::data::{MarketConfig, generate_sample, generate_unseeded};
use crate::domain::{ForestConfig, PropertyRecord};
use crate::error::EstimatorError;
use crate::models::FittedEstimator;

/// How to build the market a session answers queries against.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub sample_size: usize,
    /// `None` seeds generation from the wall clock.
    pub seed: Option<u64>,
    pub market: MarketConfig,
    pub forest: ForestConfig,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            sample_size: crate::data::DEFAULT_SAMPLE_SIZE,
            seed: None,
            market: MarketConfig::default(),
            forest: ForestConfig::default(),
        }
    }
}

/// Generated sample plus the estimator fitted on it.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub records: Vec<PropertyRecord>,
    pub estimator: FittedEstimator,
    pub data_seed: u64,
}

/// Generate the sample only, returning the seed that was used.
pub fn generate_market(settings: &SessionSettings) -> Result<(u64, Vec<PropertyRecord>), EstimatorError> {
    match settings.seed {
        Some(seed) => Ok((seed, generate_sample(settings.sample_size, &settings.market, seed)?)),
        None => generate_unseeded(settings.sample_size, &settings.market),
    }
}

/// Generate the sample and fit the estimator.
pub fn build_market(settings: &SessionSettings) -> Result<MarketSnapshot, EstimatorError> {
    let (data_seed, records) = generate_market(settings)?;
    let estimator = FittedEstimator::fit(&records, &settings.forest)?;
    tracing::debug!(data_seed, records = records.len(), "market ready");
    Ok(MarketSnapshot {
        records,
        estimator,
        data_seed,
    })
}
