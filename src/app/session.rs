//! Explicit session context.
//!
//! A session owns the generated market and fitted estimator for one
//! interactive run. It does no work until it is prepared, either explicitly
//! or by the first estimate.

use crate::app::pipeline::{MarketSnapshot, build_market};
use crate::domain::{PriceQuery, PropertyRecord};
use crate::error::EstimatorError;
use crate::models::FittedEstimator;
use crate::report::{EstimateOutcome, build_insight};

pub use crate::app::pipeline::SessionSettings;

#[derive(Debug, Clone)]
pub struct Session {
    settings: SessionSettings,
    market: Option<MarketSnapshot>,
    last: Option<EstimateOutcome>,
}

impl Session {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            market: None,
            last: None,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn is_prepared(&self) -> bool {
        self.market.is_some()
    }

    /// Generate the market and fit the estimator. Later calls do nothing.
    pub fn prepare(&mut self) -> Result<(), EstimatorError> {
        if self.market.is_some() {
            return Ok(());
        }
        self.market = Some(build_market(&self.settings)?);
        Ok(())
    }

    pub fn records(&self) -> Result<&[PropertyRecord], EstimatorError> {
        Ok(&self.snapshot()?.records)
    }

    pub fn estimator(&self) -> Result<&FittedEstimator, EstimatorError> {
        Ok(&self.snapshot()?.estimator)
    }

    pub fn predict(&self, query: &PriceQuery) -> Result<u64, EstimatorError> {
        Ok(self.estimator()?.predict(query))
    }

    /// Predict, attach the insight and remember the result.
    pub fn estimate(&mut self, query: PriceQuery) -> Result<EstimateOutcome, EstimatorError> {
        self.prepare()?;
        let market = self.snapshot()?;

        let prediction = market.estimator.predict_detailed(&query);
        let insight = build_insight(&market.records, &query, prediction.price);
        tracing::debug!(
            city = query.city(),
            area = query.area(),
            price = prediction.price,
            "estimate"
        );

        let outcome = EstimateOutcome {
            query,
            prediction,
            insight,
        };
        self.last = Some(outcome.clone());
        Ok(outcome)
    }

    pub fn last(&self) -> Option<&EstimateOutcome> {
        self.last.as_ref()
    }

    /// Seed the market was generated from, once prepared.
    pub fn data_seed(&self) -> Option<u64> {
        self.market.as_ref().map(|m| m.data_seed)
    }

    fn snapshot(&self) -> Result<&MarketSnapshot, EstimatorError> {
        self.market.as_ref().ok_or(EstimatorError::NotFitted)
    }
}
