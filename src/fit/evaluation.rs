//! Held-out evaluation of the price estimator.
//!
//! The session fit trusts the model unconditionally; this is the optional
//! check: shuffle, hold out a fraction of the sample, fit on the rest and
//! score the held-out predictions.

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::domain::{ForestConfig, PriceQuery, PropertyRecord};
use crate::error::EstimatorError;
use crate::models::FittedEstimator;

/// Fit quality on the held-out part of the sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldoutReport {
    pub n_train: usize,
    pub n_test: usize,
    pub rmse: f64,
    pub mae: f64,
    /// Coefficient of determination; 0 when the held-out prices are constant.
    pub r2: f64,
}

pub fn evaluate_holdout(
    records: &[PropertyRecord],
    holdout_fraction: f64,
    config: &ForestConfig,
    split_seed: u64,
) -> Result<HoldoutReport, EstimatorError> {
    if !(holdout_fraction.is_finite() && holdout_fraction > 0.0 && holdout_fraction < 1.0) {
        return Err(EstimatorError::InvalidConfig(format!(
            "holdout fraction must be in (0, 1) (got {holdout_fraction})"
        )));
    }

    let n = records.len();
    let n_test = (n as f64 * holdout_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(EstimatorError::InsufficientData(format!(
            "cannot split {n} records into non-empty train and test sets"
        )));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut StdRng::seed_from_u64(split_seed));
    let (test_idx, train_idx) = order.split_at(n_test);

    let train: Vec<PropertyRecord> = train_idx.iter().map(|&i| records[i].clone()).collect();
    let estimator = FittedEstimator::fit(&train, config)?;

    let mut actual = Vec::with_capacity(n_test);
    let mut predicted = Vec::with_capacity(n_test);
    for &i in test_idx {
        let r = &records[i];
        let query = PriceQuery::new(r.area, r.bedrooms, r.bathrooms, r.city.clone())?;
        actual.push(r.price as f64);
        predicted.push(estimator.predict(&query) as f64);
    }

    let report = score(&actual, &predicted, train.len());
    tracing::info!(
        n_train = report.n_train,
        n_test = report.n_test,
        rmse = report.rmse,
        mae = report.mae,
        r2 = report.r2,
        "holdout evaluation finished"
    );
    Ok(report)
}

fn score(actual: &[f64], predicted: &[f64], n_train: usize) -> HoldoutReport {
    let n = actual.len() as f64;
    let mean = actual.iter().sum::<f64>() / n;

    let mut sse = 0.0;
    let mut sae = 0.0;
    let mut sst = 0.0;
    for (y, y_hat) in actual.iter().zip(predicted) {
        let r = y - y_hat;
        sse += r * r;
        sae += r.abs();
        sst += (y - mean) * (y - mean);
    }

    let r2 = if sst > 0.0 { 1.0 - sse / sst } else { 0.0 };
    HoldoutReport {
        n_train,
        n_test: actual.len(),
        rmse: (sse / n).sqrt(),
        mae: sae / n,
        r2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MarketConfig, generate_sample};

    #[test]
    fn score_matches_hand_computation() {
        let report = score(&[1.0, 2.0, 3.0], &[1.0, 2.0, 5.0], 7);
        assert_eq!(report.n_train, 7);
        assert_eq!(report.n_test, 3);
        assert!((report.rmse - (4.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((report.mae - 2.0 / 3.0).abs() < 1e-12);
        // sst = 2, sse = 4
        assert!((report.r2 - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn holdout_split_sizes_add_up() {
        let records = generate_sample(200, &MarketConfig::default(), 17).unwrap();
        let config = ForestConfig {
            n_trees: 25,
            ..ForestConfig::default()
        };
        let report = evaluate_holdout(&records, 0.2, &config, 99).unwrap();
        assert_eq!(report.n_test, 40);
        assert_eq!(report.n_train, 160);
        assert!(report.rmse.is_finite() && report.rmse > 0.0);
        assert!(report.mae <= report.rmse);
        // City and size explain most of the synthetic price.
        assert!(report.r2 > 0.3, "r2 = {}", report.r2);
    }

    #[test]
    fn rejects_bad_fraction_and_tiny_samples() {
        let records = generate_sample(5, &MarketConfig::default(), 1).unwrap();
        let config = ForestConfig::default();
        assert!(matches!(
            evaluate_holdout(&records, 0.0, &config, 1),
            Err(EstimatorError::InvalidConfig(_))
        ));
        assert!(matches!(
            evaluate_holdout(&records, 1.0, &config, 1),
            Err(EstimatorError::InvalidConfig(_))
        ));
        assert!(matches!(
            evaluate_holdout(&records[..1], 0.5, &config, 1),
            Err(EstimatorError::InsufficientData(_))
        ));
    }
}
