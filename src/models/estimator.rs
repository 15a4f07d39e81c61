//! Fitted price estimator: city encoder + random forest.
//!
//! The estimator is fit once on a market sample and is immutable afterwards.
//! Queries for cities that were not in the sample fall back to category
//! code 0; that path is reported through `Prediction::city_known` and a log
//! warning but never fails.

use std::time::Instant;

use crate::domain::{ForestConfig, PriceQuery, Prediction, PropertyRecord};
use crate::error::EstimatorError;
use crate::fit::forest::RandomForest;
use crate::fit::tree::FeatureRow;
use crate::models::encoder::CityEncoder;

/// Lowest price the estimator will ever report.
pub const MIN_PREDICTED_PRICE: u64 = 50_000;

/// Code used for cities the encoder has never seen.
pub const FALLBACK_CITY_CODE: usize = 0;

#[derive(Debug, Clone)]
pub struct FittedEstimator {
    forest: RandomForest,
    encoder: CityEncoder,
    config: ForestConfig,
    n_train: usize,
}

impl FittedEstimator {
    pub fn fit(records: &[PropertyRecord], config: &ForestConfig) -> Result<Self, EstimatorError> {
        if records.is_empty() {
            return Err(EstimatorError::InsufficientData("no training records".into()));
        }
        for (i, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|reason| EstimatorError::InsufficientData(format!("record {i}: {reason}")))?;
        }
        config.validate()?;

        let started = Instant::now();
        let encoder = CityEncoder::fit(records.iter().map(|r| r.city.as_str()));

        let mut rows = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());
        for record in records {
            // Every training city is in the encoder by construction.
            let code = encoder.encode(&record.city).unwrap_or(FALLBACK_CITY_CODE);
            rows.push(feature_row(record.area, record.bedrooms, record.bathrooms.value(), code));
            targets.push(record.price as f64);
        }

        let forest = RandomForest::fit(&rows, &targets, config)?;
        tracing::info!(
            records = records.len(),
            cities = encoder.len(),
            trees = forest.n_trees(),
            mean_leaves = forest.mean_leaves(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fitted price estimator"
        );

        Ok(Self {
            forest,
            encoder,
            config: config.clone(),
            n_train: records.len(),
        })
    }

    /// Predicted price for `query`, rounded and floored at [`MIN_PREDICTED_PRICE`].
    pub fn predict(&self, query: &PriceQuery) -> u64 {
        self.predict_detailed(query).price
    }

    pub fn predict_detailed(&self, query: &PriceQuery) -> Prediction {
        let (city_code, city_known) = match self.encoder.encode(query.city()) {
            Some(code) => (code, true),
            None => {
                tracing::warn!(
                    city = query.city(),
                    fallback_code = FALLBACK_CITY_CODE,
                    "city not seen during fitting; using fallback category"
                );
                (FALLBACK_CITY_CODE, false)
            }
        };

        let x = feature_row(query.area(), query.bedrooms(), query.bathrooms().value(), city_code);
        let raw = self.forest.predict(&x);
        let price = if raw.is_finite() && raw > 0.0 {
            (raw.round() as u64).max(MIN_PREDICTED_PRICE)
        } else {
            MIN_PREDICTED_PRICE
        };

        Prediction {
            price,
            city_code,
            city_known,
        }
    }

    pub fn encoder(&self) -> &CityEncoder {
        &self.encoder
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn n_train(&self) -> usize {
        self.n_train
    }
}

fn feature_row(area: u32, bedrooms: u8, bathrooms: f64, city_code: usize) -> FeatureRow {
    [f64::from(area), f64::from(bedrooms), bathrooms, city_code as f64]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MarketConfig, generate_sample};
    use crate::domain::Bathrooms;

    fn baths(v: f64) -> Bathrooms {
        Bathrooms::from_f64(v).unwrap()
    }

    fn quick_config() -> ForestConfig {
        ForestConfig {
            n_trees: 20,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn empty_sample_is_insufficient() {
        let err = FittedEstimator::fit(&[], &ForestConfig::default()).unwrap_err();
        assert!(matches!(err, EstimatorError::InsufficientData(_)));
    }

    #[test]
    fn out_of_domain_record_is_insufficient() {
        let mut records = generate_sample(10, &MarketConfig::default(), 5).unwrap();
        records[4].bedrooms = 9;
        let err = FittedEstimator::fit(&records, &quick_config()).unwrap_err();
        match err {
            EstimatorError::InsufficientData(msg) => assert!(msg.contains("record 4"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn encoder_covers_every_training_city() {
        let records = generate_sample(200, &MarketConfig::default(), 8).unwrap();
        let est = FittedEstimator::fit(&records, &quick_config()).unwrap();
        for r in &records {
            assert!(est.encoder().encode(&r.city).is_some());
        }
        assert_eq!(est.n_train(), 200);
        assert_eq!(est.config(), &quick_config());
    }

    #[test]
    fn prediction_is_floored() {
        let records: Vec<PropertyRecord> = (0..10)
            .map(|i| PropertyRecord {
                area: 300 + i * 10,
                bedrooms: 1,
                bathrooms: baths(1.0),
                city: "Agra".to_string(),
                price: 1_000 + u64::from(i),
            })
            .collect();
        let est = FittedEstimator::fit(&records, &quick_config()).unwrap();
        let q = PriceQuery::new(310, 1, baths(1.0), "Agra").unwrap();
        assert_eq!(est.predict(&q), MIN_PREDICTED_PRICE);
    }

    #[test]
    fn unknown_city_falls_back_to_first_category() {
        let records = generate_sample(150, &MarketConfig::default(), 21).unwrap();
        let est = FittedEstimator::fit(&records, &quick_config()).unwrap();
        let first = est.encoder().classes()[0].clone();

        let unknown = PriceQuery::new(1200, 2, baths(2.0), "Atlantis").unwrap();
        let known = PriceQuery::new(1200, 2, baths(2.0), first).unwrap();

        let a = est.predict_detailed(&unknown);
        let b = est.predict_detailed(&unknown);
        assert_eq!(a, b);
        assert!(!a.city_known);
        assert_eq!(a.city_code, FALLBACK_CITY_CODE);
        assert_eq!(a.price, est.predict(&known));
        assert!(est.predict_detailed(&known).city_known);
    }

    #[test]
    fn predictions_stay_within_training_prices() {
        let records = generate_sample(120, &MarketConfig::default(), 13).unwrap();
        let est = FittedEstimator::fit(&records, &quick_config()).unwrap();
        let lo = records.iter().map(|r| r.price).min().unwrap();
        let hi = records.iter().map(|r| r.price).max().unwrap();
        for r in &records {
            let q = PriceQuery::new(r.area, r.bedrooms, r.bathrooms, r.city.clone()).unwrap();
            let p = est.predict(&q);
            assert!(p >= lo.max(MIN_PREDICTED_PRICE) && p <= hi, "{p} outside [{lo}, {hi}]");
        }
    }

    #[test]
    fn identical_feature_rows_predict_within_their_group() {
        // Two cities with several exact duplicate rows each, distinct prices.
        let mut records = Vec::new();
        let groups = [
            ("Agra", [900_000u64, 1_000_000, 1_300_000]),
            ("Pune", [5_000_000, 5_400_000, 6_100_000]),
        ];
        for (city, prices) in groups {
            for price in prices {
                records.push(PropertyRecord {
                    area: 1000,
                    bedrooms: 2,
                    bathrooms: baths(2.0),
                    city: city.to_string(),
                    price,
                });
            }
        }
        records.push(PropertyRecord {
            area: 2000,
            bedrooms: 4,
            bathrooms: baths(3.0),
            city: "Pune".to_string(),
            price: 12_000_000,
        });

        let config = ForestConfig {
            n_trees: 25,
            bootstrap: false,
            ..ForestConfig::default()
        };
        let est = FittedEstimator::fit(&records, &config).unwrap();
        for (city, lo, hi) in [("Agra", 900_000, 1_300_000), ("Pune", 5_000_000, 6_100_000)] {
            let q = PriceQuery::new(1000, 2, baths(2.0), city).unwrap();
            let p = est.predict(&q);
            assert!(p >= lo && p <= hi, "{city}: {p} outside [{lo}, {hi}]");
        }

        // Duplicates share one leaf, so the prediction is the group mean.
        let q = PriceQuery::new(1000, 2, baths(2.0), "Agra").unwrap();
        assert_eq!(est.predict(&q), 1_066_667);
    }
}
