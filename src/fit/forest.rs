//! Random forest regressor.
//!
//! Each tree is grown on its own bootstrap resample of the training rows.
//! Trees are trained in parallel; every tree derives its RNG from the forest
//! seed and its index, so the fitted forest does not depend on scheduling.
//! The forest predicts the mean of its trees.

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::domain::ForestConfig;
use crate::error::EstimatorError;
use crate::fit::tree::{FeatureRow, RegressionTree, TreeParams};

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    pub fn fit(rows: &[FeatureRow], targets: &[f64], config: &ForestConfig) -> Result<Self, EstimatorError> {
        config.validate()?;
        if rows.is_empty() {
            return Err(EstimatorError::InsufficientData("no training rows".into()));
        }
        if rows.len() != targets.len() {
            return Err(EstimatorError::InsufficientData(format!(
                "{} feature rows but {} targets",
                rows.len(),
                targets.len()
            )));
        }
        if let Some(i) = targets.iter().position(|y| !y.is_finite()) {
            return Err(EstimatorError::InsufficientData(format!("target {i} is not finite")));
        }
        if let Some(i) = rows.iter().position(|r| r.iter().any(|v| !v.is_finite())) {
            return Err(EstimatorError::InsufficientData(format!("feature row {i} is not finite")));
        }

        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
        };
        let n = rows.len();

        let trees: Vec<RegressionTree> = (0..config.n_trees)
            .into_par_iter()
            .map(|tree_idx| {
                let sample: Vec<usize> = if config.bootstrap {
                    let mut rng = StdRng::seed_from_u64(tree_seed(config.seed, tree_idx));
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                RegressionTree::fit(rows, targets, &sample, &params)
            })
            .collect();

        Ok(Self { trees })
    }

    pub fn predict(&self, x: &FeatureRow) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        total / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean leaf count across trees (a rough size indicator for logs).
    pub fn mean_leaves(&self) -> f64 {
        let total: usize = self.trees.iter().map(RegressionTree::n_leaves).sum();
        total as f64 / self.trees.len() as f64
    }
}

/// Per-tree RNG seed: SplitMix64 finalizer over the forest seed and tree index.
///
/// Fixed arithmetic, so a saved `(seed, n_trees)` pair reproduces the same
/// forest on any platform or toolchain.
fn tree_seed(forest_seed: u64, tree_idx: usize) -> u64 {
    let mut z = forest_seed
        .wrapping_add((tree_idx as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
