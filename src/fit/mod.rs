//! Model training.
//!
//! Responsibilities:
//!
//! - grow CART regression trees (`tree`)
//! - bag them into a random forest trained in parallel (`forest`)
//! - score a held-out split of the sample (`evaluation`)

pub mod evaluation;
pub mod forest;
pub mod tree;

pub use evaluation::*;
pub use forest::*;
pub use tree::{FeatureRow, N_FEATURES, RegressionTree, TreeParams};
