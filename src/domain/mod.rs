//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the synthetic observation (`PropertyRecord`) and its validated fields (`Bathrooms`)
//! - the user question (`PriceQuery`) and the estimator's answer (`Prediction`)
//! - forest hyper-parameters (`ForestConfig`)

pub mod types;

pub use types::*;
