//! Query-time models: the city encoder and the fitted estimator.

pub mod encoder;
pub mod estimator;

pub use encoder::CityEncoder;
pub use estimator::{FALLBACK_CITY_CODE, FittedEstimator, MIN_PREDICTED_PRICE};
