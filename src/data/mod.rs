//! Synthetic market data: configuration tables and the sample generator.

pub mod market;
pub mod sample;

pub use market::{CityFactor, DEFAULT_SAMPLE_SIZE, MarketConfig, city_multiplier};
pub use sample::{generate_sample, generate_unseeded};
