//! File exports.
//!
//! - generated sample as CSV (`export`)
//! - estimate JSON read/write (`estimate`)

pub mod estimate;
pub mod export;

pub use estimate::*;
pub use export::*;
