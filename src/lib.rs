//! `home-price-estimator` library crate.
//!
//! The binary (`hpe`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the market generator and estimator are reusable on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod models;
pub mod report;
