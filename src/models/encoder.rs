//! City category encoding.
//!
//! Distinct city names are sorted and assigned dense codes `0..n`. The order
//! is fixed at fit time and stored, never recomputed at query time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityEncoder {
    classes: Vec<String>,
}

impl CityEncoder {
    pub fn fit<'a>(cities: impl IntoIterator<Item = &'a str>) -> Self {
        let mut classes: Vec<String> = cities.into_iter().map(str::to_string).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn encode(&self, city: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(city))
            .ok()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
