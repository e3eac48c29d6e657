use serde::{Deserialize, Serialize};

use crate::hydrate::Model;

/// A unit a food can be measured in, with its weight in grams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    pub uri: Option<String>,
    pub label: Option<String>,
    pub weight: Option<f64>,
}

impl Model for Measurement {
    const WHITELIST: &'static [&'static str] = &["uri", "label", "weight"];
}
