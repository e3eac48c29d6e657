use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HydrateError;
use crate::hydrate::{Model, Transformer};
use crate::models::Nutrient;

/// Nutrition analysis of a list of ingredient lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionFacts {
    pub uri: Option<String>,
    #[serde(rename = "yield")]
    pub servings: Option<f64>,
    pub calories: Option<f64>,
    #[serde(rename = "totalWeight")]
    pub total_weight: Option<f64>,
    #[serde(rename = "dietLabels")]
    pub diet_labels: Vec<String>,
    #[serde(rename = "healthLabels")]
    pub health_labels: Vec<String>,
    pub cautions: Vec<String>,
    #[serde(rename = "totalNutrients")]
    pub total_nutrients: Vec<Nutrient>,
}

fn set_total_nutrients(facts: &mut NutritionFacts, value: Value) -> Result<(), HydrateError> {
    facts.total_nutrients = Nutrient::list_from_value("totalNutrients", value)?;
    Ok(())
}

impl Model for NutritionFacts {
    const WHITELIST: &'static [&'static str] = &[
        "uri",
        "yield",
        "calories",
        "totalWeight",
        "dietLabels",
        "healthLabels",
        "cautions",
        "totalNutrients",
    ];

    const TRANSFORMERS: &'static [Transformer<Self>] =
        &[Transformer::new("totalNutrients", set_total_nutrients)];
}

impl NutritionFacts {
    pub fn nutrient(&self, code: &str) -> Option<&Nutrient> {
        self.total_nutrients
            .iter()
            .find(|nutrient| nutrient.code.as_deref() == Some(code))
    }
}
