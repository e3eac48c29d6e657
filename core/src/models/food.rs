use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HydrateError;
use crate::hydrate::{nested_one, Model, Transformer};
use crate::models::{Measurement, Nutrient};
use crate::repository::NestedRepository;

/// A food item from the food database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Food {
    pub uri: Option<String>,
    pub brand: Option<String>,
    pub label: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "foodId")]
    pub food_id: Option<String>,
    /// Never hydrated: not part of the whitelist.
    pub source: Option<String>,
    /// Generic foods, generic meals, packaged foods, fast foods.
    pub category: Option<String>,
    pub nutrients: Vec<Nutrient>,
    pub measurement: Option<Measurement>,
    /// `food` or `meal`.
    #[serde(rename = "categoryLabel")]
    pub category_label: Option<String>,
}

fn set_nutrients(food: &mut Food, value: Value) -> Result<(), HydrateError> {
    food.nutrients = Nutrient::list_from_value("nutrients", value)?;
    Ok(())
}

fn set_measurement(food: &mut Food, value: Value) -> Result<(), HydrateError> {
    food.measurement = nested_one("measurement", value)?;
    Ok(())
}

impl Model for Food {
    const WHITELIST: &'static [&'static str] = &[
        "uri",
        "brand",
        "image",
        "label",
        "foodId",
        "category",
        "nutrients",
        "measurement",
        "categoryLabel",
    ];

    const TRANSFORMERS: &'static [Transformer<Self>] = &[
        Transformer::new("nutrients", set_nutrients),
        Transformer::new("measurement", set_measurement),
    ];
}

/// A food search match: the food plus the measures it can be served in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodMatch {
    pub food: Option<Food>,
    pub quantity: Option<f64>,
    pub measure: Option<Measurement>,
    pub measures: Vec<Measurement>,
}

fn set_match_food(entry: &mut FoodMatch, value: Value) -> Result<(), HydrateError> {
    entry.food = nested_one("food", value)?;
    Ok(())
}

fn set_match_measure(entry: &mut FoodMatch, value: Value) -> Result<(), HydrateError> {
    entry.measure = nested_one("measure", value)?;
    Ok(())
}

fn set_match_measures(entry: &mut FoodMatch, value: Value) -> Result<(), HydrateError> {
    entry.measures = NestedRepository::from_value("measures", value)?;
    Ok(())
}

impl Model for FoodMatch {
    const WHITELIST: &'static [&'static str] = &["food", "quantity", "measure", "measures"];

    const TRANSFORMERS: &'static [Transformer<Self>] = &[
        Transformer::new("food", set_match_food),
        Transformer::new("measure", set_match_measure),
        Transformer::new("measures", set_match_measures),
    ];
}

/// Body of a food database parser response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodSearchResults {
    pub text: Option<String>,
    pub parsed: Vec<FoodMatch>,
    pub hints: Vec<FoodMatch>,
}

fn set_parsed(results: &mut FoodSearchResults, value: Value) -> Result<(), HydrateError> {
    results.parsed = NestedRepository::from_value("parsed", value)?;
    Ok(())
}

fn set_hints(results: &mut FoodSearchResults, value: Value) -> Result<(), HydrateError> {
    results.hints = NestedRepository::from_value("hints", value)?;
    Ok(())
}

impl Model for FoodSearchResults {
    const WHITELIST: &'static [&'static str] = &["text", "parsed", "hints"];

    const TRANSFORMERS: &'static [Transformer<Self>] = &[
        Transformer::new("parsed", set_parsed),
        Transformer::new("hints", set_hints),
    ];
}

impl FoodSearchResults {
    /// Parsed foods first, then hinted foods, in response order.
    pub fn foods(&self) -> impl Iterator<Item = &Food> {
        self.parsed
            .iter()
            .chain(self.hints.iter())
            .filter_map(|entry| entry.food.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn apple_with_nutrient_list() {
        let raw = object(json!({
            "label": "Apple",
            "nutrients": [
                {"code": "ENERC_KCAL", "value": 52},
                {"code": "FAT", "value": 0.2},
            ],
        }));
        let food = Food::create(&raw).unwrap();
        assert_eq!(food.label.as_deref(), Some("Apple"));
        assert_eq!(food.nutrients.len(), 2);
        assert_eq!(food.nutrients[0].code.as_deref(), Some("ENERC_KCAL"));
        assert_eq!(food.nutrients[0].value, Some(52.0));
        assert_eq!(food.nutrients[1].code.as_deref(), Some("FAT"));
        assert_eq!(food.nutrients[1].value, Some(0.2));
    }

    #[test]
    fn source_and_unknown_keys_are_never_hydrated() {
        let raw = object(json!({"label": "Apple", "source": "usda", "bogus": "x"}));
        let food = Food::create(&raw).unwrap();
        assert_eq!(food.source, None);
        assert_eq!(
            food,
            Food {
                label: Some("Apple".to_string()),
                ..Food::default()
            }
        );
    }

    #[test]
    fn renamed_keys_and_nested_measurement() {
        let raw = object(json!({
            "foodId": "food_a1gb9ubb72c7snbuxr3weagwv0dd",
            "categoryLabel": "food",
            "measurement": {"uri": "m#whole", "label": "Whole", "weight": 182},
        }));
        let food = Food::create(&raw).unwrap();
        assert_eq!(food.food_id.as_deref(), Some("food_a1gb9ubb72c7snbuxr3weagwv0dd"));
        assert_eq!(food.category_label.as_deref(), Some("food"));
        assert_eq!(food.measurement.unwrap().weight, Some(182.0));
    }

    #[test]
    fn search_results_collect_foods() {
        let raw = object(json!({
            "text": "apple",
            "parsed": [{"food": {"label": "Apple", "nutrients": {"ENERC_KCAL": 52}}}],
            "hints": [
                {
                    "food": {"label": "Apple Juice"},
                    "measures": [{"label": "Cup", "weight": 248}, {"label": "Gram", "weight": 1}],
                },
                {"measures": []},
            ],
        }));
        let results = FoodSearchResults::create(&raw).unwrap();
        let labels: Vec<_> = results.foods().map(|f| f.label.as_deref().unwrap()).collect();
        assert_eq!(labels, vec!["Apple", "Apple Juice"]);
        assert_eq!(results.hints[0].measures.len(), 2);
        assert_eq!(results.parsed[0].food.as_ref().unwrap().nutrients[0].value, Some(52.0));
    }
}
