//! Concrete API calls.

pub mod food_search;
pub mod nutrition_analysis;
pub mod recipe_search;

pub use food_search::FoodSearch;
pub use nutrition_analysis::NutritionAnalysis;
pub use recipe_search::RecipeSearch;

use serde_json::Value;

/// An empty list is sent as null so the filter drops it.
fn list_or_null(items: &[String]) -> Value {
    if items.is_empty() {
        Value::Null
    } else {
        Value::from(items.to_vec())
    }
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().map_or(true, |text| text.trim().is_empty())
}
