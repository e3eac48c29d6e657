use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HydrateError;
use crate::hydrate::{nested_one, Model, Transformer};
use crate::models::Nutrient;
use crate::repository::NestedRepository;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    pub uri: Option<String>,
    pub label: Option<String>,
    pub image: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "yield")]
    pub servings: Option<f64>,
    pub calories: Option<f64>,
    #[serde(rename = "ingredientLines")]
    pub ingredient_lines: Vec<String>,
    #[serde(rename = "totalNutrients")]
    pub total_nutrients: Vec<Nutrient>,
}

fn set_recipe_nutrients(recipe: &mut Recipe, value: Value) -> Result<(), HydrateError> {
    recipe.total_nutrients = Nutrient::list_from_value("totalNutrients", value)?;
    Ok(())
}

impl Model for Recipe {
    const WHITELIST: &'static [&'static str] = &[
        "uri",
        "label",
        "image",
        "source",
        "url",
        "yield",
        "calories",
        "ingredientLines",
        "totalNutrients",
    ];

    const TRANSFORMERS: &'static [Transformer<Self>] =
        &[Transformer::new("totalNutrients", set_recipe_nutrients)];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeHit {
    pub recipe: Option<Recipe>,
}

fn set_hit_recipe(hit: &mut RecipeHit, value: Value) -> Result<(), HydrateError> {
    hit.recipe = nested_one("recipe", value)?;
    Ok(())
}

impl Model for RecipeHit {
    const WHITELIST: &'static [&'static str] = &["recipe"];

    const TRANSFORMERS: &'static [Transformer<Self>] =
        &[Transformer::new("recipe", set_hit_recipe)];
}

/// Body of a recipe search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeSearchResults {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub count: Option<u64>,
    pub hits: Vec<RecipeHit>,
}

fn set_hits(results: &mut RecipeSearchResults, value: Value) -> Result<(), HydrateError> {
    results.hits = NestedRepository::from_value("hits", value)?;
    Ok(())
}

impl Model for RecipeSearchResults {
    const WHITELIST: &'static [&'static str] = &["from", "to", "count", "hits"];

    const TRANSFORMERS: &'static [Transformer<Self>] = &[Transformer::new("hits", set_hits)];
}

impl RecipeSearchResults {
    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.hits.iter().filter_map(|hit| hit.recipe.as_ref())
    }
}
