//! Domain models hydrated from API payloads.
//!
//! Every model lists the raw keys it accepts in `Model::WHITELIST`. Keys
//! that hold nested objects or lists are built by entries in
//! `Model::TRANSFORMERS`; everything else is copied as-is.

pub mod food;
pub mod measurement;
pub mod nutrient;
pub mod nutrition;
pub mod recipe;

pub use food::{Food, FoodMatch, FoodSearchResults};
pub use measurement::Measurement;
pub use nutrient::Nutrient;
pub use nutrition::NutritionFacts;
pub use recipe::{Recipe, RecipeHit, RecipeSearchResults};
