//! Recipe search: `GET /api/recipes/v2`.

use serde_json::Value;

use crate::endpoints::{is_blank, list_or_null};
use crate::error::{RequestError, ValidationError};
use crate::http::{Parameters, Transport};
use crate::models::RecipeSearchResults;
use crate::params::{optional_text, text_list};
use crate::request::{Endpoint, Request, Setter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeSearch {
    pub q: Option<String>,
    pub diet: Vec<String>,
    pub health: Vec<String>,
    pub cuisine_type: Vec<String>,
    pub meal_type: Vec<String>,
    /// Range such as `100-300`, or `300+`.
    pub calories: Option<String>,
}

impl RecipeSearch {
    pub fn for_query(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    fn set_q(&mut self, value: Value) {
        self.q = optional_text(value);
    }

    fn set_diet(&mut self, value: Value) {
        self.diet = text_list(value);
    }

    fn set_health(&mut self, value: Value) {
        self.health = text_list(value);
    }

    fn set_cuisine_type(&mut self, value: Value) {
        self.cuisine_type = text_list(value);
    }

    fn set_meal_type(&mut self, value: Value) {
        self.meal_type = text_list(value);
    }

    fn set_calories(&mut self, value: Value) {
        self.calories = optional_text(value);
    }
}

impl Endpoint for RecipeSearch {
    const SETTERS: &'static [(&'static str, Setter<Self>)] = &[
        ("q", RecipeSearch::set_q),
        ("diet", RecipeSearch::set_diet),
        ("health", RecipeSearch::set_health),
        ("cuisineType", RecipeSearch::set_cuisine_type),
        ("mealType", RecipeSearch::set_meal_type),
        ("calories", RecipeSearch::set_calories),
    ];

    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.q) {
            return Err(ValidationError::new("a search term `q` is required"));
        }
        Ok(())
    }

    fn path(&self) -> String {
        "/api/recipes/v2".to_string()
    }

    fn query(&self) -> Parameters {
        let mut query = Parameters::new();
        query.insert("type".to_string(), Value::from("public"));
        query.insert("q".to_string(), Value::from(self.q.clone()));
        query.insert("diet".to_string(), list_or_null(&self.diet));
        query.insert("health".to_string(), list_or_null(&self.health));
        query.insert("cuisineType".to_string(), list_or_null(&self.cuisine_type));
        query.insert("mealType".to_string(), list_or_null(&self.meal_type));
        query.insert("calories".to_string(), Value::from(self.calories.clone()));
        query
    }
}

impl<T: Transport> Request<RecipeSearch, T> {
    pub fn recipe_results(&mut self) -> Result<RecipeSearchResults, RequestError> {
        self.hydrate_results()
    }
}
