//! Food database parser: `GET /api/food-database/v2/parser`.

use serde_json::Value;

use crate::endpoints::{is_blank, list_or_null};
use crate::error::{RequestError, ValidationError};
use crate::http::{Parameters, Transport};
use crate::models::FoodSearchResults;
use crate::params::{optional_text, text_list};
use crate::request::{Endpoint, Request, Setter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodSearch {
    /// Free-text ingredient query, e.g. `1 large apple`.
    pub ingr: Option<String>,
    /// Barcode lookup.
    pub upc: Option<String>,
    /// `cooking` or `logging`.
    pub nutrition_type: Option<String>,
    pub category: Vec<String>,
    pub health: Vec<String>,
}

impl FoodSearch {
    pub fn for_ingredient(ingr: impl Into<String>) -> Self {
        Self {
            ingr: Some(ingr.into()),
            ..Self::default()
        }
    }

    fn set_ingr(&mut self, value: Value) {
        self.ingr = optional_text(value);
    }

    fn set_upc(&mut self, value: Value) {
        self.upc = optional_text(value);
    }

    fn set_nutrition_type(&mut self, value: Value) {
        self.nutrition_type = optional_text(value);
    }

    fn set_category(&mut self, value: Value) {
        self.category = text_list(value);
    }

    fn set_health(&mut self, value: Value) {
        self.health = text_list(value);
    }
}

impl Endpoint for FoodSearch {
    const SETTERS: &'static [(&'static str, Setter<Self>)] = &[
        ("ingr", FoodSearch::set_ingr),
        ("upc", FoodSearch::set_upc),
        ("nutrition-type", FoodSearch::set_nutrition_type),
        ("category", FoodSearch::set_category),
        ("health", FoodSearch::set_health),
    ];

    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.ingr) && is_blank(&self.upc) {
            return Err(ValidationError::new("either `ingr` or `upc` is required"));
        }
        Ok(())
    }

    fn path(&self) -> String {
        "/api/food-database/v2/parser".to_string()
    }

    fn query(&self) -> Parameters {
        let mut query = Parameters::new();
        query.insert("ingr".to_string(), Value::from(self.ingr.clone()));
        query.insert("upc".to_string(), Value::from(self.upc.clone()));
        query.insert(
            "nutrition-type".to_string(),
            Value::from(self.nutrition_type.clone()),
        );
        query.insert("category".to_string(), list_or_null(&self.category));
        query.insert("health".to_string(), list_or_null(&self.health));
        query
    }
}

impl<T: Transport> Request<FoodSearch, T> {
    pub fn food_results(&mut self) -> Result<FoodSearchResults, RequestError> {
        self.hydrate_results()
    }
}
