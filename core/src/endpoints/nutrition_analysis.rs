//! Nutrition analysis: `POST /api/nutrition-details`.

use serde_json::Value;

use crate::error::{RequestError, ValidationError};
use crate::http::{HttpMethod, Parameters, Transport};
use crate::models::NutritionFacts;
use crate::params::{optional_text, text_list};
use crate::request::{Endpoint, Request, Setter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutritionAnalysis {
    pub title: Option<String>,
    /// One ingredient per line, e.g. `1 cup rice`.
    pub ingr: Vec<String>,
    pub servings: Option<String>,
}

impl NutritionAnalysis {
    fn set_title(&mut self, value: Value) {
        self.title = optional_text(value);
    }

    fn set_ingr(&mut self, value: Value) {
        self.ingr = text_list(value);
    }

    fn set_yield(&mut self, value: Value) {
        self.servings = optional_text(value);
    }
}

impl Endpoint for NutritionAnalysis {
    const SETTERS: &'static [(&'static str, Setter<Self>)] = &[
        ("title", NutritionAnalysis::set_title),
        ("ingr", NutritionAnalysis::set_ingr),
        ("yield", NutritionAnalysis::set_yield),
    ];

    fn validate(&self) -> Result<(), ValidationError> {
        if self.ingr.iter().all(|line| line.trim().is_empty()) {
            return Err(ValidationError::new("at least one ingredient line is required"));
        }
        Ok(())
    }

    fn method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn path(&self) -> String {
        "/api/nutrition-details".to_string()
    }

    fn body(&self) -> Parameters {
        let mut body = Parameters::new();
        body.insert("title".to_string(), Value::from(self.title.clone()));
        body.insert("ingr".to_string(), Value::from(self.ingr.clone()));
        body.insert("yield".to_string(), Value::from(self.servings.clone()));
        body
    }
}

impl<T: Transport> Request<NutritionAnalysis, T> {
    pub fn nutrition_facts(&mut self) -> Result<NutritionFacts, RequestError> {
        self.hydrate_results()
    }
}
