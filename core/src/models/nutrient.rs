use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HydrateError;
use crate::hydrate::Model;
use crate::repository::NestedRepository;

/// One nutrient amount, identified by its code (`ENERC_KCAL`, `FAT`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrient {
    pub code: Option<String>,
    pub label: Option<String>,
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl Model for Nutrient {
    const WHITELIST: &'static [&'static str] = &["code", "label", "value", "unit"];
}

impl Nutrient {
    /// Build a nutrient list from either form the API uses:
    ///
    /// - a list of records: `[{"code": "FAT", "value": 0.2}]`
    /// - a map keyed by code, holding either the amount or a record:
    ///   `{"FAT": 0.2}` or `{"FAT": {"label": "Fat", "quantity": 0.2, "unit": "g"}}`
    ///
    /// The map form is turned into records in the order the keys appear in
    /// the response, with `quantity` read as `value`.
    pub fn list_from_value(field: &str, value: Value) -> Result<Vec<Nutrient>, HydrateError> {
        match value {
            Value::Object(by_code) => {
                let records: Vec<Value> = by_code
                    .into_iter()
                    .map(|(code, amount)| keyed_record(code, amount))
                    .collect();
                NestedRepository::create_all(&records)
            }
            other => NestedRepository::from_value(field, other),
        }
    }
}

fn keyed_record(code: String, amount: Value) -> Value {
    let mut record = match amount {
        Value::Object(mut fields) => {
            if let Some(quantity) = fields.remove("quantity") {
                fields.entry("value").or_insert(quantity);
            }
            fields
        }
        scalar => {
            let mut fields = Map::new();
            fields.insert("value".to_string(), scalar);
            fields
        }
    };
    record.insert("code".to_string(), Value::String(code));
    Value::Object(record)
}
