//! Whitelist-driven construction of typed models from raw JSON maps.
//!
//! # Design
//! A model declares two static tables: the whitelist of raw keys it accepts
//! and a transformer table for the fields that need more than a plain copy
//! (nested objects, nested lists). `hydrate` walks the raw map once:
//! - keys outside the whitelist are ignored;
//! - whitelisted keys with a transformer are handed to it;
//! - every other whitelisted key is stored as-is through serde, so the raw
//!   value must already have the field's JSON shape.
//!
//! Fields whose key is absent or null keep their `Default` value. Models therefore
//! carry `#[serde(default)]` and use `Option` for scalars the API may omit.

use log::trace;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::HydrateError;

/// Builds a field's value from its raw input and stores it on the model.
pub type Apply<M> = fn(&mut M, Value) -> Result<(), HydrateError>;

/// A per-field transformer entry.
pub struct Transformer<M> {
    pub field: &'static str,
    pub apply: Apply<M>,
}

impl<M> Transformer<M> {
    pub const fn new(field: &'static str, apply: Apply<M>) -> Self {
        Self { field, apply }
    }
}

/// A hydration target.
pub trait Model: DeserializeOwned + Default + 'static {
    /// Raw keys eligible for assignment.
    const WHITELIST: &'static [&'static str];

    /// Fields built by a function instead of a plain copy.
    const TRANSFORMERS: &'static [Transformer<Self>] = &[];

    fn create(raw: &Map<String, Value>) -> Result<Self, HydrateError> {
        hydrate(raw, Self::WHITELIST, Self::TRANSFORMERS)
    }

    /// Hydrate from a value that must be an object. `field` names the
    /// position in the parent for error reporting.
    fn create_from_value(field: &str, value: &Value) -> Result<Self, HydrateError> {
        match value {
            Value::Object(raw) => Self::create(raw),
            _ => Err(HydrateError::NotAnObject {
                field: field.to_string(),
            }),
        }
    }
}

/// Construct an `M` from `raw`, honoring `whitelist` and `transformers`.
pub fn hydrate<M: DeserializeOwned>(
    raw: &Map<String, Value>,
    whitelist: &[&str],
    transformers: &[Transformer<M>],
) -> Result<M, HydrateError> {
    let mut direct = Map::new();
    let mut transformed = Vec::new();

    for (key, value) in raw {
        if !whitelist.contains(&key.as_str()) {
            trace!("hydrate: ignoring key `{key}`");
            continue;
        }
        match transformers.iter().find(|transformer| transformer.field == key.as_str()) {
            Some(transformer) => transformed.push((transformer, value.clone())),
            None if value.is_null() => trace!("hydrate: `{key}` is null, keeping default"),
            None => {
                direct.insert(key.clone(), value.clone());
            }
        }
    }

    let mut model: M = match serde_json::from_value(Value::Object(direct.clone())) {
        Ok(model) => model,
        Err(source) => return Err(invalid_field::<M>(&direct, source)),
    };

    for (transformer, value) in transformed {
        (transformer.apply)(&mut model, value)?;
    }

    Ok(model)
}

/// Retry each direct key on its own to name the field serde rejected.
fn invalid_field<M: DeserializeOwned>(
    direct: &Map<String, Value>,
    source: serde_json::Error,
) -> HydrateError {
    for (key, value) in direct {
        let mut single = Map::new();
        single.insert(key.clone(), value.clone());
        if let Err(source) = serde_json::from_value::<M>(Value::Object(single)) {
            return HydrateError::InvalidField {
                field: key.clone(),
                source,
            };
        }
    }
    HydrateError::InvalidField {
        field: model_name::<M>().to_string(),
        source,
    }
}

/// Unqualified type name, used when the rejection spans several fields.
fn model_name<M>() -> &'static str {
    let name = std::any::type_name::<M>();
    name.rsplit("::").next().unwrap_or(name)
}

/// Hydrate an optional nested object. Null means absent.
pub fn nested_one<N: Model>(field: &str, value: Value) -> Result<Option<N>, HydrateError> {
    match value {
        Value::Null => Ok(None),
        other => N::create_from_value(field, &other).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Portion {
        label: Option<String>,
        weight: Option<f64>,
    }

    impl Model for Portion {
        const WHITELIST: &'static [&'static str] = &["label", "weight"];
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Dish {
        label: Option<String>,
        secret: Option<String>,
        portion: Option<Portion>,
        calories: Option<f64>,
    }

    fn set_portion(dish: &mut Dish, value: Value) -> Result<(), HydrateError> {
        dish.portion = nested_one("portion", value)?;
        Ok(())
    }

    fn double_calories(dish: &mut Dish, value: Value) -> Result<(), HydrateError> {
        dish.calories = value.as_f64().map(|calories| calories * 2.0);
        Ok(())
    }

    impl Model for Dish {
        const WHITELIST: &'static [&'static str] = &["label", "portion", "calories"];
        const TRANSFORMERS: &'static [Transformer<Self>] = &[
            Transformer::new("portion", set_portion),
            Transformer::new("calories", double_calories),
        ];
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn copies_whitelisted_keys_and_ignores_the_rest() {
        let raw = object(json!({"label": "Apple", "bogus": "x", "secret": "s"}));
        let dish = Dish::create(&raw).unwrap();
        assert_eq!(dish.label.as_deref(), Some("Apple"));
        assert_eq!(dish.secret, None);
        assert_eq!(dish.portion, None);
    }

    #[test]
    fn transformer_output_is_assigned() {
        let raw = object(json!({"calories": 26.0}));
        let dish = Dish::create(&raw).unwrap();
        assert_eq!(dish.calories, Some(52.0));
    }

    #[test]
    fn nested_object_is_hydrated_recursively() {
        let raw = object(json!({
            "label": "Apple",
            "portion": {"label": "Whole", "weight": 182.0, "unknown": true},
        }));
        let dish = Dish::create(&raw).unwrap();
        assert_eq!(
            dish.portion,
            Some(Portion {
                label: Some("Whole".to_string()),
                weight: Some(182.0),
            })
        );
    }

    #[test]
    fn absent_keys_keep_defaults() {
        let dish = Dish::create(&Map::new()).unwrap();
        assert_eq!(dish, Dish::default());
    }

    #[test]
    fn explicit_tables_override_model_tables() {
        let raw = object(json!({"label": "Apple", "calories": 10.0}));
        let dish: Dish = hydrate(&raw, &["calories"], &[]).unwrap();
        assert_eq!(dish.label, None);
        assert_eq!(dish.calories, Some(10.0));
    }

    #[test]
    fn mismatched_direct_value_names_the_field() {
        let raw = object(json!({"label": "Apple", "calories": 1.0}));
        let err = hydrate::<Portion>(&object(json!({"label": 5})), Portion::WHITELIST, &[])
            .unwrap_err();
        assert!(matches!(err, HydrateError::InvalidField { field, .. } if field == "label"));
        assert!(Dish::create(&raw).is_ok());
    }

    #[test]
    fn null_direct_value_keeps_default() {
        #[derive(Debug, Default, Deserialize, PartialEq)]
        #[serde(default)]
        struct Tags {
            label: Option<String>,
            tags: Vec<String>,
        }

        impl Model for Tags {
            const WHITELIST: &'static [&'static str] = &["label", "tags"];
        }

        let raw = object(json!({"label": "Apple", "tags": null}));
        let tags = Tags::create(&raw).unwrap();
        assert_eq!(tags.label.as_deref(), Some("Apple"));
        assert!(tags.tags.is_empty());
        assert_eq!(Tags::create(&object(json!({"label": null}))).unwrap(), Tags::default());
    }

    #[test]
    fn cross_field_rejection_names_the_model() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(try_from = "RawRange")]
        struct Range {
            min: Option<i64>,
            max: Option<i64>,
        }

        #[derive(Default, Deserialize)]
        #[serde(default)]
        struct RawRange {
            min: Option<i64>,
            max: Option<i64>,
        }

        impl TryFrom<RawRange> for Range {
            type Error = String;

            fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
                if let (Some(min), Some(max)) = (raw.min, raw.max) {
                    if min > max {
                        return Err(format!("min {min} exceeds max {max}"));
                    }
                }
                Ok(Range {
                    min: raw.min,
                    max: raw.max,
                })
            }
        }

        impl Model for Range {
            const WHITELIST: &'static [&'static str] = &["min", "max"];
        }

        let err = Range::create(&object(json!({"min": 5, "max": 3}))).unwrap_err();
        assert!(matches!(err, HydrateError::InvalidField { ref field, .. } if field == "Range"));

        let range = Range::create(&object(json!({"min": 1, "max": 3}))).unwrap();
        assert_eq!((range.min, range.max), (Some(1), Some(3)));
    }

    #[test]
    fn nested_non_object_is_rejected() {
        let raw = object(json!({"portion": "whole"}));
        let err = Dish::create(&raw).unwrap_err();
        assert!(matches!(err, HydrateError::NotAnObject { field } if field == "portion"));
    }

    #[test]
    fn nested_null_is_absent() {
        let raw = object(json!({"portion": null}));
        assert_eq!(Dish::create(&raw).unwrap().portion, None);
    }
}
