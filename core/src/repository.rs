//! Factory for list-valued nested fields.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::HydrateError;
use crate::hydrate::{hydrate, Model, Transformer};

/// Hydrate every record in order. The output has exactly one element per
/// input record; an empty input yields an empty list.
pub fn create_all<M: DeserializeOwned>(
    records: &[Value],
    whitelist: &[&str],
    transformers: &[Transformer<M>],
) -> Result<Vec<M>, HydrateError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| match record {
            Value::Object(raw) => hydrate(raw, whitelist, transformers),
            _ => Err(HydrateError::NotAnObject {
                field: format!("[{index}]"),
            }),
        })
        .collect()
}

/// `create_all` bound to a model's own whitelist and transformers.
pub struct NestedRepository<M> {
    _model: PhantomData<M>,
}

impl<M: Model> NestedRepository<M> {
    pub fn create_all(records: &[Value]) -> Result<Vec<M>, HydrateError> {
        create_all(records, M::WHITELIST, M::TRANSFORMERS)
    }

    /// Transformer helper for a list field. Null is treated as an empty list.
    pub fn from_value(field: &str, value: Value) -> Result<Vec<M>, HydrateError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(records) => Self::create_all(&records),
            _ => Err(HydrateError::NotAList {
                field: field.to_string(),
            }),
        }
    }
}
