//! Parameter map helpers.

use serde_json::Value;

use crate::http::Parameters;

/// Return a copy of `parameters` without the null-valued entries.
///
/// Non-null entries keep their values and their relative order.
pub fn filter_parameters(parameters: &Parameters) -> Parameters {
    parameters
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Flatten a query map into name/value pairs.
///
/// Arrays repeat their key once per element, nulls are skipped, and every
/// other scalar is rendered without JSON quoting.
pub fn query_pairs(query: &Parameters) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in query {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items.iter().filter(|item| !item.is_null()) {
                    pairs.push((key.clone(), scalar_text(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_text(other))),
        }
    }
    pairs
}

/// Read a mass-assigned value as optional text.
pub(crate) fn optional_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Read a mass-assigned value as a list of text entries. A single scalar
/// becomes a one-element list.
pub(crate) fn text_list(value: Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().filter_map(optional_text).collect(),
        other => optional_text(other).into_iter().collect(),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
