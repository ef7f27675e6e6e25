// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conformance guard for structured-extraction results.
//
// A success response from `parseStructuredResponse` must match the schema the
// caller supplied or not be returned at all. Only JSON object schemas
// (`{"type": "object", "properties": {..}, "required": [..]}`) are enforced,
// and a schema with `required` but no `properties` allows any key; free-form
// descriptions pass through. An empty mapping is the degraded
// "capability not wired" answer and is never rejected.

use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};

/// What the guard understood from a schema string.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaShape {
    /// Not a JSON object schema; nothing to enforce.
    FreeForm,
    Object {
        /// `None` when the schema declares no `properties`: any key is allowed.
        properties: Option<Map<String, Value>>,
        required: Vec<String>,
    },
}

impl SchemaShape {
    pub fn parse(schema: &str) -> Self {
        let Ok(Value::Object(root)) = serde_json::from_str::<Value>(schema) else {
            return Self::FreeForm;
        };

        let properties = match root.get("properties") {
            Some(Value::Object(properties)) => Some(properties.clone()),
            _ => None,
        };
        let required: Vec<String> = root
            .get("required")
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        if properties.is_none() && required.is_empty() {
            return Self::FreeForm;
        }

        Self::Object {
            properties,
            required,
        }
    }

    /// Reject `result` unless it fully conforms.
    pub fn check(&self, result: &Map<String, Value>) -> Result<()> {
        let Self::Object {
            properties,
            required,
        } = self
        else {
            return Ok(());
        };
        if result.is_empty() {
            return Ok(());
        }

        if let Some(properties) = properties {
            for (key, value) in result {
                let Some(property) = properties.get(key) else {
                    return Err(BridgeError::SchemaMismatch(format!(
                        "unexpected key `{key}`"
                    )));
                };
                if !type_matches(property.get("type"), value) {
                    return Err(BridgeError::SchemaMismatch(format!(
                        "key `{key}` has the wrong type"
                    )));
                }
            }
        }

        let missing: Vec<&str> = required
            .iter()
            .filter(|key| !result.contains_key(key.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(BridgeError::SchemaMismatch(format!(
                "missing required keys: {}",
                missing.join(", ")
            )));
        }

        Ok(())
    }
}

fn type_matches(declared: Option<&Value>, value: &Value) -> bool {
    match declared {
        None => true,
        Some(Value::String(name)) => value_is(name, value),
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| value_is(name, value)),
        Some(_) => true,
    }
}

fn value_is(type_name: &str, value: &Value) -> bool {
    match type_name {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.as_f64().is_some_and(|f| f.fract() == 0.0),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        // Unknown type keywords are not ours to police.
        _ => true,
    }
}
