//! Conversion between configuration/state values and Kubernetes JSON
//!
//! Configuration uses snake_case attribute names; Kubernetes objects use the
//! field names recorded in [`Attribute::json_name`].

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::error::{CoreError, Result};
use crate::path::AttributePath;
use crate::schema::{Attribute, AttributeKind, Schema};
use crate::value::Value;

/// Convert configuration into the JSON body of a Kubernetes object
///
/// Null attributes are dropped and computed-only attributes are ignored.
/// Unknown values cannot be rendered and produce an error.
pub fn config_to_json(schema: &Schema, config: &Value) -> Result<JsonValue> {
    let empty = IndexMap::new();
    let values = match config {
        Value::Map(values) => values,
        Value::Null => &empty,
        other => {
            return Err(CoreError::InvalidConfig {
                found: other.type_name().to_string(),
            });
        }
    };

    attributes_to_json(&schema.attributes, values, &AttributePath::root())
}

fn attributes_to_json(
    attributes: &[Attribute],
    values: &IndexMap<String, Value>,
    path: &AttributePath,
) -> Result<JsonValue> {
    let mut obj = serde_json::Map::new();

    for attribute in attributes {
        if !attribute.mode.is_configurable() {
            continue;
        }
        let Some(value) = values.get(&attribute.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let json = kind_to_json(&attribute.kind, value, &path.with_attribute(&attribute.name))?;
        obj.insert(attribute.json_name.clone(), json);
    }

    Ok(JsonValue::Object(obj))
}

fn kind_to_json(kind: &AttributeKind, value: &Value, path: &AttributePath) -> Result<JsonValue> {
    match (kind, value) {
        (_, Value::Unknown) => Err(CoreError::UnknownValue {
            path: path.to_string(),
        }),
        (_, Value::Null) => Ok(JsonValue::Null),
        (AttributeKind::Object(attributes), Value::Map(values)) => {
            attributes_to_json(attributes, values, path)
        }
        (AttributeKind::List(elem), Value::List(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| kind_to_json(elem, item, &path.with_index(i)))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        (AttributeKind::Map(elem), Value::Map(entries)) => {
            let mut obj = serde_json::Map::new();
            for (key, entry) in entries {
                obj.insert(key.clone(), kind_to_json(elem, entry, &path.with_key(key))?);
            }
            Ok(JsonValue::Object(obj))
        }
        (AttributeKind::Object(_) | AttributeKind::List(_) | AttributeKind::Map(_), other) => {
            Err(CoreError::SchemaMismatch {
                path: path.to_string(),
                message: format!("expected {}, got {}", kind.type_name(), other.type_name()),
            })
        }
        (_, scalar) => scalar.to_json().ok_or_else(|| CoreError::UnknownValue {
            path: path.to_string(),
        }),
    }
}

/// Map a Kubernetes object back into state
///
/// Attributes missing from the object are null; fields the schema does not
/// describe are ignored.
pub fn json_to_state(schema: &Schema, object: &JsonValue) -> Value {
    attributes_to_state(&schema.attributes, object)
}

fn attributes_to_state(attributes: &[Attribute], object: &JsonValue) -> Value {
    Value::Map(
        attributes
            .iter()
            .map(|attribute| {
                let value = match object.get(&attribute.json_name) {
                    None | Some(JsonValue::Null) => Value::Null,
                    Some(field) => kind_to_state(&attribute.kind, field),
                };
                (attribute.name.clone(), value)
            })
            .collect(),
    )
}

fn kind_to_state(kind: &AttributeKind, json: &JsonValue) -> Value {
    match (kind, json) {
        (AttributeKind::Object(attributes), JsonValue::Object(_)) => {
            attributes_to_state(attributes, json)
        }
        (AttributeKind::List(elem), JsonValue::Array(items)) => {
            Value::List(items.iter().map(|item| kind_to_state(elem, item)).collect())
        }
        (AttributeKind::Map(elem), JsonValue::Object(entries)) => Value::Map(
            entries
                .iter()
                .map(|(key, entry)| (key.clone(), kind_to_state(elem, entry)))
                .collect(),
        ),
        _ => Value::from_json(json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new(vec![
            Attribute::new("id", AttributeKind::String).computed(),
            Attribute::new(
                "spec",
                AttributeKind::Object(vec![
                    Attribute::new("secret_name", AttributeKind::String).json_name("secretName"),
                    Attribute::new("dns_names", AttributeKind::List(Box::new(AttributeKind::String)))
                        .json_name("dnsNames"),
                    Attribute::new("target_port", AttributeKind::Dynamic).json_name("targetPort"),
                    Attribute::new(
                        "issuer_ref",
                        AttributeKind::Object(vec![
                            Attribute::new("name", AttributeKind::String),
                            Attribute::new("kind", AttributeKind::String),
                        ]),
                    )
                    .json_name("issuerRef"),
                ]),
            ),
        ])
    }

    #[test]
    fn test_config_to_json_renames_fields() {
        let config = Value::from_yaml_str(
            r#"
id: ignored
spec:
  secret_name: tls
  dns_names: [example.com]
  target_port: 8443
  issuer_ref:
    name: letsencrypt
"#,
        )
        .unwrap();

        let json = config_to_json(&schema(), &config).unwrap();
        assert_eq!(
            json,
            json!({
                "spec": {
                    "secretName": "tls",
                    "dnsNames": ["example.com"],
                    "targetPort": 8443,
                    "issuerRef": {"name": "letsencrypt"},
                }
            })
        );
    }

    #[test]
    fn test_config_to_json_rejects_unknown() {
        let config = Value::from_yaml_str("spec:\n  secret_name: (known after apply)\n").unwrap();
        let err = config_to_json(&schema(), &config).unwrap_err();
        match err {
            CoreError::UnknownValue { path } => assert_eq!(path, "spec.secret_name"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_config_to_json_schema_mismatch() {
        let config = Value::from_yaml_str("spec: nope\n").unwrap();
        assert!(matches!(
            config_to_json(&schema(), &config),
            Err(CoreError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_json_to_state() {
        let object = json!({
            "apiVersion": "cert-manager.io/v1",
            "kind": "Certificate",
            "spec": {
                "secretName": "tls",
                "targetPort": "https",
                "extra": true,
            }
        });

        let state = json_to_state(&schema(), &object);
        assert!(state.get("id").unwrap().is_null());

        let spec = state.get("spec").unwrap();
        assert_eq!(spec.get("secret_name"), Some(&Value::from("tls")));
        assert_eq!(spec.get("target_port"), Some(&Value::from("https")));
        assert!(spec.get("dns_names").unwrap().is_null());
        assert!(spec.get("extra").is_none());
    }
}
