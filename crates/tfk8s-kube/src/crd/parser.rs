//! CRD YAML parser
//!
//! Parses CustomResourceDefinition manifests into a structured `CrdSchema`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::schema::{
    AdditionalProperties, CrdNames, CrdSchema, CrdScope, CrdVersionSchema, OpenApiSchema,
    PropertyType, SchemaProperty,
};
use crate::error::{KubeError, Result};

/// Parser for CRD manifests
pub struct CrdParser;

impl CrdParser {
    /// Parse a single CRD YAML (or JSON) document
    pub fn parse(yaml: &str) -> Result<CrdSchema> {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| KubeError::InvalidCrd(format!("invalid YAML: {}", e)))?;

        Self::parse_value(&value)
    }

    /// Parse every CRD in a multi-document YAML stream
    ///
    /// Documents that are not CRDs are skipped; `kind: List` items are expanded.
    pub fn parse_all(yaml: &str) -> Result<Vec<CrdSchema>> {
        let mut crds = Vec::new();

        for document in serde_yaml::Deserializer::from_str(yaml) {
            let value = Value::deserialize(document)
                .map_err(|e| KubeError::InvalidCrd(format!("invalid YAML: {}", e)))?;

            match value.get("kind").and_then(Value::as_str) {
                Some("CustomResourceDefinition") => crds.push(Self::parse_value(&value)?),
                Some("List") => {
                    let items = value.get("items").and_then(Value::as_array);
                    for item in items.into_iter().flatten() {
                        if Self::is_crd(item) {
                            crds.push(Self::parse_value(item)?);
                        }
                    }
                }
                Some(other) => tracing::debug!(kind = other, "skipping non-CRD document"),
                None => {}
            }
        }

        Ok(crds)
    }

    /// Check whether a document is a CustomResourceDefinition
    pub fn is_crd(value: &Value) -> bool {
        value.get("kind").and_then(Value::as_str) == Some("CustomResourceDefinition")
    }

    /// Parse from a serde_json::Value
    pub fn parse_value(value: &Value) -> Result<CrdSchema> {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| KubeError::InvalidCrd("missing 'kind' field".to_string()))?;

        if kind != "CustomResourceDefinition" {
            return Err(KubeError::InvalidCrd(format!(
                "expected CustomResourceDefinition, got {}",
                kind
            )));
        }

        let name = value
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .ok_or_else(|| KubeError::InvalidCrd("missing 'metadata.name' field".to_string()))?
            .to_string();

        let spec = value
            .get("spec")
            .ok_or_else(|| KubeError::InvalidCrd(format!("{}: missing 'spec' field", name)))?;

        let group = spec
            .get("group")
            .and_then(Value::as_str)
            .ok_or_else(|| KubeError::InvalidCrd(format!("{}: missing 'spec.group' field", name)))?
            .to_string();

        let scope = match spec.get("scope").and_then(Value::as_str) {
            Some("Cluster") => CrdScope::Cluster,
            _ => CrdScope::Namespaced,
        };

        let names = Self::parse_names(&name, spec.get("names"))?;
        let versions = Self::parse_versions(&name, spec.get("versions"))?;

        Ok(CrdSchema {
            name,
            group,
            scope,
            names,
            versions,
        })
    }

    fn parse_names(crd: &str, names_value: Option<&Value>) -> Result<CrdNames> {
        let names = names_value
            .ok_or_else(|| KubeError::InvalidCrd(format!("{}: missing 'spec.names' field", crd)))?;

        let kind = names
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| KubeError::InvalidCrd(format!("{}: missing 'spec.names.kind'", crd)))?
            .to_string();

        Ok(CrdNames {
            plural: names
                .get("plural")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| format!("{}s", kind.to_lowercase())),
            kind,
            short_names: Self::string_list(names.get("shortNames")).unwrap_or_default(),
        })
    }

    fn parse_versions(crd: &str, versions_value: Option<&Value>) -> Result<Vec<CrdVersionSchema>> {
        let versions = versions_value.and_then(Value::as_array).ok_or_else(|| {
            KubeError::InvalidCrd(format!("{}: missing 'spec.versions' array", crd))
        })?;

        versions
            .iter()
            .map(|v| Self::parse_version(crd, v))
            .collect()
    }

    fn parse_version(crd: &str, version: &Value) -> Result<CrdVersionSchema> {
        let name = version
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| KubeError::InvalidCrd(format!("{}: version missing 'name'", crd)))?
            .to_string();

        let raw_schema = version
            .get("schema")
            .and_then(|s| s.get("openAPIV3Schema"))
            .cloned();

        Ok(CrdVersionSchema {
            served: version
                .get("served")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            storage: version
                .get("storage")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            deprecated: version
                .get("deprecated")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            schema: raw_schema.as_ref().map(Self::parse_openapi_schema),
            raw_schema,
            name,
        })
    }

    fn parse_openapi_schema(schema: &Value) -> OpenApiSchema {
        OpenApiSchema {
            description: schema
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            properties: Self::parse_properties(schema).unwrap_or_default(),
            required: Self::string_list(schema.get("required")).unwrap_or_default(),
            x_preserve_unknown: Self::flag(schema, "x-kubernetes-preserve-unknown-fields"),
        }
    }

    fn parse_properties(schema: &Value) -> Option<IndexMap<String, SchemaProperty>> {
        schema.get("properties").and_then(Value::as_object).map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), Self::parse_schema_property(v)))
                .collect()
        })
    }

    /// Parse a single schema property (recursive)
    fn parse_schema_property(prop: &Value) -> SchemaProperty {
        let additional_properties = prop.get("additionalProperties").map(|v| match v {
            Value::Bool(true) => AdditionalProperties::Allowed,
            Value::Bool(false) => AdditionalProperties::Denied,
            schema => AdditionalProperties::Schema(Box::new(Self::parse_schema_property(schema))),
        });

        SchemaProperty {
            type_: prop
                .get("type")
                .and_then(Value::as_str)
                .map(PropertyType::parse)
                .unwrap_or_default(),
            description: prop
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            format: prop.get("format").and_then(Value::as_str).map(String::from),
            pattern: prop
                .get("pattern")
                .and_then(Value::as_str)
                .map(String::from),
            enum_values: prop.get("enum").and_then(Value::as_array).cloned(),
            properties: Self::parse_properties(prop),
            required: Self::string_list(prop.get("required")),
            items: prop
                .get("items")
                .map(|v| Box::new(Self::parse_schema_property(v))),
            additional_properties,
            x_preserve_unknown: Self::flag(prop, "x-kubernetes-preserve-unknown-fields"),
            x_int_or_string: Self::flag(prop, "x-kubernetes-int-or-string"),
        }
    }

    fn flag(value: &Value, key: &str) -> bool {
        value.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
        value.and_then(Value::as_array).map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
    }
}
