//! Structural validation of rendered objects against the CRD's openAPIV3Schema
//!
//! This is the check the API server performs on admission. It complements the
//! attribute walk by enforcing constraints the attribute schema does not
//! model (enums, lengths, bounds).

use serde_json::{Value as JsonValue, json};
use tfk8s_core::{AttributePath, Diagnostics};

use crate::crd::CrdVersionSchema;
use crate::error::{KubeError, Result};

/// Compiled openAPIV3Schema of one CRD version
pub struct StructuralValidator {
    compiled: jsonschema::Validator,
}

impl StructuralValidator {
    /// Compile the schema of a CRD version
    ///
    /// Returns `None` for versions without a schema.
    pub fn new(version: &CrdVersionSchema) -> Result<Option<Self>> {
        let Some(raw) = &version.raw_schema else {
            return Ok(None);
        };

        let schema = to_json_schema(raw);
        let compiled = jsonschema::validator_for(&schema).map_err(|e| {
            KubeError::InvalidCrd(format!("schema of version {} cannot be compiled: {}", version.name, e))
        })?;

        Ok(Some(Self { compiled }))
    }

    /// Validate an object body, one diagnostic per violation
    pub fn validate(&self, object: &JsonValue) -> Diagnostics {
        let mut diags = Diagnostics::new();
        if self.compiled.is_valid(object) {
            return diags;
        }

        for error in self.compiled.iter_errors(object) {
            let path = pointer_to_path(&error.instance_path.to_string());
            diags.add_error(&path, "Schema Violation", error.to_string().replace('"', "'"));
        }

        diags
    }
}

/// Rewrite OpenAPI-only keywords into JSON Schema
///
/// `nullable: true` widens `type` to also accept null.
fn to_json_schema(schema: &JsonValue) -> JsonValue {
    match schema {
        JsonValue::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), to_json_schema(value));
            }

            let nullable = map.get("nullable").and_then(JsonValue::as_bool).unwrap_or(false);
            if nullable {
                if let Some(JsonValue::String(ty)) = map.get("type") {
                    out.insert("type".to_string(), json!([ty, "null"]));
                }
            }
            out.remove("nullable");

            JsonValue::Object(out)
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(to_json_schema).collect()),
        other => other.clone(),
    }
}

/// Convert a JSON pointer (`/spec/dnsNames/0`) to an attribute path
fn pointer_to_path(pointer: &str) -> AttributePath {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .fold(AttributePath::root(), |path, segment| {
            match segment.parse::<usize>() {
                Ok(index) => path.with_index(index),
                Err(_) => path.with_attribute(segment),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::CrdParser;

    const WIDGET_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names:
    kind: Widget
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                size:
                  type: string
                  enum: [small, large]
                replicas:
                  type: integer
                  minimum: 1
                note:
                  type: string
                  nullable: true
                hosts:
                  type: array
                  items:
                    type: string
                    maxLength: 5
"#;

    fn validator() -> StructuralValidator {
        let crd = CrdParser::parse(WIDGET_CRD).unwrap();
        StructuralValidator::new(&crd.versions[0]).unwrap().unwrap()
    }

    #[test]
    fn test_valid_object() {
        let diags = validator().validate(&json!({
            "apiVersion": "example.com/v1",
            "kind": "Widget",
            "metadata": {"name": "w"},
            "spec": {"size": "small", "replicas": 2, "note": null},
        }));
        assert!(diags.is_empty(), "{}", diags);
    }

    #[test]
    fn test_violations() {
        let diags = validator().validate(&json!({
            "spec": {"size": "medium", "replicas": 0, "hosts": ["ok", "too-long"]},
        }));

        let mut paths: Vec<String> = diags.iter().map(|d| d.path.to_string()).collect();
        paths.sort();
        assert_eq!(paths, vec!["spec.hosts[1]", "spec.replicas", "spec.size"]);
        assert!(diags.iter().all(|d| d.summary == "Schema Violation"));
    }

    #[test]
    fn test_version_without_schema() {
        let crd = CrdParser::parse(
            "kind: CustomResourceDefinition\nmetadata:\n  name: a.b\nspec:\n  group: b\n  names:\n    kind: A\n  versions:\n    - name: v1\n",
        )
        .unwrap();
        assert!(StructuralValidator::new(&crd.versions[0]).unwrap().is_none());
    }

    #[test]
    fn test_pointer_to_path() {
        assert_eq!(pointer_to_path("").to_string(), "(root)");
        assert_eq!(
            pointer_to_path("/spec/ports/0/port").to_string(),
            "spec.ports[0].port"
        );
    }
}
