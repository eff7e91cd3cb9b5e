//! Attribute schema generation from CRD versions
//!
//! Every served CRD version yields three schemas, one per [`ResourceFlavor`]:
//!
//! - **Resource**: configurable object, applied with Server-Side Apply
//! - **DataSource**: read-only view of a live object, addressed by name
//! - **Manifest**: configurable object rendered to YAML in the `yaml` attribute
//!
//! ```text
//! openAPIV3Schema              Schema
//! ───────────────              ──────
//!                          ──► id, api_version, kind        (computed)
//! metadata                 ──► metadata { name, namespace, labels, annotations }
//! spec.secretName          ──► spec.secret_name             (snake_case)
//! status                   ──► (dropped)
//!                          ──► yaml                         (manifest only)
//! ```

use std::collections::HashSet;
use std::fmt;

use tfk8s_core::validators::{
    AnnotationValidator, Base64Validator, DateTimeValidator, LabelValidator, NameValidator,
    PortValidator, RegexValidator,
};
use tfk8s_core::{Attribute, AttributeKind, AttributeMode, Schema};

use crate::crd::{AdditionalProperties, CrdSchema, CrdVersionSchema, PropertyType, SchemaProperty};
use crate::naming::snake_case;

/// Root properties handled separately or not exposed
const RESERVED_ROOT_PROPERTIES: &[&str] = &["apiVersion", "kind", "metadata", "status"];

/// Computed attribute holding the rendered manifest
const MANIFEST_YAML_ATTRIBUTE: &str = "yaml";

/// Variant of a generated type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFlavor {
    /// Managed object (create/update/delete)
    Resource,
    /// Read-only lookup of an existing object
    DataSource,
    /// Object rendered to a YAML manifest
    Manifest,
}

impl ResourceFlavor {
    pub const ALL: [ResourceFlavor; 3] = [
        ResourceFlavor::Resource,
        ResourceFlavor::DataSource,
        ResourceFlavor::Manifest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceFlavor::Resource => "resource",
            ResourceFlavor::DataSource => "data source",
            ResourceFlavor::Manifest => "manifest",
        }
    }

    fn is_read_only(self) -> bool {
        self == ResourceFlavor::DataSource
    }
}

impl fmt::Display for ResourceFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds attribute schemas for one CRD version
pub struct SchemaGenerator<'a> {
    crd: &'a CrdSchema,
    version: &'a CrdVersionSchema,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(crd: &'a CrdSchema, version: &'a CrdVersionSchema) -> Self {
        Self { crd, version }
    }

    /// Generate the schema of a flavor
    pub fn generate(&self, flavor: ResourceFlavor) -> Schema {
        let api_version = self.crd.api_version(&self.version.name);
        let kind = &self.crd.names.kind;

        let mut attributes = vec![
            Attribute::new("id", AttributeKind::String)
                .computed()
                .description(if self.crd.is_namespaced() {
                    "Contains the value `metadata.namespace/metadata.name`."
                } else {
                    "Contains the value `metadata.name`."
                }),
            Attribute::new("api_version", AttributeKind::String)
                .json_name("apiVersion")
                .computed()
                .description(format!("The API group of the requested resource: `{}`.", api_version)),
            Attribute::new("kind", AttributeKind::String)
                .computed()
                .description(format!("The type of the requested resource: `{}`.", kind)),
            self.metadata(flavor),
        ];

        // `yaml` is reserved in every flavor
        let mut seen: HashSet<String> = attributes
            .iter()
            .map(|a| a.name.clone())
            .chain(std::iter::once(MANIFEST_YAML_ATTRIBUTE.to_string()))
            .collect();

        if let Some(openapi) = &self.version.schema {
            for (json_name, prop) in &openapi.properties {
                if RESERVED_ROOT_PROPERTIES.contains(&json_name.as_str()) {
                    continue;
                }
                let mode = if flavor.is_read_only() {
                    AttributeMode::Computed
                } else if openapi.is_required(json_name) {
                    AttributeMode::Required
                } else {
                    AttributeMode::Optional
                };
                let attribute = self.attribute(json_name, prop, mode, flavor);
                if !seen.insert(attribute.name.clone()) {
                    tracing::warn!(
                        crd = %self.crd.name,
                        field = json_name.as_str(),
                        "skipping root field whose attribute name is already taken"
                    );
                    continue;
                }
                attributes.push(attribute);
            }
        }

        if flavor == ResourceFlavor::Manifest {
            attributes.push(
                Attribute::new(MANIFEST_YAML_ATTRIBUTE, AttributeKind::String)
                    .computed()
                    .description("The generated manifest in YAML format."),
            );
        }

        let description = self
            .version
            .schema
            .as_ref()
            .and_then(|s| s.description.clone())
            .unwrap_or_else(|| format!("{} ({})", kind, api_version));

        Schema {
            description: Some(description),
            attributes,
        }
    }

    fn metadata(&self, flavor: ResourceFlavor) -> Attribute {
        let mut fields = vec![
            Attribute::new("name", AttributeKind::String)
                .required()
                .validator(NameValidator)
                .description("Unique identifier for this object."),
        ];

        if self.crd.is_namespaced() {
            fields.push(
                Attribute::new("namespace", AttributeKind::String)
                    .required()
                    .validator(NameValidator)
                    .description("The namespace of the object."),
            );
        }

        let map_mode = if flavor.is_read_only() {
            AttributeMode::Computed
        } else {
            AttributeMode::Optional
        };
        let mut labels = Attribute::new("labels", AttributeKind::Map(Box::new(AttributeKind::String)))
            .mode(map_mode)
            .description("Map of string keys and values that can be used to organize and categorize objects.");
        let mut annotations =
            Attribute::new("annotations", AttributeKind::Map(Box::new(AttributeKind::String)))
                .mode(map_mode)
                .description("Unstructured key value map stored with a resource that may be set by external tools.");
        if !flavor.is_read_only() {
            labels = labels.validator(LabelValidator);
            annotations = annotations.validator(AnnotationValidator);
        }
        fields.push(labels);
        fields.push(annotations);

        Attribute::new("metadata", AttributeKind::Object(fields))
            .required()
            .description("Data that helps uniquely identify this object.")
    }

    fn attribute(
        &self,
        json_name: &str,
        prop: &SchemaProperty,
        mode: AttributeMode,
        flavor: ResourceFlavor,
    ) -> Attribute {
        let kind = self.kind(prop, flavor);
        let mut attribute = Attribute::new(snake_case(json_name), kind)
            .json_name(json_name)
            .mode(mode);

        if let Some(description) = describe(prop) {
            attribute = attribute.description(description);
        }

        if flavor.is_read_only() {
            return attribute;
        }

        match prop.format.as_deref() {
            Some("byte") => attribute = attribute.validator(Base64Validator),
            Some("date-time") => attribute = attribute.validator(DateTimeValidator),
            _ => {}
        }

        if let Some(pattern) = &prop.pattern {
            match RegexValidator::from_pattern(pattern) {
                Ok(validator) => attribute = attribute.validator(validator),
                Err(e) => tracing::warn!(
                    crd = %self.crd.name,
                    field = json_name,
                    error = %e,
                    "skipping pattern that cannot be compiled"
                ),
            }
        }

        if matches!(attribute.kind, AttributeKind::Int64) && is_port_field(json_name) {
            attribute = attribute.validator(PortValidator);
        }

        attribute
    }

    fn kind(&self, prop: &SchemaProperty, flavor: ResourceFlavor) -> AttributeKind {
        if prop.x_int_or_string {
            return AttributeKind::Dynamic;
        }

        match &prop.type_ {
            PropertyType::String => AttributeKind::String,
            PropertyType::Integer => AttributeKind::Int64,
            PropertyType::Number => AttributeKind::Float64,
            PropertyType::Boolean => AttributeKind::Bool,
            PropertyType::Array => match &prop.items {
                Some(items) => AttributeKind::List(Box::new(self.kind(items, flavor))),
                None => AttributeKind::List(Box::new(AttributeKind::Dynamic)),
            },
            PropertyType::Object if prop.has_nested_properties() && !prop.x_preserve_unknown => {
                AttributeKind::Object(self.object_attributes(prop, flavor))
            }
            PropertyType::Object => match &prop.additional_properties {
                Some(AdditionalProperties::Schema(values)) if !prop.x_preserve_unknown => {
                    AttributeKind::Map(Box::new(self.kind(values, flavor)))
                }
                _ => AttributeKind::Dynamic,
            },
            PropertyType::Unknown(_) => AttributeKind::Dynamic,
        }
    }

    fn object_attributes(&self, prop: &SchemaProperty, flavor: ResourceFlavor) -> Vec<Attribute> {
        let Some(properties) = &prop.properties else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut attributes = Vec::with_capacity(properties.len());

        for (json_name, child) in properties {
            let mode = if flavor.is_read_only() {
                AttributeMode::Computed
            } else if prop.is_required(json_name) {
                AttributeMode::Required
            } else {
                AttributeMode::Optional
            };

            let attribute = self.attribute(json_name, child, mode, flavor);
            if !seen.insert(attribute.name.clone()) {
                tracing::warn!(
                    crd = %self.crd.name,
                    field = json_name.as_str(),
                    "skipping field whose attribute name collides with a sibling"
                );
                continue;
            }
            attributes.push(attribute);
        }

        attributes
    }
}

/// Description with the allowed values appended
fn describe(prop: &SchemaProperty) -> Option<String> {
    let allowed = prop.enum_values.as_ref().map(|values| {
        values
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    });

    match (&prop.description, allowed) {
        (Some(d), Some(a)) => Some(format!("{} Allowed values: {}.", d, a)),
        (Some(d), None) => Some(d.clone()),
        (None, Some(a)) => Some(format!("Allowed values: {}.", a)),
        (None, None) => None,
    }
}

fn is_port_field(json_name: &str) -> bool {
    json_name == "port" || json_name.ends_with("Port")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::CrdParser;
    use crate::fixtures::{CERTIFICATE_CRD, CLUSTER_ISSUER_CRD};
    use tfk8s_core::{Value, validate_config};

    fn generate(yaml: &str, flavor: ResourceFlavor) -> Schema {
        let crd = CrdParser::parse(yaml).unwrap();
        SchemaGenerator::new(&crd, &crd.versions[0]).generate(flavor)
    }

    fn names(attributes: &[Attribute]) -> Vec<&str> {
        attributes.iter().map(|a| a.name.as_str()).collect()
    }

    fn nested<'s>(schema: &'s Schema, path: &[&str]) -> &'s Attribute {
        let mut attribute = schema.attribute(path[0]).unwrap();
        for name in &path[1..] {
            attribute = attribute
                .kind
                .nested_attributes()
                .and_then(|attrs| attrs.iter().find(|a| a.name == *name))
                .unwrap();
        }
        attribute
    }

    #[test]
    fn test_root_attributes() {
        let schema = generate(CERTIFICATE_CRD, ResourceFlavor::Resource);
        assert_eq!(
            names(&schema.attributes),
            vec!["id", "api_version", "kind", "metadata", "spec"]
        );
        assert_eq!(schema.attribute("id").unwrap().mode, AttributeMode::Computed);
        assert_eq!(schema.attribute("spec").unwrap().mode, AttributeMode::Required);
        assert!(schema.description.as_deref().unwrap().starts_with("A Certificate"));
    }

    #[test]
    fn test_manifest_adds_yaml() {
        let schema = generate(CERTIFICATE_CRD, ResourceFlavor::Manifest);
        let yaml = schema.attribute("yaml").unwrap();
        assert_eq!(yaml.mode, AttributeMode::Computed);
    }

    #[test]
    fn test_metadata_namespaced() {
        let schema = generate(CERTIFICATE_CRD, ResourceFlavor::Resource);
        let metadata = schema.attribute("metadata").unwrap();
        let fields = metadata.kind.nested_attributes().unwrap();
        assert_eq!(names(fields), vec!["name", "namespace", "labels", "annotations"]);
        assert_eq!(fields[1].mode, AttributeMode::Required);
        assert_eq!(fields[2].validators.len(), 1);
    }

    #[test]
    fn test_metadata_cluster_scoped() {
        let schema = generate(CLUSTER_ISSUER_CRD, ResourceFlavor::Resource);
        let fields = schema.attribute("metadata").unwrap().kind.nested_attributes().unwrap();
        assert_eq!(names(fields), vec!["name", "labels", "annotations"]);
    }

    #[test]
    fn test_spec_fields() {
        let schema = generate(CERTIFICATE_CRD, ResourceFlavor::Resource);

        let secret_name = nested(&schema, &["spec", "secret_name"]);
        assert_eq!(secret_name.json_name, "secretName");
        assert_eq!(secret_name.mode, AttributeMode::Required);

        assert_eq!(nested(&schema, &["spec", "issuer_ref", "kind"]).mode, AttributeMode::Optional);
        assert_eq!(nested(&schema, &["spec", "dns_names"]).kind.type_name(), "list of string");
        assert_eq!(nested(&schema, &["spec", "secret_labels"]).kind.type_name(), "map of string");
        assert_eq!(nested(&schema, &["spec", "target_port"]).kind.type_name(), "dynamic");
        assert_eq!(nested(&schema, &["spec", "extra"]).kind.type_name(), "dynamic");
    }

    #[test]
    fn test_validator_attachment() {
        let schema = generate(CERTIFICATE_CRD, ResourceFlavor::Resource);
        let count = |path: &[&str]| nested(&schema, path).validators.len();

        assert_eq!(count(&["spec", "duration"]), 1);
        assert_eq!(count(&["spec", "renew_time"]), 1);
        assert_eq!(count(&["spec", "ca_bundle"]), 1);
        assert_eq!(count(&["spec", "metrics_port"]), 1);
        assert_eq!(count(&["spec", "target_port"]), 1);
        assert_eq!(count(&["spec", "revision_history_limit"]), 0);
        assert_eq!(count(&["spec", "ports", "port"]), 1);
    }

    #[test]
    fn test_data_source_is_read_only() {
        let schema = generate(CERTIFICATE_CRD, ResourceFlavor::DataSource);

        assert_eq!(schema.attribute("spec").unwrap().mode, AttributeMode::Computed);
        let secret_name = nested(&schema, &["spec", "secret_name"]);
        assert_eq!(secret_name.mode, AttributeMode::Computed);
        assert!(secret_name.validators.is_empty());

        let labels = nested(&schema, &["metadata", "labels"]);
        assert_eq!(labels.mode, AttributeMode::Computed);
        assert_eq!(nested(&schema, &["metadata", "name"]).mode, AttributeMode::Required);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let yaml = CLUSTER_ISSUER_CRD.replace(
            "email:\n                      type: string",
            "email:\n                      type: string\n                      pattern: \"^(?!x)\"",
        );
        let schema = generate(&yaml, ResourceFlavor::Resource);
        assert!(nested(&schema, &["spec", "acme", "email"]).validators.is_empty());
    }

    #[test]
    fn test_generated_schema_validates() {
        let schema = generate(CERTIFICATE_CRD, ResourceFlavor::Resource);
        let config = Value::from_yaml_str(
            r#"
metadata:
  name: example
  namespace: default
  labels:
    app.kubernetes.io/name: web
spec:
  secret_name: example-tls
  issuer_ref:
    name: letsencrypt
  duration: 2160h
  ca_bundle: not base64 encoded
  ports:
    - port: 70000
"#,
        )
        .unwrap();

        let diags = validate_config(&schema, &config);
        let paths: Vec<String> = diags.iter().map(|d| d.path.to_string()).collect();
        assert_eq!(paths, vec!["spec.ca_bundle", "spec.ports[0].port"]);
    }

    #[test]
    fn test_root_name_collisions_are_skipped() {
        let yaml = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  scope: Namespaced
  names:
    kind: Widget
    plural: widgets
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            id:
              type: integer
            yaml:
              type: string
            data:
              type: string
            Data:
              type: integer
            spec:
              type: object
"#;
        for flavor in ResourceFlavor::ALL {
            let schema = generate(yaml, flavor);
            let mut expected = vec!["id", "api_version", "kind", "metadata", "data", "spec"];
            if flavor == ResourceFlavor::Manifest {
                expected.push("yaml");
            }
            assert_eq!(names(&schema.attributes), expected, "{}", flavor);
            assert_eq!(schema.attribute("id").unwrap().mode, AttributeMode::Computed);
            assert_eq!(schema.attribute("data").unwrap().kind.type_name(), "string");
        }
    }

    #[test]
    fn test_flavor_display() {
        assert_eq!(ResourceFlavor::DataSource.to_string(), "data source");
        assert_eq!(ResourceFlavor::ALL.len(), 3);
    }
}
