//! Attribute schemas and the configuration validation pass
//!
//! A [`Schema`] describes every attribute of a resource type: its name, its
//! type, whether it is required, optional or computed, and the validators
//! attached to it. [`validate_config`] walks a configuration tree against a
//! schema and collects every problem it finds into one [`Diagnostics`].

use indexmap::IndexMap;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;

use crate::diagnostics::Diagnostics;
use crate::path::AttributePath;
use crate::validators::{ValidationRequest, Validator};
use crate::value::Value;

/// How an attribute may be configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    /// Must be set in configuration
    Required,
    /// May be set in configuration
    Optional,
    /// Set by the provider only
    Computed,
    /// May be set, otherwise filled in by the provider
    OptionalComputed,
}

impl AttributeMode {
    pub fn is_required(self) -> bool {
        self == AttributeMode::Required
    }

    /// Whether configuration may set this attribute
    pub fn is_configurable(self) -> bool {
        self != AttributeMode::Computed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeMode::Required => "required",
            AttributeMode::Optional => "optional",
            AttributeMode::Computed => "computed",
            AttributeMode::OptionalComputed => "optional+computed",
        }
    }
}

/// Attribute value type
#[derive(Debug, Clone)]
pub enum AttributeKind {
    String,
    Int64,
    Float64,
    Bool,
    /// Any value (int-or-string, preserved unknown fields)
    Dynamic,
    List(Box<AttributeKind>),
    Map(Box<AttributeKind>),
    Object(Vec<Attribute>),
}

impl AttributeKind {
    /// Type name used in diagnostics and schema listings
    pub fn type_name(&self) -> String {
        match self {
            AttributeKind::String => "string".to_string(),
            AttributeKind::Int64 => "number".to_string(),
            AttributeKind::Float64 => "number".to_string(),
            AttributeKind::Bool => "bool".to_string(),
            AttributeKind::Dynamic => "dynamic".to_string(),
            AttributeKind::List(elem) => format!("list of {}", elem.type_name()),
            AttributeKind::Map(elem) => format!("map of {}", elem.type_name()),
            AttributeKind::Object(_) => "object".to_string(),
        }
    }

    /// Nested attributes of an object, or of the objects inside a list or map
    pub fn nested_attributes(&self) -> Option<&[Attribute]> {
        match self {
            AttributeKind::Object(attrs) => Some(attrs),
            AttributeKind::List(elem) | AttributeKind::Map(elem) => elem.nested_attributes(),
            _ => None,
        }
    }
}

/// A single schema attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Configuration name (snake_case)
    pub name: String,
    /// Field name in the Kubernetes object (usually camelCase)
    pub json_name: String,
    pub kind: AttributeKind,
    pub description: Option<String>,
    pub mode: AttributeMode,
    pub sensitive: bool,
    pub validators: Vec<Arc<dyn Validator>>,
}

impl Attribute {
    /// Create an optional attribute whose field name equals its name
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        let name = name.into();
        Self {
            json_name: name.clone(),
            name,
            kind,
            description: None,
            mode: AttributeMode::Optional,
            sensitive: false,
            validators: Vec::new(),
        }
    }

    #[must_use]
    pub fn json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: AttributeMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn required(self) -> Self {
        self.mode(AttributeMode::Required)
    }

    #[must_use]
    pub fn computed(self) -> Self {
        self.mode(AttributeMode::Computed)
    }

    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Describe the attribute (and its children) as JSON
    pub fn describe(&self) -> JsonValue {
        let mut obj = json!({
            "name": self.name,
            "field": self.json_name,
            "type": self.kind.type_name(),
            "mode": self.mode.as_str(),
        });

        if let Some(description) = &self.description {
            obj["description"] = JsonValue::String(description.clone());
        }
        if self.sensitive {
            obj["sensitive"] = JsonValue::Bool(true);
        }
        if !self.validators.is_empty() {
            obj["validators"] = self
                .validators
                .iter()
                .map(|v| JsonValue::String(v.description()))
                .collect();
        }
        if let Some(nested) = self.kind.nested_attributes() {
            obj["attributes"] = nested.iter().map(Attribute::describe).collect();
        }

        obj
    }
}

/// Schema of a resource type
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            description: None,
            attributes,
        }
    }

    /// Look up a top-level attribute
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Describe the schema as JSON
    pub fn describe(&self) -> JsonValue {
        json!({
            "description": self.description,
            "attributes": self.attributes.iter().map(Attribute::describe).collect::<Vec<_>>(),
        })
    }
}

/// Validate a configuration tree against a schema
///
/// Every problem is collected; nothing stops the walk early.
pub fn validate_config(schema: &Schema, config: &Value) -> Diagnostics {
    let mut diags = Diagnostics::new();
    let root = AttributePath::root();

    match config {
        Value::Map(values) => validate_attributes(&schema.attributes, values, &root, &mut diags),
        Value::Null => validate_attributes(&schema.attributes, &IndexMap::new(), &root, &mut diags),
        Value::Unknown => {}
        other => diags.add_error(
            &root,
            "Invalid Configuration",
            format!("Expected an object, got {}", other.type_name()),
        ),
    }

    diags
}

fn validate_attributes(
    attributes: &[Attribute],
    values: &IndexMap<String, Value>,
    path: &AttributePath,
    diags: &mut Diagnostics,
) {
    for key in values.keys() {
        if !attributes.iter().any(|a| &a.name == key) {
            diags.add_error(
                &path.with_attribute(key),
                "Unsupported Argument",
                format!("An argument named \"{}\" is not expected here.", key),
            );
        }
    }

    for attribute in attributes {
        let value = values.get(&attribute.name).unwrap_or(&Value::Null);
        validate_attribute(attribute, value, &path.with_attribute(&attribute.name), diags);
    }
}

fn validate_attribute(
    attribute: &Attribute,
    value: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) {
    if value.is_null() {
        if attribute.mode.is_required() {
            diags.add_error(
                path,
                "Missing Configuration for Required Attribute",
                format!(
                    "Must set a configuration value for the {} attribute as it is marked as required.",
                    path
                ),
            );
        }
        return;
    }

    if !attribute.mode.is_configurable() {
        diags.add_error(
            path,
            "Invalid Configuration for Read-Only Attribute",
            format!(
                "Cannot set value for the {} attribute as it is read-only. Remove the configuration line setting the value.",
                path
            ),
        );
        return;
    }

    if value.is_unknown() {
        return;
    }

    if !check_kind(&attribute.kind, value, path, diags) {
        return;
    }

    let request = ValidationRequest::new(path, value);
    for validator in &attribute.validators {
        validator.validate(&request, diags);
    }
}

/// Type-check a value and walk into its children
///
/// Returns false on a type mismatch at this level.
fn check_kind(
    kind: &AttributeKind,
    value: &Value,
    path: &AttributePath,
    diags: &mut Diagnostics,
) -> bool {
    match (kind, value) {
        (_, Value::Null | Value::Unknown) => true,
        (AttributeKind::Dynamic, _) => true,
        (AttributeKind::String, Value::String(_)) => true,
        (AttributeKind::Int64, Value::Int(_)) => true,
        (AttributeKind::Float64, Value::Int(_) | Value::Float(_)) => true,
        (AttributeKind::Bool, Value::Bool(_)) => true,
        (AttributeKind::List(elem), Value::List(items)) => {
            for (i, item) in items.iter().enumerate() {
                check_kind(elem, item, &path.with_index(i), diags);
            }
            true
        }
        (AttributeKind::Map(elem), Value::Map(entries)) => {
            for (key, entry) in entries {
                check_kind(elem, entry, &path.with_key(key), diags);
            }
            true
        }
        (AttributeKind::Object(attributes), Value::Map(values)) => {
            validate_attributes(attributes, values, path, diags);
            true
        }
        (kind, value) => {
            diags.add_error(
                path,
                "Incorrect Attribute Value Type",
                format!("Expected {}, got {}", kind.type_name(), value.type_name()),
            );
            false
        }
    }
}
