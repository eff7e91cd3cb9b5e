//! CRD schema representation
//!
//! A trimmed, structured view of a CustomResourceDefinition: the fields
//! needed to derive attribute schemas and to address objects in a cluster.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A parsed CustomResourceDefinition
#[derive(Debug, Clone, PartialEq)]
pub struct CrdSchema {
    /// Full CRD name (e.g., "certificates.cert-manager.io")
    pub name: String,
    /// API group (e.g., "cert-manager.io")
    pub group: String,
    pub scope: CrdScope,
    pub names: CrdNames,
    pub versions: Vec<CrdVersionSchema>,
}

impl CrdSchema {
    /// `apiVersion` of objects of the given version (e.g., "cert-manager.io/v1")
    pub fn api_version(&self, version: &str) -> String {
        if self.group.is_empty() {
            version.to_string()
        } else {
            format!("{}/{}", self.group, version)
        }
    }

    pub fn is_namespaced(&self) -> bool {
        self.scope == CrdScope::Namespaced
    }
}

/// CRD scope - whether resources are namespaced or cluster-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CrdScope {
    #[default]
    Namespaced,
    Cluster,
}

impl std::fmt::Display for CrdScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Namespaced => write!(f, "Namespaced"),
            Self::Cluster => write!(f, "Cluster"),
        }
    }
}

/// CRD naming information
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrdNames {
    /// Kind (e.g., "Certificate")
    pub kind: String,
    /// Plural name (e.g., "certificates")
    pub plural: String,
    pub short_names: Vec<String>,
}

/// A single API version of a CRD
#[derive(Debug, Clone, PartialEq)]
pub struct CrdVersionSchema {
    /// Version name (e.g., "v1", "v1beta1")
    pub name: String,
    pub served: bool,
    pub storage: bool,
    pub deprecated: bool,
    pub schema: Option<OpenApiSchema>,
    /// The openAPIV3Schema exactly as it appeared in the CRD
    pub raw_schema: Option<JsonValue>,
}

/// Root of an OpenAPI v3 schema
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpenApiSchema {
    pub description: Option<String>,
    /// Root properties, in document order (typically apiVersion, kind, metadata, spec, status)
    pub properties: IndexMap<String, SchemaProperty>,
    pub required: Vec<String>,
    pub x_preserve_unknown: bool,
}

impl OpenApiSchema {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Schema for a single property
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaProperty {
    pub type_: PropertyType,
    pub description: Option<String>,
    /// Format hint (e.g., "date-time", "byte", "int32")
    pub format: Option<String>,
    /// Regex pattern for strings
    pub pattern: Option<String>,
    /// Allowed values
    pub enum_values: Option<Vec<JsonValue>>,
    /// Nested object properties, in document order
    pub properties: Option<IndexMap<String, SchemaProperty>>,
    pub required: Option<Vec<String>>,
    /// Array item schema
    pub items: Option<Box<SchemaProperty>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub x_preserve_unknown: bool,
    pub x_int_or_string: bool,
}

impl SchemaProperty {
    /// Check if this property has nested properties
    pub fn has_nested_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Check if a nested property is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|r| r.iter().any(|n| n == name))
    }
}

/// Property type in OpenAPI schema
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    #[default]
    Object,
    /// Unknown or unspecified type
    Unknown(String),
}

impl PropertyType {
    /// Parse from string representation
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
            Self::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// `additionalProperties` of an object schema
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed,
    Denied,
    Schema(Box<SchemaProperty>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_parse() {
        assert_eq!(PropertyType::parse("string"), PropertyType::String);
        assert_eq!(PropertyType::parse("Integer"), PropertyType::Integer);
        assert_eq!(
            PropertyType::parse("custom"),
            PropertyType::Unknown("custom".to_string())
        );
        assert_eq!(PropertyType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_api_version() {
        let crd = CrdSchema {
            name: "certificates.cert-manager.io".to_string(),
            group: "cert-manager.io".to_string(),
            scope: CrdScope::Namespaced,
            names: CrdNames::default(),
            versions: Vec::new(),
        };
        assert_eq!(crd.api_version("v1"), "cert-manager.io/v1");
        assert!(crd.is_namespaced());
    }

    #[test]
    fn test_is_required() {
        let prop = SchemaProperty {
            type_: PropertyType::Object,
            properties: Some(IndexMap::from([(
                "name".to_string(),
                SchemaProperty {
                    type_: PropertyType::String,
                    ..Default::default()
                },
            )])),
            required: Some(vec!["name".to_string()]),
            ..Default::default()
        };

        assert!(prop.has_nested_properties());
        assert!(prop.is_required("name"));
        assert!(!prop.is_required("kind"));
    }
}
