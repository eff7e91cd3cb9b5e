//! Rendering configuration into Kubernetes objects and YAML manifests

use serde_json::{Map, Value as JsonValue};
use tfk8s_core::{Diagnostics, Value, config_to_json, validate_config};

use crate::catalog::ResourceType;
use crate::error::{KubeError, Result};

/// A validated object ready to be written or applied
#[derive(Debug, Clone)]
pub struct RenderedObject {
    /// Full object body, `apiVersion` and `kind` first
    pub object: JsonValue,
    /// Non-fatal diagnostics from validation
    pub warnings: Diagnostics,
}

impl RenderedObject {
    /// Render the object as a YAML document
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.object)?)
    }

    pub fn name(&self) -> Option<&str> {
        self.object["metadata"]["name"].as_str()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.object["metadata"]["namespace"].as_str()
    }
}

/// Validate a configuration and build the object it describes
///
/// Fails with every collected diagnostic when validation reports errors.
pub fn render_object(resource_type: &ResourceType<'_>, config: &Value) -> Result<RenderedObject> {
    let schema = resource_type.schema();

    let diagnostics = validate_config(&schema, config);
    if diagnostics.has_errors() {
        return Err(KubeError::InvalidConfig { diagnostics });
    }

    let body = config_to_json(&schema, config)?;

    let mut object = Map::new();
    object.insert(
        "apiVersion".to_string(),
        JsonValue::String(resource_type.api_version()),
    );
    object.insert(
        "kind".to_string(),
        JsonValue::String(resource_type.kind().to_string()),
    );
    if let JsonValue::Object(fields) = body {
        object.extend(fields);
    }

    tracing::debug!(type_name = %resource_type.name(), "rendered object");

    Ok(RenderedObject {
        object: JsonValue::Object(object),
        warnings: diagnostics,
    })
}

/// Validate a configuration and render it as a YAML manifest
pub fn render_manifest(resource_type: &ResourceType<'_>, config: &Value) -> Result<String> {
    render_object(resource_type, config)?.to_yaml()
}
