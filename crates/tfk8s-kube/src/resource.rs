//! Resource and data source operations over an [`ObjectClient`]

use serde_json::Value as JsonValue;
use tfk8s_core::{Value, json_to_state};

use crate::catalog::ResourceType;
use crate::client::{ApplyOptions, ObjectClient, ObjectRef};
use crate::error::{KubeError, Result};
use crate::generate::ResourceFlavor;
use crate::manifest::render_object;

/// Read a live object and map it into data source state
///
/// `id` is set to `namespace/name`, or `name` for cluster-scoped objects.
pub async fn read_object(
    client: &dyn ObjectClient,
    resource_type: &ResourceType<'_>,
    name: &str,
    namespace: Option<&str>,
) -> Result<Value> {
    let object = resource_type.object_ref(name, namespace)?;
    let live = client.get(&object).await?;

    Ok(to_state(
        resource_type.with_flavor(ResourceFlavor::DataSource),
        &object,
        &live,
    ))
}

/// Apply a configuration with Server-Side Apply and return the resulting state
pub async fn apply_config(
    client: &dyn ObjectClient,
    resource_type: &ResourceType<'_>,
    config: &Value,
    options: &ApplyOptions,
) -> Result<Value> {
    let rendered = render_object(resource_type, config)?;

    let name = rendered
        .name()
        .ok_or_else(|| KubeError::Serialization("rendered object has no metadata.name".to_string()))?;
    let object = resource_type.object_ref(name, rendered.namespace())?;

    let applied = client.apply(&object, &rendered.object, options).await?;
    tracing::debug!(object = %object, dry_run = options.dry_run, "applied");

    Ok(to_state(
        resource_type.with_flavor(ResourceFlavor::Resource),
        &object,
        &applied,
    ))
}

/// Delete a live object
///
/// Returns false when the object was already gone.
pub async fn delete_object(
    client: &dyn ObjectClient,
    resource_type: &ResourceType<'_>,
    name: &str,
    namespace: Option<&str>,
) -> Result<bool> {
    let object = resource_type.object_ref(name, namespace)?;

    match client.delete(&object).await {
        Ok(()) => Ok(true),
        Err(e) if e.is_not_found() => {
            tracing::debug!(object = %object, "already deleted");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn to_state(resource_type: ResourceType<'_>, object: &ObjectRef, live: &JsonValue) -> Value {
    let mut state = json_to_state(&resource_type.schema(), live);
    if let Value::Map(fields) = &mut state {
        fields.insert("id".to_string(), Value::String(object.id()));
    }
    state
}
