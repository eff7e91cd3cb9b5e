//! Live object access
//!
//! [`ObjectClient`] is the seam between resource operations and the cluster.
//! [`KubeObjectClient`] talks to the API server through `kube`'s dynamic API;
//! [`MockObjectClient`](crate::mock::MockObjectClient) keeps objects in memory.

use std::fmt;

use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, DeleteParams, DynamicObject, Patch, PatchParams},
    discovery::ApiResource,
};
use serde_json::Value as JsonValue;

use crate::error::{KubeError, Result};

/// Default field manager for Server-Side Apply
pub const DEFAULT_FIELD_MANAGER: &str = "tfk8s";

/// Address of a single object in the cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Full apiVersion (e.g., "cert-manager.io/v1")
    pub api_version: String,
    pub kind: String,
    /// Plural resource name used in API paths (e.g., "certificates")
    pub plural: String,
    /// None for cluster-scoped objects
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectRef {
    /// State identifier: `namespace/name`, or `name` for cluster-scoped objects
    pub fn id(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }

    /// Split apiVersion into (group, version); the core group is empty
    pub fn group_version(&self) -> (&str, &str) {
        match self.api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", self.api_version.as_str()),
        }
    }

    fn api_resource(&self) -> ApiResource {
        let (group, version) = self.group_version();
        ApiResource {
            group: group.to_string(),
            version: version.to_string(),
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            plural: self.plural.clone(),
        }
    }

    pub(crate) fn not_found(&self) -> KubeError {
        KubeError::ObjectNotFound {
            kind: self.kind.clone(),
            name: self.name.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.kind, self.id(), self.api_version)
    }
}

/// Options for Server-Side Apply
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    pub field_manager: String,
    /// Take ownership of fields managed by someone else
    pub force_conflicts: bool,
    /// Ask the API server to validate without persisting
    pub dry_run: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            force_conflicts: false,
            dry_run: false,
        }
    }
}

impl ApplyOptions {
    fn patch_params(&self) -> PatchParams {
        PatchParams {
            field_manager: Some(self.field_manager.clone()),
            force: self.force_conflicts,
            dry_run: self.dry_run,
            ..Default::default()
        }
    }
}

/// Read, apply and delete objects
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    /// Fetch an object; a missing object is `KubeError::ObjectNotFound`
    async fn get(&self, object: &ObjectRef) -> Result<JsonValue>;

    /// Server-Side Apply a full object body, returning the object as stored
    async fn apply(
        &self,
        object: &ObjectRef,
        body: &JsonValue,
        options: &ApplyOptions,
    ) -> Result<JsonValue>;

    /// Delete an object; a missing object is `KubeError::ObjectNotFound`
    async fn delete(&self, object: &ObjectRef) -> Result<()>;
}

/// Object client backed by a Kubernetes API server
#[derive(Clone)]
pub struct KubeObjectClient {
    client: Client,
}

impl KubeObjectClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the default kubeconfig or in-cluster configuration
    pub async fn try_default() -> Result<Self> {
        Ok(Self::new(Client::try_default().await?))
    }

    fn api(&self, object: &ObjectRef) -> Api<DynamicObject> {
        let ar = object.api_resource();
        match &object.namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &ar),
            None => Api::all_with(self.client.clone(), &ar),
        }
    }
}

fn map_not_found(object: &ObjectRef, err: kube::Error) -> KubeError {
    match err {
        kube::Error::Api(resp) if resp.code == 404 => object.not_found(),
        other => KubeError::Api(other),
    }
}

#[async_trait]
impl ObjectClient for KubeObjectClient {
    async fn get(&self, object: &ObjectRef) -> Result<JsonValue> {
        tracing::debug!(object = %object, "reading object");

        let found = self
            .api(object)
            .get(&object.name)
            .await
            .map_err(|e| map_not_found(object, e))?;

        Ok(serde_json::to_value(found)?)
    }

    async fn apply(
        &self,
        object: &ObjectRef,
        body: &JsonValue,
        options: &ApplyOptions,
    ) -> Result<JsonValue> {
        tracing::debug!(
            object = %object,
            field_manager = %options.field_manager,
            force = options.force_conflicts,
            dry_run = options.dry_run,
            "applying object"
        );

        let applied = self
            .api(object)
            .patch(&object.name, &options.patch_params(), &Patch::Apply(body))
            .await?;

        Ok(serde_json::to_value(applied)?)
    }

    async fn delete(&self, object: &ObjectRef) -> Result<()> {
        tracing::debug!(object = %object, "deleting object");

        self.api(object)
            .delete(&object.name, &DeleteParams::default())
            .await
            .map_err(|e| map_not_found(object, e))?;

        Ok(())
    }
}
