//! Mock object client for testing
//!
//! Keeps objects in memory, useful for unit tests without requiring a
//! Kubernetes cluster.

use async_trait::async_trait;
use serde_json::{Value as JsonValue, json};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::client::{ApplyOptions, ObjectClient, ObjectRef};
use crate::error::Result;

/// In-memory object client
#[derive(Clone, Default)]
pub struct MockObjectClient {
    objects: Arc<RwLock<HashMap<ObjectRef, JsonValue>>>,
    operations: Arc<RwLock<OperationCounts>>,
    last_apply: Arc<RwLock<Option<ApplyOptions>>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub gets: usize,
    pub applies: usize,
    pub deletes: usize,
}

impl MockObjectClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly, bypassing apply
    pub fn insert(&self, object: ObjectRef, body: JsonValue) {
        self.objects.write().unwrap().insert(object, body);
    }

    /// Get an object without counting the read
    pub fn object(&self, object: &ObjectRef) -> Option<JsonValue> {
        self.objects.read().unwrap().get(object).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// Options passed to the most recent apply
    pub fn last_apply_options(&self) -> Option<ApplyOptions> {
        self.last_apply.read().unwrap().clone()
    }
}

#[async_trait]
impl ObjectClient for MockObjectClient {
    async fn get(&self, object: &ObjectRef) -> Result<JsonValue> {
        self.operations.write().unwrap().gets += 1;

        self.objects
            .read()
            .unwrap()
            .get(object)
            .cloned()
            .ok_or_else(|| object.not_found())
    }

    async fn apply(
        &self,
        object: &ObjectRef,
        body: &JsonValue,
        options: &ApplyOptions,
    ) -> Result<JsonValue> {
        self.operations.write().unwrap().applies += 1;
        *self.last_apply.write().unwrap() = Some(options.clone());

        let mut stored = body.clone();
        let mut objects = self.objects.write().unwrap();

        let generation = objects
            .get(object)
            .and_then(|existing| existing["metadata"]["generation"].as_i64())
            .unwrap_or(0)
            + 1;
        if let Some(metadata) = stored.get_mut("metadata").and_then(JsonValue::as_object_mut) {
            metadata.insert("generation".to_string(), json!(generation));
        }

        if !options.dry_run {
            objects.insert(object.clone(), stored.clone());
        }

        Ok(stored)
    }

    async fn delete(&self, object: &ObjectRef) -> Result<()> {
        self.operations.write().unwrap().deletes += 1;

        self.objects
            .write()
            .unwrap()
            .remove(object)
            .map(|_| ())
            .ok_or_else(|| object.not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ObjectRef {
        ObjectRef {
            api_version: "example.com/v1".to_string(),
            kind: "Widget".to_string(),
            plural: "widgets".to_string(),
            namespace: Some("default".to_string()),
            name: "w".to_string(),
        }
    }

    #[tokio::test]
    async fn test_apply_get_delete() {
        let client = MockObjectClient::new();
        let body = json!({"metadata": {"name": "w"}, "spec": {"size": 1}});

        let applied = client
            .apply(&widget(), &body, &ApplyOptions::default())
            .await
            .unwrap();
        assert_eq!(applied["metadata"]["generation"], 1);

        let applied = client
            .apply(&widget(), &body, &ApplyOptions::default())
            .await
            .unwrap();
        assert_eq!(applied["metadata"]["generation"], 2);

        let fetched = client.get(&widget()).await.unwrap();
        assert_eq!(fetched["spec"]["size"], 1);

        client.delete(&widget()).await.unwrap();
        assert!(client.get(&widget()).await.unwrap_err().is_not_found());

        assert_eq!(
            client.operation_counts(),
            OperationCounts {
                gets: 2,
                applies: 2,
                deletes: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_dry_run_does_not_store() {
        let client = MockObjectClient::new();
        let options = ApplyOptions {
            dry_run: true,
            ..Default::default()
        };

        client
            .apply(&widget(), &json!({"metadata": {"name": "w"}}), &options)
            .await
            .unwrap();

        assert_eq!(client.object_count(), 0);
        assert!(client.last_apply_options().unwrap().dry_run);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let client = MockObjectClient::new();
        assert!(client.delete(&widget()).await.unwrap_err().is_not_found());
    }
}
