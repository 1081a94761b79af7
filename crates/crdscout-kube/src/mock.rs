//! Mock fetcher for testing
//!
//! Stores canned objects in memory and counts invocations, so tests can
//! assert both what a read returned and that the offline gate performed
//! zero network calls.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use kube::core::ErrorResponse;

use crate::error::{FetchError, Result};
use crate::fetch::{ObjectFetcher, ResourceSelector};

/// Counts of fetch operations performed, for testing assertions
#[derive(Debug, Default, Clone)]
pub struct FetchCounts {
    pub gets: usize,
}

/// In-memory fetcher for testing
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Storage: (kind, namespace, name) -> untyped object
    objects: Arc<RwLock<HashMap<(String, Option<String>, String), JsonValue>>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<FetchCounts>>,
}

impl MockFetcher {
    /// Create a new empty mock fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object the mock will serve for the given coordinates
    pub fn insert(&self, kind: &str, namespace: Option<&str>, name: &str, object: JsonValue) {
        let mut objects = self.objects.write().unwrap();
        objects.insert(
            (
                kind.to_string(),
                namespace.map(str::to_string),
                name.to_string(),
            ),
            object,
        );
    }

    /// Get operation counts for assertions
    pub fn fetch_counts(&self) -> FetchCounts {
        self.operations.read().unwrap().clone()
    }

    /// Reset operation counts
    pub fn reset_counts(&self) {
        let mut ops = self.operations.write().unwrap();
        *ops = FetchCounts::default();
    }
}

#[async_trait]
impl ObjectFetcher for MockFetcher {
    async fn get(
        &self,
        selector: &ResourceSelector,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<JsonValue> {
        {
            let mut ops = self.operations.write().unwrap();
            ops.gets += 1;
        }

        let objects = self.objects.read().unwrap();
        let key = (
            selector.kind.to_string(),
            namespace.map(str::to_string),
            name.to_string(),
        );
        objects
            .get(&key)
            .cloned()
            .ok_or_else(|| FetchError::GetResource {
                kind: selector.kind.to_string(),
                name: name.to_string(),
                namespace: namespace.map(str::to_string),
                source: kube::Error::Api(ErrorResponse {
                    status: "Failure".to_string(),
                    message: format!("{} \"{}\" not found", selector.plural, name),
                    reason: "NotFound".to_string(),
                    code: 404,
                }),
            })
    }
}
