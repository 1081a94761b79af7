//! Generic fetch-and-map read path
//!
//! One GET per read, no retry, no caching. The fetcher returns the object in
//! untyped JSON form; `read_resource` maps that into the caller's typed model
//! and surfaces a distinct error for each failure point (fetch, serialize,
//! deserialize).

use async_trait::async_trait;
use kube::api::{Api, DynamicObject};
use kube::discovery::ApiResource;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::client::ClusterClient;
use crate::error::{FetchError, Result};

/// Identifies one API endpoint by group, version, kind and plural name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSelector {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
}

impl ResourceSelector {
    pub const fn new(
        group: &'static str,
        version: &'static str,
        kind: &'static str,
        plural: &'static str,
    ) -> Self {
        Self {
            group,
            version,
            kind,
            plural,
        }
    }

    /// The `apiVersion` string: `group/version`, or bare `version` for core
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.to_string()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    pub fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.group.to_string(),
            version: self.version.to_string(),
            api_version: self.api_version(),
            kind: self.kind.to_string(),
            plural: self.plural.to_string(),
        }
    }
}

/// One-shot object reader, abstracted so tests can substitute a mock
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    /// Fetch one object and return it in untyped JSON form
    async fn get(
        &self,
        selector: &ResourceSelector,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<JsonValue>;
}

/// Fetcher backed by a real Kubernetes client and the dynamic API
pub struct DynamicFetcher {
    client: kube::Client,
}

impl DynamicFetcher {
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    fn api_for(&self, selector: &ResourceSelector, namespace: Option<&str>) -> Api<DynamicObject> {
        let resource = selector.api_resource();
        match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        }
    }
}

#[async_trait]
impl ObjectFetcher for DynamicFetcher {
    async fn get(
        &self,
        selector: &ResourceSelector,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<JsonValue> {
        debug!(
            kind = selector.kind,
            name,
            namespace = namespace.unwrap_or("<cluster>"),
            "fetching resource"
        );

        let api = self.api_for(selector, namespace);
        let object = api
            .get(name)
            .await
            .map_err(|source| FetchError::GetResource {
                kind: selector.kind.to_string(),
                name: name.to_string(),
                namespace: namespace.map(str::to_string),
                source,
            })?;

        serde_json::to_value(&object).map_err(|e| FetchError::SerializeResponse {
            kind: selector.kind.to_string(),
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

/// Perform exactly one GET and map the response into the typed model
///
/// Fails fast: an offline client is rejected before any network activity, and
/// every downstream failure is surfaced to the caller unretried. Fields in
/// the response that the model does not declare are dropped, not an error.
pub async fn read_resource<T: DeserializeOwned>(
    client: &ClusterClient,
    selector: &ResourceSelector,
    name: &str,
    namespace: Option<&str>,
) -> Result<T> {
    let fetcher = match client {
        ClusterClient::Online(fetcher) => fetcher,
        ClusterClient::Offline => return Err(FetchError::Offline),
    };

    let untyped = fetcher.get(selector, name, namespace).await?;

    serde_json::from_value(untyped).map_err(|e| FetchError::DeserializeResponse {
        kind: selector.kind.to_string(),
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: ResourceSelector =
        ResourceSelector::new("example.io", "v1", "Widget", "widgets");

    #[test]
    fn test_api_version_with_group() {
        assert_eq!(WIDGETS.api_version(), "example.io/v1");
    }

    #[test]
    fn test_api_version_core_group() {
        let core = ResourceSelector::new("", "v1", "ConfigMap", "configmaps");
        assert_eq!(core.api_version(), "v1");
    }

    #[test]
    fn test_api_resource_fields() {
        let resource = WIDGETS.api_resource();
        assert_eq!(resource.group, "example.io");
        assert_eq!(resource.version, "v1");
        assert_eq!(resource.api_version, "example.io/v1");
        assert_eq!(resource.kind, "Widget");
        assert_eq!(resource.plural, "widgets");
    }
}
