//! Cluster client gate
//!
//! The provider bootstrap builds one `ClusterClient` and shares it, read-only,
//! with every data source during `configure`. A provider configured in
//! offline mode never constructs a client at all: each live read then fails
//! with the dedicated offline error before any network call is attempted.

use std::any::Any;
use std::sync::Arc;

use crdscout_core::{Diagnostic, Diagnostics};

use crate::error::{FetchError, Result};
use crate::fetch::{DynamicFetcher, ObjectFetcher};

/// Opaque configuration data handed to each data source by the host framework
pub type ProviderData = Arc<dyn Any + Send + Sync>;

/// Shared cluster handle, or the explicit absence of one
#[derive(Clone)]
pub enum ClusterClient {
    /// A usable API client; reads go through the fetcher
    Online(Arc<dyn ObjectFetcher>),
    /// Explicit offline mode; reads fail without touching the network
    Offline,
}

impl ClusterClient {
    /// Build a client from the ambient kubeconfig/in-cluster environment
    pub async fn try_default() -> Result<Self> {
        let client = kube::Client::try_default().await?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing Kubernetes client
    pub fn with_client(client: kube::Client) -> Self {
        Self::Online(Arc::new(DynamicFetcher::new(client)))
    }

    /// Wrap a custom fetcher (used by tests with a mock)
    pub fn with_fetcher(fetcher: Arc<dyn ObjectFetcher>) -> Self {
        Self::Online(fetcher)
    }

    pub fn offline() -> Self {
        Self::Offline
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }

    /// Wrap into the opaque form the framework hands to `configure`
    pub fn into_provider_data(self) -> ProviderData {
        Arc::new(self)
    }
}

impl std::fmt::Debug for ClusterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online(_) => f.write_str("ClusterClient::Online"),
            Self::Offline => f.write_str("ClusterClient::Offline"),
        }
    }
}

/// Shared `configure` logic for live data sources
///
/// Downcasts the opaque provider data back into a `ClusterClient` and stores
/// it in the data source's slot. `None` means the framework has not configured
/// the provider yet and leaves the slot untouched; a value of any other type
/// is the "unexpected configuration-data type" error.
pub fn configure_cluster_client(
    slot: &mut Option<ClusterClient>,
    provider_data: Option<ProviderData>,
) -> Diagnostics {
    let Some(data) = provider_data else {
        return Diagnostics::new();
    };

    match data.downcast::<ClusterClient>() {
        Ok(client) => {
            *slot = Some((*client).clone());
            Diagnostics::new()
        }
        Err(_) => Diagnostic::error(
            "Unexpected data source configure type",
            format!(
                "{}: expected a ClusterClient; this is a bug in the provider",
                FetchError::UnexpectedProviderData
            ),
        )
        .into(),
    }
}
