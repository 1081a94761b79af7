//! The data-source contract
//!
//! Mirrors the host framework's inbound surface: a type name, a static
//! schema, a one-time `configure` with shared provider data, and a `read`
//! that turns configuration into state. Implementations must be Send + Sync;
//! the framework may run many reads concurrently across instances.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crdscout_core::{Diagnostics, Schema};
use crdscout_kube::ProviderData;

use crate::error::Result;

/// A read-only data source for one CRD kind
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Unique type name registered with the host framework
    fn type_name(&self) -> String;

    /// The static attribute tree this data source exposes
    fn schema(&self) -> Schema;

    /// Receive the shared cluster handle (or offline flag)
    ///
    /// Manifest variants never contact the cluster and keep the default
    /// no-op implementation.
    fn configure(&mut self, provider_data: Option<ProviderData>) -> Diagnostics {
        let _ = provider_data;
        Diagnostics::new()
    }

    /// Turn the caller's configuration into populated state
    async fn read(&self, config: JsonValue) -> Result<JsonValue>;
}
