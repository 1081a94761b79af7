//! Crdscout Provider - Kubernetes CRDs as read-only data sources
//!
//! This crate provides:
//! - **Data-source contract**: `DataSource` with Metadata/Schema/Configure/Read
//! - **Manifest rendering**: desired configuration as YAML with
//!   `apiVersion`/`kind` injected, no cluster contact
//! - **Live reads**: one dynamic-client GET mapped into the typed model
//! - **Registry**: `Provider` owning the shared client and every data source
//!
//! Each supported kind lives in its own `sources::<group>::<version>` module
//! following one mechanical template; adding a kind is a new module plus a
//! registry entry.

pub mod datasource;
pub mod error;
pub mod manifest;
pub mod provider;
pub mod sources;

pub use datasource::DataSource;
pub use error::{ProviderError, Result};
pub use manifest::render_manifest;
pub use provider::Provider;
pub use sources::metadata::{Metadata, ReadConfig, ReadCoordinates};
