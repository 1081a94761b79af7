//! Crdscout Kube - cluster access for CRD data sources
//!
//! This crate provides:
//! - **Client gate**: a shared `ClusterClient` that is either online or
//!   explicitly offline; offline reads fail before any network call
//! - **Fetch path**: one dynamic-client GET per read, re-marshalled into the
//!   caller's typed model, with a distinct error per failure point
//! - **Mock fetcher**: in-memory objects plus operation counts for tests

pub mod client;
pub mod error;
pub mod fetch;
pub mod mock;

pub use client::{ClusterClient, ProviderData, configure_cluster_client};
pub use error::{FetchError, Result};
pub use fetch::{DynamicFetcher, ObjectFetcher, ResourceSelector, read_resource};
pub use mock::{FetchCounts, MockFetcher};
