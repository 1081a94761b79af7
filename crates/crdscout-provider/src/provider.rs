//! Provider registry
//!
//! Owns the shared cluster client and lists every registered data source.
//! The client is built once by the bootstrap (or left offline) and handed to
//! each live data source through `configure`.

use tracing::debug;

use crdscout_kube::{ClusterClient, ProviderData};

use crate::datasource::DataSource;
use crate::sources::cert_manager::v1::cluster_issuer::{
    ClusterIssuerDataSource, ClusterIssuerManifestDataSource,
};
use crate::sources::external_secrets::v1alpha1::webhook::{
    WebhookDataSource, WebhookManifestDataSource,
};
use crate::sources::kubeblocks::v1alpha1::service_descriptor::{
    ServiceDescriptorDataSource, ServiceDescriptorManifestDataSource,
};
use crate::sources::kubeblocks::v1beta1::config_constraint::{
    ConfigConstraintDataSource, ConfigConstraintManifestDataSource,
};

/// The crdscout provider: a shared client plus the data source registry
pub struct Provider {
    client: ClusterClient,
}

impl Provider {
    pub fn new(client: ClusterClient) -> Self {
        Self { client }
    }

    /// A provider that refuses every live read
    pub fn offline() -> Self {
        Self::new(ClusterClient::offline())
    }

    pub fn client(&self) -> &ClusterClient {
        &self.client
    }

    /// The opaque form of the client handed to each data source
    pub fn provider_data(&self) -> ProviderData {
        self.client.clone().into_provider_data()
    }

    /// Every registered data source, unconfigured
    pub fn data_sources() -> Vec<Box<dyn DataSource>> {
        vec![
            Box::new(ConfigConstraintDataSource::new()),
            Box::new(ConfigConstraintManifestDataSource::new()),
            Box::new(ServiceDescriptorDataSource::new()),
            Box::new(ServiceDescriptorManifestDataSource::new()),
            Box::new(WebhookDataSource::new()),
            Box::new(WebhookManifestDataSource::new()),
            Box::new(ClusterIssuerDataSource::new()),
            Box::new(ClusterIssuerManifestDataSource::new()),
        ]
    }

    /// Every registered data source with the shared client already configured
    ///
    /// Configuration cannot fail here: the provider data is always the
    /// `ClusterClient` this provider owns.
    pub fn configured_data_sources(&self) -> Vec<Box<dyn DataSource>> {
        let mut sources = Self::data_sources();
        debug!(count = sources.len(), "configuring data sources");
        for source in &mut sources {
            let diags = source.configure(Some(self.provider_data()));
            debug_assert!(!diags.has_errors(), "configure rejected shared client");
        }
        sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_names_are_unique() {
        let names: Vec<String> = Provider::data_sources()
            .iter()
            .map(|s| s.type_name())
            .collect();
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(names.len(), unique.len(), "duplicate type names: {:?}", names);
    }

    #[test]
    fn test_every_source_declares_a_schema() {
        for source in Provider::data_sources() {
            let schema = source.schema();
            assert!(
                !schema.attributes.is_empty(),
                "{} has an empty schema",
                source.type_name()
            );
            assert!(schema.attribute("metadata").is_some());
        }
    }

    #[test]
    fn test_every_declared_validator_compiles() {
        use crdscout_core::{Attribute, AttributeType};

        fn walk(attr: &Attribute, owner: &str) {
            for validator in &attr.validators {
                validator
                    .ensure_valid()
                    .unwrap_or_else(|e| panic!("{}: {}", owner, e));
            }
            match &attr.attr_type {
                AttributeType::Object(nested) => {
                    for nested_attr in nested.values() {
                        walk(nested_attr, owner);
                    }
                }
                AttributeType::List(element) => {
                    if let AttributeType::Object(nested) = element.as_ref() {
                        for nested_attr in nested.values() {
                            walk(nested_attr, owner);
                        }
                    }
                }
                _ => {}
            }
        }

        for source in Provider::data_sources() {
            let name = source.type_name();
            for attr in source.schema().attributes.values() {
                walk(attr, &name);
            }
        }
    }

    #[test]
    fn test_manifest_variants_expose_yaml() {
        for source in Provider::data_sources() {
            if source.type_name().ends_with("_manifest") {
                assert!(source.schema().attribute("yaml").is_some());
            }
        }
    }

    #[test]
    fn test_offline_provider_configures_cleanly() {
        let provider = Provider::offline();
        assert!(provider.client().is_offline());
        let sources = provider.configured_data_sources();
        assert_eq!(sources.len(), 8);
    }
}
