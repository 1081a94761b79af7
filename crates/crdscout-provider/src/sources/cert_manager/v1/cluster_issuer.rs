//! Data sources for `cert-manager.io/v1` `ClusterIssuer`
//!
//! ClusterIssuer is cluster-scoped: reads never carry a namespace.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crdscout_core::{Attribute, Diagnostics, Schema, Validator, object};
use crdscout_kube::{
    ClusterClient, ProviderData, ResourceSelector, configure_cluster_client, read_resource,
};

use crate::datasource::DataSource;
use crate::error::{ProviderError, Result};
use crate::manifest::render_manifest;
use crate::sources::metadata::{Metadata, ReadConfig, metadata_attribute};

pub const API_VERSION: &str = "cert-manager.io/v1";
pub const KIND: &str = "ClusterIssuer";

const SELECTOR: ResourceSelector =
    ResourceSelector::new("cert-manager.io", "v1", "ClusterIssuer", "clusterissuers");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterIssuer {
    pub metadata: Metadata,
    pub spec: ClusterIssuerSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIssuerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_signed: Option<SelfSignedIssuer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<CaIssuer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfSignedIssuer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crl_distribution_points: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaIssuer {
    pub secret_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crl_distribution_points: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocsp_servers: Option<Vec<String>>,
}

fn spec_attribute(mode_required: bool) -> Attribute {
    let tree = object([
        (
            "selfSigned",
            Attribute::optional(object([(
                "crlDistributionPoints",
                Attribute::optional_string_list(),
            )]))
            .with_description("Issue certificates signed by the certificate's own key."),
        ),
        (
            "ca",
            Attribute::optional(object([
                (
                    "secretName",
                    Attribute::required_string()
                        .with_description("The secret holding the CA key pair.")
                        .with_validator(Validator::Dns1123Subdomain),
                ),
                ("crlDistributionPoints", Attribute::optional_string_list()),
                ("ocspServers", Attribute::optional_string_list()),
            ]))
            .with_description("Issue certificates signed by a CA key pair stored in a secret."),
        ),
    ]);

    let attr = if mode_required {
        Attribute::required(tree)
    } else {
        Attribute::computed(tree)
    };
    attr.with_description("Configuration of the issuer.")
}

/// Live data source: fetches a `ClusterIssuer` from the cluster
#[derive(Debug, Default)]
pub struct ClusterIssuerDataSource {
    client: Option<ClusterClient>,
}

impl ClusterIssuerDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ClusterIssuerDataSource {
    fn type_name(&self) -> String {
        "k8s_cert_manager_io_cluster_issuer_v1".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Fetches a ClusterIssuer from the cluster.")
            .with_attribute("apiVersion", Attribute::computed_string())
            .with_attribute("kind", Attribute::computed_string())
            .with_attribute("metadata", metadata_attribute(false))
            .with_attribute("spec", spec_attribute(false))
    }

    fn configure(&mut self, provider_data: Option<ProviderData>) -> Diagnostics {
        configure_cluster_client(&mut self.client, provider_data)
    }

    async fn read(&self, config: JsonValue) -> Result<JsonValue> {
        let config: ReadConfig =
            serde_json::from_value(config).map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;
        let client = self.client.as_ref().ok_or(ProviderError::NotConfigured)?;

        // cluster-scoped: any configured namespace is ignored
        let object: ClusterIssuer =
            read_resource(client, &SELECTOR, &config.metadata.name, None).await?;

        let mut state =
            serde_json::to_value(&object).map_err(|e| ProviderError::State(e.to_string()))?;
        state["apiVersion"] = JsonValue::String(API_VERSION.to_string());
        state["kind"] = JsonValue::String(KIND.to_string());
        Ok(state)
    }
}

/// Manifest data source: renders the desired configuration as YAML
#[derive(Debug, Default)]
pub struct ClusterIssuerManifestDataSource;

impl ClusterIssuerManifestDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for ClusterIssuerManifestDataSource {
    fn type_name(&self) -> String {
        "k8s_cert_manager_io_cluster_issuer_v1_manifest".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Renders a ClusterIssuer manifest as YAML.")
            .with_attribute("metadata", metadata_attribute(false))
            .with_attribute("spec", spec_attribute(true))
            .with_attribute(
                "yaml",
                Attribute::computed_string().with_description("The rendered manifest."),
            )
    }

    async fn read(&self, config: JsonValue) -> Result<JsonValue> {
        let model: ClusterIssuer =
            serde_json::from_value(config).map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;

        let yaml = render_manifest(API_VERSION, KIND, &model)?;

        let mut state =
            serde_json::to_value(&model).map_err(|e| ProviderError::State(e.to_string()))?;
        state["yaml"] = JsonValue::String(yaml);
        Ok(state)
    }
}
