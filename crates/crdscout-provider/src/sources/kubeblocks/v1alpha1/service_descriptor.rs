//! Data sources for `apps.kubeblocks.io/v1alpha1` `ServiceDescriptor`

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

pub const API_VERSION: &str = "apps.kubeblocks.io/v1alpha1";
pub const KIND: &str = "ServiceDescriptor";

const SELECTOR: ResourceSelector = ResourceSelector::new(
    "apps.kubeblocks.io",
    "v1alpha1",
    "ServiceDescriptor",
    "servicedescriptors",
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub metadata: Metadata,
    pub spec: ServiceDescriptorSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptorSpec {
    pub service_kind: String,

    pub service_version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<CredentialVar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<CredentialVar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<CredentialVar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<ConnectionCredentialAuth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCredentialAuth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<CredentialVar>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<CredentialVar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialVar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<CredentialVarSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialVarSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key_ref: Option<KeySelector>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_key_ref: Option<KeySelector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySelector {
    pub name: String,
    pub key: String,
}

fn credential_var_attribute(description: &str) -> Attribute {
    let key_selector = || {
        object([
            (
                "name",
                Attribute::required_string().with_validator(Validator::Dns1123Subdomain),
            ),
            ("key", Attribute::required_string()),
        ])
    };

    Attribute::optional(object([
        ("value", Attribute::optional_string()),
        (
            "valueFrom",
            Attribute::optional(object([
                ("secretKeyRef", Attribute::optional(key_selector())),
                ("configMapKeyRef", Attribute::optional(key_selector())),
            ])),
        ),
    ]))
    .with_description(description)
}

fn spec_attribute(mode_required: bool) -> Attribute {
    let tree = object([
        (
            "serviceKind",
            Attribute::required_string()
                .with_description("The kind of the referenced service, e.g. mysql or redis.")
                .with_validator(Validator::LengthBetween { min: 1, max: 32 }),
        ),
        (
            "serviceVersion",
            Attribute::required_string()
                .with_description("The version of the referenced service."),
        ),
        (
            "endpoint",
            credential_var_attribute("The endpoint of the referenced service."),
        ),
        (
            "host",
            credential_var_attribute("The host of the referenced service."),
        ),
        (
            "port",
            credential_var_attribute("The port of the referenced service."),
        ),
        (
            "auth",
            Attribute::optional(object([
                (
                    "username",
                    credential_var_attribute("The username credential."),
                ),
                (
                    "password",
                    credential_var_attribute("The password credential."),
                ),
            ]))
            .with_description("The authentication credentials of the referenced service."),
        ),
    ]);

    let attr = if mode_required {
        Attribute::required(tree)
    } else {
        Attribute::computed(tree)
    };
    attr.with_description("Describes a service provided outside of the cluster.")
}

/// Live data source: fetches a `ServiceDescriptor` from the cluster
#[derive(Debug, Default)]
pub struct ServiceDescriptorDataSource {
    client: Option<ClusterClient>,
}

impl ServiceDescriptorDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ServiceDescriptorDataSource {
    fn type_name(&self) -> String {
        "k8s_apps_kubeblocks_io_service_descriptor_v1alpha1".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Fetches a ServiceDescriptor from the cluster.")
            .with_attribute("apiVersion", Attribute::computed_string())
            .with_attribute("kind", Attribute::computed_string())
            .with_attribute("metadata", metadata_attribute(true))
            .with_attribute("spec", spec_attribute(false))
    }

    fn configure(&mut self, provider_data: Option<ProviderData>) -> Diagnostics {
        configure_cluster_client(&mut self.client, provider_data)
    }

    async fn read(&self, config: JsonValue) -> Result<JsonValue> {
        let config: ReadConfig =
            serde_json::from_value(config).map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;
        let client = self.client.as_ref().ok_or(ProviderError::NotConfigured)?;

        let object: ServiceDescriptor = read_resource(
            client,
            &SELECTOR,
            &config.metadata.name,
            config.metadata.namespace.as_deref(),
        )
        .await?;

        let mut state =
            serde_json::to_value(&object).map_err(|e| ProviderError::State(e.to_string()))?;
        state["apiVersion"] = JsonValue::String(API_VERSION.to_string());
        state["kind"] = JsonValue::String(KIND.to_string());
        Ok(state)
    }
}

/// Manifest data source: renders the desired configuration as YAML
#[derive(Debug, Default)]
pub struct ServiceDescriptorManifestDataSource;

impl ServiceDescriptorManifestDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for ServiceDescriptorManifestDataSource {
    fn type_name(&self) -> String {
        "k8s_apps_kubeblocks_io_service_descriptor_v1alpha1_manifest".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Renders a ServiceDescriptor manifest as YAML.")
            .with_attribute("metadata", metadata_attribute(true))
            .with_attribute("spec", spec_attribute(true))
            .with_attribute(
                "yaml",
                Attribute::computed_string().with_description("The rendered manifest."),
            )
    }

    async fn read(&self, config: JsonValue) -> Result<JsonValue> {
        let model: ServiceDescriptor =
            serde_json::from_value(config).map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;

        let yaml = render_manifest(API_VERSION, KIND, &model)?;

        let mut state =
            serde_json::to_value(&model).map_err(|e| ProviderError::State(e.to_string()))?;
        state["yaml"] = JsonValue::String(yaml);
        Ok(state)
    }
}
