//! Data sources for `generators.external-secrets.io/v1alpha1` `Webhook`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crdscout_core::{Attribute, AttributeType, Diagnostics, Schema, Validator, object};
use crdscout_kube::{
    ClusterClient, ProviderData, ResourceSelector, configure_cluster_client, read_resource,
};

use crate::datasource::DataSource;
use crate::error::{ProviderError, Result};
use crate::manifest::render_manifest;
use crate::sources::metadata::{Metadata, ReadConfig, metadata_attribute};

pub const API_VERSION: &str = "generators.external-secrets.io/v1alpha1";
pub const KIND: &str = "Webhook";

const SELECTOR: ResourceSelector = ResourceSelector::new(
    "generators.external-secrets.io",
    "v1alpha1",
    "Webhook",
    "webhooks",
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub metadata: Metadata,
    pub spec: WebhookSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSpec {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    pub result: WebhookResult,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<WebhookSecret>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_bundle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_provider: Option<CaProvider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSecret {
    pub name: String,
    pub secret_ref: SecretKeySelector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretKeySelector {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaProvider {
    #[serde(rename = "type")]
    pub provider_type: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

fn spec_attribute(mode_required: bool) -> Attribute {
    let tree = object([
        (
            "url",
            Attribute::required_string().with_description("The URL the webhook calls."),
        ),
        (
            "method",
            Attribute::optional_string()
                .with_description("The HTTP method of the request.")
                .with_validator(Validator::one_of(["GET", "POST", "PUT", "PATCH"])),
        ),
        (
            "timeout",
            Attribute::optional_string()
                .with_description("Request timeout as a duration string, e.g. 5s.")
                .with_validator(Validator::regex_matches(
                    r"^\d+(\.\d+)?(ms|s|m|h)$",
                    "must be a duration such as 500ms, 5s or 1m",
                )),
        ),
        (
            "body",
            Attribute::optional_string().with_description("The request body template."),
        ),
        (
            "headers",
            Attribute::optional_map().with_description("Headers sent with the request."),
        ),
        (
            "result",
            Attribute::required(object([(
                "jsonPath",
                Attribute::optional_string()
                    .with_description("The JSONPath applied to the response to extract the value."),
            )]))
            .with_description("How the response is parsed."),
        ),
        (
            "secrets",
            Attribute::optional(AttributeType::List(Box::new(object([
                (
                    "name",
                    Attribute::required_string()
                        .with_description("The name the secret is referenced by in templates."),
                ),
                (
                    "secretRef",
                    Attribute::required(object([
                        (
                            "name",
                            Attribute::required_string()
                                .with_validator(Validator::Dns1123Subdomain),
                        ),
                        ("key", Attribute::optional_string()),
                    ])),
                ),
            ]))))
            .with_description("Secrets usable in the request templates."),
        ),
        (
            "caBundle",
            Attribute::optional_string()
                .with_description("A PEM-encoded CA bundle used to verify the server."),
        ),
        (
            "caProvider",
            Attribute::optional(object([
                (
                    "type",
                    Attribute::required_string()
                        .with_validator(Validator::one_of(["Secret", "ConfigMap"])),
                ),
                (
                    "name",
                    Attribute::required_string().with_validator(Validator::Dns1123Subdomain),
                ),
                ("key", Attribute::optional_string()),
                ("namespace", Attribute::optional_string()),
            ]))
            .with_description("Where to load the CA certificate from."),
        ),
    ]);

    let attr = if mode_required {
        Attribute::required(tree)
    } else {
        Attribute::computed(tree)
    };
    attr.with_description("Defines how the webhook generator calls an external endpoint.")
}

/// Live data source: fetches a `Webhook` generator from the cluster
#[derive(Debug, Default)]
pub struct WebhookDataSource {
    client: Option<ClusterClient>,
}

impl WebhookDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for WebhookDataSource {
    fn type_name(&self) -> String {
        "k8s_generators_external_secrets_io_webhook_v1alpha1".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Fetches a Webhook generator from the cluster.")
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

        let object: Webhook = read_resource(
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
pub struct WebhookManifestDataSource;

impl WebhookManifestDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for WebhookManifestDataSource {
    fn type_name(&self) -> String {
        "k8s_generators_external_secrets_io_webhook_v1alpha1_manifest".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Renders a Webhook generator manifest as YAML.")
            .with_attribute("metadata", metadata_attribute(true))
            .with_attribute("spec", spec_attribute(true))
            .with_attribute(
                "yaml",
                Attribute::computed_string().with_description("The rendered manifest."),
            )
    }

    async fn read(&self, config: JsonValue) -> Result<JsonValue> {
        let model: Webhook =
            serde_json::from_value(config).map_err(|e| ProviderError::InvalidConfig(e.to_string()))?;

        let yaml = render_manifest(API_VERSION, KIND, &model)?;

        let mut state =
            serde_json::to_value(&model).map_err(|e| ProviderError::State(e.to_string()))?;
        state["yaml"] = JsonValue::String(yaml);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    use crdscout_kube::{FetchError, MockFetcher};

    #[tokio::test]
    async fn live_read_missing_object_mentions_name_and_namespace() {
        let mock = MockFetcher::new();
        let mut source = WebhookDataSource::new();
        let data = ClusterClient::with_fetcher(Arc::new(mock.clone())).into_provider_data();
        assert!(source.configure(Some(data)).is_empty());

        let err = source
            .read(json!({"metadata": {"name": "n", "namespace": "ns"}}))
            .await
            .unwrap_err();

        let ProviderError::Fetch(fetch) = &err else {
            panic!("expected a fetch error, got {:?}", err);
        };
        assert!(fetch.is_not_found());

        let message = err.to_string();
        assert!(message.contains("get"), "message was: {}", message);
        assert!(message.contains("'ns/n'"), "message was: {}", message);
        assert_eq!(mock.fetch_counts().gets, 1);
    }

    #[tokio::test]
    async fn offline_read_never_calls_the_fetcher() {
        let mut source = WebhookDataSource::new();
        let data = ClusterClient::offline().into_provider_data();
        assert!(source.configure(Some(data)).is_empty());

        let err = source
            .read(json!({"metadata": {"name": "n", "namespace": "ns"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Fetch(FetchError::Offline)));
    }

    #[tokio::test]
    async fn manifest_read_round_trips() {
        let model = Webhook {
            metadata: Metadata {
                name: "vault-token".to_string(),
                namespace: Some("secrets".to_string()),
                ..Default::default()
            },
            spec: WebhookSpec {
                url: "https://vault.example.com/v1/token".to_string(),
                method: Some("POST".to_string()),
                timeout: Some("5s".to_string()),
                body: None,
                headers: Some(BTreeMap::from([(
                    "Content-Type".to_string(),
                    "application/json".to_string(),
                )])),
                result: WebhookResult {
                    json_path: Some("$.data.token".to_string()),
                },
                secrets: Some(vec![WebhookSecret {
                    name: "auth".to_string(),
                    secret_ref: SecretKeySelector {
                        name: "vault-auth".to_string(),
                        key: Some("token".to_string()),
                    },
                }]),
                ca_bundle: None,
                ca_provider: None,
            },
        };

        let source = WebhookManifestDataSource::new();
        let state = source
            .read(serde_json::to_value(&model).unwrap())
            .await
            .unwrap();
        let yaml = state["yaml"].as_str().unwrap();

        assert!(yaml.contains("apiVersion: generators.external-secrets.io/v1alpha1"));
        assert!(yaml.contains("kind: Webhook"));
        assert!(yaml.contains("jsonPath: $.data.token"));
        assert!(!yaml.contains("caBundle"));

        let parsed: Webhook = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn schema_validates_method_and_timeout() {
        let source = WebhookManifestDataSource::new();
        let diags = source.schema().validate(&json!({
            "metadata": {"name": "vault-token"},
            "spec": {
                "url": "https://vault.example.com",
                "method": "DELETE",
                "timeout": "soon",
                "result": {},
            },
        }));
        let attributes: Vec<&str> = diags
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert!(attributes.contains(&"spec.method"));
        assert!(attributes.contains(&"spec.timeout"));
    }
}
