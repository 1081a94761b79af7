//! Data sources for `apps.kubeblocks.io/v1beta1` `ConfigConstraint`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crdscout_core::{Attribute, AttributeType, Diagnostics, Schema, Validator, object};
use crdscout_kube::{
    ClusterClient, ProviderData, ResourceSelector, configure_cluster_client, read_resource,
};

use crate::datasource::DataSource;
use crate::error::{ProviderError, Result};
use crate::manifest::render_manifest;
use crate::sources::metadata::{Metadata, ReadConfig, metadata_attribute};

pub const API_VERSION: &str = "apps.kubeblocks.io/v1beta1";
pub const KIND: &str = "ConfigConstraint";

const SELECTOR: ResourceSelector = ResourceSelector::new(
    "apps.kubeblocks.io",
    "v1beta1",
    "ConfigConstraint",
    "configconstraints",
);

const FORMATS: [&str; 9] = [
    "dotenv",
    "hcl",
    "ini",
    "json",
    "properties",
    "redis",
    "toml",
    "xml",
    "yaml",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigConstraint {
    pub metadata: Metadata,
    pub spec: ConfigConstraintSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigConstraintSpec {
    pub formatter_config: FormatterConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_parameters: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_parameters: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immutable_parameters: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_reload_and_restart: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_static_params_before_restart: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_action: Option<ReloadAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatterConfig {
    pub format: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ini_config: Option<IniConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IniConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_trigger: Option<AutoTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_trigger: Option<ShellTrigger>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unix_signal_trigger: Option<UnixSignalTrigger>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellTrigger {
    pub command: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnixSignalTrigger {
    pub signal: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
}

fn spec_attribute(mode_required: bool) -> Attribute {
    let signal_validator = Validator::one_of([
        "SIGHUP", "SIGINT", "SIGQUIT", "SIGILL", "SIGTRAP", "SIGABRT", "SIGBUS", "SIGFPE",
        "SIGKILL", "SIGUSR1", "SIGSEGV", "SIGUSR2", "SIGPIPE", "SIGALRM", "SIGTERM",
    ]);

    let tree = object([
        (
            "formatterConfig",
            Attribute::required(object([
                (
                    "format",
                    Attribute::required_string()
                        .with_description("The format of the configuration file.")
                        .with_validator(Validator::one_of(FORMATS)),
                ),
                (
                    "iniConfig",
                    Attribute::optional(object([(
                        "sectionName",
                        Attribute::optional_string()
                            .with_description("The section that will be managed."),
                    )]))
                    .with_description("Options for the ini format."),
                ),
            ]))
            .with_description("Describes the format of the configuration file."),
        ),
        (
            "staticParameters",
            Attribute::optional_string_list()
                .with_description("Parameters that require a restart to take effect."),
        ),
        (
            "dynamicParameters",
            Attribute::optional_string_list()
                .with_description("Parameters that can be reloaded without a restart."),
        ),
        (
            "immutableParameters",
            Attribute::optional_string_list()
                .with_description("Parameters that must not be modified after creation."),
        ),
        (
            "mergeReloadAndRestart",
            Attribute::optional_bool().with_description(
                "Whether a dynamic reload and a restart in the same change are merged.",
            ),
        ),
        (
            "reloadStaticParamsBeforeRestart",
            Attribute::optional_bool().with_description(
                "Whether dynamic parameters are applied before the static ones trigger a restart.",
            ),
        ),
        (
            "reloadAction",
            Attribute::optional(object([
                (
                    "autoTrigger",
                    Attribute::optional(object([(
                        "processName",
                        Attribute::optional_string(),
                    )]))
                    .with_description("Automatically perform the reload when changes are detected."),
                ),
                (
                    "shellTrigger",
                    Attribute::optional(object([
                        (
                            "command",
                            Attribute::required(AttributeType::List(Box::new(
                                AttributeType::String,
                            )))
                            .with_description("The command to execute."),
                        ),
                        ("sync", Attribute::optional_bool()),
                    ]))
                    .with_description("Perform the reload by executing a command."),
                ),
                (
                    "unixSignalTrigger",
                    Attribute::optional(object([
                        (
                            "signal",
                            Attribute::required_string()
                                .with_description("The signal to send.")
                                .with_validator(signal_validator),
                        ),
                        ("processName", Attribute::optional_string()),
                    ]))
                    .with_description("Perform the reload by sending a Unix signal."),
                ),
            ]))
            .with_description("Defines how a parameter change is applied."),
        ),
    ]);

    let attr = if mode_required {
        Attribute::required(tree)
    } else {
        Attribute::computed(tree)
    };
    attr.with_description("Defines the config file format and the constraints on its parameters.")
}

/// Live data source: fetches a `ConfigConstraint` from the cluster
#[derive(Debug, Default)]
pub struct ConfigConstraintDataSource {
    client: Option<ClusterClient>,
}

impl ConfigConstraintDataSource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataSource for ConfigConstraintDataSource {
    fn type_name(&self) -> String {
        "k8s_apps_kubeblocks_io_config_constraint_v1beta1".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Fetches a ConfigConstraint from the cluster.")
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
        let object: ConfigConstraint =
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
pub struct ConfigConstraintManifestDataSource;

impl ConfigConstraintManifestDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for ConfigConstraintManifestDataSource {
    fn type_name(&self) -> String {
        "k8s_apps_kubeblocks_io_config_constraint_v1beta1_manifest".to_string()
    }

    fn schema(&self) -> Schema {
        Schema::new("Renders a ConfigConstraint manifest as YAML.")
            .with_attribute("metadata", metadata_attribute(false))
            .with_attribute("spec", spec_attribute(true))
            .with_attribute(
                "yaml",
                Attribute::computed_string().with_description("The rendered manifest."),
            )
    }

    async fn read(&self, config: JsonValue) -> Result<JsonValue> {
        let model: ConfigConstraint =
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

    use crdscout_kube::MockFetcher;

    fn minimal_model() -> ConfigConstraint {
        ConfigConstraint {
            metadata: Metadata {
                name: "mysql-config".to_string(),
                ..Default::default()
            },
            spec: ConfigConstraintSpec {
                formatter_config: FormatterConfig {
                    format: "ini".to_string(),
                    ini_config: None,
                },
                static_parameters: None,
                dynamic_parameters: None,
                immutable_parameters: None,
                merge_reload_and_restart: None,
                reload_static_params_before_restart: None,
                reload_action: None,
            },
        }
    }

    #[tokio::test]
    async fn manifest_read_renders_injected_constants_and_skips_optionals() {
        let source = ConfigConstraintManifestDataSource::new();
        let config = serde_json::to_value(minimal_model()).unwrap();

        let state = source.read(config).await.unwrap();
        let yaml = state["yaml"].as_str().unwrap();

        assert!(yaml.contains("apiVersion: apps.kubeblocks.io/v1beta1"));
        assert!(yaml.contains("kind: ConfigConstraint"));
        assert!(yaml.contains("format: ini"));
        assert!(!yaml.contains("staticParameters"));
        assert!(!yaml.contains("reloadAction"));
        assert!(!yaml.contains("iniConfig"));
    }

    #[tokio::test]
    async fn manifest_read_round_trips() {
        let model = ConfigConstraint {
            spec: ConfigConstraintSpec {
                static_parameters: Some(vec!["innodb_buffer_pool_size".to_string()]),
                merge_reload_and_restart: Some(true),
                reload_action: Some(ReloadAction {
                    auto_trigger: None,
                    shell_trigger: None,
                    unix_signal_trigger: Some(UnixSignalTrigger {
                        signal: "SIGHUP".to_string(),
                        process_name: Some("mysqld".to_string()),
                    }),
                }),
                ..minimal_model().spec
            },
            ..minimal_model()
        };

        let source = ConfigConstraintManifestDataSource::new();
        let state = source
            .read(serde_json::to_value(&model).unwrap())
            .await
            .unwrap();

        let parsed: ConfigConstraint =
            serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
        assert_eq!(parsed, model);
    }

    #[tokio::test]
    async fn live_read_maps_cluster_object() {
        let mock = MockFetcher::new();
        mock.insert(
            "ConfigConstraint",
            None,
            "mysql-config",
            json!({
                "apiVersion": "apps.kubeblocks.io/v1beta1",
                "kind": "ConfigConstraint",
                "metadata": {"name": "mysql-config", "uid": "ignored"},
                "spec": {
                    "formatterConfig": {"format": "ini", "iniConfig": {"sectionName": "mysqld"}},
                    "dynamicParameters": ["max_connections"],
                },
            }),
        );

        let mut source = ConfigConstraintDataSource::new();
        let data = ClusterClient::with_fetcher(Arc::new(mock)).into_provider_data();
        assert!(source.configure(Some(data)).is_empty());

        let state = source
            .read(json!({"metadata": {"name": "mysql-config"}}))
            .await
            .unwrap();

        assert_eq!(state["apiVersion"], "apps.kubeblocks.io/v1beta1");
        assert_eq!(state["kind"], "ConfigConstraint");
        assert_eq!(state["spec"]["formatterConfig"]["format"], "ini");
        assert_eq!(
            state["spec"]["formatterConfig"]["iniConfig"]["sectionName"],
            "mysqld"
        );
        assert_eq!(state["spec"]["dynamicParameters"][0], "max_connections");
    }

    #[tokio::test]
    async fn live_read_without_configure_fails() {
        let source = ConfigConstraintDataSource::new();
        let err = source
            .read(json!({"metadata": {"name": "x"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured));
    }

    #[test]
    fn schema_rejects_unknown_format() {
        let source = ConfigConstraintManifestDataSource::new();
        let diags = source.schema().validate(&json!({
            "metadata": {"name": "mysql-config"},
            "spec": {"formatterConfig": {"format": "csv"}},
        }));
        assert!(diags.has_errors());
    }
}
