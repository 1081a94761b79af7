//! Shared `metadata` handling
//!
//! Every data source carries the same Kubernetes object metadata block; this
//! module holds the model, the schema fragment and the identifying
//! coordinates parsed from a live read's configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crdscout_core::{Attribute, AttributeType, Validator, object};

/// Kubernetes object metadata, restricted to the fields a data source exposes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

/// Configuration of a live read: just the identifying coordinates
#[derive(Debug, Clone, Deserialize)]
pub struct ReadConfig {
    pub metadata: ReadCoordinates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadCoordinates {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// The `metadata` attribute shared by every schema
pub fn metadata_attribute(namespaced: bool) -> Attribute {
    let mut attrs: Vec<(&'static str, Attribute)> = vec![(
        "name",
        Attribute::required_string()
            .with_description("The name of the resource.")
            .with_validator(Validator::Dns1123Subdomain),
    )];
    if namespaced {
        attrs.push((
            "namespace",
            Attribute::optional_string()
                .with_description("The namespace containing the resource.")
                .with_validator(Validator::Dns1123Subdomain),
        ));
    }
    attrs.push((
        "labels",
        Attribute::optional(AttributeType::Map)
            .with_description("Keys and values that can be used to organize and categorize objects.")
            .with_validator(Validator::LabelMap),
    ));
    attrs.push((
        "annotations",
        Attribute::optional(AttributeType::Map)
            .with_description("Keys and values that can be used by external tooling to store arbitrary metadata.")
            .with_validator(Validator::AnnotationMap),
    ));

    Attribute::required(object(attrs)).with_description("Data that helps uniquely identify the resource.")
}
