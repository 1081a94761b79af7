//! Manifest rendering
//!
//! The manifest variant of a data source never contacts the cluster: it
//! serializes the user-supplied configuration to YAML with the kind's
//! `apiVersion` and `kind` constants injected as the first two keys. Field
//! order beyond that follows struct declaration order.

use serde::Serialize;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{ProviderError, Result};

/// Render a typed model as a single-document Kubernetes manifest
pub fn render_manifest<T: Serialize>(api_version: &str, kind: &str, model: &T) -> Result<String> {
    let body = serde_yaml::to_value(model).map_err(|e| ProviderError::Render(e.to_string()))?;
    let YamlValue::Mapping(fields) = body else {
        return Err(ProviderError::Render(
            "manifest model must serialize to a mapping".to_string(),
        ));
    };

    let mut doc = Mapping::new();
    doc.insert("apiVersion".into(), api_version.into());
    doc.insert("kind".into(), kind.into());
    for (key, value) in fields {
        // the injected constants always win over model fields
        if !doc.contains_key(&key) {
            doc.insert(key, value);
        }
    }

    serde_yaml::to_string(&YamlValue::Mapping(doc)).map_err(|e| ProviderError::Render(e.to_string()))
}
