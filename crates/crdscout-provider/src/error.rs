//! Error types for crdscout-provider

use thiserror::Error;

use crdscout_core::Diagnostic;
use crdscout_kube::FetchError;

/// Result type for data source operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors surfaced by a data source read
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Cluster read failed; carries the full fetch taxonomy
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// `read` was called before `configure` supplied a client
    #[error("data source has not been configured with a cluster client")]
    NotConfigured,

    /// The configuration value did not fit the data source's model
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Manifest YAML rendering failed; unexpected for well-typed input
    #[error("unable to render manifest: {0}")]
    Render(String),

    /// The resulting state could not be serialized
    #[error("unable to serialize state: {0}")]
    State(String),
}

impl ProviderError {
    /// Convert into the diagnostic form returned to the host framework
    pub fn into_diagnostic(self) -> Diagnostic {
        let summary = match &self {
            ProviderError::Fetch(FetchError::Offline) => "Provider is offline",
            ProviderError::Fetch(_) => "Unable to read resource",
            ProviderError::NotConfigured => "Data source not configured",
            ProviderError::InvalidConfig(_) => "Invalid data source configuration",
            ProviderError::Render(_) => "Unable to render manifest",
            ProviderError::State(_) => "Unable to serialize state",
        };
        Diagnostic::error(summary, self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_is_transparent() {
        let err = ProviderError::from(FetchError::Offline);
        assert_eq!(
            err.to_string(),
            "provider is in offline mode, no cluster client is available"
        );
    }

    #[test]
    fn test_into_diagnostic() {
        let diag = ProviderError::NotConfigured.into_diagnostic();
        assert_eq!(diag.summary, "Data source not configured");
        assert!(diag.detail.contains("configured"));
    }
}
