//! Error types for crdscout-kube
//!
//! Every failure point in the read path has its own variant, and all of them
//! are terminal: a read is a single idempotent GET, so nothing is retried.

use thiserror::Error;

/// Result type for crdscout-kube operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while reading a resource from the cluster
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The provider was configured in offline mode; no network call was made
    #[error("provider is in offline mode, no cluster client is available")]
    Offline,

    /// The GET against the API server failed (transport or API error)
    #[error("unable to get {kind} '{}': {source}", qualified_name(.namespace, .name))]
    GetResource {
        kind: String,
        name: String,
        namespace: Option<String>,
        #[source]
        source: kube::Error,
    },

    /// The fetched object could not be re-serialized to JSON
    #[error("unable to serialize API response for {kind} '{name}': {message}")]
    SerializeResponse {
        kind: String,
        name: String,
        message: String,
    },

    /// The JSON form of the response did not fit the typed model
    #[error("unable to deserialize API response for {kind} '{name}': {message}")]
    DeserializeResponse {
        kind: String,
        name: String,
        message: String,
    },

    /// `configure` received provider data of an unexpected type
    #[error("unexpected provider data type received during configure")]
    UnexpectedProviderData,

    /// Client construction failed
    #[error("Kubernetes client error: {0}")]
    Client(#[from] kube::Error),
}

fn qualified_name(namespace: &Option<String>, name: &String) -> String {
    match namespace {
        Some(ns) => format!("{}/{}", ns, name),
        None => name.clone(),
    }
}

impl FetchError {
    /// Check if this wraps a Kubernetes 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FetchError::GetResource {
                source: kube::Error::Api(resp),
                ..
            } if resp.code == 404
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn not_found(kind: &str, name: &str, namespace: Option<&str>) -> FetchError {
        FetchError::GetResource {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            source: kube::Error::Api(ErrorResponse {
                status: "Failure".to_string(),
                message: format!("{} \"{}\" not found", kind.to_lowercase(), name),
                reason: "NotFound".to_string(),
                code: 404,
            }),
        }
    }

    #[test]
    fn test_get_resource_message_includes_coordinates() {
        let err = not_found("Webhook", "n", Some("ns"));
        let message = err.to_string();
        assert!(message.contains("Webhook"));
        assert!(message.contains("n"));
        assert!(message.contains("ns/"));
    }

    #[test]
    fn test_get_resource_message_cluster_scoped() {
        let err = not_found("ClusterIssuer", "letsencrypt", None);
        let message = err.to_string();
        assert!(message.contains("'letsencrypt'"));
        assert!(!message.contains("/letsencrypt"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(not_found("Webhook", "n", Some("ns")).is_not_found());
        assert!(!FetchError::Offline.is_not_found());
    }
}
