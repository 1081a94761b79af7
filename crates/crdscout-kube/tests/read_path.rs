//! Integration tests for the fetch-and-map read path

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crdscout_kube::{ClusterClient, FetchError, MockFetcher, ResourceSelector, read_resource};

const WIDGETS: ResourceSelector = ResourceSelector::new("example.io", "v1", "Widget", "widgets");

#[derive(Debug, Deserialize, PartialEq)]
struct Widget {
    metadata: WidgetMeta,
    spec: WidgetSpec,
}

#[derive(Debug, Deserialize, PartialEq)]
struct WidgetMeta {
    name: String,
    namespace: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct WidgetSpec {
    size: i64,
    color: Option<String>,
}

fn online(mock: &MockFetcher) -> ClusterClient {
    ClusterClient::with_fetcher(Arc::new(mock.clone()))
}

#[tokio::test]
async fn offline_read_fails_without_network_calls() {
    let mock = MockFetcher::new();
    mock.insert("Widget", Some("ns"), "w1", json!({"spec": {"size": 1}}));

    let client = ClusterClient::offline();
    let result = read_resource::<Widget>(&client, &WIDGETS, "w1", Some("ns")).await;

    assert!(matches!(result, Err(FetchError::Offline)));
    assert_eq!(mock.fetch_counts().gets, 0);
}

#[tokio::test]
async fn successful_read_maps_declared_fields() {
    let mock = MockFetcher::new();
    mock.insert(
        "Widget",
        Some("ns"),
        "w1",
        json!({
            "apiVersion": "example.io/v1",
            "kind": "Widget",
            "metadata": {"name": "w1", "namespace": "ns", "resourceVersion": "42"},
            "spec": {"size": 3, "color": "blue", "experimental": true},
            "status": {"ready": true},
        }),
    );

    let client = online(&mock);
    let widget: Widget = read_resource(&client, &WIDGETS, "w1", Some("ns"))
        .await
        .unwrap();

    // declared fields are mapped losslessly, undeclared ones are dropped
    assert_eq!(widget.metadata.name, "w1");
    assert_eq!(widget.metadata.namespace.as_deref(), Some("ns"));
    assert_eq!(widget.spec.size, 3);
    assert_eq!(widget.spec.color.as_deref(), Some("blue"));
    assert_eq!(mock.fetch_counts().gets, 1);
}

#[tokio::test]
async fn malformed_response_is_a_deserialize_error() {
    let mock = MockFetcher::new();
    // spec is a string where the model expects an object
    mock.insert(
        "Widget",
        Some("ns"),
        "w1",
        json!({"metadata": {"name": "w1"}, "spec": "not-an-object"}),
    );

    let client = online(&mock);
    let err = read_resource::<Widget>(&client, &WIDGETS, "w1", Some("ns"))
        .await
        .unwrap_err();

    match err {
        FetchError::DeserializeResponse { kind, name, .. } => {
            assert_eq!(kind, "Widget");
            assert_eq!(name, "w1");
        }
        other => panic!("expected DeserializeResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_object_error_references_name_and_namespace() {
    let mock = MockFetcher::new();
    let client = online(&mock);

    let err = read_resource::<Widget>(&client, &WIDGETS, "n", Some("ns"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    let message = err.to_string();
    assert!(message.contains("'ns/n'"), "message was: {}", message);
    assert_eq!(mock.fetch_counts().gets, 1);
}

#[tokio::test]
async fn cluster_scoped_read_uses_no_namespace() {
    let mock = MockFetcher::new();
    mock.insert(
        "Widget",
        None,
        "global",
        json!({"metadata": {"name": "global"}, "spec": {"size": 9}}),
    );

    let client = online(&mock);
    let widget: Widget = read_resource(&client, &WIDGETS, "global", None)
        .await
        .unwrap();

    assert_eq!(widget.metadata.namespace, None);
    assert_eq!(widget.spec.size, 9);
}
