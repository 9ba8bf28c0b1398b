// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use berth_core::devworkspace::DevWorkspaceMetadata;

fn resource(namespace: &str, name: &str) -> DevWorkspaceResource {
    DevWorkspaceResource {
        kind: "DevWorkspace".to_string(),
        metadata: DevWorkspaceMetadata {
            name: name.to_string(),
            namespace: namespace.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn create_assigns_uid_and_devworkspace_id() {
    let client = FakeDevWorkspaceClient::new();
    let created = client
        .create(resource("user-che", "demo"), &["che-theia".to_string()])
        .await
        .unwrap();

    assert_eq!(created.metadata.uid, "uid-1");
    assert!(created.devworkspace_id().is_some());
    assert_eq!(created.phase(), "Stopped");
    assert!(matches!(
        client.calls().first(),
        Some(DevWorkspaceCall::Create { name, .. }) if name == "demo"
    ));
}

#[tokio::test]
async fn change_status_flips_spec_and_phase() {
    let client = FakeDevWorkspaceClient::new();
    client.create(resource("user-che", "demo"), &[]).await.unwrap();

    let started = client.change_status("user-che", "demo", true).await.unwrap();
    assert!(started.spec.started);
    assert_eq!(started.phase(), "Starting");

    let stopped = client.change_status("user-che", "demo", false).await.unwrap();
    assert!(!stopped.spec.started);
    assert_eq!(stopped.phase(), "Stopping");
}

#[tokio::test]
async fn list_filters_by_namespace() {
    let client = FakeDevWorkspaceClient::new();
    client.create(resource("ns-a", "one"), &[]).await.unwrap();
    client.create(resource("ns-b", "two"), &[]).await.unwrap();

    let listed = client.list_in_namespace("ns-a").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].metadata.name, "one");
}

#[tokio::test]
async fn scripted_change_status_failure_fires_once() {
    let client = FakeDevWorkspaceClient::new();
    client.create(resource("user-che", "demo"), &[]).await.unwrap();

    client.fail_change_status_with(ClientError::message("conflict"));
    assert!(client.change_status("user-che", "demo", true).await.is_err());
    assert!(client.change_status("user-che", "demo", true).await.is_ok());
}
