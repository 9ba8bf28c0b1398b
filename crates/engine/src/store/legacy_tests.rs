// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::store::DualStore;
use crate::EngineError;
use berth_clients::{ClientError, CreateParams, FakeDevWorkspaceClient, FakeLegacyApi};
use berth_core::Devfile;
use std::sync::Arc;

fn store() -> (DualStore<FakeLegacyApi, FakeDevWorkspaceClient>, FakeLegacyApi) {
    let api = FakeLegacyApi::new();
    let store = DualStore::new(Arc::new(api.clone()), Arc::new(FakeDevWorkspaceClient::new()));
    (store, api)
}

fn named_devfile(name: &str) -> Devfile {
    let mut devfile = Devfile::default();
    devfile.metadata.name = Some(name.to_string());
    devfile
}

#[tokio::test]
async fn request_all_populates_collection() {
    let (store, api) = store();
    api.add_workspace(berth_core::LegacyWorkspace {
        id: "ws-1".to_string(),
        status: "STOPPED".to_string(),
        ..Default::default()
    });

    store.legacy.request_all().await.unwrap();
    store.lock_state(|state| {
        assert_eq!(state.legacy.workspaces.len(), 1);
        assert!(!state.legacy.is_loading);
        assert!(state.legacy.last_error.is_none());
    });
}

#[tokio::test]
async fn request_all_failure_records_error() {
    let (store, api) = store();
    api.fail_get_all_with(ClientError::message("gateway down"));

    let err = store.legacy.request_all().await.unwrap_err();
    assert_eq!(err, EngineError::Backend("gateway down".to_string()));
    store.lock_state(|state| {
        assert_eq!(state.legacy.last_error.as_deref(), Some("gateway down"));
        assert!(!state.legacy.is_loading);
    });
}

#[tokio::test]
async fn start_failure_rethrows_normalized_reason() {
    let (store, api) = store();
    let ws = store
        .legacy
        .create_from_devfile(named_devfile("demo"), CreateParams::default())
        .await
        .unwrap();

    api.fail_start_with(ClientError::response_with_message(
        500,
        "Internal Server Error",
        "Not enough RAM",
    ));
    let err = store.legacy.start(&ws.id, None).await.unwrap_err();
    assert_eq!(err, EngineError::Backend("Not enough RAM".to_string()));
}

#[tokio::test]
async fn start_success_applies_returned_record() {
    let (store, _api) = store();
    let ws = store
        .legacy
        .create_from_devfile(named_devfile("demo"), CreateParams::default())
        .await
        .unwrap();

    store.legacy.start(&ws.id, None).await.unwrap();
    store.lock_state(|state| {
        assert_eq!(state.legacy.get(&ws.id).map(|w| w.status.as_str()), Some("STARTING"));
    });
}

#[tokio::test]
async fn delete_removes_record_only_on_success() {
    let (store, api) = store();
    let ws = store
        .legacy
        .create_from_devfile(named_devfile("demo"), CreateParams::default())
        .await
        .unwrap();

    api.fail_delete_with(ClientError::message("forbidden"));
    assert!(store.legacy.delete(&ws.id).await.is_err());
    store.lock_state(|state| assert!(state.legacy.get(&ws.id).is_some()));

    store.legacy.delete(&ws.id).await.unwrap();
    store.lock_state(|state| assert!(state.legacy.get(&ws.id).is_none()));
}

#[tokio::test]
async fn create_is_not_idempotent() {
    let (store, _api) = store();
    let first = store
        .legacy
        .create_from_devfile(named_devfile("same"), CreateParams::default())
        .await
        .unwrap();
    let second = store
        .legacy
        .create_from_devfile(named_devfile("same"), CreateParams::default())
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    store.lock_state(|state| assert_eq!(state.legacy.workspaces.len(), 2));
}

#[tokio::test]
async fn request_settings_stores_settings() {
    let (store, api) = store();
    api.set_settings(berth_clients::WorkspaceSettings {
        security_context_constraint: Some("restricted".to_string()),
        ..Default::default()
    });

    store.legacy.request_settings().await.unwrap();
    assert_eq!(
        store.settings().security_context_constraint.as_deref(),
        Some("restricted")
    );
}
