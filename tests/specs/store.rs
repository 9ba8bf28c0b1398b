//! Dual-backend store specs.

use crate::prelude::*;
use berth_clients::ClientError;

#[tokio::test]
async fn unified_view_spans_both_backends() {
    let world = world();
    world.api.add_workspace(legacy_workspace("ws-1", "che", "alpha", "STOPPED"));
    world.dev.add_resource(dev_resource("user-che", "beta", "Running"));

    world.store.legacy.request_all().await.unwrap();
    world.store.dev.request_all("user-che").await.unwrap();

    let all = world.store.all_workspaces();
    assert_eq!(all.len(), 2);
    assert!(world.store.find_by_id("ws-1").is_some());
    assert!(world.store.find_by_qualified_name("user-che", "beta").is_some());
}

#[tokio::test]
async fn start_failure_rethrows_displayable_reason() {
    let world = world();
    world.api.add_workspace(legacy_workspace("ws-1", "che", "alpha", "STOPPED"));
    world.store.legacy.request_all().await.unwrap();

    world
        .api
        .fail_start_with(ClientError::response_with_message(
            500,
            "Internal Server Error",
            "Not enough resources",
        ));
    let err = world.store.legacy.start("ws-1", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Not enough resources");
}

#[tokio::test]
async fn merged_logs_are_append_only_union() {
    let world = world();
    world.store.lock_state_mut(|state| {
        state.legacy.append_log("shared", "first");
        state.dev.append_log("shared", "second");
        state.dev.append_log("dev-only", "solo");
    });

    let merged = world.store.merged_logs();
    assert_eq!(
        merged.get("shared").map(Vec::as_slice),
        Some(["first".to_string(), "second".to_string()].as_slice())
    );
    assert!(merged.contains_key("dev-only"));
}

#[tokio::test]
async fn delete_removes_workspace_from_collection() {
    let world = world();
    world.api.add_workspace(legacy_workspace("ws-1", "che", "alpha", "STOPPED"));
    world.store.legacy.request_all().await.unwrap();
    assert!(world.store.find_by_id("ws-1").is_some());

    world.store.legacy.delete("ws-1").await.unwrap();
    assert!(world.store.find_by_id("ws-1").is_none());
}
