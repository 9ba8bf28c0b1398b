// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use berth_core::devworkspace::{DevWorkspaceMetadata, DevWorkspaceStatus};
use berth_core::{Devfile, DevWorkspaceResource, LegacyWorkspace};
use indexmap::IndexMap;

fn legacy(id: &str, namespace: &str, name: &str, updated_ms: u64) -> LegacyWorkspace {
    let mut devfile = Devfile::default();
    devfile.metadata.name = Some(name.to_string());
    let mut attributes = IndexMap::new();
    attributes.insert("updated".to_string(), updated_ms.to_string());
    LegacyWorkspace {
        id: id.to_string(),
        status: "STOPPED".to_string(),
        namespace: namespace.to_string(),
        devfile,
        attributes,
        runtime: None,
    }
}

fn dev(name: &str, namespace: &str, id: &str, created_ms: u64) -> DevWorkspaceResource {
    DevWorkspaceResource {
        kind: "DevWorkspace".to_string(),
        metadata: DevWorkspaceMetadata {
            name: name.to_string(),
            namespace: namespace.to_string(),
            uid: format!("uid-{}", name),
            creation_epoch_ms: created_ms,
            ..Default::default()
        },
        status: Some(DevWorkspaceStatus {
            phase: "Stopped".to_string(),
            devworkspace_id: id.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn populated() -> StoreState {
    let mut state = StoreState::default();
    state.legacy.workspaces = vec![
        legacy("ws-1", "beta", "zulu", 100),
        legacy("ws-2", "alpha", "yankee", 300),
    ];
    state.dev.workspaces = vec![dev("xray", "alpha", "dw-1", 200)];
    state
}

#[test]
fn all_workspaces_concatenates_both_backends() {
    let state = populated();
    let all = all_workspaces(&state);
    assert_eq!(all.len(), 3);
    assert!(all.iter().filter(|w| w.is_dev_workspace()).count() == 1);
}

#[test]
fn find_by_id_spans_backends() {
    let state = populated();
    assert!(find_by_id(&state, "ws-2").is_some());
    assert!(find_by_id(&state, "dw-1").is_some());
    assert!(find_by_id(&state, "nope").is_none());
}

#[test]
fn find_by_qualified_name_spans_backends() {
    let state = populated();
    let found = find_by_qualified_name(&state, "alpha", "xray").unwrap();
    assert!(found.is_dev_workspace());
    assert!(find_by_qualified_name(&state, "alpha", "zulu").is_none());
}

#[test]
fn sort_by_namespace_then_name() {
    let state = populated();
    let sorted = sorted_by_namespace_then_name(&state);
    let keys: Vec<String> = sorted.iter().map(|w| w.qualified_name()).collect();
    assert_eq!(keys, ["alpha/xray", "alpha/yankee", "beta/zulu"]);
}

#[test]
fn sort_by_recency_puts_newest_first() {
    let state = populated();
    let sorted = sorted_by_recency(&state);
    let ids: Vec<&str> = sorted.iter().filter_map(|w| w.id()).collect();
    assert_eq!(ids, ["ws-2", "dw-1", "ws-1"]);
}

#[test]
fn merged_logs_union_and_append_order() {
    let mut state = StoreState::default();
    state.legacy.append_log("ws-1", "legacy line 1");
    state.legacy.append_log("ws-1", "legacy line 2");
    state.dev.append_log("ws-1", "dev line");
    state.dev.append_log("dw-only", "solo");

    let merged = merged_logs(&state);
    assert_eq!(
        merged.get("ws-1").map(Vec::as_slice),
        Some(["legacy line 1", "legacy line 2", "dev line"].map(String::from).as_slice())
    );
    assert_eq!(merged.get("dw-only").map(Vec::len), Some(1));

    assert_eq!(logs_for(&state, "ws-1").len(), 3);
    assert!(logs_for(&state, "absent").is_empty());
}
