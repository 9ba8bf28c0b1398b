// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Merge selectors over the dual-backend store.
//!
//! Read-only views concatenating both collections into one list of
//! polymorphic [`Workspace`] values. Log maps merge by union of keys with
//! append-only concatenation.

use super::StoreState;
use berth_core::Workspace;
use std::collections::HashMap;

/// Unified workspace list: legacy records first, then DevWorkspace resources.
pub fn all_workspaces(state: &StoreState) -> Vec<Workspace> {
    let mut all: Vec<Workspace> = state
        .legacy
        .workspaces
        .iter()
        .cloned()
        .map(Workspace::Legacy)
        .collect();
    all.extend(
        state
            .dev
            .workspaces
            .iter()
            .cloned()
            .map(Workspace::DevWorkspace),
    );
    all
}

/// Look up a workspace by its backend-assigned id.
pub fn find_by_id(state: &StoreState, id: &str) -> Option<Workspace> {
    all_workspaces(state)
        .into_iter()
        .find(|w| w.id() == Some(id))
}

/// Look up a workspace by `namespace` + `name`.
pub fn find_by_qualified_name(state: &StoreState, namespace: &str, name: &str) -> Option<Workspace> {
    all_workspaces(state)
        .into_iter()
        .find(|w| w.namespace() == namespace && w.name() == name)
}

/// Unified list sorted by namespace, then name.
pub fn sorted_by_namespace_then_name(state: &StoreState) -> Vec<Workspace> {
    let mut all = all_workspaces(state);
    all.sort_by(|a, b| {
        a.namespace()
            .cmp(b.namespace())
            .then_with(|| a.name().cmp(b.name()))
    });
    all
}

/// Unified list sorted most recently updated first. A missing recency stamp
/// sorts last.
pub fn sorted_by_recency(state: &StoreState) -> Vec<Workspace> {
    let mut all = all_workspaces(state);
    all.sort_by(|a, b| b.updated_epoch_ms().cmp(&a.updated_epoch_ms()));
    all
}

/// Merged log map: union of keys, lines concatenated in append order.
pub fn merged_logs(state: &StoreState) -> HashMap<String, Vec<String>> {
    let mut merged: HashMap<String, Vec<String>> = HashMap::new();
    for (id, lines) in &state.legacy.logs {
        merged.entry(id.clone()).or_default().extend(lines.iter().cloned());
    }
    for (id, lines) in &state.dev.logs {
        merged.entry(id.clone()).or_default().extend(lines.iter().cloned());
    }
    merged
}

/// Log lines for one workspace id across both backends.
pub fn logs_for(state: &StoreState, id: &str) -> Vec<String> {
    let mut lines = state.legacy.logs.get(id).cloned().unwrap_or_default();
    if let Some(dev_lines) = state.dev.logs.get(id) {
        lines.extend(dev_lines.iter().cloned());
    }
    lines
}

#[cfg(test)]
#[path = "selectors_tests.rs"]
mod tests;
