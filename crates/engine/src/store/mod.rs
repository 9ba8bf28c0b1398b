// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dual-backend workspace store.
//!
//! Two sub-stores (legacy REST, DevWorkspace custom resources) share one
//! `StoreState` behind a single mutex. Every backend call follows the same
//! discipline: mark the request, issue the call, apply a receive or error
//! transition. The merge selectors expose one unified read-only view.

mod devworkspace;
mod legacy;
pub mod selectors;

pub use devworkspace::DevWorkspaceStore;
pub use legacy::LegacyStore;

use crate::error::EngineError;
use async_trait::async_trait;
use berth_clients::{DevWorkspaceClient, LegacyApiClient, WorkspaceSettings};
use berth_core::{DevWorkspaceResource, LegacyWorkspace, Workspace, WorkspaceStatus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Legacy sub-store slice.
#[derive(Debug, Default)]
pub struct LegacySlice {
    pub is_loading: bool,
    pub workspaces: Vec<LegacyWorkspace>,
    pub settings: WorkspaceSettings,
    /// Runtime log lines per workspace id, append-only.
    pub logs: HashMap<String, Vec<String>>,
    pub last_error: Option<String>,
}

impl LegacySlice {
    pub fn upsert(&mut self, workspace: LegacyWorkspace) {
        match self.workspaces.iter_mut().find(|w| w.id == workspace.id) {
            Some(slot) => *slot = workspace,
            None => self.workspaces.push(workspace),
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.workspaces.retain(|w| w.id != id);
    }

    pub fn get(&self, id: &str) -> Option<&LegacyWorkspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    /// Apply an out-of-band status update. The caller has already translated
    /// the phase string; unknown phases never reach this point.
    pub fn apply_status(&mut self, id: &str, status: WorkspaceStatus) {
        if let Some(ws) = self.workspaces.iter_mut().find(|w| w.id == id) {
            ws.status = status.as_phase().to_string();
        }
    }

    pub fn append_log(&mut self, id: &str, line: impl Into<String>) {
        self.logs.entry(id.to_string()).or_default().push(line.into());
    }

    pub fn clear_logs(&mut self, id: &str) {
        self.logs.remove(id);
    }
}

/// DevWorkspace sub-store slice.
#[derive(Debug, Default)]
pub struct DevSlice {
    pub is_loading: bool,
    pub workspaces: Vec<DevWorkspaceResource>,
    /// Status message lines per devworkspace id, append-only.
    pub logs: HashMap<String, Vec<String>>,
    /// Last recorded status message per devworkspace id, for dedup.
    pub last_messages: HashMap<String, String>,
    pub last_error: Option<String>,
}

impl DevSlice {
    pub fn upsert(&mut self, resource: DevWorkspaceResource) {
        let slot = self.workspaces.iter_mut().find(|r| {
            r.metadata.namespace == resource.metadata.namespace
                && r.metadata.name == resource.metadata.name
        });
        match slot {
            Some(existing) => *existing = resource,
            None => self.workspaces.push(resource),
        }
    }

    pub fn remove(&mut self, namespace: &str, name: &str) {
        self.workspaces
            .retain(|r| !(r.metadata.namespace == namespace && r.metadata.name == name));
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&DevWorkspaceResource> {
        self.workspaces
            .iter()
            .find(|r| r.metadata.namespace == namespace && r.metadata.name == name)
    }

    pub fn append_log(&mut self, id: &str, line: impl Into<String>) {
        self.logs.entry(id.to_string()).or_default().push(line.into());
    }
}

/// Shared state of both sub-stores.
#[derive(Debug, Default)]
pub struct StoreState {
    pub legacy: LegacySlice,
    pub dev: DevSlice,
}

/// Facade over the two sub-stores sharing one state.
pub struct DualStore<L, D> {
    state: Arc<Mutex<StoreState>>,
    pub legacy: LegacyStore<L>,
    pub dev: DevWorkspaceStore<D>,
}

impl<L: LegacyApiClient, D: DevWorkspaceClient> DualStore<L, D> {
    pub fn new(legacy_client: Arc<L>, dev_client: Arc<D>) -> Self {
        let state = Arc::new(Mutex::new(StoreState::default()));
        Self {
            legacy: LegacyStore::new(Arc::clone(&state), legacy_client),
            dev: DevWorkspaceStore::new(Arc::clone(&state), dev_client),
            state,
        }
    }

    /// Shared state handle, for reconciliation tasks.
    pub fn state(&self) -> Arc<Mutex<StoreState>> {
        Arc::clone(&self.state)
    }

    /// Helper to lock state for reading
    pub fn lock_state<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
        let guard = self.state.lock();
        f(&guard)
    }

    /// Helper to lock state for mutation
    pub fn lock_state_mut<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut guard = self.state.lock();
        f(&mut guard)
    }

    /// Unified workspace list across both backends.
    pub fn all_workspaces(&self) -> Vec<Workspace> {
        self.lock_state(selectors::all_workspaces)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Workspace> {
        self.lock_state(|state| selectors::find_by_id(state, id))
    }

    pub fn find_by_qualified_name(&self, namespace: &str, name: &str) -> Option<Workspace> {
        self.lock_state(|state| selectors::find_by_qualified_name(state, namespace, name))
    }

    /// Merged log map across both backends.
    pub fn merged_logs(&self) -> HashMap<String, Vec<String>> {
        self.lock_state(selectors::merged_logs)
    }

    pub fn settings(&self) -> WorkspaceSettings {
        self.lock_state(|state| state.legacy.settings.clone())
    }
}

/// Narrow start/stop seam consumed by the starting-workspace step.
///
/// Implemented by [`DualStore`]; tests substitute a recording fake.
#[async_trait]
pub trait WorkspaceControl: Send + Sync {
    async fn start_workspace(&self, workspace: &Workspace) -> Result<(), EngineError>;
    async fn stop_workspace(&self, workspace: &Workspace) -> Result<(), EngineError>;
}

#[async_trait]
impl<L: LegacyApiClient, D: DevWorkspaceClient> WorkspaceControl for DualStore<L, D> {
    async fn start_workspace(&self, workspace: &Workspace) -> Result<(), EngineError> {
        match workspace {
            Workspace::Legacy(w) => self.legacy.start(&w.id, None).await,
            Workspace::DevWorkspace(r) => {
                self.dev.start(&r.metadata.namespace, &r.metadata.name).await
            }
        }
    }

    async fn stop_workspace(&self, workspace: &Workspace) -> Result<(), EngineError> {
        match workspace {
            Workspace::Legacy(w) => self.legacy.stop(&w.id).await,
            Workspace::DevWorkspace(r) => {
                self.dev.stop(&r.metadata.namespace, &r.metadata.name).await
            }
        }
    }
}
