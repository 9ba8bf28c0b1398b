// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DevWorkspace status polling.
//!
//! The custom-resource backend has no push channel yet; a fixed-interval
//! tick lists the namespace and diffs observed phases into synthesized
//! status transitions. The interval comes from configuration rather than a
//! hard-coded 1-second tick.

use crate::store::StoreState;
use berth_clients::DevWorkspaceClient;
use berth_core::{DevWorkspaceResource, StatusTransition, WorkspaceStatus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Diff a fresh listing against the previously observed phases.
///
/// Replaces the dev slice's collection with the listing and returns one
/// transition per workspace whose canonical status changed. A status message
/// line is recorded only when the workspace already has an assigned id, the
/// message differs from the last one seen for that id, and the status is not
/// the transient `STOPPED`/`STOPPING` noise of the initial-provisioning path.
pub fn reconcile_listing(
    state: &mut StoreState,
    listing: Vec<DevWorkspaceResource>,
) -> Vec<StatusTransition> {
    let previous: HashMap<String, WorkspaceStatus> = state
        .dev
        .workspaces
        .iter()
        .filter_map(|r| {
            let key = resource_key(r);
            WorkspaceStatus::parse(r.phase()).map(|status| (key, status))
        })
        .collect();

    let mut transitions = Vec::new();
    for resource in &listing {
        let Some(status) = WorkspaceStatus::parse(resource.phase()) else {
            continue;
        };
        let prev_status = previous.get(&resource_key(resource)).copied();
        record_message(state, resource, status, prev_status);
        if prev_status == Some(status) {
            continue;
        }
        if let Some(id) = resource.devworkspace_id() {
            transitions.push(StatusTransition {
                workspace_id: id.to_string(),
                status,
                prev_status,
                message: resource.status.as_ref().and_then(|s| s.message.clone()),
            });
        }
    }

    state.dev.workspaces = listing;
    transitions
}

fn resource_key(resource: &DevWorkspaceResource) -> String {
    format!("{}/{}", resource.metadata.namespace, resource.metadata.name)
}

fn record_message(
    state: &mut StoreState,
    resource: &DevWorkspaceResource,
    status: WorkspaceStatus,
    prev_status: Option<WorkspaceStatus>,
) {
    let Some(id) = resource.devworkspace_id() else {
        return;
    };
    let Some(message) = resource
        .status
        .as_ref()
        .and_then(|s| s.message.as_deref())
        .filter(|m| !m.is_empty())
    else {
        return;
    };
    if state.dev.last_messages.get(id).map(String::as_str) == Some(message) {
        return;
    }
    // Freshly provisioned resources pass through STOPPED/STOPPING before the
    // first start; logging those would read as a spurious stop.
    let initial_provisioning = prev_status.is_none();
    if initial_provisioning
        && matches!(status, WorkspaceStatus::Stopped | WorkspaceStatus::Stopping)
    {
        return;
    }
    let id = id.to_string();
    state.dev.last_messages.insert(id.clone(), message.to_string());
    state.dev.append_log(&id, message);
}

/// Interval poller for DevWorkspace status.
pub struct DevWorkspacePoller<C> {
    client: Arc<C>,
    state: Arc<Mutex<StoreState>>,
    interval: Duration,
}

impl<C: DevWorkspaceClient> DevWorkspacePoller<C> {
    pub fn new(client: Arc<C>, state: Arc<Mutex<StoreState>>, interval: Duration) -> Self {
        Self {
            client,
            state,
            interval,
        }
    }

    /// Spawn the poll loop for a namespace.
    ///
    /// The returned handle aborts the task on stop or drop, so no tick can
    /// fire against a torn-down consumer.
    pub fn spawn(self, namespace: impl Into<String>) -> PollerHandle {
        let namespace = namespace.into();
        let task = tokio::spawn(async move {
            let mut tick = tokio::time::interval(self.interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                match self.client.list_in_namespace(&namespace).await {
                    Ok(listing) => {
                        let transitions = {
                            let mut state = self.state.lock();
                            reconcile_listing(&mut state, listing)
                        };
                        for transition in &transitions {
                            tracing::debug!(
                                workspace_id = %transition.workspace_id,
                                status = %transition.status,
                                prev_status = ?transition.prev_status,
                                "devworkspace status changed"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::warn!(namespace = %namespace, error = %e, "devworkspace poll failed");
                    }
                }
            }
        });
        PollerHandle { task }
    }
}

/// Handle owning the poll task; aborts it on stop or drop.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
