// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake DevWorkspace client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::DevWorkspaceClient;
use crate::error::ClientError;
use async_trait::async_trait;
use berth_core::devworkspace::{Condition, DevWorkspaceStatus};
use berth_core::DevWorkspaceResource;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum DevWorkspaceCall {
    List { namespace: String },
    GetByName { namespace: String, name: String },
    Create { name: String, plugins: Vec<String> },
    Update { name: String },
    Delete { namespace: String, name: String },
    ChangeStatus { namespace: String, name: String, started: bool },
}

#[derive(Default)]
struct FakeDevWorkspaceState {
    resources: Vec<DevWorkspaceResource>,
    calls: Vec<DevWorkspaceCall>,
    next_uid: u64,
    fail_change_status: Option<ClientError>,
    fail_list: Option<ClientError>,
}

/// Fake DevWorkspace client for testing
#[derive(Clone, Default)]
pub struct FakeDevWorkspaceClient {
    inner: Arc<Mutex<FakeDevWorkspaceState>>,
}

impl FakeDevWorkspaceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DevWorkspaceCall> {
        self.inner.lock().calls.clone()
    }

    /// Seed a resource
    pub fn add_resource(&self, resource: DevWorkspaceResource) {
        self.inner.lock().resources.push(resource);
    }

    pub fn get_resource(&self, namespace: &str, name: &str) -> Option<DevWorkspaceResource> {
        self.inner
            .lock()
            .resources
            .iter()
            .find(|r| r.metadata.namespace == namespace && r.metadata.name == name)
            .cloned()
    }

    /// Overwrite the observed phase of a seeded resource
    pub fn set_phase(&self, namespace: &str, name: &str, phase: &str) {
        let mut inner = self.inner.lock();
        if let Some(resource) = inner
            .resources
            .iter_mut()
            .find(|r| r.metadata.namespace == namespace && r.metadata.name == name)
        {
            let status = resource.status.get_or_insert_with(DevWorkspaceStatus::default);
            status.phase = phase.to_string();
        }
    }

    /// Overwrite the status message of a seeded resource
    pub fn set_message(&self, namespace: &str, name: &str, message: &str) {
        let mut inner = self.inner.lock();
        if let Some(resource) = inner
            .resources
            .iter_mut()
            .find(|r| r.metadata.namespace == namespace && r.metadata.name == name)
        {
            let status = resource.status.get_or_insert_with(DevWorkspaceStatus::default);
            status.message = Some(message.to_string());
        }
    }

    /// Overwrite the conditions of a seeded resource
    pub fn set_conditions(&self, namespace: &str, name: &str, conditions: Vec<Condition>) {
        let mut inner = self.inner.lock();
        if let Some(resource) = inner
            .resources
            .iter_mut()
            .find(|r| r.metadata.namespace == namespace && r.metadata.name == name)
        {
            let status = resource.status.get_or_insert_with(DevWorkspaceStatus::default);
            status.conditions = conditions;
        }
    }

    pub fn fail_change_status_with(&self, error: ClientError) {
        self.inner.lock().fail_change_status = Some(error);
    }

    pub fn fail_list_with(&self, error: ClientError) {
        self.inner.lock().fail_list = Some(error);
    }
}

#[async_trait]
impl DevWorkspaceClient for FakeDevWorkspaceClient {
    async fn list_in_namespace(
        &self,
        namespace: &str,
    ) -> Result<Vec<DevWorkspaceResource>, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DevWorkspaceCall::List {
            namespace: namespace.to_string(),
        });
        if let Some(error) = inner.fail_list.take() {
            return Err(error);
        }
        Ok(inner
            .resources
            .iter()
            .filter(|r| r.metadata.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn get_by_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DevWorkspaceResource, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DevWorkspaceCall::GetByName {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        inner
            .resources
            .iter()
            .find(|r| r.metadata.namespace == namespace && r.metadata.name == name)
            .cloned()
            .ok_or_else(|| ClientError::response(404, "Not Found"))
    }

    async fn create(
        &self,
        mut resource: DevWorkspaceResource,
        plugins: &[String],
    ) -> Result<DevWorkspaceResource, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DevWorkspaceCall::Create {
            name: resource.metadata.name.clone(),
            plugins: plugins.to_vec(),
        });

        inner.next_uid += 1;
        resource.metadata.uid = format!("uid-{}", inner.next_uid);
        let status = resource.status.get_or_insert_with(DevWorkspaceStatus::default);
        status.devworkspace_id = format!("workspace{:010}", inner.next_uid);
        if status.phase.is_empty() {
            status.phase = "Stopped".to_string();
        }
        inner.resources.push(resource.clone());
        Ok(resource)
    }

    async fn update(
        &self,
        resource: DevWorkspaceResource,
    ) -> Result<DevWorkspaceResource, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DevWorkspaceCall::Update {
            name: resource.metadata.name.clone(),
        });
        let slot = inner.resources.iter_mut().find(|r| {
            r.metadata.namespace == resource.metadata.namespace
                && r.metadata.name == resource.metadata.name
        });
        match slot {
            Some(existing) => {
                *existing = resource.clone();
                Ok(resource)
            }
            None => Err(ClientError::response(404, "Not Found")),
        }
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DevWorkspaceCall::Delete {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        inner
            .resources
            .retain(|r| !(r.metadata.namespace == namespace && r.metadata.name == name));
        Ok(())
    }

    async fn change_status(
        &self,
        namespace: &str,
        name: &str,
        started: bool,
    ) -> Result<DevWorkspaceResource, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DevWorkspaceCall::ChangeStatus {
            namespace: namespace.to_string(),
            name: name.to_string(),
            started,
        });
        if let Some(error) = inner.fail_change_status.take() {
            return Err(error);
        }
        let slot = inner
            .resources
            .iter_mut()
            .find(|r| r.metadata.namespace == namespace && r.metadata.name == name);
        match slot {
            Some(resource) => {
                resource.spec.started = started;
                let status = resource.status.get_or_insert_with(DevWorkspaceStatus::default);
                status.phase = if started { "Starting" } else { "Stopping" }.to_string();
                Ok(resource.clone())
            }
            None => Err(ClientError::response(404, "Not Found")),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
