// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake legacy REST client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{
    CreateParams, FactoryResolverResult, InfraNamespace, LegacyApiClient, ResolverError,
    StartParams, WorkspaceSettings,
};
use crate::error::ClientError;
use async_trait::async_trait;
use berth_core::{Devfile, LegacyWorkspace};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded API call
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyCall {
    GetAll,
    GetById { id: String },
    Create { name: String },
    Start { id: String, debug: bool },
    Stop { id: String },
    Delete { id: String },
    Update { id: String },
    GetSettings,
    Resolve { location: String },
    GetInfraNamespaces,
}

#[derive(Default)]
struct FakeLegacyState {
    workspaces: Vec<LegacyWorkspace>,
    settings: WorkspaceSettings,
    infra_namespaces: Vec<InfraNamespace>,
    resolver_result: Option<Result<FactoryResolverResult, ResolverError>>,
    calls: Vec<LegacyCall>,
    next_id: u64,
    fail_start: Option<ClientError>,
    fail_stop: Option<ClientError>,
    fail_delete: Option<ClientError>,
    fail_create: Option<ClientError>,
    fail_get_all: Option<ClientError>,
}

/// Fake legacy REST client for testing
#[derive(Clone, Default)]
pub struct FakeLegacyApi {
    inner: Arc<Mutex<FakeLegacyState>>,
}

impl FakeLegacyApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LegacyCall> {
        self.inner.lock().calls.clone()
    }

    /// Count calls matching a predicate
    pub fn count_calls(&self, predicate: impl Fn(&LegacyCall) -> bool) -> usize {
        self.inner.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Seed a workspace record
    pub fn add_workspace(&self, workspace: LegacyWorkspace) {
        self.inner.lock().workspaces.push(workspace);
    }

    /// Overwrite the status of a seeded workspace
    pub fn set_status(&self, id: &str, status: &str) {
        let mut inner = self.inner.lock();
        if let Some(ws) = inner.workspaces.iter_mut().find(|w| w.id == id) {
            ws.status = status.to_string();
        }
    }

    pub fn get_workspace(&self, id: &str) -> Option<LegacyWorkspace> {
        self.inner.lock().workspaces.iter().find(|w| w.id == id).cloned()
    }

    pub fn set_settings(&self, settings: WorkspaceSettings) {
        self.inner.lock().settings = settings;
    }

    pub fn set_infra_namespaces(&self, namespaces: Vec<InfraNamespace>) {
        self.inner.lock().infra_namespaces = namespaces;
    }

    /// Script the next resolver response
    pub fn set_resolver_result(&self, result: Result<FactoryResolverResult, ResolverError>) {
        self.inner.lock().resolver_result = Some(result);
    }

    pub fn fail_start_with(&self, error: ClientError) {
        self.inner.lock().fail_start = Some(error);
    }

    pub fn fail_stop_with(&self, error: ClientError) {
        self.inner.lock().fail_stop = Some(error);
    }

    pub fn fail_delete_with(&self, error: ClientError) {
        self.inner.lock().fail_delete = Some(error);
    }

    pub fn fail_create_with(&self, error: ClientError) {
        self.inner.lock().fail_create = Some(error);
    }

    pub fn fail_get_all_with(&self, error: ClientError) {
        self.inner.lock().fail_get_all = Some(error);
    }
}

#[async_trait]
impl LegacyApiClient for FakeLegacyApi {
    async fn get_all(&self) -> Result<Vec<LegacyWorkspace>, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::GetAll);
        if let Some(error) = inner.fail_get_all.take() {
            return Err(error);
        }
        Ok(inner.workspaces.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<LegacyWorkspace, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::GetById { id: id.to_string() });
        inner
            .workspaces
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| ClientError::response(404, "Not Found"))
    }

    async fn create(
        &self,
        devfile: Devfile,
        params: CreateParams,
    ) -> Result<LegacyWorkspace, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::Create {
            name: devfile.name().to_string(),
        });
        if let Some(error) = inner.fail_create.take() {
            return Err(error);
        }

        inner.next_id += 1;
        let workspace = LegacyWorkspace {
            id: format!("workspace-{}", inner.next_id),
            status: "STOPPED".to_string(),
            namespace: params.namespace.unwrap_or_else(|| "che".to_string()),
            devfile,
            attributes: params.attributes,
            runtime: None,
        };
        inner.workspaces.push(workspace.clone());
        Ok(workspace)
    }

    async fn start(
        &self,
        id: &str,
        params: Option<StartParams>,
    ) -> Result<LegacyWorkspace, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::Start {
            id: id.to_string(),
            debug: params.map(|p| p.debug_workspace_start).unwrap_or(false),
        });
        if let Some(error) = inner.fail_start.take() {
            return Err(error);
        }
        let workspace = inner.workspaces.iter_mut().find(|w| w.id == id);
        match workspace {
            Some(ws) => {
                ws.status = "STARTING".to_string();
                Ok(ws.clone())
            }
            None => Err(ClientError::response(404, "Not Found")),
        }
    }

    async fn stop(&self, id: &str) -> Result<(), ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::Stop { id: id.to_string() });
        if let Some(error) = inner.fail_stop.take() {
            return Err(error);
        }
        if let Some(ws) = inner.workspaces.iter_mut().find(|w| w.id == id) {
            ws.status = "STOPPING".to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::Delete { id: id.to_string() });
        if let Some(error) = inner.fail_delete.take() {
            return Err(error);
        }
        inner.workspaces.retain(|w| w.id != id);
        Ok(())
    }

    async fn update(
        &self,
        id: &str,
        workspace: LegacyWorkspace,
    ) -> Result<LegacyWorkspace, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::Update { id: id.to_string() });
        match inner.workspaces.iter_mut().find(|w| w.id == id) {
            Some(slot) => {
                *slot = workspace.clone();
                Ok(workspace)
            }
            None => Err(ClientError::response(404, "Not Found")),
        }
    }

    async fn get_settings(&self) -> Result<WorkspaceSettings, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::GetSettings);
        Ok(inner.settings.clone())
    }

    async fn get_factory_resolver(
        &self,
        location: &str,
        _overrides: &IndexMap<String, String>,
    ) -> Result<FactoryResolverResult, ResolverError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::Resolve {
            location: location.to_string(),
        });
        match inner.resolver_result.clone() {
            Some(result) => result,
            None => Err(ResolverError::Api(ClientError::response(404, "Not Found"))),
        }
    }

    async fn get_infrastructure_namespaces(&self) -> Result<Vec<InfraNamespace>, ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(LegacyCall::GetInfraNamespaces);
        Ok(inner.infra_namespaces.clone())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
