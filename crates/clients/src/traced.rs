// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced client wrappers for consistent observability

use crate::devworkspace::DevWorkspaceClient;
use crate::error::ClientError;
use crate::legacy::{
    CreateParams, FactoryResolverResult, InfraNamespace, LegacyApiClient, ResolverError,
    StartParams, WorkspaceSettings,
};
use async_trait::async_trait;
use berth_core::{Devfile, DevWorkspaceResource, LegacyWorkspace};
use indexmap::IndexMap;
use tracing::Instrument;

/// Wrapper that adds tracing to any LegacyApiClient
#[derive(Clone)]
pub struct TracedLegacyApi<C> {
    inner: C,
}

impl<C> TracedLegacyApi<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: LegacyApiClient> LegacyApiClient for TracedLegacyApi<C> {
    async fn get_all(&self) -> Result<Vec<LegacyWorkspace>, ClientError> {
        let result = self.inner.get_all().await;
        match &result {
            Ok(list) => tracing::debug!(count = list.len(), "workspaces listed"),
            Err(e) => tracing::error!(error = %e, "get_all failed"),
        }
        result
    }

    async fn get_by_id(&self, id: &str) -> Result<LegacyWorkspace, ClientError> {
        let result = self.inner.get_by_id(id).await;
        if let Err(ref e) = result {
            tracing::error!(workspace_id = id, error = %e, "get_by_id failed");
        }
        result
    }

    async fn create(
        &self,
        devfile: Devfile,
        params: CreateParams,
    ) -> Result<LegacyWorkspace, ClientError> {
        let name = devfile.name().to_string();
        async {
            tracing::info!("creating workspace");
            let start = std::time::Instant::now();
            let result = self.inner.create(devfile, params).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(ws) => tracing::info!(workspace_id = %ws.id, elapsed_ms, "workspace created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(tracing::info_span!("workspace.create", name))
        .await
    }

    async fn start(
        &self,
        id: &str,
        params: Option<StartParams>,
    ) -> Result<LegacyWorkspace, ClientError> {
        let debug_flag = params.map(|p| p.debug_workspace_start).unwrap_or(false);
        async {
            let start = std::time::Instant::now();
            let result = self.inner.start(id, params).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(_) => tracing::info!(elapsed_ms, "start issued"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }
            result
        }
        .instrument(tracing::info_span!("workspace.start", workspace_id = id, debug = debug_flag))
        .await
    }

    async fn stop(&self, id: &str) -> Result<(), ClientError> {
        let result = self.inner.stop(id).await;
        tracing::info_span!("workspace.stop", workspace_id = id).in_scope(|| match &result {
            Ok(()) => tracing::info!("stop issued"),
            Err(e) => tracing::error!(error = %e, "stop failed"),
        });
        result
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let result = self.inner.delete(id).await;
        tracing::info_span!("workspace.delete", workspace_id = id).in_scope(|| match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(e) => tracing::warn!(error = %e, "delete failed"),
        });
        result
    }

    async fn update(
        &self,
        id: &str,
        workspace: LegacyWorkspace,
    ) -> Result<LegacyWorkspace, ClientError> {
        let result = self.inner.update(id, workspace).await;
        if let Err(ref e) = result {
            tracing::error!(workspace_id = id, error = %e, "update failed");
        }
        result
    }

    async fn get_settings(&self) -> Result<WorkspaceSettings, ClientError> {
        let result = self.inner.get_settings().await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "get_settings failed");
        }
        result
    }

    async fn get_factory_resolver(
        &self,
        location: &str,
        overrides: &IndexMap<String, String>,
    ) -> Result<FactoryResolverResult, ResolverError> {
        async {
            tracing::info!(override_count = overrides.len(), "resolving");
            let start = std::time::Instant::now();
            let result = self.inner.get_factory_resolver(location, overrides).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(r) => tracing::info!(elapsed_ms, devfile = r.devfile.name(), "resolved"),
                Err(ResolverError::OAuthRequired { provider, .. }) => {
                    tracing::info!(elapsed_ms, provider, "authentication required")
                }
                Err(e) => tracing::error!(elapsed_ms, error = %e, "resolve failed"),
            }
            result
        }
        .instrument(tracing::info_span!("factory.resolve", location))
        .await
    }

    async fn get_infrastructure_namespaces(&self) -> Result<Vec<InfraNamespace>, ClientError> {
        let result = self.inner.get_infrastructure_namespaces().await;
        if let Err(ref e) = result {
            tracing::error!(error = %e, "get_infrastructure_namespaces failed");
        }
        result
    }
}

/// Wrapper that adds tracing to any DevWorkspaceClient
#[derive(Clone)]
pub struct TracedDevWorkspaceClient<C> {
    inner: C,
}

impl<C> TracedDevWorkspaceClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: DevWorkspaceClient> DevWorkspaceClient for TracedDevWorkspaceClient<C> {
    async fn list_in_namespace(
        &self,
        namespace: &str,
    ) -> Result<Vec<DevWorkspaceResource>, ClientError> {
        let result = self.inner.list_in_namespace(namespace).await;
        match &result {
            Ok(list) => tracing::trace!(namespace, count = list.len(), "listed"),
            Err(e) => tracing::warn!(namespace, error = %e, "list failed"),
        }
        result
    }

    async fn get_by_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DevWorkspaceResource, ClientError> {
        let result = self.inner.get_by_name(namespace, name).await;
        if let Err(ref e) = result {
            tracing::error!(namespace, name, error = %e, "get_by_name failed");
        }
        result
    }

    async fn create(
        &self,
        resource: DevWorkspaceResource,
        plugins: &[String],
    ) -> Result<DevWorkspaceResource, ClientError> {
        let name = resource.metadata.name.clone();
        async {
            let start = std::time::Instant::now();
            let result = self.inner.create(resource, plugins).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(r) => tracing::info!(uid = %r.metadata.uid, elapsed_ms, "created"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(tracing::info_span!("devworkspace.create", name))
        .await
    }

    async fn update(
        &self,
        resource: DevWorkspaceResource,
    ) -> Result<DevWorkspaceResource, ClientError> {
        let name = resource.metadata.name.clone();
        let result = self.inner.update(resource).await;
        if let Err(ref e) = result {
            tracing::error!(name, error = %e, "update failed");
        }
        result
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ClientError> {
        let result = self.inner.delete(namespace, name).await;
        tracing::info_span!("devworkspace.delete", namespace, name).in_scope(|| match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(e) => tracing::warn!(error = %e, "delete failed"),
        });
        result
    }

    async fn change_status(
        &self,
        namespace: &str,
        name: &str,
        started: bool,
    ) -> Result<DevWorkspaceResource, ClientError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.change_status(namespace, name, started).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(r) => tracing::info!(phase = r.phase(), elapsed_ms, "status changed"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "change_status failed"),
            }
            result
        }
        .instrument(tracing::info_span!("devworkspace.change_status", namespace, name, started))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
