// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Legacy REST backend contract.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLegacyApi, LegacyCall};

use crate::error::ClientError;
use async_trait::async_trait;
use berth_core::{Devfile, LegacyWorkspace};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters for workspace creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateParams {
    /// Attributes persisted on the created workspace (stackName, factory
    /// parameters, deployment labels/annotations).
    pub attributes: IndexMap<String, String>,
    pub namespace: Option<String>,
    pub infrastructure_namespace: Option<String>,
}

/// Parameters for a start call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartParams {
    /// Start in verbose mode, streaming provisioning logs.
    pub debug_workspace_start: bool,
}

/// Result of resolving a factory URL into a devfile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactoryResolverResult {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub devfile: Devfile,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub optional_files_content: IndexMap<String, String>,
}

/// Server-side workspace settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Cluster-configured security context constraint; a mismatch with a
    /// workspace's requested SCC is a warning, not an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context_constraint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_storage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_storage_types: Vec<String>,
}

/// An infrastructure (Kubernetes) namespace available to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfraNamespace {
    pub name: String,
    /// False until the cluster has provisioned the namespace.
    pub provisioned: bool,
}

/// Failure of a factory-resolver call.
///
/// OAuth is a distinct branch, not an error to surface: the loader redirects
/// to the provider instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolverError {
    #[error("authentication required via {provider}")]
    OAuthRequired {
        provider: String,
        authentication_url: String,
    },
    #[error(transparent)]
    Api(#[from] ClientError),
}

/// REST client for the legacy workspace backend.
#[async_trait]
pub trait LegacyApiClient: Send + Sync + 'static {
    async fn get_all(&self) -> Result<Vec<LegacyWorkspace>, ClientError>;

    async fn get_by_id(&self, id: &str) -> Result<LegacyWorkspace, ClientError>;

    async fn create(
        &self,
        devfile: Devfile,
        params: CreateParams,
    ) -> Result<LegacyWorkspace, ClientError>;

    async fn start(
        &self,
        id: &str,
        params: Option<StartParams>,
    ) -> Result<LegacyWorkspace, ClientError>;

    async fn stop(&self, id: &str) -> Result<(), ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;

    async fn update(
        &self,
        id: &str,
        workspace: LegacyWorkspace,
    ) -> Result<LegacyWorkspace, ClientError>;

    async fn get_settings(&self) -> Result<WorkspaceSettings, ClientError>;

    async fn get_factory_resolver(
        &self,
        location: &str,
        overrides: &IndexMap<String, String>,
    ) -> Result<FactoryResolverResult, ResolverError>;

    async fn get_infrastructure_namespaces(&self) -> Result<Vec<InfraNamespace>, ClientError>;
}
