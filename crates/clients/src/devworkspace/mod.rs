// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DevWorkspace custom-resource API contract.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DevWorkspaceCall, FakeDevWorkspaceClient};

use crate::error::ClientError;
use async_trait::async_trait;
use berth_core::DevWorkspaceResource;

/// Client for the DevWorkspace control plane.
///
/// There is no push channel on this backend; callers poll
/// [`DevWorkspaceClient::list_in_namespace`] and diff phases.
#[async_trait]
pub trait DevWorkspaceClient: Send + Sync + 'static {
    async fn list_in_namespace(
        &self,
        namespace: &str,
    ) -> Result<Vec<DevWorkspaceResource>, ClientError>;

    async fn get_by_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DevWorkspaceResource, ClientError>;

    /// Create the resource with the given editor/plugin ids applied.
    async fn create(
        &self,
        resource: DevWorkspaceResource,
        plugins: &[String],
    ) -> Result<DevWorkspaceResource, ClientError>;

    async fn update(
        &self,
        resource: DevWorkspaceResource,
    ) -> Result<DevWorkspaceResource, ClientError>;

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), ClientError>;

    /// Flip `spec.started`; the control plane drives the phase from there.
    async fn change_status(
        &self,
        namespace: &str,
        name: &str,
        started: bool,
    ) -> Result<DevWorkspaceResource, ClientError>;
}
