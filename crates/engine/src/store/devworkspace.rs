// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DevWorkspace sub-store: actions against the custom-resource backend.

use super::StoreState;
use crate::error::EngineError;
use berth_clients::{ClientError, DevWorkspaceClient};
use berth_core::DevWorkspaceResource;
use parking_lot::Mutex;
use std::sync::Arc;

/// Action creators for the DevWorkspace backend.
///
/// Same request/receive/error discipline as the legacy sub-store; start and
/// stop both go through `change_status`, and the control plane drives the
/// observed phase from there.
pub struct DevWorkspaceStore<C> {
    state: Arc<Mutex<StoreState>>,
    client: Arc<C>,
}

impl<C> Clone for DevWorkspaceStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: DevWorkspaceClient> DevWorkspaceStore<C> {
    pub(crate) fn new(state: Arc<Mutex<StoreState>>, client: Arc<C>) -> Self {
        Self { state, client }
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    fn begin_request(&self) {
        let mut state = self.state.lock();
        state.dev.is_loading = true;
        state.dev.last_error = None;
    }

    fn fail(&self, error: ClientError) -> EngineError {
        let reason = error.normalized();
        let mut state = self.state.lock();
        state.dev.is_loading = false;
        state.dev.last_error = Some(reason.clone());
        EngineError::Backend(reason)
    }

    pub async fn request_all(&self, namespace: &str) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.list_in_namespace(namespace).await {
            Ok(listing) => {
                let mut state = self.state.lock();
                state.dev.is_loading = false;
                state.dev.workspaces = listing;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn request_one(&self, namespace: &str, name: &str) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.get_by_name(namespace, name).await {
            Ok(resource) => {
                let mut state = self.state.lock();
                state.dev.is_loading = false;
                state.dev.upsert(resource);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn start(&self, namespace: &str, name: &str) -> Result<(), EngineError> {
        self.change_status(namespace, name, true).await
    }

    pub async fn stop(&self, namespace: &str, name: &str) -> Result<(), EngineError> {
        self.change_status(namespace, name, false).await
    }

    async fn change_status(
        &self,
        namespace: &str,
        name: &str,
        started: bool,
    ) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.change_status(namespace, name, started).await {
            Ok(resource) => {
                let mut state = self.state.lock();
                state.dev.is_loading = false;
                state.dev.upsert(resource);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete the resource; it leaves the collection only on success.
    pub async fn delete(&self, namespace: &str, name: &str) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.delete(namespace, name).await {
            Ok(()) => {
                let mut state = self.state.lock();
                state.dev.is_loading = false;
                state.dev.remove(namespace, name);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn update(&self, resource: DevWorkspaceResource) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.update(resource).await {
            Ok(updated) => {
                let mut state = self.state.lock();
                state.dev.is_loading = false;
                state.dev.upsert(updated);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Create a resource with the given plugins applied.
    ///
    /// Not idempotent; creation-policy dedup belongs to the caller.
    pub async fn create_from_devfile(
        &self,
        resource: DevWorkspaceResource,
        plugins: &[String],
    ) -> Result<DevWorkspaceResource, EngineError> {
        self.begin_request();
        match self.client.create(resource, plugins).await {
            Ok(created) => {
                let mut state = self.state.lock();
                state.dev.is_loading = false;
                state.dev.upsert(created.clone());
                Ok(created)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

#[cfg(test)]
#[path = "devworkspace_tests.rs"]
mod tests;
