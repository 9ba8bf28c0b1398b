// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Legacy sub-store: actions against the legacy REST backend.

use super::StoreState;
use crate::error::EngineError;
use berth_clients::{ClientError, CreateParams, LegacyApiClient, StartParams};
use berth_core::{Devfile, LegacyWorkspace};
use parking_lot::Mutex;
use std::sync::Arc;

/// Action creators for the legacy backend.
///
/// Every action marks the request on the slice before the call and applies a
/// receive or error transition after. `start`/`stop`/`delete` failures are
/// re-thrown with the normalized reason so callers can display them without
/// inspecting transport details.
pub struct LegacyStore<C> {
    state: Arc<Mutex<StoreState>>,
    client: Arc<C>,
}

impl<C> Clone for LegacyStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: LegacyApiClient> LegacyStore<C> {
    pub(crate) fn new(state: Arc<Mutex<StoreState>>, client: Arc<C>) -> Self {
        Self { state, client }
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    fn begin_request(&self) {
        let mut state = self.state.lock();
        state.legacy.is_loading = true;
        state.legacy.last_error = None;
    }

    fn fail(&self, error: ClientError) -> EngineError {
        let reason = error.normalized();
        let mut state = self.state.lock();
        state.legacy.is_loading = false;
        state.legacy.last_error = Some(reason.clone());
        EngineError::Backend(reason)
    }

    /// Fetch every workspace visible to the user.
    pub async fn request_all(&self) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.get_all().await {
            Ok(list) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                state.legacy.workspaces = list;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Fetch and upsert a single workspace.
    pub async fn request_one(&self, id: &str) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.get_by_id(id).await {
            Ok(workspace) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                state.legacy.upsert(workspace);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn start(&self, id: &str, params: Option<StartParams>) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.start(id, params).await {
            Ok(workspace) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                state.legacy.upsert(workspace);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn stop(&self, id: &str) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.stop(id).await {
            Ok(()) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete the workspace; the record leaves the collection only on success.
    pub async fn delete(&self, id: &str) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.delete(id).await {
            Ok(()) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                state.legacy.remove(id);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn update(&self, id: &str, workspace: LegacyWorkspace) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.update(id, workspace).await {
            Ok(updated) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                state.legacy.upsert(updated);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Create a workspace from a devfile.
    ///
    /// Not idempotent: duplicate avoidance is the caller's responsibility
    /// (the factory loader applies the creation policy).
    pub async fn create_from_devfile(
        &self,
        devfile: Devfile,
        params: CreateParams,
    ) -> Result<LegacyWorkspace, EngineError> {
        self.begin_request();
        match self.client.create(devfile, params).await {
            Ok(workspace) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                state.legacy.upsert(workspace.clone());
                Ok(workspace)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn request_settings(&self) -> Result<(), EngineError> {
        self.begin_request();
        match self.client.get_settings().await {
            Ok(settings) => {
                let mut state = self.state.lock();
                state.legacy.is_loading = false;
                state.legacy.settings = settings;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

#[cfg(test)]
#[path = "legacy_tests.rs"]
mod tests;
