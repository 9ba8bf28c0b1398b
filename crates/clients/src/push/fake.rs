// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake push client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{OutputCallback, StatusCallback, StatusMessage, StatusPushClient};
use crate::error::ClientError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Recorded subscription call
#[derive(Debug, Clone, PartialEq)]
pub enum PushCall {
    SubscribeStatus { id: String },
    SubscribeOutput { id: String },
}

#[derive(Default)]
struct FakePushState {
    status_callbacks: HashMap<String, Vec<StatusCallback>>,
    output_callbacks: HashMap<String, Vec<OutputCallback>>,
    calls: Vec<PushCall>,
}

/// Fake push client that lets tests inject messages into registered callbacks.
#[derive(Clone, Default)]
pub struct FakePushClient {
    inner: Arc<Mutex<FakePushState>>,
}

impl FakePushClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<PushCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of status subscriptions registered for an id
    pub fn status_subscription_count(&self, id: &str) -> usize {
        self.inner
            .lock()
            .status_callbacks
            .get(id)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Deliver a status message to every callback registered for the id
    pub fn push_status(&self, id: &str, message: StatusMessage) {
        let inner = self.inner.lock();
        if let Some(callbacks) = inner.status_callbacks.get(id) {
            for callback in callbacks {
                callback(message.clone());
            }
        }
    }

    /// Deliver an output line to every callback registered for the id
    pub fn push_output(&self, id: &str, line: &str) {
        let inner = self.inner.lock();
        if let Some(callbacks) = inner.output_callbacks.get(id) {
            for callback in callbacks {
                callback(line.to_string());
            }
        }
    }
}

#[async_trait]
impl StatusPushClient for FakePushClient {
    async fn subscribe_workspace_status(
        &self,
        id: &str,
        callback: StatusCallback,
    ) -> Result<(), ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PushCall::SubscribeStatus { id: id.to_string() });
        inner
            .status_callbacks
            .entry(id.to_string())
            .or_default()
            .push(callback);
        Ok(())
    }

    async fn subscribe_environment_output(
        &self,
        id: &str,
        callback: OutputCallback,
    ) -> Result<(), ClientError> {
        let mut inner = self.inner.lock();
        inner.calls.push(PushCall::SubscribeOutput { id: id.to_string() });
        inner
            .output_callbacks
            .entry(id.to_string())
            .or_default()
            .push(callback);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
