// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Legacy WebSocket push contract.
//!
//! Subscriptions are session-scoped: once registered for a workspace id they
//! are never torn down per workspace, only with the session itself.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePushClient, PushCall};

use crate::error::ClientError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payload of a workspace-status push message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "runtimeId", default, skip_serializing_if = "Option::is_none")]
    pub runtime_id: Option<String>,
}

/// Callback receiving workspace-status messages.
pub type StatusCallback = Box<dyn Fn(StatusMessage) + Send + Sync>;
/// Callback receiving environment output lines.
pub type OutputCallback = Box<dyn Fn(String) + Send + Sync>;

/// Push channel of the legacy backend.
#[async_trait]
pub trait StatusPushClient: Send + Sync + 'static {
    async fn subscribe_workspace_status(
        &self,
        id: &str,
        callback: StatusCallback,
    ) -> Result<(), ClientError>;

    async fn subscribe_environment_output(
        &self,
        id: &str,
        callback: OutputCallback,
    ) -> Result<(), ClientError>;
}
