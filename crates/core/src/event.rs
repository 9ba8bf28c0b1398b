// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status-transition events synthesized by the reconciliation layer.

use crate::status::WorkspaceStatus;
use serde::{Deserialize, Serialize};

/// An out-of-band status change observed for a workspace.
///
/// Legacy WebSocket pushes and DevWorkspace poll diffs both normalize into
/// this shape before they touch the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub workspace_id: String,
    pub status: WorkspaceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_status: Option<WorkspaceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
