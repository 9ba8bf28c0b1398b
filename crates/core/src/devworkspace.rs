// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DevWorkspace custom-resource representation.
//!
//! The Kubernetes-style alternate backend: identity lives in metadata, the
//! devfile is embedded as `spec.template`, and the observed state (phase,
//! conditions, main URL) arrives in a server-populated `status` block.

use crate::devfile::Devfile;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `kind` discriminant of the custom resource.
pub const DEVWORKSPACE_KIND: &str = "DevWorkspace";
/// Condition type reporting PVC readiness.
pub const STORAGE_READY_CONDITION: &str = "StorageReady";

/// DevWorkspace custom resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevWorkspaceResource {
    #[serde(default)]
    pub kind: String,
    #[serde(rename = "apiVersion", default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default)]
    pub metadata: DevWorkspaceMetadata,
    #[serde(default)]
    pub spec: DevWorkspaceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DevWorkspaceStatus>,
}

impl DevWorkspaceResource {
    /// Backend-assigned workspace id, available once the resource first
    /// reports status.
    pub fn devworkspace_id(&self) -> Option<&str> {
        self.status
            .as_ref()
            .map(|s| s.devworkspace_id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Observed phase string, empty until the control plane reports one.
    pub fn phase(&self) -> &str {
        self.status.as_ref().map(|s| s.phase.as_str()).unwrap_or("")
    }

    /// Message of a failed `StorageReady` condition, if one is present and
    /// carries failure text.
    pub fn storage_ready_failure(&self) -> Option<&str> {
        let status = self.status.as_ref()?;
        status
            .conditions
            .iter()
            .find(|c| {
                c.condition_type == STORAGE_READY_CONDITION
                    && c.status.eq_ignore_ascii_case("false")
            })
            .and_then(|c| c.message.as_deref())
            .filter(|m| m.to_ascii_lowercase().contains("fail"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevWorkspaceMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Server-assigned unique id; empty until the resource is persisted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub annotations: IndexMap<String, String>,
    /// Creation stamp in epoch ms, used for recency ordering.
    #[serde(rename = "creationEpochMs", default, skip_serializing_if = "is_zero")]
    pub creation_epoch_ms: u64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevWorkspaceSpec {
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub template: Devfile,
}

/// Server-populated observed state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevWorkspaceStatus {
    #[serde(default)]
    pub phase: String,
    #[serde(rename = "devworkspaceId", default)]
    pub devworkspace_id: String,
    #[serde(rename = "mainUrl", default, skip_serializing_if = "Option::is_none")]
    pub main_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// Single `{type, status, message}` condition tuple.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type", default)]
    pub condition_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
#[path = "devworkspace_tests.rs"]
mod tests;
