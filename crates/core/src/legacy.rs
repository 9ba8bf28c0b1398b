// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Legacy REST backend workspace record.
//!
//! A flat record: `id`, `status`, and `devfile` live side by side, and the
//! runtime (when present) carries the machine/server list the IDE URL is
//! derived from.

use crate::devfile::Devfile;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Epoch-ms attribute stamped at creation.
pub const CREATED_ATTR: &str = "created";
/// Epoch-ms attribute bumped on every update.
pub const UPDATED_ATTR: &str = "updated";
/// Fully-qualified factory URL the workspace was created from; the `peruser`
/// creation policy dedups on it.
pub const STACK_NAME_ATTR: &str = "stackName";
/// Server attribute marking the IDE endpoint.
pub const SERVER_TYPE_ATTR: &str = "type";
/// Value of [`SERVER_TYPE_ATTR`] for the IDE server.
pub const SERVER_TYPE_IDE: &str = "ide";

/// Workspace record as returned by the legacy REST backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyWorkspace {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub devfile: Devfile,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<LegacyRuntime>,
}

impl LegacyWorkspace {
    /// URL of the IDE server, if the runtime reports one.
    pub fn ide_url(&self) -> Option<&str> {
        let runtime = self.runtime.as_ref()?;
        runtime
            .machines
            .values()
            .flat_map(|m| m.servers.values())
            .find(|s| s.attributes.get(SERVER_TYPE_ATTR).map(String::as_str) == Some(SERVER_TYPE_IDE))
            .map(|s| s.url.as_str())
    }

    /// Epoch-ms recency stamp: `updated`, falling back to `created`, then 0.
    pub fn updated_epoch_ms(&self) -> u64 {
        self.attributes
            .get(UPDATED_ATTR)
            .or_else(|| self.attributes.get(CREATED_ATTR))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }
}

/// Runtime block of a running legacy workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyRuntime {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub machines: IndexMap<String, LegacyMachine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyMachine {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub servers: IndexMap<String, LegacyServer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyServer {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
}
