// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Devfile model: the declarative workspace configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Attribute flag: `'false'` marks the workspace as non-persistent.
pub const PERSIST_VOLUMES_ATTR: &str = "persistVolumes";
/// Attribute flag: `'true'` selects asynchronous persistence.
pub const ASYNC_PERSIST_ATTR: &str = "asyncPersist";
/// Attribute carrying the workspace's requested security context constraint.
pub const SCC_ATTR: &str = "scc";

/// Declarative workspace configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Devfile {
    #[serde(rename = "apiVersion", default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default)]
    pub metadata: DevfileMetadata,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<DevfileProject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<DevfileComponent>,
}

impl Devfile {
    /// Resolved workspace name: `metadata.name`, falling back to empty.
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// True if the devfile already declares either persistence attribute.
    ///
    /// The factory loader only applies the caller's preferred storage type
    /// when this is false.
    pub fn has_persistence_attributes(&self) -> bool {
        self.attributes.contains_key(PERSIST_VOLUMES_ATTR)
            || self.attributes.contains_key(ASYNC_PERSIST_ATTR)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevfileMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "generateName", default, skip_serializing_if = "Option::is_none")]
    pub generate_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevfileProject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ProjectSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSource {
    #[serde(rename = "type", default)]
    pub source_type: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevfileComponent {
    #[serde(rename = "type", default)]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[cfg(test)]
#[path = "devfile_tests.rs"]
mod tests;
