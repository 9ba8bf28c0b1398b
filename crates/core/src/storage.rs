// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-type policy.
//!
//! Storage preference is not stored directly on a workspace; it is encoded in
//! devfile attribute flags. Absence of both flags means `persistent`.

use crate::devfile::{Devfile, ASYNC_PERSIST_ATTR, PERSIST_VOLUMES_ATTR};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workspace storage preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    Persistent,
    Ephemeral,
    Async,
}

impl StorageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "persistent" => Some(Self::Persistent),
            "ephemeral" => Some(Self::Ephemeral),
            "async" => Some(Self::Async),
            _ => None,
        }
    }

    /// True when this storage preference is backed by a per-user PVC, which
    /// makes PVC provisioning failures relevant to it.
    pub fn uses_pvc(&self) -> bool {
        matches!(self, Self::Persistent | Self::Async)
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persistent => write!(f, "persistent"),
            Self::Ephemeral => write!(f, "ephemeral"),
            Self::Async => write!(f, "async"),
        }
    }
}

/// Derive the storage type from devfile attributes.
///
/// `persistVolumes` anything but the literal `'false'` (including absence)
/// counts as persistent; `asyncPersist == 'true'` refines non-persistent
/// storage into `async`.
pub fn attributes_to_type(attributes: &IndexMap<String, String>) -> StorageType {
    let persistent = attributes
        .get(PERSIST_VOLUMES_ATTR)
        .map(|v| v != "false")
        .unwrap_or(true);
    if persistent {
        return StorageType::Persistent;
    }
    let async_persist = attributes
        .get(ASYNC_PERSIST_ATTR)
        .map(|v| v == "true")
        .unwrap_or(false);
    if async_persist {
        StorageType::Async
    } else {
        StorageType::Ephemeral
    }
}

/// Encode a storage type as devfile attribute flags.
pub fn type_to_attributes(storage_type: StorageType) -> IndexMap<String, String> {
    let mut attributes = IndexMap::new();
    match storage_type {
        StorageType::Persistent => {}
        StorageType::Ephemeral => {
            attributes.insert(PERSIST_VOLUMES_ATTR.to_string(), "false".to_string());
        }
        StorageType::Async => {
            attributes.insert(PERSIST_VOLUMES_ATTR.to_string(), "false".to_string());
            attributes.insert(ASYNC_PERSIST_ATTR.to_string(), "true".to_string());
        }
    }
    attributes
}

/// Rewrite a devfile's persistence flags to match the given storage type.
pub fn apply_storage_type(devfile: &mut Devfile, storage_type: StorageType) {
    devfile.attributes.shift_remove(PERSIST_VOLUMES_ATTR);
    devfile.attributes.shift_remove(ASYNC_PERSIST_ATTR);
    devfile.attributes.extend(type_to_attributes(storage_type));
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
