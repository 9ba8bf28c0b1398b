// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polymorphic workspace view.
//!
//! Exactly one of the two backend shapes backs a given instance; the variant
//! is detected from structural markers at construction and never changes for
//! the instance's lifetime.

use crate::devfile::Devfile;
use crate::devworkspace::{Condition, DevWorkspaceResource, DEVWORKSPACE_KIND};
use crate::legacy::LegacyWorkspace;
use crate::status::WorkspaceStatus;
use crate::storage::{self, StorageType};
use serde_json::Value;
use thiserror::Error;

crate::define_id! {
    /// Stable unique identity of a workspace, independent of backend.
    ///
    /// Legacy records use their backend id; DevWorkspace resources use
    /// `metadata.uid`. The restart tracker and subscription registries key
    /// on this.
    pub struct WorkspaceUid;
}

/// Build a namespace-qualified workspace key (`"{namespace}/{name}"`).
///
/// Returns the bare name when the namespace is empty.
pub fn scoped_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", namespace, name)
    }
}

/// Raised when a record matches neither known workspace shape.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("record matches neither workspace shape: {0}")]
    UnknownShape(String),
    #[error("malformed {kind} record: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A workspace, backed by exactly one of the two backend representations.
#[derive(Debug, Clone, PartialEq)]
pub enum Workspace {
    Legacy(LegacyWorkspace),
    DevWorkspace(DevWorkspaceResource),
}

impl Workspace {
    /// Detect the backing shape of a raw record and construct the view.
    ///
    /// Structural markers: `kind: "DevWorkspace"` selects the custom-resource
    /// shape; flat `id` + `devfile` + `status` fields select the legacy
    /// shape. Anything else is an error.
    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        if value.get("kind").and_then(Value::as_str) == Some(DEVWORKSPACE_KIND) {
            let resource = serde_json::from_value(value).map_err(|source| ShapeError::Malformed {
                kind: "DevWorkspace",
                source,
            })?;
            return Ok(Self::DevWorkspace(resource));
        }
        let looks_legacy = value.get("id").is_some()
            && value.get("devfile").is_some()
            && value.get("status").is_some();
        if looks_legacy {
            let record = serde_json::from_value(value).map_err(|source| ShapeError::Malformed {
                kind: "legacy workspace",
                source,
            })?;
            return Ok(Self::Legacy(record));
        }
        let keys = match &value {
            Value::Object(map) => map.keys().cloned().collect::<Vec<_>>().join(", "),
            other => format!("non-object value ({})", kind_of(other)),
        };
        Err(ShapeError::UnknownShape(keys))
    }

    pub fn is_dev_workspace(&self) -> bool {
        matches!(self, Self::DevWorkspace(_))
    }

    /// Backend-assigned workspace id.
    ///
    /// Legacy ids exist from creation; DevWorkspace ids appear once the
    /// resource first reports status.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Legacy(w) => Some(w.id.as_str()),
            Self::DevWorkspace(r) => r.devworkspace_id(),
        }
    }

    /// Stable unique identity used by the restart tracker and registries.
    pub fn uid(&self) -> Option<WorkspaceUid> {
        match self {
            Self::Legacy(w) => {
                if w.id.is_empty() {
                    None
                } else {
                    Some(WorkspaceUid::new(w.id.clone()))
                }
            }
            Self::DevWorkspace(r) => {
                if r.metadata.uid.is_empty() {
                    None
                } else {
                    Some(WorkspaceUid::new(r.metadata.uid.clone()))
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Legacy(w) => w.devfile.name(),
            Self::DevWorkspace(r) => r.metadata.name.as_str(),
        }
    }

    /// Rename the workspace. Only meaningful pre-creation; the namespace is
    /// fixed once the backend has persisted the record.
    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            Self::Legacy(w) => w.devfile.metadata.name = Some(name.into()),
            Self::DevWorkspace(r) => r.metadata.name = name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::Legacy(w) => w.namespace.as_str(),
            Self::DevWorkspace(r) => r.metadata.namespace.as_str(),
        }
    }

    /// Namespace-qualified key (`"{namespace}/{name}"`).
    pub fn qualified_name(&self) -> String {
        scoped_name(self.namespace(), self.name())
    }

    /// Canonical status. Legacy `FAILED` folds into `ERROR`; the DevWorkspace
    /// path keeps `FAILED` distinct. Unknown phase strings yield `None`.
    pub fn status(&self) -> Option<WorkspaceStatus> {
        match self {
            Self::Legacy(w) => WorkspaceStatus::parse_legacy(&w.status),
            Self::DevWorkspace(r) => WorkspaceStatus::parse(r.phase()),
        }
    }

    pub fn devfile(&self) -> &Devfile {
        match self {
            Self::Legacy(w) => &w.devfile,
            Self::DevWorkspace(r) => &r.spec.template,
        }
    }

    /// Replace the devfile.
    ///
    /// Unsupported on the DevWorkspace variant: the write is dropped with a
    /// diagnostic, and callers must not assume success.
    pub fn set_devfile(&mut self, devfile: Devfile) {
        match self {
            Self::Legacy(w) => w.devfile = devfile,
            Self::DevWorkspace(r) => {
                tracing::warn!(
                    workspace = %r.metadata.name,
                    "set_devfile is not implemented for DevWorkspace resources; ignoring"
                );
            }
        }
    }

    /// Storage preference, derived from devfile attribute flags.
    pub fn storage_type(&self) -> StorageType {
        storage::attributes_to_type(&self.devfile().attributes)
    }

    /// Rewrite the storage preference. Follows the same support matrix as
    /// [`Workspace::set_devfile`]: a no-op with a diagnostic on DevWorkspace.
    pub fn set_storage_type(&mut self, storage_type: StorageType) {
        match self {
            Self::Legacy(w) => storage::apply_storage_type(&mut w.devfile, storage_type),
            Self::DevWorkspace(r) => {
                tracing::warn!(
                    workspace = %r.metadata.name,
                    "set_storage_type is not implemented for DevWorkspace resources; ignoring"
                );
            }
        }
    }

    /// URL of the running IDE, when the backend reports one.
    pub fn ide_url(&self) -> Option<String> {
        match self {
            Self::Legacy(w) => w.ide_url().map(str::to_string),
            Self::DevWorkspace(r) => r.status.as_ref().and_then(|s| s.main_url.clone()),
        }
    }

    pub fn projects(&self) -> &[crate::devfile::DevfileProject] {
        &self.devfile().projects
    }

    /// Status conditions. Always empty for the legacy variant.
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Self::Legacy(_) => &[],
            Self::DevWorkspace(r) => r
                .status
                .as_ref()
                .map(|s| s.conditions.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Epoch-ms recency stamp for sorted-by-recency views; 0 when unknown.
    pub fn updated_epoch_ms(&self) -> u64 {
        match self {
            Self::Legacy(w) => w.updated_epoch_ms(),
            Self::DevWorkspace(r) => r.metadata.creation_epoch_ms,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
