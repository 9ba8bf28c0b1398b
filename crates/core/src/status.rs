// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical workspace status.
//!
//! A superset over both backends: the legacy REST backend reports a flat
//! status string, the DevWorkspace backend reports `status.phase`. Both are
//! upper-cased and mapped 1:1 into this enum; `FAILED -> ERROR` is an explicit
//! compatibility mapping applied only on the legacy path.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a workspace, normalized across backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceStatus {
    Running,
    Stopping,
    Stopped,
    Starting,
    Paused,
    Error,
    Failed,
    Failing,
    Terminating,
}

impl WorkspaceStatus {
    /// Parse a backend phase string. Unrecognized strings yield `None`;
    /// callers drop the update rather than corrupt state.
    pub fn parse(phase: &str) -> Option<Self> {
        match phase.to_ascii_uppercase().as_str() {
            "RUNNING" => Some(Self::Running),
            "STOPPING" => Some(Self::Stopping),
            "STOPPED" => Some(Self::Stopped),
            "STARTING" => Some(Self::Starting),
            "PAUSED" => Some(Self::Paused),
            "ERROR" => Some(Self::Error),
            "FAILED" => Some(Self::Failed),
            "FAILING" => Some(Self::Failing),
            "TERMINATING" => Some(Self::Terminating),
            _ => None,
        }
    }

    /// Parse a legacy backend status string, folding `FAILED` into `ERROR`.
    ///
    /// The DevWorkspace state machine keeps `FAILED` distinct; only the legacy
    /// adapter applies this compatibility mapping.
    pub fn parse_legacy(phase: &str) -> Option<Self> {
        match Self::parse(phase) {
            Some(Self::Failed) => Some(Self::Error),
            other => other,
        }
    }

    /// Phase string as the backends report it.
    pub fn as_phase(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Stopped => "STOPPED",
            Self::Starting => "STARTING",
            Self::Paused => "PAUSED",
            Self::Error => "ERROR",
            Self::Failed => "FAILED",
            Self::Failing => "FAILING",
            Self::Terminating => "TERMINATING",
        }
    }

    /// True for phases from which a start call is legal.
    pub fn is_startable(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed | Self::Error)
    }

    /// True for phases the starting machine waits out without action.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Failing | Self::Stopping | Self::Paused)
    }
}

impl fmt::Display for WorkspaceStatus {
    /// Title-case rendering, used verbatim inside alert bodies
    /// (`The workspace status changed unexpectedly to "Failed".`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Running => "Running",
            Self::Stopping => "Stopping",
            Self::Stopped => "Stopped",
            Self::Starting => "Starting",
            Self::Paused => "Paused",
            Self::Error => "Error",
            Self::Failed => "Failed",
            Self::Failing => "Failing",
            Self::Terminating => "Terminating",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
