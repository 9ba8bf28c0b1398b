// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use thiserror::Error;

/// Errors that can occur in the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Backend call failure, already normalized for display.
    #[error("{0}")]
    Backend(String),
    #[error("workspace has no assigned id yet")]
    MissingId,
    #[error("workspace not found: {0}")]
    NotFound(String),
}

impl From<berth_clients::ClientError> for EngineError {
    fn from(error: berth_clients::ClientError) -> Self {
        Self::Backend(error.normalized())
    }
}
