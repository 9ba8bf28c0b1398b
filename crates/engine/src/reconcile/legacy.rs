// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Legacy push-channel reconciliation.
//!
//! One WebSocket subscription per workspace id, established lazily on first
//! sighting and never re-established in-session. Incoming messages are
//! translated into canonical status updates before they touch the store.

use super::{CallbackKind, SubscriptionRegistry};
use crate::error::EngineError;
use crate::store::StoreState;
use berth_clients::{StatusMessage, StatusPushClient};
use berth_core::WorkspaceStatus;
use parking_lot::Mutex;
use regex::Regex;
use std::sync::Arc;

/// Backend message emitted when a start is interrupted by a stop. The
/// matching behavior is backend-version-specific; do not generalize the
/// pattern without confirming the target backend's message format.
pub const INTERRUPTED_START_PATTERN: &str = r"^Runtime start for identity '.+' is interrupted$";

/// Prefix of the log line recorded for failed starts. The IDE loader strips
/// it back off when extracting the failure reason.
pub const ERROR_LOG_PREFIX: &str = "Error: Failed to run the workspace: ";

/// Outcome of translating one push message.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// Apply the status; append the log line first when present.
    Apply {
        status: WorkspaceStatus,
        log: Option<String>,
    },
    /// Drop the status update (unrecognized phase string); the log line, when
    /// present, is still appended.
    Drop { log: Option<String> },
}

/// Translates legacy push messages into canonical status updates.
pub struct StatusTranslator {
    interrupted: Option<Regex>,
}

impl Default for StatusTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTranslator {
    pub fn new() -> Self {
        // The pattern is a constant; compilation failure would be caught by
        // the unit tests, so a missing regex degrades to "never matches".
        Self {
            interrupted: Regex::new(INTERRUPTED_START_PATTERN).ok(),
        }
    }

    fn is_interrupted(&self, error: &str) -> bool {
        self.interrupted
            .as_ref()
            .map(|r| r.is_match(error))
            .unwrap_or(false)
    }

    /// Translate one message.
    ///
    /// A message carrying an error string records the formatted log line and
    /// forces `ERROR` — unless the error matches the interrupted-start
    /// pattern, in which case the message's own status field is trusted
    /// (benign stop-interrupted race). Unrecognized status strings are
    /// dropped without mutation.
    pub fn translate(&self, message: &StatusMessage) -> Translation {
        if let Some(error) = message.error.as_deref().filter(|e| !e.is_empty()) {
            let log = Some(format!("{}\"{}\"", ERROR_LOG_PREFIX, error));
            if self.is_interrupted(error) {
                return match message.status.as_deref().and_then(WorkspaceStatus::parse_legacy) {
                    Some(status) => Translation::Apply { status, log },
                    None => Translation::Drop { log },
                };
            }
            return Translation::Apply {
                status: WorkspaceStatus::Error,
                log,
            };
        }

        match message.status.as_deref().and_then(WorkspaceStatus::parse_legacy) {
            Some(status) => Translation::Apply { status, log: None },
            None => Translation::Drop { log: None },
        }
    }
}

/// Wires per-workspace push subscriptions into the store.
pub struct LegacySubscriber<P> {
    push: Arc<P>,
    state: Arc<Mutex<StoreState>>,
    registry: Arc<SubscriptionRegistry>,
}

impl<P: StatusPushClient> LegacySubscriber<P> {
    pub fn new(
        push: Arc<P>,
        state: Arc<Mutex<StoreState>>,
        registry: Arc<SubscriptionRegistry>,
    ) -> Self {
        Self {
            push,
            state,
            registry,
        }
    }

    /// Subscribe to status pushes for a workspace id, once per session.
    pub async fn ensure_status_subscription(&self, id: &str) -> Result<(), EngineError> {
        if !self.registry.claim(CallbackKind::Status, id) {
            return Ok(());
        }

        let state = Arc::clone(&self.state);
        let workspace_id = id.to_string();
        let translator = StatusTranslator::new();
        self.push
            .subscribe_workspace_status(
                id,
                Box::new(move |message| {
                    let translation = translator.translate(&message);
                    let mut state = state.lock();
                    match translation {
                        Translation::Apply { status, log } => {
                            if let Some(line) = log {
                                state.legacy.append_log(&workspace_id, line);
                            }
                            state.legacy.apply_status(&workspace_id, status);
                        }
                        Translation::Drop { log } => {
                            if let Some(line) = log {
                                state.legacy.append_log(&workspace_id, line);
                            }
                            tracing::debug!(
                                workspace_id = %workspace_id,
                                status = ?message.status,
                                "dropping unrecognized status update"
                            );
                        }
                    }
                }),
            )
            .await
            .map_err(EngineError::from)
    }

    /// Subscribe to status and output for every workspace currently in the
    /// store. Ids already claimed are skipped, so calling this after each
    /// list refresh picks up exactly the newly sighted workspaces.
    pub async fn watch_known_workspaces(&self) -> Result<(), EngineError> {
        let ids: Vec<String> = {
            let state = self.state.lock();
            state.legacy.workspaces.iter().map(|w| w.id.clone()).collect()
        };
        for id in ids {
            self.ensure_status_subscription(&id).await?;
            self.ensure_output_subscription(&id).await?;
        }
        Ok(())
    }

    /// Subscribe to environment output for a workspace id, once per session.
    pub async fn ensure_output_subscription(&self, id: &str) -> Result<(), EngineError> {
        if !self.registry.claim(CallbackKind::Logs, id) {
            return Ok(());
        }

        let state = Arc::clone(&self.state);
        let workspace_id = id.to_string();
        self.push
            .subscribe_environment_output(
                id,
                Box::new(move |line| {
                    let mut state = state.lock();
                    state.legacy.append_log(&workspace_id, line);
                }),
            )
            .await
            .map_err(EngineError::from)
    }
}

#[cfg(test)]
#[path = "legacy_tests.rs"]
mod tests;
