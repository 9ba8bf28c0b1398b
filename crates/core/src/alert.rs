// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert structures produced by the orchestration core.
//!
//! The engine never renders anything: failures and warnings become `Alert`
//! values handed to a host-provided [`AlertSink`]. Recovery actions are typed
//! so the host can wire the matching callback without string comparison.

#[cfg(any(test, feature = "test-support"))]
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
#[cfg(any(test, feature = "test-support"))]
use std::sync::Arc;

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertVariant {
    Info,
    Warning,
    Danger,
}

/// Typed recovery action offered by an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    Restart,
    RestartWithDefaultDevfile,
    OpenInVerboseMode,
    OpenLogs,
    TryAgain,
}

/// An action button: a display title plus the typed action it triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertAction {
    pub title: String,
    pub action: RecoveryAction,
}

impl AlertAction {
    pub fn restart() -> Self {
        Self {
            title: "Restart".to_string(),
            action: RecoveryAction::Restart,
        }
    }

    pub fn restart_with_default_devfile() -> Self {
        Self {
            title: "Restart with default devfile".to_string(),
            action: RecoveryAction::RestartWithDefaultDevfile,
        }
    }

    pub fn open_in_verbose_mode() -> Self {
        Self {
            title: "open in verbose mode".to_string(),
            action: RecoveryAction::OpenInVerboseMode,
        }
    }

    pub fn open_logs() -> Self {
        Self {
            title: "open logs".to_string(),
            action: RecoveryAction::OpenLogs,
        }
    }

    pub fn try_again() -> Self {
        Self {
            title: "try again".to_string(),
            action: RecoveryAction::TryAgain,
        }
    }
}

/// Alert payload handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Dedup key; the host replaces an existing alert with the same key.
    pub key: String,
    pub title: String,
    pub variant: AlertVariant,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AlertAction>,
}

impl Alert {
    pub fn danger(key: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            variant: AlertVariant::Danger,
            body: body.into(),
            actions: Vec::new(),
        }
    }

    pub fn warning(key: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            variant: AlertVariant::Warning,
            body: body.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<AlertAction>) -> Self {
        self.actions = actions;
        self
    }
}

/// Consumer of alert structures.
pub trait AlertSink: Send + Sync {
    fn notify(&self, alert: Alert);
}

/// Fallback sink that logs alerts when no host sink is wired, so failures
/// are never silently swallowed in headless contexts.
#[derive(Debug, Clone, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn notify(&self, alert: Alert) {
        match alert.variant {
            AlertVariant::Danger => {
                tracing::error!(key = %alert.key, title = %alert.title, body = %alert.body, "alert")
            }
            AlertVariant::Warning => {
                tracing::warn!(key = %alert.key, title = %alert.title, body = %alert.body, "alert")
            }
            AlertVariant::Info => {
                tracing::info!(key = %alert.key, title = %alert.title, body = %alert.body, "alert")
            }
        }
    }
}

/// Recording sink for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct RecordingAlertSink {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts notified so far, in order.
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }

    /// Drain recorded alerts.
    pub fn take(&self) -> Vec<Alert> {
        std::mem::take(&mut *self.alerts.lock())
    }
}

#[cfg(any(test, feature = "test-support"))]
impl AlertSink for RecordingAlertSink {
    fn notify(&self, alert: Alert) {
        self.alerts.lock().push(alert);
    }
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
