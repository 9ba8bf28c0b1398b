// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status reconciliation: subscription registry, legacy push translation,
//! and the DevWorkspace poller.
//!
//! Both channels are independent; no global ordering holds across them.
//! Per-workspace ordering holds within each channel.

mod legacy;
mod poller;

pub use legacy::{LegacySubscriber, StatusTranslator, Translation, ERROR_LOG_PREFIX, INTERRUPTED_START_PATTERN};
pub use poller::{reconcile_listing, DevWorkspacePoller, PollerHandle};

use parking_lot::Mutex;
use std::collections::HashSet;

/// Kind of per-workspace callback a subscription delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Status,
    Logs,
}

/// Session-scoped subscription guard.
///
/// At most one live subscription per workspace id per callback kind; entries
/// are only ever added for the lifetime of the session. Shared mutable state
/// owned by one injected instance — mutation happens on the single event
/// loop, so a plain mutex suffices.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    status: Mutex<HashSet<String>>,
    logs: Mutex<HashSet<String>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the subscription slot for an id. Returns true exactly once per
    /// (id, kind); the caller subscribes only on true.
    pub fn claim(&self, kind: CallbackKind, id: &str) -> bool {
        let mut set = match kind {
            CallbackKind::Status => self.status.lock(),
            CallbackKind::Logs => self.logs.lock(),
        };
        set.insert(id.to_string())
    }

    pub fn is_subscribed(&self, kind: CallbackKind, id: &str) -> bool {
        let set = match kind {
            CallbackKind::Status => self.status.lock(),
            CallbackKind::Logs => self.logs.lock(),
        };
        set.contains(id)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
