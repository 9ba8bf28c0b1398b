// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart-in-flight tracking.
//!
//! One injected instance is shared by every starting-step of a wizard type.
//! Membership in the restart set suppresses duplicate failure detection for
//! that workspace until the corresponding start call is issued; the marker
//! clears exactly once, at the moment of that start. All mutation happens on
//! the event loop; the mutex exists for the multi-threaded runtime.

use berth_core::WorkspaceUid;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Tracks stop-then-restart sequences and surfaced PVC errors, keyed by
/// workspace UID.
#[derive(Debug, Default)]
pub struct RestartTracker {
    in_flight: Mutex<HashSet<WorkspaceUid>>,
    pvc_surfaced: Mutex<HashSet<WorkspaceUid>>,
}

impl RestartTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a stop-then-restart sequence for the UID. Returns false when a
    /// sequence is already in flight.
    pub fn initiate(&self, uid: &WorkspaceUid) -> bool {
        self.in_flight.lock().insert(uid.clone())
    }

    pub fn is_in_flight(&self, uid: &WorkspaceUid) -> bool {
        self.in_flight.lock().contains(uid)
    }

    /// Clear the marker as the start call is issued — never earlier, so the
    /// suppression window covers the whole stop → stopped → start sequence.
    /// Returns true when a marker was actually cleared.
    pub fn clear_on_start(&self, uid: &WorkspaceUid) -> bool {
        self.in_flight.lock().remove(uid)
    }

    /// Record that the PVC error for this UID has been surfaced. Returns
    /// false when it already was.
    pub fn mark_pvc_surfaced(&self, uid: &WorkspaceUid) -> bool {
        self.pvc_surfaced.lock().insert(uid.clone())
    }

    pub fn pvc_already_surfaced(&self, uid: &WorkspaceUid) -> bool {
        self.pvc_surfaced.lock().contains(uid)
    }
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
