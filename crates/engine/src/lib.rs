// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Berth workspace engine: dual-backend store, status reconciliation, and
//! the starting-workspace state machine.

mod error;
pub mod reconcile;
mod restart;
mod sequencer;
mod starting;
pub mod store;

pub use error::EngineError;
pub use reconcile::{
    CallbackKind, DevWorkspacePoller, LegacySubscriber, PollerHandle, StatusTranslator,
    SubscriptionRegistry, Translation, ERROR_LOG_PREFIX,
};
pub use restart::RestartTracker;
pub use sequencer::{
    DriverSignal, ProgressStep, StepDriver, StepFault, StepVerdict, MIN_STEP_DURATION_MS,
};
pub use starting::{RestartRequest, StartingStep};
pub use store::{DevWorkspaceStore, DualStore, LegacyStore, StoreState, WorkspaceControl};
