// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress-step framework.
//!
//! A step is a single asynchronous unit of work run by a wizard. The driver
//! invokes it when, and only when, the step's distance to the active position
//! is 0, no unresolved error is latched, and the input snapshot differs from
//! the one already handled. A latched error suppresses re-runs until an
//! explicit external retry clears it; steps never silently retry.

use async_trait::async_trait;
use berth_core::{Alert, AlertAction, AlertVariant};

/// Minimum time a step stays current before the wizard advances past it, in
/// milliseconds. Enforced by the surrounding wizard, not the driver.
pub const MIN_STEP_DURATION_MS: u64 = 5_000;

/// Outcome of a successful step run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepVerdict {
    /// Advance the wizard to the next step.
    Advance,
    /// Stay in place and re-evaluate on the next snapshot change.
    Hold,
}

/// Error raised by a step run, carrying the alert the host renders.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFault {
    pub title: String,
    pub body: String,
    pub actions: Vec<AlertAction>,
}

impl StepFault {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_actions(mut self, actions: Vec<AlertAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Convert into a danger alert under the given dedup key.
    pub fn into_alert(self, key: impl Into<String>) -> Alert {
        Alert {
            key: key.into(),
            title: self.title,
            variant: AlertVariant::Danger,
            body: self.body,
            actions: self.actions,
        }
    }
}

/// A single asynchronous unit of work in a wizard.
#[async_trait]
pub trait ProgressStep: Send {
    type Input: Send + Sync;

    fn name(&self) -> &str;

    /// Stable fingerprint of the input snapshot. The driver re-runs the step
    /// only when this changes, making repeated evaluations of an unchanged
    /// snapshot free of side effects.
    fn fingerprint(&self, input: &Self::Input) -> u64;

    async fn run_step(&mut self, input: &Self::Input) -> Result<StepVerdict, StepFault>;
}

/// What a driver poll did.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverSignal {
    /// The step ran and asked to advance.
    Advanced,
    /// The step ran and holds in place.
    Held,
    /// The step ran and faulted; the fault is latched.
    Faulted(StepFault),
    /// A latched fault suppressed the run; retry is required.
    Suppressed,
    /// Input snapshot unchanged; nothing ran.
    Unchanged,
    /// The step is not the active one.
    OutOfTurn,
}

/// Drives one step against the distance/error/snapshot contract.
pub struct StepDriver<S: ProgressStep> {
    step: S,
    last_fingerprint: Option<u64>,
    last_error: Option<StepFault>,
}

impl<S: ProgressStep> StepDriver<S> {
    pub fn new(step: S) -> Self {
        Self {
            step,
            last_fingerprint: None,
            last_error: None,
        }
    }

    pub fn step(&self) -> &S {
        &self.step
    }

    pub fn step_mut(&mut self) -> &mut S {
        &mut self.step
    }

    pub fn last_error(&self) -> Option<&StepFault> {
        self.last_error.as_ref()
    }

    /// Clear the latched error and the handled snapshot, re-arming the step.
    /// This is the explicit external retry; nothing else re-runs a faulted
    /// step.
    pub fn retry(&mut self) {
        self.last_error = None;
        self.last_fingerprint = None;
    }

    /// Latch an externally raised fault (e.g. a timeout callback).
    pub fn fail(&mut self, fault: StepFault) {
        self.last_error = Some(fault);
    }

    /// Evaluate the step for the given wizard distance and input snapshot.
    pub async fn poll(&mut self, distance: i64, input: &S::Input) -> DriverSignal {
        if distance != 0 {
            return DriverSignal::OutOfTurn;
        }
        if self.last_error.is_some() {
            return DriverSignal::Suppressed;
        }
        let fingerprint = self.step.fingerprint(input);
        if self.last_fingerprint == Some(fingerprint) {
            return DriverSignal::Unchanged;
        }
        self.last_fingerprint = Some(fingerprint);

        match self.step.run_step(input).await {
            Ok(StepVerdict::Advance) => DriverSignal::Advanced,
            Ok(StepVerdict::Hold) => DriverSignal::Held,
            Err(fault) => {
                tracing::warn!(step = self.step.name(), title = %fault.title, "step faulted");
                self.last_error = Some(fault.clone());
                DriverSignal::Faulted(fault)
            }
        }
    }
}

#[cfg(test)]
#[path = "sequencer_tests.rs"]
mod tests;
