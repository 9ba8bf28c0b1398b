// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starting-workspace state machine.
//!
//! Drives a tracked workspace from its current phase to `RUNNING`, detecting
//! PVC provisioning failures, SCC mismatches, stuck starts, and unexpected
//! terminal phases. Restart orchestration defers the actual start to the next
//! observed `STOPPED`/`FAILED` transition, with the restart tracker
//! suppressing duplicate detection for the whole stop → stopped → start
//! window.
//!
//! Guarantees: for a fixed workspace, at most one `start` and at most one
//! `stop` are in flight between two consecutive observed status changes, and
//! repeated evaluations of an unchanged snapshot issue nothing (the driver's
//! fingerprint contract).

use crate::restart::RestartTracker;
use crate::sequencer::{ProgressStep, StepFault, StepVerdict};
use crate::store::WorkspaceControl;
use async_trait::async_trait;
use berth_core::devfile::SCC_ATTR;
use berth_core::devworkspace::STORAGE_READY_CONDITION;
use berth_core::{Alert, AlertAction, AlertSink, RecoveryAction, Workspace, WorkspaceStatus, WorkspaceUid};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Alert title shared by every failure this step surfaces.
const FAILED_TO_OPEN: &str = "Failed to open the workspace";

/// Request to restart a workspace from scratch, handled by the wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartRequest {
    pub uid: WorkspaceUid,
    pub default_devfile: bool,
}

/// The starting-workspace progress step.
pub struct StartingStep<C> {
    name: String,
    control: Arc<C>,
    alerts: Arc<dyn AlertSink>,
    tracker: Arc<RestartTracker>,
    restarts: mpsc::UnboundedSender<RestartRequest>,
    start_timeout: Duration,
    /// Cluster-configured SCC, from server settings. A workspace requesting
    /// a different one gets a warning, never an error.
    server_scc: Option<String>,
    start_issued: bool,
    scc_warned: bool,
    last_status: Option<WorkspaceStatus>,
}

impl<C: WorkspaceControl> StartingStep<C> {
    pub fn new(
        control: Arc<C>,
        alerts: Arc<dyn AlertSink>,
        tracker: Arc<RestartTracker>,
        restarts: mpsc::UnboundedSender<RestartRequest>,
        start_timeout: Duration,
        server_scc: Option<String>,
    ) -> Self {
        Self {
            name: "Waiting for workspace to start".to_string(),
            control,
            alerts,
            tracker,
            restarts,
            start_timeout,
            server_scc,
            start_issued: false,
            scc_warned: false,
            last_status: None,
        }
    }

    /// Last status this step observed, for the wizard's timeout wiring.
    pub fn last_status(&self) -> Option<WorkspaceStatus> {
        self.last_status
    }

    fn alert_key(workspace: &Workspace) -> String {
        match workspace.uid() {
            Some(uid) => format!("start-workspace-{}", uid),
            None => format!("start-workspace-{}", workspace.qualified_name()),
        }
    }

    fn fault(
        &self,
        workspace: &Workspace,
        body: impl Into<String>,
        actions: Vec<AlertAction>,
    ) -> StepFault {
        let fault = StepFault::new(FAILED_TO_OPEN, body).with_actions(actions);
        self.alerts
            .notify(fault.clone().into_alert(Self::alert_key(workspace)));
        fault
    }

    fn unexpected_phase(&self, workspace: &Workspace, status: WorkspaceStatus) -> StepFault {
        self.fault(
            workspace,
            format!("The workspace status changed unexpectedly to \"{}\".", status),
            restart_actions(),
        )
    }

    fn warn_on_scc_mismatch(&mut self, workspace: &Workspace) {
        if self.scc_warned {
            return;
        }
        let requested = workspace.devfile().attributes.get(SCC_ATTR);
        let (Some(requested), Some(configured)) = (requested, self.server_scc.as_ref()) else {
            return;
        };
        if requested == configured {
            return;
        }
        self.scc_warned = true;
        self.alerts.notify(Alert::warning(
            format!("scc-{}", Self::alert_key(workspace)),
            "Security context mismatch",
            format!(
                "The workspace requests the \"{}\" security context constraint but the cluster is configured with \"{}\". The workspace will be started anyway.",
                requested, configured
            ),
        ));
    }

    async fn issue_start(&mut self, workspace: &Workspace) -> Result<StepVerdict, StepFault> {
        self.warn_on_scc_mismatch(workspace);
        self.start_issued = true;
        match self.control.start_workspace(workspace).await {
            Ok(()) => Ok(StepVerdict::Hold),
            Err(e) => {
                self.start_issued = false;
                Err(self.fault(workspace, e.to_string(), restart_actions()))
            }
        }
    }

    async fn evaluate(
        &mut self,
        workspace: &Workspace,
        status: Option<WorkspaceStatus>,
    ) -> Result<StepVerdict, StepFault> {
        match status {
            Some(WorkspaceStatus::Running) => Ok(StepVerdict::Advance),

            Some(WorkspaceStatus::Terminating) => {
                Err(self.unexpected_phase(workspace, WorkspaceStatus::Terminating))
            }

            Some(status) if status.is_startable() => {
                let uid = workspace.uid();
                let deferred = uid
                    .as_ref()
                    .map(|u| self.tracker.is_in_flight(u))
                    .unwrap_or(false);

                if !deferred {
                    // FAILED (or ERROR) reached from a progressing phase,
                    // outside any known restart flow, is a failed start.
                    let was_progressing = matches!(
                        self.last_status,
                        Some(WorkspaceStatus::Starting) | Some(WorkspaceStatus::Failing)
                    );
                    if was_progressing && status != WorkspaceStatus::Stopped {
                        return Err(self.unexpected_phase(workspace, status));
                    }
                    if self.start_issued {
                        // A start is already in flight for this workspace.
                        return Ok(StepVerdict::Hold);
                    }
                }
                if deferred {
                    if let Some(uid) = uid.as_ref() {
                        self.tracker.clear_on_start(uid);
                        tracing::info!(workspace_uid = %uid, "resuming deferred restart");
                    }
                }
                self.issue_start(workspace).await
            }

            Some(WorkspaceStatus::Starting) => {
                if workspace.storage_type().uses_pvc() {
                    if let Some(message) = pvc_failure(workspace) {
                        if let Some(uid) = workspace.uid() {
                            if !self.tracker.is_in_flight(&uid)
                                && self.tracker.mark_pvc_surfaced(&uid)
                            {
                                return Err(self.fault(
                                    workspace,
                                    format!("Persistent volume provisioning failed: {}", message),
                                    vec![AlertAction::restart()],
                                ));
                            }
                        }
                    }
                }
                Ok(StepVerdict::Hold)
            }

            // FAILING / STOPPING / PAUSED are transient; wait for the next phase.
            Some(_) => Ok(StepVerdict::Hold),

            // No reported status yet (DevWorkspace pre-provisioning).
            None => Ok(StepVerdict::Hold),
        }
    }

    /// Handle an alert recovery action.
    ///
    /// `Restart` on a Starting/Running workspace issues `stop`, records the
    /// restart marker, and defers the start to the next `STOPPED`/`FAILED`
    /// transition. On an already stopped workspace the external restart
    /// callback fires directly, without a stop call. A `stop` rejection
    /// surfaces its own error and leaves the marker in place — callers must
    /// not assume a clean restart state until `stop` succeeds.
    pub async fn handle_action(
        &mut self,
        action: RecoveryAction,
        workspace: &Workspace,
    ) -> Result<(), StepFault> {
        match action {
            RecoveryAction::Restart | RecoveryAction::RestartWithDefaultDevfile => {
                let default_devfile = action == RecoveryAction::RestartWithDefaultDevfile;
                let running_or_starting = matches!(
                    workspace.status(),
                    Some(WorkspaceStatus::Starting) | Some(WorkspaceStatus::Running)
                );
                if running_or_starting {
                    if let Some(uid) = workspace.uid() {
                        if !self.tracker.initiate(&uid) {
                            // restart already in flight; at most one stop
                            return Ok(());
                        }
                    }
                    if let Err(e) = self.control.stop_workspace(workspace).await {
                        let fault = StepFault::new("Failed to stop the workspace", e.to_string());
                        self.alerts
                            .notify(fault.clone().into_alert(Self::alert_key(workspace)));
                        return Err(fault);
                    }
                    Ok(())
                } else {
                    let uid = workspace
                        .uid()
                        .unwrap_or_else(|| WorkspaceUid::new(workspace.qualified_name()));
                    let _ = self.restarts.send(RestartRequest {
                        uid,
                        default_devfile,
                    });
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Timeout callback from the wizard's externally owned timer.
    ///
    /// Only meaningful while the workspace is still `STARTING`; the returned
    /// fault should be latched into the driver.
    pub fn on_timeout(&mut self, workspace: &Workspace) -> Option<StepFault> {
        if workspace.status() != Some(WorkspaceStatus::Starting) {
            return None;
        }
        let secs = self.start_timeout.as_secs();
        Some(self.fault(
            workspace,
            format!(
                "The workspace status remains \"Starting\" in the last {} seconds.",
                secs
            ),
            restart_actions(),
        ))
    }
}

#[async_trait]
impl<C: WorkspaceControl> ProgressStep for StartingStep<C> {
    type Input = Workspace;

    fn name(&self) -> &str {
        &self.name
    }

    fn fingerprint(&self, workspace: &Workspace) -> u64 {
        let mut hasher = DefaultHasher::new();
        workspace.uid().hash(&mut hasher);
        workspace.status().map(|s| s.as_phase()).hash(&mut hasher);
        pvc_failure(workspace).hash(&mut hasher);
        workspace.ide_url().hash(&mut hasher);
        hasher.finish()
    }

    async fn run_step(&mut self, workspace: &Workspace) -> Result<StepVerdict, StepFault> {
        let status = workspace.status();
        let result = self.evaluate(workspace, status).await;
        self.last_status = status;
        result
    }
}

fn restart_actions() -> Vec<AlertAction> {
    vec![
        AlertAction::restart(),
        AlertAction::restart_with_default_devfile(),
    ]
}

/// PVC readiness failure: a `StorageReady=False` condition carrying failure
/// text. Legacy workspaces have no conditions, so this is `None` for them.
fn pvc_failure(workspace: &Workspace) -> Option<String> {
    workspace
        .conditions()
        .iter()
        .find(|c| {
            c.condition_type == STORAGE_READY_CONDITION && c.status.eq_ignore_ascii_case("false")
        })
        .and_then(|c| c.message.clone())
        .filter(|m| m.to_ascii_lowercase().contains("fail"))
}

#[cfg(test)]
#[path = "starting_tests.rs"]
mod tests;
