// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IDE loader.
//!
//! Resolves a named workspace, starts it if stopped, waits for a runtime IDE
//! URL, and redirects. A debounced re-evaluation loop re-runs the decision
//! procedure until the IDE opens or an unrecoverable error is set; switching
//! to a different workspace mid-flight resets all step and error state.

use crate::router::Router;
use berth_clients::{DevWorkspaceClient, LegacyApiClient, StartParams};
use berth_core::{Alert, AlertAction, AlertSink, EngineConfig, RecoveryAction, Workspace, WorkspaceStatus};
use berth_engine::store::selectors;
use berth_engine::{DualStore, ERROR_LOG_PREFIX};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const ALERT_KEY: &str = "ide-loader";
const FAILED_TO_OPEN: &str = "Failed to open the workspace";

/// Tab the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeTab {
    Progress,
    Logs,
}

/// What one evaluation pass decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeProgress {
    /// IDE reached; the loop ends.
    Done,
    /// Waiting on the backend; re-evaluate after the debounce delay.
    Waiting,
    /// Halted behind an alert until a recovery action clears it.
    Blocked,
}

/// Command delivered to a running loader loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdeCommand {
    Action(RecoveryAction),
    Retarget { namespace: String, name: String },
}

/// The IDE loader orchestrator.
pub struct IdeLoader<L, D, R, A> {
    store: Arc<DualStore<L, D>>,
    router: Arc<R>,
    alerts: Arc<A>,
    config: EngineConfig,

    namespace: String,
    name: String,
    refreshed_once: bool,
    start_issued: bool,
    verbose: bool,
    error: Option<String>,
    active_tab: IdeTab,
}

impl<L, D, R, A> IdeLoader<L, D, R, A>
where
    L: LegacyApiClient,
    D: DevWorkspaceClient,
    R: Router + 'static,
    A: AlertSink + 'static,
{
    pub fn new(
        store: Arc<DualStore<L, D>>,
        router: Arc<R>,
        alerts: Arc<A>,
        config: EngineConfig,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            router,
            alerts,
            config,
            namespace: namespace.into(),
            name: name.into(),
            refreshed_once: false,
            start_issued: false,
            verbose: false,
            error: None,
            active_tab: IdeTab::Progress,
        }
    }

    pub fn active_tab(&self) -> IdeTab {
        self.active_tab
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn block(&mut self, body: impl Into<String>, actions: Vec<AlertAction>) -> IdeProgress {
        let body = body.into();
        self.alerts.notify(
            Alert::danger(ALERT_KEY, FAILED_TO_OPEN, body.clone()).with_actions(actions),
        );
        self.error = Some(body);
        IdeProgress::Blocked
    }

    async fn find_target(&mut self) -> Option<Workspace> {
        let found = self
            .store
            .find_by_qualified_name(&self.namespace, &self.name);
        if found.is_some() {
            return found;
        }
        if self.refreshed_once {
            return None;
        }
        // One-time list refresh before declaring the workspace missing.
        self.refreshed_once = true;
        let _ = self.store.legacy.request_all().await;
        let _ = self.store.dev.request_all(&self.namespace).await;
        self.store
            .find_by_qualified_name(&self.namespace, &self.name)
    }

    async fn issue_start(&mut self, workspace: &Workspace) -> IdeProgress {
        self.start_issued = true;
        let result = match workspace {
            Workspace::Legacy(w) => {
                let params = StartParams {
                    debug_workspace_start: self.verbose,
                };
                self.store.legacy.start(&w.id, Some(params)).await
            }
            Workspace::DevWorkspace(r) => {
                self.store
                    .dev
                    .start(&r.metadata.namespace, &r.metadata.name)
                    .await
            }
        };
        match result {
            Ok(()) => IdeProgress::Waiting,
            Err(e) => {
                self.start_issued = false;
                self.block(e.to_string(), Vec::new())
            }
        }
    }

    /// Run one pass of the decision procedure.
    pub async fn evaluate_once(&mut self) -> IdeProgress {
        if self.error.is_some() {
            return IdeProgress::Blocked;
        }
        let Some(workspace) = self.find_target().await else {
            return self.block(
                format!("Workspace \"{}/{}\" not found.", self.namespace, self.name),
                Vec::new(),
            );
        };
        match workspace.status() {
            Some(WorkspaceStatus::Running) => match workspace.ide_url() {
                Some(url) => {
                    self.router.redirect(&url);
                    IdeProgress::Done
                }
                // Running but the IDE server is not reachable yet.
                None => {
                    self.refresh(&workspace).await;
                    IdeProgress::Waiting
                }
            },
            Some(WorkspaceStatus::Error) => {
                let body = self
                    .parse_error_from_logs(&workspace)
                    .unwrap_or_else(|| "Unknown error.".to_string());
                self.block(
                    body,
                    vec![AlertAction::open_in_verbose_mode(), AlertAction::open_logs()],
                )
            }
            Some(WorkspaceStatus::Stopped) | Some(WorkspaceStatus::Failed) => {
                if self.start_issued {
                    self.refresh(&workspace).await;
                    IdeProgress::Waiting
                } else {
                    self.issue_start(&workspace).await
                }
            }
            // Starting / stopping / unknown phases: keep polling.
            _ => {
                self.refresh(&workspace).await;
                IdeProgress::Waiting
            }
        }
    }

    async fn refresh(&self, workspace: &Workspace) {
        match workspace {
            Workspace::Legacy(w) => {
                let _ = self.store.legacy.request_one(&w.id).await;
            }
            Workspace::DevWorkspace(r) => {
                let _ = self
                    .store
                    .dev
                    .request_one(&r.metadata.namespace, &r.metadata.name)
                    .await;
            }
        }
    }

    /// Failure reason from the most recent matching runtime log line,
    /// stripped of the known error prefix and surrounding quotes.
    fn parse_error_from_logs(&self, workspace: &Workspace) -> Option<String> {
        let id = workspace.id()?.to_string();
        self.store.lock_state(|state| {
            selectors::logs_for(state, &id)
                .iter()
                .rev()
                .find_map(|line| {
                    let rest = line.strip_prefix(ERROR_LOG_PREFIX)?;
                    Some(rest.trim_matches('"').to_string())
                })
        })
    }

    /// Handle a command (recovery action or retarget).
    pub async fn handle_command(&mut self, command: IdeCommand) {
        match command {
            IdeCommand::Retarget { namespace, name } => {
                if namespace == self.namespace && name == self.name {
                    return;
                }
                tracing::info!(
                    from = %format!("{}/{}", self.namespace, self.name),
                    to = %format!("{}/{}", namespace, name),
                    "retargeting ide loader"
                );
                self.namespace = namespace;
                self.name = name;
                self.refreshed_once = false;
                self.start_issued = false;
                self.verbose = false;
                self.error = None;
                self.active_tab = IdeTab::Progress;
            }
            IdeCommand::Action(RecoveryAction::OpenInVerboseMode) => {
                self.verbose = true;
                self.error = None;
                self.start_issued = false;
                self.active_tab = IdeTab::Logs;
                let Some(workspace) = self
                    .store
                    .find_by_qualified_name(&self.namespace, &self.name)
                else {
                    return;
                };
                // Stale logs would mix with the verbose start's fresh output.
                if let Some(id) = workspace.id() {
                    let id = id.to_string();
                    self.store.lock_state_mut(|state| {
                        state.legacy.clear_logs(&id);
                        state.dev.logs.remove(&id);
                        state.dev.last_messages.remove(&id);
                    });
                }
                let _ = self.issue_start(&workspace).await;
            }
            IdeCommand::Action(RecoveryAction::OpenLogs) => {
                self.active_tab = IdeTab::Logs;
            }
            IdeCommand::Action(_) => {}
        }
    }

    /// Spawn the debounced re-evaluation loop.
    ///
    /// The loop re-runs the decision procedure on a fixed delay until the IDE
    /// opens; blocked states wait for a command. The handle aborts the task
    /// (and its timer) on stop or drop.
    pub fn spawn(mut self) -> IdeLoaderHandle {
        let (commands_tx, mut commands_rx) = mpsc::unbounded_channel();
        let debounce = self.config.ide_loader_debounce;
        let task = tokio::spawn(async move {
            let mut tick = tokio::time::interval(debounce);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if self.evaluate_once().await == IdeProgress::Done {
                            break;
                        }
                    }
                    command = commands_rx.recv() => {
                        match command {
                            Some(command) => self.handle_command(command).await,
                            None => break,
                        }
                    }
                }
            }
        });
        IdeLoaderHandle { task, commands: commands_tx }
    }
}

/// Handle on a running IDE loader loop.
pub struct IdeLoaderHandle {
    task: JoinHandle<()>,
    commands: mpsc::UnboundedSender<IdeCommand>,
}

impl IdeLoaderHandle {
    /// Deliver a command to the loop. Returns false once the loop has ended.
    pub fn send(&self, command: IdeCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for IdeLoaderHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "ide_tests.rs"]
mod tests;
