// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Factory loader pipeline.
//!
//! Resolves a source URL into a devfile, applies the creation policy, creates
//! or reuses a workspace, starts it, and navigates to the IDE. A query change
//! restarts the whole pipeline and clears prior error state. Failures after
//! the URL check are recoverable danger alerts that halt the pipeline at the
//! current step; nothing auto-retries.

use crate::query::{parse_factory_query, CreatePolicy, FactoryQuery};
use crate::router::{ide_path, load_factory_path, Router};
use berth_clients::{CreateParams, FactoryResolverResult, LegacyApiClient, ResolverError};
use berth_clients::DevWorkspaceClient;
use berth_core::legacy::STACK_NAME_ATTR;
use berth_core::storage::{apply_storage_type, attributes_to_type};
use berth_core::id::{IdGen, ShortId, UuidIdGen};
use berth_core::{
    Alert, AlertAction, AlertSink, Devfile, EngineConfig, RecoveryAction, StorageType,
    WorkspaceStatus,
};
use berth_engine::DualStore;
use std::sync::Arc;
use url::form_urlencoded;

/// Alert dedup key of the factory pipeline.
const ALERT_KEY: &str = "factory-loader";
const FAILED_TO_CREATE: &str = "Failed to create the workspace";

/// Pipeline steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FactoryStep {
    Initializing = 0,
    CreateWorkspace = 1,
    LookingForDevfile = 2,
    ApplyingDevfile = 3,
    StartWorkspace = 4,
    OpenIde = 5,
}

/// What one pipeline pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryProgress {
    /// Advanced to the given step; call again.
    Advanced(FactoryStep),
    /// Waiting on the backend; poll again after a delay.
    Waiting,
    /// Halted at the current step behind an alert.
    Blocked,
    /// Redirected the window (OAuth); the pipeline ends here.
    Redirected,
    /// IDE route reached.
    Done,
}

/// The factory loader orchestrator.
pub struct FactoryLoader<L, D, R, A> {
    store: Arc<DualStore<L, D>>,
    api: Arc<L>,
    router: Arc<R>,
    alerts: Arc<A>,
    config: EngineConfig,
    /// Redirect-back URL appended to OAuth redirects.
    self_url: String,
    /// Bearer token appended to OAuth redirects when available.
    token: Option<String>,
    preferred_storage: Option<StorageType>,

    step: FactoryStep,
    prior_query: Option<String>,
    query: FactoryQuery,
    error: Option<String>,
    access_denied_alerted: bool,
    resolver: Option<FactoryResolverResult>,
    workspace_id: Option<String>,
}

impl<L, D, R, A> FactoryLoader<L, D, R, A>
where
    L: LegacyApiClient,
    D: DevWorkspaceClient,
    R: Router,
    A: AlertSink,
{
    pub fn new(
        store: Arc<DualStore<L, D>>,
        router: Arc<R>,
        alerts: Arc<A>,
        config: EngineConfig,
        self_url: impl Into<String>,
        token: Option<String>,
        preferred_storage: Option<StorageType>,
    ) -> Self {
        let api = store.legacy.client();
        Self {
            store,
            api,
            router,
            alerts,
            config,
            self_url: self_url.into(),
            token,
            preferred_storage,
            step: FactoryStep::Initializing,
            prior_query: None,
            query: FactoryQuery::default(),
            error: None,
            access_denied_alerted: false,
            resolver: None,
            workspace_id: None,
        }
    }

    pub fn step(&self) -> FactoryStep {
        self.step
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn reset(&mut self, query: &str) {
        self.prior_query = Some(query.to_string());
        self.query = parse_factory_query(query);
        self.step = FactoryStep::Initializing;
        self.error = None;
        self.access_denied_alerted = false;
        self.resolver = None;
        self.workspace_id = None;
    }

    fn block(&mut self, body: impl Into<String>, actions: Vec<AlertAction>) -> FactoryProgress {
        let body = body.into();
        self.alerts.notify(
            Alert::danger(ALERT_KEY, FAILED_TO_CREATE, body.clone()).with_actions(actions),
        );
        self.error = Some(body);
        FactoryProgress::Blocked
    }

    fn advance(&mut self, step: FactoryStep) -> FactoryProgress {
        self.step = step;
        FactoryProgress::Advanced(step)
    }

    /// Run one pipeline pass.
    ///
    /// A changed query restarts the pipeline from `Initializing`; an
    /// unchanged query with a latched error stays blocked until the host
    /// resolves it.
    pub async fn process_once(&mut self, query: &str) -> FactoryProgress {
        if self.prior_query.as_deref() != Some(query) {
            self.reset(query);
        }
        if self.error.is_some() {
            return FactoryProgress::Blocked;
        }
        match self.step {
            FactoryStep::Initializing => self.initialize(),
            FactoryStep::CreateWorkspace => self.check_source(),
            FactoryStep::LookingForDevfile => self.resolve_devfile().await,
            FactoryStep::ApplyingDevfile => self.apply_devfile().await,
            FactoryStep::StartWorkspace => self.start_workspace().await,
            FactoryStep::OpenIde => self.open_ide(),
        }
    }

    /// Drive the pipeline to completion, polling while the workspace starts.
    pub async fn run(&mut self, query: &str) -> FactoryProgress {
        let deadline = tokio::time::Instant::now() + self.config.start_timeout;
        loop {
            match self.process_once(query).await {
                FactoryProgress::Advanced(_) => {}
                FactoryProgress::Waiting => {
                    if tokio::time::Instant::now() >= deadline {
                        let secs = self.config.start_timeout.as_secs();
                        return self.block(
                            format!("The workspace did not start in the last {} seconds.", secs),
                            Vec::new(),
                        );
                    }
                    tokio::time::sleep(self.config.poll_interval).await;
                }
                terminal => return terminal,
            }
        }
    }

    /// Handle an alert recovery action.
    pub fn handle_action(&mut self, action: RecoveryAction) {
        if action != RecoveryAction::TryAgain {
            return;
        }
        // Strip the error code and reload the route.
        let stripped = self
            .prior_query
            .as_deref()
            .map(strip_error_code)
            .unwrap_or_default();
        self.error = None;
        self.router.navigate(&load_factory_path(&stripped));
    }

    fn initialize(&mut self) -> FactoryProgress {
        match self.query.error_code.as_deref() {
            Some("invalid_request") => self.block(
                "Invalid request: the factory URL could not be processed.",
                vec![AlertAction::try_again()],
            ),
            Some("access_denied") => {
                if self.access_denied_alerted {
                    self.error = Some("access_denied".to_string());
                    return FactoryProgress::Blocked;
                }
                self.access_denied_alerted = true;
                self.block(
                    "Access denied by the authentication provider.",
                    vec![AlertAction::try_again()],
                )
            }
            _ => self.advance(FactoryStep::CreateWorkspace),
        }
    }

    fn check_source(&mut self) -> FactoryProgress {
        if self.query.url.is_none() {
            // Terminal: the pipeline stays at CreateWorkspace.
            return self.block("Repository/Devfile URL is missing.", Vec::new());
        }
        if let Err(value) = self.query.policy() {
            return self.block(
                format!("Invalid creation policy \"{}\".", value),
                Vec::new(),
            );
        }
        self.advance(FactoryStep::LookingForDevfile)
    }

    async fn resolve_devfile(&mut self) -> FactoryProgress {
        let Some(url) = self.query.url.clone() else {
            return self.block("Repository/Devfile URL is missing.", Vec::new());
        };
        match self.api.get_factory_resolver(&url, &self.query.overrides).await {
            Ok(result) => {
                if result.location != url {
                    // A location mismatch after an async resolve is stale.
                    return self.block(
                        format!("Failed to resolve a devfile for \"{}\".", url),
                        Vec::new(),
                    );
                }
                self.resolver = Some(result);
                self.advance(FactoryStep::ApplyingDevfile)
            }
            Err(ResolverError::OAuthRequired {
                provider,
                authentication_url,
            }) => self.redirect_to_oauth(&provider, &authentication_url).await,
            Err(ResolverError::Api(e)) => self.block(e.normalized(), Vec::new()),
        }
    }

    async fn redirect_to_oauth(&mut self, provider: &str, authentication_url: &str) -> FactoryProgress {
        // A sole unprovisioned infrastructure namespace cannot host the
        // workspace after login; resolution is blocked instead of redirected.
        if let Ok(namespaces) = self.api.get_infrastructure_namespaces().await {
            if namespaces.len() == 1 && !namespaces[0].provisioned {
                return self.block(
                    "The infrastructure namespace is not provisioned yet. Please contact the cluster administrator.",
                    Vec::new(),
                );
            }
        }
        let mut redirect = format!(
            "{}?redirect_after_login={}",
            authentication_url, self.self_url
        );
        if let Some(token) = &self.token {
            redirect.push_str("&token=");
            redirect.push_str(token);
        }
        tracing::info!(provider, "redirecting for authentication");
        self.router.redirect(&redirect);
        FactoryProgress::Redirected
    }

    async fn apply_devfile(&mut self) -> FactoryProgress {
        let Some(resolver) = self.resolver.clone() else {
            return self.block("No resolved devfile.", Vec::new());
        };
        let mut devfile = resolver.devfile;
        if !devfile.has_persistence_attributes() {
            if let Some(preferred) = self.preferred_storage {
                apply_storage_type(&mut devfile, preferred);
            }
        }
        if attributes_to_type(&devfile.attributes) == StorageType::Ephemeral {
            // Non-blocking notice; the pipeline continues.
            self.alerts.notify(Alert::warning(
                format!("{}-ephemeral", ALERT_KEY),
                "Ephemeral storage",
                "The workspace uses ephemeral storage: any changes will be lost when it stops.",
            ));
        }

        let policy = self.query.policy().unwrap_or_default();
        let stack_name = self.query.stack_name();
        if policy == CreatePolicy::PerUser {
            if let Some(existing) = self.find_existing(stack_name.as_deref()) {
                tracing::info!(workspace_id = %existing, "reusing existing workspace (peruser)");
                self.workspace_id = Some(existing);
                return self.advance(FactoryStep::StartWorkspace);
            }
        }

        let mut attributes = self.query.attributes.clone();
        if let Some(stack) = stack_name {
            attributes.insert(STACK_NAME_ATTR.to_string(), stack);
        }
        ensure_name(&mut devfile);
        let params = CreateParams {
            attributes,
            namespace: None,
            infrastructure_namespace: None,
        };
        match self.store.legacy.create_from_devfile(devfile, params).await {
            Ok(workspace) => {
                self.workspace_id = Some(workspace.id);
                self.advance(FactoryStep::StartWorkspace)
            }
            Err(e) => self.block(e.to_string(), Vec::new()),
        }
    }

    fn find_existing(&self, stack_name: Option<&str>) -> Option<String> {
        let stack_name = stack_name?;
        self.store.lock_state(|state| {
            state
                .legacy
                .workspaces
                .iter()
                .find(|w| w.attributes.get(STACK_NAME_ATTR).map(String::as_str) == Some(stack_name))
                .map(|w| w.id.clone())
        })
    }

    async fn start_workspace(&mut self) -> FactoryProgress {
        let Some(id) = self.workspace_id.clone() else {
            return self.block("No workspace to start.", Vec::new());
        };
        // Refresh the record so each pass sees the current phase.
        let _ = self.store.legacy.request_one(&id).await;
        let Some(workspace) = self.store.find_by_id(&id) else {
            return FactoryProgress::Waiting;
        };
        match workspace.status() {
            Some(WorkspaceStatus::Running) => self.advance(FactoryStep::OpenIde),
            Some(status) if status.is_startable() => {
                match self.store.legacy.start(&id, None).await {
                    Ok(()) => FactoryProgress::Waiting,
                    Err(e) => self.block(e.to_string(), Vec::new()),
                }
            }
            // Starting / stopping phases are progress, not errors.
            _ => FactoryProgress::Waiting,
        }
    }

    fn open_ide(&mut self) -> FactoryProgress {
        let Some(workspace) = self
            .workspace_id
            .as_deref()
            .and_then(|id| self.store.find_by_id(id))
        else {
            return self.block("No workspace to open.", Vec::new());
        };
        self.router
            .navigate(&ide_path(workspace.namespace(), workspace.name()));
        FactoryProgress::Done
    }
}

/// A resolved devfile may carry only `generateName`; the created workspace
/// needs a concrete name.
fn ensure_name(devfile: &mut Devfile) {
    if devfile.metadata.name.is_some() {
        return;
    }
    let generated = match &devfile.metadata.generate_name {
        Some(prefix) => format!("{}{}", prefix, short_suffix()),
        None => format!("wksp-{}", short_suffix()),
    };
    devfile.metadata.name = Some(generated);
}

fn short_suffix() -> String {
    UuidIdGen.next().short(4).to_string()
}

/// Remove the `error_code` parameter from a raw query string.
fn strip_error_code(query: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key != "error_code" {
            serializer.append_pair(&key, &value);
        }
    }
    serializer.finish()
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
