// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Routing contract.
//!
//! The loaders never touch the address bar; they hand hash paths (or
//! external URLs) to a host-provided router.

use parking_lot::Mutex;
use std::sync::Arc;

/// Hash path of the IDE route.
pub fn ide_path(namespace: &str, workspace_name: &str) -> String {
    format!("/ide/{}/{}", namespace, workspace_name)
}

/// Hash path of the factory-loader route for a raw query string.
pub fn load_factory_path(query: &str) -> String {
    if query.is_empty() {
        "/load-factory".to_string()
    } else {
        format!("/load-factory?{}", query)
    }
}

/// Navigation consumer.
pub trait Router: Send + Sync {
    /// Navigate to an in-app hash path.
    fn navigate(&self, path: &str);

    /// Redirect the whole window to an external URL (OAuth, IDE).
    fn redirect(&self, url: &str);
}

/// Recorded router invocation.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterCall {
    Navigate(String),
    Redirect(String),
}

/// Recording router for tests.
#[cfg(any(test, feature = "test-support"))]
#[derive(Clone, Default)]
pub struct RecordingRouter {
    calls: Arc<Mutex<Vec<RouterCall>>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RouterCall> {
        self.calls.lock().clone()
    }

    pub fn last(&self) -> Option<RouterCall> {
        self.calls.lock().last().cloned()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Router for RecordingRouter {
    fn navigate(&self, path: &str) {
        self.calls.lock().push(RouterCall::Navigate(path.to_string()));
    }

    fn redirect(&self, url: &str) {
        self.calls.lock().push(RouterCall::Redirect(url.to_string()));
    }
}
