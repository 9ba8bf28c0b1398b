// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Backend client contracts for the Berth engine.
//!
//! The engine consumes the legacy REST API, the legacy WebSocket push
//! channel, and the DevWorkspace custom-resource API through the traits in
//! this crate. Production transports live outside the engine; the fakes here
//! record calls and let tests script failures.

pub mod devworkspace;
mod error;
pub mod legacy;
pub mod push;
pub mod traced;

pub use devworkspace::DevWorkspaceClient;
pub use error::{ClientError, ErrorData, ErrorResponse};
pub use legacy::{
    CreateParams, FactoryResolverResult, InfraNamespace, LegacyApiClient, ResolverError,
    StartParams, WorkspaceSettings,
};
pub use push::{OutputCallback, StatusCallback, StatusMessage, StatusPushClient};
pub use traced::{TracedDevWorkspaceClient, TracedLegacyApi};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use devworkspace::{DevWorkspaceCall, FakeDevWorkspaceClient};
#[cfg(any(test, feature = "test-support"))]
pub use legacy::{FakeLegacyApi, LegacyCall};
#[cfg(any(test, feature = "test-support"))]
pub use push::{FakePushClient, PushCall};
