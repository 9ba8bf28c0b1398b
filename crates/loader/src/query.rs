// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Factory query-string parsing.
//!
//! A factory URL carries the source `url`, an optional creation policy,
//! whitelisted attributes to persist on the created workspace, and
//! `override.*` keys buffered separately as devfile-override instructions.

use indexmap::IndexMap;
use std::fmt;
use url::form_urlencoded;

/// Query attribute carrying the creation policy.
pub const CREATE_POLICY_ATTR: &str = "policies.create";
/// Prefix marking devfile-override instructions.
pub const OVERRIDE_PREFIX: &str = "override.";
/// Query attribute keys persisted onto the created workspace. Everything
/// else (except `url`, `error_code`, and overrides) is dropped.
pub const PERSISTED_ATTRIBUTES: &[&str] = &[
    CREATE_POLICY_ATTR,
    "workspaceDeploymentLabels",
    "workspaceDeploymentAnnotations",
    "devfilePath",
    "editor",
];

/// Workspace creation policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreatePolicy {
    /// Always create a new workspace.
    #[default]
    PerClick,
    /// Reuse an existing workspace created from the same factory URL.
    PerUser,
}

impl CreatePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "perclick" => Some(Self::PerClick),
            "peruser" => Some(Self::PerUser),
            _ => None,
        }
    }
}

impl fmt::Display for CreatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerClick => write!(f, "perclick"),
            Self::PerUser => write!(f, "peruser"),
        }
    }
}

/// Parsed factory query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactoryQuery {
    pub url: Option<String>,
    pub error_code: Option<String>,
    /// Whitelisted attributes, in query order.
    pub attributes: IndexMap<String, String>,
    /// `override.*` instructions with the prefix stripped.
    pub overrides: IndexMap<String, String>,
}

impl FactoryQuery {
    /// Creation policy from the attributes; `Err` carries the invalid value.
    pub fn policy(&self) -> Result<CreatePolicy, String> {
        match self.attributes.get(CREATE_POLICY_ATTR) {
            None => Ok(CreatePolicy::default()),
            Some(value) => CreatePolicy::parse(value).ok_or_else(|| value.clone()),
        }
    }

    /// Fully-qualified factory URL: the source URL with the persisted
    /// attributes appended. The `peruser` policy dedups on this value.
    pub fn stack_name(&self) -> Option<String> {
        let url = self.url.as_ref()?;
        if self.attributes.is_empty() {
            return Some(url.clone());
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.attributes {
            serializer.append_pair(key, value);
        }
        Some(format!("{}?{}", url, serializer.finish()))
    }
}

/// Parse a raw query string (without the leading `?`).
pub fn parse_factory_query(query: &str) -> FactoryQuery {
    let mut parsed = FactoryQuery::default();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let key = key.into_owned();
        let value = value.into_owned();
        match key.as_str() {
            "url" => parsed.url = Some(value),
            "error_code" => parsed.error_code = Some(value),
            _ if key.starts_with(OVERRIDE_PREFIX) => {
                let stripped = key[OVERRIDE_PREFIX.len()..].to_string();
                parsed.overrides.insert(stripped, value);
            }
            _ if PERSISTED_ATTRIBUTES.contains(&key.as_str()) => {
                parsed.attributes.insert(key, value);
            }
            _ => {
                tracing::debug!(key = %key, "dropping unsupported factory parameter");
            }
        }
    }
    parsed
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
