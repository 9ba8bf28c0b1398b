// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend failure shape and error normalization.
//!
//! Clients reject with an object exposing either a transport `message`, a
//! `response` with a status code and optional body message, or both. The
//! normalization chain lets orchestrators display failures without
//! inspecting transport details.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure raised by a backend client call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientError {
    /// Transport-level message (connection refused, timeout, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// HTTP response details when the server answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ErrorResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub data: ErrorData,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ClientError {
    /// Transport failure with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            response: None,
        }
    }

    /// Server response without a parsed body message.
    pub fn response(code: u16, status_text: impl Into<String>) -> Self {
        Self {
            message: None,
            response: Some(ErrorResponse {
                code,
                status_text: status_text.into(),
                data: ErrorData::default(),
            }),
        }
    }

    /// Server response whose body carried a message.
    pub fn response_with_message(
        code: u16,
        status_text: impl Into<String>,
        data_message: impl Into<String>,
    ) -> Self {
        Self {
            message: None,
            response: Some(ErrorResponse {
                code,
                status_text: status_text.into(),
                data: ErrorData {
                    message: Some(data_message.into()),
                },
            }),
        }
    }

    /// Human-readable failure reason.
    ///
    /// Precedence: response body message, transport message, synthesized
    /// `"Response code X, Y"`, `"Unknown error."`.
    pub fn normalized(&self) -> String {
        if let Some(response) = &self.response {
            if let Some(message) = &response.data.message {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
        if let Some(message) = &self.message {
            if !message.is_empty() {
                return message.clone();
            }
        }
        if let Some(response) = &self.response {
            return format!("Response code {}, {}", response.code, response.status_text);
        }
        "Unknown error.".to_string()
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized())
    }
}

impl std::error::Error for ClientError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
