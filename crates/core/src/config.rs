// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine tunables loaded from `berth.toml`.
//!
//! A missing or unparseable file falls back to defaults; individual keys
//! override individually. The DevWorkspace poll interval lives here rather
//! than as a hard-coded tick — the 1-second default is a stand-in pending
//! native push support in that backend.

use std::path::Path;
use std::time::Duration;

/// Engine timing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// DevWorkspace status poll tick.
    pub poll_interval: Duration,
    /// Budget for a workspace to leave `STARTING` before the timeout alert.
    pub start_timeout: Duration,
    /// Minimum time a progress step stays on screen.
    pub min_step_duration: Duration,
    /// Delay between IDE-loader re-evaluation passes.
    pub ide_loader_debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(1_000),
            start_timeout: Duration::from_secs(300),
            min_step_duration: Duration::from_millis(5_000),
            ide_loader_debounce: Duration::from_millis(1_000),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a `berth.toml` file.
    ///
    /// Reads the `[engine]` table; missing file, parse failure, or missing
    /// keys all fall back to defaults.
    pub fn load(path: &Path) -> Self {
        let mut config = Self::default();
        let Some(table) = read_engine_table(path) else {
            return config;
        };
        if let Some(ms) = read_ms(&table, "poll_interval_ms") {
            config.poll_interval = ms;
        }
        if let Some(secs) = table.get("start_timeout_secs").and_then(toml::Value::as_integer) {
            if secs > 0 {
                config.start_timeout = Duration::from_secs(secs as u64);
            }
        }
        if let Some(ms) = read_ms(&table, "min_step_duration_ms") {
            config.min_step_duration = ms;
        }
        if let Some(ms) = read_ms(&table, "ide_loader_debounce_ms") {
            config.ide_loader_debounce = ms;
        }
        config
    }
}

fn read_engine_table(path: &Path) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    let table: toml::Table = content.parse().ok()?;
    table.get("engine")?.as_table().cloned()
}

fn read_ms(table: &toml::Table, key: &str) -> Option<Duration> {
    let ms = table.get(key)?.as_integer()?;
    if ms > 0 {
        Some(Duration::from_millis(ms as u64))
    } else {
        None
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
