// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn action_titles() {
    assert_eq!(AlertAction::restart().title, "Restart");
    assert_eq!(
        AlertAction::restart_with_default_devfile().title,
        "Restart with default devfile"
    );
    assert_eq!(AlertAction::open_in_verbose_mode().title, "open in verbose mode");
    assert_eq!(AlertAction::open_logs().title, "open logs");
}

#[test]
fn recording_sink_keeps_order() {
    let sink = RecordingAlertSink::new();
    sink.notify(Alert::danger("k1", "first", "b1"));
    sink.notify(Alert::warning("k2", "second", "b2"));

    let alerts = sink.alerts();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].title, "first");
    assert_eq!(alerts[1].variant, AlertVariant::Warning);

    assert_eq!(sink.take().len(), 2);
    assert!(sink.alerts().is_empty());
}

#[test]
fn builder_attaches_actions() {
    let alert = Alert::danger("k", "t", "b")
        .with_actions(vec![AlertAction::restart(), AlertAction::restart_with_default_devfile()]);
    assert_eq!(alert.actions.len(), 2);
    assert_eq!(alert.actions[0].action, RecoveryAction::Restart);
}
