//! Workspace identity adapter specs.

use crate::prelude::*;
use berth_core::{Workspace, WorkspaceStatus};

#[test]
fn shape_detection_is_structural() {
    let legacy = serde_json::to_value(legacy_workspace("ws-1", "che", "demo", "STOPPED")).unwrap();
    assert!(!Workspace::from_value(legacy).unwrap().is_dev_workspace());

    let dev = serde_json::to_value(dev_resource("user-che", "demo", "Stopped")).unwrap();
    assert!(Workspace::from_value(dev).unwrap().is_dev_workspace());

    assert!(Workspace::from_value(serde_json::json!({"unrelated": true})).is_err());
}

#[test]
fn legacy_failed_maps_to_error_devworkspace_keeps_failed() {
    let legacy = Workspace::Legacy(legacy_workspace("ws-1", "che", "demo", "FAILED"));
    assert_eq!(legacy.status(), Some(WorkspaceStatus::Error));

    let dev = dev_workspace("user-che", "demo", "Failed");
    assert_eq!(dev.status(), Some(WorkspaceStatus::Failed));
}

#[test]
fn devworkspace_devfile_writes_are_dropped() {
    let mut workspace = dev_workspace("user-che", "demo", "Stopped");
    let before = workspace.devfile().clone();
    workspace.set_devfile(berth_core::Devfile::default());
    assert_eq!(workspace.devfile(), &before);
}
