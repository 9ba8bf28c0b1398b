// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> Devfile {
    serde_json::from_value(serde_json::json!({
        "apiVersion": "1.0.0",
        "metadata": { "name": "wksp-demo" },
        "attributes": { "persistVolumes": "false" },
        "projects": [
            { "name": "demo", "source": { "type": "git", "location": "https://git.example.com/demo.git" } }
        ],
        "components": [
            { "type": "chePlugin", "id": "publisher/plugin/1.0.0" }
        ]
    }))
    .unwrap()
}

#[test]
fn deserializes_full_shape() {
    let devfile = sample();
    assert_eq!(devfile.name(), "wksp-demo");
    assert_eq!(devfile.projects.len(), 1);
    assert_eq!(devfile.components[0].component_type, "chePlugin");
}

#[test]
fn serde_round_trip() {
    let devfile = sample();
    let json = serde_json::to_value(&devfile).unwrap();
    let back: Devfile = serde_json::from_value(json).unwrap();
    assert_eq!(back, devfile);
}

#[test]
fn name_falls_back_to_empty() {
    let devfile = Devfile::default();
    assert_eq!(devfile.name(), "");
}

#[test]
fn persistence_attribute_detection() {
    assert!(sample().has_persistence_attributes());

    let mut devfile = Devfile::default();
    assert!(!devfile.has_persistence_attributes());

    devfile
        .attributes
        .insert(ASYNC_PERSIST_ATTR.to_string(), "true".to_string());
    assert!(devfile.has_persistence_attributes());
}

#[test]
fn empty_collections_are_skipped_in_json() {
    let json = serde_json::to_string(&Devfile::default()).unwrap();
    assert!(!json.contains("projects"));
    assert!(!json.contains("attributes"));
}
