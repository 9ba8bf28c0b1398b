//! Shared fixtures for the behavioral specs.

#![allow(dead_code)]

use berth_clients::{FakeDevWorkspaceClient, FakeLegacyApi};
use berth_core::devworkspace::{
    DevWorkspaceMetadata, DevWorkspaceResource, DevWorkspaceSpec, DevWorkspaceStatus,
};
use berth_core::{Devfile, LegacyWorkspace, RecordingAlertSink, Workspace};
use berth_engine::DualStore;
use std::sync::Arc;

pub type TestStore = DualStore<FakeLegacyApi, FakeDevWorkspaceClient>;

pub struct World {
    pub store: Arc<TestStore>,
    pub api: FakeLegacyApi,
    pub dev: FakeDevWorkspaceClient,
    pub alerts: RecordingAlertSink,
}

pub fn world() -> World {
    let api = FakeLegacyApi::new();
    let dev = FakeDevWorkspaceClient::new();
    let store = Arc::new(DualStore::new(Arc::new(api.clone()), Arc::new(dev.clone())));
    World {
        store,
        api,
        dev,
        alerts: RecordingAlertSink::new(),
    }
}

pub fn legacy_workspace(id: &str, namespace: &str, name: &str, status: &str) -> LegacyWorkspace {
    let mut devfile = Devfile::default();
    devfile.metadata.name = Some(name.to_string());
    LegacyWorkspace {
        id: id.to_string(),
        status: status.to_string(),
        namespace: namespace.to_string(),
        devfile,
        ..Default::default()
    }
}

pub fn dev_resource(namespace: &str, name: &str, phase: &str) -> DevWorkspaceResource {
    DevWorkspaceResource {
        kind: "DevWorkspace".to_string(),
        metadata: DevWorkspaceMetadata {
            name: name.to_string(),
            namespace: namespace.to_string(),
            uid: format!("uid-{}", name),
            ..Default::default()
        },
        spec: DevWorkspaceSpec::default(),
        status: Some(DevWorkspaceStatus {
            phase: phase.to_string(),
            devworkspace_id: format!("dw-{}", name),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn dev_workspace(namespace: &str, name: &str, phase: &str) -> Workspace {
    Workspace::DevWorkspace(dev_resource(namespace, name, phase))
}
