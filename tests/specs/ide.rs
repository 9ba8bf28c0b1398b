//! IDE loader specs.

use crate::prelude::*;
use berth_clients::LegacyCall;
use berth_core::EngineConfig;
use berth_loader::{IdeLoader, IdeProgress, RecordingRouter};
use std::sync::Arc;

fn loader(
    world: &World,
    router: &RecordingRouter,
    namespace: &str,
    name: &str,
) -> IdeLoader<
    berth_clients::FakeLegacyApi,
    berth_clients::FakeDevWorkspaceClient,
    RecordingRouter,
    berth_core::RecordingAlertSink,
> {
    IdeLoader::new(
        Arc::clone(&world.store),
        Arc::new(router.clone()),
        Arc::new(world.alerts.clone()),
        EngineConfig::default(),
        namespace,
        name,
    )
}

#[tokio::test]
async fn workspace_not_found_alert_without_any_calls() {
    let world = world();
    let router = RecordingRouter::new();
    let mut ide = loader(&world, &router, "che-user", "ghost");

    assert_eq!(ide.evaluate_once().await, IdeProgress::Blocked);

    let alerts = world.alerts.alerts();
    assert_eq!(alerts[0].title, "Failed to open the workspace");
    assert_eq!(alerts[0].body, "Workspace \"che-user/ghost\" not found.");

    // neither a start nor a navigation happened
    assert_eq!(
        world.api.count_calls(|c| matches!(c, LegacyCall::Start { .. })),
        0
    );
    assert!(router.calls().is_empty());
}

#[tokio::test]
async fn stopped_workspace_is_started_once() {
    let world = world();
    let router = RecordingRouter::new();
    world
        .api
        .add_workspace(legacy_workspace("ws-1", "che-user", "demo", "STOPPED"));
    world.store.legacy.request_all().await.unwrap();

    let mut ide = loader(&world, &router, "che-user", "demo");
    assert_eq!(ide.evaluate_once().await, IdeProgress::Waiting);
    assert_eq!(ide.evaluate_once().await, IdeProgress::Waiting);

    assert_eq!(
        world.api.count_calls(|c| matches!(c, LegacyCall::Start { .. })),
        1
    );
}
