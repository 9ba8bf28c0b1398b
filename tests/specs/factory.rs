//! Factory loader specs.

use crate::prelude::*;
use berth_clients::FactoryResolverResult;
use berth_core::EngineConfig;
use berth_loader::{FactoryLoader, FactoryProgress, FactoryStep, RecordingRouter, RouterCall};
use std::sync::Arc;

fn loader(
    world: &World,
    router: &RecordingRouter,
) -> FactoryLoader<
    berth_clients::FakeLegacyApi,
    berth_clients::FakeDevWorkspaceClient,
    RecordingRouter,
    berth_core::RecordingAlertSink,
> {
    FactoryLoader::new(
        Arc::clone(&world.store),
        Arc::new(router.clone()),
        Arc::new(world.alerts.clone()),
        EngineConfig::default(),
        "https://dashboard.example.com/load-factory",
        None,
        None,
    )
}

#[tokio::test]
async fn missing_url_halts_at_create_workspace() {
    let world = world();
    let router = RecordingRouter::new();
    let mut factory = loader(&world, &router);

    factory.process_once("").await;
    assert_eq!(factory.process_once("").await, FactoryProgress::Blocked);

    assert_eq!(factory.step(), FactoryStep::CreateWorkspace);
    let alerts = world.alerts.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].body.contains("Repository/Devfile URL is missing."));
}

#[tokio::test]
async fn full_pipeline_creates_starts_and_opens_ide() {
    let world = world();
    let router = RecordingRouter::new();
    let mut factory = loader(&world, &router);

    let url = "https://git.example.com/demo.git";
    let mut devfile = berth_core::Devfile::default();
    devfile.metadata.name = Some("demo".to_string());
    world.api.set_resolver_result(Ok(FactoryResolverResult {
        location: url.to_string(),
        source: Some("devfile.yaml".to_string()),
        devfile,
        ..Default::default()
    }));

    let query = format!("url={}", url);
    // drive to the start step
    for _ in 0..4 {
        factory.process_once(&query).await;
    }
    assert_eq!(factory.step(), FactoryStep::StartWorkspace);
    assert_eq!(factory.process_once(&query).await, FactoryProgress::Waiting);

    // the backend reaches RUNNING; the loader navigates to the IDE route
    world.api.set_status("workspace-1", "RUNNING");
    assert_eq!(
        factory.process_once(&query).await,
        FactoryProgress::Advanced(FactoryStep::OpenIde)
    );
    assert_eq!(factory.process_once(&query).await, FactoryProgress::Done);
    assert_eq!(
        router.last(),
        Some(RouterCall::Navigate("/ide/che/demo".to_string()))
    );
}
