//! Starting-workspace state machine specs.

use crate::prelude::*;
use berth_clients::DevWorkspaceCall;
use berth_core::devworkspace::Condition;
use berth_core::{RecoveryAction, Workspace, WorkspaceUid};
use berth_engine::{DriverSignal, RestartTracker, StartingStep, StepDriver};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

struct Machine {
    world: World,
    tracker: Arc<RestartTracker>,
    restarts_rx: mpsc::UnboundedReceiver<berth_engine::RestartRequest>,
    driver: StepDriver<StartingStep<TestStore>>,
}

fn machine(start_timeout_secs: u64) -> Machine {
    let world = world();
    let tracker = Arc::new(RestartTracker::new());
    let (restarts_tx, restarts_rx) = mpsc::unbounded_channel();
    let step = StartingStep::new(
        Arc::clone(&world.store),
        Arc::new(world.alerts.clone()),
        Arc::clone(&tracker),
        restarts_tx,
        Duration::from_secs(start_timeout_secs),
        None,
    );
    Machine {
        world,
        tracker,
        restarts_rx,
        driver: StepDriver::new(step),
    }
}

fn start_calls(world: &World) -> usize {
    world
        .dev
        .calls()
        .iter()
        .filter(|c| matches!(c, DevWorkspaceCall::ChangeStatus { started: true, .. }))
        .count()
}

fn stop_calls(world: &World) -> usize {
    world
        .dev
        .calls()
        .iter()
        .filter(|c| matches!(c, DevWorkspaceCall::ChangeStatus { started: false, .. }))
        .count()
}

fn seeded_workspace(machine: &Machine, phase: &str) -> Workspace {
    // keep the backend's view consistent with the snapshot under evaluation
    if machine.world.dev.get_resource("user-che", "demo").is_none() {
        machine.world.dev.add_resource(dev_resource("user-che", "demo", phase));
    } else {
        machine.world.dev.set_phase("user-che", "demo", phase);
    }
    dev_workspace("user-che", "demo", phase)
}

#[tokio::test]
async fn stopped_to_running_issues_one_start_and_advances() {
    let mut m = machine(300);

    let stopped = seeded_workspace(&m, "Stopped");
    assert_eq!(m.driver.poll(0, &stopped).await, DriverSignal::Held);

    // repeated renders with an unchanged snapshot: no duplicate backend calls
    assert_eq!(m.driver.poll(0, &stopped).await, DriverSignal::Unchanged);
    assert_eq!(m.driver.poll(0, &stopped).await, DriverSignal::Unchanged);

    let starting = seeded_workspace(&m, "Starting");
    assert_eq!(m.driver.poll(0, &starting).await, DriverSignal::Held);

    let running = seeded_workspace(&m, "Running");
    assert_eq!(m.driver.poll(0, &running).await, DriverSignal::Advanced);

    assert_eq!(start_calls(&m.world), 1);
    assert_eq!(stop_calls(&m.world), 0);
    assert!(m.world.alerts.alerts().is_empty());
}

#[tokio::test]
async fn starting_then_failed_raises_exactly_one_alert() {
    let mut m = machine(300);

    let starting = seeded_workspace(&m, "Starting");
    m.driver.poll(0, &starting).await;
    let failed = seeded_workspace(&m, "Failed");
    assert!(matches!(m.driver.poll(0, &failed).await, DriverSignal::Faulted(_)));
    // re-render: suppressed, not re-alerted
    assert_eq!(m.driver.poll(0, &failed).await, DriverSignal::Suppressed);

    let alerts = m.world.alerts.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Failed to open the workspace");
    assert_eq!(
        alerts[0].body,
        "The workspace status changed unexpectedly to \"Failed\"."
    );
    let titles: Vec<&str> = alerts[0].actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Restart", "Restart with default devfile"]);
}

#[tokio::test]
async fn pvc_error_restart_defers_start_until_stopped() {
    let mut m = machine(300);

    let mut starting = seeded_workspace(&m, "Starting");
    if let Workspace::DevWorkspace(resource) = &mut starting {
        if let Some(status) = resource.status.as_mut() {
            status.conditions = vec![Condition {
                condition_type: "StorageReady".to_string(),
                status: "False".to_string(),
                message: Some("PVC provisioning failed".to_string()),
            }];
        }
    }

    // one alert with a Restart action
    assert!(matches!(m.driver.poll(0, &starting).await, DriverSignal::Faulted(_)));
    let alerts = m.world.alerts.alerts();
    assert_eq!(alerts.len(), 1);
    let titles: Vec<&str> = alerts[0].actions.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["Restart"]);

    // invoking Restart stops exactly once and does not call the external
    // restart callback
    m.driver
        .step_mut()
        .handle_action(RecoveryAction::Restart, &starting)
        .await
        .unwrap();
    m.driver.retry();
    assert_eq!(stop_calls(&m.world), 1);
    assert!(m.restarts_rx.try_recv().is_err());

    let uid = WorkspaceUid::new("uid-demo");
    assert!(m.tracker.is_in_flight(&uid));

    // once STOPPED is observed, the start is issued and the marker cleared
    let stopped = seeded_workspace(&m, "Stopped");
    assert_eq!(m.driver.poll(0, &stopped).await, DriverSignal::Held);
    assert_eq!(start_calls(&m.world), 1);
    assert!(!m.tracker.is_in_flight(&uid));
}

#[tokio::test]
async fn timeout_body_carries_configured_budget() {
    let mut m = machine(42);

    let starting = seeded_workspace(&m, "Starting");
    m.driver.poll(0, &starting).await;

    let fault = m.driver.step_mut().on_timeout(&starting).unwrap();
    m.driver.fail(fault);

    let alerts = m.world.alerts.alerts();
    assert_eq!(
        alerts[0].body,
        "The workspace status remains \"Starting\" in the last 42 seconds."
    );
}

#[tokio::test]
async fn restart_marker_window_matches_stop_and_start() {
    let mut m = machine(300);
    let uid = WorkspaceUid::new("uid-demo");
    let running = seeded_workspace(&m, "Running");

    // restart from a running workspace: marker true right after stop issued
    m.driver
        .step_mut()
        .handle_action(RecoveryAction::Restart, &running)
        .await
        .unwrap();
    assert!(m.tracker.is_in_flight(&uid));
    assert_eq!(stop_calls(&m.world), 1);

    // marker false right after the corresponding start
    let stopped = seeded_workspace(&m, "Stopped");
    m.driver.poll(0, &stopped).await;
    assert!(!m.tracker.is_in_flight(&uid));
    assert_eq!(start_calls(&m.world), 1);
}
