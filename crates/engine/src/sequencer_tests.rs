// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

/// Step that runs a scripted sequence of results and counts invocations.
struct ScriptedStep {
    results: Vec<Result<StepVerdict, StepFault>>,
    runs: usize,
}

impl ScriptedStep {
    fn new(results: Vec<Result<StepVerdict, StepFault>>) -> Self {
        Self { results, runs: 0 }
    }
}

#[async_trait]
impl ProgressStep for ScriptedStep {
    type Input = u64;

    fn name(&self) -> &str {
        "scripted"
    }

    fn fingerprint(&self, input: &u64) -> u64 {
        *input
    }

    async fn run_step(&mut self, _input: &u64) -> Result<StepVerdict, StepFault> {
        let result = self.results.remove(0);
        self.runs += 1;
        result
    }
}

#[tokio::test]
async fn runs_only_at_distance_zero() {
    let mut driver = StepDriver::new(ScriptedStep::new(vec![Ok(StepVerdict::Advance)]));

    assert_eq!(driver.poll(1, &1).await, DriverSignal::OutOfTurn);
    assert_eq!(driver.poll(-1, &1).await, DriverSignal::OutOfTurn);
    assert_eq!(driver.step().runs, 0);

    assert_eq!(driver.poll(0, &1).await, DriverSignal::Advanced);
    assert_eq!(driver.step().runs, 1);
}

#[tokio::test]
async fn unchanged_snapshot_never_reruns() {
    let mut driver = StepDriver::new(ScriptedStep::new(vec![
        Ok(StepVerdict::Hold),
        Ok(StepVerdict::Advance),
    ]));

    assert_eq!(driver.poll(0, &7).await, DriverSignal::Held);
    assert_eq!(driver.poll(0, &7).await, DriverSignal::Unchanged);
    assert_eq!(driver.poll(0, &7).await, DriverSignal::Unchanged);
    assert_eq!(driver.step().runs, 1);

    // a distinct snapshot runs again
    assert_eq!(driver.poll(0, &8).await, DriverSignal::Advanced);
    assert_eq!(driver.step().runs, 2);
}

#[tokio::test]
async fn fault_latches_until_explicit_retry() {
    let fault = StepFault::new("Failed to open the workspace", "boom");
    let mut driver = StepDriver::new(ScriptedStep::new(vec![
        Err(fault.clone()),
        Ok(StepVerdict::Advance),
    ]));

    assert_eq!(driver.poll(0, &1).await, DriverSignal::Faulted(fault.clone()));
    // same distance, new snapshot: still suppressed, no silent retry
    assert_eq!(driver.poll(0, &2).await, DriverSignal::Suppressed);
    assert_eq!(driver.last_error(), Some(&fault));
    assert_eq!(driver.step().runs, 1);

    driver.retry();
    assert!(driver.last_error().is_none());
    assert_eq!(driver.poll(0, &2).await, DriverSignal::Advanced);
}

#[tokio::test]
async fn external_fail_latches_like_a_fault() {
    let mut driver = StepDriver::new(ScriptedStep::new(vec![Ok(StepVerdict::Advance)]));
    driver.fail(StepFault::new("t", "timeout"));
    assert_eq!(driver.poll(0, &1).await, DriverSignal::Suppressed);
    driver.retry();
    assert_eq!(driver.poll(0, &1).await, DriverSignal::Advanced);
}

#[test]
fn fault_converts_to_danger_alert() {
    let alert = StepFault::new("title", "body")
        .with_actions(vec![berth_core::AlertAction::restart()])
        .into_alert("key-1");
    assert_eq!(alert.variant, berth_core::AlertVariant::Danger);
    assert_eq!(alert.key, "key-1");
    assert_eq!(alert.actions.len(), 1);
}
