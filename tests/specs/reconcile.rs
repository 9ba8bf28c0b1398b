//! Status reconciliation specs.

use crate::prelude::*;
use berth_clients::{ClientError, StatusMessage};
use berth_engine::reconcile::{reconcile_listing, CallbackKind, SubscriptionRegistry};
use berth_engine::{LegacySubscriber, StatusTranslator, Translation};
use berth_core::WorkspaceStatus;
use std::sync::Arc;

#[test]
fn normalization_precedence_chain() {
    let mut full = ClientError::response_with_message(500, "Internal Server Error", "body wins");
    full.message = Some("transport".to_string());
    assert_eq!(full.normalized(), "body wins");

    assert_eq!(ClientError::message("transport").normalized(), "transport");
    assert_eq!(
        ClientError::response(502, "Bad Gateway").normalized(),
        "Response code 502, Bad Gateway"
    );
    assert_eq!(ClientError::default().normalized(), "Unknown error.");
}

#[test]
fn registry_claims_once_per_id_and_kind() {
    let registry = SubscriptionRegistry::new();
    assert!(registry.claim(CallbackKind::Status, "ws-1"));
    assert!(!registry.claim(CallbackKind::Status, "ws-1"));
    assert!(registry.claim(CallbackKind::Logs, "ws-1"));
}

#[test]
fn interrupted_start_race_is_tolerated() {
    let translator = StatusTranslator::new();
    let message = StatusMessage {
        status: Some("STOPPED".to_string()),
        error: Some("Runtime start for identity 'ws:env:me' is interrupted".to_string()),
        ..Default::default()
    };
    match translator.translate(&message) {
        Translation::Apply { status, .. } => assert_eq!(status, WorkspaceStatus::Stopped),
        other => panic!("expected Apply, got {:?}", other),
    }
}

#[tokio::test]
async fn unrecognized_push_status_never_mutates_state() {
    let world = world();
    world.api.add_workspace(legacy_workspace("ws-1", "che", "demo", "STARTING"));
    world.store.legacy.request_all().await.unwrap();

    let push = berth_clients::FakePushClient::new();
    let subscriber = LegacySubscriber::new(
        Arc::new(push.clone()),
        world.store.state(),
        Arc::new(SubscriptionRegistry::new()),
    );
    subscriber.ensure_status_subscription("ws-1").await.unwrap();

    push.push_status(
        "ws-1",
        StatusMessage {
            status: Some("DEFRAGMENTING".to_string()),
            ..Default::default()
        },
    );

    let status = world
        .store
        .find_by_id("ws-1")
        .and_then(|w| w.status());
    assert_eq!(status, Some(WorkspaceStatus::Starting));
}

#[test]
fn poll_messages_need_id_and_change() {
    let world = world();

    // no devworkspace id: no message recorded
    let mut no_id = dev_resource("user-che", "a", "Starting");
    no_id.status.as_mut().unwrap().devworkspace_id = String::new();
    no_id.status.as_mut().unwrap().message = Some("provisioning".to_string());
    world.store.lock_state_mut(|state| {
        reconcile_listing(state, vec![no_id]);
        assert!(state.dev.logs.is_empty());
    });

    // identical message recorded once
    let mut with_id = dev_resource("user-che", "b", "Starting");
    with_id.status.as_mut().unwrap().message = Some("pulling".to_string());
    world.store.lock_state_mut(|state| {
        reconcile_listing(state, vec![with_id.clone()]);
        reconcile_listing(state, vec![with_id]);
        assert_eq!(state.dev.logs.get("dw-b").map(Vec::len), Some(1));
    });
}

#[test]
fn initial_provisioning_stop_noise_is_not_logged() {
    let world = world();
    let mut fresh = dev_resource("user-che", "new", "Stopped");
    fresh.status.as_mut().unwrap().message = Some("workspace stopped".to_string());
    world.store.lock_state_mut(|state| {
        reconcile_listing(state, vec![fresh]);
        assert!(state.dev.logs.is_empty());
    });
}
