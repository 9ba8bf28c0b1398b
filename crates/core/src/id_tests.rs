// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

crate::define_id! {
    /// Test-only identifier.
    pub struct ProbeId;
}

#[test]
fn id_display() {
    let id = ProbeId::new("workspace-abc123");
    assert_eq!(id.to_string(), "workspace-abc123");
}

#[test]
fn id_equality() {
    let id1 = ProbeId::new("uid-1");
    let id2 = ProbeId::new("uid-1");
    let id3 = ProbeId::new("uid-2");

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
    assert_eq!(id1, "uid-1");
}

#[test]
fn id_serde() {
    let id = ProbeId::new("my-workspace");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"my-workspace\"");

    let parsed: ProbeId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn uuid_gen_is_unique() {
    let gen = UuidIdGen;
    assert_ne!(gen.next(), gen.next());
}

#[test]
fn sequential_gen_counts_up() {
    let gen = SequentialIdGen::new("ws");
    assert_eq!(gen.next(), "ws-1");
    assert_eq!(gen.next(), "ws-2");
}

#[test]
fn short_id_truncates() {
    assert_eq!("1234567890".short(4), "1234");
    assert_eq!("abc".short(8), "abc");
}
