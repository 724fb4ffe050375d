// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::api::Exemption;
use crate::error::FailureKind;

#[test]
fn exemption_already_existing_is_success() {
    let body = r#"{"ok": true, "created": false, "exemptionId": "/sub/x", "exemptionName": "ex-foo"}"#;
    let exemption: Exemption = decode(200, body).unwrap();
    assert!(!exemption.created);
    assert_eq!(exemption.exemption_name.as_deref(), Some("ex-foo"));
}

#[test]
fn conflicts_list_is_a_name_conflict() {
    let body = r#"{"ok": false, "error": "Subnet name already exists", "conflicts": ["foo-master-subnet"]}"#;
    let err = decode::<SubnetPair>(409, body).unwrap_err();
    assert_eq!(
        err,
        ApiError::NameConflict {
            names: vec!["foo-master-subnet".into()],
            message: "Subnet name already exists".into(),
        }
    );
}

#[test]
fn cidr_mismatch_409_names_the_subnet() {
    let body = r#"{"ok": false, "error": "Subnet already exists with different CIDR", "subnet": "foo-worker-subnet"}"#;
    let err = decode::<Ack>(409, body).unwrap_err();
    assert!(matches!(err, ApiError::NameConflict { ref names, .. } if names == &["foo-worker-subnet"]));
}

#[test]
fn missing_env_is_missing_config() {
    let body = r#"{"ok": false, "error": "Missing env vars", "missing": ["AZ_VNET_NAME"]}"#;
    let err = decode::<Ack>(400, body).unwrap_err();
    assert_eq!(err, ApiError::MissingConfig { missing: vec!["AZ_VNET_NAME".into()] });
}

#[yare::parameterized(
    unauth_json     = { 401, r#"{"msg": "Token has expired"}"#,               FailureKind::Unauthenticated },
    unauth_html     = { 401, "<html>nope</html>",                              FailureKind::Unauthenticated },
    forbidden       = { 403, r#"{"ok": false, "error": "Forbidden: missing User role"}"#, FailureKind::Forbidden },
    not_json        = { 502, "<html>Bad Gateway</html>",                       FailureKind::Malformed },
    ok_false        = { 500, r#"{"ok": false, "error": "boom"}"#,              FailureKind::Rejected },
    ok_true_but_400 = { 400, r#"{"ok": true}"#,                                FailureKind::Rejected },
)]
fn classifies_failures(status: u16, body: &str, kind: FailureKind) {
    assert_eq!(decode::<Ack>(status, body).unwrap_err().kind(), kind);
}

#[test]
fn forbidden_keeps_service_message() {
    let err = decode::<Ack>(403, r#"{"ok": false, "error": "Forbidden: missing User role"}"#)
        .unwrap_err();
    assert_eq!(err, ApiError::Forbidden("Forbidden: missing User role".into()));
}

#[test]
fn success_without_expected_field_is_malformed() {
    let err = decode::<JobStarted>(200, r#"{"ok": true}"#).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Malformed);
}

#[test]
fn snapshot_body_decodes_pairs() {
    let body = r#"{"ok": true, "done": false, "lastSeq": 5,
                   "lines": [[1, "a"], [2, "b"], [5, "e"]]}"#;
    let snapshot: LogSnapshot = decode::<SnapshotBody>(200, body).unwrap().into();
    assert_eq!(snapshot.last_seq, 5);
    assert!(!snapshot.done);
    assert_eq!(snapshot.lines.iter().map(|l| l.seq).collect::<Vec<_>>(), vec![1, 2, 5]);
    assert_eq!(snapshot.lines[2].text, "e");
}

#[test]
fn subnets_created_body_decodes() {
    let body = r#"{"ok": true, "vnet": "v", "resourceGroup": "rg",
        "master": {"name": "foo-master-subnet", "cidr": "10.104.0.0/22", "created": true, "id": "m"},
        "worker": {"name": "foo-worker-subnet", "cidr": "10.104.4.0/22", "created": false, "id": "w"}}"#;
    let allocation: SubnetAllocation = decode::<SubnetsCreated>(200, body).unwrap().into();
    assert!(allocation.master_created);
    assert!(!allocation.worker_created);
    assert_eq!(allocation.pair.worker_cidr, "10.104.4.0/22");
}
