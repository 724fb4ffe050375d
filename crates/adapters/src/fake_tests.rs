// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn job(id: &str) -> JobId {
    JobId::new(id)
}

#[tokio::test]
async fn ensure_exemption_reports_existing() {
    let api = FakeProvisioningApi::new();
    api.add_exemption("demo");

    let exemption = api.ensure_exemption("demo").await.unwrap();
    assert!(!exemption.created);

    let fresh = api.ensure_exemption("other").await.unwrap();
    assert!(fresh.created);
    assert!(api.has_exemption("other"));
}

#[tokio::test]
async fn suggest_reports_taken_subnet_names() {
    let api = FakeProvisioningApi::new();
    api.add_subnet("demo-master-subnet", "10.0.0.0/24");

    let err = api.suggest_subnets("demo").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::NameConflict {
            names: vec!["demo-master-subnet".to_string()],
            message: "Subnet name already exists. Choose a different cluster name.".to_string(),
        }
    );
}

#[tokio::test]
async fn create_subnets_records_allocation() {
    let api = FakeProvisioningApi::new();
    let pair = api.suggest_subnets("demo").await.unwrap();
    let allocation = api.create_subnets("demo", &pair).await.unwrap();

    assert!(allocation.master_created && allocation.worker_created);
    assert!(api.has_subnet("demo-worker-subnet"));

    let again = api.create_subnets("demo", &pair).await.unwrap();
    assert!(!again.master_created && !again.worker_created);
}

#[tokio::test]
async fn scripted_failure_is_recorded_and_returned() {
    let api = FakeProvisioningApi::new();
    api.fail(ApiOp::StartInstall, ApiError::Forbidden("User role required".to_string()));

    let err = api.start_install("demo").await.unwrap_err();
    assert_eq!(err.kind(), crate::FailureKind::Forbidden);
    assert_eq!(api.ops(), vec![ApiOp::StartInstall]);
}

#[tokio::test]
async fn job_ids_count_up() {
    let api = FakeProvisioningApi::new();
    api.set_job_prefix("install");
    assert_eq!(api.start_install("a").await.unwrap(), "install-1");
    assert_eq!(api.destroy("a").await.unwrap(), "install-2");
}

#[tokio::test]
async fn snapshot_is_filtered_by_from_and_repeatable() {
    let logs = FakeLogSource::new();
    let id = job("job-1");
    logs.push_lines(&id, 1, 5);

    let first = logs.snapshot(&id, 2).await.unwrap();
    let second = logs.snapshot(&id, 2).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.lines.iter().map(|l| l.seq).collect::<Vec<_>>(), vec![3, 4, 5]);
    assert_eq!(first.last_seq, 5);
    assert!(!first.done);
}

#[tokio::test]
async fn subscribe_replays_then_streams_live_lines() {
    let logs = FakeLogSource::new();
    let id = job("job-1");
    logs.push_lines(&id, 1, 3);

    let mut sub = logs.subscribe(&id, 1).await.unwrap();
    logs.push_line(&id, "live");
    logs.finish(&id);

    let mut seen = Vec::new();
    while let Some(event) = sub.next().await {
        seen.push(event.unwrap());
    }
    assert_eq!(
        seen,
        vec![
            StreamEvent::line(2, "line 2"),
            StreamEvent::line(3, "line 3"),
            StreamEvent::line(4, "live"),
            StreamEvent::line(4, DONE_TOKEN),
        ]
    );
    assert_eq!(logs.subscriptions(), vec![(id, 1)]);
}

#[tokio::test]
async fn fail_after_breaks_the_next_subscription_once() {
    let logs = FakeLogSource::new();
    let id = job("job-1");
    logs.push_lines(&id, 1, 6);
    logs.fail_after(3);

    let mut sub = logs.subscribe(&id, 0).await.unwrap();
    let mut seqs = Vec::new();
    let mut failed = false;
    while let Some(event) = sub.next().await {
        match event {
            Ok(event) => seqs.push(event.id.unwrap()),
            Err(e) => {
                failed = e.is_retryable();
            }
        }
    }
    assert_eq!(seqs, vec![1, 2, 3]);
    assert!(failed);

    // Second subscription stays open
    let _sub = logs.subscribe(&id, 3).await.unwrap();
    assert_eq!(logs.open_streams(&id), 1);
}

#[tokio::test]
async fn dropped_subscription_is_pruned() {
    let logs = FakeLogSource::new();
    let id = job("job-1");
    let sub = logs.subscribe(&id, 0).await.unwrap();
    assert_eq!(logs.open_streams(&id), 1);
    drop(sub);
    assert_eq!(logs.open_streams(&id), 0);
}
