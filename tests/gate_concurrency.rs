// ABOUTME: Concurrency tests for the shared whitelist and history.
// ABOUTME: One engine across tokio tasks: no lost updates, no duplicate entries, consistent counts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use clawgate::{
    AlwaysApprove, ConfirmResponse, Confirmer, GateConfig, PermissionEngine, ToolArgs,
    ToolCallRequest, WhitelistScope,
};

/// Confirmer that always allows-and-remembers.
struct AlwaysRemember;

#[async_trait]
impl Confirmer for AlwaysRemember {
    async fn confirm(&self, _request: &ToolCallRequest, _prompt: &str) -> ConfirmResponse {
        ConfirmResponse::AllowAlways
    }
}

fn bash(command: &str) -> ToolArgs {
    ToolArgs::from_pairs([("command", json!(command))])
}

/// Readers do not disturb each other: parallel checks against a shared
/// whitelisted pattern all come back allowed.
#[tokio::test]
async fn parallel_checks_share_the_whitelist() {
    let engine = Arc::new(PermissionEngine::new(GateConfig::default()).unwrap());
    engine
        .add_to_whitelist("cargo test", WhitelistScope::Session)
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.check("bash", &bash("cargo test --all")).await
        }));
    }

    for handle in handles {
        let decision = handle.await.unwrap().unwrap();
        assert!(decision.allowed);
        assert_eq!(decision.reason, "whitelist");
    }
}

/// Concurrent inserts of the same pattern converge to a single entry.
#[tokio::test]
async fn concurrent_adds_skip_duplicates() {
    let engine = Arc::new(PermissionEngine::new(GateConfig::default()).unwrap());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.add_to_whitelist("npm run build", WhitelistScope::Session)
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(engine.stats().session_whitelist, 1);
}

/// Racing approve-and-remember evaluations of the same call end up with one
/// whitelist entry, and every task is allowed one way or the other.
#[tokio::test]
async fn racing_remembers_converge() {
    let engine = Arc::new(
        PermissionEngine::new(GateConfig::default())
            .unwrap()
            .with_confirmer(AlwaysRemember),
    );

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .check("write_file", &ToolArgs::from_pairs([("path", json!("/tmp/out"))]))
                .await
        }));
    }

    for handle in handles {
        let decision = handle.await.unwrap().unwrap();
        assert!(decision.allowed);
    }
    assert_eq!(engine.stats().session_whitelist, 1);
}

/// Every judged decision lands in history, with no appends lost under
/// contention.
#[tokio::test]
async fn history_counts_survive_contention() {
    let engine = Arc::new(
        PermissionEngine::new(GateConfig::default())
            .unwrap()
            .with_strategy(AlwaysApprove),
    );

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.check("bash", &bash(&format!("cargo build -p crate{i}"))).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().allowed);
    }

    assert_eq!(engine.history_len(), 16);
    assert_eq!(engine.stats().total_requests, 16);
}

/// History snapshots taken mid-flight interleave with appends: counts only
/// grow, and no append is lost.
#[tokio::test]
async fn history_snapshots_interleave_with_appends() {
    let engine = Arc::new(
        PermissionEngine::new(GateConfig::default())
            .unwrap()
            .with_strategy(AlwaysApprove),
    );

    let mut writers = Vec::new();
    let mut readers = Vec::new();
    for i in 0..8 {
        let writer = engine.clone();
        let reader = engine.clone();
        writers.push(tokio::spawn(async move {
            writer.check("bash", &bash(&format!("cargo doc -p crate{i}"))).await
        }));
        readers.push(tokio::spawn(async move {
            let snapshot = reader.history();
            let stats = reader.stats();
            (snapshot.len(), stats.total_requests)
        }));
    }

    for handle in writers {
        assert!(handle.await.unwrap().unwrap().allowed);
    }
    for handle in readers {
        let (snapshot_len, total) = handle.await.unwrap();
        // Stats is read after the snapshot, and history only grows.
        assert!(snapshot_len <= total);
        assert!(total <= 8);
    }

    assert_eq!(engine.history().len(), 8);
    assert_eq!(engine.stats().total_requests, 8);
}
