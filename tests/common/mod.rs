#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use prometheus_sd_sync::common::cluster::{ClusterNode, MembershipEvent};
use prometheus_sd_sync::membership::local::LocalMembership;
use prometheus_sd_sync::traits::membership::MembershipProvider;
use tokio::sync::{broadcast, watch};

/// Local membership that counts snapshot queries and can be told to fail them.
pub struct CountingMembership {
    inner: LocalMembership,
    queries: AtomicUsize,
    failing: AtomicBool,
}

impl CountingMembership {
    pub fn new() -> Self {
        Self {
            inner: LocalMembership::new(),
            queries: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub async fn join(&self, id: &str, hostname: &str) {
        self.inner.join(ClusterNode::new(id, hostname)).await;
    }

    pub async fn leave(&self, id: &str) -> bool {
        self.inner.leave(id).await
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl MembershipProvider for CountingMembership {
    async fn list_available_nodes(&self) -> Result<Vec<ClusterNode>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("membership service unreachable");
        }
        self.inner.list_available_nodes().await
    }

    fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.inner.subscribe()
    }
}

pub async fn wait_for_completions(completions: &mut watch::Receiver<u64>, at_least: u64) {
    tokio::time::timeout(Duration::from_secs(5), completions.wait_for(|n| *n >= at_least))
        .await
        .expect("timed out waiting for regeneration")
        .expect("coalescer stopped");
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let contents = std::fs::read(path).expect("target file should exist");
    serde_json::from_slice(&contents).expect("target file should be valid JSON")
}

pub fn node_ids(path: &Path) -> Vec<String> {
    read_json(path)
        .as_array()
        .expect("target file should hold an array")
        .iter()
        .map(|t| t["labels"]["nodeID"].as_str().unwrap_or_default().to_string())
        .collect()
}
