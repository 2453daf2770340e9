use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, Mutex};

use crate::common::cluster::{ClusterNode, MembershipEvent, NodeHeartbeat};
use crate::common::utils::now_millis;
use crate::storage::file::file_heartbeat_store::FileHeartbeatStore;
use crate::traits::membership::MembershipProvider;

const EVENT_CAPACITY: usize = 256;

/// Heartbeats older than this many timeouts are deleted on refresh.
pub const PRUNE_AFTER_TIMEOUTS: u64 = 10;

/// Membership derived from heartbeat files in a directory shared by all nodes.
///
/// A node is available while its last heartbeat is younger than the timeout.
/// [`HeartbeatMembership::refresh`] compares the current view with the previous
/// one and broadcasts the difference as join/leave events.
pub struct HeartbeatMembership {
    store: FileHeartbeatStore,
    timeout_ms: u64,
    known: Mutex<BTreeMap<String, ClusterNode>>,
    events: broadcast::Sender<MembershipEvent>,
}

impl HeartbeatMembership {
    pub fn new(heartbeat_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store: FileHeartbeatStore::new(heartbeat_dir),
            timeout_ms: timeout.as_millis() as u64,
            known: Mutex::new(BTreeMap::new()),
            events,
        }
    }

    pub async fn send_heartbeat(&self, heartbeat: &NodeHeartbeat) -> Result<()> {
        self.store.put(heartbeat).await
    }

    /// Deletes `node_id`'s heartbeat file, e.g. when that node shuts down.
    pub async fn remove_heartbeat(&self, node_id: &str) -> Result<bool> {
        self.store.remove(node_id).await
    }

    pub async fn refresh(&self) -> Result<Vec<MembershipEvent>> {
        let now_ms = now_millis();
        let heartbeats = self.store.list().await?;
        self.prune(&heartbeats, now_ms).await;
        let current = self.available(heartbeats, now_ms);
        let mut known = self.known.lock().await;

        let mut events = Vec::new();
        for (id, node) in current.iter() {
            if known.get(id) != Some(node) {
                events.push(MembershipEvent::NodeJoined(node.clone()));
            }
        }
        for (id, node) in known.iter() {
            if !current.contains_key(id) {
                events.push(MembershipEvent::NodeLeft(ClusterNode {
                    available: false,
                    ..node.clone()
                }));
            }
        }
        *known = current;
        drop(known);

        for event in &events {
            log::debug!("Heartbeat membership: node {} {}", event.node().id, event.kind());
            let _ = self.events.send(event.clone());
        }
        Ok(events)
    }

    async fn prune(&self, heartbeats: &[NodeHeartbeat], now_ms: i64) {
        let prune_after_ms = self.timeout_ms.saturating_mul(PRUNE_AFTER_TIMEOUTS);
        for hb in heartbeats.iter().filter(|hb| !hb.is_alive(now_ms, prune_after_ms)) {
            match self.store.remove(&hb.node_id).await {
                Ok(true) => log::debug!("Pruned heartbeat of long gone node {}", hb.node_id),
                Ok(false) => {}
                Err(e) => log::warn!("Failed to prune heartbeat of node {}: {:?}", hb.node_id, e),
            }
        }
    }

    fn available(&self, heartbeats: Vec<NodeHeartbeat>, now_ms: i64) -> BTreeMap<String, ClusterNode> {
        let mut latest: BTreeMap<String, NodeHeartbeat> = BTreeMap::new();
        for hb in heartbeats {
            match latest.get(&hb.node_id) {
                Some(seen) if seen.heartbeat_time >= hb.heartbeat_time => {}
                _ => {
                    latest.insert(hb.node_id.clone(), hb);
                }
            }
        }
        latest
            .into_iter()
            .filter(|(_, hb)| hb.is_alive(now_ms, self.timeout_ms))
            .map(|(id, hb)| (id, hb.to_node(true)))
            .collect()
    }
}

impl MembershipProvider for HeartbeatMembership {
    async fn list_available_nodes(&self) -> Result<Vec<ClusterNode>> {
        let heartbeats = self.store.list().await?;
        Ok(self.available(heartbeats, now_millis()).into_values().collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }
}
