use std::collections::BTreeMap;

use anyhow::Result;
use tokio::sync::{broadcast, RwLock};

use crate::common::cluster::{ClusterNode, MembershipEvent};
use crate::traits::membership::MembershipProvider;

const EVENT_CAPACITY: usize = 256;

/// In-process registry. Nodes that leave stay listed but unavailable.
pub struct LocalMembership {
    nodes: RwLock<BTreeMap<String, ClusterNode>>,
    events: broadcast::Sender<MembershipEvent>,
}

impl LocalMembership {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            nodes: RwLock::new(BTreeMap::new()),
            events,
        }
    }

    pub async fn join(&self, node: ClusterNode) {
        let node = ClusterNode {
            available: true,
            ..node
        };
        self.nodes.write().await.insert(node.id.clone(), node.clone());
        log::debug!("Node {} joined local membership", node.id);
        // no subscribers is fine
        let _ = self.events.send(MembershipEvent::NodeJoined(node));
    }

    /// Returns false when the node was not known.
    pub async fn leave(&self, node_id: &str) -> bool {
        let left = {
            let mut nodes = self.nodes.write().await;
            match nodes.get_mut(node_id) {
                Some(node) => {
                    node.available = false;
                    node.clone()
                }
                None => return false,
            }
        };
        log::debug!("Node {} left local membership", node_id);
        let _ = self.events.send(MembershipEvent::NodeLeft(left));
        true
    }
}

impl Default for LocalMembership {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipProvider for LocalMembership {
    async fn list_available_nodes(&self) -> Result<Vec<ClusterNode>> {
        Ok(self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| n.available)
            .cloned()
            .collect())
    }

    fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }
}
