use tokio::sync::broadcast;

use crate::common::cluster::{ClusterNode, MembershipEvent};
use anyhow::Result;

/// Read side of cluster membership as seen by the target synchronizer.
#[trait_variant::make(MembershipProvider: Send)]
pub trait UnsendMembershipProvider {
    /// Nodes that are currently reachable. Order is unspecified.
    async fn list_available_nodes(&self) -> Result<Vec<ClusterNode>>;
    fn subscribe(&self) -> broadcast::Receiver<MembershipEvent>;
}
