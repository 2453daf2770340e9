use anyhow::Result;
use tokio::sync::broadcast;

use crate::common::cluster::{ClusterNode, MembershipEvent};
use crate::membership::heartbeat::HeartbeatMembership;
use crate::membership::local::LocalMembership;
use crate::traits::membership::MembershipProvider;

pub enum MembershipImpl {
    Local(LocalMembership),
    Heartbeat(HeartbeatMembership),
}

impl MembershipProvider for MembershipImpl {
    async fn list_available_nodes(&self) -> Result<Vec<ClusterNode>> {
        match self {
            MembershipImpl::Local(l) => l.list_available_nodes().await,
            MembershipImpl::Heartbeat(h) => h.list_available_nodes().await,
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        match self {
            MembershipImpl::Local(l) => l.subscribe(),
            MembershipImpl::Heartbeat(h) => h.subscribe(),
        }
    }
}
