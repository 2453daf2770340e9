use std::time::Duration;

use anyhow::Result;

use crate::common::cluster::ClusterNode;
use crate::common::config::ServerConfig;
use crate::membership::{
    heartbeat::HeartbeatMembership,
    local::LocalMembership,
    membership_impl::MembershipImpl,
};

pub async fn load_membership(server_config: &ServerConfig) -> Result<MembershipImpl> {
    let membership = match server_config.heartbeat_dir.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(dir) => {
            if server_config.heartbeat_timeout_ms <= server_config.heartbeat_interval_ms {
                return Err(anyhow::anyhow!(
                    "heartbeat_timeout_ms ({}) must be greater than heartbeat_interval_ms ({})",
                    server_config.heartbeat_timeout_ms,
                    server_config.heartbeat_interval_ms
                ));
            }
            log::debug!("Using heartbeat membership in {}", dir);
            MembershipImpl::Heartbeat(HeartbeatMembership::new(
                dir,
                Duration::from_millis(server_config.heartbeat_timeout_ms),
            ))
        }
        None => {
            log::debug!("Using local membership, this node only");
            let local = LocalMembership::new();
            local
                .join(ClusterNode::new(server_config.node_id(), server_config.hostname.clone()))
                .await;
            MembershipImpl::Local(local)
        }
    };
    Ok(membership)
}
