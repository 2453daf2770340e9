use serde::{Deserialize, Serialize};

/// A cluster member as reported by the membership collaborator.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClusterNode {
    pub id: String,
    pub hostname: String,
    pub available: bool,
}

impl ClusterNode {
    pub fn new(id: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hostname: hostname.into(),
            available: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEvent {
    NodeJoined(ClusterNode),
    NodeLeft(ClusterNode),
}

impl MembershipEvent {
    pub fn node(&self) -> &ClusterNode {
        match self {
            MembershipEvent::NodeJoined(node) | MembershipEvent::NodeLeft(node) => node,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MembershipEvent::NodeJoined(_) => "connected",
            MembershipEvent::NodeLeft(_) => "disconnected",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NodeHeartbeat {
    pub node_id: String,
    pub hostname: String,
    pub heartbeat_time: i64, // milliseconds since UNIX_EPOCH
}

impl NodeHeartbeat {
    pub fn new(node_id: impl Into<String>, hostname: impl Into<String>, heartbeat_time: i64) -> Self {
        Self {
            node_id: node_id.into(),
            hostname: hostname.into(),
            heartbeat_time,
        }
    }

    /// A heartbeat from the future counts as alive.
    pub fn is_alive(&self, now_ms: i64, timeout_ms: u64) -> bool {
        now_ms.saturating_sub(self.heartbeat_time) <= timeout_ms as i64
    }

    pub fn to_node(&self, available: bool) -> ClusterNode {
        ClusterNode {
            id: self.node_id.clone(),
            hostname: self.hostname.clone(),
            available,
        }
    }
}
