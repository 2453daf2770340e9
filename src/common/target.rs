//! Prometheus `file_sd_configs` target entries.
//!
//! See <https://prometheus.io/docs/prometheus/latest/configuration/configuration/#file_sd_config>.

use serde::{Deserialize, Serialize};

use crate::common::cluster::ClusterNode;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TargetLabels {
    pub job: String,
    #[serde(rename = "nodeID")]
    pub node_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ScrapeTarget {
    pub labels: TargetLabels,
    pub targets: Vec<String>,
}

impl ScrapeTarget {
    pub fn for_node(node: &ClusterNode, metrics_port: u16) -> Self {
        Self {
            labels: TargetLabels {
                job: node.hostname.clone(),
                node_id: node.id.clone(),
            },
            targets: vec![format!("{}:{}", node.hostname, metrics_port)],
        }
    }
}

/// Builds one target per available node, ordered by node id.
///
/// The result depends only on the set of available nodes, never on the order
/// they were reported in. Duplicate ids keep the entry with the lowest hostname.
pub fn derive_targets(nodes: &[ClusterNode], metrics_port: u16) -> Vec<ScrapeTarget> {
    let mut available: Vec<&ClusterNode> = nodes.iter().filter(|n| n.available).collect();
    available.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.hostname.cmp(&b.hostname)));
    available.dedup_by(|next, kept| next.id == kept.id);
    available
        .into_iter()
        .map(|node| ScrapeTarget::for_node(node, metrics_port))
        .collect()
}

/// Serialized artifact body: a 2-space indented JSON array.
pub fn encode_targets(targets: &[ScrapeTarget]) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(targets)
}
