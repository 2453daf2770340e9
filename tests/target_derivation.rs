use prometheus_sd_sync::common::cluster::ClusterNode;
use prometheus_sd_sync::common::target::{derive_targets, encode_targets};
use serde_json::json;

fn unavailable(id: &str, hostname: &str) -> ClusterNode {
    ClusterNode {
        available: false,
        ..ClusterNode::new(id, hostname)
    }
}

#[test]
fn test_two_nodes_produce_sorted_targets() {
    let nodes = vec![ClusterNode::new("B", "hostB"), ClusterNode::new("A", "hostA")];
    let targets = derive_targets(&nodes, 3030);

    assert_eq!(
        serde_json::to_value(&targets).unwrap(),
        json!([
            {"labels": {"job": "hostA", "nodeID": "A"}, "targets": ["hostA:3030"]},
            {"labels": {"job": "hostB", "nodeID": "B"}, "targets": ["hostB:3030"]},
        ])
    );
}

#[test]
fn test_same_membership_in_any_order_is_byte_identical() {
    let a = ClusterNode::new("node-a", "10.0.0.1");
    let b = ClusterNode::new("node-b", "10.0.0.2");
    let c = ClusterNode::new("node-c", "10.0.0.3");
    let gone = unavailable("node-0", "10.0.0.9");

    let orders = vec![
        vec![a.clone(), b.clone(), c.clone()],
        vec![c.clone(), gone.clone(), a.clone(), b.clone()],
        vec![b.clone(), c.clone(), a.clone(), gone.clone()],
    ];
    let encoded: Vec<Vec<u8>> = orders
        .iter()
        .map(|nodes| encode_targets(&derive_targets(nodes, 9100)).unwrap())
        .collect();

    assert!(encoded.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_unavailable_nodes_are_left_out() {
    let nodes = vec![ClusterNode::new("A", "hostA"), unavailable("B", "hostB")];
    let targets = derive_targets(&nodes, 3030);

    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].labels.node_id, "A");
}

#[test]
fn test_encoding_is_two_space_pretty_json() {
    let targets = derive_targets(&[ClusterNode::new("A", "hostA")], 3030);
    let text = String::from_utf8(encode_targets(&targets).unwrap()).unwrap();

    let expected = "[\n  {\n    \"labels\": {\n      \"job\": \"hostA\",\n      \"nodeID\": \"A\"\n    },\n    \"targets\": [\n      \"hostA:3030\"\n    ]\n  }\n]";
    assert_eq!(text, expected);
}
