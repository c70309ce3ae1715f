//! Shared helpers for logflow-core integration tests

use logflow_core::{EdgeKind, FlowEdge, FlowGraph, FlowNode};
use std::collections::HashSet;

/// Assert the structural invariants every graph must satisfy
#[allow(dead_code)]
pub fn assert_graph_invariants(graph: &FlowGraph) {
    assert!(!graph.nodes.is_empty(), "graph must contain the root");
    assert_eq!(graph.metadata.node_count, graph.nodes.len());

    let root = &graph.nodes[0];
    assert_eq!(root.level, 0);
    assert_eq!(
        graph.nodes.iter().filter(|n| n.level == 0).count(),
        1,
        "only the root sits at level 0"
    );

    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(node_ids.len(), graph.nodes.len(), "node ids must be unique");

    let edge_ids: HashSet<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(edge_ids.len(), graph.edges.len(), "edge ids must be unique");

    for edge in &graph.edges {
        let source = position(graph, &edge.source);
        let target = position(graph, &edge.target);
        assert!(
            source < target,
            "edge {} must point forward ({} -> {})",
            edge.id,
            edge.source,
            edge.target
        );
    }
}

/// Index of a node in the node sequence
#[allow(dead_code)]
pub fn position(graph: &FlowGraph, id: &str) -> usize {
    graph
        .nodes
        .iter()
        .position(|n| n.id == id)
        .unwrap_or_else(|| panic!("node {id} not found"))
}

/// The single edge leading into `id`
#[allow(dead_code)]
pub fn edge_into<'a>(graph: &'a FlowGraph, id: &str) -> &'a FlowEdge {
    let incoming: Vec<&FlowEdge> = graph.edges.iter().filter(|e| e.target == id).collect();
    assert_eq!(incoming.len(), 1, "expected exactly one edge into {id}");
    incoming[0]
}

/// First node whose label equals `label`
#[allow(dead_code)]
pub fn node_labeled<'a>(graph: &'a FlowGraph, label: &str) -> &'a FlowNode {
    graph
        .nodes
        .iter()
        .find(|n| n.label == label)
        .unwrap_or_else(|| panic!("no node labeled '{label}'"))
}

/// `(source, target, kind)` triples for compact assertions
#[allow(dead_code)]
pub fn edge_triples(graph: &FlowGraph) -> Vec<(&str, &str, EdgeKind)> {
    graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.kind))
        .collect()
}
