//! Tests for flow graph construction
//!
//! Covers the nesting rules of the hierarchy tracker as seen through whole
//! documents: hierarchy versus sibling edges, error edges, block closing and
//! the handling of lines nothing recognizes.

#[path = "common/mod.rs"]
mod common;

use common::{assert_graph_invariants, edge_into, edge_triples, node_labeled};
use logflow_core::samples::{AUTOGEN_LOG, CREWAI_LOG, EXAMPLE_LOG, LANGCHAIN_LOG};
use logflow_core::{build_graph, Category, EdgeKind};
use rstest::rstest;

#[test]
fn test_start_action_result_end_chain() {
    let graph = build_graph(
        "[START] begin\n[ACTION] search: find files\n[RESULT] found 2\n[END] done",
        None,
    );

    assert_graph_invariants(&graph);
    assert_eq!(graph.nodes.len(), 5);
    assert_eq!(graph.edges.len(), 4);

    let labels: Vec<&str> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Log Start", "begin", "search find files", "found 2", "done"]
    );

    assert_eq!(
        edge_triples(&graph),
        vec![
            ("node_1", "node_2", EdgeKind::Hierarchy),
            ("node_2", "node_3", EdgeKind::Hierarchy),
            ("node_3", "node_4", EdgeKind::Default),
            ("node_4", "node_5", EdgeKind::Default),
        ]
    );

    let levels: Vec<usize> = graph.nodes.iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![0, 1, 2, 2, 2]);
}

#[test]
fn test_root_node_shape() {
    let graph = build_graph("", None);

    assert_eq!(graph.nodes.len(), 1);
    assert!(graph.edges.is_empty());

    let root = graph.root().unwrap();
    assert_eq!(root.id, "node_1");
    assert_eq!(root.label, "Log Start");
    assert_eq!(root.category, Category::Start);
    assert_eq!(root.level, 0);
    assert!(root.details.is_none());
    assert!(root.timestamp.is_none());

    assert_eq!(graph.metadata.total_lines, 1);
    assert_eq!(graph.metadata.node_count, 1);
    assert_eq!(graph.metadata.framework, "generic");
}

#[test]
fn test_siblings_are_chained_with_default_edges() {
    let graph = build_graph("[ACTION] read: a.txt\n[ACTION] write: b.txt", None);

    assert_graph_invariants(&graph);
    assert_eq!(
        edge_triples(&graph),
        vec![
            ("node_1", "node_2", EdgeKind::Hierarchy),
            ("node_2", "node_3", EdgeKind::Default),
        ]
    );
    // only one edge leaves the root
    assert_eq!(graph.edges.iter().filter(|e| e.source == "node_1").count(), 1);
}

#[rstest]
#[case::first_child("[ERROR] permission denied")]
#[case::sibling("[ACTION] write: config.toml\n[ERROR] permission denied")]
#[case::nested("[START] job\n[ERROR] permission denied")]
#[case::nested_sibling("[START] job\n[RESULT] ok\n[ERROR] permission denied")]
fn test_error_nodes_get_error_edges(#[case] log: &str) {
    let graph = build_graph(log, None);
    assert_graph_invariants(&graph);

    let error = graph
        .nodes
        .iter()
        .find(|n| n.category == Category::Error)
        .expect("error node");
    assert_eq!(edge_into(&graph, &error.id).kind, EdgeKind::Error);

    // no other edge is marked as an error
    assert_eq!(
        graph.edges.iter().filter(|e| e.kind == EdgeKind::Error).count(),
        1
    );
}

#[test]
fn test_error_edge_keeps_natural_source() {
    let graph = build_graph("[START] job\n[RESULT] ok\n[ERROR] permission denied", None);

    let error = edge_into(&graph, "node_4");
    assert_eq!(error.source, "node_3");
    assert_eq!(error.kind, EdgeKind::Error);
}

#[test]
fn test_noise_lines_do_not_change_structure() {
    let clean = build_graph(
        "[START] job\n[ACTION] run: step one\n[END] job\n[ACTION] run: step two",
        None,
    );
    let noisy = build_graph(
        "\n[START] job\n   \nsome free text\n[ACTION] run: step one\n\r\n[END] job\n-----\n[ACTION] run: step two\n",
        None,
    );

    assert_graph_invariants(&noisy);
    assert_eq!(clean.nodes.len(), noisy.nodes.len());
    assert_eq!(edge_triples(&clean), edge_triples(&noisy));

    let clean_labels: Vec<&str> = clean.nodes.iter().map(|n| n.label.as_str()).collect();
    let noisy_labels: Vec<&str> = noisy.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(clean_labels, noisy_labels);

    assert_eq!(clean.metadata.total_lines, 4);
    assert_eq!(noisy.metadata.total_lines, 10);
}

#[test]
fn test_line_numbers_refer_to_input_lines() {
    let graph = build_graph("\n\n[START] job\nnoise\n[END] job", None);

    let start = node_labeled(&graph, "job");
    assert_eq!(start.details.as_ref().unwrap().line_number, 3);
    let end = &graph.nodes[2];
    assert_eq!(end.details.as_ref().unwrap().line_number, 5);
}

#[rstest]
#[case::flat("[ACTION] a: 1\n[ACTION] b: 2", vec![0, 1, 1])]
#[case::one_block("[START] s\n[ACTION] a: 1\n[END] e", vec![0, 1, 2, 2])]
#[case::two_blocks(
    "[START] outer\n[START] inner\n[ACTION] a: 1\n[END] inner\n[ACTION] b: 2\n[END] outer\n[ACTION] c: 3",
    vec![0, 1, 2, 3, 3, 2, 2, 1]
)]
#[case::unbalanced_end("[END] early\n[ACTION] a: 1", vec![0, 1, 1])]
fn test_levels_follow_open_blocks(#[case] log: &str, #[case] expected: Vec<usize>) {
    let graph = build_graph(log, None);
    assert_graph_invariants(&graph);

    let levels: Vec<usize> = graph.nodes.iter().map(|n| n.level).collect();
    assert_eq!(levels, expected);
}

#[test]
fn test_end_with_only_root_open_is_still_linked() {
    let graph = build_graph("[END] nothing open\n[ACTION] next: step", None);

    assert_eq!(graph.nodes.len(), 3);
    assert_eq!(
        edge_triples(&graph),
        vec![
            ("node_1", "node_2", EdgeKind::Hierarchy),
            ("node_2", "node_3", EdgeKind::Default),
        ]
    );
}

#[test]
fn test_closed_block_chains_to_next_sibling() {
    let graph = build_graph(
        "[START] outer\n[ACTION] a: 1\n[END] outer\n[ACTION] b: 2",
        None,
    );

    // the end marker becomes the latest node at level 1
    let after = edge_into(&graph, "node_5");
    assert_eq!(after.source, "node_4");
    assert_eq!(after.kind, EdgeKind::Default);
    assert_eq!(graph.nodes[4].level, 1);
}

#[test]
fn test_deeper_level_pointers_survive_block_close() {
    let graph = build_graph(
        "[START] a\n[START] b\n[ACTION] x: y\n[END] b\n[END] a\n[START] c\n[ACTION] p: q",
        None,
    );
    assert_graph_invariants(&graph);

    // "[END] a" was recorded at level 2 before its block closed, so the first
    // child of the next block chains from it instead of hanging off "c"
    let first_child = edge_into(&graph, "node_8");
    assert_eq!(graph.nodes[7].level, 2);
    assert_eq!(first_child.source, "node_6");
    assert_eq!(first_child.kind, EdgeKind::Default);
}

#[test]
fn test_example_log_graph() {
    let graph = build_graph(EXAMPLE_LOG, None);
    assert_graph_invariants(&graph);

    assert_eq!(graph.metadata.framework, "generic");
    assert_eq!(graph.metadata.total_lines, 15);
    assert_eq!(graph.nodes.len(), 16);
    assert_eq!(graph.edges.len(), 15);

    let error = &graph.nodes[10];
    assert_eq!(error.id, "node_11");
    assert_eq!(error.category, Category::Error);
    let edge = edge_into(&graph, "node_11");
    assert_eq!(edge.source, "node_10");
    assert_eq!(edge.kind, EdgeKind::Error);

    let thinking = &graph.nodes[2];
    assert_eq!(thinking.category, Category::Decision);
    assert_eq!(
        thinking.label,
        "Analyze the request: find errors in the Python files"
    );

    let last = graph.nodes.last().unwrap();
    assert_eq!(last.category, Category::End);
    assert_eq!(last.level, 2);
}

#[test]
fn test_langchain_log_graph() {
    let graph = build_graph(LANGCHAIN_LOG, None);
    assert_graph_invariants(&graph);

    assert_eq!(graph.metadata.framework, "langchain");
    assert_eq!(graph.nodes.len(), 8);

    let chain = &graph.nodes[1];
    assert_eq!(chain.category, Category::Start);
    assert_eq!(chain.label, "AgentExecutor");
    assert_eq!(chain.level, 1);
    assert!(graph.nodes[2..].iter().all(|n| n.level == 2));

    let tool = &graph.nodes[3];
    assert_eq!(tool.category, Category::Action);
    assert_eq!(tool.label, "search population of Paris");

    assert_eq!(graph.nodes[7].category, Category::End);
}

#[test]
fn test_autogen_log_graph() {
    let graph = build_graph(AUTOGEN_LOG, None);
    assert_graph_invariants(&graph);

    assert_eq!(graph.metadata.framework, "autogen");
    // the two prose lines match nothing
    assert_eq!(graph.nodes.len(), 7);
    assert!(graph.nodes[1..].iter().all(|n| n.level == 1));

    assert_eq!(graph.nodes[1].label, "user_proxy assistant");
    assert_eq!(graph.nodes[3].label, "EXECUTING CODE BLOCK:");
    assert_eq!(graph.nodes[5].category, Category::Result);
    assert_eq!(graph.nodes[6].category, Category::End);
}

#[test]
fn test_crewai_log_graph() {
    let graph = build_graph(CREWAI_LOG, None);
    assert_graph_invariants(&graph);

    assert_eq!(graph.metadata.framework, "crewai");
    assert_eq!(graph.nodes.len(), 5);

    let task = node_labeled(&graph, "Summarize recent developments in battery chemistry");
    assert_eq!(task.category, Category::Start);
    assert_eq!(task.level, 1);

    let tool = node_labeled(&graph, "web_search");
    assert_eq!(tool.category, Category::Tool);
    assert_eq!(tool.level, 2);
    let edge = edge_into(&graph, &tool.id);
    assert_eq!(edge.source, task.id);
    assert_eq!(edge.kind, EdgeKind::Hierarchy);
}

#[test]
fn test_timestamped_lines_become_nodes() {
    let graph = build_graph(
        "2024-01-15 10:30:00 Connected to database\n2024-01-15 10:30:02 Query finished",
        None,
    );
    assert_graph_invariants(&graph);

    let node = &graph.nodes[1];
    assert_eq!(node.label, "Connected to database");
    assert_eq!(node.timestamp.as_deref(), Some("2024-01-15 10:30:00"));
    assert_eq!(node.category, Category::Other("timestamped".to_string()));
    assert_eq!(node.details.as_ref().unwrap().style.color, "#757575");
}

#[test]
fn test_builds_are_independent() {
    let first = build_graph(EXAMPLE_LOG, None);
    let second = build_graph(EXAMPLE_LOG, None);
    assert_eq!(first, second);
    assert_eq!(second.nodes[1].id, "node_2");
}

#[test]
fn test_parallel_builds_do_not_interfere() {
    let handles: Vec<_> = [EXAMPLE_LOG, LANGCHAIN_LOG, AUTOGEN_LOG, CREWAI_LOG]
        .into_iter()
        .map(|log| std::thread::spawn(move || (build_graph(log, None), build_graph(log, None))))
        .collect();

    for handle in handles {
        let (a, b) = handle.join().unwrap();
        assert_graph_invariants(&a);
        assert_eq!(a, b);
    }
}
