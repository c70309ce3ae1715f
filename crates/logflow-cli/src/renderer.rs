use ascii_tree::{write_tree, Tree};
use logflow_core::{EdgeKind, FlowGraph, FlowNode};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Nesting levels rendered as tree structure; nodes nested deeper are listed
/// flat, tagged with their level, under the last structured ancestor
pub const MAX_TREE_DEPTH: usize = 256;

/// Renders a `FlowGraph` as an ASCII tree.
///
/// A node's children are the nodes one level deeper that follow it before the
/// next node at its own level, so the tree mirrors the block nesting of the log.
pub fn render_graph_as_tree(graph: &FlowGraph) -> Result<String, fmt::Error> {
    let Some(root) = graph.nodes.first() else {
        return Ok(String::new());
    };

    let mut cursor = 1;
    let children = subtrees(&graph.nodes, &mut cursor, root.level, 1);
    let tree = Tree::Node(node_label(root), children);

    let mut buffer = String::new();
    write_tree(&mut buffer, &tree)?;
    Ok(buffer)
}

fn subtrees(
    nodes: &[FlowNode],
    cursor: &mut usize,
    parent_level: usize,
    depth: usize,
) -> Vec<Tree> {
    let mut trees = Vec::new();
    while let Some(node) = nodes.get(*cursor).filter(|n| n.level > parent_level) {
        *cursor += 1;
        if depth >= MAX_TREE_DEPTH {
            trees.push(Tree::Leaf(vec![format!(
                "{} (level {})",
                node_label(node),
                node.level
            )]));
            continue;
        }
        let children = subtrees(nodes, cursor, node.level, depth + 1);
        trees.push(if children.is_empty() {
            Tree::Leaf(vec![node_label(node)])
        } else {
            Tree::Node(node_label(node), children)
        });
    }
    trees
}

fn node_label(node: &FlowNode) -> String {
    let mut label = format!("[{}] {}", node.category, node.label);
    if let Some(details) = &node.details {
        label.push_str(&format!(" (line {})", details.line_number));
    }
    label
}

/// Renders a short plain-text overview: counts per category and edge kind.
pub fn render_summary(graph: &FlowGraph) -> Result<String, fmt::Error> {
    let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
    for node in graph.nodes.iter().skip(1) {
        *categories.entry(node.category.as_str()).or_default() += 1;
    }

    let edge_count = |kind: EdgeKind| graph.edges.iter().filter(|e| e.kind == kind).count();
    let max_depth = graph.nodes.iter().map(|n| n.level).max().unwrap_or(0);

    let mut out = String::new();
    writeln!(out, "Framework:   {}", graph.metadata.framework)?;
    writeln!(out, "Lines:       {}", graph.metadata.total_lines)?;
    writeln!(out, "Nodes:       {}", graph.metadata.node_count)?;
    writeln!(
        out,
        "Edges:       {} (hierarchy {}, default {}, error {})",
        graph.edges.len(),
        edge_count(EdgeKind::Hierarchy),
        edge_count(EdgeKind::Default),
        edge_count(EdgeKind::Error)
    )?;
    writeln!(out, "Max depth:   {max_depth}")?;
    if !categories.is_empty() {
        writeln!(out, "Categories:")?;
        for (category, count) in categories {
            writeln!(out, "  {category:<12}{count}")?;
        }
    }
    Ok(out)
}
