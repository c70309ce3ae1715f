//! Graph construction
//!
//! `GraphBuilder` turns the flat sequence of classified lines into a graph
//! whose shape encodes both temporal order and nesting. All mutable state of a
//! build lives in one builder value; nothing is shared between builds.

use crate::classifier::LineClassifier;
use crate::patterns::PatternRegistry;
use crate::style::{map_tag, node_style};
use crate::types::{
    Category, ClassifiedLine, EdgeKind, FlowEdge, FlowGraph, FlowNode, GraphMetadata, NodeDetails,
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Label of the synthetic root node
pub const ROOT_LABEL: &str = "Log Start";

/// Open-block stack plus the most recent node at each level
///
/// The root is pushed on creation and never popped, so the depth is always at
/// least 1.
#[derive(Debug, Clone)]
pub struct HierarchyTracker {
    stack: Vec<String>,
    last_at_level: HashMap<usize, String>,
}

impl HierarchyTracker {
    pub fn new(root_id: &str) -> Self {
        let mut last_at_level = HashMap::new();
        last_at_level.insert(0, root_id.to_string());
        Self {
            stack: vec![root_id.to_string()],
            last_at_level,
        }
    }

    /// Number of open blocks, the root included
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Innermost open block
    pub fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    pub fn last_at_level(&self, level: usize) -> Option<&str> {
        self.last_at_level.get(&level).map(String::as_str)
    }

    /// Where a new node at `level` attaches: the previous sibling at that level
    /// if there is one, otherwise the innermost open block
    pub fn edge_source(&self, level: usize) -> Option<(&str, EdgeKind)> {
        match self.last_at_level(level) {
            Some(sibling) => Some((sibling, EdgeKind::Default)),
            None => self.parent().map(|parent| (parent, EdgeKind::Hierarchy)),
        }
    }

    /// Remember `node_id` as the latest node at `level`
    pub fn record(&mut self, level: usize, node_id: &str) {
        self.last_at_level.insert(level, node_id.to_string());
    }

    /// Make `node_id` the innermost open block
    pub fn open(&mut self, node_id: &str) {
        self.stack.push(node_id.to_string());
    }

    /// Close the innermost block, making `end_id` the latest node at the level
    /// the block was opened on. Entries of deeper levels are left as they are.
    /// Returns false when only the root is open.
    pub fn close(&mut self, end_id: &str) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        let level = self.stack.len();
        self.last_at_level.insert(level, end_id.to_string());
        true
    }
}

/// Builds one `FlowGraph` from one log document
pub struct GraphBuilder<'a> {
    classifier: LineClassifier<'a>,
    framework: String,
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    node_counter: usize,
    hierarchy: HierarchyTracker,
    skipped: usize,
}

impl<'a> GraphBuilder<'a> {
    /// Start a build for `framework`, creating the root node
    pub fn new(registry: &'a PatternRegistry, framework: impl Into<String>) -> Self {
        let framework = framework.into();
        let classifier = LineClassifier::for_framework(registry, &framework);
        Self::with_classifier(classifier, framework)
    }

    /// Start a build with an explicit classifier
    pub fn with_classifier(classifier: LineClassifier<'a>, framework: impl Into<String>) -> Self {
        let root_id = "node_1".to_string();
        let root = FlowNode {
            id: root_id.clone(),
            label: ROOT_LABEL.to_string(),
            category: Category::Start,
            timestamp: None,
            details: None,
            level: 0,
        };

        Self {
            classifier,
            framework: framework.into(),
            nodes: vec![root],
            edges: Vec::new(),
            node_counter: 1,
            hierarchy: HierarchyTracker::new(&root_id),
            skipped: 0,
        }
    }

    /// Process every line of `log_text` and return the finished graph
    pub fn build(mut self, log_text: &str) -> FlowGraph {
        let mut total_lines = 0;
        for (index, line) in log_text.split('\n').enumerate() {
            total_lines += 1;
            self.push_line(index + 1, line);
        }
        self.finish(total_lines)
    }

    fn push_line(&mut self, line_number: usize, line: &str) {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            return;
        }

        match self.classifier.classify_line(line, line_number) {
            Some(classified) => self.append(classified),
            None => {
                trace!(line_number, "Dropping unrecognized line");
                self.skipped += 1;
            }
        }
    }

    fn append(&mut self, classified: ClassifiedLine) {
        let category = map_tag(&classified.tag);
        let label = derive_label(&classified);
        let level = self.hierarchy.depth();
        let node_id = self.next_node_id();

        let edge = self.hierarchy.edge_source(level).map(|(source, kind)| {
            let kind = if category == Category::Error {
                EdgeKind::Error
            } else {
                kind
            };
            FlowEdge {
                id: format!("edge_{}", self.edges.len() + 1),
                source: source.to_string(),
                target: node_id.clone(),
                label: None,
                kind,
            }
        });

        self.nodes.push(FlowNode {
            id: node_id.clone(),
            label,
            timestamp: classified.timestamp,
            details: Some(NodeDetails {
                full_content: classified.raw,
                line_number: classified.line_number,
                style: node_style(&category),
            }),
            level,
            category: category.clone(),
        });
        if let Some(edge) = edge {
            self.edges.push(edge);
        }

        self.hierarchy.record(level, &node_id);
        if category.opens_block() {
            self.hierarchy.open(&node_id);
        } else if category.closes_block() && !self.hierarchy.close(&node_id) {
            trace!(node = %node_id, "End marker with no open block");
        }
    }

    fn next_node_id(&mut self) -> String {
        self.node_counter += 1;
        format!("node_{}", self.node_counter)
    }

    fn finish(self, total_lines: usize) -> FlowGraph {
        debug!(
            framework = %self.framework,
            total_lines,
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            skipped = self.skipped,
            "Built flow graph"
        );

        FlowGraph {
            metadata: GraphMetadata {
                total_lines,
                node_count: self.nodes.len(),
                framework: self.framework,
            },
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Node label for a classified line: the single capture, all captures joined
/// by a space, or the matched text when the pattern captured nothing
pub fn derive_label(classified: &ClassifiedLine) -> String {
    match classified.captures.as_slice() {
        [] => classified.matched.clone(),
        [only] => only.clone(),
        groups => groups.join(" "),
    }
}
