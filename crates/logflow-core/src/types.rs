//! Core graph types for logflow
//!
//! This module contains the node/edge model produced by a graph build and the
//! intermediate classification record produced per log line. These types are
//! designed to be:
//! 1. Serializable in the wire shape the flow visualizer front end consumes
//! 2. Immutable once appended to a graph
//! 3. Owned by a single build invocation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse node kind used for graph shape and style
///
/// Tags that map to none of the named kinds are kept verbatim in `Other`, so a
/// new tag flows through the graph unchanged instead of being collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Start,
    End,
    Action,
    Decision,
    Result,
    Error,
    Tool,
    Info,
    Data,
    Metric,
    Other(String),
}

impl Category {
    /// Name used on the wire and in the style table
    pub fn as_str(&self) -> &str {
        match self {
            Category::Start => "start",
            Category::End => "end",
            Category::Action => "action",
            Category::Decision => "decision",
            Category::Result => "result",
            Category::Error => "error",
            Category::Tool => "tool",
            Category::Info => "info",
            Category::Data => "data",
            Category::Metric => "metric",
            Category::Other(tag) => tag,
        }
    }

    /// Whether a node of this kind opens a nested block
    pub fn opens_block(&self) -> bool {
        matches!(self, Category::Start)
    }

    /// Whether a node of this kind closes the innermost open block
    pub fn closes_block(&self) -> bool {
        matches!(self, Category::End)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        match name {
            "start" => Category::Start,
            "end" => Category::End,
            "action" => Category::Action,
            "decision" => Category::Decision,
            "result" => Category::Result,
            "error" => Category::Error,
            "tool" => Category::Tool,
            "info" => Category::Info,
            "data" => Category::Data,
            "metric" => Category::Metric,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from(name.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            named => named.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship an edge encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// First child opened under the current parent block
    Hierarchy,
    /// Follows another node at the same nesting depth
    Default,
    /// Leads into an error node
    Error,
}

/// Presentation hint for a node category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub color: String,
    pub shape: String,
}

/// Source information attached to every non-root node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDetails {
    /// The trimmed log line the node was created from
    pub full_content: String,
    /// 1-based line number in the input document
    pub line_number: usize,
    pub style: NodeStyle,
}

/// A node in the flow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub timestamp: Option<String>,
    /// `None` only for the synthetic root
    pub details: Option<NodeDetails>,
    /// Nesting depth at creation time; the root is the only node at level 0
    pub level: usize,
}

/// A directed edge between two nodes of the same graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

/// Summary of one graph build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// Number of `\n`-separated segments in the input
    pub total_lines: usize,
    #[serde(rename = "parsed_nodes")]
    pub node_count: usize,
    /// Framework hint as passed in, or the detected framework
    #[serde(rename = "detected_framework")]
    pub framework: String,
}

/// Flow graph for visualization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
    pub metadata: GraphMetadata,
}

impl FlowGraph {
    /// The synthetic root node
    pub fn root(&self) -> Option<&FlowNode> {
        self.nodes.first()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges leading into the given node
    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == id)
    }

    /// Serialize in the visualizer wire format
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize in the visualizer wire format, indented
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Result of classifying a single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// Raw semantic tag of the matching pattern, e.g. `tool_call`
    pub tag: String,
    /// Capture groups in order; non-participating groups are empty strings
    pub captures: Vec<String>,
    /// Full text of the match, used as the label when there are no captures
    pub matched: String,
    /// Timestamp extracted by the timestamp fallback
    pub timestamp: Option<String>,
    pub line_number: usize,
    /// The trimmed source line
    pub raw: String,
}
