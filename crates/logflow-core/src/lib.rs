//! # Logflow Core
//!
//! Log classification and hierarchical flow-graph construction for AI-agent
//! execution logs.
//!
//! Data flows one direction:
//! 1. `FrameworkDetector` picks the framework whose conventions the log follows
//! 2. `LineClassifier` tags each line, framework patterns first, then the
//!    literal fallback markers
//! 3. `map_tag` collapses the raw tag into a `Category`
//! 4. `GraphBuilder` links the nodes by temporal order and nesting
//!
//! ```
//! use logflow_core::{build_graph, EdgeKind};
//!
//! let graph = build_graph("[START] begin\n[ACTION] search: find files\n[END] done", None);
//! assert_eq!(graph.metadata.node_count, 4);
//! assert_eq!(graph.edges[0].kind, EdgeKind::Hierarchy);
//! ```

pub mod builder;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod error;
pub mod parser;
pub mod patterns;
pub mod samples;
pub mod style;
pub mod types;

pub use builder::{derive_label, GraphBuilder, HierarchyTracker};
pub use classifier::LineClassifier;
pub use config::{ParserConfig, ParserConfigBuilder, RegistryConfig};
pub use detector::FrameworkDetector;
pub use error::{FlowError, FlowResult};
pub use parser::{build_graph_with, resolve_framework, FlowParser};
pub use patterns::{FrameworkPatterns, PatternEntry, PatternRegistry, GENERIC_FRAMEWORK};
pub use style::{get_node_style, map_tag, node_style};
pub use types::*;

use std::sync::OnceLock;

static BUILTIN_REGISTRY: OnceLock<PatternRegistry> = OnceLock::new();

/// The built-in registry, compiled once per process
pub fn builtin_registry() -> &'static PatternRegistry {
    BUILTIN_REGISTRY.get_or_init(PatternRegistry::builtin)
}

/// Build a flow graph from a log document with the built-in patterns
///
/// Without a hint (or with a blank one) the framework is detected from the
/// text. An unknown hint falls back to the generic patterns.
pub fn build_graph(log_text: &str, framework_hint: Option<&str>) -> FlowGraph {
    build_graph_with(builtin_registry(), log_text, framework_hint)
}
