//! Document-level entry point
//!
//! `FlowParser` owns a pattern registry and a configuration, resolves the
//! framework for each document (explicit hint or detection) and runs one
//! `GraphBuilder` per document.

use crate::builder::GraphBuilder;
use crate::config::{ParserConfig, RegistryConfig};
use crate::detector::FrameworkDetector;
use crate::error::FlowResult;
use crate::patterns::PatternRegistry;
use crate::types::FlowGraph;
use tracing::{debug, info, instrument, warn};

/// Parses agent execution logs into flow graphs
#[derive(Debug, Clone)]
pub struct FlowParser {
    registry: PatternRegistry,
    config: ParserConfig,
}

impl FlowParser {
    /// Create a parser over `registry` without input limits
    pub fn new(registry: PatternRegistry) -> Self {
        Self {
            registry,
            config: ParserConfig::default(),
        }
    }

    /// Create a parser over `registry` with explicit configuration
    pub fn with_config(registry: PatternRegistry, config: ParserConfig) -> FlowResult<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Create a parser from configuration, loading its pattern file if one is set
    pub fn from_config(config: ParserConfig) -> FlowResult<Self> {
        let registry = match &config.patterns_file {
            Some(path) => {
                info!(path = %path.display(), "Loading pattern file");
                PatternRegistry::from_config(&RegistryConfig::from_file(path)?)?
            }
            None => PatternRegistry::builtin(),
        };
        Self::with_config(registry, config)
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Detect the framework of a document
    pub fn detect(&self, log_text: &str) -> String {
        FrameworkDetector::new(&self.registry).detect(log_text)
    }

    /// Build a graph, ignoring the configured limits
    pub fn build(&self, log_text: &str, framework_hint: Option<&str>) -> FlowGraph {
        build_graph_with(&self.registry, log_text, framework_hint)
    }

    /// Build a graph after checking the document against the configured limits
    pub fn parse(&self, log_text: &str, framework_hint: Option<&str>) -> FlowResult<FlowGraph> {
        if let Err(e) = self.config.check_limits(log_text) {
            warn!(error = %e, "Rejecting log document");
            return Err(e);
        }
        Ok(self.build(log_text, framework_hint))
    }
}

impl Default for FlowParser {
    fn default() -> Self {
        Self::new(PatternRegistry::builtin())
    }
}

/// Framework a document is classified with: a non-blank hint verbatim,
/// otherwise the detected one
pub fn resolve_framework(
    registry: &PatternRegistry,
    log_text: &str,
    framework_hint: Option<&str>,
) -> String {
    match framework_hint.map(str::trim).filter(|h| !h.is_empty()) {
        Some(hint) => {
            if registry.framework(hint).is_none() {
                debug!(hint, "Unknown framework hint, using generic patterns");
            }
            hint.to_string()
        }
        None => FrameworkDetector::new(registry).detect(log_text),
    }
}

/// Build a graph for `log_text` using `registry`
#[instrument(skip_all, fields(bytes = log_text.len(), hint = ?framework_hint))]
pub fn build_graph_with(
    registry: &PatternRegistry,
    log_text: &str,
    framework_hint: Option<&str>,
) -> FlowGraph {
    let framework = resolve_framework(registry, log_text, framework_hint);
    GraphBuilder::new(registry, framework).build(log_text)
}
