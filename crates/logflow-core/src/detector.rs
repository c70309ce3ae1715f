//! Framework detection
//!
//! A cheap keyword heuristic: count how many of a framework's indicator
//! substrings occur anywhere in the document and take the first framework, in
//! registry order, whose count reaches the threshold. This is first-above-
//! threshold, not best match.

use crate::patterns::{PatternRegistry, GENERIC_FRAMEWORK};
use tracing::debug;

/// Picks the framework whose log conventions a document follows
pub struct FrameworkDetector<'a> {
    registry: &'a PatternRegistry,
}

impl<'a> FrameworkDetector<'a> {
    pub fn new(registry: &'a PatternRegistry) -> Self {
        Self { registry }
    }

    /// Name of the first framework reaching the threshold, or `generic`
    pub fn detect(&self, log_text: &str) -> String {
        let threshold = self.registry.detection_threshold();

        for framework in self.registry.frameworks() {
            let hits = indicator_hits(&framework.indicators, log_text);
            if hits >= threshold {
                debug!(framework = %framework.name, hits, "Detected log framework");
                return framework.name.clone();
            }
        }

        debug!("No framework reached the detection threshold");
        GENERIC_FRAMEWORK.to_string()
    }

    /// Indicator hit count for every framework, in detection order
    pub fn scores(&self, log_text: &str) -> Vec<(&'a str, usize)> {
        self.registry
            .frameworks()
            .iter()
            .map(|f| (f.name.as_str(), indicator_hits(&f.indicators, log_text)))
            .collect()
    }
}

// case-sensitive substring containment, each indicator counted once
fn indicator_hits(indicators: &[String], log_text: &str) -> usize {
    indicators
        .iter()
        .filter(|indicator| log_text.contains(indicator.as_str()))
        .count()
}
