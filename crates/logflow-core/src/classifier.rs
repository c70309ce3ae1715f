//! Per-line classification
//!
//! Two independent paths, tried in order:
//! 1. the active framework list (framework patterns, then generic), searched
//!    anywhere in the line;
//! 2. the literal fallback list, anchored at the start of the trimmed line,
//!    followed by the `YYYY-MM-DD HH:MM:SS <rest>` timestamp pattern.
//!
//! Within each list the first matching entry wins.

use crate::patterns::{PatternEntry, PatternRegistry, TIMESTAMPED_TAG};
use crate::types::ClassifiedLine;
use regex::{Captures, Regex};

/// Classifies log lines against one framework's active pattern list
pub struct LineClassifier<'a> {
    patterns: Vec<&'a PatternEntry>,
    literal: &'a [PatternEntry],
    timestamp: &'a Regex,
}

impl<'a> LineClassifier<'a> {
    /// Classifier over an explicit pattern list and the registry's fallbacks
    pub fn new(patterns: Vec<&'a PatternEntry>, registry: &'a PatternRegistry) -> Self {
        Self {
            patterns,
            literal: registry.literal(),
            timestamp: registry.timestamp(),
        }
    }

    /// Classifier for `framework`; unknown names use the generic list
    pub fn for_framework(registry: &'a PatternRegistry, framework: &str) -> Self {
        Self::new(registry.patterns_for(framework), registry)
    }

    /// The active pattern list, in evaluation order
    pub fn patterns(&self) -> &[&'a PatternEntry] {
        &self.patterns
    }

    /// Pattern path: first entry of the active list that matches anywhere in the line
    pub fn classify(&self, line: &str, line_number: usize) -> Option<ClassifiedLine> {
        let (entry, caps) = first_match(self.patterns.iter().copied(), line)?;
        Some(classified(entry.tag(), &caps, line, line_number))
    }

    /// Literal path: anchored fallback markers, then the timestamp prefix
    pub fn classify_literal(&self, line: &str, line_number: usize) -> Option<ClassifiedLine> {
        let trimmed = line.trim();
        if let Some((entry, caps)) = first_match(self.literal.iter(), trimmed) {
            return Some(classified(entry.tag(), &caps, line, line_number));
        }

        let caps = self.timestamp.captures(trimmed)?;
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();
        Some(ClassifiedLine {
            tag: TIMESTAMPED_TAG.to_string(),
            captures: vec![group(2)],
            matched: group(0),
            timestamp: Some(group(1)),
            line_number,
            raw: trimmed.to_string(),
        })
    }

    /// Pattern path with the literal path as fallback; `None` drops the line
    pub fn classify_line(&self, line: &str, line_number: usize) -> Option<ClassifiedLine> {
        self.classify(line, line_number)
            .or_else(|| self.classify_literal(line, line_number))
    }
}

/// First entry, in iteration order, whose regex finds a match in `text`
pub fn first_match<'p, 't>(
    patterns: impl IntoIterator<Item = &'p PatternEntry>,
    text: &'t str,
) -> Option<(&'p PatternEntry, Captures<'t>)> {
    patterns
        .into_iter()
        .find_map(|entry| entry.regex().captures(text).map(|caps| (entry, caps)))
}

fn classified(tag: &str, caps: &Captures<'_>, line: &str, line_number: usize) -> ClassifiedLine {
    ClassifiedLine {
        tag: tag.to_string(),
        captures: caps
            .iter()
            .skip(1)
            .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect(),
        matched: caps.get(0).map_or("", |m| m.as_str()).to_string(),
        timestamp: None,
        line_number,
        raw: line.trim().to_string(),
    }
}
