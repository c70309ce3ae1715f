//! Parser configuration for logflow
//!
//! Provides input limits and the location of an optional pattern file, plus
//! the YAML description of custom pattern registries.

use crate::error::{FlowError, FlowResult};
use crate::patterns::DEFAULT_DETECTION_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the maximum number of input lines
pub const ENV_MAX_LINES: &str = "LOGFLOW_MAX_LINES";
/// Environment variable holding the maximum input size in bytes
pub const ENV_MAX_BYTES: &str = "LOGFLOW_MAX_BYTES";
/// Environment variable holding the path of a pattern file
pub const ENV_PATTERNS: &str = "LOGFLOW_PATTERNS";

/// Configuration for a `FlowParser`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    /// Reject documents with more `\n`-separated lines than this
    pub max_lines: Option<usize>,
    /// Reject documents larger than this many bytes
    pub max_bytes: Option<usize>,
    /// YAML pattern file to load instead of the built-in registry
    pub patterns_file: Option<PathBuf>,
}

impl ParserConfig {
    /// Create a configuration without limits that uses the built-in patterns
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `LOGFLOW_MAX_LINES`, `LOGFLOW_MAX_BYTES` and `LOGFLOW_PATTERNS`
    ///
    /// Unset or empty variables leave the field unset.
    pub fn from_env() -> FlowResult<Self> {
        Ok(Self {
            max_lines: env_usize(ENV_MAX_LINES)?,
            max_bytes: env_usize(ENV_MAX_BYTES)?,
            patterns_file: env_value(ENV_PATTERNS).map(PathBuf::from),
        })
    }

    /// Set the line limit
    pub fn with_max_lines(mut self, lines: usize) -> Self {
        self.max_lines = Some(lines);
        self
    }

    /// Set the byte limit
    pub fn with_max_bytes(mut self, bytes: usize) -> Self {
        self.max_bytes = Some(bytes);
        self
    }

    /// Set the pattern file
    pub fn with_patterns_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.patterns_file = Some(path.into());
        self
    }

    /// Overlay values that are set in `other`
    pub fn merge(mut self, other: ParserConfig) -> Self {
        if other.max_lines.is_some() {
            self.max_lines = other.max_lines;
        }
        if other.max_bytes.is_some() {
            self.max_bytes = other.max_bytes;
        }
        if other.patterns_file.is_some() {
            self.patterns_file = other.patterns_file;
        }
        self
    }

    /// Reject zero limits, which would refuse every document
    pub fn validate(&self) -> FlowResult<()> {
        if self.max_lines == Some(0) {
            return Err(FlowError::invalid_argument("max_lines must be at least 1"));
        }
        if self.max_bytes == Some(0) {
            return Err(FlowError::invalid_argument("max_bytes must be at least 1"));
        }
        Ok(())
    }

    /// Check a document against the configured limits
    pub fn check_limits(&self, log_text: &str) -> FlowResult<()> {
        if let Some(limit) = self.max_bytes {
            if log_text.len() > limit {
                return Err(FlowError::input_too_large("bytes", limit, log_text.len()));
            }
        }
        if let Some(limit) = self.max_lines {
            let lines = log_text.split('\n').count();
            if lines > limit {
                return Err(FlowError::input_too_large("lines", limit, lines));
            }
        }
        Ok(())
    }
}

/// Builder for parser configuration
#[derive(Debug, Clone, Default)]
pub struct ParserConfigBuilder {
    config: ParserConfig,
}

impl ParserConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configuration
    pub fn build(self) -> FlowResult<ParserConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    pub fn max_lines(mut self, lines: usize) -> Self {
        self.config.max_lines = Some(lines);
        self
    }

    pub fn max_bytes(mut self, bytes: usize) -> Self {
        self.config.max_bytes = Some(bytes);
        self
    }

    pub fn patterns_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.patterns_file = Some(path.into());
        self
    }
}

/// A `(pattern, tag)` pair as written in a pattern file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub pattern: String,
    pub tag: String,
}

/// A framework as written in a pattern file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSpec {
    pub name: String,
    #[serde(default)]
    pub indicators: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,
}

/// YAML description of a pattern registry
///
/// ```yaml
/// extend_builtin: true
/// detection_threshold: 2
/// frameworks:
///   - name: smolagents
///     indicators: ["Step ", "Calling tool:"]
///     patterns:
///       - { pattern: 'Step (\d+)', tag: task_start }
/// generic:
///   - { pattern: 'WARN (.*)', tag: log_level }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Keep the built-in frameworks and generic list, adding to them
    #[serde(default = "default_extend_builtin")]
    pub extend_builtin: bool,
    #[serde(default = "default_detection_threshold")]
    pub detection_threshold: usize,
    #[serde(default)]
    pub frameworks: Vec<FrameworkSpec>,
    /// Appended after the built-in generic patterns
    #[serde(default)]
    pub generic: Vec<PatternSpec>,
}

impl RegistryConfig {
    /// Parse a pattern file from YAML text
    pub fn from_yaml(text: &str) -> FlowResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a pattern file from disk
    pub fn from_file(path: impl AsRef<Path>) -> FlowResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            extend_builtin: default_extend_builtin(),
            detection_threshold: default_detection_threshold(),
            frameworks: Vec::new(),
            generic: Vec::new(),
        }
    }
}

fn default_extend_builtin() -> bool {
    true
}

fn default_detection_threshold() -> usize {
    DEFAULT_DETECTION_THRESHOLD
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_usize(key: &str) -> FlowResult<Option<usize>> {
    env_value(key)
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                FlowError::invalid_argument(format!(
                    "{key} must be a non-negative integer, got '{v}'"
                ))
            })
        })
        .transpose()
}
