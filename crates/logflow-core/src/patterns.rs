//! Pattern registry
//!
//! Ordered `(pattern, tag)` tables grouped by originating framework, plus the
//! generic fallback list that is appended to every framework list. Order is
//! part of the contract: the first matching entry wins, so the tables are
//! plain vectors and are never re-keyed or sorted.

use crate::config::RegistryConfig;
use crate::error::{FlowError, FlowResult};
use regex::Regex;

/// Designator used when no framework is specified or detected
pub const GENERIC_FRAMEWORK: &str = "generic";

/// Minimum indicator hits for a framework to be detected
pub const DEFAULT_DETECTION_THRESHOLD: usize = 2;

const LANGCHAIN_PATTERNS: &[(&str, &str)] = &[
    (r"> Entering new (\w+) chain...", "chain_start"),
    (r"> Finished chain.", "chain_end"),
    (r"Thought:\s*(.*)", "thinking"),
    (r"Action:\s*(\w+)\[(.*?)\]", "tool_call"),
    (r"Observation:\s*(.*)", "observation"),
    (r"Final Answer:\s*(.*)", "final_answer"),
];

const AUTOGEN_PATTERNS: &[(&str, &str)] = &[
    (r"(\w+) \(to (\w+)\):", "agent_message"),
    (r"EXECUTING CODE BLOCK:", "code_execution"),
    (r"exitcode:\s*(\d+)", "execution_result"),
    (r"TERMINATE", "terminate"),
];

const CREWAI_PATTERNS: &[(&str, &str)] = &[
    (r"Working Agent:\s*(.*)", "agent_working"),
    (r"Starting Task:\s*(.*)", "task_start"),
    (r"Task Output:\s*(.*)", "task_output"),
    (r"Using tool:\s*(.*)", "tool_usage"),
];

const GENERIC_PATTERNS: &[(&str, &str)] = &[
    // error levels are listed first so they land in the error category
    (r"\[(ERROR|CRITICAL)\]\s*(.*)", "log_error"),
    (r"\[(DEBUG|INFO|WARNING)\]\s*(.*)", "log_level"),
    (r"(GET|POST|PUT|DELETE)\s+(\S+)\s+(\d+)", "api_call"),
    (r"\{.*\}", "json_output"),
    (r"Traceback \(most recent call last\):", "exception_start"),
    (r"Execution time:\s*(\d+\.?\d*)\s*(ms|s)", "performance"),
    (r"Memory usage:\s*(\d+\.?\d*)\s*(MB|GB)", "memory"),
];

const LANGCHAIN_INDICATORS: &[&str] = &[
    "Entering new",
    "chain",
    "Thought:",
    "Action:",
    "Observation:",
];
const AUTOGEN_INDICATORS: &[&str] = &["(to", "):", "EXECUTING CODE BLOCK", "exitcode:"];
const CREWAI_INDICATORS: &[&str] = &["Working Agent:", "Starting Task:", "Using tool:"];

// Matched against the trimmed line, anchored at its start.
const LITERAL_PATTERNS: &[(&str, &str)] = &[
    (r"\[START\]\s*(.*)", "start"),
    (r"\[END\]\s*(.*)", "end"),
    (r"\[ACTION\]\s*(\w+):\s*(.*)", "action"),
    (r"Executing:\s*(.*)", "action"),
    (r"\[DECISION\]\s*(.*)", "decision"),
    (r"Deciding:\s*(.*)", "decision"),
    (r"\[RESULT\]\s*(.*)", "result"),
    (r"Result:\s*(.*)", "result"),
    (r"\[ERROR\]\s*(.*)", "error"),
    (r"Error:\s*(.*)", "error"),
    (r"\[THINKING\]\s*(.*)", "thinking"),
    (r"Reasoning:\s*(.*)", "thinking"),
    (r"\[TOOL\]\s*(\w+):\s*(.*)", "tool"),
    (r"Calling tool:\s*(.*)", "tool"),
];

const TIMESTAMP_PATTERN: &str = r"^(\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2})\s+(.*)";

/// Tag given to lines recognized only by their leading timestamp
pub const TIMESTAMPED_TAG: &str = "timestamped";

/// One `(pattern, tag)` pair
#[derive(Debug, Clone)]
pub struct PatternEntry {
    regex: Regex,
    tag: String,
}

impl PatternEntry {
    /// Compile a pattern; the match is unanchored unless the pattern anchors itself
    pub fn new(pattern: &str, tag: impl Into<String>) -> FlowResult<Self> {
        let tag = tag.into();
        let regex = Regex::new(pattern)
            .map_err(|e| FlowError::invalid_pattern(tag.clone(), pattern, e))?;
        Ok(Self { regex, tag })
    }

    /// Compile a pattern that must match at the start of the text
    pub fn anchored(pattern: &str, tag: impl Into<String>) -> FlowResult<Self> {
        Self::new(&format!("^(?:{pattern})"), tag)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Patterns and detection indicators of one framework
#[derive(Debug, Clone)]
pub struct FrameworkPatterns {
    pub name: String,
    pub indicators: Vec<String>,
    pub patterns: Vec<PatternEntry>,
}

impl FrameworkPatterns {
    fn from_table(name: &str, indicators: &[&str], table: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
            patterns: compile_builtin(table, false),
        }
    }
}

/// Immutable set of pattern tables consulted by detection and classification
///
/// Registries are plain values: several may coexist, e.g. the built-in one and
/// a test fixture with custom patterns.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    frameworks: Vec<FrameworkPatterns>,
    generic: Vec<PatternEntry>,
    literal: Vec<PatternEntry>,
    timestamp: Regex,
    detection_threshold: usize,
}

impl PatternRegistry {
    /// The registry with the built-in langchain, autogen and crewai tables
    pub fn builtin() -> Self {
        Self {
            frameworks: vec![
                FrameworkPatterns::from_table(
                    "langchain",
                    LANGCHAIN_INDICATORS,
                    LANGCHAIN_PATTERNS,
                ),
                FrameworkPatterns::from_table("autogen", AUTOGEN_INDICATORS, AUTOGEN_PATTERNS),
                FrameworkPatterns::from_table("crewai", CREWAI_INDICATORS, CREWAI_PATTERNS),
            ],
            generic: compile_builtin(GENERIC_PATTERNS, false),
            literal: compile_builtin(LITERAL_PATTERNS, true),
            timestamp: Regex::new(TIMESTAMP_PATTERN).expect("built-in timestamp pattern compiles"),
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
        }
    }

    /// A registry with custom framework and generic tables and the built-in
    /// literal fallback
    pub fn new(
        frameworks: Vec<FrameworkPatterns>,
        generic: Vec<PatternEntry>,
        detection_threshold: usize,
    ) -> FlowResult<Self> {
        if detection_threshold == 0 {
            return Err(FlowError::invalid_argument(
                "detection threshold must be at least 1",
            ));
        }
        for (i, framework) in frameworks.iter().enumerate() {
            if framework.name.trim().is_empty() {
                return Err(FlowError::invalid_argument("framework name must not be empty"));
            }
            if framework.name == GENERIC_FRAMEWORK {
                return Err(FlowError::invalid_argument(format!(
                    "'{GENERIC_FRAMEWORK}' is reserved for the fallback pattern list"
                )));
            }
            if frameworks[..i].iter().any(|f| f.name == framework.name) {
                return Err(FlowError::invalid_argument(format!(
                    "duplicate framework '{}'",
                    framework.name
                )));
            }
        }

        // share the fallbacks already compiled for the process-wide registry
        let builtin = crate::builtin_registry();
        Ok(Self {
            frameworks,
            generic,
            literal: builtin.literal.clone(),
            timestamp: builtin.timestamp.clone(),
            detection_threshold,
        })
    }

    /// Build a registry from a pattern file description
    pub fn from_config(config: &RegistryConfig) -> FlowResult<Self> {
        let (mut frameworks, mut generic) = if config.extend_builtin {
            let builtin = Self::builtin();
            (builtin.frameworks, builtin.generic)
        } else {
            (Vec::new(), Vec::new())
        };

        for entry in &config.generic {
            generic.push(PatternEntry::new(&entry.pattern, entry.tag.as_str())?);
        }

        let mut replaced: Vec<&str> = Vec::new();
        for custom in &config.frameworks {
            let patterns = custom
                .patterns
                .iter()
                .map(|p| PatternEntry::new(&p.pattern, p.tag.as_str()))
                .collect::<FlowResult<Vec<_>>>()?;
            let framework = FrameworkPatterns {
                name: custom.name.clone(),
                indicators: custom.indicators.clone(),
                patterns,
            };
            // same-named entries replace the built-in in its enumeration slot
            let slot = frameworks.iter_mut().find(|f| f.name == framework.name);
            match slot {
                Some(existing)
                    if config.extend_builtin
                        && is_builtin_name(&existing.name)
                        && !replaced.contains(&custom.name.as_str()) =>
                {
                    replaced.push(&custom.name);
                    *existing = framework;
                }
                _ => frameworks.push(framework),
            }
        }

        Self::new(frameworks, generic, config.detection_threshold)
    }

    /// Patterns active for `framework`: its own list followed by the generic
    /// list. Unknown names get the generic list alone.
    pub fn patterns_for(&self, framework: &str) -> Vec<&PatternEntry> {
        self.framework(framework)
            .map(|f| f.patterns.iter())
            .into_iter()
            .flatten()
            .chain(self.generic.iter())
            .collect()
    }

    pub fn framework(&self, name: &str) -> Option<&FrameworkPatterns> {
        self.frameworks.iter().find(|f| f.name == name)
    }

    /// Frameworks in detection order
    pub fn frameworks(&self) -> &[FrameworkPatterns] {
        &self.frameworks
    }

    pub fn generic(&self) -> &[PatternEntry] {
        &self.generic
    }

    /// Anchored fallback patterns tried when the framework list finds nothing
    pub fn literal(&self) -> &[PatternEntry] {
        &self.literal
    }

    pub fn timestamp(&self) -> &Regex {
        &self.timestamp
    }

    pub fn detection_threshold(&self) -> usize {
        self.detection_threshold
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_builtin_name(name: &str) -> bool {
    matches!(name, "langchain" | "autogen" | "crewai")
}

fn compile_builtin(table: &[(&str, &str)], anchored: bool) -> Vec<PatternEntry> {
    table
        .iter()
        .map(|(pattern, tag)| {
            let entry = if anchored {
                PatternEntry::anchored(pattern, *tag)
            } else {
                PatternEntry::new(pattern, *tag)
            };
            entry.expect("built-in patterns are valid regexes")
        })
        .collect()
}
