use thiserror::Error;

/// Errors that can occur while configuring or running the flow parser
#[derive(Debug, Error)]
pub enum FlowError {
    /// A configured pattern is not a valid regular expression
    #[error("Invalid pattern for tag '{tag}': {pattern}")]
    InvalidPattern {
        tag: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A caller passed a value the API contract does not accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input exceeded a caller-imposed size limit
    #[error("Input too large: {actual} {unit} exceeds the limit of {limit}")]
    InputTooLarge {
        unit: &'static str,
        limit: usize,
        actual: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl FlowError {
    /// Create a new invalid pattern error
    pub fn invalid_pattern(
        tag: impl Into<String>,
        pattern: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        Self::InvalidPattern {
            tag: tag.into(),
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new input-too-large error
    pub fn input_too_large(unit: &'static str, limit: usize, actual: usize) -> Self {
        Self::InputTooLarge {
            unit,
            limit,
            actual,
        }
    }
}

/// Result type for flow operations
pub type FlowResult<T> = Result<T, FlowError>;
