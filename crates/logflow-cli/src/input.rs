use anyhow::{Context, Result};
use logflow_core::ParserConfig;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Limits and pattern file given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigFlags {
    pub patterns: Option<PathBuf>,
    pub max_lines: Option<usize>,
    pub max_bytes: Option<usize>,
}

impl From<ConfigFlags> for ParserConfig {
    fn from(flags: ConfigFlags) -> Self {
        ParserConfig {
            max_lines: flags.max_lines,
            max_bytes: flags.max_bytes,
            patterns_file: flags.patterns,
        }
    }
}

/// Environment configuration overlaid with the command-line flags
pub fn resolve_config(flags: ConfigFlags) -> Result<ParserConfig> {
    let env = ParserConfig::from_env().context("Invalid LOGFLOW_* environment configuration")?;
    Ok(env.merge(flags.into()))
}

/// Read a log document from `path`, or from stdin when the path is absent or `-`
pub fn read_log(path: Option<&Path>) -> Result<String> {
    let bytes = match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => fs::read(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?,
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read log from stdin")?;
            buffer
        }
    };
    decode_log(bytes)
}

/// Decode raw log bytes, which must be UTF-8
pub fn decode_log(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).context("Log input is not valid UTF-8")
}
