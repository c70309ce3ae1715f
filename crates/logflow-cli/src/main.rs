use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use logflow_cli::{read_log, render_graph_as_tree, render_summary, resolve_config, ConfigFlags};
use logflow_core::samples::{sample_for, EXAMPLE_LOG};
use logflow_core::{get_node_style, FlowParser, FrameworkDetector};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Turns AI-agent execution logs into hierarchical flow graphs.
#[derive(Parser, Debug)]
#[command(name = "logflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// YAML pattern file to use instead of the built-in patterns.
    #[arg(long, global = true, value_name = "FILE")]
    patterns: Option<PathBuf>,

    /// Reject logs with more lines than this.
    #[arg(long, global = true, value_name = "N")]
    max_lines: Option<usize>,

    /// Reject logs larger than this many bytes.
    #[arg(long, global = true, value_name = "N")]
    max_bytes: Option<usize>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a log into a flow graph.
    Parse {
        /// Log file to read; `-` or nothing reads stdin.
        file: Option<PathBuf>,

        /// Framework whose patterns to use instead of detecting one.
        #[arg(long, value_name = "NAME")]
        framework: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Print JSON on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Print the framework a log was written by.
    Detect {
        /// Log file to read; `-` or nothing reads stdin.
        file: Option<PathBuf>,
    },
    /// Print the color and shape used for a node category.
    Style { category: String },
    /// Print a bundled example log.
    Example {
        /// Print the sample for this framework instead of the generic one.
        #[arg(long, value_name = "NAME")]
        framework: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Tree,
    Summary,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .context("Failed to set global default tracing subscriber")
}

fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let flags = ConfigFlags {
        patterns: cli.patterns,
        max_lines: cli.max_lines,
        max_bytes: cli.max_bytes,
    };

    match cli.command {
        Command::Parse {
            file,
            framework,
            format,
            compact,
        } => {
            let parser = FlowParser::from_config(resolve_config(flags)?)
                .context("Failed to set up the log parser")?;
            let log = read_log(file.as_deref())?;
            let graph = parser.parse(&log, framework.as_deref())?;
            info!(
                framework = %graph.metadata.framework,
                nodes = graph.nodes.len(),
                edges = graph.edges.len(),
                "Parsed log"
            );

            let output = match format {
                OutputFormat::Json if compact => graph.to_json()?,
                OutputFormat::Json => graph.to_json_pretty()?,
                OutputFormat::Tree => render_graph_as_tree(&graph)?,
                OutputFormat::Summary => render_summary(&graph)?,
            };
            println!("{}", output.trim_end());
        }
        Command::Detect { file } => {
            let parser = FlowParser::from_config(resolve_config(flags)?)
                .context("Failed to set up the log parser")?;
            let log = read_log(file.as_deref())?;
            for (name, hits) in FrameworkDetector::new(parser.registry()).scores(&log) {
                debug!(framework = name, hits, "Indicator hits");
            }
            println!("{}", parser.detect(&log));
        }
        Command::Style { category } => {
            println!("{}", serde_json::to_string_pretty(&get_node_style(&category))?);
        }
        Command::Example { framework } => {
            let sample = match framework.as_deref() {
                Some(name) => {
                    sample_for(name).ok_or_else(|| anyhow!("No bundled sample for '{name}'"))?
                }
                None => EXAMPLE_LOG,
            };
            println!("{sample}");
        }
    }

    Ok(())
}
