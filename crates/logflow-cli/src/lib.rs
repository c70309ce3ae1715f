//! Command-line front end for logflow: input handling and text renderers

pub mod input;
pub mod renderer;

pub use input::{decode_log, read_log, resolve_config, ConfigFlags};
pub use renderer::{render_graph_as_tree, render_summary};
