//! Tag and style lookup tables
//!
//! Both lookups are total: an unknown tag passes through as its own category
//! and an unknown category gets the neutral gray box.

use crate::types::{Category, NodeStyle};

/// Map a raw semantic tag to its node category
pub fn map_tag(tag: &str) -> Category {
    match tag {
        "chain_start" | "task_start" => Category::Start,
        "chain_end" | "terminate" => Category::End,
        "thinking" => Category::Decision,
        "tool_call" | "agent_message" | "code_execution" | "agent_working" | "api_call" => {
            Category::Action
        }
        "observation" | "final_answer" | "execution_result" | "task_output" => Category::Result,
        "tool_usage" => Category::Tool,
        "log_level" => Category::Info,
        "log_error" | "exception_start" => Category::Error,
        "json_output" => Category::Data,
        "performance" | "memory" => Category::Metric,
        other => Category::from(other),
    }
}

/// Presentation style for a node category
pub fn node_style(category: &Category) -> NodeStyle {
    let (color, shape) = match category {
        Category::Start => ("#4CAF50", "ellipse"),
        Category::End => ("#F44336", "ellipse"),
        Category::Action => ("#2196F3", "box"),
        Category::Decision => ("#FF9800", "diamond"),
        Category::Result => ("#9C27B0", "box"),
        Category::Error => ("#F44336", "octagon"),
        Category::Tool => ("#00BCD4", "hexagon"),
        Category::Info => ("#607D8B", "box"),
        Category::Data => ("#795548", "box"),
        Category::Metric => ("#009688", "ellipse"),
        Category::Other(_) => ("#757575", "box"),
    };
    NodeStyle {
        color: color.to_string(),
        shape: shape.to_string(),
    }
}

/// Style lookup by category name
pub fn get_node_style(category: &str) -> NodeStyle {
    node_style(&Category::from(category))
}
