// ABOUTME: One-line descriptions of tool calls for prompts and denial reasons.
// ABOUTME: Commands show a bounded prefix, file tools show the path, everything else key=value pairs.

use serde_json::Value;

use crate::types::{ToolArgs, COMMAND_TOOL};

/// Longest command prefix shown in a description, in characters.
const COMMAND_PREVIEW_CHARS: usize = 50;

/// Format a tool call for display.
pub fn describe_tool_call(tool_name: &str, arguments: &ToolArgs) -> String {
    match tool_name {
        COMMAND_TOOL => format!(
            "run command: {}",
            truncate_chars(arguments.command().unwrap_or(""), COMMAND_PREVIEW_CHARS),
        ),
        "write_file" => format!("write file: {}", path_of(arguments)),
        "edit_file" => format!("edit file: {}", path_of(arguments)),
        _ => format!("{}({})", tool_name, arguments.render_pairs(3)),
    }
}

fn path_of(arguments: &ToolArgs) -> &str {
    arguments.get("path").and_then(Value::as_str).unwrap_or("")
}

/// Keep the first `max` characters of `text`. Character-based, so multibyte
/// text never gets split mid-codepoint.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
