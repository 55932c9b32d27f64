//! Tools command implementation.

use crate::agent::tool_catalog;
use crate::cli::Output;
use anyhow::Result;

/// List the tools the assistant can use.
pub fn run_tools() -> Result<()> {
    Output::header("Available tools");

    for tool in tool_catalog() {
        println!();
        Output::list_item(tool.name);
        Output::kv("Description", tool.description);
        Output::kv("Parameters", &tool.parameters.join(", "));
        Output::kv("Example", &format!("\"{}\"", tool.example));
    }
    println!();

    Ok(())
}
