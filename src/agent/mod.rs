//! Agent system for study assistance with tool calling.
//!
//! Provides an LLM agent that can use tools to generate study material and
//! to manage timers and Pomodoro sessions.

mod catalog;
mod runner;
mod tools;

pub use catalog::{tool_catalog, ToolInfo};
pub use runner::{Agent, AgentResponse, Conversation, ToolCallRecord};
pub use tools::{parse_tool_call, tool_definitions, ToolCall, ToolContext};
