//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod serve;
mod tools;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use serve::{router, run_serve, AppState};
pub use tools::run_tools;
