//! Studymate - AI Study Assistant
//!
//! A chat-driven study companion that writes study plans, explains concepts,
//! generates practice questions and keeps study timers running in the
//! background.
//!
//! # Overview
//!
//! Studymate allows you to:
//! - Ask an LLM agent for study plans, explanations and practice questions
//! - Set named countdown timers that notify you when they finish
//! - Run Pomodoro sessions that alternate focus and break phases on their own
//! - Drive all of the above from the CLI or over an HTTP API
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `scheduler` - Cancellable deferred tasks
//! - `timer` - Study timer registry
//! - `pomodoro` - Pomodoro session controller
//! - `notify` - Notification sinks (log, webhook)
//! - `context` - Shared study state handed to tools and handlers
//! - `tutor` - Study content generation through a language model
//! - `agent` - Tool-calling agent loop
//! - `suggest` - Follow-up suggestions for a query
//!
//! # Example
//!
//! ```rust,no_run
//! use studymate::config::Settings;
//! use studymate::context::StudyContext;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let study = StudyContext::from_settings(&settings)?;
//!
//!     let id = study.timers.set_timer(25, "calculus", None)?;
//!     println!("Started timer {}", id);
//!
//!     for timer in study.timers.list_active() {
//!         println!("{}", timer);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod notify;
pub mod openai;
pub mod pomodoro;
pub mod scheduler;
pub mod suggest;
pub mod timer;
pub mod tutor;

pub use error::{Result, StudyError};
