//! CLI module for Studymate.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Studymate - AI Study Assistant
///
/// Chat with a study agent that builds study plans, explains concepts,
/// writes practice questions and keeps your study timers running.
#[derive(Parser, Debug)]
#[command(name = "studymate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "STUDYMATE_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the study assistant a single question
    Ask {
        /// The question or request
        query: String,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session (timers keep running between messages)
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the tools the assistant can use
    Tools,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["studymate", "serve", "--port", "8080"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_parse_verbosity() {
        let cli = Cli::parse_from(["studymate", "-vv", "ask", "What is entropy?"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Ask { .. }));
    }
}
