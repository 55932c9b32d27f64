//! Interactive chat command.
//!
//! Timers and Pomodoro sessions started from the chat keep running in the
//! background for as long as the session is open.

use crate::agent::Agent;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::context::StudyContext;
use console::style;
use std::io::{self, BufRead, Write};

/// Messages kept in the conversation, including the system prompt.
const MAX_HISTORY: usize = 30;

/// Commands handled locally instead of being sent to the model.
#[derive(Debug, PartialEq, Eq)]
enum LocalCommand {
    Exit,
    Clear,
    Timers,
    Pomodoro,
}

impl LocalCommand {
    fn parse(input: &str) -> Option<Self> {
        match input.to_lowercase().as_str() {
            "exit" | "quit" => Some(Self::Exit),
            "clear" => Some(Self::Clear),
            "timers" => Some(Self::Timers),
            "pomodoro" => Some(Self::Pomodoro),
            _ => None,
        }
    }
}

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut settings = settings;
    if let Some(model) = model {
        settings.llm.model = model;
    }

    let agent = Agent::from_settings(&settings)?;
    let mut conversation = agent.conversation()?;

    println!("\n{}", style("Studymate Chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask anything, or type 'timers', 'pomodoro', 'clear' or 'exit'.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match LocalCommand::parse(input) {
            Some(LocalCommand::Exit) => {
                Output::info("Goodbye!");
                break;
            }
            Some(LocalCommand::Clear) => {
                conversation.clear();
                Output::info("Conversation history cleared.");
                continue;
            }
            Some(LocalCommand::Timers) => {
                show_timers(&agent.tools().study);
                continue;
            }
            Some(LocalCommand::Pomodoro) => {
                show_pomodoro(&agent.tools().study);
                continue;
            }
            None => {}
        }

        let spinner = Output::spinner("Thinking...");
        let result = agent.send(&mut conversation, input).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                for call in &response.tool_calls {
                    println!("{}", style(format!("  [{}]", call.name)).dim());
                }
                println!("\n{} {}\n", style("Studymate:").cyan().bold(), response.content);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }

        conversation.trim_history(MAX_HISTORY);
    }

    Ok(())
}

fn show_timers(study: &StudyContext) {
    let timers = study.timers.list_active();
    if timers.is_empty() {
        Output::info("No active timers.");
        return;
    }

    Output::header("Active timers");
    for timer in &timers {
        Output::timer(timer);
    }
    println!();
}

fn show_pomodoro(study: &StudyContext) {
    match study.pomodoro.get_status() {
        Some(session) => {
            Output::header("Pomodoro");
            Output::pomodoro(&session);
            println!();
        }
        None => Output::info("No active Pomodoro session."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_commands() {
        assert_eq!(LocalCommand::parse("exit"), Some(LocalCommand::Exit));
        assert_eq!(LocalCommand::parse("QUIT"), Some(LocalCommand::Exit));
        assert_eq!(LocalCommand::parse("Clear"), Some(LocalCommand::Clear));
        assert_eq!(LocalCommand::parse("timers"), Some(LocalCommand::Timers));
        assert_eq!(LocalCommand::parse("pomodoro"), Some(LocalCommand::Pomodoro));
        assert_eq!(LocalCommand::parse("set a pomodoro for math"), None);
    }
}
