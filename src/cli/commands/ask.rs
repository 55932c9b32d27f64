//! Ask command implementation.

use crate::agent::Agent;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::suggest::followup_suggestions;
use anyhow::Result;

/// Tools whose effects only last while the process is running.
const BACKGROUND_TOOLS: &[&str] = &["set_study_timer", "start_pomodoro_session"];

/// Run the ask command.
pub async fn run_ask(query: &str, model: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let mut settings = settings;
    if let Some(model) = model {
        settings.llm.model = model;
    }

    let agent = Agent::from_settings(&settings)?;

    let spinner = Output::spinner("Thinking...");

    match agent.run(query).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.content);

            if !response.tool_calls.is_empty() {
                Output::header(&format!("Tool calls ({})", response.tool_calls.len()));
                for call in &response.tool_calls {
                    Output::list_item(&truncate(&call.to_string(), 72));
                }
                println!();
            }

            if response
                .tool_calls
                .iter()
                .any(|call| BACKGROUND_TOOLS.contains(&call.name.as_str()))
            {
                Output::warning(
                    "Timers stop when this command exits. Use 'studymate chat' or 'studymate serve' to keep them running.",
                );
            }

            Output::header("You might also ask");
            for suggestion in followup_suggestions(query) {
                Output::list_item(&suggestion);
            }
            println!();
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("cancel_timer({})", 72), "cancel_timer({})");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }
}
