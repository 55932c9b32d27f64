//! CLI output formatting utilities.

use crate::pomodoro::PomodoroSession;
use crate::timer::ActiveTimer;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print an active timer.
    pub fn timer(timer: &ActiveTimer) {
        println!(
            "  {} {} {} ({}, {} left)",
            style("*").cyan(),
            style(format!("#{}", timer.id)).dim(),
            style(&timer.name).bold(),
            timer.subject,
            format_remaining(timer.minutes_remaining(), timer.seconds_remaining())
        );
    }

    /// Print a Pomodoro session.
    pub fn pomodoro(session: &PomodoroSession) {
        println!(
            "  {} {} session {}/{} ({}, {})",
            style("*").cyan(),
            style(&session.subject).bold(),
            session.current_session,
            session.total_sessions,
            style(session.phase).yellow(),
            session.status
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format a countdown as `12m 05s`.
fn format_remaining(minutes: u64, seconds: u64) -> String {
    if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(12, 5), "12m 05s");
        assert_eq!(format_remaining(0, 42), "42s");
    }
}
