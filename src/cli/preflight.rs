//! Pre-flight checks before commands that need the language model.

use crate::config::Settings;
use crate::error::{Result, StudyError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Talking to the agent requires an API key.
    Ask,
    /// The server can run without one; only `/api/chat` needs it.
    Serve,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask => check_api_key(&settings.llm.api_key_env),
        Operation::Serve => Ok(()),
    }
}

/// Check that the configured API key variable is set.
pub fn check_api_key(var: &str) -> Result<()> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        Ok(_) => Err(StudyError::Config(format!(
            "{} is empty. Set it with: export {}='...'",
            var, var
        ))),
        Err(_) => Err(StudyError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            var, var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_has_no_requirements() {
        assert!(check(Operation::Serve, &Settings::default()).is_ok());
    }

    #[test]
    fn test_missing_key_is_reported() {
        let err = check_api_key("STUDYMATE_TEST_KEY_THAT_IS_NEVER_SET").unwrap_err();
        assert!(err.to_string().contains("not set"));
    }
}
