//! Generated study content: study plans, explanations and practice questions.
//!
//! The [`Tutor`] renders prompt templates and hands them to a
//! [`TextGenerator`], which wraps the language model.

mod openai;

pub use openai::OpenAIGenerator;

use crate::config::{Prompts, TutorPrompts};
use crate::error::{Result, StudyError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Trait for turning a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single user prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for diagnostics.
    fn model(&self) -> &str;
}

/// Produces study material from templates.
#[derive(Clone)]
pub struct Tutor {
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
}

impl Tutor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn templates(&self) -> &TutorPrompts {
        &self.prompts.tutor
    }

    /// Create a study plan for `topic` spread over `hours` hours.
    #[instrument(skip(self))]
    pub async fn study_plan(&self, topic: &str, hours: u32, learning_style: &str) -> Result<String> {
        require("topic", topic)?;
        if hours == 0 {
            return Err(StudyError::InvalidInput(
                "hours_available must be at least 1".to_string(),
            ));
        }

        let vars = vars(&[
            ("topic", topic.to_string()),
            ("hours", hours.to_string()),
            ("learning_style", learning_style.to_string()),
        ]);
        self.run(&self.templates().study_plan, &vars).await
    }

    /// Explain `concept` at the given level.
    #[instrument(skip(self))]
    pub async fn explain(&self, concept: &str, level: &str) -> Result<String> {
        require("concept", concept)?;

        let vars = vars(&[
            ("concept", concept.to_string()),
            ("level", level.to_string()),
        ]);
        self.run(&self.templates().explain, &vars).await
    }

    /// Generate `count` practice questions with an answer key.
    #[instrument(skip(self))]
    pub async fn practice_questions(
        &self,
        topic: &str,
        difficulty: &str,
        count: u32,
    ) -> Result<String> {
        require("topic", topic)?;
        if count == 0 {
            return Err(StudyError::InvalidInput(
                "count must be at least 1".to_string(),
            ));
        }

        let vars = vars(&[
            ("topic", topic.to_string()),
            ("difficulty", difficulty.to_string()),
            ("count", count.to_string()),
        ]);
        self.run(&self.templates().practice, &vars).await
    }

    #[instrument(skip_all, fields(model = %self.generator.model()))]
    async fn run(&self, template: &str, vars: &HashMap<String, String>) -> Result<String> {
        let prompt = self.prompts.render_with_custom(template, vars);
        self.generator.generate(&prompt).await
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StudyError::InvalidInput(format!("'{}' must not be empty", field)));
    }
    Ok(())
}

fn vars(pairs: &[(&str, String)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Echoes prompts back and remembers them.
    #[derive(Default)]
    pub struct EchoGenerator {
        pub prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(format!("generated: {}", prompt))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    /// Simulates an unreachable model.
    pub struct OfflineGenerator;

    #[async_trait]
    impl TextGenerator for OfflineGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(StudyError::Generation("service unavailable".to_string()))
        }

        fn model(&self) -> &str {
            "offline"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{EchoGenerator, OfflineGenerator};
    use super::*;

    #[tokio::test]
    async fn test_study_plan_prompt() {
        let generator = Arc::new(EchoGenerator::default());
        let tutor = Tutor::new(generator.clone());

        let plan = tutor.study_plan("calculus", 10, "visual").await.unwrap();
        assert!(plan.starts_with("generated: "));

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("10-hour study plan for calculus for visual learners"));
    }

    #[tokio::test]
    async fn test_explain_prompt() {
        let generator = Arc::new(EchoGenerator::default());
        let tutor = Tutor::new(generator.clone());

        tutor.explain("entropy", "beginner").await.unwrap();
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].starts_with("Explain entropy to a beginner level student."));
    }

    #[tokio::test]
    async fn test_practice_prompt() {
        let generator = Arc::new(EchoGenerator::default());
        let tutor = Tutor::new(generator.clone());

        tutor.practice_questions("algebra", "medium", 5).await.unwrap();
        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("Generate 5 medium difficulty practice questions about algebra."));
    }

    #[tokio::test]
    async fn test_rejects_empty_input() {
        let tutor = Tutor::new(Arc::new(EchoGenerator::default()));
        tokio_test::assert_err!(tutor.explain("  ", "beginner").await);
        tokio_test::assert_err!(tutor.study_plan("math", 0, "visual").await);
        tokio_test::assert_err!(tutor.practice_questions("math", "hard", 0).await);
    }

    #[tokio::test]
    async fn test_generation_failure_propagates() {
        let tutor = Tutor::new(Arc::new(OfflineGenerator));
        assert!(matches!(
            tutor.explain("gravity", "beginner").await,
            Err(StudyError::Generation(_))
        ));
    }
}
