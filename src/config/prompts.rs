//! Prompt templates for Studymate.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use super::Settings;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub agent: AgentPrompts,
    pub tutor: TutorPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the tool-calling agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub system: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a smart study assistant helping a student learn effectively.

You have tools to create study plans, explain concepts, generate practice questions, set study timers and run Pomodoro sessions.
Think about what the student needs, then use the appropriate tools.

Guidelines:
- Use 'create_study_plan' when the student wants to organise their learning time
- Use 'explain_concept' for questions like "what is" or "explain"
- Use 'generate_practice_questions' when the student wants to test themselves
- Use 'set_study_timer', 'list_active_timers' and 'cancel_timer' to manage timers
- Use 'start_pomodoro_session', 'get_pomodoro_status' and 'stop_pomodoro_session' for Pomodoro work

Timer IDs come from the tool results; never invent one.
When you have what you need, give a clear, encouraging final answer."#
                .to_string(),
        }
    }
}

/// Prompts for generated study content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorPrompts {
    pub study_plan: String,
    pub explain: String,
    pub practice: String,
}

impl Default for TutorPrompts {
    fn default() -> Self {
        Self {
            study_plan: r#"Create a comprehensive {{hours}}-hour study plan for {{topic}} for {{learning_style}} learners.
Include learning objectives, time allocation, resources, practice exercises, and assessment methods."#
                .to_string(),

            explain: r#"Explain {{concept}} to a {{level}} level student. Use analogies and simple language.
Structure the explanation with:
1. Basic definition
2. Key principles
3. Real-world applications
4. Common misconceptions
5. Summary"#
                .to_string(),

            practice: r#"Generate {{count}} {{difficulty}} difficulty practice questions about {{topic}}.
Number each question. After all questions, give an answer key with a short explanation for each answer."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = Settings::expand_path(dir);

            let agent_path = custom_path.join("agent.toml");
            if agent_path.exists() {
                let content = std::fs::read_to_string(&agent_path)?;
                prompts.agent = toml::from_str(&content)?;
            }

            let tutor_path = custom_path.join("tutor.toml");
            if tutor_path.exists() {
                let content = std::fs::read_to_string(&tutor_path)?;
                prompts.tutor = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
