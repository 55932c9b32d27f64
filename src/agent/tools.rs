//! Tool definitions and implementations for the agent system.

use crate::context::StudyContext;
use crate::error::{Result, StudyError};
use crate::timer::TimerId;
use crate::tutor::Tutor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Available tools for the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Build a study plan for a topic.
    CreateStudyPlan {
        topic: String,
        hours_available: u32,
        #[serde(default = "default_learning_style")]
        learning_style: String,
    },

    /// Explain a concept at a given level.
    ExplainConcept {
        concept: String,
        #[serde(default = "default_level")]
        level: String,
    },

    /// Generate practice questions with answers.
    GeneratePracticeQuestions {
        topic: String,
        #[serde(default = "default_difficulty")]
        difficulty: String,
        #[serde(default = "default_question_count")]
        count: u32,
    },

    /// Start a single study timer.
    SetStudyTimer {
        duration_minutes: u32,
        subject: String,
        timer_name: Option<String>,
    },

    /// List timers that are still running.
    ListActiveTimers,

    /// Cancel a timer by ID.
    CancelTimer { timer_id: TimerId },

    /// Start a Pomodoro session, replacing any running one.
    StartPomodoroSession {
        subject: String,
        sessions: Option<u32>,
    },

    /// Report the Pomodoro session state.
    GetPomodoroStatus,

    /// Stop the running Pomodoro session.
    StopPomodoroSession,
}

fn default_learning_style() -> String {
    "visual".to_string()
}

fn default_level() -> String {
    "beginner".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_question_count() -> u32 {
    5
}

/// Tool execution context with access to study state and the tutor.
#[derive(Clone)]
pub struct ToolContext {
    pub study: StudyContext,
    pub tutor: Tutor,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(study: StudyContext, tutor: Tutor) -> Self {
        Self { study, tutor }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::CreateStudyPlan {
                topic,
                hours_available,
                learning_style,
            } => {
                self.tutor
                    .study_plan(topic, *hours_available, learning_style)
                    .await
            }
            ToolCall::ExplainConcept { concept, level } => self.tutor.explain(concept, level).await,
            ToolCall::GeneratePracticeQuestions {
                topic,
                difficulty,
                count,
            } => {
                self.tutor
                    .practice_questions(topic, difficulty, *count)
                    .await
            }
            ToolCall::SetStudyTimer {
                duration_minutes,
                subject,
                timer_name,
            } => self.execute_set_timer(*duration_minutes, subject, timer_name.as_deref()),
            ToolCall::ListActiveTimers => Ok(self.execute_list_timers()),
            ToolCall::CancelTimer { timer_id } => Ok(self.execute_cancel_timer(*timer_id)),
            ToolCall::StartPomodoroSession { subject, sessions } => {
                self.execute_start_pomodoro(subject, *sessions)
            }
            ToolCall::GetPomodoroStatus => Ok(self.execute_pomodoro_status()),
            ToolCall::StopPomodoroSession => Ok(self.execute_stop_pomodoro()),
        }
    }

    fn execute_set_timer(
        &self,
        duration_minutes: u32,
        subject: &str,
        name: Option<&str>,
    ) -> Result<String> {
        let id = self.study.timers.set_timer(duration_minutes, subject, name)?;
        Ok(format!(
            "Timer set for {} minutes for {}. Timer ID: {}",
            duration_minutes,
            subject.trim(),
            id
        ))
    }

    fn execute_list_timers(&self) -> String {
        let timers = self.study.timers.list_active();
        if timers.is_empty() {
            return "No active timers.".to_string();
        }

        timers
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn execute_cancel_timer(&self, id: TimerId) -> String {
        match self.study.timers.cancel(id) {
            Ok(()) => format!("Timer {} has been cancelled.", id),
            Err(e) => format!("{}.", e),
        }
    }

    fn execute_start_pomodoro(&self, subject: &str, sessions: Option<u32>) -> Result<String> {
        let sessions = sessions.unwrap_or_else(|| self.study.default_sessions());
        let session = self.study.pomodoro.start(subject, sessions)?;
        let durations = self.study.pomodoro.durations();

        Ok(format!(
            "Starting Pomodoro session for {}: {} cycles of {}min focus + {}min breaks. Session 1/{} started.",
            session.subject,
            session.total_sessions,
            durations.focus.as_secs() / 60,
            durations.short_break.as_secs() / 60,
            session.total_sessions
        ))
    }

    fn execute_pomodoro_status(&self) -> String {
        match self.study.pomodoro.get_status() {
            Some(session) => session.to_string(),
            None => "No active Pomodoro session.".to_string(),
        }
    }

    fn execute_stop_pomodoro(&self) -> String {
        match self.study.pomodoro.stop() {
            Ok(session) => format!(
                "Stopped the Pomodoro session for {} during session {}/{}.",
                session.subject, session.current_session, session.total_sessions
            ),
            Err(e) => format!("{}.", e),
        }
    }
}

/// Get OpenAI function/tool definitions for the agent.
pub fn tool_definitions() -> Vec<async_openai::types::ChatCompletionTool> {
    use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};

    let tool = |name: &str, description: &str, parameters: Value| ChatCompletionTool {
        r#type: ChatCompletionToolType::Function,
        function: FunctionObject {
            name: name.to_string(),
            description: Some(description.to_string()),
            parameters: Some(parameters),
            strict: None,
        },
    };

    vec![
        tool(
            "create_study_plan",
            "Create a detailed study plan for a topic with time allocation, resources and exercises.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string", "description": "What to study" },
                    "hours_available": { "type": "integer", "description": "Total study hours" },
                    "learning_style": {
                        "type": "string",
                        "description": "Learning style such as visual, auditory or kinesthetic (default: visual)"
                    }
                },
                "required": ["topic", "hours_available"]
            }),
        ),
        tool(
            "explain_concept",
            "Explain an academic concept at an appropriate level, with analogies and applications.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "concept": { "type": "string", "description": "The concept to explain" },
                    "level": {
                        "type": "string",
                        "description": "Student level: beginner, intermediate or advanced (default: beginner)"
                    }
                },
                "required": ["concept"]
            }),
        ),
        tool(
            "generate_practice_questions",
            "Generate practice questions with an answer key.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string", "description": "Question topic" },
                    "difficulty": {
                        "type": "string",
                        "description": "easy, medium or hard (default: medium)"
                    },
                    "count": { "type": "integer", "description": "Number of questions (default: 5)" }
                },
                "required": ["topic"]
            }),
        ),
        tool(
            "set_study_timer",
            "Set a study timer for a specific duration and subject. Returns the timer ID.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "duration_minutes": { "type": "integer", "description": "Timer length in minutes" },
                    "subject": { "type": "string", "description": "Subject being studied" },
                    "timer_name": {
                        "type": "string",
                        "description": "Optional label (default: Study Session)"
                    }
                },
                "required": ["duration_minutes", "subject"]
            }),
        ),
        tool(
            "list_active_timers",
            "List all currently active timers with their remaining time.",
            serde_json::json!({ "type": "object", "properties": {} }),
        ),
        tool(
            "cancel_timer",
            "Cancel an active timer by its ID.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "timer_id": { "type": "integer", "description": "ID returned by set_study_timer" }
                },
                "required": ["timer_id"]
            }),
        ),
        tool(
            "start_pomodoro_session",
            "Start a Pomodoro session (focus blocks separated by short breaks). Replaces any running session.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "subject": { "type": "string", "description": "Subject to focus on" },
                    "sessions": { "type": "integer", "description": "Number of focus sessions (default: 4)" }
                },
                "required": ["subject"]
            }),
        ),
        tool(
            "get_pomodoro_status",
            "Get the current Pomodoro session's subject, session number and phase.",
            serde_json::json!({ "type": "object", "properties": {} }),
        ),
        tool(
            "stop_pomodoro_session",
            "Stop the running Pomodoro session.",
            serde_json::json!({ "type": "object", "properties": {} }),
        ),
    ]
}

/// Parse a tool call from the OpenAI response format.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: Value = if arguments.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(arguments)
            .map_err(|e| StudyError::Agent(format!("Invalid tool arguments: {}", e)))?
    };

    match name {
        "create_study_plan" => Ok(ToolCall::CreateStudyPlan {
            topic: required_str(&args, "topic")?,
            hours_available: required_u32(&args, "hours_available")?,
            learning_style: optional_str(&args, "learning_style")
                .unwrap_or_else(default_learning_style),
        }),
        "explain_concept" => Ok(ToolCall::ExplainConcept {
            concept: required_str(&args, "concept")?,
            level: optional_str(&args, "level").unwrap_or_else(default_level),
        }),
        "generate_practice_questions" => Ok(ToolCall::GeneratePracticeQuestions {
            topic: required_str(&args, "topic")?,
            difficulty: optional_str(&args, "difficulty").unwrap_or_else(default_difficulty),
            count: optional_u32(&args, "count")?.unwrap_or_else(default_question_count),
        }),
        "set_study_timer" => Ok(ToolCall::SetStudyTimer {
            duration_minutes: required_u32(&args, "duration_minutes")?,
            subject: required_str(&args, "subject")?,
            timer_name: optional_str(&args, "timer_name"),
        }),
        "list_active_timers" => Ok(ToolCall::ListActiveTimers),
        "cancel_timer" => Ok(ToolCall::CancelTimer {
            timer_id: required_u64(&args, "timer_id")?,
        }),
        "start_pomodoro_session" => Ok(ToolCall::StartPomodoroSession {
            subject: required_str(&args, "subject")?,
            sessions: optional_u32(&args, "sessions")?,
        }),
        "get_pomodoro_status" => Ok(ToolCall::GetPomodoroStatus),
        "stop_pomodoro_session" => Ok(ToolCall::StopPomodoroSession),
        _ => Err(StudyError::Agent(format!("Unknown tool: {}", name))),
    }
}

fn optional_str(args: &Value, key: &str) -> Option<String> {
    args[key]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required_str(args: &Value, key: &str) -> Result<String> {
    optional_str(args, key)
        .ok_or_else(|| StudyError::Agent(format!("Missing '{}' argument", key)))
}

/// Integers sometimes arrive as strings ("25"); accept both.
fn optional_u64(args: &Value, key: &str) -> Result<Option<u64>> {
    match &args[key] {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| StudyError::Agent(format!("'{}' must be a positive integer", key))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| StudyError::Agent(format!("'{}' must be a positive integer", key))),
        _ => Err(StudyError::Agent(format!("'{}' must be a positive integer", key))),
    }
}

fn required_u64(args: &Value, key: &str) -> Result<u64> {
    optional_u64(args, key)?.ok_or_else(|| StudyError::Agent(format!("Missing '{}' argument", key)))
}

fn optional_u32(args: &Value, key: &str) -> Result<Option<u32>> {
    optional_u64(args, key)?
        .map(|v| {
            u32::try_from(v).map_err(|_| StudyError::Agent(format!("'{}' is too large", key)))
        })
        .transpose()
}

fn required_u32(args: &Value, key: &str) -> Result<u32> {
    optional_u32(args, key)?.ok_or_else(|| StudyError::Agent(format!("Missing '{}' argument", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::tutor::testing::{EchoGenerator, OfflineGenerator};
    use std::sync::Arc;

    fn context() -> ToolContext {
        let study = StudyContext::from_settings(&Settings::default()).unwrap();
        ToolContext::new(study, Tutor::new(Arc::new(EchoGenerator::default())))
    }

    #[test]
    fn test_parse_set_timer() {
        let tool = parse_tool_call(
            "set_study_timer",
            r#"{"duration_minutes": 25, "subject": "math", "timer_name": "Drill"}"#,
        )
        .unwrap();
        assert_eq!(
            tool,
            ToolCall::SetStudyTimer {
                duration_minutes: 25,
                subject: "math".to_string(),
                timer_name: Some("Drill".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_accepts_numeric_strings() {
        let tool = parse_tool_call("cancel_timer", r#"{"timer_id": "3"}"#).unwrap();
        assert_eq!(tool, ToolCall::CancelTimer { timer_id: 3 });
    }

    #[test]
    fn test_parse_defaults() {
        let tool = parse_tool_call("explain_concept", r#"{"concept": "photosynthesis"}"#).unwrap();
        assert_eq!(
            tool,
            ToolCall::ExplainConcept {
                concept: "photosynthesis".to_string(),
                level: "beginner".to_string(),
            }
        );

        let tool = parse_tool_call("start_pomodoro_session", r#"{"subject": "physics"}"#).unwrap();
        assert_eq!(
            tool,
            ToolCall::StartPomodoroSession {
                subject: "physics".to_string(),
                sessions: None,
            }
        );
    }

    #[test]
    fn test_parse_no_argument_tools() {
        assert_eq!(
            parse_tool_call("list_active_timers", "").unwrap(),
            ToolCall::ListActiveTimers
        );
        assert_eq!(
            parse_tool_call("get_pomodoro_status", "{}").unwrap(),
            ToolCall::GetPomodoroStatus
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_tool_call("set_study_timer", r#"{"subject": "math"}"#).is_err());
        assert!(parse_tool_call("cancel_timer", r#"{"timer_id": -1}"#).is_err());
        assert!(parse_tool_call("launch_rocket", "{}").is_err());
        assert!(parse_tool_call("explain_concept", "not json").is_err());
    }

    #[test]
    fn test_definitions_match_parser() {
        for definition in tool_definitions() {
            let result = parse_tool_call(&definition.function.name, "{}");
            if let Err(StudyError::Agent(message)) = &result {
                assert!(message.starts_with("Missing"), "{}", message);
            }
        }
    }

    #[tokio::test]
    async fn test_timer_tools() {
        let tools = context();

        let reply = tools
            .execute(&ToolCall::SetStudyTimer {
                duration_minutes: 25,
                subject: "physics".to_string(),
                timer_name: Some("Pomodoro Focus".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(reply, "Timer set for 25 minutes for physics. Timer ID: 1");

        let listing = tools.execute(&ToolCall::ListActiveTimers).await.unwrap();
        assert!(listing.starts_with("ID 1: Pomodoro Focus - physics ("));

        let cancelled = tools
            .execute(&ToolCall::CancelTimer { timer_id: 1 })
            .await
            .unwrap();
        assert_eq!(cancelled, "Timer 1 has been cancelled.");

        let again = tools
            .execute(&ToolCall::CancelTimer { timer_id: 1 })
            .await
            .unwrap();
        assert_eq!(again, "No timer found with ID 1.");

        let listing = tools.execute(&ToolCall::ListActiveTimers).await.unwrap();
        assert_eq!(listing, "No active timers.");
    }

    #[tokio::test]
    async fn test_invalid_timer_is_an_error() {
        let tools = context();
        let result = tools
            .execute(&ToolCall::SetStudyTimer {
                duration_minutes: 0,
                subject: "math".to_string(),
                timer_name: None,
            })
            .await;
        assert!(matches!(result, Err(StudyError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_pomodoro_tools() {
        let tools = context();

        let none = tools.execute(&ToolCall::GetPomodoroStatus).await.unwrap();
        assert_eq!(none, "No active Pomodoro session.");

        let started = tools
            .execute(&ToolCall::StartPomodoroSession {
                subject: "physics".to_string(),
                sessions: None,
            })
            .await
            .unwrap();
        assert_eq!(
            started,
            "Starting Pomodoro session for physics: 4 cycles of 25min focus + 5min breaks. Session 1/4 started."
        );

        let status = tools.execute(&ToolCall::GetPomodoroStatus).await.unwrap();
        assert_eq!(status, "Pomodoro for physics: session 1/4, focus phase (active)");

        let stopped = tools.execute(&ToolCall::StopPomodoroSession).await.unwrap();
        assert!(stopped.starts_with("Stopped the Pomodoro session for physics"));

        let again = tools.execute(&ToolCall::StopPomodoroSession).await.unwrap();
        assert_eq!(again, "No active Pomodoro session.");
    }

    #[tokio::test]
    async fn test_content_tools_use_tutor() {
        let tools = context();
        let plan = tools
            .execute(&ToolCall::CreateStudyPlan {
                topic: "calculus".to_string(),
                hours_available: 10,
                learning_style: "visual".to_string(),
            })
            .await
            .unwrap();
        assert!(plan.contains("10-hour study plan for calculus"));
    }

    #[tokio::test]
    async fn test_content_tool_failure_is_reported() {
        let study = StudyContext::from_settings(&Settings::default()).unwrap();
        let tools = ToolContext::new(study, Tutor::new(Arc::new(OfflineGenerator)));
        let result = tools
            .execute(&ToolCall::ExplainConcept {
                concept: "gravity".to_string(),
                level: "beginner".to_string(),
            })
            .await;
        assert!(result.is_err());
    }
}
