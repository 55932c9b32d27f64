//! Agent runner with tool calling loop.

use super::tools::{parse_tool_call, tool_definitions, ToolContext};
use crate::config::{LlmSettings, Prompts, Settings};
use crate::context::StudyContext;
use crate::error::{Result, StudyError};
use crate::openai::create_client;
use crate::tutor::{OpenAIGenerator, Tutor};
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Agent that answers study questions and drives timers through tools.
pub struct Agent {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    tools: ToolContext,
    max_iterations: usize,
    system_prompt: String,
}

/// Message history for a multi-turn chat with the agent.
pub struct Conversation {
    messages: Vec<ChatCompletionRequestMessage>,
}

impl Conversation {
    /// Drop everything except the system prompt.
    pub fn clear(&mut self) {
        self.messages.truncate(1);
    }

    /// Number of messages, including the system prompt.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Keep the system prompt and the most recent messages, up to
    /// `max_messages` in total.
    ///
    /// The kept tail never starts with a tool result, since the API rejects
    /// tool messages whose assistant call was dropped.
    pub fn trim_history(&mut self, max_messages: usize) {
        if max_messages < 2 || self.messages.len() <= max_messages {
            return;
        }

        let mut start = self.messages.len() - (max_messages - 1);
        while start < self.messages.len()
            && matches!(self.messages[start], ChatCompletionRequestMessage::Tool(_))
        {
            start += 1;
        }

        self.messages.drain(1..start);
    }
}

impl Agent {
    /// Create a new agent with the given tool context and model settings.
    pub fn new(tools: ToolContext, settings: &LlmSettings) -> Self {
        Self {
            client: create_client(settings),
            model: settings.model.clone(),
            tools,
            max_iterations: settings.max_iterations,
            system_prompt: crate::config::AgentPrompts::default().system,
        }
    }

    /// Build the agent described by the settings: a fresh study context,
    /// the OpenAI-backed tutor and any custom prompts.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let study = StudyContext::from_settings(settings)?;
        let tutor = Tutor::new(Arc::new(OpenAIGenerator::new(&settings.llm)))
            .with_prompts(prompts.clone());

        Ok(Self::new(ToolContext::new(study, tutor), &settings.llm)
            .with_system_prompt(&prompts.agent.system))
    }

    /// Set a custom system prompt.
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    pub fn tools(&self) -> &ToolContext {
        &self.tools
    }

    /// Start an empty conversation seeded with the system prompt.
    pub fn conversation(&self) -> Result<Conversation> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(self.system_prompt.clone())
            .build()
            .map_err(|e| StudyError::Agent(e.to_string()))?;

        Ok(Conversation {
            messages: vec![system.into()],
        })
    }

    /// Run the agent on a single, stateless query.
    pub async fn run(&self, task: &str) -> Result<AgentResponse> {
        let mut conversation = self.conversation()?;
        self.send(&mut conversation, task).await
    }

    /// Add a user message to `conversation` and run the tool loop until the
    /// model produces a final answer.
    #[instrument(skip(self, conversation), fields(model = %self.model))]
    pub async fn send(&self, conversation: &mut Conversation, message: &str) -> Result<AgentResponse> {
        conversation.messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(message)
                .build()
                .map_err(|e| StudyError::Agent(e.to_string()))?
                .into(),
        );

        let mut iterations = 0;
        let mut tool_calls_made = Vec::new();

        loop {
            iterations += 1;
            if iterations > self.max_iterations {
                return Err(StudyError::Agent(format!(
                    "Agent exceeded maximum iterations ({})",
                    self.max_iterations
                )));
            }

            debug!("Agent iteration {}", iterations);

            let request = CreateChatCompletionRequestArgs::default()
                .model(&self.model)
                .messages(conversation.messages.clone())
                .tools(tool_definitions())
                .build()
                .map_err(|e| StudyError::Agent(e.to_string()))?;

            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e| StudyError::OpenAI(format!("Agent API error: {}", e)))?;

            let choice = response
                .choices
                .first()
                .ok_or_else(|| StudyError::Agent("No response from model".to_string()))?;

            let tool_calls = match &choice.message.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    let content = choice.message.content.clone().unwrap_or_default();
                    conversation.messages.push(
                        ChatCompletionRequestAssistantMessageArgs::default()
                            .content(content.clone())
                            .build()
                            .map_err(|e| StudyError::Agent(e.to_string()))?
                            .into(),
                    );
                    return Ok(AgentResponse {
                        content,
                        tool_calls: tool_calls_made,
                        iterations,
                    });
                }
            };

            conversation.messages.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .tool_calls(tool_calls.clone())
                    .build()
                    .map_err(|e| StudyError::Agent(e.to_string()))?
                    .into(),
            );

            for tool_call in tool_calls {
                let record = self.execute_tool_call(tool_call).await;

                conversation.messages.push(
                    ChatCompletionRequestToolMessageArgs::default()
                        .tool_call_id(&tool_call.id)
                        .content(record.result.clone())
                        .build()
                        .map_err(|e| StudyError::Agent(e.to_string()))?
                        .into(),
                );

                tool_calls_made.push(record);
            }
        }
    }

    /// Execute a single tool call and return a record of it.
    ///
    /// Tool failures become result text for the model; they never abort
    /// the run.
    async fn execute_tool_call(&self, tool_call: &ChatCompletionMessageToolCall) -> ToolCallRecord {
        let name = &tool_call.function.name;
        let arguments = &tool_call.function.arguments;

        info!("Agent calling tool: {} with args: {}", name, arguments);

        let result = match parse_tool_call(name, arguments) {
            Ok(tool) => match self.tools.execute(&tool).await {
                Ok(output) => output,
                Err(e) => format!("Tool error: {}", e),
            },
            Err(e) => format!("Failed to parse tool call: {}", e),
        };

        ToolCallRecord {
            name: name.clone(),
            arguments: arguments.clone(),
            result,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final response content from the agent.
    pub content: String,
    /// Record of all tool calls made during execution.
    pub tool_calls: Vec<ToolCallRecord>,
    /// Number of iterations (LLM calls) used.
    pub iterations: usize,
}

/// Record of a tool call made by the agent.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Name of the tool called.
    pub name: String,
    /// JSON arguments passed to the tool.
    pub arguments: String,
    /// Result returned by the tool.
    pub result: String,
}

impl std::fmt::Display for ToolCallRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.arguments)
    }
}
