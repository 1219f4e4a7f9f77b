//! Tool-calling support agent.
//!
//! One turn: append the user message, run the hook chain's turn-start phase (memory hooks may
//! rewrite the query), loop model completions and tool calls until the model answers in text,
//! append the answer, run the turn-end phase. The transcript is kept across turns, trimmed to a
//! window of whole exchanges before each turn, and a turn holds its lock for the whole exchange,
//! so concurrent invocations of one agent are serialized.

use std::sync::Arc;

use async_trait::async_trait;
use hook_chain::HookChain;
use llm_client::{ChatMessage, LlmClient, LlmReply, ToolCall};
use support_core::{
    AgentType, ContentBlock, Message, Result, Role, SupportError, Transcript,
};
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::prompts::system_prompt;
use crate::tools::{tools_for, ToolRegistry};

/// Model round trips allowed in one turn before giving up.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

/// Transcript messages sent to the model, including the new user message.
pub const DEFAULT_MAX_MESSAGES: usize = 40;

/// Anything that answers a prompt as one of the support agents: a local [`SupportAgent`], the
/// [`Orchestrator`](crate::Orchestrator), or a remote agent behind the runtime's JSON-RPC client.
#[async_trait]
pub trait AgentHandle: Send + Sync {
    fn agent_type(&self) -> AgentType;

    async fn invoke(&self, prompt: &str) -> Result<String>;
}

pub struct SupportAgent {
    agent_type: AgentType,
    system_prompt: String,
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    hooks: HookChain,
    max_tool_rounds: usize,
    max_messages: usize,
    transcript: Mutex<Transcript>,
}

impl SupportAgent {
    /// Agent with the standard prompt and tool set for `agent_type` and no hooks.
    pub fn new(agent_type: AgentType, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            agent_type,
            system_prompt: system_prompt(agent_type).to_string(),
            llm,
            tools: tools_for(agent_type),
            hooks: HookChain::new(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            max_messages: DEFAULT_MAX_MESSAGES,
            transcript: Mutex::new(Transcript::new()),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_hooks(mut self, hooks: HookChain) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds.max(1);
        self
    }

    /// History window; at least one earlier message plus the new user message.
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages.max(2);
        self
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub async fn transcript(&self) -> Transcript {
        self.transcript.lock().await.clone()
    }

    pub async fn reset(&self) {
        self.transcript.lock().await.clear();
    }

    /// Runs one turn. On error the transcript is rolled back to where the turn started.
    #[instrument(skip(self, prompt), fields(agent_type = %self.agent_type))]
    pub async fn run_turn(&self, prompt: &str) -> Result<String> {
        let mut transcript = self.transcript.lock().await;
        let dropped = transcript.trim_to_window(self.max_messages - 1);
        if dropped > 0 {
            info!(dropped, "trimmed transcript history");
        }
        let turn_start = transcript.len();
        match self.exchange(&mut transcript, prompt).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                warn!(error = %e, "turn failed, rolling back transcript");
                transcript.truncate(turn_start);
                Err(e)
            }
        }
    }

    async fn exchange(&self, transcript: &mut Transcript, prompt: &str) -> Result<String> {
        transcript.push(Message::user(prompt));
        self.hooks.run_turn_start(transcript).await?;

        let specs = self.tools.specs();
        let mut answer = None;
        for round in 0..self.max_tool_rounds {
            let messages = to_chat_messages(&self.system_prompt, transcript);
            let reply = self
                .llm
                .complete(messages, &specs)
                .await
                .map_err(|e| SupportError::Llm(format!("{:#}", e)))?;
            match reply {
                LlmReply::Text(text) => {
                    answer = Some(text);
                    break;
                }
                LlmReply::ToolCalls { text, calls } => {
                    info!(round, calls = calls.len(), "step: model requested tools");
                    transcript.push(tool_use_message(text, &calls));
                    let results = self.run_tools(&calls).await;
                    transcript.push(Message::new(Role::User, results));
                }
            }
        }

        let answer = answer.ok_or_else(|| {
            SupportError::Agent(format!(
                "no answer after {} tool rounds",
                self.max_tool_rounds
            ))
        })?;
        transcript.push(Message::assistant(answer.clone()));
        self.hooks.run_turn_end(transcript).await?;
        Ok(answer)
    }

    /// Tool failures go back to the model as result text rather than failing the turn.
    async fn run_tools(&self, calls: &[ToolCall]) -> Vec<ContentBlock> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let content = match self.tools.call(&call.name, call.arguments.clone()).await {
                Ok(output) => output,
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "tool call failed");
                    format!("Error: {}", e)
                }
            };
            results.push(ContentBlock::ToolResult {
                tool_use_id: call.id.clone(),
                content,
            });
        }
        results
    }
}

#[async_trait]
impl AgentHandle for SupportAgent {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.run_turn(prompt).await
    }
}

fn tool_use_message(text: String, calls: &[ToolCall]) -> Message {
    let mut content = Vec::with_capacity(calls.len() + 1);
    if !text.trim().is_empty() {
        content.push(ContentBlock::Text { text });
    }
    content.extend(calls.iter().map(|call| ContentBlock::ToolUse {
        tool_use_id: call.id.clone(),
        name: call.name.clone(),
        input: call.arguments.clone(),
    }));
    Message::new(Role::Assistant, content)
}

/// Flattens the transcript into completion messages, system prompt first.
pub fn to_chat_messages(system_prompt: &str, transcript: &Transcript) -> Vec<ChatMessage> {
    let mut out = vec![ChatMessage::system(system_prompt)];
    for message in transcript.messages() {
        let mut text = String::new();
        let mut calls = Vec::new();
        for block in &message.content {
            match block {
                ContentBlock::Text { text: t } => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(t);
                }
                ContentBlock::ToolUse {
                    tool_use_id,
                    name,
                    input,
                } => calls.push(ToolCall {
                    id: tool_use_id.clone(),
                    name: name.clone(),
                    arguments: input.clone(),
                }),
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                } => out.push(ChatMessage::tool_result(tool_use_id.clone(), content.clone())),
            }
        }
        match message.role {
            Role::Assistant if !calls.is_empty() => {
                out.push(ChatMessage::assistant_tool_calls(text, calls))
            }
            Role::Assistant => out.push(ChatMessage::assistant(text)),
            Role::User if !text.is_empty() => out.push(ChatMessage::user(text)),
            Role::User => {}
        }
    }
    out
}
