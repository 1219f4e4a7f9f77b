//! JSON-RPC client for a remote specialist runtime.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use support_agents::AgentHandle;
use support_core::AgentType;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::a2a::{A2aMessage, JsonRpcResponse, Task, JSONRPC_VERSION, METHOD_MESSAGE_SEND};
use crate::error::{Result, RuntimeError};

/// A remote agent reached through `message/send`.
#[derive(Debug, Clone)]
pub struct A2aAgentClient {
    client: Client,
    url: String,
    agent_type: AgentType,
}

impl A2aAgentClient {
    pub fn new(url: impl Into<String>, agent_type: AgentType) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, url, agent_type))
    }

    pub fn with_client(client: Client, url: impl Into<String>, agent_type: AgentType) -> Self {
        Self {
            client,
            url: url.into(),
            agent_type,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends `text` as a user message and returns the first text artifact of the reply.
    /// A result without text artifacts is returned as its raw JSON.
    #[instrument(skip(self, text), fields(agent_type = %self.agent_type, url = %self.url))]
    pub async fn send_message(&self, text: &str) -> Result<String> {
        let request_id = Uuid::new_v4().to_string();
        let payload = json!({
            "jsonrpc": JSONRPC_VERSION,
            "id": request_id,
            "method": METHOD_MESSAGE_SEND,
            "params": { "message": A2aMessage::user_text(text) },
        });

        let response = self.client.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RuntimeError::Transport(format!(
                "Remote agent HTTP error ({}): {}",
                status, error_text
            )));
        }

        let rpc: JsonRpcResponse = response.json().await?;
        if let Some(error) = rpc.error {
            return Err(RuntimeError::Remote {
                code: error.code,
                message: error.message,
            });
        }
        let result = rpc.result.ok_or_else(|| {
            RuntimeError::Transport("JSON-RPC response has neither result nor error".to_string())
        })?;
        debug!(request_id = %request_id, "Remote agent replied");
        Ok(reply_text(result))
    }
}

fn reply_text(result: Value) -> String {
    match serde_json::from_value::<Task>(result.clone()) {
        Ok(task) => match task.first_text() {
            Some(text) => text.to_string(),
            None => result.to_string(),
        },
        Err(_) => result.to_string(),
    }
}

#[async_trait]
impl AgentHandle for A2aAgentClient {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    async fn invoke(&self, prompt: &str) -> support_core::Result<String> {
        Ok(self.send_message(prompt).await?)
    }
}
