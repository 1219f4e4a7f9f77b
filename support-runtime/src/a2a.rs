//! JSON-RPC 2.0 agent-to-agent profile.
//!
//! `POST /` accepts `message/send` with a user message made of text parts and answers with a
//! completed task whose first artifact carries the agent's reply. Protocol failures come back as
//! JSON-RPC error objects (HTTP 200), never as HTTP errors. `GET /.well-known/agent.json` serves
//! the agent card.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use support_agents::AgentHandle;
use support_core::AgentType;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const JSONRPC_VERSION: &str = "2.0";
pub const METHOD_MESSAGE_SEND: &str = "message/send";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct A2aMessage {
    pub role: String,
    pub parts: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl A2aMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text { text: text.into() }],
            message_id: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Text parts joined by newlines; `None` when there are none.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } if !text.trim().is_empty() => Some(text.as_str()),
                _ => None,
            })
            .collect();
        (!texts.is_empty()).then(|| texts.join("\n"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSendParams {
    pub message: A2aMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub artifact_id: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub kind: String,
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Task {
    pub fn completed(text: String) -> Self {
        Self {
            kind: "task".to_string(),
            id: Uuid::new_v4().to_string(),
            context_id: Uuid::new_v4().to_string(),
            status: TaskStatus {
                state: "completed".to_string(),
            },
            artifacts: vec![Artifact {
                artifact_id: Uuid::new_v4().to_string(),
                parts: vec![Part::Text { text }],
            }],
        }
    }

    /// First text part of any artifact.
    pub fn first_text(&self) -> Option<&str> {
        self.artifacts
            .iter()
            .flat_map(|artifact| artifact.parts.iter())
            .find_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::Unsupported => None,
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub version: String,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub skills: Vec<AgentSkill>,
}

impl AgentCard {
    pub fn for_agent(agent_type: AgentType, tool_names: &[&str]) -> Self {
        let (name, description) = match agent_type {
            AgentType::Orchestrator => (
                "Orchestrator Agent",
                "Routes customer queries to the customer support or knowledge base agent.",
            ),
            AgentType::CustomerSupport => (
                "Customer Support Agent",
                "Answers product, return policy and general customer service questions.",
            ),
            AgentType::KnowledgeBase => (
                "Knowledge Base Agent",
                "Provides troubleshooting guidance and technical solutions for common device issues.",
            ),
        };
        Self {
            name: name.to_string(),
            description: description.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            default_input_modes: vec!["text".to_string()],
            default_output_modes: vec!["text".to_string()],
            skills: tool_names
                .iter()
                .map(|tool| AgentSkill {
                    id: tool.to_string(),
                    name: tool.to_string(),
                    description: format!("{} tool", tool),
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
struct A2aState {
    agent: Arc<dyn AgentHandle>,
    card: Arc<AgentCard>,
}

/// JSON-RPC router for `agent`.
pub fn a2a_router(agent: Arc<dyn AgentHandle>, card: AgentCard) -> Router {
    let state = A2aState {
        agent,
        card: Arc::new(card),
    };
    Router::new()
        .route("/", post(handle_rpc))
        .route("/.well-known/agent.json", get(agent_card))
        .with_state(state)
}

async fn agent_card(State(state): State<A2aState>) -> Json<AgentCard> {
    Json(state.card.as_ref().clone())
}

async fn handle_rpc(State(state): State<A2aState>, body: Bytes) -> Json<JsonRpcResponse> {
    Json(dispatch(state.agent.as_ref(), &body).await)
}

/// Parses one JSON-RPC request and runs it against `agent`.
pub async fn dispatch(agent: &dyn AgentHandle, body: &[u8]) -> JsonRpcResponse {
    let raw: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Unparseable JSON-RPC body");
            return JsonRpcResponse::failure(Value::Null, PARSE_ERROR, "Parse error");
        }
    };
    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(e) => {
            return JsonRpcResponse::failure(id, INVALID_REQUEST, format!("Invalid request: {}", e))
        }
    };
    if request.jsonrpc != JSONRPC_VERSION {
        return JsonRpcResponse::failure(id, INVALID_REQUEST, "Invalid request: jsonrpc must be 2.0");
    }
    if request.method != METHOD_MESSAGE_SEND {
        return JsonRpcResponse::failure(
            id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        );
    }
    let params: MessageSendParams = match serde_json::from_value(request.params) {
        Ok(params) => params,
        Err(e) => {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, format!("Invalid params: {}", e))
        }
    };
    let Some(prompt) = params.message.text() else {
        return JsonRpcResponse::failure(id, INVALID_PARAMS, "Invalid params: message has no text");
    };

    info!(agent_type = %agent.agent_type(), "step: message/send");
    match agent.invoke(&prompt).await {
        Ok(reply) => match serde_json::to_value(Task::completed(reply)) {
            Ok(task) => JsonRpcResponse::success(id, task),
            Err(e) => JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string()),
        },
        Err(e) => {
            error!(error = %e, "Agent invocation failed");
            JsonRpcResponse::failure(id, INTERNAL_ERROR, e.to_string())
        }
    }
}
