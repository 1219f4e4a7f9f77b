//! Orchestrator tools: routing advice and response coordination.

use async_trait::async_trait;
use llm_client::ToolSpec;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{string_param, Tool};
use crate::error::ToolError;
use crate::routing::{classify, RouteMatch};

#[derive(Debug, Deserialize)]
struct RouteArgs {
    query: String,
    #[serde(default)]
    agent_type: Option<String>,
}

/// `route_to_agent(query, agent_type?)`. An explicit agent type wins over the heuristic.
pub struct RouteToAgent;

impl RouteToAgent {
    pub const NAME: &'static str = "route_to_agent";

    pub fn render(query: &str, agent_type: Option<&str>) -> String {
        if let Some(agent_type) = agent_type.filter(|a| !a.trim().is_empty()) {
            return format!("Routing to {} agent: {}", agent_type, query);
        }
        let route = classify(query);
        let purpose = match route {
            RouteMatch::Technical(_) => "technical support",
            RouteMatch::Service(_) => "general support",
            RouteMatch::Default => "general inquiry",
        };
        format!(
            "Routing to {} agent for {}: {}",
            route.agent().label(),
            purpose,
            query
        )
    }
}

#[async_trait]
impl Tool for RouteToAgent {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: Self::NAME.to_string(),
            description: "Route a customer query to the appropriate specialized agent.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": string_param("The customer's query or request"),
                    "agent_type": {
                        "type": "string",
                        "enum": ["customer_support", "knowledge_base"],
                        "description": "Optional agent to route to directly",
                    },
                },
                "required": ["query"],
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: RouteArgs =
            serde_json::from_value(args).map_err(|e| ToolError::invalid(Self::NAME, e))?;
        Ok(Self::render(&args.query, args.agent_type.as_deref()))
    }
}

#[derive(Debug, Deserialize)]
struct CoordinateArgs {
    #[serde(default)]
    responses: Vec<String>,
}

/// `coordinate_multi_agent_response(responses)`.
pub struct CoordinateMultiAgentResponse;

impl CoordinateMultiAgentResponse {
    pub const NAME: &'static str = "coordinate_multi_agent_response";

    pub fn render(responses: &[String]) -> String {
        match responses {
            [] => "No responses received from agents.".to_string(),
            [only] => only.clone(),
            many => {
                let mut out = String::from("Based on input from our specialized agents:\n\n");
                for (i, response) in many.iter().enumerate() {
                    out.push_str(&format!("Agent {}: {}\n\n", i + 1, response));
                }
                out.push_str(
                    "This coordinated response provides comprehensive support for your inquiry.",
                );
                out
            }
        }
    }
}

#[async_trait]
impl Tool for CoordinateMultiAgentResponse {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: Self::NAME.to_string(),
            description: "Combine responses from several agents into one answer.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "responses": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Responses from the specialized agents",
                    },
                },
                "required": ["responses"],
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let args: CoordinateArgs =
            serde_json::from_value(args).map_err(|e| ToolError::invalid(Self::NAME, e))?;
        Ok(Self::render(&args.responses))
    }
}
