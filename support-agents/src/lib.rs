//! # Support agents
//!
//! The three agents of the support system and what they need to run a turn:
//!
//! - [`routing`]: keyword heuristic that picks a specialist for a query.
//! - [`tools`]: typed product, policy and troubleshooting catalogs exposed as model tools.
//! - [`prompts`]: system prompts per [`AgentType`](support_core::AgentType).
//! - [`agent`]: [`SupportAgent`], a tool-calling loop wrapped in a [`HookChain`](hook_chain::HookChain).
//! - [`orchestrator`]: [`Orchestrator`], which routes a query and forwards it to a specialist.

pub mod agent;
pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod routing;
pub mod tools;

pub use agent::{AgentHandle, SupportAgent, DEFAULT_MAX_MESSAGES, DEFAULT_MAX_TOOL_ROUNDS};
pub use error::ToolError;
pub use orchestrator::{
    KeywordRouter, LlmRouter, Orchestrator, OrchestratorResponse, RouteDecision, Router,
};
pub use routing::{classify, route_query, RouteMatch};
pub use tools::{tools_for, Lookup, Tool, ToolRegistry};

#[cfg(test)]
mod test;
