//! Tools the agents offer to the model, and the catalogs behind them.
//!
//! Every catalog is a fixed, typed mapping; a lookup either finds an entry or reports what is
//! available through [`Lookup::NotFound`]. Tools render lookups to the text the model reads.

pub mod customer_support;
pub mod knowledge_base;
pub mod orchestrator;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use llm_client::ToolSpec;
use serde_json::Value;
use support_core::AgentType;
use tracing::info;

use crate::error::ToolError;

pub use customer_support::{
    GetProductInfo, GetReturnPolicy, Product, ProductCatalog, ReturnPolicy, ReturnPolicyCatalog,
};
pub use knowledge_base::{
    GetTechnicalSupport, KnowledgeBaseIndex, SearchKnowledgeBase, Severity, TroubleshootingEntry,
    TroubleshootingGuide,
};
pub use orchestrator::{CoordinateMultiAgentResponse, RouteToAgent};

/// Result of a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound { available: Vec<&'static str> },
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound { .. } => None,
        }
    }
}

/// A tool the model can call. Arguments arrive as the JSON object the model produced.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn spec(&self) -> ToolSpec;

    async fn call(&self, args: Value) -> Result<String, ToolError>;
}

/// Tools available to one agent, keyed by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(tool.name(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn call(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        info!(tool = %name, "step: tool call");
        tool.call(args).await
    }
}

/// The tool set each agent type is built with.
pub fn tools_for(agent_type: AgentType) -> ToolRegistry {
    match agent_type {
        AgentType::Orchestrator => ToolRegistry::new()
            .register(Arc::new(RouteToAgent))
            .register(Arc::new(CoordinateMultiAgentResponse)),
        AgentType::CustomerSupport => ToolRegistry::new()
            .register(Arc::new(GetProductInfo::new(ProductCatalog::standard())))
            .register(Arc::new(GetReturnPolicy::new(ReturnPolicyCatalog::standard()))),
        AgentType::KnowledgeBase => ToolRegistry::new()
            .register(Arc::new(GetTechnicalSupport::new(
                TroubleshootingGuide::standard(),
            )))
            .register(Arc::new(SearchKnowledgeBase::new(
                KnowledgeBaseIndex::standard(),
            ))),
    }
}

pub(crate) fn string_param(description: &str) -> Value {
    serde_json::json!({ "type": "string", "description": description })
}

/// Title-cases each space-separated word ("gaming consoles" -> "Gaming Consoles").
pub(crate) fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
