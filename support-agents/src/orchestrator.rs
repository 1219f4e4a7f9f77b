//! Orchestrator: picks a specialist for each query and forwards the query to it.

use std::sync::Arc;

use async_trait::async_trait;
use memory::RoutingDecision;
use memory_hooks::OrchestratorMemoryHook;
use serde::Serialize;
use support_core::{AgentType, Result, SupportError};
use tracing::{error, info, instrument};

use crate::agent::AgentHandle;
use crate::routing::classify;

pub const DEFAULT_ROUTE_REASONING: &str = "Default routing to CustomerSupport";

/// Which specialist should answer, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub agent: AgentType,
    pub reasoning: String,
}

#[async_trait]
pub trait Router: Send + Sync {
    async fn route(&self, query: &str) -> Result<RouteDecision>;
}

/// Routes with the keyword heuristic; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRouter;

#[async_trait]
impl Router for KeywordRouter {
    async fn route(&self, query: &str) -> Result<RouteDecision> {
        let route = classify(query);
        Ok(RouteDecision {
            agent: route.agent(),
            reasoning: format!("Keyword routing: {}", route.reasoning()),
        })
    }
}

/// Asks a routing agent and parses its `ROUTE_TO: <agent>` line.
pub struct LlmRouter {
    agent: Arc<dyn AgentHandle>,
}

impl LlmRouter {
    pub fn new(agent: Arc<dyn AgentHandle>) -> Self {
        Self { agent }
    }

    /// The routed specialist, or CustomerSupport with a default reasoning when no
    /// `ROUTE_TO:` line names one.
    pub fn parse(response: &str) -> RouteDecision {
        if response.contains("ROUTE_TO: CustomerSupport") {
            RouteDecision {
                agent: AgentType::CustomerSupport,
                reasoning: response.trim().to_string(),
            }
        } else if response.contains("ROUTE_TO: KnowledgeBase") {
            RouteDecision {
                agent: AgentType::KnowledgeBase,
                reasoning: response.trim().to_string(),
            }
        } else {
            RouteDecision {
                agent: AgentType::CustomerSupport,
                reasoning: DEFAULT_ROUTE_REASONING.to_string(),
            }
        }
    }
}

#[async_trait]
impl Router for LlmRouter {
    async fn route(&self, query: &str) -> Result<RouteDecision> {
        let response = self
            .agent
            .invoke(&format!("Route this query: {}", query))
            .await?;
        Ok(Self::parse(&response))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrchestratorResponse {
    pub routed_to: AgentType,
    pub response: String,
}

pub struct Orchestrator {
    router: Arc<dyn Router>,
    customer_support: Arc<dyn AgentHandle>,
    knowledge_base: Arc<dyn AgentHandle>,
    memory_hook: Option<Arc<OrchestratorMemoryHook>>,
}

impl Orchestrator {
    pub fn new(
        router: Arc<dyn Router>,
        customer_support: Arc<dyn AgentHandle>,
        knowledge_base: Arc<dyn AgentHandle>,
    ) -> Self {
        Self {
            router,
            customer_support,
            knowledge_base,
            memory_hook: None,
        }
    }

    /// Routing decisions are saved through this hook when set.
    pub fn with_memory_hook(mut self, hook: Arc<OrchestratorMemoryHook>) -> Self {
        self.memory_hook = Some(hook);
        self
    }

    fn specialist(&self, agent: AgentType) -> Result<&Arc<dyn AgentHandle>> {
        match agent {
            AgentType::CustomerSupport => Ok(&self.customer_support),
            AgentType::KnowledgeBase => Ok(&self.knowledge_base),
            AgentType::Orchestrator => Err(SupportError::Agent(
                "orchestrator cannot route to itself".to_string(),
            )),
        }
    }

    /// Router failures fall back to CustomerSupport without recording a decision.
    #[instrument(skip(self, query))]
    pub async fn route_query(&self, query: &str) -> AgentType {
        let decision = match self.router.route(query).await {
            Ok(decision) => decision,
            Err(e) => {
                error!(error = %e, "Routing failed");
                return AgentType::CustomerSupport;
            }
        };
        if let Some(hook) = &self.memory_hook {
            let record = RoutingDecision::new(
                query,
                decision.agent.route_name(),
                decision.reasoning.as_str(),
            );
            hook.save_routing_decision(&record).await;
        }
        decision.agent
    }

    #[instrument(skip(self, query))]
    pub async fn handle_query(&self, query: &str) -> Result<OrchestratorResponse> {
        let routed_to = self.route_query(query).await;
        info!(routed_to = %routed_to, "step: routed query");
        let response = self.specialist(routed_to)?.invoke(query).await?;
        Ok(OrchestratorResponse {
            routed_to,
            response,
        })
    }
}

#[async_trait]
impl AgentHandle for Orchestrator {
    fn agent_type(&self) -> AgentType {
        AgentType::Orchestrator
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        Ok(self.handle_query(prompt).await?.response)
    }
}
