//! Agent-specific memory hooks.

use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use memory::namespace::{CUSTOMER_PREFERENCES, ORCHESTRATOR_ROUTING, TECHNICAL_SOLUTIONS};
use memory::records::{ROUTING_DECISION_MARKER, TECHNICAL_SOLUTION_MARKER};
use memory::{MultiAgentMemoryClient, RoutingDecision, TechnicalSolution};
use support_core::{AgentType, Result, Transcript, TurnHook};
use tracing::info;

use crate::base::{AgentMemoryHook, HOOK_TOP_K};

const PREFERENCES_TOP_K: usize = 3;

macro_rules! delegate_turn_hook {
    ($hook:ty) => {
        impl Deref for $hook {
            type Target = AgentMemoryHook;

            fn deref(&self) -> &AgentMemoryHook {
                &self.base
            }
        }

        #[async_trait]
        impl TurnHook for $hook {
            async fn on_turn_start(&self, transcript: &mut Transcript) -> Result<()> {
                self.base.on_turn_start(transcript).await
            }

            async fn on_turn_end(&self, transcript: &Transcript) -> Result<()> {
                self.base.on_turn_end(transcript).await
            }
        }
    };
}

/// Orchestrator hook: also records and recalls routing decisions.
pub struct OrchestratorMemoryHook {
    base: AgentMemoryHook,
}

impl OrchestratorMemoryHook {
    pub fn new(
        memory_id: impl Into<String>,
        client: Arc<MultiAgentMemoryClient>,
        actor_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            base: AgentMemoryHook::new(
                memory_id,
                client,
                actor_id,
                session_id,
                AgentType::Orchestrator,
            ),
        }
    }

    /// Saves the decision as an `OTHER` event. Returns whether it was written.
    pub async fn save_routing_decision(&self, decision: &RoutingDecision) -> bool {
        let saved = self.base.save_record(decision.to_memory_text()).await;
        if saved {
            info!(agent = %decision.agent, "[Orchestrator] Saved routing decision");
        }
        saved
    }

    /// Past routing decisions relevant to `query`.
    pub async fn get_routing_context(&self, query: &str) -> Vec<String> {
        self.base
            .retrieve_marked(
                ORCHESTRATOR_ROUTING,
                &format!("routing decision {}", query),
                HOOK_TOP_K,
                ROUTING_DECISION_MARKER,
            )
            .await
    }
}

delegate_turn_hook!(OrchestratorMemoryHook);

/// Customer-support hook: also looks up customer preferences. Preferences accumulate from
/// ordinary turn events, so there is no separate write path.
pub struct CustomerSupportMemoryHook {
    base: AgentMemoryHook,
}

impl CustomerSupportMemoryHook {
    pub fn new(
        memory_id: impl Into<String>,
        client: Arc<MultiAgentMemoryClient>,
        actor_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            base: AgentMemoryHook::new(
                memory_id,
                client,
                actor_id,
                session_id,
                AgentType::CustomerSupport,
            ),
        }
    }

    pub async fn get_customer_preferences(&self, query: &str) -> Vec<String> {
        let namespace = memory_core::format_namespace(CUSTOMER_PREFERENCES, self.base.actor_id());
        self.base
            .client()
            .retrieve_in(self.base.memory_id(), &namespace, query, PREFERENCES_TOP_K)
            .await
    }
}

delegate_turn_hook!(CustomerSupportMemoryHook);

/// Knowledge-base hook: also records and recalls technical solutions.
pub struct KnowledgeBaseMemoryHook {
    base: AgentMemoryHook,
}

impl KnowledgeBaseMemoryHook {
    pub fn new(
        memory_id: impl Into<String>,
        client: Arc<MultiAgentMemoryClient>,
        actor_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            base: AgentMemoryHook::new(
                memory_id,
                client,
                actor_id,
                session_id,
                AgentType::KnowledgeBase,
            ),
        }
    }

    pub async fn save_technical_solution(&self, solution: &TechnicalSolution) -> bool {
        let saved = self.base.save_record(solution.to_memory_text()).await;
        if saved {
            info!(success = solution.success, "[KnowledgeBase] Saved technical solution");
        }
        saved
    }

    pub async fn get_technical_history(&self, query: &str) -> Vec<String> {
        self.base
            .retrieve_marked(
                TECHNICAL_SOLUTIONS,
                &format!("technical solution {}", query),
                HOOK_TOP_K,
                TECHNICAL_SOLUTION_MARKER,
            )
            .await
    }
}

delegate_turn_hook!(KnowledgeBaseMemoryHook);

/// The specialised hook for `agent_type`, as a plain turn hook.
pub fn memory_hook_for(
    agent_type: AgentType,
    memory_id: impl Into<String>,
    client: Arc<MultiAgentMemoryClient>,
    actor_id: impl Into<String>,
    session_id: impl Into<String>,
) -> Arc<dyn TurnHook> {
    match agent_type {
        AgentType::Orchestrator => Arc::new(OrchestratorMemoryHook::new(
            memory_id, client, actor_id, session_id,
        )),
        AgentType::CustomerSupport => Arc::new(CustomerSupportMemoryHook::new(
            memory_id, client, actor_id, session_id,
        )),
        AgentType::KnowledgeBase => Arc::new(KnowledgeBaseMemoryHook::new(
            memory_id, client, actor_id, session_id,
        )),
    }
}
