//! Builds the memory layer and the agent a runtime serves.

use std::sync::Arc;

use hook_chain::HookChain;
use llm_client::LlmClient;
use memory::{MemoryConfig, MemoryError, MultiAgentMemoryClient};
use memory_hooks::{memory_hook_for, OrchestratorMemoryHook};
use memory_inmemory::InMemoryMemoryService;
use support_agents::prompts::ROUTER_PROMPT;
use support_agents::{AgentHandle, LlmRouter, Orchestrator, SupportAgent};
use support_core::{AgentType, TurnHook};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::client::A2aAgentClient;
use crate::config::RuntimeConfig;
use crate::error::Result;

/// The shared memory and the identity this process writes under.
#[derive(Clone)]
pub struct MemoryComponents {
    pub client: Arc<MultiAgentMemoryClient>,
    pub memory_id: String,
    pub actor_id: String,
    pub session_id: String,
}

impl MemoryComponents {
    pub fn hook_for(&self, agent_type: AgentType) -> Arc<dyn TurnHook> {
        memory_hook_for(
            agent_type,
            &self.memory_id,
            self.client.clone(),
            &self.actor_id,
            &self.session_id,
        )
    }

    pub fn orchestrator_hook(&self) -> Arc<OrchestratorMemoryHook> {
        Arc::new(OrchestratorMemoryHook::new(
            &self.memory_id,
            self.client.clone(),
            &self.actor_id,
            &self.session_id,
        ))
    }

    fn chain_for(&self, agent_type: AgentType) -> HookChain {
        HookChain::new().add_hook(self.hook_for(agent_type))
    }
}

/// Memory client over the local memory service, snapshot-backed when configured. No store is
/// created or looked up yet.
pub async fn open_memory_client(config: &dyn MemoryConfig) -> Result<Arc<MultiAgentMemoryClient>> {
    let service = match config.snapshot_path() {
        Some(path) => InMemoryMemoryService::with_snapshot(path)
            .await
            .map_err(MemoryError::Service)?,
        None => InMemoryMemoryService::new(),
    };
    Ok(Arc::new(MultiAgentMemoryClient::from_config(
        Arc::new(service),
        config,
    )?))
}

/// Opens the memory client and creates or reuses the memory recorded in run-state. Each process
/// gets a fresh session id.
#[instrument(skip(config))]
pub async fn build_memory(config: &dyn MemoryConfig) -> Result<MemoryComponents> {
    let client = open_memory_client(config).await?;
    let memory_id = client.create_or_get(config.memory_name()).await?;
    let session_id = Uuid::new_v4().to_string();
    info!(memory_id = %memory_id, session_id = %session_id, "Memory ready");
    Ok(MemoryComponents {
        client,
        memory_id,
        actor_id: config.actor_id().to_string(),
        session_id,
    })
}

/// [`build_memory`], or `None` with a warning: agents still answer without memory.
pub async fn try_build_memory(config: &dyn MemoryConfig) -> Option<MemoryComponents> {
    match build_memory(config).await {
        Ok(memory) => Some(memory),
        Err(e) => {
            warn!(error = %e, "Memory unavailable, running without memory");
            None
        }
    }
}

/// A specialist or routing agent with its memory hook when memory is available.
pub fn build_support_agent(
    agent_type: AgentType,
    llm: Arc<dyn LlmClient>,
    memory: Option<&MemoryComponents>,
) -> SupportAgent {
    let agent = SupportAgent::new(agent_type, llm);
    match memory {
        Some(memory) => agent.with_hooks(memory.chain_for(agent_type)),
        None => agent,
    }
}

/// Orchestrator over `customer_support` and `knowledge_base`, routing through an LLM routing
/// agent. With memory, the routing agent carries the orchestrator hook and decisions are saved.
pub fn build_orchestrator(
    llm: Arc<dyn LlmClient>,
    memory: Option<&MemoryComponents>,
    customer_support: Arc<dyn AgentHandle>,
    knowledge_base: Arc<dyn AgentHandle>,
) -> Orchestrator {
    let routing_agent =
        SupportAgent::new(AgentType::Orchestrator, llm).with_system_prompt(ROUTER_PROMPT);
    match memory {
        Some(memory) => {
            let hook = memory.orchestrator_hook();
            let routing_agent =
                routing_agent.with_hooks(HookChain::new().add_hook(hook.clone()));
            Orchestrator::new(
                Arc::new(LlmRouter::new(Arc::new(routing_agent))),
                customer_support,
                knowledge_base,
            )
            .with_memory_hook(hook)
        }
        None => Orchestrator::new(
            Arc::new(LlmRouter::new(Arc::new(routing_agent))),
            customer_support,
            knowledge_base,
        ),
    }
}

/// The agent a runtime for `config.agent_type` serves. An orchestrator calls remote specialists
/// when both URLs are configured and in-process specialists otherwise.
pub fn build_agent(
    config: &RuntimeConfig,
    llm: Arc<dyn LlmClient>,
    memory: Option<&MemoryComponents>,
) -> Result<Arc<dyn AgentHandle>> {
    let agent: Arc<dyn AgentHandle> = match config.agent_type {
        AgentType::Orchestrator => {
            let (customer_support, knowledge_base): (Arc<dyn AgentHandle>, Arc<dyn AgentHandle>) =
                match config.remote_specialists() {
                    Some((cs_url, kb_url)) => {
                        info!(customer_support = %cs_url, knowledge_base = %kb_url, "Using remote specialists");
                        (
                            Arc::new(A2aAgentClient::new(cs_url, AgentType::CustomerSupport)?),
                            Arc::new(A2aAgentClient::new(kb_url, AgentType::KnowledgeBase)?),
                        )
                    }
                    None => (
                        Arc::new(build_support_agent(
                            AgentType::CustomerSupport,
                            llm.clone(),
                            memory,
                        )),
                        Arc::new(build_support_agent(
                            AgentType::KnowledgeBase,
                            llm.clone(),
                            memory,
                        )),
                    ),
                };
            Arc::new(build_orchestrator(
                llm,
                memory,
                customer_support,
                knowledge_base,
            ))
        }
        specialist => Arc::new(build_support_agent(specialist, llm, memory)),
    };
    Ok(agent)
}
