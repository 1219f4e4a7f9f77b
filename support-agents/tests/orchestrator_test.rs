//! Integration tests for the orchestrator and memory-backed agents against the in-memory memory
//! service: routing, decision recording, fallback, and interaction events from a full turn.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use hook_chain::HookChain;
use llm_client::{ChatMessage, LlmClient, LlmReply, ToolSpec};
use memory::{MultiAgentMemoryClient, ProgressTracker};
use memory_core::EventRole;
use memory_hooks::{CustomerSupportMemoryHook, OrchestratorMemoryHook};
use memory_inmemory::InMemoryMemoryService;
use support_agents::{
    AgentHandle, KeywordRouter, LlmRouter, Orchestrator, RouteDecision, Router, SupportAgent,
};
use support_core::{AgentType, Result, SupportError};

const ACTOR: &str = "customer_001";
const SESSION: &str = "session-1";

/// Answers every prompt with a fixed reply and records the prompts it saw.
struct ScriptedAgent {
    agent_type: AgentType,
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    fn new(agent_type: AgentType, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            agent_type,
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentHandle for ScriptedAgent {
    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    async fn invoke(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct FailingRouter;

#[async_trait]
impl Router for FailingRouter {
    async fn route(&self, _query: &str) -> Result<RouteDecision> {
        Err(SupportError::Agent("router unavailable".to_string()))
    }
}

/// LLM that replays text replies in order.
struct ReplayLlm {
    replies: Mutex<VecDeque<String>>,
}

#[async_trait]
impl LlmClient for ReplayLlm {
    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        _tools: &[ToolSpec],
    ) -> anyhow::Result<LlmReply> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(LlmReply::Text)
            .ok_or_else(|| anyhow!("no reply"))
    }
}

struct Fixture {
    service: InMemoryMemoryService,
    client: Arc<MultiAgentMemoryClient>,
    memory_id: String,
}

async fn fixture() -> Fixture {
    let service = InMemoryMemoryService::new();
    let client = Arc::new(MultiAgentMemoryClient::new(
        Arc::new(service.clone()),
        ProgressTracker::in_memory(),
    ));
    let memory_id = client
        .create_or_get("MultiAgentCustomerSupportMemory")
        .await
        .unwrap();
    Fixture {
        service,
        client,
        memory_id,
    }
}

impl Fixture {
    fn orchestrator_hook(&self) -> Arc<OrchestratorMemoryHook> {
        Arc::new(OrchestratorMemoryHook::new(
            &self.memory_id,
            self.client.clone(),
            ACTOR,
            SESSION,
        ))
    }
}

/// **Test: A technical query reaches the knowledge base and the decision is remembered.**
///
/// **Setup:** Keyword router, scripted specialists, orchestrator memory hook.
/// **Action:** `handle_query` with a "fix" query, then `get_routing_context`.
/// **Expected:** Routed to KnowledgeBase; only that specialist saw the query; one routing
/// decision is recalled naming KnowledgeBase.
#[tokio::test]
async fn test_keyword_routing_records_decision() {
    let fx = fixture().await;
    let customer_support = ScriptedAgent::new(AgentType::CustomerSupport, "cs answer");
    let knowledge_base = ScriptedAgent::new(AgentType::KnowledgeBase, "kb answer");
    let hook = fx.orchestrator_hook();
    let orchestrator = Orchestrator::new(
        Arc::new(KeywordRouter),
        customer_support.clone(),
        knowledge_base.clone(),
    )
    .with_memory_hook(hook.clone());

    let result = orchestrator
        .handle_query("My laptop is overheating, can you fix it?")
        .await
        .unwrap();

    assert_eq!(result.routed_to, AgentType::KnowledgeBase);
    assert_eq!(result.response, "kb answer");
    assert!(customer_support.prompts().is_empty());
    assert_eq!(
        knowledge_base.prompts(),
        vec!["My laptop is overheating, can you fix it?".to_string()]
    );

    let context = hook.get_routing_context("laptop overheating").await;
    assert_eq!(context.len(), 1);
    assert!(context[0].starts_with("Routing Decision: Query: My laptop is overheating"));
    assert!(context[0].contains("Routed to: KnowledgeBase"));
}

/// **Test: The LLM router's ROUTE_TO line picks the specialist and is sent the wrapped query.**
#[tokio::test]
async fn test_llm_router_parses_route_line() {
    let routing_agent = ScriptedAgent::new(
        AgentType::Orchestrator,
        "ROUTE_TO: CustomerSupport - product question",
    );
    let customer_support = ScriptedAgent::new(AgentType::CustomerSupport, "cs answer");
    let knowledge_base = ScriptedAgent::new(AgentType::KnowledgeBase, "kb answer");
    let orchestrator = Orchestrator::new(
        Arc::new(LlmRouter::new(routing_agent.clone())),
        customer_support.clone(),
        knowledge_base,
    );

    let answer = orchestrator.invoke("Is the earbuds case waterproof?").await.unwrap();

    assert_eq!(answer, "cs answer");
    assert_eq!(
        routing_agent.prompts(),
        vec!["Route this query: Is the earbuds case waterproof?".to_string()]
    );
}

/// **Test: A failing router falls back to CustomerSupport and records nothing.**
#[tokio::test]
async fn test_router_failure_falls_back() {
    let fx = fixture().await;
    let hook = fx.orchestrator_hook();
    let orchestrator = Orchestrator::new(
        Arc::new(FailingRouter),
        ScriptedAgent::new(AgentType::CustomerSupport, "cs answer"),
        ScriptedAgent::new(AgentType::KnowledgeBase, "kb answer"),
    )
    .with_memory_hook(hook.clone());

    let result = orchestrator.handle_query("troubleshoot my screen").await.unwrap();

    assert_eq!(result.routed_to, AgentType::CustomerSupport);
    assert!(fx.service.events(&fx.memory_id).await.unwrap().is_empty());
    assert!(hook.get_routing_context("screen").await.is_empty());
}

/// **Test: Orchestrator responses serialize with the snake_case agent label.**
#[tokio::test]
async fn test_response_serializes_agent_label() {
    let orchestrator = Orchestrator::new(
        Arc::new(KeywordRouter),
        ScriptedAgent::new(AgentType::CustomerSupport, "cs answer"),
        ScriptedAgent::new(AgentType::KnowledgeBase, "kb answer"),
    );

    let result = orchestrator.handle_query("what is your return window").await.unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({ "routed_to": "customer_support", "response": "cs answer" })
    );
}

/// **Test: A memory-hooked agent saves each finished turn as one tagged event.**
///
/// **Setup:** Customer-support agent with its memory hook and a replaying LLM.
/// **Action:** One turn.
/// **Expected:** One event: [user query, "[CustomerSupport] answer"].
#[tokio::test]
async fn test_agent_turn_saves_interaction() {
    let fx = fixture().await;
    let hook = Arc::new(CustomerSupportMemoryHook::new(
        &fx.memory_id,
        fx.client.clone(),
        ACTOR,
        SESSION,
    ));
    let llm = Arc::new(ReplayLlm {
        replies: Mutex::new(VecDeque::from(vec![
            "The Gaming Laptop Pro costs $1,299.".to_string(),
        ])),
    });
    let agent = SupportAgent::new(AgentType::CustomerSupport, llm)
        .with_hooks(HookChain::new().add_hook(hook));

    let answer = agent.invoke("How much is the gaming laptop?").await.unwrap();

    assert_eq!(answer, "The Gaming Laptop Pro costs $1,299.");
    let events = fx.service.events(&fx.memory_id).await.unwrap();
    assert_eq!(events.len(), 1);
    let messages = &events[0].messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, EventRole::User);
    assert_eq!(messages[0].text, "How much is the gaming laptop?");
    assert_eq!(messages[1].role, EventRole::Assistant);
    assert_eq!(
        messages[1].text,
        "[CustomerSupport] The Gaming Laptop Pro costs $1,299."
    );
}
