//! Base memory hook shared by all agents.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use memory::namespace::{is_customer_namespace, namespace_label, namespaces_for};
use memory::MultiAgentMemoryClient;
use memory_core::{format_namespace, EventMessage, StrategyType};
use support_core::{AgentType, Result, Transcript, TurnHook};
use tokio::sync::OnceCell;
use tracing::{error, info, instrument};

/// Snippets retrieved per namespace when injecting context.
pub const HOOK_TOP_K: usize = 2;

/// Strategy type → namespace templates of the store. Strategies of the same type share an entry.
type NamespaceMap = BTreeMap<StrategyType, Vec<String>>;

/// Memory hook bound to one agent process: (store, actor, session, agent type).
pub struct AgentMemoryHook {
    memory_id: String,
    client: Arc<MultiAgentMemoryClient>,
    actor_id: String,
    session_id: String,
    agent_type: AgentType,
    /// Fetched once per process; an empty map is cached when the fetch fails.
    namespaces: OnceCell<NamespaceMap>,
}

impl AgentMemoryHook {
    pub fn new(
        memory_id: impl Into<String>,
        client: Arc<MultiAgentMemoryClient>,
        actor_id: impl Into<String>,
        session_id: impl Into<String>,
        agent_type: AgentType,
    ) -> Self {
        Self {
            memory_id: memory_id.into(),
            client,
            actor_id: actor_id.into(),
            session_id: session_id.into(),
            agent_type,
            namespaces: OnceCell::new(),
        }
    }

    pub fn memory_id(&self) -> &str {
        &self.memory_id
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    pub fn client(&self) -> &Arc<MultiAgentMemoryClient> {
        &self.client
    }

    async fn namespace_map(&self) -> &NamespaceMap {
        self.namespaces
            .get_or_init(|| async {
                match self
                    .client
                    .service()
                    .get_memory_strategies(&self.memory_id)
                    .await
                {
                    Ok(strategies) => {
                        let mut map = NamespaceMap::new();
                        for strategy in strategies {
                            map.entry(strategy.strategy_type)
                                .or_default()
                                .extend(strategy.namespaces);
                        }
                        map
                    }
                    Err(e) => {
                        error!(
                            agent_type = %self.agent_type,
                            error = %e,
                            "Failed to get memory strategies"
                        );
                        NamespaceMap::new()
                    }
                }
            })
            .await
    }

    /// Concrete namespaces this agent reads for its actor.
    ///
    /// Always the registry's customer namespaces, plus this agent's exclusive namespaces when the
    /// store has a strategy for them, plus any other customer namespace the store defines.
    pub async fn get_relevant_namespaces(&self) -> Vec<String> {
        let store_templates: Vec<&String> = self.namespace_map().await.values().flatten().collect();

        let mut templates: Vec<&str> = namespaces_for(self.agent_type)
            .into_iter()
            .filter(|ns| {
                ns.is_customer_scoped() || store_templates.iter().any(|t| t.as_str() == ns.template)
            })
            .map(|ns| ns.template)
            .collect();
        for template in &store_templates {
            if is_customer_namespace(template) && !templates.contains(&template.as_str()) {
                templates.push(template.as_str());
            }
        }

        templates
            .into_iter()
            .map(|t| format_namespace(t, &self.actor_id))
            .collect()
    }

    /// Prepends labelled snippets to the pending user message. No-op when the last message is not
    /// a genuine user message or nothing relevant is found.
    #[instrument(skip(self, transcript), fields(agent_type = %self.agent_type))]
    pub async fn retrieve_agent_context(&self, transcript: &mut Transcript) {
        let Some(query) = transcript.pending_typed_query().map(str::to_string) else {
            return;
        };

        let mut snippets = Vec::new();
        for namespace in self.get_relevant_namespaces().await {
            let label = namespace_label(&namespace);
            for text in self
                .client
                .retrieve_in(&self.memory_id, &namespace, &query, HOOK_TOP_K)
                .await
            {
                snippets.push(format!("{} {}", label, text));
            }
        }

        if snippets.is_empty() {
            return;
        }
        let context = snippets.join("\n");
        let injected = transcript.rewrite_pending_user_query(|text| {
            format!("Agent Context ({}):\n{}\n\n{}", self.agent_type, context, text)
        });
        if injected {
            info!(
                agent_type = %self.agent_type,
                count = snippets.len(),
                "Retrieved context items"
            );
        }
    }

    /// Saves the finished turn as `[(user, USER), ("[<agent>] response", ASSISTANT)]`, with the
    /// user text as typed rather than the context-injected prompt.
    #[instrument(skip(self, transcript), fields(agent_type = %self.agent_type))]
    pub async fn save_agent_interaction(&self, transcript: &Transcript) {
        let Some((query, response)) = transcript.last_exchange() else {
            return;
        };
        let messages = vec![
            EventMessage::user(query),
            EventMessage::assistant(format!("[{}] {}", self.agent_type, response)),
        ];
        if self
            .client
            .create_event_in(&self.memory_id, &self.actor_id, &self.session_id, messages)
            .await
        {
            info!(agent_type = %self.agent_type, "Saved interaction to memory");
        }
    }

    /// Writes a single `OTHER` event in this hook's session.
    pub(crate) async fn save_record(&self, text: String) -> bool {
        self.client
            .create_event_in(
                &self.memory_id,
                &self.actor_id,
                &self.session_id,
                vec![EventMessage::other(text)],
            )
            .await
    }

    /// Snippets from one of this actor's namespaces whose text contains `marker`
    /// (case-insensitive).
    pub(crate) async fn retrieve_marked(
        &self,
        template: &str,
        query: &str,
        top_k: usize,
        marker: &str,
    ) -> Vec<String> {
        let namespace = format_namespace(template, &self.actor_id);
        let marker = marker.to_lowercase();
        self.client
            .retrieve_in(&self.memory_id, &namespace, query, top_k)
            .await
            .into_iter()
            .filter(|text| text.to_lowercase().contains(&marker))
            .collect()
    }
}

#[async_trait]
impl TurnHook for AgentMemoryHook {
    async fn on_turn_start(&self, transcript: &mut Transcript) -> Result<()> {
        self.retrieve_agent_context(transcript).await;
        Ok(())
    }

    async fn on_turn_end(&self, transcript: &Transcript) -> Result<()> {
        self.save_agent_interaction(transcript).await;
        Ok(())
    }
}
