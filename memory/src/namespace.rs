//! Namespace registry: which namespaces exist, who reads them, and how they are labelled.
//!
//! Templates are fixed here; only `{actorId}` is substituted at runtime. Namespaces need no setup,
//! they come into existence with the first record extracted into them.

use memory_core::{format_namespace, StrategyType};
use support_core::AgentType;

/// Which agents read a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    All,
    Agent(AgentType),
}

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceSpec {
    pub template: &'static str,
    pub audience: Audience,
    pub strategy_name: &'static str,
    pub strategy_type: StrategyType,
    pub description: &'static str,
    /// Marker a `CUSTOM` strategy extracts on.
    pub extraction_marker: Option<&'static str>,
}

impl NamespaceSpec {
    pub fn format_for_actor(&self, actor_id: &str) -> String {
        format_namespace(self.template, actor_id)
    }

    pub fn is_customer_scoped(&self) -> bool {
        self.audience == Audience::All
    }

    pub fn visible_to(&self, agent: AgentType) -> bool {
        match self.audience {
            Audience::All => true,
            Audience::Agent(owner) => owner == agent,
        }
    }
}

pub const CUSTOMER_PREFERENCES: &str = "support/customer/{actorId}/preferences";
pub const CUSTOMER_SEMANTIC: &str = "support/customer/{actorId}/semantic";
pub const ORCHESTRATOR_ROUTING: &str = "support/orchestrator/{actorId}/routing";
pub const TECHNICAL_SOLUTIONS: &str = "support/technical/{actorId}/solutions";

pub const NAMESPACES: &[NamespaceSpec] = &[
    NamespaceSpec {
        template: CUSTOMER_PREFERENCES,
        audience: Audience::All,
        strategy_name: "CustomerPreferences",
        strategy_type: StrategyType::UserPreference,
        description: "Customer preferences and behavior patterns",
        extraction_marker: None,
    },
    NamespaceSpec {
        template: CUSTOMER_SEMANTIC,
        audience: Audience::All,
        strategy_name: "CustomerSemanticMemory",
        strategy_type: StrategyType::Semantic,
        description: "Factual information shared across agents",
        extraction_marker: None,
    },
    NamespaceSpec {
        template: ORCHESTRATOR_ROUTING,
        audience: Audience::Agent(AgentType::Orchestrator),
        strategy_name: "OrchestratorRoutingMemory",
        strategy_type: StrategyType::Custom,
        description: "Orchestrator routing decisions and their reasoning",
        extraction_marker: Some(crate::records::ROUTING_DECISION_MARKER),
    },
    NamespaceSpec {
        template: TECHNICAL_SOLUTIONS,
        audience: Audience::Agent(AgentType::KnowledgeBase),
        strategy_name: "TechnicalSolutionsMemory",
        strategy_type: StrategyType::Custom,
        description: "Technical problems and the solutions that resolved them",
        extraction_marker: Some(crate::records::TECHNICAL_SOLUTION_MARKER),
    },
];

pub fn all_namespaces() -> &'static [NamespaceSpec] {
    NAMESPACES
}

/// Namespaces readable by `agent`: every customer-scoped entry, then the agent's own.
pub fn namespaces_for(agent: AgentType) -> Vec<&'static NamespaceSpec> {
    NAMESPACES.iter().filter(|ns| ns.visible_to(agent)).collect()
}

/// Like [`namespaces_for`] but keyed by label. An unrecognised label gets the shared subset.
pub fn namespaces_for_agent(label: &str) -> Vec<&'static NamespaceSpec> {
    match label.parse::<AgentType>() {
        Ok(agent) => namespaces_for(agent),
        Err(_) => NAMESPACES.iter().filter(|ns| ns.is_customer_scoped()).collect(),
    }
}

/// Concrete namespaces for an actor, optionally restricted to what one agent may read.
pub fn format_namespaces_for_actor(actor_id: &str, agent_label: Option<&str>) -> Vec<String> {
    match agent_label {
        Some(label) => namespaces_for_agent(label)
            .into_iter()
            .map(|ns| ns.format_for_actor(actor_id))
            .collect(),
        None => NAMESPACES
            .iter()
            .map(|ns| ns.format_for_actor(actor_id))
            .collect(),
    }
}

/// Context label of a namespace: its second path segment upper-cased (`[CUSTOMER]`), or
/// `[GENERAL]` when there is no second segment.
pub fn namespace_label(namespace: &str) -> String {
    let scope = namespace
        .split('/')
        .nth(1)
        .filter(|s| !s.is_empty())
        .unwrap_or("general");
    format!("[{}]", scope.to_uppercase())
}

/// True for namespaces under the shared customer scope.
pub fn is_customer_namespace(namespace: &str) -> bool {
    namespace.split('/').nth(1) == Some("customer")
}

/// Scopes of a cross-agent context lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextScope {
    Customer,
    Orchestrator,
    Technical,
}

impl ContextScope {
    pub const ALL: [ContextScope; 3] = [
        ContextScope::Customer,
        ContextScope::Orchestrator,
        ContextScope::Technical,
    ];

    /// `(result key, namespace template)` pairs this scope reads.
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ContextScope::Customer => &[
                ("customer_preferences", CUSTOMER_PREFERENCES),
                ("customer_semantic", CUSTOMER_SEMANTIC),
            ],
            ContextScope::Orchestrator => &[("orchestrator", ORCHESTRATOR_ROUTING)],
            ContextScope::Technical => &[("technical", TECHNICAL_SOLUTIONS)],
        }
    }
}
