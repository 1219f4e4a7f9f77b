//! Read-only reports over an actor's memory.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use memory_core::format_namespace;
use serde::Serialize;

use crate::client::MultiAgentMemoryClient;
use crate::error::{MemoryError, Result};
use crate::namespace::{CUSTOMER_PREFERENCES, ORCHESTRATOR_ROUTING, TECHNICAL_SOLUTIONS};

const ANALYSIS_TOP_K: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceAnalysis {
    pub namespace: String,
    pub total_preferences: usize,
    pub preferences: Vec<String>,
    pub query_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionAnalysis {
    pub namespace: String,
    pub total_solutions: usize,
    pub solutions: Vec<String>,
    pub query_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingAnalysis {
    pub namespace: String,
    pub total_patterns: usize,
    pub patterns: Vec<String>,
    /// Snippets per routed-to agent; a snippet naming both counts for `CustomerSupport`.
    pub agent_distribution: BTreeMap<String, usize>,
    pub query_used: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveAnalysis {
    pub actor_id: String,
    pub customer_preferences: PreferenceAnalysis,
    pub technical_solutions: SolutionAnalysis,
    pub routing_patterns: RoutingAnalysis,
    pub timestamp: DateTime<Utc>,
}

pub struct MemoryAnalyzer {
    client: Arc<MultiAgentMemoryClient>,
}

impl MemoryAnalyzer {
    pub fn new(client: Arc<MultiAgentMemoryClient>) -> Self {
        Self { client }
    }

    async fn collect(&self, template: &str, actor_id: &str, query: &str) -> Result<(String, Vec<String>)> {
        let memory_id = self
            .client
            .memory_id()
            .await
            .ok_or(MemoryError::NotInitialized)?;
        let namespace = format_namespace(template, actor_id);
        let texts = self
            .client
            .retrieve_in(&memory_id, &namespace, query, ANALYSIS_TOP_K)
            .await;
        Ok((namespace, texts))
    }

    pub async fn analyze_customer_preferences(
        &self,
        actor_id: &str,
        query: &str,
    ) -> Result<PreferenceAnalysis> {
        let (namespace, preferences) = self.collect(CUSTOMER_PREFERENCES, actor_id, query).await?;
        Ok(PreferenceAnalysis {
            namespace,
            total_preferences: preferences.len(),
            preferences,
            query_used: query.to_string(),
        })
    }

    pub async fn analyze_technical_solutions(
        &self,
        actor_id: &str,
        query: &str,
    ) -> Result<SolutionAnalysis> {
        let (namespace, solutions) = self.collect(TECHNICAL_SOLUTIONS, actor_id, query).await?;
        Ok(SolutionAnalysis {
            namespace,
            total_solutions: solutions.len(),
            solutions,
            query_used: query.to_string(),
        })
    }

    pub async fn analyze_routing_patterns(
        &self,
        actor_id: &str,
        query: &str,
    ) -> Result<RoutingAnalysis> {
        let (namespace, patterns) = self.collect(ORCHESTRATOR_ROUTING, actor_id, query).await?;
        Ok(RoutingAnalysis {
            namespace,
            total_patterns: patterns.len(),
            agent_distribution: agent_distribution(&patterns),
            patterns,
            query_used: query.to_string(),
        })
    }

    pub async fn comprehensive_analysis(&self, actor_id: &str) -> Result<ComprehensiveAnalysis> {
        Ok(ComprehensiveAnalysis {
            actor_id: actor_id.to_string(),
            customer_preferences: self
                .analyze_customer_preferences(actor_id, "customer preferences")
                .await?,
            technical_solutions: self
                .analyze_technical_solutions(actor_id, "technical solutions")
                .await?,
            routing_patterns: self
                .analyze_routing_patterns(actor_id, "routing decisions")
                .await?,
            timestamp: Utc::now(),
        })
    }
}

pub(crate) fn agent_distribution(patterns: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for text in patterns {
        let agent = if text.contains("CustomerSupport") {
            "CustomerSupport"
        } else if text.contains("KnowledgeBase") {
            "KnowledgeBase"
        } else {
            continue;
        };
        *counts.entry(agent.to_string()).or_insert(0) += 1;
    }
    counts
}
