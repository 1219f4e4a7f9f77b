//! # Memory Crate
//!
//! Cross-agent memory for the multi-agent customer support system. One memory store is shared by
//! the orchestrator, customer-support and knowledge-base agents; it is partitioned into per-actor
//! namespaces so every agent reads shared customer context while keeping its own records apart.
//!
//! ## Namespaces
//!
//! `support/<scope>/<actorId>/<subtype>`:
//!
//! | namespace | audience | strategy |
//! |---|---|---|
//! | `support/customer/{actorId}/preferences` | all agents | `USER_PREFERENCE` |
//! | `support/customer/{actorId}/semantic` | all agents | `SEMANTIC` |
//! | `support/orchestrator/{actorId}/routing` | orchestrator | `CUSTOM` (routing decisions) |
//! | `support/technical/{actorId}/solutions` | knowledge base | `CUSTOM` (technical solutions) |
//!
//! See [`namespace`].
//!
//! ## Modules
//!
//! - [`namespace`] - Namespace registry and labels
//! - [`strategies`] - The fixed strategy set a store is created with
//! - [`client`] - [`MultiAgentMemoryClient`], the facade every agent and tool goes through
//! - [`run_state`] - Persisted setup progress (`setup_status.memory_id`)
//! - [`records`] - Routing decision / technical solution record formats
//! - [`seeder`] / [`analyzer`] - Canned history and read-only reports
//! - [`config`] - Env-based configuration
//!
//! ## Failure policy
//!
//! Store creation and lookup errors propagate. Retrieval errors become an empty result and event
//! writes log and continue, so a memory outage never fails a customer turn.

pub mod analyzer;
pub mod client;
pub mod config;
pub mod error;
pub mod namespace;
pub mod records;
pub mod run_state;
pub mod seeder;
pub mod strategies;

pub use analyzer::{
    ComprehensiveAnalysis, MemoryAnalyzer, PreferenceAnalysis, RoutingAnalysis, SolutionAnalysis,
};
pub use client::{MemorySettings, MemoryStatistics, MultiAgentMemoryClient};
pub use config::{EnvMemoryConfig, MemoryConfig};
pub use error::{MemoryError, Result};
pub use namespace::{
    namespace_label, namespaces_for, namespaces_for_agent, Audience, ContextScope, NamespaceSpec,
};
pub use records::{RoutingDecision, TechnicalSolution};
pub use run_state::ProgressTracker;
pub use seeder::{MemorySeeder, SeedReport};
pub use strategies::default_strategies;

#[cfg(test)]
mod test;
