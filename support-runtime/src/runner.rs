//! Assembles and serves a runtime.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use llm_client::LlmClient;
use memory::MemoryConfig;
use serde_json::{json, Value};
use support_agents::{tools_for, AgentHandle};
use tracing::{info, instrument};

use crate::a2a::{a2a_router, AgentCard};
use crate::components::{build_agent, try_build_memory};
use crate::config::{Protocol, RuntimeConfig};
use crate::error::Result;
use crate::http::invocations_router;

/// `GET /ping` plus the routes of `protocol`.
pub fn build_router(protocol: Protocol, agent: Arc<dyn AgentHandle>) -> Router {
    let profile = match protocol {
        Protocol::Http => invocations_router(agent),
        Protocol::A2a => {
            let card = AgentCard::for_agent(agent.agent_type(), &tools_for(agent.agent_type()).names());
            a2a_router(agent, card)
        }
    };
    Router::new().route("/ping", get(ping)).merge(profile)
}

async fn ping() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Serves `router` on the configured address until Ctrl-C.
pub async fn serve(config: &RuntimeConfig, router: Router) -> Result<()> {
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %addr,
        agent_type = %config.agent_type,
        protocol = %config.protocol,
        "Runtime listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Runtime shutting down");
        })
        .await?;
    Ok(())
}

/// Builds memory (degrading to none), the agent and its router, then serves.
#[instrument(skip(config, memory_config, llm))]
pub async fn run_runtime(
    config: RuntimeConfig,
    memory_config: &dyn MemoryConfig,
    llm: Arc<dyn LlmClient>,
) -> Result<()> {
    info!(agent_type = %config.agent_type, "Initializing runtime");
    let memory = try_build_memory(memory_config).await;
    let agent = build_agent(&config, llm, memory.as_ref())?;
    let router = build_router(config.protocol, agent);
    serve(&config, router).await
}
