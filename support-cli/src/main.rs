//! support CLI: set up, seed and inspect the shared memory, check routing, serve or invoke agents.
//! Config from env (`.env` loaded first) and optional CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use llm_client::{EnvLlmConfig, LlmClient, OpenAILlmClient};
use memory::{MemoryAnalyzer, MemoryConfig, MemorySeeder};
use support_agents::{classify, AgentHandle};
use support_cli::cli::{load_memory_config, load_runtime_config, Cli, Commands};
use support_core::{init_tracing, AgentType};
use support_runtime::{
    build_agent, build_memory, open_memory_client, run_runtime, try_build_memory, A2aAgentClient,
    RuntimeConfig,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if !matches!(cli.command, Commands::Serve { .. }) {
        init_cli_tracing();
    }

    match cli.command {
        Commands::Serve {
            agent_type,
            protocol,
            port,
        } => {
            let config = load_runtime_config(agent_type, protocol, port)?;
            init_tracing(config.log_file.as_deref())?;
            handle_serve(config).await
        }
        Commands::SetupMemory { name, force } => handle_setup_memory(name, force).await,
        Commands::Seed { actor } => handle_seed(actor).await,
        Commands::Analyze { actor } => handle_analyze(actor).await,
        Commands::Stats => handle_stats().await,
        Commands::Route { query } => {
            handle_route(&query);
            Ok(())
        }
        Commands::Invoke {
            prompt,
            agent_type,
            url,
        } => handle_invoke(&prompt, agent_type, url).await,
        Commands::Cleanup => handle_cleanup().await,
    }
}

/// One-shot commands print their results; logs stay at `warn` unless RUST_LOG says otherwise.
fn init_cli_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn llm_from_env() -> Result<Arc<dyn LlmClient>> {
    let config = EnvLlmConfig::from_env().context("LLM config")?;
    Ok(Arc::new(OpenAILlmClient::from_config(&config)))
}

async fn handle_serve(config: RuntimeConfig) -> Result<()> {
    info!(agent_type = %config.agent_type, protocol = %config.protocol, "Starting support runtime");
    let memory_config = load_memory_config(None)?;
    let llm = llm_from_env()?;
    run_runtime(config, &memory_config, llm)
        .await
        .context("runtime failed")
}

async fn handle_setup_memory(name: Option<String>, force: bool) -> Result<()> {
    let config = load_memory_config(None)?;
    let name = name.unwrap_or_else(|| config.memory_name().to_string());
    let client = open_memory_client(&config).await?;

    let memory_id = if force {
        client.create_memory(&name).await
    } else {
        client.create_or_get(&name).await
    }
    .context("Failed to set up memory")?;

    println!("Memory ready: {}", memory_id);
    println!("Progress file: {}", config.progress_file().display());
    if let Some(path) = config.snapshot_path() {
        println!("Snapshot: {}", path.display());
    }
    Ok(())
}

async fn handle_seed(actor: Option<String>) -> Result<()> {
    let config = load_memory_config(actor)?;
    let memory = build_memory(&config)
        .await
        .context("Failed to open memory")?;

    let report = MemorySeeder::new(memory.client.clone())
        .seed_all_data(&memory.actor_id)
        .await;

    println!("Seeded memory {} for {}", memory.memory_id, memory.actor_id);
    println!("{:<24} {}", "customer interactions", status(report.customer_interactions));
    println!("{:<24} {}", "routing decisions", status(report.routing_decisions));
    println!("{:<24} {}", "technical solutions", status(report.technical_solutions));
    println!("{}/3 succeeded", report.success_count());

    if !report.all_succeeded() {
        anyhow::bail!("Seeding incomplete");
    }
    Ok(())
}

fn status(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "failed"
    }
}

async fn handle_analyze(actor: Option<String>) -> Result<()> {
    let config = load_memory_config(actor)?;
    let memory = build_memory(&config)
        .await
        .context("Failed to open memory")?;

    let analysis = MemoryAnalyzer::new(memory.client.clone())
        .comprehensive_analysis(&memory.actor_id)
        .await
        .context("Analysis failed")?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn handle_stats() -> Result<()> {
    let config = load_memory_config(None)?;
    let client = open_memory_client(&config).await?;
    let stats = client
        .get_statistics()
        .await
        .context("No active memory; run setup-memory first")?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn handle_route(query: &str) {
    let route = classify(query);
    println!("{:<10} {}", "agent:", route.agent());
    println!("{:<10} {}", "reasoning:", route.reasoning());
}

async fn handle_invoke(prompt: &str, agent_type: AgentType, url: Option<String>) -> Result<()> {
    let agent: Arc<dyn AgentHandle> = match url {
        Some(url) => Arc::new(A2aAgentClient::new(url, agent_type)?),
        None => {
            let llm = llm_from_env()?;
            let memory = try_build_memory(&load_memory_config(None)?).await;
            let config = RuntimeConfig::from_env_with(Some(agent_type))?;
            build_agent(&config, llm, memory.as_ref())?
        }
    };

    let reply = agent
        .invoke(prompt)
        .await
        .with_context(|| format!("{} agent failed", agent.agent_type()))?;
    println!("{}", reply);
    Ok(())
}

async fn handle_cleanup() -> Result<()> {
    let config = load_memory_config(None)?;
    let client = open_memory_client(&config).await?;
    client.cleanup().await.context("Cleanup failed")?;
    println!("Memory forgotten; it expires per its retention policy.");
    Ok(())
}
