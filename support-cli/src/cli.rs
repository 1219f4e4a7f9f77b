//! CLI parser and config loading.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use memory::EnvMemoryConfig;
use support_core::AgentType;
use support_runtime::{Protocol, RuntimeConfig};

/// Snapshot file used when `MEMORY_SNAPSHOT_PATH` is unset, so separate commands share one store.
pub const DEFAULT_SNAPSHOT_PATH: &str = "./memory_snapshot.json";

#[derive(Parser, Debug)]
#[command(name = "support")]
#[command(about = "Multi-agent customer support CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Create the shared memory store, or reuse the one recorded in the progress file.
    SetupMemory {
        /// Store name (defaults to MEMORY_NAME).
        #[arg(short, long)]
        name: Option<String>,
        /// Create a new store even when one is recorded.
        #[arg(long)]
        force: bool,
    },
    /// Write canned customer history, routing decisions and technical solutions.
    Seed {
        #[arg(short, long)]
        actor: Option<String>,
    },
    /// Print preference, solution and routing reports as JSON.
    Analyze {
        #[arg(short, long)]
        actor: Option<String>,
    },
    /// Print id, status, strategies and namespaces of the active store.
    Stats,
    /// Show which specialist the keyword router picks for a query.
    Route { query: String },
    /// Serve one agent (config from env; flags override).
    Serve {
        /// orchestrator, customer_support or knowledge_base (overrides AGENT_TYPE).
        #[arg(short, long)]
        agent_type: Option<AgentType>,
        /// http or a2a (overrides RUNTIME_PROTOCOL).
        #[arg(long)]
        protocol: Option<Protocol>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Send one prompt to a local agent, or to a remote a2a runtime with --url.
    Invoke {
        prompt: String,
        #[arg(short, long, default_value = "orchestrator")]
        agent_type: AgentType,
        /// JSON-RPC endpoint of a running a2a runtime.
        #[arg(long)]
        url: Option<String>,
    },
    /// Forget the active store. It expires on its own.
    Cleanup,
}

/// Memory config from env, with the default snapshot file when none is configured and `actor`
/// overriding ACTOR_ID.
pub fn load_memory_config(actor: Option<String>) -> Result<EnvMemoryConfig> {
    let mut config = EnvMemoryConfig::from_env()?;
    if config.memory_snapshot_path.is_none() {
        config.memory_snapshot_path = Some(PathBuf::from(DEFAULT_SNAPSHOT_PATH));
    }
    if let Some(actor) = actor {
        config.actor_id = actor;
    }
    Ok(config)
}

/// Runtime config from env with `serve` flags applied on top.
pub fn load_runtime_config(
    agent_type: Option<AgentType>,
    protocol: Option<Protocol>,
    port: Option<u16>,
) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_env_with(agent_type)?;
    if let Some(protocol) = protocol {
        config.protocol = protocol;
    }
    if let Some(port) = port {
        config.port = port;
    }
    Ok(config)
}
