//! Runtime configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use support_core::AgentType;

use crate::error::{Result, RuntimeError};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Wire profile a runtime serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// `POST /invocations` with `{"prompt": ...}`, answered with a JSON string.
    Http,
    /// JSON-RPC 2.0 `message/send` at `POST /`.
    A2a,
}

impl Protocol {
    /// Specialists speak JSON-RPC so the orchestrator can call them; the orchestrator takes prompts.
    pub fn default_for(agent_type: AgentType) -> Self {
        match agent_type {
            AgentType::Orchestrator => Protocol::Http,
            AgentType::CustomerSupport | AgentType::KnowledgeBase => Protocol::A2a,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::A2a => write!(f, "a2a"),
        }
    }
}

impl FromStr for Protocol {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "a2a" | "jsonrpc" | "json-rpc" => Ok(Protocol::A2a),
            other => Err(RuntimeError::Config(format!(
                "RUNTIME_PROTOCOL must be http or a2a, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub agent_type: AgentType,
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
    /// JSON-RPC endpoint of the customer-support runtime, for a remote-routing orchestrator.
    pub customer_support_url: Option<String>,
    pub knowledge_base_url: Option<String>,
    pub log_file: Option<String>,
}

impl RuntimeConfig {
    pub fn new(agent_type: AgentType) -> Self {
        Self {
            agent_type,
            protocol: Protocol::default_for(agent_type),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            customer_support_url: None,
            knowledge_base_url: None,
            log_file: None,
        }
    }

    /// Loads `AGENT_TYPE` (required), `RUNTIME_PROTOCOL`, `RUNTIME_HOST`, `RUNTIME_PORT`,
    /// `CUSTOMER_SUPPORT_URL`, `KNOWLEDGE_BASE_URL` and `LOG_FILE`.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(None)
    }

    /// [`from_env`](Self::from_env) with `agent_type` taking the place of `AGENT_TYPE` when given.
    pub fn from_env_with(agent_type: Option<AgentType>) -> Result<Self> {
        let agent_type = match agent_type {
            Some(agent_type) => agent_type,
            None => env::var("AGENT_TYPE")
                .map_err(|_| RuntimeError::Config("AGENT_TYPE is not set".to_string()))?
                .parse()
                .map_err(|e: support_core::HookError| RuntimeError::Config(e.to_string()))?,
        };
        let mut config = Self::new(agent_type);

        if let Some(protocol) = non_empty("RUNTIME_PROTOCOL") {
            config.protocol = protocol.parse()?;
        }
        if let Some(host) = non_empty("RUNTIME_HOST") {
            config.host = host;
        }
        if let Some(port) = non_empty("RUNTIME_PORT") {
            config.port = port.trim().parse().map_err(|_| {
                RuntimeError::Config(format!("RUNTIME_PORT is not a valid port: {}", port))
            })?;
        }
        config.customer_support_url = non_empty("CUSTOMER_SUPPORT_URL");
        config.knowledge_base_url = non_empty("KNOWLEDGE_BASE_URL");
        config.log_file = non_empty("LOG_FILE");
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Both specialist URLs, when the orchestrator should call remote runtimes.
    pub fn remote_specialists(&self) -> Option<(&str, &str)> {
        match (&self.customer_support_url, &self.knowledge_base_url) {
            (Some(cs), Some(kb)) => Some((cs.as_str(), kb.as_str())),
            _ => None,
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "AGENT_TYPE",
        "RUNTIME_PROTOCOL",
        "RUNTIME_HOST",
        "RUNTIME_PORT",
        "CUSTOMER_SUPPORT_URL",
        "KNOWLEDGE_BASE_URL",
        "LOG_FILE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_agent_type_required() {
        clear_env();
        assert!(matches!(
            RuntimeConfig::from_env(),
            Err(RuntimeError::Config(_))
        ));
    }

    #[test]
    #[serial]
    fn test_defaults_follow_agent_type() {
        clear_env();
        env::set_var("AGENT_TYPE", "knowledge_base");

        let config = RuntimeConfig::from_env().unwrap();

        assert_eq!(config.agent_type, AgentType::KnowledgeBase);
        assert_eq!(config.protocol, Protocol::A2a);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert!(config.remote_specialists().is_none());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("AGENT_TYPE", "orchestrator");
        env::set_var("RUNTIME_PROTOCOL", "A2A");
        env::set_var("RUNTIME_PORT", "9000");
        env::set_var("CUSTOMER_SUPPORT_URL", "http://cs:9000/");
        env::set_var("KNOWLEDGE_BASE_URL", "http://kb:9000/");

        let config = RuntimeConfig::from_env().unwrap();

        assert_eq!(config.protocol, Protocol::A2a);
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.remote_specialists(),
            Some(("http://cs:9000/", "http://kb:9000/"))
        );
        clear_env();
    }

    #[test]
    #[serial]
    fn test_explicit_agent_type_replaces_env() {
        clear_env();
        env::set_var("RUNTIME_PORT", "9100");

        let config = RuntimeConfig::from_env_with(Some(AgentType::CustomerSupport)).unwrap();

        assert_eq!(config.agent_type, AgentType::CustomerSupport);
        assert_eq!(config.protocol, Protocol::A2a);
        assert_eq!(config.port, 9100);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_error() {
        clear_env();
        env::set_var("AGENT_TYPE", "customer_support");
        env::set_var("RUNTIME_PORT", "eighty");
        assert!(matches!(
            RuntimeConfig::from_env(),
            Err(RuntimeError::Config(m)) if m.contains("RUNTIME_PORT")
        ));
        clear_env();
    }
}
