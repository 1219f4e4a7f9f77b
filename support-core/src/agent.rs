//! Agent identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::HookError;

/// The three deployed agents. Serialized as the snake_case label (`customer_support`); displayed
/// as the routing name (`CustomerSupport`) used in routing decisions and event tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Orchestrator,
    CustomerSupport,
    KnowledgeBase,
}

impl AgentType {
    pub const ALL: [AgentType; 3] = [
        AgentType::Orchestrator,
        AgentType::CustomerSupport,
        AgentType::KnowledgeBase,
    ];

    /// Agents the orchestrator can route to.
    pub const SPECIALISTS: [AgentType; 2] = [AgentType::CustomerSupport, AgentType::KnowledgeBase];

    /// Lower snake_case label (`knowledge_base`), as used in namespace audiences and config.
    pub fn label(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "orchestrator",
            AgentType::CustomerSupport => "customer_support",
            AgentType::KnowledgeBase => "knowledge_base",
        }
    }

    /// Routing name (`KnowledgeBase`), as written into routing decisions.
    pub fn route_name(&self) -> &'static str {
        match self {
            AgentType::Orchestrator => "Orchestrator",
            AgentType::CustomerSupport => "CustomerSupport",
            AgentType::KnowledgeBase => "KnowledgeBase",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_name())
    }
}

impl FromStr for AgentType {
    type Err = HookError;

    /// Accepts the label, the routing name, or a kebab-case variant, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "orchestrator" => Ok(AgentType::Orchestrator),
            "customersupport" => Ok(AgentType::CustomerSupport),
            "knowledgebase" => Ok(AgentType::KnowledgeBase),
            _ => Err(HookError::UnknownAgentType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_label_and_route_name() {
        assert_eq!("knowledge_base".parse::<AgentType>().unwrap(), AgentType::KnowledgeBase);
        assert_eq!("CustomerSupport".parse::<AgentType>().unwrap(), AgentType::CustomerSupport);
        assert_eq!("Orchestrator".parse::<AgentType>().unwrap(), AgentType::Orchestrator);
        assert_eq!("customer-support".parse::<AgentType>().unwrap(), AgentType::CustomerSupport);
    }

    #[test]
    fn test_parse_unknown_is_error() {
        let err = "billing".parse::<AgentType>().unwrap_err();
        assert!(matches!(err, HookError::UnknownAgentType(ref s) if s == "billing"));
    }

    #[test]
    fn test_display_and_label() {
        assert_eq!(AgentType::KnowledgeBase.to_string(), "KnowledgeBase");
        assert_eq!(AgentType::KnowledgeBase.label(), "knowledge_base");
        assert_eq!(
            serde_json::to_string(&AgentType::CustomerSupport).unwrap(),
            "\"customer_support\""
        );
    }
}
