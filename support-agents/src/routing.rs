//! Keyword routing heuristic.

use support_core::AgentType;

/// Checked first: any hit sends the query to the knowledge base.
pub const TECHNICAL_KEYWORDS: [&str; 9] = [
    "troubleshoot",
    "error",
    "not working",
    "broken",
    "fix",
    "technical",
    "support",
    "issue",
    "problem",
];

pub const SERVICE_KEYWORDS: [&str; 8] = [
    "return",
    "refund",
    "warranty",
    "policy",
    "order",
    "shipping",
    "product info",
    "specifications",
];

/// Why a query was routed where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    Technical(&'static str),
    Service(&'static str),
    Default,
}

impl RouteMatch {
    pub fn agent(&self) -> AgentType {
        match self {
            RouteMatch::Technical(_) => AgentType::KnowledgeBase,
            RouteMatch::Service(_) | RouteMatch::Default => AgentType::CustomerSupport,
        }
    }

    pub fn reasoning(&self) -> String {
        match self {
            RouteMatch::Technical(keyword) => {
                format!("technical support keyword '{}'", keyword)
            }
            RouteMatch::Service(keyword) => format!("customer service keyword '{}'", keyword),
            RouteMatch::Default => "no keyword matched, general inquiry".to_string(),
        }
    }
}

/// Substring match on the lower-cased query; technical keywords win ties.
pub fn classify(query: &str) -> RouteMatch {
    let query = query.to_lowercase();
    if let Some(keyword) = TECHNICAL_KEYWORDS.iter().find(|k| query.contains(*k)) {
        return RouteMatch::Technical(keyword);
    }
    if let Some(keyword) = SERVICE_KEYWORDS.iter().find(|k| query.contains(*k)) {
        return RouteMatch::Service(keyword);
    }
    RouteMatch::Default
}

pub fn route_query(query: &str) -> AgentType {
    classify(query).agent()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technical_query_goes_to_knowledge_base() {
        assert_eq!(route_query("troubleshoot my screen"), AgentType::KnowledgeBase);
        assert_eq!(route_query("troubleshoot my screen").label(), "knowledge_base");
    }

    #[test]
    fn service_query_goes_to_customer_support() {
        assert_eq!(
            route_query("what is your return window").label(),
            "customer_support"
        );
    }

    #[test]
    fn technical_keywords_win_ties() {
        let route = classify("My refund request shows an ERROR");
        assert_eq!(route, RouteMatch::Technical("error"));
        assert_eq!(route.agent(), AgentType::KnowledgeBase);
    }

    #[test]
    fn unmatched_query_defaults_to_customer_support() {
        assert_eq!(classify("hello there"), RouteMatch::Default);
        assert_eq!(route_query("hello there"), AgentType::CustomerSupport);
    }

    #[test]
    fn multi_word_keywords_match_as_phrases() {
        assert_eq!(classify("my laptop is NOT WORKING"), RouteMatch::Technical("not working"));
        assert_eq!(
            classify("I need product info on headphones"),
            RouteMatch::Service("product info")
        );
    }
}
