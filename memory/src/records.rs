//! Text formats of records written as `OTHER` events.

pub const ROUTING_DECISION_MARKER: &str = "Routing Decision";
pub const TECHNICAL_SOLUTION_MARKER: &str = "Technical Solution";

/// Which specialist a query went to, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub query: String,
    pub agent: String,
    pub reasoning: String,
}

impl RoutingDecision {
    pub fn new(
        query: impl Into<String>,
        agent: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            agent: agent.into(),
            reasoning: reasoning.into(),
        }
    }

    pub fn to_memory_text(&self) -> String {
        format!(
            "{}: Query: {}\nRouted to: {}\nReasoning: {}",
            ROUTING_DECISION_MARKER, self.query, self.agent, self.reasoning
        )
    }
}

/// A technical problem, the attempted solution, and whether it worked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalSolution {
    pub problem: String,
    pub solution: String,
    pub success: bool,
}

impl TechnicalSolution {
    pub fn new(problem: impl Into<String>, solution: impl Into<String>, success: bool) -> Self {
        Self {
            problem: problem.into(),
            solution: solution.into(),
            success,
        }
    }

    /// `Success: True|False`, matching records already in deployed stores.
    pub fn to_memory_text(&self) -> String {
        format!(
            "{}: Problem: {}\nSolution: {}\nSuccess: {}",
            TECHNICAL_SOLUTION_MARKER,
            self.problem,
            self.solution,
            if self.success { "True" } else { "False" }
        )
    }
}
