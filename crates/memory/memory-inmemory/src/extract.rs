//! Strategy extraction and keyword scoring.

use memory_core::{EventMessage, EventRole, MemoryStrategy, StrategyType};
use std::collections::HashSet;

const PREFERENCE_CUES: &[&str] = &[
    "i prefer",
    "i like",
    "i love",
    "i need",
    "i want",
    "i'm looking for",
    "looking for",
    "my budget",
];

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "i", "in", "is", "it", "my",
    "of", "on", "or", "the", "to", "what", "with", "you", "your",
];

/// Text this strategy extracts from `message`, if any.
pub(crate) fn extract(strategy: &MemoryStrategy, message: &EventMessage) -> Option<String> {
    let text = message.text.trim();
    if text.is_empty() {
        return None;
    }
    let lower = text.to_lowercase();
    let keep = match strategy.strategy_type {
        StrategyType::Semantic => true,
        StrategyType::UserPreference => {
            message.role == EventRole::User && PREFERENCE_CUES.iter().any(|c| lower.contains(c))
        }
        StrategyType::Custom => strategy
            .extraction_marker
            .as_deref()
            .map(|marker| lower.contains(&marker.to_lowercase()))
            .unwrap_or(false),
    };
    keep.then(|| text.to_string())
}

pub(crate) fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(&t.as_str()))
        .collect()
}

/// Fraction of query terms present in `text`, in `[0, 1]`. An empty query scores 0.
pub(crate) fn score(query_terms: &HashSet<String>, text: &str) -> f32 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let text_terms = terms(text);
    let hits = query_terms.iter().filter(|t| text_terms.contains(*t)).count();
    hits as f32 / query_terms.len() as f32
}
