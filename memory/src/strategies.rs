//! The strategy set every store is created with, derived from the namespace registry.

use memory_core::MemoryStrategy;

use crate::namespace::NAMESPACES;

pub const DEFAULT_MEMORY_NAME: &str = "MultiAgentCustomerSupportMemory";
pub const DEFAULT_MEMORY_DESCRIPTION: &str = "Multi-agent customer support system memory";
pub const DEFAULT_EVENT_EXPIRY_DAYS: u32 = 90;

/// One strategy per registry entry; immutable once the store exists.
pub fn default_strategies() -> Vec<MemoryStrategy> {
    NAMESPACES
        .iter()
        .map(|ns| {
            let strategy = MemoryStrategy::new(
                ns.strategy_name,
                ns.description,
                ns.strategy_type,
                vec![ns.template.to_string()],
            );
            match ns.extraction_marker {
                Some(marker) => strategy.with_extraction_marker(marker),
                None => strategy,
            }
        })
        .collect()
}
