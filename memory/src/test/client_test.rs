//! Tests for [`crate::MultiAgentMemoryClient`]: create-or-reuse, degraded retrieval and event
//! writes, cross-agent context, statistics and cleanup.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use memory_core::EventMessage;
use tempfile::TempDir;

use super::mock_memory_service::MockMemoryService;
use crate::{ContextScope, MemoryError, MultiAgentMemoryClient, ProgressTracker, RoutingDecision};

const ACTOR: &str = "customer_001";

fn client_with(service: Arc<MockMemoryService>, memory_id: Option<&str>) -> MultiAgentMemoryClient {
    let mut run_state = ProgressTracker::in_memory();
    if let Some(id) = memory_id {
        run_state.set_memory_id(id).unwrap();
    }
    MultiAgentMemoryClient::new(service, run_state)
}

/// **Test: create_or_get with a valid cached id performs zero creates.**
///
/// **Setup:** Service knows `mem-existing`; run-state holds it.
/// **Action:** `create_or_get` twice.
/// **Expected:** Same id both times; create_count = 0.
#[tokio::test]
async fn test_create_or_get_reuses_valid_id() {
    let service = MockMemoryService::new().with_memory("mem-existing");
    let client = client_with(service.clone(), Some("mem-existing"));

    let first = client.create_or_get("MultiAgentCustomerSupportMemory").await.unwrap();
    let second = client.create_or_get("MultiAgentCustomerSupportMemory").await.unwrap();

    assert_eq!(first, "mem-existing");
    assert_eq!(second, "mem-existing");
    assert_eq!(MockMemoryService::count(&service.create_count), 0);
}

/// **Test: A stale id in run-state triggers creation and is replaced.**
#[tokio::test]
async fn test_create_or_get_replaces_stale_id() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.json");
    let mut run_state = ProgressTracker::load(&path).unwrap();
    run_state.set_memory_id("mem-gone").unwrap();

    let service = MockMemoryService::new();
    let client = MultiAgentMemoryClient::new(service.clone(), run_state);

    let id = client.create_or_get("MultiAgentCustomerSupportMemory").await.unwrap();

    assert_eq!(id, "mem-1");
    assert_eq!(MockMemoryService::count(&service.create_count), 1);
    assert_eq!(
        ProgressTracker::load(&path).unwrap().memory_id().as_deref(),
        Some("mem-1")
    );
}

/// **Test: Creation failure propagates and leaves no id behind.**
#[tokio::test]
async fn test_create_failure_is_fatal() {
    let service = MockMemoryService::new();
    service.fail_create.store(true, Ordering::SeqCst);
    let client = client_with(service, None);

    let err = client.create_or_get("M").await.unwrap_err();
    assert!(matches!(err, MemoryError::Create(_)));
    assert_eq!(client.memory_id().await, None);
}

/// **Test: retrieve returns at most top_k, even if the backend returns more.**
#[tokio::test]
async fn test_retrieve_bounded_by_top_k() {
    let service = MockMemoryService::new().with_memory("mem-1");
    let ns = "support/customer/customer_001/semantic";
    for text in ["a", "b", "c", "  "] {
        service.add_record(ns, text);
    }
    let client = client_with(service, Some("mem-1"));

    assert_eq!(client.retrieve(ns, "q", 2).await, vec!["a", "b"]);
    // Blank records are dropped.
    assert_eq!(client.retrieve(ns, "q", 10).await, vec!["a", "b", "c"]);
}

/// **Test: retrieve returns exactly [] when the backend errors.**
#[tokio::test]
async fn test_retrieve_error_yields_empty() {
    let service = MockMemoryService::new().with_memory("mem-1");
    service.add_record("ns", "a");
    service.fail_retrieve.store(true, Ordering::SeqCst);
    let client = client_with(service, Some("mem-1"));

    assert!(client.retrieve("ns", "q", 2).await.is_empty());
}

/// **Test: create_event swallows backend errors.**
#[tokio::test]
async fn test_create_event_swallows_errors() {
    let service = MockMemoryService::new().with_memory("mem-1");
    service.fail_events.store(true, Ordering::SeqCst);
    let client = client_with(service.clone(), Some("mem-1"));

    let written = client
        .create_event(ACTOR, "s1", vec![EventMessage::user("hi")])
        .await;

    assert!(!written);
    assert_eq!(MockMemoryService::count(&service.event_count), 1);
}

/// **Test: Seeding without a store is NotInitialized; routing decisions become OTHER events.**
#[tokio::test]
async fn test_seed_routing_decisions() {
    let service = MockMemoryService::new().with_memory("mem-1");
    let uninitialized = client_with(service.clone(), None);
    let decisions = vec![RoutingDecision::new("fix my screen", "KnowledgeBase", "technical")];
    assert!(matches!(
        uninitialized.seed_routing_decisions(ACTOR, &decisions).await,
        Err(MemoryError::NotInitialized)
    ));

    let client = client_with(service.clone(), Some("mem-1"));
    client.seed_routing_decisions(ACTOR, &decisions).await.unwrap();

    let events = service.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].session_id, "routing_history");
    assert_eq!(
        events[0].messages,
        vec![EventMessage::other(
            "Routing Decision: Query: fix my screen\nRouted to: KnowledgeBase\nReasoning: technical"
        )]
    );
}

/// **Test: Seeding interactions errors propagate.**
#[tokio::test]
async fn test_seed_interactions_propagates_errors() {
    let service = MockMemoryService::new().with_memory("mem-1");
    service.fail_events.store(true, Ordering::SeqCst);
    let client = client_with(service, Some("mem-1"));

    let result = client
        .seed_interactions(ACTOR, vec![EventMessage::user("hi")])
        .await;
    assert!(matches!(result, Err(MemoryError::Service(_))));
}

/// **Test: Cross-agent context fans out over all four namespaces with top_k 2 each.**
#[tokio::test]
async fn test_cross_agent_context_keys() {
    let service = MockMemoryService::new().with_memory("mem-1");
    service.add_record("support/customer/customer_001/preferences", "Prefers ThinkPad");
    for text in ["s1", "s2", "s3"] {
        service.add_record("support/customer/customer_001/semantic", text);
    }
    service.add_record("support/technical/customer_001/solutions", "Reset SMC");
    let client = client_with(service.clone(), Some("mem-1"));

    let context = client.get_cross_agent_context(ACTOR, "laptop", &[]).await;

    assert_eq!(
        context.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["customer_preferences", "customer_semantic", "orchestrator", "technical"]
    );
    assert_eq!(context["customer_preferences"], vec!["Prefers ThinkPad"]);
    assert_eq!(context["customer_semantic"], vec!["s1", "s2"]);
    assert!(context["orchestrator"].is_empty());
    assert_eq!(context["technical"], vec!["Reset SMC"]);
    assert_eq!(MockMemoryService::count(&service.retrieve_count), 4);

    let only_technical = client
        .get_cross_agent_context(ACTOR, "laptop", &[ContextScope::Technical])
        .await;
    assert_eq!(only_technical.len(), 1);
}

/// **Test: Cross-agent context failures are isolated to an empty list per key.**
#[tokio::test]
async fn test_cross_agent_context_failure_isolated() {
    let service = MockMemoryService::new().with_memory("mem-1");
    service.fail_retrieve.store(true, Ordering::SeqCst);
    let client = client_with(service, Some("mem-1"));

    let context = client.get_cross_agent_context(ACTOR, "q", &[]).await;
    assert_eq!(context.len(), 4);
    assert!(context.values().all(Vec::is_empty));
}

/// **Test: One failing namespace empties only its own key.**
///
/// **Setup:** Records in the preferences, semantic and technical namespaces; retrieval fails for
/// the semantic namespace only.
/// **Action:** `get_cross_agent_context` over all scopes.
/// **Expected:** `customer_semantic` is empty; the other keys keep their snippets.
#[tokio::test]
async fn test_cross_agent_context_one_namespace_fails() {
    let service = MockMemoryService::new().with_memory("mem-1");
    service.add_record("support/customer/customer_001/preferences", "Prefers ThinkPad");
    service.add_record("support/customer/customer_001/semantic", "Battery info");
    service.add_record("support/technical/customer_001/solutions", "Reset SMC");
    service.fail_namespace("support/customer/customer_001/semantic");
    let client = client_with(service.clone(), Some("mem-1"));

    let context = client.get_cross_agent_context(ACTOR, "laptop", &[]).await;

    assert_eq!(context.len(), 4);
    assert!(context["customer_semantic"].is_empty());
    assert_eq!(context["customer_preferences"], vec!["Prefers ThinkPad"]);
    assert_eq!(context["technical"], vec!["Reset SMC"]);
    assert_eq!(MockMemoryService::count(&service.retrieve_count), 4);
}

/// **Test: Statistics list the four strategies and their namespace templates.**
#[tokio::test]
async fn test_statistics_after_create() {
    let service = MockMemoryService::new();
    let client = client_with(service, None);
    assert!(matches!(
        client.get_statistics().await,
        Err(MemoryError::NotInitialized)
    ));

    client.create_memory("StatsMemory").await.unwrap();
    let stats = client.get_statistics().await.unwrap();

    assert_eq!(stats.memory_id, "mem-1");
    assert_eq!(stats.strategies, 4);
    assert!(stats
        .namespaces
        .contains(&"support/customer/{actorId}/preferences".to_string()));
    assert!(stats
        .namespaces
        .contains(&"support/technical/{actorId}/solutions".to_string()));
}

/// **Test: cleanup forgets the id; a second cleanup is a no-op success.**
#[tokio::test]
async fn test_cleanup() {
    let service = MockMemoryService::new().with_memory("mem-1");
    let client = client_with(service, Some("mem-1"));

    assert!(client.cleanup().await.unwrap());
    assert_eq!(client.memory_id().await, None);
    assert!(client.cleanup().await.unwrap());
}
