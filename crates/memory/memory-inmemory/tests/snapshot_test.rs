//! Snapshot persistence of [`memory_inmemory::InMemoryMemoryService`].

use memory_core::{CreateMemoryRequest, EventMessage, MemoryService, MemoryStrategy, StrategyType};
use memory_inmemory::InMemoryMemoryService;
use tempfile::TempDir;

fn request() -> CreateMemoryRequest {
    CreateMemoryRequest {
        name: "SnapshotMemory".to_string(),
        description: "snapshot".to_string(),
        strategies: vec![MemoryStrategy::new(
            "CustomerSemanticMemory",
            "facts",
            StrategyType::Semantic,
            vec!["support/customer/{actorId}/semantic".to_string()],
        )],
        event_expiry_days: 90,
    }
}

/// **Test: State written by one service instance is visible to a fresh instance on the same file.**
///
/// **Setup:** Temp dir; service A with snapshot; create store and one event.
/// **Action:** Open service B on the same snapshot path.
/// **Expected:** B knows the store and retrieves the record.
#[tokio::test]
async fn test_snapshot_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("memory.json");

    let first = InMemoryMemoryService::with_snapshot(&path).await.unwrap();
    let memory = first.create_memory_and_wait(request()).await.unwrap();
    first
        .create_event(&memory.id, "customer_001", "s1", vec![EventMessage::user("Battery info")])
        .await
        .unwrap();
    assert!(path.exists());

    let second = InMemoryMemoryService::with_snapshot(&path).await.unwrap();
    assert_eq!(second.get_memory(&memory.id).await.unwrap().name, "SnapshotMemory");
    let records = second
        .retrieve_memories(&memory.id, "support/customer/customer_001/semantic", "battery", 2)
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text(), Some("Battery info"));
    assert_eq!(second.events(&memory.id).await.unwrap().len(), 1);
}

/// **Test: A missing snapshot file starts an empty service.**
#[tokio::test]
async fn test_missing_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();
    let service = InMemoryMemoryService::with_snapshot(dir.path().join("none.json"))
        .await
        .unwrap();
    assert_eq!(service.memory_count().await.unwrap(), 0);
}

/// **Test: A corrupt snapshot is an error, not silently discarded.**
#[tokio::test]
async fn test_corrupt_snapshot_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(InMemoryMemoryService::with_snapshot(&path).await.is_err());
}

/// **Test: Two services on one snapshot see and keep each other's writes.**
///
/// **Setup:** Services `cs` and `kb` opened on the same path before any store exists.
/// **Action:** `cs` creates the store and saves a preference; `kb` retrieves it, then saves a
/// technical question; `cs` writes again.
/// **Expected:** `kb` sees the preference; a fresh service finds all three events across both
/// sessions.
#[tokio::test]
async fn test_services_share_one_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    let cs = InMemoryMemoryService::with_snapshot(&path).await.unwrap();
    let kb = InMemoryMemoryService::with_snapshot(&path).await.unwrap();

    let memory = cs.create_memory_and_wait(request()).await.unwrap();
    cs.create_event(
        &memory.id,
        "customer_001",
        "cs-session",
        vec![EventMessage::user("I prefer ThinkPad laptops")],
    )
    .await
    .unwrap();

    let records = kb
        .retrieve_memories(&memory.id, "support/customer/customer_001/semantic", "thinkpad", 2)
        .await
        .unwrap();
    assert_eq!(records[0].text(), Some("I prefer ThinkPad laptops"));

    kb.create_event(
        &memory.id,
        "customer_001",
        "kb-session",
        vec![EventMessage::user("My screen flickers")],
    )
    .await
    .unwrap();
    cs.create_event(
        &memory.id,
        "customer_001",
        "cs-session",
        vec![EventMessage::user("Thanks")],
    )
    .await
    .unwrap();

    let fresh = InMemoryMemoryService::with_snapshot(&path).await.unwrap();
    let events = fresh.events(&memory.id).await.unwrap();
    let texts: Vec<&str> = events.iter().map(|e| e.messages[0].text.as_str()).collect();
    assert_eq!(texts, vec!["I prefer ThinkPad laptops", "My screen flickers", "Thanks"]);
    assert_eq!(events[1].session_id, "kb-session");
    assert_eq!(fresh.memory_count().await.unwrap(), 1);
}

/// **Test: Concurrent writers on one snapshot do not lose events.**
///
/// **Setup:** One store; eight services opened on its snapshot path.
/// **Action:** Each writes one event concurrently.
/// **Expected:** The snapshot holds eight events.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_keep_every_event() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    let setup = InMemoryMemoryService::with_snapshot(&path).await.unwrap();
    let memory = setup.create_memory_and_wait(request()).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = InMemoryMemoryService::with_snapshot(&path).await.unwrap();
        let memory_id = memory.id.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_event(
                    &memory_id,
                    "customer_001",
                    &format!("s{}", i),
                    vec![EventMessage::user(format!("fact {}", i))],
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(setup.events(&memory.id).await.unwrap().len(), 8);
}
