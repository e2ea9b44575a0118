mod common;

use cardhub_core::{Fetcher, Router, RouterError, SourceId};
use common::StubFetcher;
use std::sync::Arc;
use std::thread;

fn adapter(source_id: &str, base_urls: &[&str]) -> Arc<dyn Fetcher> {
    Arc::new(StubFetcher::new(source_id, base_urls))
}

fn demo_router() -> Router {
    let router = Router::new();
    router
        .register_fetchers(vec![
            adapter("alpha", &["alpha.example/c/"]),
            adapter("beta", &["beta.example/characters/", "beta.example/chat/"]),
        ])
        .expect("adapters should register");
    router
}

#[test]
fn registers_in_order_and_lists_sources() {
    let router = demo_router();
    assert_eq!(router.len(), 2);
    assert_eq!(
        router.sources(),
        vec![SourceId::new("alpha"), SourceId::new("beta")]
    );
    assert_eq!(router.fetchers().len(), 2);
    assert!(router.fetcher(&SourceId::new("beta")).is_some());
    assert!(router.fetcher(&SourceId::new("gamma")).is_none());
}

#[test]
fn rejects_duplicate_and_invalid_source_ids_atomically() {
    let router = demo_router();
    let err = router
        .register_fetchers(vec![
            adapter("gamma", &["gamma.example/"]),
            adapter("alpha", &["alpha2.example/"]),
        ])
        .expect_err("duplicate must be rejected");
    assert_eq!(err, RouterError::DuplicateSourceId("alpha".to_string()));
    assert_eq!(router.len(), 2);

    let err = router
        .register_fetchers(vec![adapter("Bad Id", &["bad.example/"])])
        .expect_err("invalid id must be rejected");
    assert!(matches!(err, RouterError::InvalidSourceId(_)));
}

#[test]
fn task_of_builds_task_from_matching_adapter() {
    let router = demo_router();
    let task = router
        .task_of("https://www.beta.example/chat/xyz/")
        .expect("beta should match");
    assert_eq!(task.source_id().as_str(), "beta");
    assert_eq!(task.matched_base_url(), "beta.example/chat/");
    assert_eq!(task.character_id(), "xyz");
    assert_eq!(task.normalized_url(), "https://beta.example/characters/xyz");
}

#[test]
fn task_of_returns_none_without_match() {
    let router = demo_router();
    assert!(router.task_of("https://unknown.example/c/1").is_none());
    assert!(Router::new().task_of("https://alpha.example/c/1").is_none());
}

#[test]
fn first_registered_adapter_wins_over_more_specific_match() {
    let router = Router::new();
    router
        .register_fetchers(vec![
            adapter("generic", &["example.com/"]),
            adapter("specific", &["example.com/characters/"]),
        ])
        .expect("adapters should register");

    let task = router
        .task_of("https://example.com/characters/abc")
        .expect("should match");
    assert_eq!(task.source_id().as_str(), "generic");
}

#[test]
fn task_slice_of_keeps_input_order_and_partitions() {
    let router = demo_router();
    let routed = router.task_slice_of([
        "https://beta.example/characters/2",
        "https://nowhere.example/1",
        "https://alpha.example/c/1",
        "https://beta.example/characters/2",
    ]);
    let ids: Vec<&str> = routed.valid.iter().map(|task| task.character_id()).collect();
    assert_eq!(ids, vec!["2", "1", "2"]);
    assert_eq!(routed.invalid, vec!["https://nowhere.example/1".to_string()]);
}

#[test]
fn task_map_of_collapses_duplicate_normalized_urls() {
    let router = demo_router();
    let routed = router.task_map_of(vec![
        "https://beta.example/characters/2".to_string(),
        "https://beta.example/chat/2?from=share".to_string(),
        "https://alpha.example/c/1".to_string(),
        "not a url".to_string(),
    ]);
    assert_eq!(routed.valid.len(), 2);
    assert!(routed
        .valid
        .contains_key("https://beta.example/characters/2"));
    assert!(routed.valid.contains_key("https://alpha.example/characters/1"));
    assert_eq!(routed.invalid, vec!["not a url".to_string()]);
}

#[test]
fn concurrent_routing_is_safe() {
    let router = Arc::new(demo_router());
    let handles: Vec<_> = (0..8)
        .map(|index| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                let url = format!("https://alpha.example/c/{index}");
                router
                    .task_of(&url)
                    .map(|task| task.character_id().to_string())
            })
        })
        .collect();
    for (index, handle) in handles.into_iter().enumerate() {
        let id = handle.join().expect("router thread should not panic");
        assert_eq!(id, Some(index.to_string()));
    }
}
