mod common;

use common::mock_engine::{Behavior, MockEngine};
use common::{unavailable_orchestrator, TestContext};
use polyassist::core::engine::{ActionEngine, EngineError, EngineHandle};
use polyassist::core::text_normalizer::normalize;
use polyassist::orchestrator::DispatchPath;
use polyassist::{Intent, Orchestrator, RequestMetadata};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_empty_input_scenario() {
    let ctx = TestContext::new(Behavior::Echo);
    let result = ctx.orchestrator.handle("", &RequestMetadata::new()).await;

    assert_eq!(result.intent, Intent::General);
    assert_eq!(result.action, None);
    assert_eq!(result.confidence, 0.1);
    assert_eq!(result.output, "");
    assert!(ctx.engine.calls().is_empty());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json,
        json!({"intent": "general", "action": null, "confidence": 0.1f32, "output": ""})
    );
}

#[tokio::test]
async fn test_override_applies_only_to_general() {
    let ctx = TestContext::new(Behavior::Echo);
    let meta = RequestMetadata::new().with_action("custom");

    let result = ctx.orchestrator.handle("what time is it", &meta).await;
    assert_eq!(result.action.as_deref(), Some("custom"));

    let result = ctx.orchestrator.handle("please translate hello", &meta).await;
    assert_eq!(result.intent, Intent::Translation);
    assert_eq!(result.action.as_deref(), Some("translate"));
    assert_eq!(result.confidence, 0.9);

    let actions: Vec<String> = ctx.engine.calls().into_iter().map(|c| c.action).collect();
    assert_eq!(actions, vec!["custom", "translate"]);
}

#[tokio::test]
async fn test_engine_receives_normalized_payload_and_meta() {
    let ctx = TestContext::new(Behavior::Echo);
    let meta = RequestMetadata::new()
        .with_target_lang("French")
        .with_extra("tone", json!("formal"));

    let result = ctx
        .orchestrator
        .handle("  Translate this text to English: bonjour tout le monde ", &meta)
        .await;

    assert_eq!(result.output, "translate: bonjour tout le monde");
    let calls = ctx.engine.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].text, "bonjour tout le monde");
    assert_eq!(calls[0].options, meta);
}

#[tokio::test]
async fn test_unavailable_engine_output_equals_normalized_text() {
    let orchestrator = unavailable_orchestrator();
    for text in [
        "لخص هذا النص: طويل جدا ...",
        "  rewrite this text:   draft  ",
        "nothing to see",
        "",
    ] {
        let meta = RequestMetadata::new().with_action("summarize");
        let result = orchestrator.handle(text, &meta).await;
        assert_eq!(result.output, normalize(text), "fallback for '{}'", text);
    }
}

#[tokio::test]
async fn test_engine_failure_falls_back_to_payload() {
    let ctx = TestContext::new(Behavior::Fail);
    let (result, path) = ctx
        .orchestrator
        .handle_traced("summarize this text: a long report body", &RequestMetadata::new())
        .await;

    assert_eq!(result.action.as_deref(), Some("summarize"));
    assert_eq!(result.output, "a long report body");
    assert_eq!(path, DispatchPath::Degraded);
}

#[tokio::test]
async fn test_empty_engine_output_falls_back_to_payload() {
    let ctx = TestContext::new(Behavior::Empty);
    let result = ctx
        .orchestrator
        .handle("improve this text: dear team", &RequestMetadata::new())
        .await;
    assert_eq!(result.action.as_deref(), Some("improve"));
    assert_eq!(result.output, "dear team");
}

#[tokio::test]
async fn test_short_payload_returned_unchanged() {
    let ctx = TestContext::with_engine(MockEngine::new(Behavior::Echo).with_min_chars(30));
    let result = ctx
        .orchestrator
        .handle("summarize: tiny", &RequestMetadata::new())
        .await;
    assert_eq!(result.output, "summarize: tiny");
}

#[tokio::test]
async fn test_slow_engine_times_out_to_payload() {
    let ctx = TestContext::new(Behavior::Stall(Duration::from_secs(5)));
    let orchestrator = ctx
        .orchestrator
        .with_engine_timeout(Some(Duration::from_millis(50)));

    let (result, path) = orchestrator
        .handle_traced("write a story about a lighthouse", &RequestMetadata::new())
        .await;
    assert_eq!(result.intent, Intent::Content);
    assert_eq!(result.output, "write a story about a lighthouse");
    assert_eq!(path, DispatchPath::Degraded);
}

#[tokio::test]
async fn test_engine_initialized_once_under_concurrency() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let handle = EngineHandle::new(move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(Arc::new(MockEngine::new(Behavior::Echo)) as Arc<dyn ActionEngine>)
        }
    });
    let orchestrator = Arc::new(Orchestrator::new(Arc::new(handle)));

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move {
                orchestrator
                    .handle(&format!("summarize note {i}"), &RequestMetadata::new())
                    .await
            })
        })
        .collect();

    for task in tasks {
        let result = task.await.unwrap();
        assert!(result.output.starts_with("summarize: "));
    }
    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_initialization_is_not_retried() {
    let inits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&inits);
    let handle = EngineHandle::new(move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<Arc<dyn ActionEngine>, _>(EngineError::Init("model missing".to_string()))
        }
    });
    let orchestrator = Orchestrator::new(Arc::new(handle));

    for _ in 0..5 {
        let result = orchestrator
            .handle("summarize this text: body", &RequestMetadata::new())
            .await;
        assert_eq!(result.output, "body");
    }
    assert_eq!(inits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_garbage_flood_stays_well_formed() {
    let ctx = TestContext::new(Behavior::Echo);
    let garbage = [
        "asdfghjkl",
        "!!! @@@ ###",
        "1234567890",
        "extremely long string that doesn't mean anything to the system at all but keeps going and going",
        "",
        " ",
        "\u{0}\u{1}",
    ];

    for text in garbage {
        let result = ctx.orchestrator.handle(text, &RequestMetadata::new()).await;
        assert_eq!(result.intent, Intent::General);
        assert!((0.0..=1.0).contains(&result.confidence));
        assert!(result.action.is_none());
    }
}
