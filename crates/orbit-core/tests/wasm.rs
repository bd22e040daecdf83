//! WASM-target tests for orbit-core.
//!
//! Runs SessionStore, EventBus, attachment and ChatRuntime tests
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use orbit_core::attachment::image_from_bytes;
use orbit_core::event_bus::EventBus;
use orbit_core::ports::*;
use orbit_core::runtime::{ChatRuntime, Draft};
use orbit_core::session_store::{PersistOp, SessionStore};
use orbit_types::config::LlmConfig;
use orbit_types::event::ChatEvent;
use orbit_types::OrbitError;

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use async_trait::async_trait;
use futures::Stream;

struct FixedLlm(Vec<LlmStreamEvent>);

#[async_trait(?Send)]
impl LlmPort for FixedLlm {
    fn stream_generate(&self, _req: GenerateRequest) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>> {
        Box::pin(futures::stream::iter(self.0.clone()))
    }

    async fn list_models(&self) -> orbit_types::Result<Vec<String>> {
        Ok(vec![])
    }

    fn provider_name(&self) -> &str {
        "fixed"
    }
}

// ─── SessionStore Tests ──────────────────────────────────

#[wasm_bindgen_test]
fn store_is_never_empty() {
    let mut store = SessionStore::new();
    for _ in 0..5 {
        let id = store.current_id().to_string();
        store.delete(&id);
        assert_eq!(store.len(), 1);
    }
}

#[wasm_bindgen_test]
fn clear_all_queues_erase_then_write() {
    let mut store = SessionStore::new();
    store.create();
    store.take_pending();
    store.clear_all();
    let ops = store.take_pending();
    assert_eq!(ops[0], PersistOp::Erase);
    assert!(matches!(ops[1], PersistOp::Write(_)));
}

#[wasm_bindgen_test]
fn event_bus_drains() {
    let bus = EventBus::new();
    bus.emit(ChatEvent::Error { message: "x".to_string() });
    assert_eq!(bus.drain().len(), 1);
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn non_image_attachment_rejected() {
    assert!(matches!(
        image_from_bytes("text/plain", "a.txt", b"x"),
        Err(OrbitError::UnsupportedAttachment { .. })
    ));
}

// ─── ChatRuntime Tests ───────────────────────────────────

#[wasm_bindgen_test]
async fn runtime_streams_reply() {
    let store = Rc::new(RefCell::new(SessionStore::new()));
    let rt = ChatRuntime::new(store.clone(), EventBus::new());
    let llm = FixedLlm(vec![
        LlmStreamEvent::Delta("Hello".to_string()),
        LlmStreamEvent::Delta(", world".to_string()),
        LlmStreamEvent::Done,
    ]);

    let reply = rt
        .send(Draft::new("Hello", None), &llm, &LlmConfig::default())
        .await
        .unwrap();
    assert_eq!(reply, "Hello, world");
    assert_eq!(store.borrow().current().unwrap().title, "Hello");
}

#[wasm_bindgen_test]
async fn runtime_keeps_partial_on_error() {
    let store = Rc::new(RefCell::new(SessionStore::new()));
    let rt = ChatRuntime::new(store.clone(), EventBus::new());
    let llm = FixedLlm(vec![
        LlmStreamEvent::Delta("half".to_string()),
        LlmStreamEvent::Error("boom".to_string()),
    ]);

    assert!(rt.send(Draft::new("q", None), &llm, &LlmConfig::default()).await.is_err());
    assert_eq!(store.borrow().current().unwrap().messages[1].text, "half");
    assert!(!rt.is_generating());
}
