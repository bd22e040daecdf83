//! WASM-target tests for orbit-platform (Node.js runtime).
//!
//! Covers MemoryStorage, the SSE decoder and the Gemini wire format under
//! wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage and the fetch-based stream need a browser and are not run here.

use wasm_bindgen_test::*;

use std::rc::Rc;

use orbit_core::persistence::{SessionRepository, SESSIONS_KEY};
use orbit_core::ports::{GenerateRequest, StoragePort};
use orbit_core::session_store::SessionStore;
use orbit_platform::llm::gemini::{build_request_body, describe_http_error, parse_stream_chunk};
use orbit_platform::llm::sse::SseDecoder;
use orbit_platform::storage::{open_storage, MemoryStorage};
use orbit_types::config::{LlmConfig, StorageBackendType};
use orbit_types::message::{Message, MessageImage};
use orbit_types::personality::{LOGIC, ORBIT};

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    let result = storage.get("nonexistent").await.unwrap();
    assert!(result.is_none());
}

#[wasm_bindgen_test]
async fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", b"v1").await.unwrap();
    storage.set("key", b"v2").await.unwrap();
    let result = storage.get("key").await.unwrap();
    assert_eq!(result, Some(b"v2".to_vec()));
}

#[wasm_bindgen_test]
async fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", b"val").await.unwrap();
    storage.delete("key").await.unwrap();
    assert!(storage.get("key").await.unwrap().is_none());
    // Deleting again is a no-op
    storage.delete("key").await.unwrap();
}

#[wasm_bindgen_test]
async fn memory_storage_keys_are_independent() {
    let storage = MemoryStorage::new();
    storage.set("orbit_sessions", b"[]").await.unwrap();
    storage.set("orbit_dark_mode", b"true").await.unwrap();
    storage.delete("orbit_sessions").await.unwrap();

    assert!(storage.get("orbit_sessions").await.unwrap().is_none());
    assert_eq!(storage.get("orbit_dark_mode").await.unwrap(), Some(b"true".to_vec()));
}

#[wasm_bindgen_test]
fn open_storage_memory_backend() {
    let storage = open_storage(&StorageBackendType::Memory);
    assert_eq!(storage.backend_name(), "memory");
}

// ─── SessionRepository over MemoryStorage ────────────────

#[wasm_bindgen_test]
async fn repository_round_trips_store_snapshot() {
    let storage: Rc<dyn StoragePort> = Rc::new(MemoryStorage::new());
    let repo = SessionRepository::new(storage.clone());

    let mut store = SessionStore::new();
    let id = store.current_id().to_string();
    store.append_message(&id, Message::user("Hello there", None));
    repo.apply_all(store.take_pending()).await;

    assert!(storage.get(SESSIONS_KEY).await.unwrap().is_some());
    let loaded = repo.load_sessions().await;
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title, "Hello there");
}

// ─── SSE Decoder Tests ───────────────────────────────────

#[wasm_bindgen_test]
fn sse_single_event() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b"data: {\"a\":1}\n\n");
    assert_eq!(events, vec!["{\"a\":1}"]);
}

#[wasm_bindgen_test]
fn sse_event_split_across_chunks() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.push(b"da").is_empty());
    assert!(decoder.push(b"ta: hel").is_empty());
    assert!(decoder.push(b"lo\n").is_empty());
    assert_eq!(decoder.push(b"\n"), vec!["hello"]);
}

#[wasm_bindgen_test]
fn sse_multibyte_char_split_across_chunks() {
    let bytes = "data: héllo\n\n".as_bytes();
    // 'é' is two bytes starting at index 7
    let mut decoder = SseDecoder::new();
    assert!(decoder.push(&bytes[..8]).is_empty());
    assert_eq!(decoder.push(&bytes[8..]), vec!["héllo"]);
}

#[wasm_bindgen_test]
fn sse_crlf_and_comments() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b": keep-alive\r\nevent: message\r\ndata: x\r\n\r\n");
    assert_eq!(events, vec!["x"]);
}

#[wasm_bindgen_test]
fn sse_multiple_data_lines_joined() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b"data: one\ndata:two\n\n");
    assert_eq!(events, vec!["one\ntwo"]);
}

#[wasm_bindgen_test]
fn sse_several_events_in_one_chunk() {
    let mut decoder = SseDecoder::new();
    let events = decoder.push(b"data: a\n\ndata: b\n\ndata: c");
    assert_eq!(events, vec!["a", "b"]);
    assert_eq!(decoder.finish(), vec!["c"]);
}

#[wasm_bindgen_test]
fn sse_finish_on_empty_decoder() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.finish().is_empty());
}

// ─── Gemini Wire Format Tests ────────────────────────────

fn sample_image() -> MessageImage {
    MessageImage {
        data: "iVBORw0KGgo=".to_string(),
        mime_type: "image/png".to_string(),
    }
}

#[wasm_bindgen_test]
fn request_body_shape() {
    let config = LlmConfig::default();
    let history = vec![Message::user("Hi", None)];
    let req = GenerateRequest::build(&LOGIC, &history, "Explain lifetimes", None, &config);
    let body = build_request_body(&req);

    assert_eq!(body["contents"].as_array().unwrap().len(), 2);
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][1]["parts"][0]["text"], "Explain lifetimes");
    assert_eq!(
        body["systemInstruction"]["parts"][0]["text"],
        LOGIC.system_instruction
    );
    assert_eq!(body["generationConfig"]["maxOutputTokens"], config.max_output_tokens);
}

#[wasm_bindgen_test]
fn request_body_image_before_text() {
    let image = sample_image();
    let req = GenerateRequest::build(&ORBIT, &[], "What is this?", Some(&image), &LlmConfig::default());
    let body = build_request_body(&req);

    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[0]["inlineData"]["data"], "iVBORw0KGgo=");
    assert_eq!(parts[1]["text"], "What is this?");
}

#[wasm_bindgen_test]
fn request_body_image_only_drops_empty_text() {
    let image = sample_image();
    let req = GenerateRequest::build(&ORBIT, &[], "", Some(&image), &LlmConfig::default());
    let body = build_request_body(&req);

    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(parts.len(), 1);
    assert!(parts[0].get("inlineData").is_some());
}

#[wasm_bindgen_test]
fn request_body_keeps_lone_empty_text() {
    // A model reply that failed before any text arrived
    let mut reply = Message::model_placeholder();
    reply.text.clear();
    let req = GenerateRequest::build(&ORBIT, &[reply], "again", None, &LlmConfig::default());
    let body = build_request_body(&req);

    assert_eq!(body["contents"][0]["role"], "model");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "");
}

#[wasm_bindgen_test]
fn parse_chunk_concatenates_parts() {
    let payload = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hel"},{"text":"lo"}]}}]}"#;
    assert_eq!(parse_stream_chunk(payload).unwrap(), "Hello");
}

#[wasm_bindgen_test]
fn parse_chunk_skips_thoughts() {
    let payload = r#"{"candidates":[{"content":{"parts":[{"text":"thinking","thought":true},{"text":"answer"}]}}]}"#;
    assert_eq!(parse_stream_chunk(payload).unwrap(), "answer");
}

#[wasm_bindgen_test]
fn parse_chunk_without_candidates_is_empty() {
    let payload = r#"{"usageMetadata":{"promptTokenCount":4}}"#;
    assert_eq!(parse_stream_chunk(payload).unwrap(), "");
    assert_eq!(parse_stream_chunk("  ").unwrap(), "");
}

#[wasm_bindgen_test]
fn parse_chunk_error_object() {
    let payload = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
    let err = parse_stream_chunk(payload).unwrap_err();
    assert!(err.to_string().contains("RESOURCE_EXHAUSTED: Quota exceeded"));
}

#[wasm_bindgen_test]
fn parse_chunk_malformed_json() {
    assert!(parse_stream_chunk("{not json").is_err());
}

#[wasm_bindgen_test]
fn http_error_uses_api_message() {
    let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
    assert_eq!(
        describe_http_error(400, body),
        "HTTP 400: INVALID_ARGUMENT: API key not valid"
    );
}

#[wasm_bindgen_test]
fn http_error_plain_body() {
    assert_eq!(describe_http_error(502, "Bad Gateway\n"), "HTTP 502: Bad Gateway");
    assert_eq!(describe_http_error(500, ""), "HTTP 500");
}
