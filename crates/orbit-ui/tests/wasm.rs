//! WASM-target tests for orbit-ui.
//!
//! Covers the view state and the image cache under wasm32-unknown-unknown
//! via `wasm-pack test --node`. Rendering is covered by the native tests.

use wasm_bindgen_test::*;

use orbit_core::attachment::image_from_bytes;
use orbit_types::event::ChatEvent;
use orbit_types::message::MessageImage;
use orbit_ui::panels::settings::SettingsAction;
use orbit_ui::panels::sidebar::SidebarAction;
use orbit_ui::state::*;

fn png() -> MessageImage {
    image_from_bytes("image/png", "dot.png", b"\x89PNG\r\n").unwrap()
}

// ─── UiState Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn draft_carries_pending_image() {
    let mut state = UiState::new();
    state.input_text = "What is this?".to_string();
    state.set_pending_image(png(), "dot.png", 6);

    let draft = state.take_draft().unwrap();
    assert_eq!(draft.text, "What is this?");
    assert_eq!(draft.image, Some(png()));
    assert!(state.pending_image.is_none());
}

#[wasm_bindgen_test]
fn streaming_reply_blocks_send() {
    let mut state = UiState::new();
    state.process_events(vec![ChatEvent::TurnStart {
        session_id: "s1".to_string(),
        message_id: "m1".to_string(),
    }]);
    state.input_text = "next".to_string();
    assert!(state.take_draft().is_none());
    assert_eq!(state.input_text, "next");
}

// ─── Image Cache Tests ───────────────────────────────────

#[wasm_bindgen_test]
fn image_cache_decodes_payload() {
    let mut cache = ImageCache::default();
    let bytes = cache.get("m1", &png()).unwrap();
    assert_eq!(&bytes[..], b"\x89PNG\r\n");
    assert!(cache.contains("m1"));
}

#[wasm_bindgen_test]
fn image_cache_remembers_broken_payload() {
    let mut cache = ImageCache::default();
    let broken = MessageImage {
        data: "%%%".to_string(),
        mime_type: "image/png".to_string(),
    };
    assert!(cache.get("m1", &broken).is_none());
    assert!(cache.contains("m1"));
    cache.forget("m1");
    assert!(!cache.contains("m1"));
}

#[wasm_bindgen_test]
fn replaced_pending_image_gets_new_key() {
    let mut state = UiState::new();
    state.set_pending_image(png(), "a.png", 6);
    let first = state.pending_image.as_ref().unwrap().key.clone();
    let pending = state.pending_image.clone().unwrap();
    state.images.get(&pending.key, &pending.image);

    state.set_pending_image(png(), "a.png", 6);
    let second = state.pending_image.as_ref().unwrap().key.clone();
    assert_ne!(first, second);
    assert!(!state.images.contains(&first));
}

// ─── Restore Gating Tests ────────────────────────────────

#[wasm_bindgen_test]
fn session_actions_wait_for_restore() {
    assert!(SidebarAction::NewChat.needs_sessions());
    assert!(SidebarAction::Delete("s1".to_string()).needs_sessions());
    assert!(!SidebarAction::ToggleSettings.needs_sessions());
    assert!(SettingsAction::ClearHistory.needs_sessions());
    assert!(!SettingsAction::ToggleDarkMode.needs_sessions());
}
