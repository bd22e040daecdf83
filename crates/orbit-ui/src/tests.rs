#[cfg(test)]
mod tests {
    use crate::panels::chat::{chat_panel, format_size};
    use crate::panels::emoji::EMOJI_CATEGORIES;
    use crate::panels::settings::{settings_panel, SettingsAction};
    use crate::panels::sidebar::{sidebar_panel, SidebarAction};
    use crate::state::*;
    use crate::theme;
    use orbit_types::event::ChatEvent;
    use orbit_types::message::{Message, MessageImage};
    use orbit_types::personality::{LOGIC, ORBIT};
    use orbit_types::session::ChatSession;

    fn image() -> MessageImage {
        MessageImage {
            data: "AAAA".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.input_text.is_empty());
        assert!(state.pending_image.is_none());
        assert!(!state.is_typing);
        assert!(!state.dark_mode);
        assert!(!state.show_settings);
        assert!(!state.show_emoji_picker);
        assert!(!state.confirm_clear);
        assert!(state.warning.is_none());
        assert_eq!(state.status_text, "Ready");
        assert!(!state.can_send());
    }

    #[test]
    fn test_ui_state_turn_lifecycle() {
        let mut state = UiState::new();

        state.process_events(vec![ChatEvent::TurnStart {
            session_id: "s1".to_string(),
            message_id: "m1".to_string(),
        }]);
        assert!(state.is_typing);
        assert_eq!(state.status_text, "Thinking...");

        state.process_events(vec![ChatEvent::Delta {
            session_id: "s1".to_string(),
            message_id: "m1".to_string(),
            text: "Hi".to_string(),
        }]);
        assert!(state.is_typing);

        state.process_events(vec![ChatEvent::TurnEnd {
            session_id: "s1".to_string(),
        }]);
        assert!(!state.is_typing);
        assert_eq!(state.status_text, "Ready");
    }

    #[test]
    fn test_ui_state_error_sets_warning_and_clears_typing() {
        let mut state = UiState::new();
        state.process_events(vec![
            ChatEvent::TurnStart {
                session_id: "s1".to_string(),
                message_id: "m1".to_string(),
            },
            ChatEvent::Error {
                message: "HTTP 500".to_string(),
            },
            ChatEvent::TurnEnd {
                session_id: "s1".to_string(),
            },
        ]);

        assert!(!state.is_typing);
        assert!(state.warning.as_deref().unwrap().contains("HTTP 500"));
    }

    #[test]
    fn test_take_draft_text() {
        let mut state = UiState::new();
        state.input_text = "Hello".to_string();
        state.show_emoji_picker = true;

        let draft = state.take_draft().unwrap();
        assert_eq!(draft.text, "Hello");
        assert!(draft.image.is_none());
        assert!(state.input_text.is_empty());
        assert!(!state.show_emoji_picker);
    }

    #[test]
    fn test_take_draft_image_only() {
        let mut state = UiState::new();
        state.set_pending_image(image(), "cat.png", 3);
        assert!(state.can_send());

        let draft = state.take_draft().unwrap();
        assert_eq!(draft.text, "");
        assert_eq!(draft.image, Some(image()));
        assert!(state.pending_image.is_none());
    }

    #[test]
    fn test_take_draft_rejects_blank() {
        let mut state = UiState::new();
        state.input_text = "   \n".to_string();
        assert!(state.take_draft().is_none());
        // Input is left alone
        assert_eq!(state.input_text, "   \n");
    }

    #[test]
    fn test_take_draft_blocked_while_typing() {
        let mut state = UiState::new();
        state.input_text = "second".to_string();
        state.is_typing = true;

        assert!(!state.can_send());
        assert!(state.take_draft().is_none());
        assert_eq!(state.input_text, "second");
    }

    #[test]
    fn test_pending_image_replace_and_discard() {
        let mut state = UiState::new();
        state.set_warning("Only image files are supported");
        state.set_pending_image(image(), "a.png", 3);
        assert!(state.warning.is_none());

        let other = MessageImage {
            data: "BBBB".to_string(),
            mime_type: "image/jpeg".to_string(),
        };
        state.set_pending_image(other.clone(), "b.jpg", 3);
        assert_eq!(state.pending_image.as_ref().unwrap().image, other);
        assert_eq!(state.pending_image.as_ref().unwrap().file_name, "b.jpg");

        state.discard_pending_image();
        assert!(state.pending_image.is_none());
    }

    // ─── Emoji Insertion Tests ───────────────────────────────

    #[test]
    fn test_insert_at_char_middle() {
        let mut text = "Hello world".to_string();
        let after = insert_at_char(&mut text, 5, "😀");
        assert_eq!(text, "Hello😀 world");
        assert_eq!(after, 6);
    }

    #[test]
    fn test_insert_at_char_clamps_to_end() {
        let mut text = "abc".to_string();
        let after = insert_at_char(&mut text, 99, "!");
        assert_eq!(text, "abc!");
        assert_eq!(after, 4);
    }

    #[test]
    fn test_insert_at_char_after_multibyte() {
        let mut text = "é😀x".to_string();
        let after = insert_at_char(&mut text, 2, "👍");
        assert_eq!(text, "é😀👍x");
        assert_eq!(after, 3);
    }

    #[test]
    fn test_insert_emoji_without_cursor_appends() {
        let mut state = UiState::new();
        state.input_text = "Nice".to_string();
        state.show_emoji_picker = true;

        let after = state.insert_emoji("🎉", None);
        assert_eq!(state.input_text, "Nice🎉");
        assert_eq!(after, 5);
        assert!(!state.show_emoji_picker);
    }

    #[test]
    fn test_insert_emoji_at_cursor() {
        let mut state = UiState::new();
        state.input_text = "ab".to_string();
        state.insert_emoji("✨", Some(0));
        assert_eq!(state.input_text, "✨ab");
    }

    #[test]
    fn test_emoji_categories_populated() {
        assert_eq!(EMOJI_CATEGORIES.len(), 3);
        for category in EMOJI_CATEGORIES {
            assert!(!category.emojis.is_empty(), "{} is empty", category.name);
        }
    }

    // ─── Copy Indicator Tests ────────────────────────────────

    #[test]
    fn test_copy_indicator_expires_after_two_seconds() {
        let mut state = UiState::new();
        state.mark_copied("m1", 10.0);

        assert!(state.is_copied("m1", 10.0));
        assert!(state.is_copied("m1", 11.9));
        assert!(!state.is_copied("m1", 12.0));
        assert!(!state.is_copied("m2", 10.5));
    }

    #[test]
    fn test_copy_indicator_follows_latest_message() {
        let mut state = UiState::new();
        state.mark_copied("m1", 1.0);
        state.mark_copied("m2", 1.5);
        assert!(!state.is_copied("m1", 1.6));
        assert!(state.is_copied("m2", 1.6));
    }

    #[test]
    fn test_copy_indicator_remaining() {
        let mut state = UiState::new();
        assert!(state.copy_indicator_remaining(0.0).is_none());
        state.mark_copied("m1", 5.0);
        let remaining = state.copy_indicator_remaining(5.5).unwrap();
        assert!((remaining - 1.5).abs() < 1e-9);
        assert!(state.copy_indicator_remaining(7.0).is_none());
    }

    // ─── Theme Tests ─────────────────────────────────────────

    #[test]
    fn test_palette_selection() {
        assert!(theme::palette(true).dark);
        assert!(!theme::palette(false).dark);
        assert_ne!(theme::DARK.bg_primary, theme::LIGHT.bg_primary);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    // ─── Headless Render Tests ───────────────────────────────

    #[test]
    fn test_panels_render_headless() {
        let ctx = egui::Context::default();
        let mut state = UiState::new();
        let mut session = ChatSession::new(ORBIT.id);
        session.messages.push(Message::user("Hello", Some(image())));
        let sessions = vec![session, ChatSession::new(LOGIC.id)];
        let current_id = sessions[0].id.clone();

        for dark in [false, true] {
            theme::apply_theme(&ctx, dark);
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                let pal = theme::palette(dark);
                egui::SidePanel::left("sidebar").show(ctx, |ui| {
                    let action = sidebar_panel(ui, pal, &sessions, &current_id, &ORBIT, false);
                    assert!(action.is_none());
                });
                egui::SidePanel::right("settings").show(ctx, |ui| {
                    assert_eq!(settings_panel(ui, &mut state, pal), SettingsAction::None);
                });
                egui::CentralPanel::default().show(ctx, |ui| {
                    let action = chat_panel(ui, &mut state, pal, sessions.first(), &ORBIT);
                    assert!(action.is_none());
                });
            });
        }
    }

    #[test]
    fn test_sidebar_locked_until_restore() {
        let ctx = egui::Context::default();
        let sessions = vec![ChatSession::new(ORBIT.id)];
        let current_id = sessions[0].id.clone();

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::SidePanel::left("sidebar").show(ctx, |ui| {
                let response = ui.add_enabled_ui(false, |ui| {
                    assert!(!ui.is_enabled());
                    sidebar_panel(ui, theme::palette(false), &sessions, &current_id, &ORBIT, false)
                });
                assert!(response.inner.is_none());
            });
        });

        assert!(SidebarAction::Select(current_id).needs_sessions());
        assert!(SidebarAction::SetPersonality(&LOGIC).needs_sessions());
        assert!(!SidebarAction::ToggleSettings.needs_sessions());
        assert!(SettingsAction::ClearHistory.needs_sessions());
        assert!(!SettingsAction::SaveClicked.needs_sessions());
    }

    // ─── Image Display Tests ─────────────────────────────────

    #[test]
    fn test_message_image_decoded_once() {
        let mut state = UiState::new();
        let first = state.images.get("m1", &image()).unwrap();
        assert_eq!(&first[..], &[0u8, 0, 0]);
        let again = state.images.get("m1", &image()).unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_sent_pending_image_leaves_cache() {
        let mut state = UiState::new();
        state.set_pending_image(image(), "cat.png", 3);
        let pending = state.pending_image.clone().unwrap();
        assert!(state.images.get(&pending.key, &pending.image).is_some());

        state.take_draft().unwrap();
        assert!(!state.images.contains(&pending.key));
    }

    #[test]
    fn test_ui_state_default() {
        let state = UiState::default();
        assert!(state.available_models.is_empty());
        assert!(!state.models_loading);
        assert!(state.save_feedback.is_none());
    }
}
