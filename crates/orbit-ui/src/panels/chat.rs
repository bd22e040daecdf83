//! Chat panel — header, conversation, composer.

use std::time::Duration;

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use egui::text::{CCursor, CCursorRange};
use egui::text_edit::TextEditState;
use orbit_core::runtime::Draft;
use orbit_types::message::{Message, Role};
use orbit_types::personality::Personality;
use orbit_types::session::ChatSession;
use crate::panels::emoji::{emoji_picker, EmojiAction};
use crate::state::{UiState, COPY_INDICATOR_SECS};
use crate::theme::*;

const INPUT_ID: &str = "chat_input";
const SUGGESTED_PROMPT: &str = "How do I share data between threads in Rust?";
const MAX_IMAGE_WIDTH: f32 = 320.0;
const MAX_IMAGE_HEIGHT: f32 = 240.0;
const THUMBNAIL_SIZE: f32 = 80.0;

/// What the caller should do after rendering the chat panel
pub enum ChatAction {
    /// Send the composed message
    Send(Draft),
    /// Open the image file dialog
    AttachImage,
}

/// Render the chat panel. Returns an action when the user sends or attaches.
pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    pal: &Palette,
    session: Option<&ChatSession>,
    personality: &Personality,
) -> Option<ChatAction> {
    let mut action = None;
    let now = ui.input(|i| i.time);

    egui::TopBottomPanel::top("chat_header")
        .frame(egui::Frame::default().fill(pal.bg_secondary).inner_margin(PANEL_PADDING))
        .show_inside(ui, |ui| header(ui, state, pal, personality));

    egui::TopBottomPanel::bottom("chat_composer")
        .frame(egui::Frame::default().fill(pal.bg_primary).inner_margin(PANEL_PADDING))
        .show_inside(ui, |ui| {
            if let Some(a) = composer(ui, state, pal) {
                action = Some(a);
            }
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(pal.bg_primary).inner_margin(PANEL_PADDING))
        .show_inside(ui, |ui| {
            let messages = session.map(|s| s.messages.as_slice()).unwrap_or_default();
            if messages.is_empty() {
                if let Some(a) = greeting(ui, state, pal, personality) {
                    action = Some(a);
                }
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    let last = messages.len() - 1;
                    for (i, msg) in messages.iter().enumerate() {
                        // The streaming placeholder is drawn as the typing indicator until text arrives
                        if i == last && state.is_typing && msg.role == Role::Model && msg.text.is_empty() {
                            continue;
                        }
                        render_message(ui, state, pal, msg, personality, now);
                        ui.add_space(6.0);
                    }
                    if state.is_typing {
                        typing_indicator(ui, pal, now);
                    }
                });
        });

    action
}

fn header(ui: &mut egui::Ui, state: &mut UiState, pal: &Palette, personality: &Personality) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(personality.icon).size(22.0));
        ui.vertical(|ui| {
            ui.label(RichText::new("Orbit").color(pal.text_primary).strong().size(18.0));
            ui.label(RichText::new(personality.name).color(pal.text_secondary).small());
        });
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let color = if state.is_typing { pal.warning } else { pal.success };
            ui.label(RichText::new(&state.status_text).color(color).small());
        });
    });

    let mut dismissed = false;
    if let Some(warning) = &state.warning {
        ui.add_space(4.0);
        egui::Frame::default()
            .fill(pal.error.linear_multiply(0.15))
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("⚠ {}", warning)).color(pal.error).small());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        dismissed = ui.small_button("✕").clicked();
                    });
                });
            });
    }
    if dismissed {
        state.warning = None;
    }
}

fn greeting(
    ui: &mut egui::Ui,
    state: &mut UiState,
    pal: &Palette,
    personality: &Personality,
) -> Option<ChatAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.25);
        ui.label(RichText::new(personality.icon).size(48.0));
        ui.add_space(8.0);
        ui.label(RichText::new("Orbit").color(pal.text_primary).strong().size(26.0));
        ui.label(
            RichText::new(format!(
                "I'm {}, {} How can I help you today?",
                personality.name,
                personality.description.to_lowercase()
            ))
            .color(pal.text_secondary),
        );
        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let width = 180.0;
            ui.add_space(((ui.available_width() - 2.0 * width - 8.0) / 2.0).max(0.0));
            let analyze = egui::Button::new(RichText::new("📸 Analyze an image").color(pal.text_primary))
                .fill(pal.bg_secondary)
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(width, 36.0));
            if ui.add(analyze).clicked() {
                action = Some(ChatAction::AttachImage);
            }
            let technical = egui::Button::new(RichText::new("💻 Technical help").color(pal.text_primary))
                .fill(pal.bg_secondary)
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(width, 36.0));
            if ui.add(technical).clicked() {
                state.input_text = SUGGESTED_PROMPT.to_string();
            }
        });
    });
    action
}

fn render_message(
    ui: &mut egui::Ui,
    state: &mut UiState,
    pal: &Palette,
    msg: &Message,
    personality: &Personality,
    now: f64,
) {
    let is_user = msg.role == Role::User;
    let (label, bg, fg) = if is_user {
        ("You", pal.user_bubble, pal.user_text)
    } else {
        (personality.name, pal.model_bubble, pal.text_primary)
    };
    let layout = if is_user {
        Layout::right_to_left(Align::Min)
    } else {
        Layout::left_to_right(Align::Min)
    };
    let max_width = ui.available_width() * 0.75;

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(bg)
            .stroke(egui::Stroke::new(1.0, if is_user { bg } else { pal.border }))
            .corner_radius(BUBBLE_ROUNDING)
            .inner_margin(Vec2::new(12.0, 8.0))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.with_layout(Layout::top_down(Align::Min), |ui| {
                    ui.label(RichText::new(label).color(fg).small().strong());

                    if let Some(image) = &msg.image {
                        match state.images.get(&msg.id, image) {
                            Some(bytes) => {
                                ui.add(
                                    egui::Image::from_bytes(format!("bytes://{}", msg.id), bytes)
                                        .max_width(max_width.min(MAX_IMAGE_WIDTH))
                                        .max_height(MAX_IMAGE_HEIGHT)
                                        .corner_radius(PANEL_ROUNDING),
                                );
                            }
                            None => {
                                ui.label(
                                    RichText::new(format!("🖼 Image unavailable ({})", image.mime_type))
                                        .color(fg)
                                        .italics(),
                                );
                            }
                        }
                    }
                    if !msg.text.is_empty() {
                        ui.add(egui::Label::new(RichText::new(&msg.text).color(fg)).wrap());
                    }

                    ui.horizontal(|ui| {
                        ui.label(RichText::new(msg.local_time_label()).color(fg.linear_multiply(0.7)).small());
                        let copied = state.is_copied(&msg.id, now);
                        let icon = if copied { "✔ Copied" } else { "📋" };
                        let copy = ui
                            .add(egui::Button::new(RichText::new(icon).color(fg).small()).frame(false))
                            .on_hover_text("Copy message");
                        if copy.clicked() {
                            ui.ctx().copy_text(msg.text.clone());
                            state.mark_copied(&msg.id, now);
                            ui.ctx()
                                .request_repaint_after(Duration::from_secs_f64(COPY_INDICATOR_SECS));
                        }
                    });
                });
            });
    });
}

fn typing_indicator(ui: &mut egui::Ui, pal: &Palette, now: f64) {
    let dots = (now * 3.0) as usize % 3 + 1;
    egui::Frame::default()
        .fill(pal.model_bubble)
        .stroke(egui::Stroke::new(1.0, pal.border))
        .corner_radius(BUBBLE_ROUNDING)
        .inner_margin(Vec2::new(14.0, 8.0))
        .show(ui, |ui| {
            ui.label(RichText::new("●".repeat(dots)).color(pal.text_secondary));
        });
    ui.ctx().request_repaint_after(Duration::from_millis(150));
}

fn composer(ui: &mut egui::Ui, state: &mut UiState, pal: &Palette) -> Option<ChatAction> {
    let mut action = None;
    let input_id = egui::Id::new(INPUT_ID);

    let mut discard = false;
    if let Some(pending) = &state.pending_image {
        egui::Frame::default()
            .fill(pal.bg_secondary)
            .stroke(egui::Stroke::new(2.0, pal.accent))
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if let Some(bytes) = state.images.get(&pending.key, &pending.image) {
                        ui.add(
                            egui::Image::from_bytes(format!("bytes://{}", pending.key), bytes)
                                .max_size(Vec2::splat(THUMBNAIL_SIZE))
                                .corner_radius(PANEL_ROUNDING),
                        );
                    }
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&pending.file_name).color(pal.text_primary));
                        ui.label(
                            RichText::new(format_size(pending.size))
                                .color(pal.text_secondary)
                                .small(),
                        );
                    });
                    discard = ui.small_button("✕").on_hover_text("Remove image").clicked();
                });
            });
        ui.add_space(4.0);
    }
    if discard {
        state.discard_pending_image();
    }

    if state.show_emoji_picker {
        match emoji_picker(ui, pal) {
            EmojiAction::Picked(emoji) => insert_emoji_at_cursor(ui.ctx(), state, input_id, emoji),
            EmojiAction::Close => state.show_emoji_picker = false,
            EmojiAction::None => {}
        }
        ui.add_space(4.0);
    }

    // Enter sends, Shift+Enter inserts a newline
    let has_focus = ui.memory(|m| m.has_focus(input_id));
    let enter_pressed = has_focus
        && ui.input_mut(|i| !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

    ui.horizontal(|ui| {
        let attach = ui
            .add(egui::Button::new(RichText::new("📎").size(18.0)).min_size(Vec2::splat(36.0)))
            .on_hover_text("Upload image (or drag & drop)");
        if attach.clicked() {
            action = Some(ChatAction::AttachImage);
        }

        let input = egui::TextEdit::multiline(&mut state.input_text)
            .id(input_id)
            .hint_text("Message Orbit...")
            .desired_rows(1)
            .desired_width(ui.available_width() - 90.0)
            .font(egui::FontId::proportional(14.0));
        ui.add(input);

        let emoji_btn = ui.add(
            egui::Button::selectable(state.show_emoji_picker, RichText::new("😊").size(18.0)),
        );
        if emoji_btn.clicked() {
            state.show_emoji_picker = !state.show_emoji_picker;
        }

        let send_enabled = state.can_send();
        let send_label = if state.is_typing { "⏳" } else { "➤" };
        let send_btn = ui.add_enabled(
            send_enabled,
            egui::Button::new(RichText::new(send_label).color(pal.user_text).size(18.0))
                .fill(if send_enabled { pal.accent } else { pal.bg_surface })
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::splat(36.0)),
        );

        if enter_pressed || send_btn.clicked() {
            if let Some(draft) = state.take_draft() {
                action = Some(ChatAction::Send(draft));
                ui.memory_mut(|m| m.request_focus(input_id));
            }
        }
    });

    action
}

fn insert_emoji_at_cursor(ctx: &egui::Context, state: &mut UiState, input_id: egui::Id, emoji: &str) {
    let edit_state = TextEditState::load(ctx, input_id);
    let cursor = edit_state
        .as_ref()
        .and_then(|s| s.cursor.char_range())
        .map(|range| range.primary.index);

    let after = state.insert_emoji(emoji, cursor);

    if let Some(mut edit_state) = edit_state {
        edit_state
            .cursor
            .set_char_range(Some(CCursorRange::one(CCursor::new(after))));
        edit_state.store(ctx, input_id);
    }
    ctx.memory_mut(|m| m.request_focus(input_id));
}

/// Human-readable byte count
pub fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
