//! Settings panel — appearance, history, model connection, storage.
//! Connection fields edit a draft that only takes effect on Save.

use egui::{self, RichText, Vec2};
use orbit_types::config::StorageBackendType;
use crate::state::UiState;
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    ToggleDarkMode,
    /// Confirmed by the user
    ClearHistory,
    SaveClicked,
    FetchModels,
    Close,
}

impl SettingsAction {
    pub fn needs_sessions(self) -> bool {
        self == SettingsAction::ClearHistory
    }
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(ui: &mut egui::Ui, state: &mut UiState, pal: &Palette) -> SettingsAction {
    let mut action = SettingsAction::None;

    egui::Frame::default()
        .fill(pal.bg_secondary)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Settings").color(pal.text_primary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        action = SettingsAction::Close;
                    }
                });
            });
            ui.separator();

            // ── Appearance ───────────────────────────────────
            ui.label(RichText::new("Appearance").color(pal.accent).strong());
            ui.horizontal(|ui| {
                let icon = if state.dark_mode { "🌙" } else { "☀" };
                ui.label(RichText::new(icon).size(18.0));
                let mut dark = state.dark_mode;
                if ui.checkbox(&mut dark, "Dark mode").changed() {
                    action = SettingsAction::ToggleDarkMode;
                }
            });
            ui.label(
                RichText::new("Switch between light and dark themes")
                    .color(pal.text_secondary)
                    .small(),
            );

            ui.add_space(8.0);
            ui.separator();

            // ── History ──────────────────────────────────────
            ui.label(RichText::new("Clear History").color(pal.accent).strong());
            ui.label(
                RichText::new("Delete all your conversations permanently")
                    .color(pal.text_secondary)
                    .small(),
            );
            if state.confirm_clear {
                ui.label(
                    RichText::new("Are you sure you want to clear all chat history? This cannot be undone.")
                        .color(pal.error)
                        .small(),
                );
                ui.horizontal(|ui| {
                    let confirm = egui::Button::new(RichText::new("Delete all").color(pal.user_text))
                        .fill(pal.error)
                        .corner_radius(PANEL_ROUNDING);
                    if ui.add(confirm).clicked() {
                        state.confirm_clear = false;
                        action = SettingsAction::ClearHistory;
                    }
                    if ui.button("Cancel").clicked() {
                        state.confirm_clear = false;
                    }
                });
            } else if ui
                .add(egui::Button::new(RichText::new("Clear").color(pal.error)).corner_radius(PANEL_ROUNDING))
                .clicked()
            {
                state.confirm_clear = true;
            }

            ui.add_space(8.0);
            ui.separator();

            // ── Model ────────────────────────────────────────
            let llm = &mut state.config_draft.llm;
            ui.label(RichText::new("Model").color(pal.accent).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Model").color(pal.text_secondary).small());
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut llm.model).desired_width(ui.available_width() - 70.0));
                let fetch_label = if state.models_loading { "…" } else { "Fetch" };
                if ui
                    .add_enabled(!state.models_loading, egui::Button::new(fetch_label))
                    .on_hover_text("List models available to this API key")
                    .clicked()
                {
                    action = SettingsAction::FetchModels;
                }
            });
            if !state.available_models.is_empty() {
                egui::ComboBox::from_id_salt("llm_model")
                    .selected_text(llm.model.clone())
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for model in &state.available_models {
                            ui.selectable_value(&mut llm.model, model.clone(), model);
                        }
                    });
            }

            ui.add_space(4.0);

            // API Key (masked)
            ui.label(RichText::new("API Key").color(pal.text_secondary).small());
            ui.add(
                egui::TextEdit::singleline(&mut llm.api_key)
                    .password(true)
                    .hint_text("AIza..."),
            );

            ui.add_space(4.0);

            ui.label(RichText::new("API Base URL (optional)").color(pal.text_secondary).small());
            let mut base_url = llm.api_base.clone().unwrap_or_default();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut base_url)
                        .hint_text(orbit_types::config::DEFAULT_API_BASE),
                )
                .changed()
            {
                llm.api_base = if base_url.is_empty() { None } else { Some(base_url) };
            }

            ui.add_space(4.0);

            ui.label(RichText::new("Temperature").color(pal.text_secondary).small());
            ui.add(egui::Slider::new(&mut llm.temperature, 0.0..=2.0));

            ui.label(RichText::new("Max Output Tokens").color(pal.text_secondary).small());
            ui.add(egui::Slider::new(&mut llm.max_output_tokens, 256..=65536).logarithmic(true));

            ui.add_space(8.0);
            ui.separator();

            // ── Storage ──────────────────────────────────────
            let storage = &mut state.config_draft.storage;
            ui.label(RichText::new("Storage").color(pal.accent).strong());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(storage.backend.label())
                .show_ui(ui, |ui| {
                    for backend in StorageBackendType::all() {
                        ui.selectable_value(&mut storage.backend, backend.clone(), backend.label());
                    }
                });
            ui.label(
                RichText::new(storage_description(&storage.backend))
                    .color(pal.text_secondary)
                    .small()
                    .italics(),
            );

            // ── Save Button ──────────────────────────────────
            ui.add_space(12.0);
            ui.separator();
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(pal.user_text).strong())
                        .fill(pal.accent)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    action = SettingsAction::SaveClicked;
                }

                if let Some(fb) = &state.save_feedback {
                    let color = if fb.success { pal.success } else { pal.error };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    action
}

fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Uses localStorage when the browser allows it, memory otherwise. Applies after reload.",
        StorageBackendType::Memory => "Volatile. Conversations are lost on page reload.",
        StorageBackendType::LocalStorage => "Persistent browser storage. Conversations survive reloads. Applies after reload.",
    }
}
