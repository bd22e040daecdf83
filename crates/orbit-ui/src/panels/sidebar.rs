//! Sidebar — new chat, session history, personality picker, settings toggle.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use orbit_types::personality::Personality;
use orbit_types::session::ChatSession;
use crate::theme::*;

pub enum SidebarAction {
    NewChat,
    Select(String),
    Delete(String),
    SetPersonality(&'static Personality),
    ToggleSettings,
}

impl SidebarAction {
    /// Acts on the session collection, so must wait until it has been restored
    pub fn needs_sessions(&self) -> bool {
        !matches!(self, SidebarAction::ToggleSettings)
    }
}

/// Render the sidebar. Returns the user's choice, if any.
pub fn sidebar_panel(
    ui: &mut egui::Ui,
    pal: &Palette,
    sessions: &[ChatSession],
    current_id: &str,
    current_personality: &Personality,
    generating: bool,
) -> Option<SidebarAction> {
    let mut action = None;

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("🪐 Orbit").color(pal.accent).strong().size(20.0));
    });
    ui.add_space(8.0);

    let new_chat = egui::Button::new(RichText::new("＋ New Chat").color(pal.user_text).strong())
        .fill(pal.accent)
        .corner_radius(PANEL_ROUNDING)
        .min_size(Vec2::new(ui.available_width(), 32.0));
    if ui.add(new_chat).clicked() {
        action = Some(SidebarAction::NewChat);
    }

    ui.add_space(12.0);
    ui.label(RichText::new("PERSONALITY").color(pal.text_secondary).small().strong());
    for p in Personality::all() {
        let selected = p.id == current_personality.id;
        let label = RichText::new(format!("{} {}", p.icon, p.name)).color(if selected {
            pal.accent
        } else {
            pal.text_primary
        });
        // Locked while a reply streams
        let response = ui
            .add_enabled(!generating, egui::Button::selectable(selected, label))
            .on_hover_text(p.description);
        if response.clicked() && !selected {
            action = Some(SidebarAction::SetPersonality(p));
        }
    }

    ui.add_space(12.0);
    ui.label(RichText::new("HISTORY").color(pal.text_secondary).small().strong());

    let list_height = ui.available_height() - 44.0;
    ScrollArea::vertical()
        .max_height(list_height.max(80.0))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for session in sessions {
                let is_current = session.id == current_id;
                ui.horizontal(|ui| {
                    let title = RichText::new(format!("💬 {}", session.title)).color(if is_current {
                        pal.accent
                    } else {
                        pal.text_primary
                    });
                    let width = ui.available_width() - 28.0;
                    let row = egui::Button::selectable(is_current, title);
                    if ui.add_sized(Vec2::new(width, 24.0), row).clicked() && !is_current {
                        action = Some(SidebarAction::Select(session.id.clone()));
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let delete = ui
                            .add(egui::Button::new(RichText::new("🗑").color(pal.text_secondary)).frame(false))
                            .on_hover_text("Delete conversation");
                        if delete.clicked() {
                            action = Some(SidebarAction::Delete(session.id.clone()));
                        }
                    });
                });
            }
        });

    ui.with_layout(Layout::bottom_up(Align::Min), |ui| {
        ui.add_space(8.0);
        if ui
            .add(egui::Button::new(RichText::new("⚙ Settings").color(pal.text_primary)).frame(false))
            .clicked()
        {
            action = Some(SidebarAction::ToggleSettings);
        }
    });

    action
}
