//! UI theme: light and dark palettes

use egui::{Color32, CornerRadius, Stroke, Vec2};

/// Colors used by every panel; one instance per theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub dark: bool,
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_surface: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub user_bubble: Color32,
    pub user_text: Color32,
    pub model_bubble: Color32,
    pub border: Color32,
    pub success: Color32,
    pub error: Color32,
    pub warning: Color32,
}

pub const DARK: Palette = Palette {
    dark: true,
    bg_primary: Color32::from_rgb(2, 6, 23),
    bg_secondary: Color32::from_rgb(15, 23, 42),
    bg_surface: Color32::from_rgb(30, 41, 59),
    text_primary: Color32::from_rgb(241, 245, 249),
    text_secondary: Color32::from_rgb(148, 163, 184),
    accent: Color32::from_rgb(99, 102, 241),
    user_bubble: Color32::from_rgb(79, 70, 229),
    user_text: Color32::WHITE,
    model_bubble: Color32::from_rgb(30, 41, 59),
    border: Color32::from_rgb(51, 65, 85),
    success: Color32::from_rgb(74, 222, 128),
    error: Color32::from_rgb(248, 113, 113),
    warning: Color32::from_rgb(250, 204, 21),
};

pub const LIGHT: Palette = Palette {
    dark: false,
    bg_primary: Color32::from_rgb(248, 250, 252),
    bg_secondary: Color32::WHITE,
    bg_surface: Color32::from_rgb(241, 245, 249),
    text_primary: Color32::from_rgb(30, 41, 59),
    text_secondary: Color32::from_rgb(100, 116, 139),
    accent: Color32::from_rgb(79, 70, 229),
    user_bubble: Color32::from_rgb(79, 70, 229),
    user_text: Color32::WHITE,
    model_bubble: Color32::WHITE,
    border: Color32::from_rgb(226, 232, 240),
    success: Color32::from_rgb(22, 163, 74),
    error: Color32::from_rgb(220, 38, 38),
    warning: Color32::from_rgb(202, 138, 4),
};

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const BUBBLE_ROUNDING: CornerRadius = CornerRadius::same(14);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

pub fn palette(dark: bool) -> &'static Palette {
    if dark {
        &DARK
    } else {
        &LIGHT
    }
}

/// Apply the light or dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context, dark: bool) {
    let pal = palette(dark);
    let mut style = (*ctx.style()).clone();

    style.visuals = if dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    style.visuals.panel_fill = pal.bg_primary;
    style.visuals.window_fill = pal.bg_secondary;
    style.visuals.extreme_bg_color = pal.bg_secondary;

    style.visuals.widgets.inactive.bg_fill = pal.bg_surface;
    style.visuals.widgets.inactive.weak_bg_fill = pal.bg_surface;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, pal.text_secondary);
    style.visuals.widgets.hovered.bg_fill = pal.bg_surface;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, pal.text_primary);
    style.visuals.widgets.active.bg_fill = pal.accent;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, pal.text_primary);

    style.visuals.selection.bg_fill = pal.accent.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, pal.accent);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
