//! Emoji picker shown above the input field.

use egui::{self, RichText, ScrollArea, Vec2};
use crate::theme::*;

pub struct EmojiCategory {
    pub name: &'static str,
    pub emojis: &'static [&'static str],
}

pub const EMOJI_CATEGORIES: &[EmojiCategory] = &[
    EmojiCategory {
        name: "Smileys",
        emojis: &[
            "😀", "😃", "😄", "😁", "😅", "😂", "🤣", "😊", "😇", "🙂", "🙃", "😉", "😌", "😍",
            "🥰", "😘", "😋", "😛", "😜", "🤪", "🤨", "🧐", "🤓", "😎", "🤩", "🥳", "😏", "😒",
            "😞", "😔", "😟", "😕", "🙁", "😣", "😖", "😫", "😩", "🥺", "😢", "😭", "😤", "😠",
            "😡", "🤯", "😳", "🥵", "🥶", "😱", "😨", "😰", "😥", "😓", "🤗", "🤔", "🤭", "🤫",
            "😶", "😐", "😑", "😬", "🙄", "😯", "😮", "😲", "🥱", "😴", "🤤", "😪", "😵", "🤐",
        ],
    },
    EmojiCategory {
        name: "Hearts & Hands",
        emojis: &[
            "❤", "🧡", "💛", "💚", "💙", "💜", "🖤", "🤍", "🤎", "💔", "💕", "💞", "💓", "💗",
            "💖", "💘", "💝", "👋", "🤚", "✋", "🖖", "👌", "🤏", "✌", "🤞", "🤟", "🤘", "🤙",
            "👈", "👉", "👆", "👇", "☝", "👍", "👎", "✊", "👊", "🤛", "🤜", "👏", "🙌", "👐",
            "🤲", "🤝", "🙏",
        ],
    },
    EmojiCategory {
        name: "Objects",
        emojis: &[
            "💻", "📱", "⌨", "🖱", "🖨", "💾", "💿", "📀", "📷", "📹", "🎥", "📞", "🔋", "🔌",
            "💡", "🔦", "🕯", "🗑", "🛒", "🎁", "🎈", "🎉", "🎊", "✉", "📦", "🏷", "📮", "📤",
            "📥", "📜", "📄", "📅", "📆", "📊", "📈", "📉", "📋", "📁", "📂", "📓", "📔", "📒",
            "📕", "📗", "📘", "📙", "📚", "📖", "🔖", "🔗", "📎", "📐", "📏", "📌", "📍", "✂",
            "📝", "✏",
        ],
    },
];

const COLUMNS: usize = 7;

pub enum EmojiAction {
    None,
    Picked(&'static str),
    Close,
}

pub fn emoji_picker(ui: &mut egui::Ui, pal: &Palette) -> EmojiAction {
    let mut action = EmojiAction::None;

    egui::Frame::default()
        .fill(pal.bg_secondary)
        .stroke(egui::Stroke::new(1.0, pal.border))
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("SELECT EMOJI").color(pal.text_secondary).small().strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        action = EmojiAction::Close;
                    }
                });
            });
            ui.separator();

            ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                for category in EMOJI_CATEGORIES {
                    ui.label(RichText::new(category.name).color(pal.text_secondary).small());
                    egui::Grid::new(category.name)
                        .spacing(Vec2::splat(2.0))
                        .show(ui, |ui| {
                            for (i, emoji) in category.emojis.iter().enumerate() {
                                let btn = egui::Button::new(RichText::new(*emoji).size(18.0))
                                    .frame(false)
                                    .min_size(Vec2::splat(28.0));
                                if ui.add(btn).clicked() {
                                    action = EmojiAction::Picked(emoji);
                                }
                                if (i + 1) % COLUMNS == 0 {
                                    ui.end_row();
                                }
                            }
                        });
                    ui.add_space(6.0);
                }
            });
        });

    action
}
