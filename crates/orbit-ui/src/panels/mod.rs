pub mod chat;
pub mod emoji;
pub mod settings;
pub mod sidebar;
