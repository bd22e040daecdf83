use serde::{Deserialize, Serialize};
use crate::message::Message;

pub const DEFAULT_TITLE: &str = "New Conversation";
pub const IMAGE_ONLY_TITLE: &str = "Shared an image";
pub const TITLE_MAX_CHARS: usize = 30;
const TITLE_ELLIPSIS: &str = "...";

/// One independent, titled conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub personality_id: String,
}

impl ChatSession {
    pub fn new(personality_id: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            personality_id: personality_id.into(),
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Title for a session, taken from the text of its first message.
///
/// Counts Unicode scalar values, not bytes.
pub fn derive_title(text: &str) -> String {
    if text.trim().is_empty() {
        return IMAGE_ONLY_TITLE.to_string();
    }
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}{}", head, TITLE_ELLIPSIS)
    } else {
        head
    }
}
