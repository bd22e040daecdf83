//! UI-level state that drives rendering.
//! Holds everything the panels need that is not part of the session store:
//! the draft being composed, dialogs, transient indicators and the settings
//! form. Updated each frame by draining the EventBus.

use std::collections::HashMap;
use std::sync::Arc;

use orbit_core::attachment;
use orbit_core::runtime::Draft;
use orbit_types::config::AppConfig;
use orbit_types::event::ChatEvent;
use orbit_types::message::MessageImage;

/// How long the per-message "Copied" indicator stays visible, in seconds
pub const COPY_INDICATOR_SECS: f64 = 2.0;

/// An accepted image waiting to be sent with the next message
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    /// Cache key for the thumbnail; new for every accepted image
    pub key: String,
    pub image: MessageImage,
    pub file_name: String,
    /// Decoded size in bytes
    pub size: usize,
}

/// Save feedback shown next to the settings Save button
#[derive(Debug, Clone, PartialEq)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Decoded image bytes for display, keyed by message id.
/// A payload that fails to decode is remembered as `None`.
#[derive(Default)]
pub struct ImageCache {
    decoded: HashMap<String, Option<Arc<[u8]>>>,
}

impl ImageCache {
    pub fn get(&mut self, key: &str, image: &MessageImage) -> Option<Arc<[u8]>> {
        self.decoded
            .entry(key.to_string())
            .or_insert_with(|| match attachment::decode_image(image) {
                Ok(bytes) => Some(Arc::from(bytes)),
                Err(e) => {
                    log::warn!("Cannot display image {}: {}", key, e);
                    None
                }
            })
            .clone()
    }

    pub fn forget(&mut self, key: &str) {
        self.decoded.remove(key);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.decoded.contains_key(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CopiedMarker {
    message_id: String,
    at: f64,
}

/// State visible to UI panels
pub struct UiState {
    /// Input field content
    pub input_text: String,
    pub pending_image: Option<PendingImage>,
    /// A reply is streaming
    pub is_typing: bool,
    pub dark_mode: bool,
    pub show_settings: bool,
    pub show_emoji_picker: bool,
    /// Clear-history confirmation is open
    pub confirm_clear: bool,
    /// User-visible warning banner
    pub warning: Option<String>,
    /// Status line text
    pub status_text: String,
    /// Settings form, applied on Save
    pub config_draft: AppConfig,
    pub save_feedback: Option<SaveFeedback>,
    /// Model ids fetched from the provider
    pub available_models: Vec<String>,
    pub models_loading: bool,
    pub images: ImageCache,
    copied: Option<CopiedMarker>,
    pending_seq: u64,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            pending_image: None,
            is_typing: false,
            dark_mode: false,
            show_settings: false,
            show_emoji_picker: false,
            confirm_clear: false,
            warning: None,
            status_text: "Ready".to_string(),
            config_draft: AppConfig::default(),
            save_feedback: None,
            available_models: Vec::new(),
            models_loading: false,
            images: ImageCache::default(),
            copied: None,
            pending_seq: 0,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::TurnStart { .. } => {
                    self.is_typing = true;
                    self.status_text = "Thinking...".to_string();
                }
                ChatEvent::Delta { .. } => {
                    self.status_text = "Typing...".to_string();
                }
                ChatEvent::Error { message } => {
                    self.warning = Some(format!("Reply failed: {}", message));
                }
                ChatEvent::TurnEnd { .. } => {
                    self.is_typing = false;
                    self.status_text = "Ready".to_string();
                }
            }
        }
    }

    /// Whether the send button should be enabled
    pub fn can_send(&self) -> bool {
        !self.is_typing && (!self.input_text.trim().is_empty() || self.pending_image.is_some())
    }

    /// Move the composed message out of the input area.
    ///
    /// Returns `None` and leaves the input untouched when there is nothing
    /// to send or a reply is still streaming.
    pub fn take_draft(&mut self) -> Option<Draft> {
        if !self.can_send() {
            log::debug!("Draft not sent (typing: {})", self.is_typing);
            return None;
        }
        let text = std::mem::take(&mut self.input_text);
        let image = self.take_pending_image().map(|p| p.image);
        self.show_emoji_picker = false;
        Some(Draft::new(text, image))
    }

    /// Replace any pending image with a newly accepted one
    pub fn set_pending_image(&mut self, image: MessageImage, file_name: impl Into<String>, size: usize) {
        self.take_pending_image();
        self.pending_seq += 1;
        self.pending_image = Some(PendingImage {
            key: format!("pending-{}", self.pending_seq),
            image,
            file_name: file_name.into(),
            size,
        });
        self.warning = None;
    }

    pub fn discard_pending_image(&mut self) {
        self.take_pending_image();
    }

    fn take_pending_image(&mut self) -> Option<PendingImage> {
        let pending = self.pending_image.take()?;
        self.images.forget(&pending.key);
        Some(pending)
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.warning = Some(message.into());
    }

    /// Insert an emoji at a char cursor (end of input when unknown).
    /// Closes the picker and returns the char index just after the emoji.
    pub fn insert_emoji(&mut self, emoji: &str, cursor: Option<usize>) -> usize {
        let at = cursor.unwrap_or_else(|| self.input_text.chars().count());
        self.show_emoji_picker = false;
        insert_at_char(&mut self.input_text, at, emoji)
    }

    pub fn mark_copied(&mut self, message_id: &str, now: f64) {
        self.copied = Some(CopiedMarker {
            message_id: message_id.to_string(),
            at: now,
        });
    }

    /// The copy indicator for this message is still showing at `now`
    pub fn is_copied(&self, message_id: &str, now: f64) -> bool {
        self.copied
            .as_ref()
            .is_some_and(|c| c.message_id == message_id && now - c.at < COPY_INDICATOR_SECS)
    }

    /// Seconds until the copy indicator should disappear
    pub fn copy_indicator_remaining(&self, now: f64) -> Option<f64> {
        self.copied
            .as_ref()
            .map(|c| COPY_INDICATOR_SECS - (now - c.at))
            .filter(|remaining| *remaining > 0.0)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert `insert` at a char index, clamped to the end of `text`.
/// Returns the char index just past the inserted text.
pub fn insert_at_char(text: &mut String, char_index: usize, insert: &str) -> usize {
    let byte_index = text
        .char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.insert_str(byte_index, insert);
    text[..byte_index].chars().count() + insert.chars().count()
}
