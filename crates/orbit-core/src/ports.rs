//! Port traits — the hexagonal architecture boundary.
//!
//! These traits are defined here in `orbit-core` (pure Rust).
//! Implementations live in `orbit-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use orbit_types::{
    Result,
    config::LlmConfig,
    message::{Message, MessageImage, Role},
    personality::Personality,
};

// ─── LLM Port ────────────────────────────────────────────────

/// Streaming event from a generation response
#[derive(Debug, Clone, PartialEq)]
pub enum LlmStreamEvent {
    /// A text fragment; may be empty
    Delta(String),
    /// Stream finished
    Done,
    /// Error during streaming, terminal
    Error(String),
}

/// One piece of a conversation turn
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    InlineImage(MessageImage),
    Text(String),
}

/// A role-tagged conversation turn
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    /// Image part (when present) followed by the text part.
    pub fn new(role: Role, text: &str, image: Option<&MessageImage>) -> Self {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = image {
            parts.push(Part::InlineImage(image.clone()));
        }
        parts.push(Part::Text(text.to_string()));
        Self { role, parts }
    }

    pub fn from_message(msg: &Message) -> Self {
        Self::new(msg.role, &msg.text, msg.image.as_ref())
    }
}

/// Request to send to the generation service
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub contents: Vec<Turn>,
    pub system_instruction: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerateRequest {
    /// Translate prior history plus the new user turn into a request.
    pub fn build(
        personality: &Personality,
        history: &[Message],
        text: &str,
        image: Option<&MessageImage>,
        config: &LlmConfig,
    ) -> Self {
        let mut contents: Vec<Turn> = history.iter().map(Turn::from_message).collect();
        contents.push(Turn::new(Role::User, text, image));

        Self {
            contents,
            system_instruction: personality.system_instruction.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[async_trait(?Send)]
pub trait LlmPort {
    /// Open one request and stream back text fragments.
    /// The stream is lazy, finite and cannot be restarted.
    fn stream_generate(
        &self,
        req: GenerateRequest,
    ) -> Pin<Box<dyn Stream<Item = LlmStreamEvent>>>;

    /// List model identifiers the provider offers
    async fn list_models(&self) -> Result<Vec<String>>;

    fn provider_name(&self) -> &str;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
