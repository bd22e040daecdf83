use serde::{Deserialize, Serialize};

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// An image attached to a message, kept as an embedded base64 payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageImage {
    /// Standard base64, padded
    pub data: String,
    pub mime_type: String,
}

/// A single message in a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    /// Creation instant, epoch milliseconds
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<MessageImage>,
}

impl Message {
    pub fn user(text: impl Into<String>, image: Option<MessageImage>) -> Self {
        Self {
            id: crate::new_id(),
            role: Role::User,
            text: text.into(),
            timestamp: now_millis(),
            image,
        }
    }

    /// Model messages start empty and are filled while the reply streams in.
    pub fn model_placeholder() -> Self {
        Self {
            id: crate::new_id(),
            role: Role::Model,
            text: String::new(),
            timestamp: now_millis(),
            image: None,
        }
    }

    /// Local wall-clock time of creation, `HH:MM`
    pub fn local_time_label(&self) -> String {
        use chrono::{Local, TimeZone};
        match Local.timestamp_millis_opt(self.timestamp).single() {
            Some(dt) => dt.format("%H:%M").to_string(),
            None => String::new(),
        }
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
