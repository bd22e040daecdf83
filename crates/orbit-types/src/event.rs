use serde::{Deserialize, Serialize};

/// Events emitted by the chat runtime.
/// UI drains these each frame for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChatEvent {
    /// A reply started generating for a session
    TurnStart { session_id: String, message_id: String },

    /// A fragment arrived; `text` is the cumulative reply so far
    Delta { session_id: String, message_id: String, text: String },

    /// Generation ended, normally or not
    TurnEnd { session_id: String },

    /// Generation failed; partial text stays in place
    Error { message: String },
}
