use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrbitError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("Unsupported attachment type: {mime_type}")]
    UnsupportedAttachment { mime_type: String },

    #[error("A reply is already being generated")]
    Busy,

    #[error("Nothing to send")]
    EmptyMessage,

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for OrbitError {
    fn from(e: serde_json::Error) -> Self {
        OrbitError::Serialization(e.to_string())
    }
}
