//! Browser adapters for the Orbit chat client.
//!
//! Everything here talks to the browser through wasm-bindgen. Pure parsing
//! helpers (SSE decoding, Gemini payloads) are kept free of JS types so they
//! can be exercised natively as well.

pub mod file_picker;
pub mod llm;
pub mod storage;
