pub mod message;
pub mod event;
pub mod personality;
pub mod config;
pub mod error;
pub mod session;


pub use error::OrbitError;
pub type Result<T> = std::result::Result<T, OrbitError>;

/// Fresh opaque identifier for sessions and messages.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
