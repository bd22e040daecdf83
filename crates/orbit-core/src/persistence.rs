//! Durable slots on top of a [`StoragePort`].
//!
//! Reads never fail: missing or corrupt data is treated as "nothing saved".
//! Writes are best effort and report errors to the caller for logging.

use std::rc::Rc;
use orbit_types::{config::AppConfig, session::ChatSession, Result};
use crate::ports::StoragePort;
use crate::session_store::PersistOp;

pub const SESSIONS_KEY: &str = "orbit_sessions";
pub const DARK_MODE_KEY: &str = "orbit_dark_mode";
pub const CONFIG_KEY: &str = "orbit_config";

#[derive(Clone)]
pub struct SessionRepository {
    storage: Rc<dyn StoragePort>,
}

impl SessionRepository {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    pub fn backend_name(&self) -> &str {
        self.storage.backend_name()
    }

    /// Saved session collection, or empty when absent or unreadable.
    pub async fn load_sessions(&self) -> Vec<ChatSession> {
        match self.storage.get(SESSIONS_KEY).await {
            Ok(Some(data)) => match serde_json::from_slice::<Vec<ChatSession>>(&data) {
                Ok(sessions) => sessions,
                Err(e) => {
                    log::warn!("Discarding unreadable saved sessions: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read saved sessions: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn apply(&self, op: PersistOp) -> Result<()> {
        match op {
            PersistOp::Write(bytes) => self.storage.set(SESSIONS_KEY, &bytes).await,
            PersistOp::Erase => self.storage.delete(SESSIONS_KEY).await,
        }
    }

    /// Apply queued operations in order, logging failures.
    pub async fn apply_all(&self, ops: Vec<PersistOp>) {
        for op in ops {
            if let Err(e) = self.apply(op).await {
                log::warn!("Failed to persist sessions: {}", e);
            }
        }
    }

    pub async fn load_dark_mode(&self) -> bool {
        matches!(
            self.storage.get(DARK_MODE_KEY).await,
            Ok(Some(data)) if data == b"true"
        )
    }

    pub async fn save_dark_mode(&self, enabled: bool) -> Result<()> {
        let value = if enabled { "true" } else { "false" };
        self.storage.set(DARK_MODE_KEY, value.as_bytes()).await
    }

    pub async fn load_config(&self) -> Option<AppConfig> {
        let data = self.storage.get(CONFIG_KEY).await.ok()??;
        match serde_json::from_slice::<AppConfig>(&data) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Ignoring unreadable saved config: {}", e);
                None
            }
        }
    }

    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        let json = serde_json::to_vec(config)?;
        self.storage.set(CONFIG_KEY, &json).await
    }
}
