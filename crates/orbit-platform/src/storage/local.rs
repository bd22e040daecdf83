//! `window.localStorage` backend.
//! Persistent across page reloads; values are stored as UTF-8 strings.
//! Every call is synchronous on the browser side, so the async methods
//! complete without suspending.

use async_trait::async_trait;
use web_sys::Storage;

use orbit_core::ports::StoragePort;
use orbit_types::{OrbitError, Result};

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| OrbitError::Storage("No window object".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| OrbitError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| OrbitError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .storage
            .get_item(key)
            .map_err(|e| OrbitError::Storage(format!("{:?}", e)))?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| OrbitError::Storage(format!("{}: value is not UTF-8: {}", key, e)))?;
        // Fails with QuotaExceededError once the origin's budget is spent
        self.storage
            .set_item(key, text)
            .map_err(|e| OrbitError::Storage(format!("{:?}", e)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| OrbitError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}
