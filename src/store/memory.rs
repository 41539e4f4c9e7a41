//! In-memory storage for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use super::StorageBackend;
use crate::errors::AppError;

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, Value>>,
    fail_next: AtomicBool,
}

impl MemoryStorage {
    /// Make the next read or write fail with a storage error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub async fn raw(&self, key: &str) -> Option<Value> {
        self.values.lock().await.get(key).cloned()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::Storage("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        self.check()?;
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), AppError> {
        self.check()?;
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}
