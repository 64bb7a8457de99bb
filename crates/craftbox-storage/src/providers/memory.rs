//! In-memory content store for tests and embedded use.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use craftbox_core::error::AppError;
use craftbox_core::result::AppResult;
use craftbox_core::traits::content::ContentStore;

/// In-memory `ContentStore` keyed by ref string.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    payloads: DashMap<String, Bytes>,
}

impl MemoryContentStore {
    /// Create an empty content store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payloads currently stored.
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Whether the store holds no payloads.
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, content_ref: &str, data: Bytes) -> AppResult<String> {
        self.payloads.insert(content_ref.to_string(), data);
        Ok(content_ref.to_string())
    }

    async fn get(&self, content_ref: &str) -> AppResult<Bytes> {
        self.payloads
            .get(content_ref)
            .map(|data| data.clone())
            .ok_or_else(|| AppError::not_found(format!("Payload not found: {content_ref}")))
    }

    async fn delete(&self, content_ref: &str) -> AppResult<()> {
        self.payloads.remove(content_ref);
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let (_, data) = self
            .payloads
            .remove(from)
            .ok_or_else(|| AppError::not_found(format!("Payload not found: {from}")))?;
        self.payloads.insert(to.to_string(), data);
        Ok(())
    }

    async fn exists(&self, content_ref: &str) -> AppResult<bool> {
        Ok(self.payloads.contains_key(content_ref))
    }
}
