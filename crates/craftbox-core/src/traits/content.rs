//! Content store trait for pluggable binary payload backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for binary content backends.
///
/// Node metadata records reference payloads through an opaque content ref
/// (a provider-scoped path string). The content store has a lifecycle
/// independent from the metadata records: a ref stays valid across renames
/// and moves of the node that points at it. Implementations exist for the
/// local filesystem and for in-memory use in tests.
#[async_trait]
pub trait ContentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store a payload under the given owner-scoped ref, creating or
    /// replacing it. Returns the ref the payload is addressable by.
    async fn put(&self, content_ref: &str, data: Bytes) -> AppResult<String>;

    /// Read a payload into memory as a complete byte vector.
    async fn get(&self, content_ref: &str) -> AppResult<Bytes>;

    /// Delete the payload at the given ref. Deleting a missing ref is not
    /// an error.
    async fn delete(&self, content_ref: &str) -> AppResult<()>;

    /// Move a payload from one ref to another within this provider.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether a payload exists at the given ref.
    async fn exists(&self, content_ref: &str) -> AppResult<bool>;
}
