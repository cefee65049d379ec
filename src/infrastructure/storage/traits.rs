//! Collection store trait

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Raw JSON payload of one named collection, with its write version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPayload {
    pub payload: String,
    /// Starts at 1 on first write and increases by one on every write.
    pub version: u64,
}

/// Backend for named, whole-value JSON blobs.
///
/// Version `0` stands for "not stored yet" in [`CollectionStore::compare_and_store`].
#[async_trait]
pub trait CollectionStore: Send + Sync {
    async fn load(&self, name: &str) -> DomainResult<Option<StoredPayload>>;

    /// Unconditional replace. Returns the new version.
    async fn store(&self, name: &str, payload: String) -> DomainResult<u64>;

    /// Replace only if the stored version still equals `expected`.
    /// Fails with `StoreConflict` otherwise.
    async fn compare_and_store(&self, name: &str, expected: u64, payload: String)
        -> DomainResult<u64>;

    async fn remove(&self, name: &str) -> DomainResult<()>;
}
