//! In-memory collection store

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{CollectionStore, StoredPayload};
use crate::domain::{DomainError, DomainResult};

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryCollectionStore {
    entries: DashMap<String, StoredPayload>,
}

impl InMemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for InMemoryCollectionStore {
    async fn load(&self, name: &str) -> DomainResult<Option<StoredPayload>> {
        Ok(self.entries.get(name).map(|e| e.value().clone()))
    }

    async fn store(&self, name: &str, payload: String) -> DomainResult<u64> {
        let mut slot = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| StoredPayload {
                payload: String::new(),
                version: 0,
            });
        slot.version += 1;
        slot.payload = payload;
        Ok(slot.version)
    }

    async fn compare_and_store(
        &self,
        name: &str,
        expected: u64,
        payload: String,
    ) -> DomainResult<u64> {
        match self.entries.entry(name.to_string()) {
            Entry::Occupied(mut e) => {
                if e.get().version != expected {
                    return Err(DomainError::StoreConflict(name.to_string()));
                }
                let version = expected + 1;
                e.insert(StoredPayload { payload, version });
                Ok(version)
            }
            Entry::Vacant(e) => {
                if expected != 0 {
                    return Err(DomainError::StoreConflict(name.to_string()));
                }
                e.insert(StoredPayload {
                    payload,
                    version: 1,
                });
                Ok(1)
            }
        }
    }

    async fn remove(&self, name: &str) -> DomainResult<()> {
        self.entries.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn versions_increase_on_every_write() {
        let store = InMemoryCollectionStore::new();
        assert!(store.load("plants").await.unwrap().is_none());

        assert_eq!(store.store("plants", "[]".into()).await.unwrap(), 1);
        assert_eq!(store.store("plants", "[1]".into()).await.unwrap(), 2);

        let loaded = store.load("plants").await.unwrap().unwrap();
        assert_eq!(loaded.payload, "[1]");
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn stale_compare_and_store_is_rejected() {
        let store = InMemoryCollectionStore::new();
        store.compare_and_store("logs", 0, "[]".into()).await.unwrap();

        let err = store
            .compare_and_store("logs", 0, "[\"late\"]".into())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::StoreConflict("logs".into()));

        assert_eq!(store.compare_and_store("logs", 1, "[2]".into()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn compare_against_missing_key_needs_version_zero() {
        let store = InMemoryCollectionStore::new();
        assert!(store.compare_and_store("users", 3, "[]".into()).await.is_err());
        store.store("users", "[]".into()).await.unwrap();
        store.remove("users").await.unwrap();
        assert!(store.load("users").await.unwrap().is_none());
    }
}
