//! Typed record store over a [`CollectionStore`] backend
//!
//! Collections are whole JSON arrays stored under a name (`users`, `plants`,
//! `logs`). Single values such as `currentUser` use the same backend.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{CollectionStore, InMemoryCollectionStore};
use crate::domain::{DomainResult, SaveOutcome};
use crate::shared::utills::RetryConfig;

/// Storage keys used by the service.
pub mod keys {
    pub const USERS: &str = "users";
    pub const PLANTS: &str = "plants";
    pub const LOGS: &str = "logs";
    pub const CURRENT_USER: &str = "currentUser";
}

#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn CollectionStore>,
    retry: RetryConfig,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn CollectionStore>) -> Self {
        Self {
            backend,
            retry: RetryConfig::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCollectionStore::new()))
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The stored sequence, or an empty one when nothing is stored yet.
    pub async fn get_collection<T>(&self, name: &str) -> DomainResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        Ok(self.read(name).await?.0)
    }

    /// Replace the whole sequence unconditionally.
    pub async fn save_collection<T>(&self, name: &str, records: &[T]) -> DomainResult<()>
    where
        T: Serialize + Sync,
    {
        let payload = serde_json::to_string(records)?;
        let version = self.backend.store(name, payload).await?;
        debug!(collection = name, version, count = records.len(), "Collection saved");
        Ok(())
    }

    /// Read-modify-write with a version check.
    ///
    /// `f` may run more than once: when another writer got in between the
    /// read and the write, the collection is re-read and `f` is applied
    /// again, up to `retry.max_attempts` times.
    pub async fn modify<T, R, F>(&self, name: &str, mut f: F) -> DomainResult<R>
    where
        T: Serialize + DeserializeOwned + Send,
        R: Send,
        F: FnMut(&mut Vec<T>) -> DomainResult<R> + Send,
    {
        let mut attempt = 1;
        loop {
            let (mut records, version) = self.read::<T>(name).await?;
            let out = f(&mut records)?;
            let payload = serde_json::to_string(&records)?;
            drop(records);

            match self.backend.compare_and_store(name, version, payload).await {
                Ok(_) => return Ok(out),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    warn!(collection = name, attempt, ?delay, "Write conflict, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Replace the first record whose key equals `record`'s key, else append.
    pub async fn upsert<T, K, F>(&self, name: &str, record: T, key: F) -> DomainResult<SaveOutcome>
    where
        T: Serialize + DeserializeOwned + Clone + Send,
        K: PartialEq,
        F: Fn(&T) -> K + Send,
    {
        self.modify(name, move |records: &mut Vec<T>| {
            let wanted = key(&record);
            match records.iter_mut().find(|r| key(r) == wanted) {
                Some(slot) => {
                    *slot = record.clone();
                    Ok(SaveOutcome::Replaced)
                }
                None => {
                    records.push(record.clone());
                    Ok(SaveOutcome::Inserted)
                }
            }
        })
        .await
    }

    /// Remove every record whose key equals `value`. Returns whether anything went.
    pub async fn delete_by_key<T, K, F>(&self, name: &str, key: F, value: K) -> DomainResult<bool>
    where
        T: Serialize + DeserializeOwned + Send,
        K: PartialEq + Send,
        F: Fn(&T) -> K + Send,
    {
        self.modify(name, move |records: &mut Vec<T>| {
            let before = records.len();
            records.retain(|r| key(r) != value);
            Ok(records.len() != before)
        })
        .await
    }

    pub async fn get_value<T>(&self, name: &str) -> DomainResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.backend.load(name).await? {
            Some(stored) => Ok(Some(serde_json::from_str(&stored.payload)?)),
            None => Ok(None),
        }
    }

    pub async fn set_value<T>(&self, name: &str, value: &T) -> DomainResult<()>
    where
        T: Serialize + Sync,
    {
        let payload = serde_json::to_string(value)?;
        self.backend.store(name, payload).await?;
        Ok(())
    }

    pub async fn remove_value(&self, name: &str) -> DomainResult<()> {
        self.backend.remove(name).await
    }

    async fn read<T>(&self, name: &str) -> DomainResult<(Vec<T>, u64)>
    where
        T: DeserializeOwned,
    {
        match self.backend.load(name).await? {
            Some(stored) => Ok((serde_json::from_str(&stored.payload)?, stored.version)),
            None => Ok((Vec::new(), 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde::Deserialize;

    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::storage::StoredPayload;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        label: String,
    }

    fn item(id: &str, label: &str) -> Item {
        Item {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Rejects the first `conflicts` conditional writes as if another writer won.
    struct ContendedStore {
        inner: InMemoryCollectionStore,
        conflicts: AtomicU32,
    }

    #[async_trait]
    impl CollectionStore for ContendedStore {
        async fn load(&self, name: &str) -> DomainResult<Option<StoredPayload>> {
            self.inner.load(name).await
        }

        async fn store(&self, name: &str, payload: String) -> DomainResult<u64> {
            self.inner.store(name, payload).await
        }

        async fn compare_and_store(
            &self,
            name: &str,
            expected: u64,
            payload: String,
        ) -> DomainResult<u64> {
            let left = self.conflicts.load(Ordering::SeqCst);
            if left > 0 {
                self.conflicts.store(left - 1, Ordering::SeqCst);
                // Another writer appends behind our back.
                let existing = self.inner.load(name).await?;
                let mut others: Vec<Item> = existing
                    .map(|s| serde_json::from_str(&s.payload))
                    .transpose()?
                    .unwrap_or_default();
                others.push(item(&format!("other-{}", left), "concurrent"));
                self.inner
                    .store(name, serde_json::to_string(&others)?)
                    .await?;
                return Err(DomainError::StoreConflict(name.to_string()));
            }
            self.inner.compare_and_store(name, expected, payload).await
        }

        async fn remove(&self, name: &str) -> DomainResult<()> {
            self.inner.remove(name).await
        }
    }

    fn contended(conflicts: u32, max_attempts: u32) -> RecordStore {
        RecordStore::new(Arc::new(ContendedStore {
            inner: InMemoryCollectionStore::new(),
            conflicts: AtomicU32::new(conflicts),
        }))
        .with_retry(RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            backoff_multiplier: 1.0,
            max_delay: Duration::from_millis(1),
        })
    }

    #[tokio::test]
    async fn missing_collection_reads_as_empty() {
        let store = RecordStore::in_memory();
        let items: Vec<Item> = store.get_collection("plants").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_in_place_or_appends() {
        let store = RecordStore::in_memory();
        let outcome = store
            .upsert("plants", item("a", "first"), |i: &Item| i.id.clone())
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Inserted);
        store
            .upsert("plants", item("b", "second"), |i: &Item| i.id.clone())
            .await
            .unwrap();

        let outcome = store
            .upsert("plants", item("a", "edited"), |i: &Item| i.id.clone())
            .await
            .unwrap();
        assert_eq!(outcome, SaveOutcome::Replaced);

        let items: Vec<Item> = store.get_collection("plants").await.unwrap();
        assert_eq!(items, vec![item("a", "edited"), item("b", "second")]);
    }

    #[tokio::test]
    async fn delete_missing_key_is_a_no_op() {
        let store = RecordStore::in_memory();
        store
            .save_collection("plants", &[item("a", "x"), item("b", "y")])
            .await
            .unwrap();

        let removed = store
            .delete_by_key("plants", |i: &Item| i.id.clone(), "zzz".to_string())
            .await
            .unwrap();
        assert!(!removed);

        let removed = store
            .delete_by_key("plants", |i: &Item| i.id.clone(), "a".to_string())
            .await
            .unwrap();
        assert!(removed);

        let items: Vec<Item> = store.get_collection("plants").await.unwrap();
        assert_eq!(items, vec![item("b", "y")]);
    }

    #[tokio::test]
    async fn modify_writes_back_and_returns_the_closure_result() {
        let store = RecordStore::in_memory();
        store
            .save_collection("plants", &[item("a", "x"), item("b", "y")])
            .await
            .unwrap();

        let count = store
            .modify("plants", |items: &mut Vec<Item>| {
                items.retain(|i| i.id != "a");
                items.push(item("c", "z"));
                Ok(items.len())
            })
            .await
            .unwrap();
        assert_eq!(count, 2);

        let items: Vec<Item> = store.get_collection("plants").await.unwrap();
        assert_eq!(items, vec![item("b", "y"), item("c", "z")]);
    }

    #[tokio::test]
    async fn failed_closure_leaves_the_collection_alone() {
        let store = RecordStore::in_memory();
        store.save_collection("plants", &[item("a", "x")]).await.unwrap();

        let err = store
            .modify("plants", |items: &mut Vec<Item>| -> DomainResult<()> {
                items.clear();
                Err(DomainError::Forbidden("no".into()))
            })
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden("no".into()));

        let items: Vec<Item> = store.get_collection("plants").await.unwrap();
        assert_eq!(items, vec![item("a", "x")]);
    }

    #[tokio::test]
    async fn conflicting_write_is_reapplied_on_fresh_data() {
        let store = contended(2, 5);
        store
            .upsert("plants", item("mine", "kept"), |i: &Item| i.id.clone())
            .await
            .unwrap();

        let items: Vec<Item> = store.get_collection("plants").await.unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["other-2", "other-1", "mine"]);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let store = contended(10, 3);
        let err = store
            .modify("plants", |items: &mut Vec<Item>| {
                items.push(item("mine", "lost"));
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::StoreConflict("plants".into()));
    }

    #[tokio::test]
    async fn single_values_round_trip_and_clear() {
        let store = RecordStore::in_memory();
        assert_eq!(store.get_value::<Item>(keys::CURRENT_USER).await.unwrap(), None);

        store
            .set_value(keys::CURRENT_USER, &item("u1", "Sam"))
            .await
            .unwrap();
        assert_eq!(
            store.get_value::<Item>(keys::CURRENT_USER).await.unwrap(),
            Some(item("u1", "Sam"))
        );

        store.remove_value(keys::CURRENT_USER).await.unwrap();
        assert_eq!(store.get_value::<Item>(keys::CURRENT_USER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_payload_surfaces_as_storage_error() {
        let backend = Arc::new(InMemoryCollectionStore::new());
        backend.store("plants", "not json".into()).await.unwrap();
        let store = RecordStore::new(backend);

        let err = store.get_collection::<Item>("plants").await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
