use async_trait::async_trait;

use crate::domain::{DomainResult, LogEntry, LogRepositoryInterface};
use crate::infrastructure::storage::{keys, RecordStore};

pub struct LogRepository {
    store: RecordStore,
}

impl LogRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl LogRepositoryInterface for LogRepository {
    async fn list_logs(&self) -> DomainResult<Vec<LogEntry>> {
        self.store.get_collection(keys::LOGS).await
    }

    async fn prepend_log(&self, entry: LogEntry, cap: usize) -> DomainResult<()> {
        self.store
            .modify(keys::LOGS, |logs: &mut Vec<LogEntry>| {
                logs.insert(0, entry.clone());
                logs.truncate(cap);
                Ok(())
            })
            .await
    }
}
