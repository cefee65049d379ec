//! Activity logging and aggregation

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{
    DomainResult, LogEntry, LogFilter, LogRepositoryInterface, LogStats, NewLogEntry,
    MAX_LOG_ENTRIES,
};

/// Number of entries the log browser shows by default.
pub const DEFAULT_LIST_LIMIT: usize = 100;

pub struct ActivityLogger<L: LogRepositoryInterface> {
    repo: Arc<L>,
}

impl<L: LogRepositoryInterface> ActivityLogger<L> {
    pub fn new(repo: Arc<L>) -> Self {
        Self { repo }
    }

    /// Stamp the event with an id and the current time, prepend it and cap the log.
    pub async fn record(&self, event: NewLogEntry) -> DomainResult<LogEntry> {
        let now = Utc::now();
        let entry = LogEntry {
            id: format!("log-{}-{}", now.timestamp_millis(), uuid::Uuid::new_v4().simple()),
            user_id: event.user_id,
            user_name: event.user_name,
            action: event.action,
            page: event.page,
            plant_id: event.plant_id,
            plant_name: event.plant_name,
            timestamp: now,
            ip_address: event.ip_address,
        };

        self.repo.prepend_log(entry.clone(), MAX_LOG_ENTRIES).await?;
        debug!(action = %entry.action, page = %entry.page, user_id = ?entry.user_id, "Activity recorded");
        Ok(entry)
    }

    /// Record, but never fail the caller's operation because of it.
    pub async fn record_quietly(&self, event: NewLogEntry) {
        let action = event.action.clone();
        if let Err(e) = self.record(event).await {
            warn!(%action, error = %e, "Failed to record activity");
        }
    }

    pub async fn aggregate(&self) -> DomainResult<LogStats> {
        let entries = self.repo.list_logs().await?;
        Ok(LogStats::from_entries(&entries))
    }

    /// Newest-first entries matching `filter`, at most `limit` of them.
    pub async fn list(&self, filter: LogFilter, limit: usize) -> DomainResult<Vec<LogEntry>> {
        let entries = self.repo.list_logs().await?;
        Ok(entries
            .into_iter()
            .filter(|e| filter.matches(e))
            .take(limit)
            .collect())
    }
}
