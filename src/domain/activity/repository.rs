use async_trait::async_trait;

use super::LogEntry;
use crate::domain::DomainResult;

#[async_trait]
pub trait LogRepositoryInterface: Send + Sync {
    /// All retained entries, newest first.
    async fn list_logs(&self) -> DomainResult<Vec<LogEntry>>;
    /// Prepend `entry` and keep at most `cap` entries.
    async fn prepend_log(&self, entry: LogEntry, cap: usize) -> DomainResult<()>;
}
