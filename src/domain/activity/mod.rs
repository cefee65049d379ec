//! Activity log aggregate

pub mod model;
pub mod repository;

pub use model::{actions, LogEntry, LogFilter, LogStats, NamedCount, NewLogEntry, MAX_LOG_ENTRIES};
pub use repository::LogRepositoryInterface;
