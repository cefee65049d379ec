pub mod service;

pub use service::{ActivityLogger, DEFAULT_LIST_LIMIT};
