//! # Plant Biography Service
//!
//! QR-code-linked plant biographies for a horticulture course: authoring,
//! a public gallery and display page, a seasonal calendar and an activity
//! log.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: records, static season data and repository traits
//! - **application**: identity, plant catalogue and activity use-cases
//! - **infrastructure**: collection storage (SeaORM or memory), JWT, QR
//!   rendering and the media host client
//! - **interfaces**: REST API with Swagger documentation and the upload proxy

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, UploadConfig};

// Re-export storage types for easy access
pub use infrastructure::{init_database, DatabaseConfig, RecordStore, SeaOrmCollectionStore};

// Re-export API routers
pub use interfaces::http::{create_api_router, create_upload_router, ApiDoc, AppState};
