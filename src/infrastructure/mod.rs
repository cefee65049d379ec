pub mod crypto;
pub mod database;
pub mod media;
pub mod qr;
pub mod repositories;
pub mod storage;

pub use database::{init_database, DatabaseConfig, SeaOrmCollectionStore};
pub use repositories::{LogRepository, PlantRepository, UserRepository};
pub use storage::{CollectionStore, InMemoryCollectionStore, RecordStore};
