//! Named-collection storage

mod memory;
mod record_store;
mod traits;

pub use memory::InMemoryCollectionStore;
pub use record_store::{keys, RecordStore};
pub use traits::{CollectionStore, StoredPayload};
