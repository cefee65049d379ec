use async_trait::async_trait;

use super::PlantBio;
use crate::domain::DomainResult;

/// Outcome of an upsert by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Replaced,
}

#[async_trait]
pub trait PlantRepositoryInterface: Send + Sync {
    async fn list_plants(&self) -> DomainResult<Vec<PlantBio>>;
    async fn get_plant(&self, id: &str) -> DomainResult<Option<PlantBio>>;
    /// Build the record for `id` from the one stored under it right now (if
    /// any) and write it in one versioned step: in place when the id exists,
    /// appended otherwise. `build` may run more than once.
    async fn save_plant<F>(&self, id: &str, build: F) -> DomainResult<(PlantBio, SaveOutcome)>
    where
        F: FnMut(Option<&PlantBio>) -> DomainResult<PlantBio> + Send;
    /// Remove the record with this id if `check` accepts the stored version.
    /// Returns the removed record. Missing ids are not an error.
    async fn delete_plant<F>(&self, id: &str, check: F) -> DomainResult<Option<PlantBio>>
    where
        F: FnMut(&PlantBio) -> DomainResult<()> + Send;
    /// Seed the collection only if nothing has been stored yet.
    async fn seed_if_empty(&self, plants: Vec<PlantBio>) -> DomainResult<bool>;
}
