use async_trait::async_trait;

use crate::domain::{DomainResult, PlantBio, PlantRepositoryInterface, SaveOutcome};
use crate::infrastructure::storage::{keys, RecordStore};

pub struct PlantRepository {
    store: RecordStore,
}

impl PlantRepository {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PlantRepositoryInterface for PlantRepository {
    async fn list_plants(&self) -> DomainResult<Vec<PlantBio>> {
        self.store.get_collection(keys::PLANTS).await
    }

    async fn get_plant(&self, id: &str) -> DomainResult<Option<PlantBio>> {
        let plants: Vec<PlantBio> = self.store.get_collection(keys::PLANTS).await?;
        Ok(plants.into_iter().find(|p| p.id == id))
    }

    async fn save_plant<F>(&self, id: &str, mut build: F) -> DomainResult<(PlantBio, SaveOutcome)>
    where
        F: FnMut(Option<&PlantBio>) -> DomainResult<PlantBio> + Send,
    {
        self.store
            .modify(keys::PLANTS, |plants: &mut Vec<PlantBio>| {
                match plants.iter().position(|p| p.id == id) {
                    Some(index) => {
                        let plant = build(Some(&plants[index]))?;
                        plants[index] = plant.clone();
                        Ok((plant, SaveOutcome::Replaced))
                    }
                    None => {
                        let plant = build(None)?;
                        plants.push(plant.clone());
                        Ok((plant, SaveOutcome::Inserted))
                    }
                }
            })
            .await
    }

    async fn delete_plant<F>(&self, id: &str, mut check: F) -> DomainResult<Option<PlantBio>>
    where
        F: FnMut(&PlantBio) -> DomainResult<()> + Send,
    {
        self.store
            .modify(keys::PLANTS, |plants: &mut Vec<PlantBio>| {
                let Some(index) = plants.iter().position(|p| p.id == id) else {
                    return Ok(None);
                };
                check(&plants[index])?;
                Ok(Some(plants.remove(index)))
            })
            .await
    }

    async fn seed_if_empty(&self, seed: Vec<PlantBio>) -> DomainResult<bool> {
        self.store
            .modify(keys::PLANTS, |plants: &mut Vec<PlantBio>| {
                if !plants.is_empty() {
                    return Ok(false);
                }
                plants.extend(seed.iter().cloned());
                Ok(true)
            })
            .await
    }
}
