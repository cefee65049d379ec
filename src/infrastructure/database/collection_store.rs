//! SeaORM-backed collection store

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

use super::entities::collection;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::storage::{CollectionStore, StoredPayload};

/// Database storage implementation
pub struct SeaOrmCollectionStore {
    db: DatabaseConnection,
}

impl SeaOrmCollectionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CollectionStore for SeaOrmCollectionStore {
    async fn load(&self, name: &str) -> DomainResult<Option<StoredPayload>> {
        let row = collection::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|m| StoredPayload {
            payload: m.payload,
            version: m.version as u64,
        }))
    }

    async fn store(&self, name: &str, payload: String) -> DomainResult<u64> {
        let model = collection::ActiveModel {
            name: Set(name.to_string()),
            payload: Set(payload),
            version: Set(1),
            updated_at: Set(Utc::now()),
        };
        collection::Entity::insert(model)
            .on_conflict(
                OnConflict::column(collection::Column::Name)
                    .update_columns([collection::Column::Payload, collection::Column::UpdatedAt])
                    .value(
                        collection::Column::Version,
                        Expr::col(collection::Column::Version).add(1),
                    )
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;

        let version = self.load(name).await?.map_or(1, |s| s.version);
        debug!(collection = name, version, "Collection stored");
        Ok(version)
    }

    async fn compare_and_store(
        &self,
        name: &str,
        expected: u64,
        payload: String,
    ) -> DomainResult<u64> {
        let now = Utc::now();

        let affected = if expected == 0 {
            let model = collection::ActiveModel {
                name: Set(name.to_string()),
                payload: Set(payload),
                version: Set(1),
                updated_at: Set(now),
            };
            collection::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(collection::Column::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?
        } else {
            collection::Entity::update_many()
                .col_expr(collection::Column::Payload, Expr::value(payload))
                .col_expr(collection::Column::Version, Expr::value(expected as i64 + 1))
                .col_expr(collection::Column::UpdatedAt, Expr::value(now))
                .filter(collection::Column::Name.eq(name))
                .filter(collection::Column::Version.eq(expected as i64))
                .exec(&self.db)
                .await?
                .rows_affected
        };

        if affected == 0 {
            return Err(DomainError::StoreConflict(name.to_string()));
        }
        Ok(expected + 1)
    }

    async fn remove(&self, name: &str) -> DomainResult<()> {
        collection::Entity::delete_by_id(name.to_string())
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
