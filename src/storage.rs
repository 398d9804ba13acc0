use std::future::Future;

use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::{entities::storage_slot, error::StorageError};

/// Named slots holding one serialized value each.
pub trait SlotStorage: Send + Sync {
    fn read(&self, slot: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn write(&self, slot: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Slots kept as rows of the `storage_slot` table.
#[derive(Clone, Debug)]
pub struct DbSlots {
    db: DatabaseConnection,
}

impl DbSlots {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl SlotStorage for DbSlots {
    async fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let row = storage_slot::Entity::find_by_id(slot.to_string())
            .one(&self.db)
            .await
            .map_err(|e| StorageError::Read { slot: slot.to_string(), source: Box::new(e) })?;
        Ok(row.map(|r| r.value))
    }

    async fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        let model = storage_slot::ActiveModel {
            name: Set(slot.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(jiff::Timestamp::now().as_second()),
        };

        storage_slot::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(storage_slot::Column::Name)
                    .update_columns([storage_slot::Column::Value, storage_slot::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| StorageError::Write { slot: slot.to_string(), source: Box::new(e) })?;

        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemorySlots;
