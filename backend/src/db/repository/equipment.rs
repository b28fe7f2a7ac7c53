//! Equipment row repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{DatasetId, EquipmentId};
use crate::models::{Equipment, EquipmentRecord};

/// Repository trait for the equipment rows belonging to datasets.
#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    /// List equipment rows in insertion order.
    ///
    /// With `dataset_id` set only that dataset's rows are returned and an
    /// unknown dataset is a `NotFound` error. Without it, rows of every
    /// dataset are returned, grouped by dataset in upload order.
    async fn list_equipment(&self, dataset_id: Option<DatasetId>)
        -> RepositoryResult<Vec<Equipment>>;

    /// Plain records of one dataset, in insertion order.
    async fn fetch_records(&self, dataset_id: DatasetId) -> RepositoryResult<Vec<EquipmentRecord>>;

    /// Retrieve one equipment row.
    async fn get_equipment(&self, equipment_id: EquipmentId) -> RepositoryResult<Equipment>;

    /// Replace the record of an existing row. The row keeps its position.
    async fn update_equipment(
        &self,
        equipment_id: EquipmentId,
        record: EquipmentRecord,
    ) -> RepositoryResult<Equipment>;

    /// Delete one row and return it.
    async fn delete_equipment(&self, equipment_id: EquipmentId) -> RepositoryResult<Equipment>;
}
