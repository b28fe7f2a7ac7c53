//! In-memory local repository implementation.
//!
//! All data lives in process memory behind a single lock, which makes the
//! repository fast, deterministic and isolated. It backs the server as well as
//! unit and integration tests.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{DatasetId, EquipmentId};
use crate::db::repository::*;
use crate::models::{DatasetInfo, DatasetSummary, Equipment, EquipmentRecord, NewDataset};

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same storage.
///
/// # Example
/// ```
/// use equipment_analytics::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.dataset_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    datasets: HashMap<DatasetId, DatasetInfo>,
    /// Upload order, oldest first
    dataset_order: Vec<DatasetId>,
    rows: HashMap<DatasetId, Vec<Equipment>>,
    row_owner: HashMap<EquipmentId, DatasetId>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            datasets: HashMap::new(),
            dataset_order: Vec::new(),
            rows: HashMap::new(),
            row_owner: HashMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn dataset(&self, dataset_id: DatasetId, operation: &str) -> RepositoryResult<&DatasetInfo> {
        self.datasets.get(&dataset_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Dataset {} not found", dataset_id),
                ErrorContext::new(operation)
                    .with_entity("dataset")
                    .with_entity_id(dataset_id),
            )
        })
    }

    /// Oldest dataset whose rows still match an upload with `checksum`.
    fn find_by_checksum(&self, checksum: &str) -> Option<&DatasetInfo> {
        self.dataset_order
            .iter()
            .filter_map(|id| self.datasets.get(id))
            .find(|info| info.checksum.as_deref() == Some(checksum))
    }

    /// Rows of `dataset_id` diverged from the upload; stop matching its checksum.
    fn mark_modified(&mut self, dataset_id: DatasetId) {
        if let Some(info) = self.datasets.get_mut(&dataset_id) {
            info.checksum = None;
        }
    }

    fn locate(
        &self,
        equipment_id: EquipmentId,
        operation: &str,
    ) -> RepositoryResult<(DatasetId, usize)> {
        let not_found = || {
            RepositoryError::not_found_with_context(
                format!("Equipment {} not found", equipment_id),
                ErrorContext::new(operation)
                    .with_entity("equipment")
                    .with_entity_id(equipment_id),
            )
        };
        let dataset_id = *self.row_owner.get(&equipment_id).ok_or_else(not_found)?;
        let position = self
            .rows
            .get(&dataset_id)
            .and_then(|rows| rows.iter().position(|row| row.id == equipment_id))
            .ok_or_else(not_found)?;
        Ok((dataset_id, position))
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of datasets stored.
    pub fn dataset_count(&self) -> usize {
        self.data.read().datasets.len()
    }

    /// Get the number of equipment rows stored across all datasets.
    pub fn equipment_count(&self) -> usize {
        self.data.read().row_owner.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Repository is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatasetRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_dataset(
        &self,
        dataset: &NewDataset,
        summary: DatasetSummary,
    ) -> RepositoryResult<(DatasetInfo, bool)> {
        self.check_health("store_dataset")?;

        let mut data = self.data.write();
        if let Some(existing) = data.find_by_checksum(&dataset.checksum) {
            return Ok((existing.clone(), false));
        }

        let info = DatasetInfo {
            id: DatasetId::new(),
            filename: dataset.filename.clone(),
            uploaded_at: Utc::now(),
            checksum: Some(dataset.checksum.clone()),
            summary,
        };
        let rows: Vec<Equipment> = dataset
            .records
            .iter()
            .map(|record| Equipment {
                id: EquipmentId::new(),
                dataset_id: info.id,
                record: record.clone(),
            })
            .collect();

        for row in &rows {
            data.row_owner.insert(row.id, info.id);
        }
        data.rows.insert(info.id, rows);
        data.dataset_order.push(info.id);
        data.datasets.insert(info.id, info.clone());

        Ok((info, true))
    }

    async fn get_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<DatasetInfo> {
        self.check_health("get_dataset")?;
        let data = self.data.read();
        data.dataset(dataset_id, "get_dataset").cloned()
    }

    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>> {
        self.check_health("list_datasets")?;
        let data = self.data.read();
        Ok(data
            .dataset_order
            .iter()
            .rev()
            .filter_map(|id| data.datasets.get(id).cloned())
            .collect())
    }

    async fn update_dataset_summary(
        &self,
        dataset_id: DatasetId,
        summary: DatasetSummary,
    ) -> RepositoryResult<DatasetInfo> {
        self.check_health("update_dataset_summary")?;
        let mut data = self.data.write();
        data.dataset(dataset_id, "update_dataset_summary")?;
        let info = data.datasets.get_mut(&dataset_id).ok_or_else(|| {
            RepositoryError::internal("Dataset disappeared while holding the write lock")
        })?;
        info.summary = summary;
        Ok(info.clone())
    }
}

#[async_trait]
impl EquipmentRepository for LocalRepository {
    async fn list_equipment(
        &self,
        dataset_id: Option<DatasetId>,
    ) -> RepositoryResult<Vec<Equipment>> {
        self.check_health("list_equipment")?;
        let data = self.data.read();
        match dataset_id {
            Some(id) => {
                data.dataset(id, "list_equipment")?;
                Ok(data.rows.get(&id).cloned().unwrap_or_default())
            }
            None => Ok(data
                .dataset_order
                .iter()
                .filter_map(|id| data.rows.get(id))
                .flatten()
                .cloned()
                .collect()),
        }
    }

    async fn fetch_records(&self, dataset_id: DatasetId) -> RepositoryResult<Vec<EquipmentRecord>> {
        self.check_health("fetch_records")?;
        let data = self.data.read();
        data.dataset(dataset_id, "fetch_records")?;
        Ok(data
            .rows
            .get(&dataset_id)
            .map(|rows| rows.iter().map(|row| row.record.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_equipment(&self, equipment_id: EquipmentId) -> RepositoryResult<Equipment> {
        self.check_health("get_equipment")?;
        let data = self.data.read();
        let (dataset_id, position) = data.locate(equipment_id, "get_equipment")?;
        Ok(data.rows[&dataset_id][position].clone())
    }

    async fn update_equipment(
        &self,
        equipment_id: EquipmentId,
        record: EquipmentRecord,
    ) -> RepositoryResult<Equipment> {
        self.check_health("update_equipment")?;
        record
            .validate()
            .map_err(|e| RepositoryError::from(e).with_operation("update_equipment"))?;

        let mut data = self.data.write();
        let (dataset_id, position) = data.locate(equipment_id, "update_equipment")?;
        let rows = data.rows.get_mut(&dataset_id).ok_or_else(|| {
            RepositoryError::internal("Equipment rows disappeared while holding the write lock")
        })?;
        rows[position].record = record;
        let updated = rows[position].clone();
        data.mark_modified(dataset_id);
        Ok(updated)
    }

    async fn delete_equipment(&self, equipment_id: EquipmentId) -> RepositoryResult<Equipment> {
        self.check_health("delete_equipment")?;
        let mut data = self.data.write();
        let (dataset_id, position) = data.locate(equipment_id, "delete_equipment")?;
        data.row_owner.remove(&equipment_id);
        let rows = data.rows.get_mut(&dataset_id).ok_or_else(|| {
            RepositoryError::internal("Equipment rows disappeared while holding the write lock")
        })?;
        let deleted = rows.remove(position);
        data.mark_modified(dataset_id);
        Ok(deleted)
    }
}
