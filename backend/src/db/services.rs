//! High-level database service layer.
//!
//! Repository-agnostic operations that carry the business rules every storage
//! backend must honor: record validation before storage and keeping the
//! cached dataset summary in step with the dataset's rows.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, ingest, analytics)   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Upload validation                                    │
//! │  - Dataset summary refresh                              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - DatasetRepository / EquipmentRepository              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!                ┌────▼──────────────────┐
//!                │ Local Repository      │
//!                │ (in-memory)           │
//!                └───────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use equipment_analytics::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let datasets = services::list_datasets(&repo).await?;
//!     println!("Found {} datasets", datasets.len());
//!     Ok(())
//! }
//! ```

use log::{info, warn};

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::algorithms::analysis::SUMMARY_DECIMALS;
use crate::algorithms::statistics::{mean, round_to};
use crate::api::{DatasetId, EquipmentId};
use crate::models::{
    DatasetInfo, DatasetSummary, Equipment, EquipmentPatch, EquipmentRecord, NewDataset,
    Parameter,
};

// ==================== Health & Connection ====================

/// Check if the backing store is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Summary ====================

/// Summary cached on a dataset: row count and 2-decimal parameter means.
///
/// Means are `None` for an empty record set.
pub fn summarize(records: &[EquipmentRecord]) -> DatasetSummary {
    if records.is_empty() {
        return DatasetSummary::default();
    }
    let average = |parameter: Parameter| {
        let values: Vec<f64> = records.iter().map(|r| r.value(parameter)).collect();
        Some(round_to(mean(&values), SUMMARY_DECIMALS))
    };
    DatasetSummary {
        total_equipment: records.len(),
        avg_flowrate: average(Parameter::Flowrate),
        avg_pressure: average(Parameter::Pressure),
        avg_temperature: average(Parameter::Temperature),
    }
}

/// Recompute and store the summary of one dataset from its current rows.
pub async fn refresh_dataset_summary<R: FullRepository + ?Sized>(
    repo: &R,
    dataset_id: DatasetId,
) -> RepositoryResult<DatasetInfo> {
    let records = repo.fetch_records(dataset_id).await?;
    let summary = summarize(&records);
    info!(
        "Refreshed summary of dataset {}: {} equipment rows",
        dataset_id, summary.total_equipment
    );
    repo.update_dataset_summary(dataset_id, summary).await
}

// ==================== Dataset Operations ====================

/// Validate and store an uploaded dataset.
///
/// Every record is validated and the summary computed before the repository
/// is touched. The repository resolves identical content to the dataset that
/// still holds it, as long as that dataset was never edited.
///
/// # Returns
/// * `Ok((DatasetInfo, true))` - newly stored dataset
/// * `Ok((DatasetInfo, false))` - existing unmodified dataset with identical content
pub async fn store_dataset<R: FullRepository + ?Sized>(
    repo: &R,
    dataset: &NewDataset,
) -> RepositoryResult<(DatasetInfo, bool)> {
    for (index, record) in dataset.records.iter().enumerate() {
        record.validate().map_err(|e| {
            RepositoryError::from(e.at_index(index)).with_operation("store_dataset")
        })?;
    }

    let summary = summarize(&dataset.records);
    let (info, created) = repo.store_dataset(dataset, summary).await?;
    if created {
        info!(
            "Stored dataset {} ('{}') with {} equipment rows",
            info.id, info.filename, info.summary.total_equipment
        );
    } else {
        warn!(
            "Upload '{}' matches dataset {} (checksum {}), reusing it",
            dataset.filename, info.id, dataset.checksum
        );
    }
    Ok((info, created))
}

/// Get dataset metadata by ID.
pub async fn get_dataset<R: FullRepository + ?Sized>(
    repo: &R,
    dataset_id: DatasetId,
) -> RepositoryResult<DatasetInfo> {
    repo.get_dataset(dataset_id).await
}

/// List all datasets, newest first.
pub async fn list_datasets<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<DatasetInfo>> {
    repo.list_datasets().await
}

/// Records of one dataset in insertion order.
pub async fn fetch_records<R: FullRepository + ?Sized>(
    repo: &R,
    dataset_id: DatasetId,
) -> RepositoryResult<Vec<EquipmentRecord>> {
    repo.fetch_records(dataset_id).await
}

// ==================== Equipment Operations ====================

pub async fn list_equipment<R: FullRepository + ?Sized>(
    repo: &R,
    dataset_id: Option<DatasetId>,
) -> RepositoryResult<Vec<Equipment>> {
    repo.list_equipment(dataset_id).await
}

pub async fn get_equipment<R: FullRepository + ?Sized>(
    repo: &R,
    equipment_id: EquipmentId,
) -> RepositoryResult<Equipment> {
    repo.get_equipment(equipment_id).await
}

/// Apply a partial update to one equipment row and refresh its dataset summary.
pub async fn update_equipment<R: FullRepository + ?Sized>(
    repo: &R,
    equipment_id: EquipmentId,
    patch: &EquipmentPatch,
) -> RepositoryResult<Equipment> {
    let current = repo.get_equipment(equipment_id).await?;
    if patch.is_empty() {
        return Ok(current);
    }
    let record = patch
        .apply(&current.record)
        .map_err(|e| RepositoryError::from(e).with_operation("update_equipment"))?;
    let updated = repo.update_equipment(equipment_id, record).await?;
    refresh_dataset_summary(repo, updated.dataset_id).await?;
    Ok(updated)
}

/// Delete one equipment row and refresh its dataset summary.
pub async fn delete_equipment<R: FullRepository + ?Sized>(
    repo: &R,
    equipment_id: EquipmentId,
) -> RepositoryResult<Equipment> {
    let deleted = repo.delete_equipment(equipment_id).await?;
    refresh_dataset_summary(repo, deleted.dataset_id).await?;
    Ok(deleted)
}
