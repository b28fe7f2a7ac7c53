//! Dataset repository trait.
//!
//! Covers the dataset lifecycle: storing an upload together with its rows,
//! listing and fetching dataset metadata, and refreshing the cached summary.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::DatasetId;
use crate::models::{DatasetInfo, DatasetSummary, NewDataset};

/// Repository trait for dataset storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if it is unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a dataset and all its equipment rows, unless an unmodified
    /// dataset with the same checksum already exists.
    ///
    /// Rows keep the order of `dataset.records`. The caller supplies the
    /// summary computed from those records. The checksum lookup and the
    /// insert must be atomic so concurrent identical uploads store one dataset.
    ///
    /// # Returns
    /// * `Ok((DatasetInfo, true))` - newly stored dataset
    /// * `Ok((DatasetInfo, false))` - existing dataset with identical content
    async fn store_dataset(
        &self,
        dataset: &NewDataset,
        summary: DatasetSummary,
    ) -> RepositoryResult<(DatasetInfo, bool)>;

    /// Retrieve dataset metadata by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the dataset doesn't exist
    async fn get_dataset(&self, dataset_id: DatasetId) -> RepositoryResult<DatasetInfo>;

    /// List all datasets, newest upload first.
    async fn list_datasets(&self) -> RepositoryResult<Vec<DatasetInfo>>;

    /// Replace the cached summary of a dataset.
    async fn update_dataset_summary(
        &self,
        dataset_id: DatasetId,
        summary: DatasetSummary,
    ) -> RepositoryResult<DatasetInfo>;
}
