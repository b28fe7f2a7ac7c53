//! Data Transfer Objects for the HTTP API.
//!
//! Analytics payloads are served as-is from the service layer; the types here
//! wrap lists and uploads.

use serde::{Deserialize, Serialize};

pub use crate::api::{
    DatasetAnalytics, DatasetInfo, Equipment, EquipmentPatch, EquipmentWithFlags,
};
use crate::api::DatasetId;

/// Response for health check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListResponse {
    pub datasets: Vec<DatasetInfo>,
    pub total: usize,
}

/// Response to a CSV upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub dataset: DatasetInfo,
    /// Rows skipped because a value was missing or not numeric
    pub dropped_rows: usize,
}

/// A dataset together with its flagged equipment rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDetailResponse {
    #[serde(flatten)]
    pub dataset: DatasetInfo,
    pub equipment: Vec<EquipmentWithFlags>,
}

/// Query parameters for listing equipment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EquipmentQuery {
    #[serde(default)]
    pub dataset_id: Option<DatasetId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentListResponse {
    pub equipment: Vec<Equipment>,
    pub total: usize,
}
