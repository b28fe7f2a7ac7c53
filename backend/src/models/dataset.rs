//! Persisted dataset and equipment entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::equipment::{EquipmentRecord, InvalidRecordError};
use crate::api::{DatasetId, EquipmentId};

/// Metadata and cached summary of one uploaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub id: DatasetId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    /// SHA-256 of the uploaded bytes, cleared by the first edit or delete
    /// since the rows no longer match the upload
    pub checksum: Option<String>,
    #[serde(flatten)]
    pub summary: DatasetSummary,
}

/// Aggregates refreshed whenever the dataset's rows change.
///
/// Averages are `None` once the dataset has no rows left.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_equipment: usize,
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
}

/// A dataset waiting to be stored.
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub filename: String,
    pub checksum: String,
    pub records: Vec<EquipmentRecord>,
}

/// One stored equipment row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub dataset_id: DatasetId,
    #[serde(flatten)]
    pub record: EquipmentRecord,
}

/// Partial update of an equipment row. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub flowrate: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
}

impl EquipmentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.equipment_type.is_none()
            && self.flowrate.is_none()
            && self.pressure.is_none()
            && self.temperature.is_none()
    }

    /// Apply the patch to a copy of `record`, validating the result.
    pub fn apply(&self, record: &EquipmentRecord) -> Result<EquipmentRecord, InvalidRecordError> {
        let updated = EquipmentRecord {
            name: self.name.clone().unwrap_or_else(|| record.name.clone()),
            equipment_type: self
                .equipment_type
                .clone()
                .unwrap_or_else(|| record.equipment_type.clone()),
            flowrate: self.flowrate.unwrap_or(record.flowrate),
            pressure: self.pressure.unwrap_or(record.pressure),
            temperature: self.temperature.unwrap_or(record.temperature),
        };
        updated.validate()?;
        Ok(updated)
    }
}
