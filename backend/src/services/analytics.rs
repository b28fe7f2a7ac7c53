//! Dataset-level analytics built on the pure [`AnalyticsEngine`].
//!
//! Records are loaded in insertion order, so the outlier indices reported by
//! the engine map one-to-one onto the dataset's equipment rows.

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::error::ServiceResult;
use crate::algorithms::{AnalyticsEngine, AnalyticsResult};
use crate::api::{DatasetId, EquipmentId};
use crate::db::repository::FullRepository;
use crate::models::{DatasetInfo, Equipment, EquipmentRecord};

/// Analytics of one stored dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetAnalytics {
    pub dataset: DatasetInfo,
    pub analytics: AnalyticsResult,
    /// Outliers resolved to the stored equipment rows
    pub outlier_equipment: Vec<OutlierEquipment>,
}

/// An outlier flag attached to the equipment row it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierEquipment {
    pub equipment_id: EquipmentId,
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub is_pressure_outlier: bool,
    pub is_temperature_outlier: bool,
}

/// Equipment row annotated with the outlier flags of its dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentWithFlags {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub is_pressure_outlier: bool,
    pub is_temperature_outlier: bool,
    pub is_outlier: bool,
}

pub(crate) async fn run_engine(
    engine: AnalyticsEngine,
    rows: &[Equipment],
) -> ServiceResult<AnalyticsResult> {
    let records: Vec<EquipmentRecord> = rows.iter().map(|row| row.record.clone()).collect();
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || engine.compute(&records)).await??;
    debug!(
        "Computed analytics for {} records in {:?}",
        result.total_equipment,
        started.elapsed()
    );
    Ok(result)
}

/// Compute the full analytics payload of one dataset.
///
/// An empty dataset yields [`AnalyticsResult::empty`], not an error.
pub async fn get_dataset_analytics<R: FullRepository + ?Sized>(
    repo: &R,
    engine: &AnalyticsEngine,
    dataset_id: DatasetId,
) -> ServiceResult<DatasetAnalytics> {
    let dataset = repo.get_dataset(dataset_id).await?;
    let rows = repo.list_equipment(Some(dataset_id)).await?;
    let analytics = run_engine(*engine, &rows).await?;

    let outlier_equipment = analytics
        .outliers
        .iter()
        .filter_map(|flag| {
            rows.get(flag.index).map(|row| OutlierEquipment {
                equipment_id: row.id,
                index: flag.index,
                name: flag.name.clone(),
                equipment_type: flag.equipment_type.clone(),
                is_pressure_outlier: flag.is_pressure_outlier,
                is_temperature_outlier: flag.is_temperature_outlier,
            })
        })
        .collect();

    Ok(DatasetAnalytics {
        dataset,
        analytics,
        outlier_equipment,
    })
}

/// Equipment rows of one dataset with their outlier flags.
///
/// Flags are derived on every call and never stored.
pub async fn list_equipment_with_flags<R: FullRepository + ?Sized>(
    repo: &R,
    engine: &AnalyticsEngine,
    dataset_id: DatasetId,
) -> ServiceResult<Vec<EquipmentWithFlags>> {
    let rows = repo.list_equipment(Some(dataset_id)).await?;
    let analytics = run_engine(*engine, &rows).await?;
    Ok(flag_rows(rows, &analytics))
}

/// Attach the flags of `analytics` to the rows it was computed from.
pub(crate) fn flag_rows(rows: Vec<Equipment>, analytics: &AnalyticsResult) -> Vec<EquipmentWithFlags> {
    rows.into_iter()
        .enumerate()
        .map(|(index, equipment)| {
            let (pressure, temperature) = analytics
                .outlier_at(index)
                .map(|flag| (flag.is_pressure_outlier, flag.is_temperature_outlier))
                .unwrap_or((false, false));
            EquipmentWithFlags {
                equipment,
                is_pressure_outlier: pressure,
                is_temperature_outlier: temperature,
                is_outlier: pressure || temperature,
            }
        })
        .collect()
}
