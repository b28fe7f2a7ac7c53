//! Public API surface for the Rust backend.
//!
//! This file consolidates the identifier types and re-exports the data types
//! served by the HTTP API. All types derive Serialize/Deserialize for JSON
//! serialization.

pub use crate::algorithms::analysis::{
    AnalyticsResult, BoxPlotStats, CorrelationMatrix, CorrelationRow, OutlierFlag,
    ParameterStats, ParameterStatsSet, PeerBenchmark, ScatterPoint,
};
pub use crate::models::{
    DatasetInfo, DatasetSummary, Equipment, EquipmentPatch, EquipmentRecord, Parameter,
};
pub use crate::services::analytics::{DatasetAnalytics, EquipmentWithFlags, OutlierEquipment};

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Dataset identifier (primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DatasetId(pub Uuid);

/// Equipment row identifier (primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EquipmentId(pub Uuid);

impl DatasetId {
    /// Generate a fresh random identifier.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        DatasetId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl EquipmentId {
    /// Generate a fresh random identifier.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        EquipmentId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for DatasetId {
    fn from(value: Uuid) -> Self {
        DatasetId(value)
    }
}

impl From<Uuid> for EquipmentId {
    fn from(value: Uuid) -> Self {
        EquipmentId(value)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(DatasetId::new(), DatasetId::new());
        assert_ne!(EquipmentId::new(), EquipmentId::new());
    }

    #[test]
    fn test_id_serializes_as_plain_uuid() {
        let uuid = Uuid::new_v4();
        let id = DatasetId::from(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
