//! Equipment analytics algorithms.
//!
//! This module provides the statistical building blocks and the analytics
//! engine that turns an equipment dataset into dashboard-ready figures.
//!
//! # Components
//!
//! - [`statistics`]: Mean, median, interpolated quantiles, Pearson correlation
//! - [`analysis`]: The [`AnalyticsEngine`] and its [`AnalyticsResult`]
//!
//! # Example
//!
//! ```
//! use equipment_analytics::algorithms::compute;
//! use equipment_analytics::models::EquipmentRecord;
//!
//! let records = vec![
//!     EquipmentRecord::new("P-1", "Pump", 10.0, 2.0, 80.0).unwrap(),
//!     EquipmentRecord::new("P-2", "Pump", 30.0, 4.0, 95.0).unwrap(),
//! ];
//! let result = compute(&records).unwrap();
//! assert_eq!(result.type_distribution["Pump"], 2);
//! assert_eq!(result.peer_benchmarks["Pump"].flowrate_max, 30.0);
//! ```

pub mod analysis;
pub mod statistics;

pub use analysis::{
    compute, AnalyticsEngine, AnalyticsResult, BoxPlotStats, CorrelationMatrix, CorrelationRow,
    OutlierFlag, OutlierPolicy, ParameterStats, ParameterStatsSet, PeerBenchmark, ScatterPoint,
};
