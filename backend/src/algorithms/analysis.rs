//! Dataset-level analytics and outlier detection.
//!
//! [`AnalyticsEngine::compute`] turns an ordered sequence of equipment records
//! into one [`AnalyticsResult`]: per-parameter descriptive statistics, IQR
//! outlier flags for pressure and temperature, the type distribution, the
//! Pearson correlation matrix, per-type peer benchmarks and the scatter/bubble
//! projection consumed by the dashboard charts and the report.
//!
//! The computation is pure and deterministic: no shared state, no I/O, and the
//! same input always produces a bit-identical result. Empty and tiny inputs are
//! handled by explicit fallbacks (zeros, empty collections) rather than errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::statistics::{mean, median_sorted, pearson_correlation, quantile_sorted, round_to, sorted};
use crate::models::{EquipmentRecord, InvalidRecordError, Parameter};

/// Default multiplier applied to the IQR when building outlier fences.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Below this many values quartiles are considered unstable and nothing is flagged.
pub const DEFAULT_MIN_OUTLIER_SAMPLES: usize = 4;

/// Scatter bubble radius is `flowrate / SCATTER_RADIUS_DIVISOR` ...
pub const SCATTER_RADIUS_DIVISOR: f64 = 15.0;

/// ... but never smaller than this.
pub const MIN_SCATTER_RADIUS: f64 = 2.0;

/// Decimal places kept for correlation matrix entries.
pub const CORRELATION_DECIMALS: i32 = 2;

/// Decimal places kept for the scalar pressure/temperature correlation.
pub const PT_CORRELATION_DECIMALS: i32 = 3;

/// Decimal places kept for box-plot figures and peer averages.
pub const SUMMARY_DECIMALS: i32 = 2;

/// Parameters screened for outliers. Flowrate is never screened.
pub const SCREENED_PARAMETERS: [Parameter; 2] = [Parameter::Pressure, Parameter::Temperature];

// =============================================================================
// Result types
// =============================================================================

/// Descriptive statistics of one parameter. All zero for an empty dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl ParameterStats {
    /// Compute statistics over raw values.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let sorted = sorted(values);
        Self {
            mean: mean(values),
            median: median_sorted(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        }
    }
}

/// Statistics keyed by parameter name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterStatsSet {
    pub flowrate: ParameterStats,
    pub pressure: ParameterStats,
    pub temperature: ParameterStats,
}

impl ParameterStatsSet {
    pub fn get(&self, parameter: Parameter) -> &ParameterStats {
        match parameter {
            Parameter::Flowrate => &self.flowrate,
            Parameter::Pressure => &self.pressure,
            Parameter::Temperature => &self.temperature,
        }
    }
}

/// A record flagged on at least one screened parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierFlag {
    /// Position of the record in the input sequence
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub is_pressure_outlier: bool,
    pub is_temperature_outlier: bool,
}

/// One heatmap row of the correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRow {
    pub variable: Parameter,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Symmetric 3x3 Pearson matrix over [`Parameter::ALL`].
///
/// Serialized as a list of [`CorrelationRow`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationMatrix {
    values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    /// Identity matrix: every parameter perfectly correlated with itself, nothing else.
    pub fn identity() -> Self {
        let mut values = [[0.0; 3]; 3];
        for (i, row) in values.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { values }
    }

    pub fn get(&self, a: Parameter, b: Parameter) -> f64 {
        self.values[a.index()][b.index()]
    }

    fn set_pair(&mut self, a: Parameter, b: Parameter, value: f64) {
        self.values[a.index()][b.index()] = value;
        self.values[b.index()][a.index()] = value;
    }

    pub fn rows(&self) -> Vec<CorrelationRow> {
        Parameter::ALL
            .iter()
            .map(|&variable| CorrelationRow {
                variable,
                flowrate: self.get(variable, Parameter::Flowrate),
                pressure: self.get(variable, Parameter::Pressure),
                temperature: self.get(variable, Parameter::Temperature),
            })
            .collect()
    }
}

impl Default for CorrelationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TryFrom<Vec<CorrelationRow>> for CorrelationMatrix {
    type Error = String;

    fn try_from(rows: Vec<CorrelationRow>) -> Result<Self, Self::Error> {
        if rows.len() != Parameter::ALL.len() {
            return Err(format!(
                "correlation matrix needs {} rows, got {}",
                Parameter::ALL.len(),
                rows.len()
            ));
        }
        let mut values = [[0.0; 3]; 3];
        let mut seen = [false; 3];
        for row in rows {
            let i = row.variable.index();
            if seen[i] {
                return Err(format!("duplicate correlation row for {}", row.variable));
            }
            seen[i] = true;
            values[i] = [row.flowrate, row.pressure, row.temperature];
        }
        Ok(Self { values })
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CorrelationMatrix {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<CorrelationRow>::deserialize(deserializer)?;
        CorrelationMatrix::try_from(rows).map_err(serde::de::Error::custom)
    }
}

/// Observed flowrate range and averages within one equipment type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeerBenchmark {
    pub count: usize,
    pub flowrate_min: f64,
    pub flowrate_max: f64,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
}

/// Five-number summary for a box plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxPlotStats {
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let sorted = sorted(values);
        Self {
            min: round_to(sorted[0], SUMMARY_DECIMALS),
            q1: round_to(quantile_sorted(&sorted, 0.25), SUMMARY_DECIMALS),
            median: round_to(median_sorted(&sorted), SUMMARY_DECIMALS),
            q3: round_to(quantile_sorted(&sorted, 0.75), SUMMARY_DECIMALS),
            max: round_to(sorted[sorted.len() - 1], SUMMARY_DECIMALS),
        }
    }
}

/// Bubble chart point: pressure on x, temperature on y, flowrate as radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub name: String,
}

impl ScatterPoint {
    fn from_record(record: &EquipmentRecord) -> Self {
        Self {
            x: record.pressure,
            y: record.temperature,
            r: scatter_radius(record.flowrate),
            equipment_type: record.equipment_type.clone(),
            name: record.name.clone(),
        }
    }
}

/// Visual radius derived from a flowrate.
pub fn scatter_radius(flowrate: f64) -> f64 {
    (flowrate / SCATTER_RADIUS_DIVISOR).max(MIN_SCATTER_RADIUS)
}

/// Everything derived from one dataset's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub total_equipment: usize,
    pub parameter_stats: ParameterStatsSet,
    /// Flagged records ordered by input position
    pub outliers: Vec<OutlierFlag>,
    pub outliers_count: usize,
    pub type_distribution: BTreeMap<String, usize>,
    pub correlation_matrix: CorrelationMatrix,
    pub pt_correlation: f64,
    pub peer_benchmarks: BTreeMap<String, PeerBenchmark>,
    pub flowrate_distribution: BoxPlotStats,
    pub scatter_points: Vec<ScatterPoint>,
}

impl AnalyticsResult {
    /// The well-formed result for a dataset without records.
    pub fn empty() -> Self {
        Self {
            total_equipment: 0,
            parameter_stats: ParameterStatsSet::default(),
            outliers: Vec::new(),
            outliers_count: 0,
            type_distribution: BTreeMap::new(),
            correlation_matrix: CorrelationMatrix::identity(),
            pt_correlation: 0.0,
            peer_benchmarks: BTreeMap::new(),
            flowrate_distribution: BoxPlotStats::default(),
            scatter_points: Vec::new(),
        }
    }

    /// Outlier entry for the record at `index`, if it was flagged.
    pub fn outlier_at(&self, index: usize) -> Option<&OutlierFlag> {
        self.outliers
            .binary_search_by_key(&index, |flag| flag.index)
            .ok()
            .map(|pos| &self.outliers[pos])
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Tuning of the IQR outlier screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierPolicy {
    pub iqr_multiplier: f64,
    pub min_samples: usize,
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            min_samples: DEFAULT_MIN_OUTLIER_SAMPLES,
        }
    }
}

impl OutlierPolicy {
    /// Flag values outside `[Q1 - k*IQR, Q3 + k*IQR]`.
    ///
    /// Nothing is flagged when there are fewer than `min_samples` values or
    /// when the IQR is zero.
    pub fn flag(&self, values: &[f64]) -> Vec<bool> {
        let mut flags = vec![false; values.len()];
        if values.len() < self.min_samples.max(1) {
            return flags;
        }

        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        if iqr == 0.0 {
            return flags;
        }

        let lower = q1 - self.iqr_multiplier * iqr;
        let upper = q3 + self.iqr_multiplier * iqr;
        for (flag, value) in flags.iter_mut().zip(values) {
            *flag = *value < lower || *value > upper;
        }
        flags
    }
}

/// Stateless analytics engine parameterised by its outlier policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalyticsEngine {
    policy: OutlierPolicy,
}

impl AnalyticsEngine {
    pub fn new(policy: OutlierPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &OutlierPolicy {
        &self.policy
    }

    /// Compute the full analytics result for an ordered sequence of records.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordError`] for the first record with an empty name
    /// or a non-finite parameter, carrying its position in `records`.
    pub fn compute(&self, records: &[EquipmentRecord]) -> Result<AnalyticsResult, InvalidRecordError> {
        for (index, record) in records.iter().enumerate() {
            record.validate().map_err(|e| e.at_index(index))?;
        }

        if records.is_empty() {
            return Ok(AnalyticsResult::empty());
        }

        let columns = Columns::from_records(records);

        let parameter_stats = ParameterStatsSet {
            flowrate: ParameterStats::from_values(columns.get(Parameter::Flowrate)),
            pressure: ParameterStats::from_values(columns.get(Parameter::Pressure)),
            temperature: ParameterStats::from_values(columns.get(Parameter::Temperature)),
        };

        let outliers = self.detect_outliers(records, &columns);
        let correlation_matrix = correlation_matrix(&columns);
        let pt_correlation = round_to(
            pearson_correlation(columns.get(Parameter::Pressure), columns.get(Parameter::Temperature)),
            PT_CORRELATION_DECIMALS,
        );

        Ok(AnalyticsResult {
            total_equipment: records.len(),
            parameter_stats,
            outliers_count: outliers.len(),
            outliers,
            type_distribution: type_distribution(records),
            correlation_matrix,
            pt_correlation,
            peer_benchmarks: peer_benchmarks(records),
            flowrate_distribution: BoxPlotStats::from_values(columns.get(Parameter::Flowrate)),
            scatter_points: records.iter().map(ScatterPoint::from_record).collect(),
        })
    }

    fn detect_outliers(&self, records: &[EquipmentRecord], columns: &Columns) -> Vec<OutlierFlag> {
        let pressure = self.policy.flag(columns.get(SCREENED_PARAMETERS[0]));
        let temperature = self.policy.flag(columns.get(SCREENED_PARAMETERS[1]));

        records
            .iter()
            .enumerate()
            .filter(|(i, _)| pressure[*i] || temperature[*i])
            .map(|(i, record)| OutlierFlag {
                index: i,
                name: record.name.clone(),
                equipment_type: record.equipment_type.clone(),
                is_pressure_outlier: pressure[i],
                is_temperature_outlier: temperature[i],
            })
            .collect()
    }
}

/// Compute analytics with the default outlier policy.
pub fn compute(records: &[EquipmentRecord]) -> Result<AnalyticsResult, InvalidRecordError> {
    AnalyticsEngine::default().compute(records)
}

/// Column-major copy of the numeric fields, indexed like [`Parameter::ALL`].
struct Columns {
    values: [Vec<f64>; 3],
}

impl Columns {
    fn from_records(records: &[EquipmentRecord]) -> Self {
        let column = |p: Parameter| records.iter().map(|r| r.value(p)).collect::<Vec<_>>();
        Self {
            values: [
                column(Parameter::Flowrate),
                column(Parameter::Pressure),
                column(Parameter::Temperature),
            ],
        }
    }

    fn get(&self, parameter: Parameter) -> &[f64] {
        &self.values[parameter.index()]
    }
}

fn correlation_matrix(columns: &Columns) -> CorrelationMatrix {
    let mut matrix = CorrelationMatrix::identity();
    for (i, &a) in Parameter::ALL.iter().enumerate() {
        for &b in &Parameter::ALL[i + 1..] {
            let r = pearson_correlation(columns.get(a), columns.get(b));
            matrix.set_pair(a, b, round_to(r, CORRELATION_DECIMALS));
        }
    }
    matrix
}

fn type_distribution(records: &[EquipmentRecord]) -> BTreeMap<String, usize> {
    let mut distribution = BTreeMap::new();
    for record in records {
        *distribution.entry(record.equipment_type.clone()).or_insert(0) += 1;
    }
    distribution
}

#[derive(Default)]
struct PeerAccumulator {
    flowrate_min: f64,
    flowrate_max: f64,
    flowrates: Vec<f64>,
    pressures: Vec<f64>,
    temperatures: Vec<f64>,
}

impl PeerAccumulator {
    fn push(&mut self, record: &EquipmentRecord) {
        if self.flowrates.is_empty() {
            self.flowrate_min = record.flowrate;
            self.flowrate_max = record.flowrate;
        } else {
            self.flowrate_min = self.flowrate_min.min(record.flowrate);
            self.flowrate_max = self.flowrate_max.max(record.flowrate);
        }
        self.flowrates.push(record.flowrate);
        self.pressures.push(record.pressure);
        self.temperatures.push(record.temperature);
    }

    fn finish(self) -> PeerBenchmark {
        PeerBenchmark {
            count: self.flowrates.len(),
            flowrate_min: self.flowrate_min,
            flowrate_max: self.flowrate_max,
            avg_flowrate: round_to(mean(&self.flowrates), SUMMARY_DECIMALS),
            avg_pressure: round_to(mean(&self.pressures), SUMMARY_DECIMALS),
            avg_temperature: round_to(mean(&self.temperatures), SUMMARY_DECIMALS),
        }
    }
}

fn peer_benchmarks(records: &[EquipmentRecord]) -> BTreeMap<String, PeerBenchmark> {
    let mut groups: BTreeMap<&str, PeerAccumulator> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.equipment_type.as_str())
            .or_default()
            .push(record);
    }
    groups
        .into_iter()
        .map(|(ty, acc)| (ty.to_string(), acc.finish()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordField;

    fn record(name: &str, ty: &str, flowrate: f64, pressure: f64, temperature: f64) -> EquipmentRecord {
        EquipmentRecord {
            name: name.to_string(),
            equipment_type: ty.to_string(),
            flowrate,
            pressure,
            temperature,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        let result = compute(&[]).unwrap();
        assert_eq!(result, AnalyticsResult::empty());
        assert_eq!(result.parameter_stats.pressure, ParameterStats::default());
        assert!(result.outliers.is_empty());
        assert!(result.type_distribution.is_empty());
        assert!(result.peer_benchmarks.is_empty());
        assert!(result.scatter_points.is_empty());
        for p in Parameter::ALL {
            assert_eq!(result.correlation_matrix.get(p, p), 1.0);
        }
    }

    #[test]
    fn test_parameter_stats() {
        let records = vec![
            record("a", "Pump", 10.0, 1.0, 100.0),
            record("b", "Pump", 30.0, 3.0, 300.0),
            record("c", "Valve", 20.0, 2.0, 200.0),
            record("d", "Valve", 40.0, 4.0, 400.0),
        ];
        let result = compute(&records).unwrap();
        let flow = result.parameter_stats.get(Parameter::Flowrate);
        assert_eq!(flow.mean, 25.0);
        assert_eq!(flow.median, 25.0);
        assert_eq!(flow.min, 10.0);
        assert_eq!(flow.max, 40.0);
        assert_eq!(result.parameter_stats.temperature.median, 250.0);
        assert_eq!(result.total_equipment, 4);
    }

    #[test]
    fn test_outlier_policy_flags_extreme_value() {
        let policy = OutlierPolicy::default();
        let flags = policy.flag(&[10.0, 11.0, 12.0, 13.0, 100.0]);
        assert_eq!(flags, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_outlier_policy_low_side() {
        let flags = OutlierPolicy::default().flag(&[-50.0, 10.0, 11.0, 12.0, 13.0]);
        assert_eq!(flags, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_outlier_policy_small_and_constant() {
        let policy = OutlierPolicy::default();
        assert_eq!(policy.flag(&[5.0, 5.0, 100.0]), vec![false; 3]);
        assert_eq!(policy.flag(&[7.0; 5]), vec![false; 5]);
        assert!(policy.flag(&[]).is_empty());
    }

    #[test]
    fn test_outliers_carry_both_flags() {
        let records = vec![
            record("a", "Pump", 1.0, 10.0, 100.0),
            record("b", "Pump", 1.0, 11.0, 101.0),
            record("c", "Pump", 1.0, 12.0, 102.0),
            record("d", "Pump", 1.0, 13.0, 103.0),
            record("a2", "Pump", 1.0, 10.0, 100.0),
            record("b2", "Pump", 1.0, 11.0, 101.0),
            record("c2", "Pump", 1.0, 12.0, 102.0),
            record("d2", "Pump", 1.0, 13.0, 103.0),
            record("e", "Pump", 1.0, 500.0, 100.0),
            record("f", "Pump", 1.0, 12.0, 900.0),
            record("g", "Pump", 1.0, 999.0, -900.0),
        ];
        let result = compute(&records).unwrap();
        let indices: Vec<usize> = result.outliers.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![8, 9, 10]);
        assert!(result.outliers[0].is_pressure_outlier);
        assert!(!result.outliers[0].is_temperature_outlier);
        assert!(!result.outliers[1].is_pressure_outlier);
        assert!(result.outliers[1].is_temperature_outlier);
        assert!(result.outliers[2].is_pressure_outlier && result.outliers[2].is_temperature_outlier);
        assert_eq!(result.outliers_count, 3);
        assert_eq!(result.outlier_at(9).map(|o| o.name.as_str()), Some("f"));
        assert!(result.outlier_at(0).is_none());
    }

    #[test]
    fn test_correlation_matrix_symmetric_and_rounded() {
        let records = vec![
            record("a", "Pump", 1.0, 2.0, 9.0),
            record("b", "Pump", 2.0, 4.1, 7.0),
            record("c", "Pump", 3.0, 5.9, 8.0),
            record("d", "Pump", 4.0, 8.2, 1.0),
        ];
        let result = compute(&records).unwrap();
        let m = result.correlation_matrix;
        for a in Parameter::ALL {
            assert_eq!(m.get(a, a), 1.0);
            for b in Parameter::ALL {
                assert_eq!(m.get(a, b), m.get(b, a));
                assert_eq!(m.get(a, b), round_to(m.get(a, b), CORRELATION_DECIMALS));
            }
        }
        assert!(m.get(Parameter::Flowrate, Parameter::Pressure) > 0.99);
    }

    #[test]
    fn test_zero_variance_correlation_is_zero() {
        let records = vec![
            record("a", "Pump", 5.0, 1.0, 3.0),
            record("b", "Pump", 5.0, 2.0, 1.0),
            record("c", "Pump", 5.0, 3.0, 2.0),
        ];
        let m = compute(&records).unwrap().correlation_matrix;
        assert_eq!(m.get(Parameter::Flowrate, Parameter::Flowrate), 1.0);
        assert_eq!(m.get(Parameter::Flowrate, Parameter::Pressure), 0.0);
        assert_eq!(m.get(Parameter::Temperature, Parameter::Flowrate), 0.0);
    }

    #[test]
    fn test_correlation_matrix_serializes_as_rows() {
        let m = compute(&[record("a", "Pump", 1.0, 2.0, 3.0)]).unwrap().correlation_matrix;
        let json = serde_json::to_value(m).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["variable"], "flowrate");
        assert_eq!(rows[1]["pressure"], 1.0);
        let back: CorrelationMatrix = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_correlation_matrix_rejects_bad_rows() {
        let row = CorrelationRow {
            variable: Parameter::Flowrate,
            flowrate: 1.0,
            pressure: 0.0,
            temperature: 0.0,
        };
        assert!(CorrelationMatrix::try_from(vec![row]).is_err());
        assert!(CorrelationMatrix::try_from(vec![row, row, row]).is_err());
    }

    #[test]
    fn test_type_distribution_is_case_sensitive() {
        let records = vec![
            record("a", "Pump", 1.0, 1.0, 1.0),
            record("b", "pump", 1.0, 1.0, 1.0),
            record("c", "Pump", 1.0, 1.0, 1.0),
            record("d", " Pump", 1.0, 1.0, 1.0),
        ];
        let dist = compute(&records).unwrap().type_distribution;
        assert_eq!(dist.len(), 3);
        assert_eq!(dist["Pump"], 2);
        assert_eq!(dist["pump"], 1);
        assert_eq!(dist[" Pump"], 1);
    }

    #[test]
    fn test_peer_benchmarks_single_record_type() {
        let records = vec![
            record("a", "Tank", 42.0, 1.0, 20.0),
            record("b", "Pump", 10.0, 3.0, 40.0),
            record("c", "Pump", 30.0, 5.0, 60.0),
        ];
        let peers = compute(&records).unwrap().peer_benchmarks;
        assert_eq!(peers["Tank"].flowrate_min, 42.0);
        assert_eq!(peers["Tank"].flowrate_max, 42.0);
        assert_eq!(peers["Tank"].count, 1);
        assert_eq!(peers["Pump"].avg_pressure, 4.0);
        assert_eq!(peers["Pump"].avg_temperature, 50.0);
    }

    #[test]
    fn test_scatter_points_preserve_order() {
        let records = vec![
            record("z", "Pump", 300.0, 1.5, 90.0),
            record("a", "Valve", 3.0, 2.5, 80.0),
        ];
        let points = compute(&records).unwrap().scatter_points;
        assert_eq!(points[0].name, "z");
        assert_eq!(points[0].x, 1.5);
        assert_eq!(points[0].y, 90.0);
        assert_eq!(points[0].r, 20.0);
        assert_eq!(points[1].name, "a");
        assert_eq!(points[1].r, MIN_SCATTER_RADIUS);
        assert_eq!(points[1].equipment_type, "Valve");
    }

    #[test]
    fn test_flowrate_distribution() {
        let records: Vec<_> = [10.0, 20.0, 30.0, 1000.0]
            .iter()
            .map(|&f| record("x", "Pump", f, 1.0, 1.0))
            .collect();
        let dist = compute(&records).unwrap().flowrate_distribution;
        assert_eq!(dist.min, 10.0);
        assert_eq!(dist.q1, 17.5);
        assert_eq!(dist.median, 25.0);
        assert_eq!(dist.q3, 272.5);
        assert_eq!(dist.max, 1000.0);
    }

    #[test]
    fn test_invalid_record_rejected_with_index() {
        let records = vec![
            record("a", "Pump", 1.0, 1.0, 1.0),
            record("b", "Pump", f64::NAN, 1.0, 1.0),
        ];
        let err = compute(&records).unwrap_err();
        assert_eq!(err.index, Some(1));
        assert_eq!(err.field, RecordField::Parameter(Parameter::Flowrate));
    }

    #[test]
    fn test_huge_finite_values_stay_finite() {
        let records = vec![
            record("a", "Pump", 1e308, 1e308, 1.0),
            record("b", "Pump", 1e308, -1e308, 2.0),
            record("c", "Pump", 1.7e308, 1e200, 3.0),
        ];
        let result = compute(&records).unwrap();
        for p in Parameter::ALL {
            assert!(result.parameter_stats.get(p).mean.is_finite());
            for q in Parameter::ALL {
                let r = result.correlation_matrix.get(p, q);
                assert!((-1.0..=1.0).contains(&r), "{} / {} = {}", p, q, r);
            }
        }
        assert!(result.pt_correlation.is_finite());
        let pump = &result.peer_benchmarks["Pump"];
        assert!(pump.avg_flowrate.is_finite());
        assert!(pump.avg_pressure.is_finite());
        assert_eq!(pump.avg_temperature, 2.0);
        assert!(result.flowrate_distribution.q1.is_finite());

        let json = serde_json::to_string(&result.correlation_matrix).unwrap();
        assert!(!json.contains("null"));
        assert!(serde_json::from_str::<CorrelationMatrix>(&json).is_ok());
    }

    #[test]
    fn test_custom_policy_multiplier() {
        let values = [10.0, 11.0, 12.0, 13.0, 16.0];
        let strict = OutlierPolicy {
            iqr_multiplier: 0.5,
            min_samples: 4,
        };
        assert!(strict.flag(&values)[4]);
        assert!(!OutlierPolicy::default().flag(&values)[4]);
    }

    #[test]
    fn test_pt_correlation_rounded() {
        let records = vec![
            record("a", "Pump", 1.0, 1.0, 2.0),
            record("b", "Pump", 1.0, 2.0, 1.0),
            record("c", "Pump", 1.0, 3.0, 4.0),
        ];
        let result = compute(&records).unwrap();
        assert_eq!(result.pt_correlation, round_to(result.pt_correlation, 3));
        assert!((result.pt_correlation - 0.655).abs() < 1e-9);
    }
}
