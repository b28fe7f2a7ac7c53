//! Dataset reports.
//!
//! [`ReportRenderer`] is the presentation seam: it consumes a dataset with its
//! analytics and produces bytes plus the metadata needed to serve them as a
//! download. [`TextReportRenderer`] is the built-in plain-text format.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use super::analytics::{flag_rows, run_engine, EquipmentWithFlags};
use super::error::ServiceResult;
use crate::algorithms::{AnalyticsEngine, AnalyticsResult};
use crate::api::DatasetId;
use crate::db::repository::FullRepository;
use crate::models::{DatasetInfo, Parameter};

/// Outlier rows listed before the report switches to a count.
pub const MAX_OUTLIER_ROWS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Everything a renderer needs for one report.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub dataset: &'a DatasetInfo,
    pub analytics: &'a AnalyticsResult,
    pub equipment: &'a [EquipmentWithFlags],
    pub generated_at: DateTime<Utc>,
}

pub trait ReportRenderer: Send + Sync {
    /// MIME type of the rendered bytes.
    fn content_type(&self) -> &'static str;

    /// File extension without the leading dot.
    fn file_extension(&self) -> &'static str;

    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError>;
}

/// A rendered report ready to be served.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Download name: `report_<upload name without .csv>.<ext>`.
pub fn report_filename(dataset: &DatasetInfo, extension: &str) -> String {
    let name = dataset.filename.as_str();
    let stem = name
        .len()
        .checked_sub(4)
        .filter(|&cut| cut > 0)
        .and_then(|cut| Some((name.get(..cut)?, name.get(cut..)?)))
        .filter(|(_, ext)| ext.eq_ignore_ascii_case(".csv"))
        .map_or(name, |(stem, _)| stem);
    format!("report_{}.{}", stem, extension)
}

/// Load a dataset, compute its analytics and render a report.
pub async fn build_report<R: FullRepository + ?Sized>(
    repo: &R,
    engine: &AnalyticsEngine,
    renderer: &dyn ReportRenderer,
    dataset_id: DatasetId,
) -> ServiceResult<RenderedReport> {
    let dataset = repo.get_dataset(dataset_id).await?;
    let rows = repo.list_equipment(Some(dataset_id)).await?;
    let analytics = run_engine(*engine, &rows).await?;
    let equipment = flag_rows(rows, &analytics);

    let input = ReportInput {
        dataset: &dataset,
        analytics: &analytics,
        equipment: &equipment,
        generated_at: Utc::now(),
    };
    let bytes = renderer.render(&input)?;

    Ok(RenderedReport {
        filename: report_filename(&dataset, renderer.file_extension()),
        content_type: renderer.content_type(),
        bytes,
    })
}

/// Plain-text report with fixed-width tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReportRenderer;

impl TextReportRenderer {
    fn write_report(&self, out: &mut String, input: &ReportInput<'_>) -> std::fmt::Result {
        let dataset = input.dataset;
        let analytics = input.analytics;

        writeln!(out, "CHEMICAL EQUIPMENT ANALYSIS REPORT")?;
        writeln!(out, "==================================")?;
        writeln!(out, "Dataset:          {}", dataset.filename)?;
        writeln!(
            out,
            "Uploaded:         {}",
            dataset.uploaded_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        writeln!(
            out,
            "Report generated: {}",
            input.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(out, "Total equipment:  {}", analytics.total_equipment)?;

        section(out, "Summary Statistics")?;
        writeln!(out, "{:<14}{:>14}  {}", "Parameter", "Average", "Unit")?;
        let averages = [
            (Parameter::Flowrate, dataset.summary.avg_flowrate, "units/hr"),
            (Parameter::Pressure, dataset.summary.avg_pressure, "bar"),
            (Parameter::Temperature, dataset.summary.avg_temperature, "°C"),
        ];
        for (parameter, average, unit) in averages {
            let value = average.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
            writeln!(out, "{:<14}{:>14}  {}", label(parameter), value, unit)?;
        }

        section(out, "Parameter Statistics")?;
        writeln!(
            out,
            "{:<14}{:>12}{:>12}{:>12}{:>12}",
            "Parameter", "Mean", "Median", "Min", "Max"
        )?;
        for parameter in Parameter::ALL {
            let stats = analytics.parameter_stats.get(parameter);
            writeln!(
                out,
                "{:<14}{:>12.2}{:>12.2}{:>12.2}{:>12.2}",
                label(parameter),
                stats.mean,
                stats.median,
                stats.min,
                stats.max
            )?;
        }

        section(out, "Equipment Type Distribution")?;
        if analytics.type_distribution.is_empty() {
            writeln!(out, "No equipment.")?;
        }
        for (equipment_type, count) in &analytics.type_distribution {
            writeln!(out, "{:<24}{:>6}", equipment_type, count)?;
        }

        section(out, "Peer Benchmarks")?;
        if !analytics.peer_benchmarks.is_empty() {
            writeln!(
                out,
                "{:<24}{:>6}{:>14}{:>14}",
                "Type", "Count", "Flowrate min", "Flowrate max"
            )?;
        }
        for (equipment_type, benchmark) in &analytics.peer_benchmarks {
            writeln!(
                out,
                "{:<24}{:>6}{:>14.2}{:>14.2}",
                equipment_type, benchmark.count, benchmark.flowrate_min, benchmark.flowrate_max
            )?;
        }

        section(out, "Correlation Matrix")?;
        writeln!(
            out,
            "{:<14}{:>12}{:>12}{:>12}",
            "", "flowrate", "pressure", "temperature"
        )?;
        for row in analytics.correlation_matrix.rows() {
            writeln!(
                out,
                "{:<14}{:>12.2}{:>12.2}{:>12.2}",
                row.variable.as_str(),
                row.flowrate,
                row.pressure,
                row.temperature
            )?;
        }
        writeln!(
            out,
            "Pressure/temperature correlation: {:.3}",
            analytics.pt_correlation
        )?;

        section(out, "Outlier Analysis")?;
        let outliers: Vec<&EquipmentWithFlags> =
            input.equipment.iter().filter(|e| e.is_outlier).collect();
        if outliers.is_empty() {
            writeln!(out, "No outliers detected.")?;
        } else {
            writeln!(
                out,
                "Found {} equipment with abnormal readings:",
                outliers.len()
            )?;
            for row in outliers.iter().take(MAX_OUTLIER_ROWS) {
                let record = &row.equipment.record;
                let mut status = Vec::new();
                if row.is_pressure_outlier {
                    status.push("P-Outlier");
                }
                if row.is_temperature_outlier {
                    status.push("T-Outlier");
                }
                writeln!(
                    out,
                    "{:<24}{:<16}{:>10.2}{:>12.2}  {}",
                    record.name,
                    record.equipment_type,
                    record.pressure,
                    record.temperature,
                    status.join(", ")
                )?;
            }
            if outliers.len() > MAX_OUTLIER_ROWS {
                writeln!(out, "... and {} more", outliers.len() - MAX_OUTLIER_ROWS)?;
            }
        }

        section(out, "Complete Equipment Data")?;
        writeln!(
            out,
            "{:<24}{:<16}{:>10}{:>10}{:>12}",
            "Name", "Type", "Flowrate", "Pressure", "Temperature"
        )?;
        for row in input.equipment {
            let record = &row.equipment.record;
            writeln!(
                out,
                "{:<24}{:<16}{:>10.2}{:>10.2}{:>12.2}",
                record.name,
                record.equipment_type,
                record.flowrate,
                record.pressure,
                record.temperature
            )?;
        }
        Ok(())
    }
}

impl ReportRenderer for TextReportRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError> {
        let mut out = String::new();
        self.write_report(&mut out, input)?;
        Ok(out.into_bytes())
    }
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

fn label(parameter: Parameter) -> &'static str {
    match parameter {
        Parameter::Flowrate => "Flowrate",
        Parameter::Pressure => "Pressure",
        Parameter::Temperature => "Temperature",
    }
}
