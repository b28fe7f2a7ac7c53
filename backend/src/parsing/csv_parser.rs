use log::warn;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::models::EquipmentRecord;

/// Header names every upload must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_NAME,
    COL_TYPE,
    COL_FLOWRATE,
    COL_PRESSURE,
    COL_TEMPERATURE,
];

pub const COL_NAME: &str = "Equipment Name";
pub const COL_TYPE: &str = "Type";
pub const COL_FLOWRATE: &str = "Flowrate";
pub const COL_PRESSURE: &str = "Pressure";
pub const COL_TEMPERATURE: &str = "Temperature";

/// Type assigned to rows whose `Type` cell is empty.
pub const FALLBACK_TYPE: &str = "Other";

/// Errors raised while turning an upload into equipment records.
#[derive(Debug, thiserror::Error)]
pub enum CsvIngestError {
    #[error("CSV file is empty")]
    Empty,

    #[error("Invalid file encoding (expected UTF-8)")]
    Encoding,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid data rows found after cleaning")]
    NoValidRows,

    #[error("CSV parsing failed: {0}")]
    Parse(#[from] PolarsError),

    #[error("Failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),
}

/// Records extracted from an upload plus the number of rows discarded.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub records: Vec<EquipmentRecord>,
    pub dropped_rows: usize,
}

/// Parse an uploaded CSV body into validated equipment records.
///
/// Numeric cells are coerced to `f64`; rows with a missing, unparseable or
/// non-finite number, or with an empty name, are dropped. Type values are
/// kept verbatim.
pub fn parse_equipment_csv(bytes: &[u8]) -> Result<ParsedCsv, CsvIngestError> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(CsvIngestError::Empty);
    }
    std::str::from_utf8(bytes).map_err(|_| CsvIngestError::Encoding)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()?;

    dataframe_to_records(&df)
}

/// Parse an equipment CSV from disk.
pub fn parse_equipment_csv_file(path: &Path) -> Result<ParsedCsv, CsvIngestError> {
    let bytes = std::fs::read(path)?;
    parse_equipment_csv(&bytes)
}

/// Convert a Polars DataFrame with the required columns into records.
pub fn dataframe_to_records(df: &DataFrame) -> Result<ParsedCsv, CsvIngestError> {
    let present: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !present.contains(required))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(CsvIngestError::MissingColumns(missing));
    }

    // Non-strict casts turn unparseable cells into nulls
    let names = df.column(COL_NAME)?.cast(&DataType::String)?;
    let types = df.column(COL_TYPE)?.cast(&DataType::String)?;
    let flowrates = df.column(COL_FLOWRATE)?.cast(&DataType::Float64)?;
    let pressures = df.column(COL_PRESSURE)?.cast(&DataType::Float64)?;
    let temperatures = df.column(COL_TEMPERATURE)?.cast(&DataType::Float64)?;

    let names = names.str()?;
    let types = types.str()?;
    let flowrates = flowrates.f64()?;
    let pressures = pressures.f64()?;
    let temperatures = temperatures.f64()?;

    let mut records = Vec::with_capacity(df.height());
    let mut dropped_rows = 0;

    for i in 0..df.height() {
        let (Some(name), Some(flowrate), Some(pressure), Some(temperature)) = (
            names.get(i),
            flowrates.get(i),
            pressures.get(i),
            temperatures.get(i),
        ) else {
            dropped_rows += 1;
            continue;
        };

        let equipment_type = match types.get(i) {
            Some(t) if !t.trim().is_empty() => t,
            _ => FALLBACK_TYPE,
        };

        match EquipmentRecord::new(name, equipment_type, flowrate, pressure, temperature) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Dropping CSV row {}: {}", i + 2, e);
                dropped_rows += 1;
            }
        }
    }

    if dropped_rows > 0 {
        warn!("Dropped {} invalid CSV row(s)", dropped_rows);
    }
    if records.is_empty() {
        return Err(CsvIngestError::NoValidRows);
    }

    Ok(ParsedCsv {
        records,
        dropped_rows,
    })
}
