//! CSV upload ingestion: validate, parse and store.

use log::info;

use super::error::{ServiceError, ServiceResult};
use crate::db::checksum::calculate_checksum;
use crate::db::repository::FullRepository;
use crate::db::services as db_services;
use crate::models::{DatasetInfo, NewDataset};
use crate::parsing::parse_equipment_csv;

/// Result of one upload.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub dataset: DatasetInfo,
    /// `false` when an unedited dataset already holds identical content
    pub created: bool,
    /// Rows skipped for missing or unparseable values
    pub dropped_rows: usize,
}

/// Reject filenames that do not end in `.csv` (any case).
pub fn validate_filename(filename: &str) -> ServiceResult<()> {
    let trimmed = filename.trim();
    let is_csv = trimmed.len() > 4
        && trimmed
            .get(trimmed.len() - 4..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".csv"));
    if is_csv {
        Ok(())
    } else {
        Err(ServiceError::InvalidUpload(format!(
            "only CSV files are accepted, got '{}'",
            filename
        )))
    }
}

/// Ingest one uploaded CSV file.
///
/// Parsing runs on the blocking thread pool. Identical content (same SHA-256)
/// resolves to the existing dataset unless that dataset was edited since.
pub async fn ingest_csv<R: FullRepository + ?Sized>(
    repo: &R,
    filename: &str,
    bytes: Vec<u8>,
) -> ServiceResult<IngestOutcome> {
    validate_filename(filename)?;

    let checksum = calculate_checksum(&bytes);
    let parsed = tokio::task::spawn_blocking(move || parse_equipment_csv(&bytes)).await??;
    info!(
        "Parsed '{}': {} rows kept, {} dropped",
        filename,
        parsed.records.len(),
        parsed.dropped_rows
    );

    let upload = NewDataset {
        filename: filename.trim().to_string(),
        checksum,
        records: parsed.records,
    };
    let (dataset, created) = db_services::store_dataset(repo, &upload).await?;

    Ok(IngestOutcome {
        dataset,
        created,
        dropped_rows: parsed.dropped_rows,
    })
}
