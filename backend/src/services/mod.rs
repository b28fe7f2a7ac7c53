//! Application services.
//!
//! Services sit between the HTTP layer and the repository. They orchestrate
//! CSV ingestion, run the analytics engine over stored datasets and render
//! reports.

pub mod analytics;
pub mod error;
pub mod ingest;
pub mod report;

pub use analytics::{
    get_dataset_analytics, list_equipment_with_flags, DatasetAnalytics, EquipmentWithFlags,
    OutlierEquipment,
};
pub use error::{ServiceError, ServiceResult};
pub use ingest::{ingest_csv, validate_filename, IngestOutcome};
pub use report::{build_report, RenderedReport, ReportRenderer, TextReportRenderer};
