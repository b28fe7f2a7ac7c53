//! Storage for uploaded datasets and their equipment rows.
//!
//! Database operations are abstracted behind the Repository pattern so the
//! storage backend can be swapped without touching callers:
//!
//! - `services`: High-level business logic functions (use these in your application!)
//! - `repository`: Trait definitions and error types
//! - `repositories::local`: In-memory implementation
//! - `checksum`: Content hashing for upload deduplication
//!
//! # Recommended Usage
//!
//! ```no_run
//! use equipment_analytics::db::{services, LocalRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let datasets = services::list_datasets(&repo).await?;
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

// ==================== Service Layer ====================

pub use services::{
    delete_equipment, fetch_records, get_dataset, get_equipment, health_check, list_datasets,
    list_equipment, refresh_dataset_summary, store_dataset, summarize, update_equipment,
};

// ==================== Repository Pattern Exports ====================

pub use checksum::calculate_checksum;
pub use repositories::LocalRepository;
pub use repository::{
    DatasetRepository, EquipmentRepository, ErrorContext, FullRepository, RepositoryError,
    RepositoryResult,
};
