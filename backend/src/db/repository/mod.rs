//! Repository trait definitions for database operations.
//!
//! Responsibilities are split across focused traits:
//!
//! - [`error`]: Error types for repository operations
//! - [`dataset`]: Dataset storage, lookup and summary refresh
//! - [`equipment`]: Equipment row listing and editing
//!
//! # Convenience Trait Bound
//!
//! Service functions that need both capabilities take a [`FullRepository`]:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let datasets = repo.list_datasets().await?;
//!     let rows = repo.list_equipment(Some(datasets[0].id)).await?;
//!     Ok(())
//! }
//! ```

pub mod dataset;
pub mod equipment;
pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use dataset::DatasetRepository;
pub use equipment::EquipmentRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing both repository traits.
pub trait FullRepository: DatasetRepository + EquipmentRepository {}

impl<T> FullRepository for T where T: DatasetRepository + EquipmentRepository {}
