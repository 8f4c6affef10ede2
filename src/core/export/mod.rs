//! Export orchestration
//!
//! This module provides the core export logic, including:
//! - Export coordination and the per-order protocol
//! - Progress reporting
//! - Summary and reporting

pub mod checksum;
pub mod coordinator;
pub mod progress;
pub mod summary;

pub use coordinator::{ExportCoordinator, ExportSettings};
pub use progress::{ExportProgress, NoProgress};
pub use summary::{ExportOutcome, ExportSummary, ExportedFile, OrderFailure};
