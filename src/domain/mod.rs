//! Domain models and types for order exports.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrderId`])
//! - **Domain models** ([`Order`], [`ExportData`])
//! - **Error types** ([`ExportError`], [`TemplateError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ExportError>`]. The export
//! protocol distinguishes three classes of errors:
//!
//! - [`ExportError::Skippable`] - the order is skipped, the batch continues
//! - [`ExportError::Fatal`] - the batch is aborted
//! - everything else - handled per the configured fail-fast policy
//!
//! ```rust
//! use order_export::domain::{ExportError, Result};
//!
//! fn check(total: i64) -> Result<()> {
//!     if total < 0 {
//!         return Err(ExportError::Skippable("negative order total".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod order;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ExportError, TemplateError};
pub use ids::OrderId;
pub use order::{lookup_path, Order, OrderBuilder};
pub use result::Result;

/// Data handed to the template renderer for one order, assembled by
/// pre-export listeners
pub type ExportData = serde_json::Map<String, serde_json::Value>;
