//! Core business logic for order exports.
//!
//! # Modules
//!
//! - [`export`] - Export orchestration, progress and summaries
//! - [`events`] - Export lifecycle events and the event dispatcher
//! - [`naming`] - Destination paths for exported orders
//!
//! # Export Workflow
//!
//! For every order of a batch:
//!
//! 1. **Prepare**: dispatch [`events::PrepareExportEvent`]; listeners add
//!    template data or veto the order
//! 2. **Name**: resolve the destination path from the file name pattern
//! 3. **Render**: render the file template with the export data
//! 4. **Write**: put the payload into storage
//! 5. **Notify**: dispatch [`events::FinishExportEvent`] or
//!    [`events::FailedExportEvent`]
//!
//! # Example
//!
//! ```rust,no_run
//! use order_export::config::load_config;
//! use order_export::adapters::orders::load_orders;
//! use order_export::core::export::{ExportCoordinator, NoProgress};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("order-export.toml")?;
//! let orders = load_orders(&config.source.path)?;
//!
//! let coordinator = ExportCoordinator::from_config(&config)?;
//! let summary = coordinator.export_orders(orders, &NoProgress).await?;
//!
//! println!("Written: {}", summary.written);
//! println!("Failed: {}", summary.failed());
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod export;
pub mod naming;
