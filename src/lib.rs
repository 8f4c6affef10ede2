// order-export - Template-driven order export tool
// Copyright (c) 2025 Order Export Contributors
// Licensed under the MIT License

//! # order-export - Template-driven order export
//!
//! order-export renders commerce orders through a file template and writes
//! one file per order into storage, notifying listeners before and after each
//! export.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Loading** orders from JSON, NDJSON or a directory of JSON files
//! - **Naming** each export file from a configurable pattern
//! - **Rendering** orders through `{{ placeholder }}` templates
//! - **Writing** payloads to local storage (or a dry-run sink)
//! - **Notifying** listeners through pre-export, post-export and failure events
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export protocol, events, naming)
//! - [`adapters`] - Order sources, templates and storage backends
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use order_export::adapters::orders::load_orders;
//! use order_export::config::load_config;
//! use order_export::core::export::{ExportCoordinator, NoProgress};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("order-export.toml")?;
//!     let orders = load_orders(&config.source.path)?;
//!
//!     let coordinator = ExportCoordinator::from_config(&config)?;
//!     let summary = coordinator.export_orders(orders, &NoProgress).await?;
//!
//!     println!("Exported {} orders", summary.written);
//!     Ok(())
//! }
//! ```
//!
//! ## Listeners
//!
//! Listeners are closures registered on the coordinator's dispatcher. A
//! pre-export listener can add template data or veto an order:
//!
//! ```rust,no_run
//! use order_export::config::load_config;
//! use order_export::core::events::PrepareExportEvent;
//! use order_export::core::export::ExportCoordinator;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("order-export.toml")?;
//! let mut coordinator = ExportCoordinator::from_config(&config)?;
//!
//! coordinator
//!     .dispatcher_mut()
//!     .listen(|event: &mut PrepareExportEvent| {
//!         if event.order().field("status") == Some(&json!("on_hold")) {
//!             event.stop_propagation();
//!         }
//!         event.set_export_data("exporter", json!("order-export"));
//!         Ok(())
//!     });
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with
//! [`domain::ExportError`]. During an export, [`domain::ExportError::Skippable`]
//! skips the order, [`domain::ExportError::Fatal`] aborts the batch.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
