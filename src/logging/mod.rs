//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels
//! - Console output
//! - JSON-formatted local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use order_export::logging::init_logging;
//! use order_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(count = 12, "Started the order export");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
