//! Configuration management.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment overrides (`ORDER_EXPORT_<SECTION>_<KEY>`)
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`SourceConfig`] - Where orders are read from
//! - [`ExportConfig`] - Template, file naming, error policy, dry run
//! - [`StorageConfig`] - Storage root directory
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! path = "orders.json"
//!
//! [export]
//! file_template = "order.xml"
//! templates_dir = "templates"
//! file_name_pattern = "orders/{createdAt:%Y/%m}/{orderNumber}.xml"
//!
//! [storage]
//! root = "${EXPORT_ROOT}"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use order_export::config::load_config;
//!
//! # fn example() {
//! match load_config("order-export.toml") {
//!     Ok(config) => println!("Exporting with template {}", config.export.file_template),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, OrderExportConfig, SourceConfig,
    StorageConfig,
};
