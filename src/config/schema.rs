//! Configuration schema types
//!
//! This module defines the configuration structure for order exports.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Where orders are read from
    pub source: SourceConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Storage backend settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl OrderExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.export.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Order source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path to a JSON/NDJSON order file or a directory of JSON files
    pub path: String,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("source.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Name of the template rendered for every order
    pub file_template: String,

    /// Directory the templates are loaded from
    #[serde(default = "default_templates_dir")]
    pub templates_dir: String,

    /// Pattern for the destination path of each order
    /// (placeholders: {id}, {orderNumber}, {createdAt[:fmt]}, {field.path})
    #[serde(default = "default_file_name_pattern")]
    pub file_name_pattern: String,

    /// Optional upper bound for writing a single order file, in seconds.
    /// Unset means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_timeout_secs: Option<u64>,

    /// Abort the batch on errors that are neither skippable nor fatal
    #[serde(default)]
    pub fail_fast: bool,

    /// Veto orders whose destination file already exists
    #[serde(default)]
    pub skip_existing: bool,

    /// Dry run mode - render everything but skip writes (default: false)
    #[serde(default)]
    pub dry_run: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.file_template.trim().is_empty() {
            return Err("export.file_template cannot be empty".to_string());
        }

        if self.templates_dir.trim().is_empty() {
            return Err("export.templates_dir cannot be empty".to_string());
        }

        if self.file_name_pattern.trim().is_empty() {
            return Err("export.file_name_pattern cannot be empty".to_string());
        }

        if Path::new(&self.file_name_pattern).is_absolute() {
            return Err(format!(
                "export.file_name_pattern must be relative, got '{}'",
                self.file_name_pattern
            ));
        }

        if self.write_timeout_secs == Some(0) {
            return Err("export.write_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// The storage write timeout, if one is configured
    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_secs.map(Duration::from_secs)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory all export files are written below
    #[serde(default = "default_storage_root")]
    pub root: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.trim().is_empty() {
            return Err("storage.root cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_templates_dir() -> String {
    "templates".to_string()
}

fn default_file_name_pattern() -> String {
    "orders/{orderNumber}.xml".to_string()
}

fn default_storage_root() -> String {
    "export".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
