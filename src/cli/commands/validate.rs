//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the configuration file.

use crate::adapters::template::FileTemplateRenderer;
use crate::config::load_config;
use crate::core::naming::OrderNameGenerator;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if let Err(e) = config.validate() {
            println!("❌ Configuration validation failed");
            println!("   Error: {e}");
            println!();
            return Ok(2);
        }

        if let Err(e) = OrderNameGenerator::new(config.export.file_name_pattern.as_str()) {
            println!("❌ Invalid file name pattern");
            println!("   Error: {e}");
            println!();
            return Ok(2);
        }

        let renderer = FileTemplateRenderer::new(&config.export.templates_dir);
        if !renderer.has_template(&config.export.file_template) {
            println!("❌ File template not found");
            println!(
                "   Error: '{}' does not exist in {}",
                config.export.file_template, config.export.templates_dir
            );
            println!();
            return Ok(2);
        }

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Source: {}", config.source.path);
        if !Path::new(&config.source.path).exists() {
            println!("  ⚠️  Source does not exist yet");
        }
        println!(
            "  Template: {}/{}",
            config.export.templates_dir, config.export.file_template
        );
        println!("  File Name Pattern: {}", config.export.file_name_pattern);
        println!("  Storage Root: {}", config.storage.root);
        println!(
            "  Write Timeout: {}",
            config
                .export
                .write_timeout_secs
                .map_or("none".to_string(), |secs| format!("{secs}s"))
        );
        println!("  Fail Fast: {}", config.export.fail_fast);
        println!("  Skip Existing: {}", config.export.skip_existing);
        println!("  Dry Run: {}", config.export.dry_run);
        println!();
        Ok(0)
    }
}
