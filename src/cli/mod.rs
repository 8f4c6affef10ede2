//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for order-export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// order-export - render orders to files through templates
#[derive(Parser, Debug)]
#[command(name = "order-export")]
#[command(version, about, long_about = None)]
#[command(author = "Order Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "order-export.toml", env = "ORDER_EXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ORDER_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export orders to the configured storage
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file and sample template
    Init(commands::init::InitArgs),
}
