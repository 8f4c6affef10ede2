//! Export command implementation
//!
//! This module implements the `export` command for rendering orders through
//! the configured template into storage.

use crate::adapters::orders::load_orders;
use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportOutcome, ExportSummary};
use crate::domain::ExportError;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::time::Duration;

/// Failures listed after the summary before truncating
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - render orders without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Override the order source (file or directory)
    #[arg(long)]
    pub source: Option<String>,

    /// Override the file template
    #[arg(long)]
    pub template: Option<String>,

    /// Abort on the first unexpected order error
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not display a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Write the export summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply CLI overrides
        if let Some(source) = &self.source {
            tracing::info!(source = %source, "Overriding order source from CLI");
            config.source.path = source.clone();
        }

        if let Some(template) = &self.template {
            tracing::info!(template = %template, "Overriding file template from CLI");
            config.export.file_template = template.clone();
        }

        if self.fail_fast {
            tracing::info!("Enabling fail-fast from CLI");
            config.export.fail_fast = true;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let coordinator = match ExportCoordinator::from_config(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        let orders = match load_orders(&config.source.path) {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(source = %config.source.path, error = %e, "Failed to load orders");
                eprintln!("Failed to load orders: {e}");
                return Ok(2);
            }
        };

        if config.export.dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !config.export.dry_run {
            println!("Export Configuration:");
            println!("  Source: {}", config.source.path);
            println!("  Orders: {}", orders.len());
            println!("  Template: {}", config.export.file_template);
            println!("  File names: {}", config.export.file_name_pattern);
            println!("  Storage: {}", config.storage.root);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        tracing::info!(count = orders.len(), "Executing export");
        println!("🚀 Starting export...");
        println!();

        let progress = progress_bar(self.no_progress);
        let summary = match coordinator.export_orders(orders, &progress).await {
            Ok(s) => s,
            Err(e) => {
                progress.abandon_with_message("aborted");
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for_error(&e));
            }
        };

        summary.log_summary();
        print_summary(&summary);

        if let Some(report_path) = &self.report {
            let report = serde_json::to_string_pretty(&summary)?;
            fs::write(report_path, report)?;
            tracing::info!(path = %report_path, "Wrote export report");
            println!("📄 Report written to {report_path}");
            println!();
        }

        let code = exit_code(&summary);
        if code == 0 {
            println!("✅ Export completed successfully!");
        } else {
            println!("⚠️  Export completed with failures");
        }

        Ok(code)
    }
}

fn progress_bar(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(0);
    match ProgressStyle::with_template(
        "  {spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} orders {msg}",
    ) {
        Ok(style) => bar.set_style(style.progress_chars("=> ")),
        Err(e) => tracing::debug!(error = %e, "Falling back to the default progress style"),
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Total Orders: {}", summary.total_orders);
    println!("  Written: {}", summary.written);
    println!("  Skipped by Listeners: {}", summary.vetoed);
    println!("  Write Failures: {}", summary.write_failed);
    println!("  Errors: {}", summary.errored);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    let failures: Vec<_> = summary
        .failures
        .iter()
        .filter(|f| f.outcome != ExportOutcome::Vetoed)
        .collect();

    if !failures.is_empty() {
        println!("⚠️  Orders not exported:");
        for failure in failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {} (#{}, {:?})", failure.order_id, failure.sequence, failure.outcome);
            if let Some(message) = &failure.message {
                println!("    Reason: {message}");
            }
        }
        if failures.len() > MAX_LISTED_FAILURES {
            println!(
                "  ... and {} more failures",
                failures.len() - MAX_LISTED_FAILURES
            );
        }
        println!();
    }
}

/// Exit code for a completed export
pub fn exit_code(summary: &ExportSummary) -> i32 {
    if summary.is_successful() {
        0
    } else {
        1 // Partial success
    }
}

/// Exit code for an aborted export
pub fn exit_code_for_error(error: &ExportError) -> i32 {
    match error {
        ExportError::Configuration(_) => 2,
        _ => 5, // Fatal error exit code
    }
}
