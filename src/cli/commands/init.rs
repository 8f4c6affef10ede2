//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and a sample order template.

use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the generated sample template
const SAMPLE_TEMPLATE: &str = "order.xml";

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "order-export.toml")]
    pub output: String,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing order-export configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        if let Err(e) = fs::write(&self.output, Self::generate_config()) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(5); // Fatal error exit code
        }
        println!("✅ Configuration file created: {}", self.output);

        let template_path = self.template_path();
        if template_path.exists() && !self.force {
            println!(
                "ℹ️  Keeping existing template: {}",
                template_path.display()
            );
        } else {
            let written = template_path
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| fs::write(&template_path, Self::generate_template()));
            if let Err(e) = written {
                println!("❌ Failed to write sample template");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Sample template created: {}", template_path.display());
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your settings", self.output);
        println!("  2. Point source.path at your order file or directory");
        println!("  3. Adapt the template to the format you need");
        println!("  4. Validate configuration: order-export validate-config");
        println!("  5. Run export: order-export export");
        println!();
        Ok(0)
    }

    /// Sample template location, next to the configuration file
    fn template_path(&self) -> PathBuf {
        Path::new(&self.output)
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join("templates")
            .join(SAMPLE_TEMPLATE)
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        format!(
            r#"# order-export Configuration File

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[source]
# JSON array file, .jsonl/.ndjson file, or directory of .json files
path = "orders.json"

[export]
# Template rendered for every order, relative to templates_dir
file_template = "{SAMPLE_TEMPLATE}"
templates_dir = "templates"

# Destination path of each order below the storage root
# Placeholders: {{id}}, {{orderNumber}}, {{createdAt}}, {{createdAt:%Y/%m}}, {{any.field}}
file_name_pattern = "orders/{{orderNumber}}.xml"

# Optional upper bound for writing a single order file
# write_timeout_secs = 30

# Abort on the first unexpected order error
fail_fast = false

# Skip orders whose export file already exists
skip_existing = false

# Render everything but do not write files
dry_run = false

[storage]
root = "export"

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"  # daily | hourly | never
"#
        )
    }

    /// Generate the sample template
    fn generate_template() -> String {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<order id="{{ order.id }}">
  <number>{{ order.orderNumber }}</number>
</order>
"#
        .to_string()
    }
}
