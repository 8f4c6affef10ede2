//! JSON order source
//!
//! Orders are loaded eagerly so that the total count is known before the
//! export starts. Supported layouts:
//!
//! - a `.json` file holding one order object or an array of orders
//! - a `.jsonl` / `.ndjson` file with one order per line
//! - a directory of `.json` files, read in file name order

use crate::domain::{ExportError, Order, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Load all orders from `path`
///
/// # Errors
///
/// Returns an error if the path does not exist, cannot be read, or contains
/// an order that fails to parse.
///
/// # Examples
///
/// ```no_run
/// use order_export::adapters::orders::load_orders;
///
/// let orders = load_orders("orders.json").expect("Failed to load orders");
/// println!("{} orders to export", orders.len());
/// ```
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<Order>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ExportError::Configuration(format!(
            "Order source not found: {}",
            path.display()
        )));
    }

    let orders = if path.is_dir() {
        load_directory(path)?
    } else if is_line_delimited(path) {
        load_lines(path)?
    } else {
        load_document(path)?
    };

    tracing::debug!(path = %path.display(), count = orders.len(), "Loaded orders");
    Ok(orders)
}

fn is_line_delimited(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("jsonl") | Some("ndjson")
    )
}

fn load_document(path: &Path) -> Result<Vec<Order>> {
    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| {
        ExportError::Serialization(format!("{}: {}", path.display(), e))
    })?;

    let items = match value {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        _ => {
            return Err(ExportError::Validation(format!(
                "{}: expected an order object or an array of orders",
                path.display()
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                ExportError::Serialization(format!(
                    "{}: order #{}: {}",
                    path.display(),
                    index,
                    e
                ))
            })
        })
        .collect()
}

fn load_lines(path: &Path) -> Result<Vec<Order>> {
    let contents = fs::read_to_string(path)?;

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| {
                ExportError::Serialization(format!(
                    "{}: line {}: {}",
                    path.display(),
                    index + 1,
                    e
                ))
            })
        })
        .collect()
}

fn load_directory(path: &Path) -> Result<Vec<Order>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(path)? {
        let file = entry?.path();
        if file.is_file() && file.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(file);
        }
    }
    files.sort();

    let mut orders = Vec::new();
    for file in files {
        orders.extend(load_document(&file)?);
    }
    Ok(orders)
}
