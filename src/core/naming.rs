//! Destination paths for exported orders
//!
//! The [`OrderNameGenerator`] maps an order to the storage path its export is
//! written to. Paths come from a configured pattern:
//!
//! | Placeholder            | Value                                        |
//! |------------------------|----------------------------------------------|
//! | `{id}`                 | order ID                                     |
//! | `{orderNumber}`        | order number                                 |
//! | `{createdAt}`          | creation time, `%Y%m%d%H%M%S`                |
//! | `{createdAt:<format>}` | creation time, custom chrono format          |
//! | `{some.field}`         | any additional string/number/boolean field   |
//!
//! Values taken from the order are sanitized so they can never add path
//! segments. Mapping is pure: the same order always yields the same path.

use crate::domain::{ExportError, Order, Result};
use chrono::format::{Item, StrftimeItems};
use regex::{Captures, Regex};
use serde_json::Value;
use std::path::{Component, Path};

const DEFAULT_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Generates destination paths for orders
#[derive(Debug, Clone)]
pub struct OrderNameGenerator {
    pattern: String,
    placeholder: Regex,
}

impl OrderNameGenerator {
    /// Create a generator for `pattern`
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Configuration` if the pattern is empty, absolute,
    /// contains `..`, has unbalanced braces, or uses an invalid date format
    /// (including one starting with `/` or containing a `..` segment).
    ///
    /// # Examples
    ///
    /// ```
    /// use order_export::core::naming::OrderNameGenerator;
    /// use order_export::domain::{Order, OrderId};
    ///
    /// let generator = OrderNameGenerator::new("orders/{orderNumber}.xml").unwrap();
    /// let order = Order::builder()
    ///     .id(OrderId::new("a1").unwrap())
    ///     .order_number("10001")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(generator.order_name(&order).unwrap(), "orders/10001.xml");
    /// ```
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let placeholder = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_.]*)(?::([^{}]+))?\}")
            .map_err(|e| ExportError::Other(format!("Invalid placeholder pattern: {e}")))?;

        validate_pattern(&pattern, &placeholder)?;

        Ok(Self {
            pattern,
            placeholder,
        })
    }

    /// The configured pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Resolve the destination path of `order`
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Naming` if a placeholder cannot be resolved for
    /// this order (missing field, non-scalar value, empty value).
    pub fn order_name(&self, order: &Order) -> Result<String> {
        let mut name = String::with_capacity(self.pattern.len());
        let mut last = 0;

        for caps in self.placeholder.captures_iter(&self.pattern) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            name.push_str(&self.pattern[last..whole.start()]);
            name.push_str(&resolve(order, &caps)?);
            last = whole.end();
        }
        name.push_str(&self.pattern[last..]);

        Ok(name)
    }
}

fn validate_pattern(pattern: &str, placeholder: &Regex) -> Result<()> {
    let invalid = |reason: &str| {
        Err(ExportError::Configuration(format!(
            "Invalid file name pattern '{pattern}': {reason}"
        )))
    };

    if pattern.trim().is_empty() {
        return invalid("pattern cannot be empty");
    }

    let path = Path::new(pattern);
    if path.is_absolute() {
        return invalid("pattern must be relative");
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return invalid("pattern cannot contain '..'");
    }

    let literal = placeholder.replace_all(pattern, "");
    if literal.contains('{') || literal.contains('}') {
        return invalid("unbalanced or malformed placeholder");
    }

    for caps in placeholder.captures_iter(pattern) {
        if let (Some(key), Some(format)) = (caps.get(1), caps.get(2)) {
            if key.as_str() != "createdAt" {
                return invalid("only {createdAt} accepts a format");
            }
            if StrftimeItems::new(format.as_str()).any(|item| matches!(item, Item::Error)) {
                return invalid("invalid date format");
            }
            // Date output is inserted unsanitized
            let format = format.as_str();
            if format.starts_with('/') || format.split('/').any(|segment| segment == "..") {
                return invalid("date format cannot start a path at the root or contain '..'");
            }
        }
    }

    Ok(())
}

fn resolve(order: &Order, caps: &Captures<'_>) -> Result<String> {
    let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let missing = || {
        ExportError::Naming(format!(
            "order {} has no value for placeholder {{{}}}",
            order.id, key
        ))
    };

    let value = match key {
        "id" => order.id.as_str().to_string(),
        "orderNumber" => order.order_number.clone().ok_or_else(missing)?,
        "createdAt" => {
            let created_at = order.created_at.ok_or_else(missing)?;
            let format = caps.get(2).map(|m| m.as_str()).unwrap_or(DEFAULT_DATE_FORMAT);
            // Formats are validated up front and come from configuration
            return Ok(created_at.format(format).to_string());
        }
        path => match order.field(path).ok_or_else(missing)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => {
                return Err(ExportError::Naming(format!(
                    "order {} field '{}' is not a scalar value",
                    order.id, path
                )))
            }
        },
    };

    if value.trim().is_empty() {
        return Err(missing());
    }

    Ok(sanitize(&value))
}

fn sanitize(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        "_".repeat(cleaned.len())
    } else {
        cleaned
    }
}
