//! Order domain model
//!
//! This module defines the commerce order exported by this crate. The core
//! treats an order as read-only: an identifier, a few well-known attributes
//! and an open set of additional JSON fields.

use super::ids::OrderId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents a commerce order
///
/// # Examples
///
/// ```
/// use order_export::domain::order::OrderBuilder;
/// use order_export::domain::ids::OrderId;
/// use serde_json::json;
///
/// let order = OrderBuilder::new()
///     .id(OrderId::new("a1b2c3").unwrap())
///     .order_number("10001")
///     .field("customerEmail", json!("jane@example.com"))
///     .build()
///     .unwrap();
///
/// assert_eq!(order.order_number.as_deref(), Some("10001"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier of the order
    pub id: OrderId,

    /// Human-facing order number, if the backend assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    /// Timestamp when the order was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// All remaining order attributes
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Order {
    /// Creates a new builder for constructing an Order
    pub fn builder() -> OrderBuilder {
        OrderBuilder::default()
    }

    /// Looks up an additional field by a dotted path (`shippingAddress.city`)
    ///
    /// Array elements can be addressed by index (`lineItems.0.sku`).
    pub fn field(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.fields, path)
    }
}

/// Looks up a value in a JSON object by a dotted path
///
/// Segments address object keys, or array indices when the current value is
/// an array.
pub fn lookup_path<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Builder for constructing Order instances
#[derive(Debug, Default)]
pub struct OrderBuilder {
    id: Option<OrderId>,
    order_number: Option<String>,
    created_at: Option<DateTime<Utc>>,
    fields: Map<String, Value>,
}

impl OrderBuilder {
    /// Creates a new OrderBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order ID
    pub fn id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the order number
    pub fn order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    /// Sets the creation timestamp
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Adds an additional field
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// Builds the Order
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is missing
    pub fn build(self) -> Result<Order, String> {
        Ok(Order {
            id: self.id.ok_or("id is required")?,
            order_number: self.order_number,
            created_at: self.created_at,
            fields: self.fields,
        })
    }
}
