//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order identifier newtype wrapper
///
/// Represents the unique identifier of a commerce order as issued by the
/// commerce backend (usually a UUID).
///
/// # Examples
///
/// ```
/// use order_export::domain::ids::OrderId;
/// use std::str::FromStr;
///
/// let order_id = OrderId::from_str("0c8b8c9e-3f4e-4d62-9a43-5f1c2b7a9d10").unwrap();
/// assert_eq!(order_id.as_str(), "0c8b8c9e-3f4e-4d62-9a43-5f1c2b7a9d10");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new OrderId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(OrderId)` if the ID is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Order ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the order ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OrderId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderId> for String {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
