//! Order sources
//!
//! The export core consumes any `ExactSizeIterator` of orders; this module
//! provides the file-based source used by the CLI.

pub mod json;

pub use json::load_orders;
