//! Adapters for order sources, templates and storage backends

pub mod orders;
pub mod storage;
pub mod template;
