//! Storage backends for rendered order exports
//!
//! - [`LocalStorage`] - files below a root directory
//! - [`DryRunStorage`] - logs writes without performing them

pub mod dry_run;
pub mod local;
pub mod traits;

pub use dry_run::DryRunStorage;
pub use local::LocalStorage;
pub use traits::StorageSink;
