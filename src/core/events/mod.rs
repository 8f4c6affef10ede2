//! Export lifecycle events and their dispatcher
//!
//! Every order goes through up to two dispatches: [`PrepareExportEvent`]
//! before it is rendered, then either [`FinishExportEvent`] or
//! [`FailedExportEvent`].

pub mod dispatcher;
pub mod listeners;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use types::{EventTopic, ExportEvent, FailedExportEvent, FinishExportEvent, PrepareExportEvent};
