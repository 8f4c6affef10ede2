//! Export lifecycle events
//!
//! One event is created per order and phase, handed to the dispatcher by
//! value, mutated by listeners through `&mut`, and returned to the exporter.

use crate::adapters::storage::StorageSink;
use crate::domain::{ExportData, ExportError, Order, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Topics export events are dispatched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    /// Before an order is rendered and written
    PreOrderExport,
    /// After an order was written
    PostOrderExport,
    /// After an order failed to export
    PostOrderExportFail,
}

impl EventTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventTopic::PreOrderExport => "PRE_ORDER_EXPORT",
            EventTopic::PostOrderExport => "POST_ORDER_EXPORT",
            EventTopic::PostOrderExportFail => "POST_ORDER_EXPORT_FAIL",
        }
    }
}

impl fmt::Display for EventTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event that can be dispatched through the
/// [`EventDispatcher`](super::EventDispatcher)
pub trait ExportEvent: Send + 'static {
    /// Topic the event is dispatched on
    const TOPIC: EventTopic;

    /// Whether a listener asked to stop calling further listeners
    fn is_propagation_stopped(&self) -> bool {
        false
    }
}

/// Dispatched on [`EventTopic::PreOrderExport`]
///
/// Listeners may add export data for the template or veto the export with
/// [`stop_propagation`](Self::stop_propagation).
pub struct PrepareExportEvent {
    storage: Arc<dyn StorageSink>,
    order: Arc<Order>,
    export_data: ExportData,
    propagation_stopped: bool,
}

impl PrepareExportEvent {
    /// Create the event; the export data starts out as `{"order": <order>}`
    pub fn new(storage: Arc<dyn StorageSink>, order: Arc<Order>) -> Result<Self> {
        let mut export_data = ExportData::new();
        export_data.insert("order".to_string(), serde_json::to_value(order.as_ref())?);

        Ok(Self {
            storage,
            order,
            export_data,
            propagation_stopped: false,
        })
    }

    pub fn storage(&self) -> &Arc<dyn StorageSink> {
        &self.storage
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn export_data(&self) -> &ExportData {
        &self.export_data
    }

    pub fn export_data_mut(&mut self) -> &mut ExportData {
        &mut self.export_data
    }

    /// Set one export data entry, replacing any previous value
    pub fn set_export_data(&mut self, key: impl Into<String>, value: Value) {
        self.export_data.insert(key.into(), value);
    }

    /// Veto the export of this order
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn into_export_data(self) -> ExportData {
        self.export_data
    }
}

impl ExportEvent for PrepareExportEvent {
    const TOPIC: EventTopic = EventTopic::PreOrderExport;

    fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Dispatched on [`EventTopic::PostOrderExport`] once the payload is written
pub struct FinishExportEvent {
    path: String,
    checksum: String,
    storage: Arc<dyn StorageSink>,
    order: Arc<Order>,
}

impl FinishExportEvent {
    pub fn new(
        path: impl Into<String>,
        checksum: impl Into<String>,
        storage: Arc<dyn StorageSink>,
        order: Arc<Order>,
    ) -> Self {
        Self {
            path: path.into(),
            checksum: checksum.into(),
            storage,
            order,
        }
    }

    /// Storage path the order was written to
    pub fn path(&self) -> &str {
        &self.path
    }

    /// SHA-256 of the written payload (hex)
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn storage(&self) -> &Arc<dyn StorageSink> {
        &self.storage
    }

    pub fn order(&self) -> &Order {
        &self.order
    }
}

impl ExportEvent for FinishExportEvent {
    const TOPIC: EventTopic = EventTopic::PostOrderExport;
}

/// Dispatched on [`EventTopic::PostOrderExportFail`]
///
/// Carries the error when the export failed with one; vetoed orders and
/// failed writes carry none.
pub struct FailedExportEvent {
    storage: Arc<dyn StorageSink>,
    order: Arc<Order>,
    error: Option<ExportError>,
}

impl FailedExportEvent {
    pub fn new(storage: Arc<dyn StorageSink>, order: Arc<Order>) -> Self {
        Self {
            storage,
            order,
            error: None,
        }
    }

    /// Attach the error that caused the failure
    pub fn with_error(mut self, error: ExportError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn storage(&self) -> &Arc<dyn StorageSink> {
        &self.storage
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn error(&self) -> Option<&ExportError> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<ExportError> {
        self.error
    }
}

impl ExportEvent for FailedExportEvent {
    const TOPIC: EventTopic = EventTopic::PostOrderExportFail;
}
