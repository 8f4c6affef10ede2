//! Synchronous event dispatcher
//!
//! Listeners are plain closures registered per event type. Dispatching calls
//! them in registration order, each with exclusive access to the event, and
//! hands the event back to the caller.

use super::types::{EventTopic, ExportEvent};
use crate::domain::Result;
use std::any::Any;
use std::collections::HashMap;

type Listener<E> = Box<dyn Fn(&mut E) -> Result<()> + Send + Sync>;

/// Ordered listener registry for export events
#[derive(Default)]
pub struct EventDispatcher {
    // Every entry under a topic holds a `Listener<E>` for that topic's event type
    listeners: HashMap<EventTopic, Vec<Box<dyn Any + Send + Sync>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for events of type `E`
    ///
    /// # Examples
    ///
    /// ```
    /// use order_export::core::events::{EventDispatcher, PrepareExportEvent};
    /// use serde_json::json;
    ///
    /// let mut dispatcher = EventDispatcher::new();
    /// dispatcher.listen(|event: &mut PrepareExportEvent| {
    ///     event.set_export_data("channel", json!("web"));
    ///     Ok(())
    /// });
    /// ```
    pub fn listen<E, F>(&mut self, listener: F) -> &mut Self
    where
        E: ExportEvent,
        F: Fn(&mut E) -> Result<()> + Send + Sync + 'static,
    {
        let listener: Listener<E> = Box::new(listener);
        self.listeners
            .entry(E::TOPIC)
            .or_default()
            .push(Box::new(listener));
        self
    }

    /// Number of listeners registered on `topic`
    pub fn listener_count(&self, topic: EventTopic) -> usize {
        self.listeners.get(&topic).map_or(0, Vec::len)
    }

    /// Dispatch `event` to its listeners and return it
    ///
    /// Stops calling listeners once one stops propagation.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a listener; later listeners are not
    /// called and the event is dropped.
    pub fn dispatch<E: ExportEvent>(&self, mut event: E) -> Result<E> {
        let Some(listeners) = self.listeners.get(&E::TOPIC) else {
            return Ok(event);
        };

        for listener in listeners
            .iter()
            .filter_map(|l| l.downcast_ref::<Listener<E>>())
        {
            if event.is_propagation_stopped() {
                tracing::trace!(topic = %E::TOPIC, "Propagation stopped");
                break;
            }
            listener(&mut event)?;
        }

        Ok(event)
    }
}
