//! Export coordinator - main orchestrator for the export process
//!
//! The coordinator walks a batch of orders strictly in order. Each order goes
//! through the same protocol: dispatch the pre-export event, resolve the
//! destination path, render the template, write the payload, then dispatch the
//! post-export or failure event. Per-order failures are isolated so that one
//! bad order never stops the batch; only fatal errors abort it.

use crate::adapters::storage::{DryRunStorage, LocalStorage, StorageSink};
use crate::adapters::template::{FileTemplateRenderer, TemplateRenderer};
use crate::config::{ExportConfig, OrderExportConfig};
use crate::core::events::listeners::skip_existing;
use crate::core::events::{
    EventDispatcher, ExportEvent, FailedExportEvent, FinishExportEvent, PrepareExportEvent,
};
use crate::core::export::checksum::payload_checksum;
use crate::core::export::progress::ExportProgress;
use crate::core::export::summary::{ExportOutcome, ExportSummary, OrderFailure};
use crate::core::naming::OrderNameGenerator;
use crate::domain::{ExportData, ExportError, Order, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runtime settings of the export protocol
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Template rendered for every order
    pub file_template: String,

    /// Upper bound for the storage write of a single order; `None` is unbounded
    ///
    /// Only the awaited `put` is bounded. Listeners and rendering run
    /// synchronously and always complete.
    pub write_timeout: Option<Duration>,

    /// Abort the batch on errors that are neither skippable nor fatal
    pub fail_fast: bool,

    /// Whether the storage sink is a dry-run sink
    pub dry_run: bool,
}

impl ExportSettings {
    pub fn new(file_template: impl Into<String>) -> Self {
        Self {
            file_template: file_template.into(),
            write_timeout: None,
            fail_fast: false,
            dry_run: false,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            file_template: config.file_template.clone(),
            write_timeout: config.write_timeout(),
            fail_fast: config.fail_fast,
            dry_run: config.dry_run,
        }
    }
}

/// What happened to an order that ran through the protocol without error
enum Attempt {
    Written { path: String, checksum: String },
    NotWritten { outcome: ExportOutcome, path: String },
}

/// State of an order's export that outlives an error
#[derive(Default)]
struct AttemptContext {
    path: Option<String>,
    export_data: Option<ExportData>,
}

/// Export coordinator
pub struct ExportCoordinator {
    dispatcher: EventDispatcher,
    storage: Arc<dyn StorageSink>,
    renderer: Arc<dyn TemplateRenderer>,
    names: OrderNameGenerator,
    settings: ExportSettings,
}

impl ExportCoordinator {
    /// Create a coordinator from its collaborators
    pub fn new(
        dispatcher: EventDispatcher,
        storage: Arc<dyn StorageSink>,
        renderer: Arc<dyn TemplateRenderer>,
        names: OrderNameGenerator,
        settings: ExportSettings,
    ) -> Self {
        Self {
            dispatcher,
            storage,
            renderer,
            names,
            settings,
        }
    }

    /// Create a coordinator writing to the configured local storage
    ///
    /// Uses a dry-run sink when `export.dry_run` is set and registers the
    /// skip-existing listener when `export.skip_existing` is set.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Configuration` if the file name pattern is invalid
    /// or the file template does not exist.
    pub fn from_config(config: &OrderExportConfig) -> Result<Self> {
        let names = OrderNameGenerator::new(config.export.file_name_pattern.as_str())?;
        let local = LocalStorage::new(&config.storage.root);

        let renderer = FileTemplateRenderer::new(&config.export.templates_dir);
        if !renderer.has_template(&config.export.file_template) {
            return Err(ExportError::Configuration(format!(
                "File template '{}' not found in {}",
                config.export.file_template,
                renderer.dir().display()
            )));
        }

        let mut dispatcher = EventDispatcher::new();
        if config.export.skip_existing {
            dispatcher.listen(skip_existing(local.clone(), names.clone()));
        }

        let storage: Arc<dyn StorageSink> = if config.export.dry_run {
            Arc::new(DryRunStorage::new())
        } else {
            Arc::new(local)
        };

        tracing::debug!(
            storage = %storage.describe(),
            template = %config.export.file_template,
            pattern = %names.pattern(),
            "Created export coordinator"
        );

        Ok(Self::new(
            dispatcher,
            storage,
            Arc::new(renderer),
            names,
            ExportSettings::from_config(&config.export),
        ))
    }

    /// Listener registry, to add listeners before exporting
    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Export a batch of orders
    ///
    /// Orders are exported one at a time in iteration order. `progress` is
    /// started with the order count, advanced once per order whatever its
    /// outcome, and finished once the batch is done.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the batch: a fatal error, or any error
    /// that is not skippable when fail-fast is enabled. Progress is not
    /// finished in that case.
    pub async fn export_orders<I>(
        &self,
        orders: I,
        progress: &dyn ExportProgress,
    ) -> Result<ExportSummary>
    where
        I: IntoIterator<Item = Order>,
        I::IntoIter: ExactSizeIterator,
    {
        let start_time = Instant::now();
        let orders = orders.into_iter();
        let total = orders.len();
        let mut summary = ExportSummary::new(total).with_dry_run(self.settings.dry_run);

        tracing::debug!(
            count = total,
            run_id = %summary.run_id,
            storage = %self.storage.describe(),
            "Starting order export"
        );
        progress.start(total);

        for (number, order) in orders.enumerate() {
            self.export_order(Arc::new(order), number, &mut summary)
                .await?;
            progress.advance();
        }

        progress.finish();
        summary.completed = true;
        let summary = summary.with_duration(start_time.elapsed());

        tracing::debug!(
            count = total,
            written = summary.written,
            failed = summary.failed(),
            "Finished order export"
        );

        Ok(summary)
    }

    async fn export_order(
        &self,
        order: Arc<Order>,
        number: usize,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        let mut context = AttemptContext::default();

        let result = self.attempt_export(&order, number, &mut context).await;
        match result {
            Ok(Attempt::Written { path, checksum }) => {
                summary.record_written(order.id.as_str(), path, checksum);
                Ok(())
            }
            Ok(Attempt::NotWritten { outcome, path }) => {
                summary.record_failure(OrderFailure {
                    order_id: order.id.to_string(),
                    sequence: number,
                    outcome,
                    path: Some(path),
                    message: None,
                });
                Ok(())
            }
            Err(e) => self.handle_error(e, &order, number, context, summary),
        }
    }

    async fn attempt_export(
        &self,
        order: &Arc<Order>,
        number: usize,
        context: &mut AttemptContext,
    ) -> Result<Attempt> {
        let event = PrepareExportEvent::new(self.storage.clone(), order.clone())?;
        let event = self.dispatcher.dispatch(event)?;
        let stopped = event.is_propagation_stopped();

        let path = context
            .path
            .insert(self.names.order_name(order)?)
            .clone();
        let export_data = context.export_data.insert(event.into_export_data());

        tracing::debug!(
            path = %path,
            number,
            export_data = %data_for_log(export_data),
            "Try to write the order export"
        );

        let checksum = if stopped {
            None
        } else {
            let payload = self
                .renderer
                .render(&self.settings.file_template, export_data)?
                .into_bytes();
            if self.put_payload(&path, &payload).await? {
                Some(payload_checksum(&payload))
            } else {
                None
            }
        };

        let Some(checksum) = checksum else {
            tracing::error!(
                path = %path,
                number,
                propagation_stopped = stopped,
                export_data = %data_for_log(export_data),
                "Failed to write order export file"
            );
            self.dispatcher
                .dispatch(FailedExportEvent::new(self.storage.clone(), order.clone()))?;

            let outcome = if stopped {
                ExportOutcome::Vetoed
            } else {
                ExportOutcome::WriteFailed
            };
            return Ok(Attempt::NotWritten { outcome, path });
        };

        tracing::info!(
            path = %path,
            number,
            export_data = %data_for_log(export_data),
            "Wrote order export file"
        );
        self.dispatcher.dispatch(FinishExportEvent::new(
            path.as_str(),
            checksum.as_str(),
            self.storage.clone(),
            order.clone(),
        ))?;

        Ok(Attempt::Written { path, checksum })
    }

    /// Write a payload, bounded by the write timeout when one is set
    async fn put_payload(&self, path: &str, payload: &[u8]) -> Result<bool> {
        let Some(limit) = self.settings.write_timeout else {
            return Ok(self.storage.put(path, payload).await);
        };

        tokio::time::timeout(limit, self.storage.put(path, payload))
            .await
            .map_err(|_| {
                ExportError::Skippable(format!("write timed out after {}ms", limit.as_millis()))
            })
    }

    fn handle_error(
        &self,
        error: ExportError,
        order: &Arc<Order>,
        number: usize,
        context: AttemptContext,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        if error.is_fatal() || (self.settings.fail_fast && !error.is_skippable()) {
            tracing::error!(
                order_id = %order.id,
                number,
                error = %error,
                "Aborting export"
            );
            return Err(error);
        }

        let path = context.path.as_deref().unwrap_or("");
        let export_data = context
            .export_data
            .as_ref()
            .map(data_for_log)
            .unwrap_or_default();

        if error.is_skippable() {
            tracing::warn!(
                order_id = %order.id,
                number,
                path = %path,
                export_data = %export_data,
                error = %error,
                "Skipped order export"
            );
        } else {
            tracing::error!(
                order_id = %order.id,
                number,
                path = %path,
                export_data = %export_data,
                error = %error,
                "Order export failed"
            );
        }

        summary.record_failure(OrderFailure {
            order_id: order.id.to_string(),
            sequence: number,
            outcome: ExportOutcome::Errored,
            path: context.path,
            message: Some(error.to_string()),
        });

        let event = FailedExportEvent::new(self.storage.clone(), order.clone()).with_error(error);
        if let Err(e) = self.dispatcher.dispatch(event) {
            if e.is_fatal() {
                return Err(e);
            }
            tracing::error!(
                order_id = %order.id,
                topic = %FailedExportEvent::TOPIC,
                error = %e,
                "Failure listener raised an error"
            );
        }

        Ok(())
    }
}

fn data_for_log(data: &ExportData) -> String {
    serde_json::to_string(data).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
