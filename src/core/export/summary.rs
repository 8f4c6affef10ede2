//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;
use uuid::Uuid;

/// Outcome of exporting a single order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportOutcome {
    /// Rendered and written to storage
    Written,
    /// Skipped by a pre-export listener
    Vetoed,
    /// Storage refused the write
    WriteFailed,
    /// An error interrupted the export of the order
    Errored,
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportOutcome::Written)
    }
}

/// Information about an exported file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub order_id: String,

    /// Storage path the payload was written to
    pub path: String,

    /// SHA-256 of the payload
    pub checksum: String,
}

/// An order that was not written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderFailure {
    pub order_id: String,

    /// Position of the order in the batch
    pub sequence: usize,

    pub outcome: ExportOutcome,

    /// Destination path, when it was resolved before the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Error message, when the failure was caused by an error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Summary of an export operation
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Unique ID of this export run
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    /// Total number of orders handed to the exporter
    pub total_orders: usize,

    pub written: usize,

    pub vetoed: usize,

    pub write_failed: usize,

    pub errored: usize,

    /// Whether writes went to a dry-run sink
    pub dry_run: bool,

    /// Set once every order of the batch was handled
    pub completed: bool,

    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    pub exported: Vec<ExportedFile>,

    pub failures: Vec<OrderFailure>,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

impl ExportSummary {
    /// Create a new empty export summary for `total_orders` orders
    pub fn new(total_orders: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total_orders,
            written: 0,
            vetoed: 0,
            write_failed: 0,
            errored: 0,
            dry_run: false,
            completed: false,
            duration: Duration::from_secs(0),
            exported: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Mark the summary as coming from a dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Record a written order
    pub fn record_written(
        &mut self,
        order_id: impl Into<String>,
        path: impl Into<String>,
        checksum: impl Into<String>,
    ) {
        self.written += 1;
        self.exported.push(ExportedFile {
            order_id: order_id.into(),
            path: path.into(),
            checksum: checksum.into(),
        });
    }

    /// Record an order that was not written
    pub fn record_failure(&mut self, failure: OrderFailure) {
        match failure.outcome {
            ExportOutcome::Vetoed => self.vetoed += 1,
            ExportOutcome::WriteFailed => self.write_failed += 1,
            ExportOutcome::Errored => self.errored += 1,
            // Written orders go through record_written
            ExportOutcome::Written => return,
        }
        self.failures.push(failure);
    }

    /// Number of orders that were handled, whatever their outcome
    pub fn processed(&self) -> usize {
        self.written + self.vetoed + self.write_failed + self.errored
    }

    /// Number of orders that were not written
    pub fn failed(&self) -> usize {
        self.vetoed + self.write_failed + self.errored
    }

    /// Check if the export was successful (completed, no failures)
    ///
    /// Vetoed orders were skipped on purpose and do not count as failures.
    pub fn is_successful(&self) -> bool {
        self.completed && self.write_failed == 0 && self.errored == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_orders == 0 {
            return 100.0;
        }
        (self.written as f64 / self.total_orders as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            total = self.total_orders,
            written = self.written,
            vetoed = self.vetoed,
            write_failed = self.write_failed,
            errored = self.errored,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export completed"
        );

        if self.write_failed + self.errored > 0 {
            tracing::warn!(
                failure_count = self.write_failed + self.errored,
                "Export completed with failures"
            );
            for failure in self.failures.iter().filter(|f| f.outcome != ExportOutcome::Vetoed) {
                tracing::warn!(
                    order_id = %failure.order_id,
                    outcome = ?failure.outcome,
                    message = failure.message.as_deref().unwrap_or(""),
                    "Order not exported"
                );
            }
        }
    }
}
