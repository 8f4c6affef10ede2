//! Progress reporting for export runs

use indicatif::ProgressBar;

/// Receives progress notifications from the exporter
///
/// `start` is called once with the number of orders, `advance` once per order
/// whatever its outcome, and `finish` once when every order was handled.
pub trait ExportProgress: Send + Sync {
    fn start(&self, total: usize);

    fn advance(&self);

    fn finish(&self);
}

impl ExportProgress for ProgressBar {
    fn start(&self, total: usize) {
        self.set_length(total as u64);
        self.set_position(0);
    }

    fn advance(&self) {
        self.inc(1);
    }

    fn finish(&self) {
        self.finish_with_message("done");
    }
}

/// Progress sink that discards all notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ExportProgress for NoProgress {
    fn start(&self, _total: usize) {}

    fn advance(&self) {}

    fn finish(&self) {}
}
