//! Built-in export listeners

use super::types::PrepareExportEvent;
use crate::adapters::storage::LocalStorage;
use crate::core::naming::OrderNameGenerator;
use crate::domain::Result;

/// Pre-export listener that vetoes orders whose export file already exists
///
/// Makes re-running an export over the same orders idempotent. Orders whose
/// path cannot be resolved are left alone so the exporter reports them.
pub fn skip_existing(
    storage: LocalStorage,
    names: OrderNameGenerator,
) -> impl Fn(&mut PrepareExportEvent) -> Result<()> + Send + Sync + 'static {
    move |event: &mut PrepareExportEvent| {
        let Ok(path) = names.order_name(event.order()) else {
            return Ok(());
        };

        if storage.exists(&path) {
            tracing::info!(
                order_id = %event.order().id,
                path = %path,
                "Export file already exists, skipping order"
            );
            event.stop_propagation();
        }
        Ok(())
    }
}
