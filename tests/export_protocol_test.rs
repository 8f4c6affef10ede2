//! Integration tests for the per-order export protocol
//!
//! Every test wires the coordinator with in-memory collaborators and records
//! the events, writes and progress notifications it observes.

use async_trait::async_trait;
use order_export::adapters::storage::StorageSink;
use order_export::adapters::template::{render_source, TemplateRenderer};
use order_export::core::events::{
    EventDispatcher, FailedExportEvent, FinishExportEvent, PrepareExportEvent,
};
use order_export::core::export::{
    ExportCoordinator, ExportOutcome, ExportProgress, ExportSettings,
};
use order_export::core::naming::OrderNameGenerator;
use order_export::domain::{ExportData, ExportError, Order, OrderId, Result};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Journal = Arc<Mutex<Vec<String>>>;

/// Storage that records writes and answers with a fixed result
struct RecordingStorage {
    accept: bool,
    slow_path: Option<String>,
    writes: Mutex<Vec<String>>,
}

impl RecordingStorage {
    fn accepting() -> Self {
        Self {
            accept: true,
            slow_path: None,
            writes: Mutex::new(Vec::new()),
        }
    }

    fn refusing() -> Self {
        Self {
            accept: false,
            ..Self::accepting()
        }
    }

    fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageSink for RecordingStorage {
    async fn put(&self, path: &str, _content: &[u8]) -> bool {
        if self.slow_path.as_deref() == Some(path) {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        self.writes.lock().unwrap().push(path.to_string());
        self.accept
    }

    fn describe(&self) -> String {
        "recording".to_string()
    }
}

/// Renderer that fails for orders flagged with a `fail` field
struct FlaggingRenderer;

impl TemplateRenderer for FlaggingRenderer {
    fn render(&self, name: &str, data: &ExportData) -> Result<String> {
        match data["order"].get("fail").and_then(|v| v.as_str()) {
            Some("skippable") => Err(ExportError::Skippable("order has no lines".to_string())),
            Some("fatal") => Err(ExportError::Fatal("template engine crashed".to_string())),
            Some(other) => Err(ExportError::Other(format!("unexpected: {other}"))),
            None => Ok(render_source(
                name,
                "<order number=\"{{ order.orderNumber }}\"/>",
                data,
            )?),
        }
    }
}

#[derive(Default)]
struct CountingProgress {
    started: AtomicUsize,
    total: AtomicUsize,
    advanced: AtomicUsize,
    finished: AtomicUsize,
}

impl ExportProgress for CountingProgress {
    fn start(&self, total: usize) {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    fn advance(&self) {
        self.advanced.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

fn order(number: &str) -> Order {
    Order::builder()
        .id(OrderId::new(format!("id-{number}")).unwrap())
        .order_number(number)
        .build()
        .unwrap()
}

fn failing_order(number: &str, kind: &str) -> Order {
    let mut order = order(number);
    order.fields.insert("fail".to_string(), json!(kind));
    order
}

/// Dispatcher that journals every event as `TOPIC(orderNumber[:error])`
fn journaling_dispatcher(journal: &Journal) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();

    let pre = journal.clone();
    dispatcher.listen(move |event: &mut PrepareExportEvent| {
        let number = event.order().order_number.clone().unwrap_or_default();
        pre.lock().unwrap().push(format!("PRE({number})"));
        Ok(())
    });

    let post = journal.clone();
    dispatcher.listen(move |event: &mut FinishExportEvent| {
        let number = event.order().order_number.clone().unwrap_or_default();
        post.lock().unwrap().push(format!("POST({number})"));
        Ok(())
    });

    let fail = journal.clone();
    dispatcher.listen(move |event: &mut FailedExportEvent| {
        let number = event.order().order_number.clone().unwrap_or_default();
        let entry = match event.error() {
            Some(e) if e.is_skippable() => format!("FAIL({number}:skippable)"),
            Some(_) => format!("FAIL({number}:error)"),
            None => format!("FAIL({number})"),
        };
        fail.lock().unwrap().push(entry);
        Ok(())
    });

    dispatcher
}

fn coordinator(
    dispatcher: EventDispatcher,
    storage: Arc<RecordingStorage>,
    settings: ExportSettings,
) -> ExportCoordinator {
    ExportCoordinator::new(
        dispatcher,
        storage,
        Arc::new(FlaggingRenderer),
        OrderNameGenerator::new("orders/{orderNumber}.xml").unwrap(),
        settings,
    )
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

#[tokio::test]
async fn test_progress_advances_once_per_order_regardless_of_outcome() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = journaling_dispatcher(&journal);
    dispatcher.listen(|event: &mut PrepareExportEvent| {
        if event.order().order_number.as_deref() == Some("2") {
            event.stop_propagation();
        }
        Ok(())
    });
    let coordinator = coordinator(dispatcher, storage, ExportSettings::new("order.xml"));
    let progress = CountingProgress::default();

    let orders = vec![
        order("1"),
        order("2"),
        failing_order("3", "skippable"),
        failing_order("4", "boom"),
        order("5"),
    ];
    let summary = coordinator.export_orders(orders, &progress).await.unwrap();

    assert_eq!(progress.started.load(Ordering::SeqCst), 1);
    assert_eq!(progress.total.load(Ordering::SeqCst), 5);
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 5);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);

    assert!(summary.completed);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.vetoed, 1);
    assert_eq!(summary.errored, 2);
    assert_eq!(summary.processed(), 5);
}

#[tokio::test]
async fn test_vetoed_order_is_not_written() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = journaling_dispatcher(&journal);
    dispatcher.listen(|event: &mut PrepareExportEvent| {
        if event.order().order_number.as_deref() == Some("A") {
            event.stop_propagation();
        }
        Ok(())
    });
    let coordinator = coordinator(dispatcher, storage.clone(), ExportSettings::new("order.xml"));
    let progress = CountingProgress::default();

    let summary = coordinator
        .export_orders(vec![order("A"), order("B")], &progress)
        .await
        .unwrap();

    assert_eq!(
        entries(&journal),
        vec!["PRE(A)", "FAIL(A)", "PRE(B)", "POST(B)"]
    );
    assert_eq!(storage.writes(), vec!["orders/B.xml"]);
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 2);
    assert!(summary.completed);
    assert_eq!(summary.failures[0].outcome, ExportOutcome::Vetoed);
    assert_eq!(summary.failures[0].path.as_deref(), Some("orders/A.xml"));
}

#[tokio::test]
async fn test_veto_skips_later_pre_export_listeners() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.listen(|event: &mut PrepareExportEvent| {
        event.stop_propagation();
        Ok(())
    });
    let late = journal.clone();
    dispatcher.listen(move |_: &mut PrepareExportEvent| {
        late.lock().unwrap().push("late".to_string());
        Ok(())
    });
    let coordinator = coordinator(dispatcher, storage.clone(), ExportSettings::new("order.xml"));

    let summary = coordinator
        .export_orders(vec![order("1")], &CountingProgress::default())
        .await
        .unwrap();

    assert!(entries(&journal).is_empty());
    assert!(storage.writes().is_empty());
    assert_eq!(summary.vetoed, 1);
}

#[tokio::test]
async fn test_successful_export_dispatches_single_post_event() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let coordinator = coordinator(
        journaling_dispatcher(&journal),
        storage.clone(),
        ExportSettings::new("order.xml"),
    );

    let summary = coordinator
        .export_orders(vec![order("1")], &CountingProgress::default())
        .await
        .unwrap();

    assert_eq!(entries(&journal), vec!["PRE(1)", "POST(1)"]);
    assert_eq!(storage.writes(), vec!["orders/1.xml"]);
    assert!(summary.is_successful());
    assert_eq!(summary.exported[0].checksum.len(), 64);
}

#[tokio::test]
async fn test_post_event_carries_path_and_checksum() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = EventDispatcher::new();
    let recorder = seen.clone();
    dispatcher.listen(move |event: &mut FinishExportEvent| {
        recorder
            .lock()
            .unwrap()
            .push((event.path().to_string(), event.checksum().to_string()));
        Ok(())
    });
    let coordinator = coordinator(dispatcher, storage, ExportSettings::new("order.xml"));

    let summary = coordinator
        .export_orders(vec![order("7")], &CountingProgress::default())
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, "orders/7.xml");
    assert_eq!(seen[0].1, summary.exported[0].checksum);
}

#[tokio::test]
async fn test_refused_writes_fail_without_error() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::refusing());
    let coordinator = coordinator(
        journaling_dispatcher(&journal),
        storage.clone(),
        ExportSettings::new("order.xml"),
    );
    let progress = CountingProgress::default();

    let summary = coordinator
        .export_orders(vec![order("1"), order("2"), order("3")], &progress)
        .await
        .unwrap();

    assert_eq!(
        entries(&journal),
        vec!["PRE(1)", "FAIL(1)", "PRE(2)", "FAIL(2)", "PRE(3)", "FAIL(3)"]
    );
    assert_eq!(storage.writes().len(), 3);
    assert!(summary.completed);
    assert_eq!(summary.write_failed, 3);
    assert!(!summary.is_successful());
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_skippable_error_is_isolated() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let coordinator = coordinator(
        journaling_dispatcher(&journal),
        storage.clone(),
        ExportSettings::new("order.xml"),
    );

    let summary = coordinator
        .export_orders(
            vec![failing_order("1", "skippable"), order("2")],
            &CountingProgress::default(),
        )
        .await
        .unwrap();

    assert_eq!(
        entries(&journal),
        vec!["PRE(1)", "FAIL(1:skippable)", "PRE(2)", "POST(2)"]
    );
    assert_eq!(storage.writes(), vec!["orders/2.xml"]);
    assert_eq!(summary.errored, 1);
    assert_eq!(
        summary.failures[0].message.as_deref(),
        Some("Order skipped: order has no lines")
    );
}

#[tokio::test]
async fn test_unclassified_error_continues_by_default() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let coordinator = coordinator(
        journaling_dispatcher(&journal),
        storage,
        ExportSettings::new("order.xml"),
    );

    let summary = coordinator
        .export_orders(
            vec![failing_order("1", "boom"), order("2")],
            &CountingProgress::default(),
        )
        .await
        .unwrap();

    assert_eq!(
        entries(&journal),
        vec!["PRE(1)", "FAIL(1:error)", "PRE(2)", "POST(2)"]
    );
    assert!(summary.completed);
}

#[tokio::test]
async fn test_unclassified_error_aborts_with_fail_fast() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let settings = ExportSettings {
        fail_fast: true,
        ..ExportSettings::new("order.xml")
    };
    let coordinator = coordinator(journaling_dispatcher(&journal), storage.clone(), settings);
    let progress = CountingProgress::default();

    let result = coordinator
        .export_orders(vec![failing_order("1", "boom"), order("2")], &progress)
        .await;

    assert!(matches!(result, Err(ExportError::Other(_))));
    assert_eq!(entries(&journal), vec!["PRE(1)"]);
    assert!(storage.writes().is_empty());
    assert_eq!(progress.finished.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_skippable_error_continues_with_fail_fast() {
    let storage = Arc::new(RecordingStorage::accepting());
    let settings = ExportSettings {
        fail_fast: true,
        ..ExportSettings::new("order.xml")
    };
    let coordinator = coordinator(EventDispatcher::new(), storage.clone(), settings);

    let summary = coordinator
        .export_orders(
            vec![failing_order("1", "skippable"), order("2")],
            &CountingProgress::default(),
        )
        .await
        .unwrap();

    assert_eq!(summary.errored, 1);
    assert_eq!(storage.writes(), vec!["orders/2.xml"]);
}

#[tokio::test]
async fn test_fatal_error_aborts_batch() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let coordinator = coordinator(
        journaling_dispatcher(&journal),
        storage.clone(),
        ExportSettings::new("order.xml"),
    );
    let progress = CountingProgress::default();

    let result = coordinator
        .export_orders(
            vec![order("1"), failing_order("2", "fatal"), order("3")],
            &progress,
        )
        .await;

    assert!(matches!(result, Err(ExportError::Fatal(_))));
    assert_eq!(entries(&journal), vec!["PRE(1)", "POST(1)", "PRE(2)"]);
    assert_eq!(storage.writes(), vec!["orders/1.xml"]);
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 1);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_fatal_listener_error_aborts_batch() {
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.listen(|_: &mut PrepareExportEvent| {
        Err(ExportError::Fatal("listener lost its connection".to_string()))
    });
    let coordinator = coordinator(dispatcher, storage.clone(), ExportSettings::new("order.xml"));

    let result = coordinator
        .export_orders(vec![order("1"), order("2")], &CountingProgress::default())
        .await;

    assert!(matches!(result, Err(ExportError::Fatal(_))));
    assert!(storage.writes().is_empty());
}

#[tokio::test]
async fn test_listener_export_data_reaches_template() {
    struct DataRenderer;

    impl TemplateRenderer for DataRenderer {
        fn render(&self, name: &str, data: &ExportData) -> Result<String> {
            Ok(render_source(name, "{{ channel }}:{{ order.id }}", data)?)
        }
    }

    #[derive(Default)]
    struct ContentStorage {
        contents: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl StorageSink for ContentStorage {
        async fn put(&self, _path: &str, content: &[u8]) -> bool {
            self.contents.lock().unwrap().push(content.to_vec());
            true
        }

        fn describe(&self) -> String {
            "content".to_string()
        }
    }

    let storage = Arc::new(ContentStorage::default());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.listen(|event: &mut PrepareExportEvent| {
        event.set_export_data("channel", json!("web"));
        Ok(())
    });
    let coordinator = ExportCoordinator::new(
        dispatcher,
        storage.clone(),
        Arc::new(DataRenderer),
        OrderNameGenerator::new("{id}.txt").unwrap(),
        ExportSettings::new("inline"),
    );

    coordinator
        .export_orders(vec![order("1")], &CountingProgress::default())
        .await
        .unwrap();

    assert_eq!(storage.contents.lock().unwrap()[0], b"web:id-1");
}

#[tokio::test]
async fn test_write_timeout_is_a_skippable_failure() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage {
        slow_path: Some("orders/1.xml".to_string()),
        ..RecordingStorage::accepting()
    });
    let settings = ExportSettings {
        write_timeout: Some(Duration::from_millis(50)),
        ..ExportSettings::new("order.xml")
    };
    let coordinator = coordinator(journaling_dispatcher(&journal), storage.clone(), settings);

    let summary = coordinator
        .export_orders(vec![order("1"), order("2")], &CountingProgress::default())
        .await
        .unwrap();

    assert_eq!(
        entries(&journal),
        vec!["PRE(1)", "FAIL(1:skippable)", "PRE(2)", "POST(2)"]
    );
    assert_eq!(storage.writes(), vec!["orders/2.xml"]);
    assert_eq!(summary.errored, 1);
    assert!(summary.failures[0]
        .message
        .as_deref()
        .is_some_and(|m| m.contains("timed out")));
}

#[tokio::test]
async fn test_write_timeout_does_not_interrupt_slow_listeners() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = journaling_dispatcher(&journal);
    dispatcher.listen(|_: &mut PrepareExportEvent| {
        std::thread::sleep(Duration::from_millis(150));
        Ok(())
    });
    let settings = ExportSettings {
        write_timeout: Some(Duration::from_millis(50)),
        ..ExportSettings::new("order.xml")
    };
    let coordinator = coordinator(dispatcher, storage.clone(), settings);

    let summary = coordinator
        .export_orders(vec![order("1")], &CountingProgress::default())
        .await
        .unwrap();

    assert_eq!(entries(&journal), vec!["PRE(1)", "POST(1)"]);
    assert_eq!(storage.writes(), vec!["orders/1.xml"]);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.errored, 0);
}

#[tokio::test]
async fn test_post_listener_error_counts_written_order_as_errored() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = journaling_dispatcher(&journal);
    dispatcher.listen(|event: &mut FinishExportEvent| {
        if event.order().order_number.as_deref() == Some("1") {
            return Err(ExportError::Other("notification queue is full".to_string()));
        }
        Ok(())
    });
    let coordinator = coordinator(dispatcher, storage.clone(), ExportSettings::new("order.xml"));
    let progress = CountingProgress::default();

    let summary = coordinator
        .export_orders(vec![order("1"), order("2")], &progress)
        .await
        .unwrap();

    assert_eq!(
        entries(&journal),
        vec!["PRE(1)", "POST(1)", "FAIL(1:error)", "PRE(2)", "POST(2)"]
    );
    assert_eq!(storage.writes(), vec!["orders/1.xml", "orders/2.xml"]);
    assert_eq!(summary.written, 1);
    assert_eq!(summary.errored, 1);
    assert_eq!(summary.exported[0].path, "orders/2.xml");
    assert_eq!(summary.failures[0].outcome, ExportOutcome::Errored);
    assert_eq!(summary.failures[0].path.as_deref(), Some("orders/1.xml"));
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 2);
    assert!(summary.completed);
}

#[tokio::test]
async fn test_failure_listener_error_is_logged_and_batch_continues() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = journaling_dispatcher(&journal);
    dispatcher.listen(|_: &mut FailedExportEvent| {
        Err(ExportError::Other("alerting is down".to_string()))
    });
    let coordinator = coordinator(dispatcher, storage.clone(), ExportSettings::new("order.xml"));
    let progress = CountingProgress::default();

    let summary = coordinator
        .export_orders(vec![failing_order("1", "skippable"), order("2")], &progress)
        .await
        .unwrap();

    assert_eq!(
        entries(&journal),
        vec!["PRE(1)", "FAIL(1:skippable)", "PRE(2)", "POST(2)"]
    );
    assert_eq!(storage.writes(), vec!["orders/2.xml"]);
    assert_eq!(summary.errored, 1);
    assert_eq!(summary.written, 1);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fatal_failure_listener_error_aborts_batch() {
    let journal = Journal::default();
    let storage = Arc::new(RecordingStorage::accepting());
    let mut dispatcher = journaling_dispatcher(&journal);
    dispatcher.listen(|_: &mut FailedExportEvent| {
        Err(ExportError::Fatal("alert sink lost".to_string()))
    });
    let coordinator = coordinator(dispatcher, storage.clone(), ExportSettings::new("order.xml"));
    let progress = CountingProgress::default();

    let result = coordinator
        .export_orders(vec![failing_order("1", "skippable"), order("2")], &progress)
        .await;

    assert!(matches!(result, Err(ExportError::Fatal(_))));
    assert_eq!(entries(&journal), vec!["PRE(1)", "FAIL(1:skippable)"]);
    assert!(storage.writes().is_empty());
    assert_eq!(progress.advanced.load(Ordering::SeqCst), 0);
    assert_eq!(progress.finished.load(Ordering::SeqCst), 0);
}
