//! Minimal metrics emission helpers.
//!
//! Metrics are emitted as structured tracing events by default. A custom
//! sink can be installed to capture emissions in tests or to bridge into a
//! metrics backend.

use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetricValue {
    Counter(u64),
    Histogram(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricLabel {
    pub key: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricEvent {
    pub name: &'static str,
    pub value: MetricValue,
    pub labels: Vec<MetricLabel>,
}

pub trait MetricSink: Send + Sync {
    fn record(&self, event: MetricEvent);
}

struct TracingSink;

impl MetricSink for TracingSink {
    fn record(&self, event: MetricEvent) {
        match event.value {
            MetricValue::Counter(value) => {
                tracing::info!(
                    target: "metrics",
                    metric = event.name,
                    value,
                    labels = ?event.labels
                );
            }
            MetricValue::Histogram(value) => {
                tracing::info!(
                    target: "metrics",
                    metric = event.name,
                    value,
                    labels = ?event.labels
                );
            }
        }
    }
}

static METRIC_SINK: std::sync::OnceLock<RwLock<Arc<dyn MetricSink>>> = std::sync::OnceLock::new();

fn sink() -> Arc<dyn MetricSink> {
    METRIC_SINK
        .get_or_init(|| RwLock::new(Arc::new(TracingSink)))
        .read()
        .expect("metrics sink lock poisoned")
        .clone()
}

pub fn set_sink(sink: Arc<dyn MetricSink>) {
    let lock = METRIC_SINK.get_or_init(|| RwLock::new(Arc::new(TracingSink)));
    *lock.write().expect("metrics sink lock poisoned") = sink;
}

fn emit(name: &'static str, value: MetricValue, labels: Vec<MetricLabel>) {
    sink().record(MetricEvent { name, value, labels });
}

fn duration_ms(duration: Duration) -> u64 {
    let ms = duration.as_millis();
    u64::try_from(ms).unwrap_or(u64::MAX)
}

pub fn price_update_ok(duration: Duration) {
    emit("price_update_ok", MetricValue::Counter(1), Vec::new());
    emit(
        "price_update_duration",
        MetricValue::Histogram(duration_ms(duration)),
        Vec::new(),
    );
}

pub fn price_update_err(duration: Duration) {
    emit("price_update_err", MetricValue::Counter(1), Vec::new());
    emit(
        "price_update_duration",
        MetricValue::Histogram(duration_ms(duration)),
        Vec::new(),
    );
}

pub fn price_delete_ok(duration: Duration) {
    emit("price_delete_ok", MetricValue::Counter(1), Vec::new());
    emit(
        "price_delete_duration",
        MetricValue::Histogram(duration_ms(duration)),
        Vec::new(),
    );
}

pub fn price_delete_err(duration: Duration) {
    emit("price_delete_err", MetricValue::Counter(1), Vec::new());
    emit(
        "price_delete_duration",
        MetricValue::Histogram(duration_ms(duration)),
        Vec::new(),
    );
}

pub fn snapshot_appended() {
    emit("snapshot_appended", MetricValue::Counter(1), Vec::new());
}

pub fn index_sync_ok(duration: Duration) {
    emit("index_sync_ok", MetricValue::Counter(1), Vec::new());
    emit(
        "index_sync_duration",
        MetricValue::Histogram(duration_ms(duration)),
        Vec::new(),
    );
}

pub fn index_sync_err(duration: Duration) {
    emit("index_sync_err", MetricValue::Counter(1), Vec::new());
    emit(
        "index_sync_duration",
        MetricValue::Histogram(duration_ms(duration)),
        Vec::new(),
    );
}

pub fn index_sync_retry() {
    emit("index_sync_retry", MetricValue::Counter(1), Vec::new());
}

pub fn index_sync_dropped(reason: &'static str) {
    emit(
        "index_sync_dropped",
        MetricValue::Counter(1),
        vec![MetricLabel {
            key: "reason",
            value: reason.to_string(),
        }],
    );
}

pub fn index_sync_enqueue_failed() {
    emit(
        "index_sync_enqueue_failed",
        MetricValue::Counter(1),
        Vec::new(),
    );
}
