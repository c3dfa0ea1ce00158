//! Background search index sync worker.
//!
//! Index propagation is best-effort: the canonical store is the source of
//! truth, and a failed push is logged and counted but never reaches back
//! into the triggering call. A later commit re-enqueues a fresh projection.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, Sender};

use crate::config::IndexSyncConfig;
use crate::core::{ComponentRecord, VendorKey};
use crate::error::Transience;
use crate::metrics;
use crate::store::SearchIndex;

use super::IndexDocument;

enum SyncCommand {
    Job(Box<ComponentRecord>),
    Shutdown,
}

struct SyncContext {
    index: Arc<dyn SearchIndex>,
    preferred: VendorKey,
    cfg: IndexSyncConfig,
}

/// Handle to the index sync worker thread.
pub struct IndexSyncHandle {
    tx: Sender<SyncCommand>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl IndexSyncHandle {
    pub fn start(
        index: Arc<dyn SearchIndex>,
        preferred: VendorKey,
        cfg: IndexSyncConfig,
    ) -> Self {
        let (tx, rx) = crossbeam::channel::unbounded();
        let ctx = SyncContext {
            index,
            preferred,
            cfg,
        };
        let worker = thread::Builder::new()
            .name("index-sync".to_string())
            .spawn(move || run_sync_loop(ctx, rx))
            .expect("spawn index sync worker");
        Self {
            tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue a committed record for projection. Never blocks; an error
    /// means the worker is gone and the projection will lag until the next
    /// commit.
    pub fn enqueue(&self, record: ComponentRecord) -> Result<(), ()> {
        self.tx
            .send(SyncCommand::Job(Box::new(record)))
            .map_err(|_| ())
    }

    /// Stop the worker after it drains already-queued jobs.
    pub fn shutdown(&self) {
        let _ = self.tx.send(SyncCommand::Shutdown);
        let handle = self
            .worker
            .lock()
            .expect("index sync worker lock poisoned")
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

fn run_sync_loop(ctx: SyncContext, rx: Receiver<SyncCommand>) {
    while let Ok(cmd) = rx.recv() {
        match cmd {
            SyncCommand::Job(record) => push_with_retry(&ctx, &record),
            SyncCommand::Shutdown => break,
        }
    }
}

fn push_with_retry(ctx: &SyncContext, record: &ComponentRecord) {
    let doc = IndexDocument::derive(record, &ctx.preferred);
    let deadline = Instant::now() + Duration::from_millis(ctx.cfg.job_deadline_ms);
    let mut retry = RetryState::new(&ctx.cfg);

    loop {
        let start = Instant::now();
        match ctx.index.upsert(&doc) {
            Ok(()) => {
                metrics::index_sync_ok(start.elapsed());
                if retry.failures > 0 {
                    tracing::debug!(
                        object_id = %doc.object_id,
                        attempts = retry.failures + 1,
                        "index sync recovered"
                    );
                }
                return;
            }
            Err(err) => {
                metrics::index_sync_err(start.elapsed());
                retry.record_failure();

                if err.transience == Transience::Permanent {
                    tracing::warn!(
                        object_id = %doc.object_id,
                        error = %err,
                        "index sync failed permanently, dropping"
                    );
                    metrics::index_sync_dropped("permanent");
                    return;
                }
                if retry.failures >= ctx.cfg.max_attempts {
                    tracing::warn!(
                        object_id = %doc.object_id,
                        error = %err,
                        attempts = retry.failures,
                        "index sync attempts exhausted, dropping"
                    );
                    metrics::index_sync_dropped("exhausted");
                    return;
                }
                let delay = retry.backoff();
                if Instant::now() + delay >= deadline {
                    tracing::warn!(
                        object_id = %doc.object_id,
                        error = %err,
                        attempts = retry.failures,
                        "index sync deadline exceeded, dropping"
                    );
                    metrics::index_sync_dropped("deadline");
                    return;
                }
                metrics::index_sync_retry();
                thread::sleep(delay);
            }
        }
    }
}

/// Consecutive-failure backoff state for one job.
struct RetryState {
    failures: u32,
    base_ms: u64,
    max_ms: u64,
}

impl RetryState {
    fn new(cfg: &IndexSyncConfig) -> Self {
        Self {
            failures: 0,
            base_ms: cfg.backoff_base_ms.max(1),
            max_ms: cfg.backoff_max_ms.max(1),
        }
    }

    fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Exponential delay for the next attempt, capped, with +-25% jitter.
    fn backoff(&self) -> Duration {
        use rand::Rng;

        let exponent = self.failures.saturating_sub(1).min(16);
        let raw = self
            .base_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_ms);
        let spread = raw / 4;
        let ms = if spread == 0 {
            raw
        } else {
            rand::rng().random_range(raw - spread..=raw + spread)
        };
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ComponentId, VendorOffer};
    use crate::store::MemoryIndex;

    fn preferred() -> VendorKey {
        VendorKey::parse("spartangeek").unwrap()
    }

    fn fast_cfg() -> IndexSyncConfig {
        IndexSyncConfig {
            backoff_base_ms: 1,
            backoff_max_ms: 4,
            max_attempts: 4,
            job_deadline_ms: 10_000,
        }
    }

    fn record(id: &str) -> ComponentRecord {
        let mut rec = ComponentRecord::new(ComponentId::parse(id).unwrap(), "RTX 4090");
        rec.activated = true;
        rec.offers.vendors.insert(
            preferred(),
            VendorOffer {
                price: 10.0,
                stock: 2,
                priority: 1,
            },
        );
        rec
    }

    #[test]
    fn backoff_grows_exponentially_and_caps() {
        let cfg = IndexSyncConfig {
            backoff_base_ms: 100,
            backoff_max_ms: 800,
            max_attempts: 10,
            job_deadline_ms: 60_000,
        };
        let mut retry = RetryState::new(&cfg);

        retry.record_failure();
        let first = retry.backoff().as_millis() as u64;
        assert!((75..=125).contains(&first), "got {first}");

        retry.record_failure();
        retry.record_failure();
        let third = retry.backoff().as_millis() as u64;
        assert!((300..=500).contains(&third), "got {third}");

        for _ in 0..10 {
            retry.record_failure();
        }
        let capped = retry.backoff().as_millis() as u64;
        assert!(capped <= 1_000, "got {capped}");
    }

    #[test]
    fn worker_pushes_queued_jobs() {
        let index = Arc::new(MemoryIndex::new());
        let handle = IndexSyncHandle::start(index.clone(), preferred(), fast_cfg());

        handle.enqueue(record("comp-1")).unwrap();
        handle.enqueue(record("comp-2")).unwrap();
        handle.shutdown();

        assert_eq!(index.len(), 2);
        let doc = index.doc("comp-1").unwrap();
        assert_eq!(doc.price, Some(10.0));
    }

    #[test]
    fn worker_retries_transient_failures() {
        let index = Arc::new(MemoryIndex::new());
        index.fail_next_upserts(2);
        let handle = IndexSyncHandle::start(index.clone(), preferred(), fast_cfg());

        handle.enqueue(record("comp-1")).unwrap();
        handle.shutdown();

        assert_eq!(index.attempts(), 3);
        assert!(index.doc("comp-1").is_some());
    }

    #[test]
    fn worker_drops_after_exhausting_attempts() {
        let index = Arc::new(MemoryIndex::new());
        index.fail_next_upserts(10);
        let handle = IndexSyncHandle::start(index.clone(), preferred(), fast_cfg());

        handle.enqueue(record("comp-1")).unwrap();
        handle.shutdown();

        assert_eq!(index.attempts(), 4);
        assert!(index.doc("comp-1").is_none());
    }

    #[test]
    fn permanent_failure_short_circuits() {
        let index = Arc::new(MemoryIndex::new());
        index.fail_next_upserts_permanent(10);
        let handle = IndexSyncHandle::start(index.clone(), preferred(), fast_cfg());

        handle.enqueue(record("comp-1")).unwrap();
        handle.shutdown();

        assert_eq!(index.attempts(), 1);
    }

    #[test]
    fn enqueue_after_shutdown_reports_unavailable() {
        let index = Arc::new(MemoryIndex::new());
        let handle = IndexSyncHandle::start(index, preferred(), fast_cfg());
        handle.shutdown();

        // The worker exited and dropped its receiver; the send fails
        // without blocking.
        assert!(handle.enqueue(record("comp-1")).is_err());
    }
}
