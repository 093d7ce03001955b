//! Batch orchestration: a worker pool over single-item processing.
//!
//! A submitted batch runs on a bounded pool. Events are delivered as
//! items finish, tagged with the submission index so callers can show
//! incremental progress and still reassemble input order at the end.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::config::Config;
use crate::types::ProcessingResult;

use super::item::process_one;

/// One finished item, emitted as soon as its worker completes.
#[derive(Debug)]
pub struct BatchEvent {
    /// Position of this input in the submitted batch
    pub index: usize,
    pub result: ProcessingResult,
}

/// Handle to a running batch: an event stream plus cancellation.
pub struct BatchHandle {
    events: mpsc::Receiver<BatchEvent>,
    cancelled: Arc<AtomicBool>,
    total: usize,
}

impl BatchHandle {
    /// Next finished item, in completion order. `None` once the batch
    /// is drained (or was cancelled and all in-flight items finished).
    pub async fn next_event(&mut self) -> Option<BatchEvent> {
        self.events.recv().await
    }

    /// Stop starting new items. Items already running finish and still
    /// produce events; unstarted items produce none.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Number of inputs submitted.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Drain all remaining events and return results in input order.
    pub async fn collect(mut self) -> Vec<ProcessingResult> {
        let mut slots: Vec<Option<ProcessingResult>> = Vec::with_capacity(self.total);
        slots.resize_with(self.total, || None);
        while let Some(event) = self.events.recv().await {
            slots[event.index] = Some(event.result);
        }
        slots.into_iter().flatten().collect()
    }
}

/// Runs batches of inputs through the sanitizing pipeline.
pub struct Processor {
    config: Arc<Config>,
}

impl Processor {
    /// Create a new processor with the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            config: Arc::new(config.clone()),
        }
    }

    /// Submit a batch. Returns immediately with a handle; work proceeds
    /// on at most `processing.parallel_workers` items at a time.
    pub fn submit(&self, inputs: Vec<PathBuf>) -> BatchHandle {
        let total = inputs.len();
        let (tx, rx) = mpsc::channel(total.max(1));
        let cancelled = Arc::new(AtomicBool::new(false));
        let semaphore = Arc::new(Semaphore::new(self.config.processing.parallel_workers));
        let config = Arc::clone(&self.config);
        let cancel_flag = Arc::clone(&cancelled);

        tracing::info!(total, workers = config.processing.parallel_workers, "batch submitted");

        tokio::spawn(async move {
            let mut workers = JoinSet::new();
            for (index, path) in inputs.into_iter().enumerate() {
                // Acquire before checking the flag so cancellation takes
                // effect at the next free worker slot.
                let permit = match Arc::clone(&semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                if cancel_flag.load(Ordering::SeqCst) {
                    tracing::info!(remaining = index, "batch cancelled");
                    break;
                }

                let tx = tx.clone();
                let config = Arc::clone(&config);
                workers.spawn(async move {
                    let _permit = permit;
                    let result =
                        tokio::task::spawn_blocking(move || process_one(&path, &config)).await;
                    if let Ok(result) = result {
                        let _ = tx.send(BatchEvent { index, result }).await;
                    }
                });
            }
            while workers.join_next().await.is_some() {}
        });

        BatchHandle {
            events: rx,
            cancelled,
            total,
        }
    }
}
