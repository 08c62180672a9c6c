//! Asynchronous delivery
//!
//! Every accepted record goes through one bounded channel to one worker
//! thread, which renders and writes it. A single queue with a single consumer
//! keeps each producer's records in submission order.
//!
//! `shutdown` drops the sending side and joins the worker. The worker only
//! exits once the channel is both disconnected and empty, so by the time the
//! join returns every record submitted earlier has reached its handlers.

use super::handler::SharedHandler;
use super::metrics::LoggerMetrics;
use super::record::Record;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{RwLock, RwLockWriteGuard};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Default number of records buffered between producers and the worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

const BATCH_SIZE: usize = 64;

/// A record together with the handlers it resolved to at submission time
pub(crate) struct Job {
    pub record: Record,
    pub handlers: Arc<[SharedHandler]>,
}

struct Worker {
    sender: Sender<Job>,
    handle: thread::JoinHandle<()>,
}

pub(crate) struct Pipeline {
    capacity: usize,
    worker: RwLock<Option<Worker>>,
    metrics: Arc<LoggerMetrics>,
}

impl Pipeline {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            worker: RwLock::new(None),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Queue `job`, starting the worker if none is running
    ///
    /// Blocks while the queue is full; records are never dropped here.
    pub fn submit(&self, job: Job) {
        self.metrics.record_submitted();

        {
            let worker = self.worker.read();
            if let Some(ref worker) = *worker {
                self.send(&worker.sender, job);
                return;
            }
        }

        let mut worker = self.worker.write();
        if worker.is_none() {
            match self.spawn() {
                Ok(spawned) => *worker = Some(spawned),
                Err(e) => {
                    eprintln!(
                        "[LOGGER ERROR] Failed to start delivery worker: {}. Writing synchronously.",
                        e
                    );
                    drop(worker);
                    process_batch(std::slice::from_ref(&job), &self.metrics);
                    return;
                }
            }
        }

        let worker = RwLockWriteGuard::downgrade(worker);
        if let Some(ref worker) = *worker {
            self.send(&worker.sender, job);
        }
    }

    fn send(&self, sender: &Sender<Job>, job: Job) {
        match sender.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(job)) => {
                self.metrics.record_block();
                if sender.send(job).is_err() {
                    self.report_disconnected();
                }
            }
            Err(TrySendError::Disconnected(_)) => self.report_disconnected(),
        }
    }

    fn report_disconnected(&self) {
        self.metrics.record_dropped();
        eprintln!("[LOGGER ERROR] {}", super::error::LoggerError::ChannelSendError);
    }

    fn spawn(&self) -> std::io::Result<Worker> {
        let (sender, receiver) = bounded(self.capacity);
        let metrics = Arc::clone(&self.metrics);
        let handle = thread::Builder::new()
            .name("logtree-delivery".to_string())
            .spawn(move || run(receiver, metrics))?;
        Ok(Worker { sender, handle })
    }

    /// Stop the worker after it has written everything queued so far
    ///
    /// Producers arriving meanwhile wait for the drain to finish and then
    /// start a fresh worker.
    pub fn shutdown(&self) {
        let mut worker = self.worker.write();
        let Some(Worker { sender, handle }) = worker.take() else {
            return;
        };

        drop(sender);
        if let Err(panic) = handle.join() {
            eprintln!(
                "[LOGGER ERROR] Delivery worker panicked during shutdown: {}",
                panic_message(panic.as_ref())
            );
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.read().is_some()
    }
}

fn run(receiver: Receiver<Job>, metrics: Arc<LoggerMetrics>) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    // recv only fails once every sender is gone and the queue is empty
    while let Ok(job) = receiver.recv() {
        batch.push(job);
        while batch.len() < BATCH_SIZE {
            match receiver.try_recv() {
                Ok(job) => batch.push(job),
                Err(_) => break,
            }
        }

        process_batch(&batch, &metrics);
        batch.clear();
    }
}

/// Write every job of `batch`, then flush each handler the batch touched
///
/// Each handler call is isolated with `catch_unwind` so one failing handler
/// never stops delivery to the others.
fn process_batch(batch: &[Job], metrics: &LoggerMetrics) {
    let mut touched: Vec<&SharedHandler> = Vec::new();

    for job in batch {
        let mut has_error = false;

        for handler in job.handlers.iter() {
            let result = catch_unwind(AssertUnwindSafe(|| handler.handle(&job.record)));
            match result {
                Ok(Ok(())) => {}
                // closed after shutdown: counted as dropped, not reported
                Ok(Err(super::error::LoggerError::HandlerClosed(_))) => has_error = true,
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Handler '{}' failed: {}", handler.name(), e);
                    has_error = true;
                }
                Err(panic) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Handler '{}' panicked: {}. \
                         Other handlers continue to function.",
                        handler.name(),
                        panic_message(panic.as_ref())
                    );
                    has_error = true;
                }
            }

            if !touched.iter().any(|&h| Arc::ptr_eq(h, handler)) {
                touched.push(handler);
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_logged();
        }
    }

    for handler in touched {
        match catch_unwind(AssertUnwindSafe(|| handler.flush())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Handler '{}' flush failed: {}", handler.name(), e);
            }
            Err(panic) => {
                eprintln!(
                    "[LOGGER CRITICAL] Handler '{}' panicked during flush: {}",
                    handler.name(),
                    panic_message(panic.as_ref())
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
