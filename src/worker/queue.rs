//! The background work queue
//!
//! One unbounded FIFO channel, many producers, one dedicated consumer
//! thread. Producers never block. The channel lives as long as the worker,
//! so a stopped worker keeps accepting messages for its next start; only
//! `shutdown` closes it for good.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::message::{targets, TelemetryMessage, WorkerMessage};
use crate::observability::{DispatchSpan, SpanExt, WorkerMetrics};
use crate::platform::ErrorInfo;
use crate::processors::Processor;

const THREAD_NAME: &str = "rumbridge-worker";

/// Errors from controlling the worker
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker has been shut down")]
    ShutDown,
}

/// A message plus the time it entered the queue
struct Envelope {
    message: WorkerMessage,
    enqueued_at: Instant,
}

enum Slot {
    Message(Envelope),
    /// Sent by `stop`; the thread exits after draining what follows it
    Close,
}

/// State shared with the worker thread
struct Dispatcher {
    processors: RwLock<HashMap<String, Arc<dyn Processor>>>,
    metrics: Arc<WorkerMetrics>,
}

impl Dispatcher {
    fn processor(&self, target: &str) -> Option<Arc<dyn Processor>> {
        self.processors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned()
    }

    fn run(&self, receiver: Receiver<Slot>) {
        debug!("Worker thread started");
        for slot in receiver.iter() {
            match slot {
                Slot::Message(envelope) => self.dispatch(envelope),
                Slot::Close => break,
            }
        }
        // Messages that raced the close signal
        let late = self.drain(&receiver);
        debug!(late, "Worker thread drained");
    }

    /// Dispatch what is queued right now, without waiting for more.
    fn drain(&self, receiver: &Receiver<Slot>) -> usize {
        let mut drained = 0;
        for _ in 0..receiver.len() {
            match receiver.try_recv() {
                Ok(Slot::Message(envelope)) => {
                    self.dispatch(envelope);
                    drained += 1;
                }
                Ok(Slot::Close) => {}
                Err(_) => break,
            }
        }
        drained
    }

    fn dispatch(&self, envelope: Envelope) {
        let Envelope {
            message,
            enqueued_at,
        } = envelope;
        let target = message.feature_target();
        self.metrics.record_queue_wait(target, enqueued_at.elapsed());

        let Some(processor) = self.processor(target) else {
            self.metrics.record_unrouted(target);
            warn!(feature = target, kind = message.kind(), "No processor registered");
            message.discard();
            self.report_error(
                target,
                format!("Attempting to send message to unknown feature: {target}"),
                None,
            );
            return;
        };

        let kind = message.kind();
        let span = DispatchSpan::new(target);
        let _enter = span.enter();
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| processor.process(message)));
        let elapsed = started.elapsed();
        span.record_duration_ms(elapsed.as_secs_f64() * 1000.0);

        match outcome {
            Ok(Ok(())) => {
                span.record_success(true);
                self.metrics.record_processed(target, elapsed);
                trace!(feature = target, kind, "Message processed");
            }
            Ok(Err(e)) => {
                span.record_success(false);
                self.metrics.record_failed(target, elapsed);
                warn!(feature = target, kind, error = %e, "Message processing failed");
                self.report_error(
                    target,
                    format!("Error processing {target}.{kind} message: {e}"),
                    Some(ErrorInfo::from_error(&e).with_kind("ProcessError")),
                );
            }
            Err(payload) => {
                span.record_success(false);
                self.metrics.record_panicked(target, elapsed);
                let reason = panic_message(payload.as_ref());
                warn!(feature = target, kind, panic = %reason, "Processor panicked");
                self.report_error(
                    target,
                    format!("Panic processing {target}.{kind} message: {reason}"),
                    Some(ErrorInfo::new(reason).with_kind("panic")),
                );
            }
        }
    }

    /// Send an error straight to the telemetry processor.
    ///
    /// Failures of telemetry messages themselves are only logged locally.
    fn report_error(&self, failed_target: &str, message: String, error: Option<ErrorInfo>) {
        if failed_target == targets::TELEMETRY {
            return;
        }
        let Some(telemetry) = self.processor(targets::TELEMETRY) else {
            return;
        };
        let report = WorkerMessage::Telemetry(TelemetryMessage::Error { message, error });
        match panic::catch_unwind(AssertUnwindSafe(|| telemetry.process(report))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to report processing error"),
            Err(payload) => warn!(
                panic = %panic_message(payload.as_ref()),
                "Telemetry processor panicked while reporting an error"
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Single-consumer background work queue.
///
/// Messages may be added at any time, including before [`start`](Self::start)
/// and between `stop` and the next `start`; they are dispatched in global
/// arrival order by one worker thread. After [`shutdown`](Self::shutdown)
/// new messages are dropped.
pub struct Worker {
    dispatcher: Arc<Dispatcher>,
    sender: RwLock<Option<Sender<Slot>>>,
    receiver: Receiver<Slot>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Worker {
    fn default() -> Self {
        Self::new()
    }
}

impl Worker {
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(WorkerMetrics::new()))
    }

    /// Create a worker that records into `metrics`.
    pub fn with_metrics(metrics: Arc<WorkerMetrics>) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            dispatcher: Arc::new(Dispatcher {
                processors: RwLock::new(HashMap::new()),
                metrics,
            }),
            sender: RwLock::new(Some(sender)),
            receiver,
            handle: Mutex::new(None),
        }
    }

    fn sender(&self) -> RwLockReadGuard<'_, Option<Sender<Slot>>> {
        self.sender.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn sender_mut(&self) -> RwLockWriteGuard<'_, Option<Sender<Slot>>> {
        self.sender.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn metrics(&self) -> &Arc<WorkerMetrics> {
        &self.dispatcher.metrics
    }

    /// Register the processor for `feature`.
    ///
    /// The first registration wins; later ones are ignored and return `false`.
    pub fn add_processor(&self, feature: &str, processor: Arc<dyn Processor>) -> bool {
        let mut processors = self
            .dispatcher
            .processors
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if processors.contains_key(feature) {
            debug!(feature, "Processor already registered, ignoring");
            return false;
        }
        processors.insert(feature.to_string(), processor);
        true
    }

    pub fn has_processor(&self, feature: &str) -> bool {
        self.dispatcher.processor(feature).is_some()
    }

    /// Queue a message. Never blocks.
    pub fn add_message(&self, message: WorkerMessage) {
        let target = message.feature_target();
        // Held across the send so `shutdown` cannot close the queue under us
        let sender = self.sender();
        let Some(sender) = sender.as_ref() else {
            debug!(feature = target, "Worker shut down, dropping message");
            message.discard();
            return;
        };

        let envelope = Envelope {
            message,
            enqueued_at: Instant::now(),
        };
        if let Err(e) = sender.send(Slot::Message(envelope)) {
            warn!(feature = target, "Work queue disconnected, dropping message");
            if let Slot::Message(envelope) = e.into_inner() {
                envelope.message.discard();
            }
            return;
        }
        self.dispatcher.metrics.record_enqueued(target);
    }

    /// Messages waiting to be dispatched.
    pub fn queue_depth(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_running(&self) -> bool {
        self.handle().is_some()
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender().is_none()
    }

    /// Spawn the worker thread. Does nothing if it is already running.
    pub fn start(&self) -> Result<(), WorkerError> {
        let mut handle = self.handle();
        if handle.is_some() {
            return Ok(());
        }
        if self.is_shut_down() {
            return Err(WorkerError::ShutDown);
        }

        let receiver = self.receiver.clone();
        let dispatcher = Arc::clone(&self.dispatcher);
        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || dispatcher.run(receiver))?;
        *handle = Some(thread);

        debug!(queue_depth = self.queue_depth(), "Worker started");
        Ok(())
    }

    /// Signal the worker thread to finish and wait for it. Does nothing if
    /// the worker is not running.
    ///
    /// Everything queued before the signal is dispatched, as is anything
    /// added while the thread is finishing. Messages added after the thread
    /// exits stay queued for the next `start`.
    pub fn stop(&self) {
        let mut handle = self.handle();
        self.stop_locked(&mut handle);
    }

    fn stop_locked(&self, handle: &mut Option<JoinHandle<()>>) {
        let Some(thread) = handle.take() else {
            return;
        };

        debug!(pending = self.queue_depth(), "Worker stopping");
        if let Some(sender) = self.sender().as_ref() {
            if sender.send(Slot::Close).is_err() {
                warn!("Work queue disconnected while stopping");
            }
        }

        if thread.join().is_err() {
            warn!("Worker thread exited abnormally");
        }
        debug!("Worker stopped");
    }

    /// Stop the worker, close the queue and dispatch whatever is left on
    /// the calling thread. Later messages are dropped and `start` fails.
    pub fn shutdown(&self) {
        let mut handle = self.handle();
        self.stop_locked(&mut handle);

        let Some(sender) = self.sender_mut().take() else {
            return;
        };
        drop(sender);

        let late = self.dispatcher.drain(&self.receiver);
        debug!(late, "Worker shut down");
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
