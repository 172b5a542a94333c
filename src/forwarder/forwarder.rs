use std::{sync::Arc, thread};

use crate::{
    config::ForwarderConfig,
    forwarder::{
        bounded_queue::BoundedQueue,
        cancellation::CancellationSignal,
        consumer_loop::{ConsumerLoop, ConsumerState, StateCell},
        forwarder_handle::ForwarderHandle,
        overflow::OverflowHandler,
    },
    log::{
        log_level::LogLevel, log_sink::LogSink, log_value::LogValue, noop_log_sink::NoopLogSink,
        record::Record, record_sink::RecordSink,
    },
};

/// Bounded, non-blocking buffer between many producers and one slow sink.
///
/// # Architecture
///
/// 1. **Producers**: any thread calls [`submit`](Self::submit) or a cloned [`ForwarderHandle`].
/// 2. **Queue**: a fixed-capacity FIFO. When full, the new record goes to the
///    overflow handler, synchronously on the producer's thread, and is dropped.
/// 3. **Consumer**: one thread, spawned here, drains the queue into the sink
///    until the [`CancellationSignal`] fires. Queued records are then abandoned.
///
/// There is no close operation. After cancellation `submit` keeps working
/// until the undrained queue fills; from then on every submit is a drop.
pub struct Forwarder {
    handle: ForwarderHandle,
    state: StateCell,
    _consumer: Option<thread::JoinHandle<()>>,
}

impl Forwarder {
    /// Creates a forwarder with default policy and silent diagnostics.
    ///
    /// A `capacity` of 0 is accepted and drops every record.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rustylog::forwarder::{CancellationSignal, Forwarder, overflow};
    /// use rustylog::log::{LogLevel, Record};
    ///
    /// let cancel = CancellationSignal::new();
    /// let fwd = Forwarder::create(100, |r: Record| println!("{}", r.render()), overflow::discard(), cancel.clone());
    /// fwd.submit(LogLevel::Info, "hello", vec!["test".into(), 0.into()]);
    /// cancel.cancel();
    /// ```
    pub fn create<S: RecordSink>(
        capacity: usize,
        sink: S,
        on_overflow: OverflowHandler,
        cancel: CancellationSignal,
    ) -> Self {
        let config = ForwarderConfig {
            capacity,
            ..ForwarderConfig::default()
        };
        Self::start(config, sink, on_overflow, cancel, Arc::new(NoopLogSink))
    }

    /// Creates a forwarder from a full configuration.
    ///
    /// `diagnostics` receives the consumer's own lifecycle lines (never drops).
    /// The consumer thread is spawned before this returns.
    pub fn start<S: RecordSink>(
        config: ForwarderConfig,
        sink: S,
        on_overflow: OverflowHandler,
        cancel: CancellationSignal,
        diagnostics: Arc<dyn LogSink>,
    ) -> Self {
        let queue = Arc::new(BoundedQueue::new(config.capacity));
        let state = StateCell::running();

        let consumer = ConsumerLoop::new(
            Arc::clone(&queue),
            sink,
            cancel,
            config.severity,
            state.clone(),
            diagnostics,
        )
        .spawn(&config.thread_name);

        Self {
            handle: ForwarderHandle { queue, on_overflow },
            state,
            _consumer: consumer,
        }
    }

    /// Submits a record without blocking. See [`ForwarderHandle::submit`].
    #[inline]
    pub fn submit(&self, level: LogLevel, message: impl Into<String>, args: Vec<LogValue>) {
        self.handle.submit(level, message, args);
    }

    /// See [`ForwarderHandle::submit_from`].
    #[inline]
    pub fn submit_from(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        args: Vec<LogValue>,
        target: &'static str,
    ) {
        self.handle.submit_from(level, message, args, target);
    }

    /// See [`ForwarderHandle::submit_record`].
    #[inline]
    pub fn submit_record(&self, record: Record) {
        self.handle.submit_record(record);
    }

    /// Returns a cloneable producer handle sharing this forwarder's queue.
    #[must_use]
    pub fn handle(&self) -> ForwarderHandle {
        self.handle.clone()
    }

    #[must_use]
    pub fn state(&self) -> ConsumerState {
        self.state.get()
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.handle.queued()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.handle.capacity()
    }
}

impl LogSink for Forwarder {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        self.handle.log(level, msg, target);
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("capacity", &self.capacity())
            .field("queued", &self.queued())
            .field("state", &self.state())
            .finish()
    }
}
