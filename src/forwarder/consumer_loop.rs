use std::{
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
    thread,
};

use crate::{
    forwarder::{bounded_queue::BoundedQueue, cancellation::CancellationSignal},
    log::{log_level::LogLevel, log_sink::LogSink, record::Record, record_sink::RecordSink},
};
use crate::{sink_debug, sink_info, sink_warn};

/// Lifecycle of the consumer thread. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumerState {
    Running,
    Stopped,
}

/// Which drained records are handed to the sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeverityPolicy {
    /// Forward records of exactly this level; silently skip the rest.
    Only(LogLevel),
    /// Forward everything.
    All,
}

impl Default for SeverityPolicy {
    fn default() -> Self {
        SeverityPolicy::Only(LogLevel::Info)
    }
}

impl SeverityPolicy {
    #[must_use]
    pub fn forwards(self, level: LogLevel) -> bool {
        match self {
            SeverityPolicy::Only(l) => l == level,
            SeverityPolicy::All => true,
        }
    }
}

/// Consumer state readable from any thread.
#[derive(Debug, Clone)]
pub(crate) struct StateCell(Arc<AtomicU8>);

impl StateCell {
    const RUNNING: u8 = 0;
    const STOPPED: u8 = 1;

    pub(crate) fn running() -> Self {
        Self(Arc::new(AtomicU8::new(Self::RUNNING)))
    }

    pub(crate) fn get(&self) -> ConsumerState {
        match self.0.load(Ordering::SeqCst) {
            Self::RUNNING => ConsumerState::Running,
            _ => ConsumerState::Stopped,
        }
    }

    /// Returns `true` only for the call that actually stopped it.
    pub(crate) fn stop(&self) -> bool {
        self.0.swap(Self::STOPPED, Ordering::SeqCst) == Self::RUNNING
    }
}

/// The single task draining a forwarder's queue into its sink.
pub struct ConsumerLoop<S: RecordSink> {
    queue: Arc<BoundedQueue<Record>>,
    sink: S,
    cancel: CancellationSignal,
    policy: SeverityPolicy,
    state: StateCell,
    diagnostics: Arc<dyn LogSink>,
}

impl<S: RecordSink> ConsumerLoop<S> {
    /// Binds a loop to its queue, sink and stop signal.
    ///
    /// Cancelling `cancel` wakes the loop even while it waits on an empty queue.
    pub(crate) fn new(
        queue: Arc<BoundedQueue<Record>>,
        sink: S,
        cancel: CancellationSignal,
        policy: SeverityPolicy,
        state: StateCell,
        diagnostics: Arc<dyn LogSink>,
    ) -> Self {
        cancel.on_cancel_weak(&queue, BoundedQueue::wake);

        Self {
            queue,
            sink,
            cancel,
            policy,
            state,
            diagnostics,
        }
    }

    /// Spawns the loop on a named thread.
    ///
    /// If the thread cannot be spawned the state is set to `Stopped` and `None`
    /// is returned; the queue then simply fills and drops.
    pub(crate) fn spawn(self, thread_name: &str) -> Option<thread::JoinHandle<()>> {
        let state = self.state.clone();
        let diagnostics = Arc::clone(&self.diagnostics);

        match thread::Builder::new()
            .name(thread_name.to_owned())
            .spawn(move || self.run())
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                state.stop();
                sink_warn!(diagnostics, "[CONSUMER_LOOP] failed to spawn consumer: {}", e);
                None
            }
        }
    }

    /// Drains until cancelled. Records still queued at that point are abandoned.
    ///
    /// The sink is dropped, and so flushed, before the state reads `Stopped`.
    pub fn run(self) {
        let Self {
            queue,
            mut sink,
            cancel,
            policy,
            state,
            diagnostics,
        } = self;

        sink_info!(
            diagnostics,
            "[CONSUMER_LOOP] started (capacity {}, policy {:?})",
            queue.capacity(),
            policy
        );

        while let Some(record) = queue.wait_dequeue(|| cancel.is_cancelled()) {
            if policy.forwards(record.level()) {
                sink.accept(record);
            }
        }
        drop(sink);

        if state.stop() {
            sink_info!(
                diagnostics,
                "[CONSUMER_LOOP] stopped, {} queued records abandoned",
                queue.len()
            );
        } else {
            sink_debug!(diagnostics, "[CONSUMER_LOOP] already stopped");
        }
    }
}
