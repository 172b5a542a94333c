use std::sync::Arc;

use crate::{
    forwarder::{bounded_queue::BoundedQueue, overflow::OverflowHandler},
    log::{log_level::LogLevel, log_sink::LogSink, log_value::LogValue, record::Record},
};

/// Lightweight, cloneable producer side of a [`Forwarder`](super::Forwarder).
///
/// Every clone enqueues into the same bounded queue. Submitting never blocks:
/// if the queue is full the record goes to the overflow handler, on the
/// caller's thread, and is discarded.
///
/// Typical usage is to obtain it from the `Forwarder` and clone it per thread.
///
/// # Examples
/// ```ignore
/// let handle = forwarder.handle();
/// handle.submit(LogLevel::Info, "started task", vec!["id".into(), 7.into()]);
/// ```
#[derive(Clone)]
pub struct ForwarderHandle {
    pub(super) queue: Arc<BoundedQueue<Record>>,
    pub(super) on_overflow: OverflowHandler,
}

impl ForwarderHandle {
    /// Fire-and-forget submit of a new record.
    ///
    /// The record's target is this module; use [`submit_from`](Self::submit_from)
    /// or the `submit!` macro to record the caller's module instead.
    pub fn submit(&self, level: LogLevel, message: impl Into<String>, args: Vec<LogValue>) {
        self.submit_from(level, message, args, module_path!());
    }

    /// Like [`submit`](Self::submit) with an explicit target (used by `submit!`).
    pub fn submit_from(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        args: Vec<LogValue>,
        target: &'static str,
    ) {
        self.submit_record(Record::new(level, message, args, target));
    }

    /// Enqueues an already built record, or hands it to the overflow handler.
    pub fn submit_record(&self, record: Record) {
        if let Err(record) = self.queue.try_enqueue(record) {
            (self.on_overflow)(record);
        }
    }

    /// Records currently waiting to be drained.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl LogSink for ForwarderHandle {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        self.submit_from(level, msg, Vec::new(), target);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::forwarder::overflow::DropCounter;
    use crate::sink_info;
    use std::sync::Mutex;

    fn handle_with(capacity: usize, on_overflow: OverflowHandler) -> ForwarderHandle {
        ForwarderHandle {
            queue: Arc::new(BoundedQueue::new(capacity)),
            on_overflow,
        }
    }

    #[test]
    fn submit_enqueues_when_room() {
        let counter = DropCounter::new();
        let h = handle_with(2, counter.handler());

        h.submit(LogLevel::Info, "hello", vec!["test".into(), 0.into()]);

        let rec = h.queue.try_dequeue().expect("a record should be queued");
        assert_eq!(rec.level(), LogLevel::Info);
        assert_eq!(rec.message(), "hello");
        assert_eq!(rec.args(), &[LogValue::from("test"), LogValue::from(0)]);
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn overflow_handler_gets_the_rejected_record() {
        let dropped = Arc::new(Mutex::new(Vec::new()));
        let dropped2 = dropped.clone();
        let h = handle_with(
            1,
            Arc::new(move |r: Record| dropped2.lock().unwrap().push(r.message().to_owned())),
        );

        h.submit(LogLevel::Info, "first", vec![]);
        h.submit(LogLevel::Info, "second", vec![]);

        assert_eq!(*dropped.lock().unwrap(), vec!["second"]);
        assert_eq!(h.queued(), 1);
    }

    #[test]
    fn log_sink_macros_feed_the_queue() {
        let h = handle_with(4, crate::forwarder::overflow::discard());
        sink_info!(h, "peer {} connected", 3);

        let rec = h.queue.try_dequeue().expect("queued");
        assert_eq!(rec.message(), "peer 3 connected");
        assert!(rec.args().is_empty());
    }

    #[test]
    fn submit_macro_carries_args_and_target() {
        let h = handle_with(4, crate::forwarder::overflow::discard());
        crate::submit!(h, LogLevel::Info, "rate limited", "op", "read", "peer", 3);

        let rec = h.queue.try_dequeue().expect("queued");
        assert_eq!(rec.render(), "rate limited op=read peer=3");
        assert_eq!(rec.target(), module_path!());
    }
}
