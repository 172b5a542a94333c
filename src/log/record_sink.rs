use std::sync::Arc;

use crate::log::{log_sink::LogSink, record::Record};

/// Downstream destination for drained records.
///
/// Only the forwarder's consumer thread ever calls [`accept`](Self::accept), so
/// implementations get `&mut self` and need no internal locking. Errors are
/// the sink's own business: `accept` has nothing to report back.
pub trait RecordSink: Send + 'static {
    fn accept(&mut self, record: Record);
}

impl<F> RecordSink for F
where
    F: FnMut(Record) + Send + 'static,
{
    #[inline]
    fn accept(&mut self, record: Record) {
        self(record);
    }
}

/// Forwards drained records into another [`LogSink`], rendering args inline.
#[derive(Clone)]
pub struct LogSinkAdapter {
    inner: Arc<dyn LogSink>,
}

impl LogSinkAdapter {
    pub fn new(inner: Arc<dyn LogSink>) -> Self {
        Self { inner }
    }
}

impl RecordSink for LogSinkAdapter {
    fn accept(&mut self, record: Record) {
        self.inner
            .log(record.level(), &record.render(), record.target());
    }
}
