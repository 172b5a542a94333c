use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::log::record::Record;

/// Called with each record that did not fit in the queue.
///
/// It runs synchronously on the submitting producer's thread, so a slow
/// handler slows that producer. It may be called from many threads at once
/// and must not submit back into the same forwarder.
pub type OverflowHandler = Arc<dyn Fn(Record) + Send + Sync>;

/// A handler that drops the record and does nothing else.
#[must_use]
pub fn discard() -> OverflowHandler {
    Arc::new(|_record: Record| {})
}

/// Counts dropped records. Clones share the count.
#[derive(Debug, Clone, Default)]
pub struct DropCounter {
    dropped: Arc<AtomicU64>,
}

impl DropCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler that bumps this counter for every dropped record.
    #[must_use]
    pub fn handler(&self) -> OverflowHandler {
        let dropped = Arc::clone(&self.dropped);
        Arc::new(move |_record: Record| {
            dropped.fetch_add(1, Ordering::Relaxed);
        })
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
