use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError, Weak,
    atomic::{AtomicBool, Ordering},
};

struct Listener {
    fire: Box<dyn FnOnce() + Send>,
    live: Box<dyn Fn() -> bool + Send>,
}

struct Inner {
    cancelled: AtomicBool,
    listeners: Mutex<Vec<Listener>>,
}

/// One-shot stop signal shared between whoever owns the forwarder's lifetime
/// and its consumer thread.
///
/// Cloning shares the same signal. It moves from active to cancelled once and
/// never resets; cancelling again is a no-op.
///
/// A forwarder's consumer thread runs until its signal fires, so every
/// forwarder created on a signal lives at least that long. Give each forwarder
/// its own signal unless they are meant to stop together.
#[derive(Clone)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

impl CancellationSignal {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Cancels the signal and runs every registered listener.
    ///
    /// Returns `true` for the call that performed the transition, `false` if
    /// the signal was already cancelled.
    pub fn cancel(&self) -> bool {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        let listeners = std::mem::take(&mut *self.lock_listeners());
        for listener in listeners {
            (listener.fire)();
        }
        true
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Registers `listener` to run once on cancellation.
    ///
    /// Runs it right away, on the calling thread, if the signal is already
    /// cancelled.
    pub fn on_cancel<F>(&self, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.register(Listener {
            fire: Box::new(listener),
            live: Box::new(|| true),
        });
    }

    /// Like [`on_cancel`](Self::on_cancel), but only holds `target` weakly.
    ///
    /// Once `target` is dropped the listener is skipped on cancellation and
    /// pruned the next time any listener is registered.
    pub fn on_cancel_weak<T, F>(&self, target: &Arc<T>, listener: F)
    where
        T: Send + Sync + 'static,
        F: FnOnce(&T) + Send + 'static,
    {
        let fire_ref = Arc::downgrade(target);
        let live_ref = Weak::clone(&fire_ref);
        self.register(Listener {
            fire: Box::new(move || {
                if let Some(target) = fire_ref.upgrade() {
                    listener(&target);
                }
            }),
            live: Box::new(move || live_ref.strong_count() > 0),
        });
    }

    fn register(&self, listener: Listener) {
        let mut listeners = self.lock_listeners();
        // `cancel` sets the flag before draining under this lock, so checking
        // here cannot miss a concurrent cancellation.
        if self.is_cancelled() {
            drop(listeners);
            (listener.fire)();
        } else {
            listeners.retain(|l| (l.live)());
            listeners.push(listener);
        }
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Listeners registered and not yet fired or pruned.
    #[must_use]
    pub fn pending_listeners(&self) -> usize {
        self.lock_listeners().len()
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancellationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
