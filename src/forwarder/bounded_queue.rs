use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
};

/// Fixed-capacity FIFO shared by many producers and one consumer.
///
/// Producers only ever call [`try_enqueue`](Self::try_enqueue), which takes the
/// lock briefly and never waits for space. The consumer waits on a condvar in
/// [`wait_dequeue`](Self::wait_dequeue) instead of polling.
///
/// A capacity of 0 is valid: every enqueue is refused.
#[derive(Debug)]
pub struct BoundedQueue<T> {
    capacity: usize,
    items: Mutex<VecDeque<T>>,
    ready: Condvar,
}

impl<T> BoundedQueue<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            ready: Condvar::new(),
        }
    }

    // A producer that panicked mid-push leaves the deque consistent, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `item` at the tail if there is room.
    ///
    /// # Errors
    /// Returns the item back, untouched, when the queue is full.
    pub fn try_enqueue(&self, item: T) -> Result<(), T> {
        let mut items = self.lock();
        if items.len() >= self.capacity {
            return Err(item);
        }
        items.push_back(item);
        drop(items);
        self.ready.notify_one();
        Ok(())
    }

    /// Removes and returns the head, if any.
    pub fn try_dequeue(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Blocks until an item is available or `stop()` returns true.
    ///
    /// `stop` is evaluated under the lock before looking at the items on every
    /// wake-up, so once it holds no further item is handed out. Returns `None`
    /// only when stopped. Whoever flips the state `stop` reads must call
    /// [`wake`](Self::wake) afterwards.
    pub fn wait_dequeue<F>(&self, stop: F) -> Option<T>
    where
        F: Fn() -> bool,
    {
        let mut items = self.lock();
        loop {
            if stop() {
                return None;
            }
            if let Some(item) = items.pop_front() {
                return Some(item);
            }
            items = self
                .ready
                .wait(items)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Wakes every waiter so it re-evaluates its stop condition.
    pub fn wake(&self) {
        // Taking the lock orders this notify after any in-progress check in
        // `wait_dequeue`, so the wake-up cannot be lost.
        let _items = self.lock();
        self.ready.notify_all();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_order_is_preserved() {
        let q = BoundedQueue::new(3);
        assert!(q.try_enqueue(1).is_ok());
        assert!(q.try_enqueue(2).is_ok());
        assert!(q.try_enqueue(3).is_ok());

        assert_eq!(q.try_dequeue(), Some(1));
        assert_eq!(q.try_dequeue(), Some(2));
        assert_eq!(q.try_dequeue(), Some(3));
        assert_eq!(q.try_dequeue(), None);
    }

    #[test]
    fn full_queue_hands_item_back() {
        let q = BoundedQueue::new(2);
        q.try_enqueue("a").expect("room for a");
        q.try_enqueue("b").expect("room for b");

        assert_eq!(q.try_enqueue("c"), Err("c"));
        assert_eq!(q.len(), 2);

        q.try_dequeue();
        assert!(q.try_enqueue("c").is_ok());
    }

    #[test]
    fn zero_capacity_refuses_everything() {
        let q = BoundedQueue::new(0);
        assert_eq!(q.try_enqueue(7), Err(7));
        assert!(q.is_empty());
        assert_eq!(q.capacity(), 0);
    }

    #[test]
    fn wait_dequeue_wakes_on_enqueue() {
        let q = Arc::new(BoundedQueue::new(4));
        let q2 = q.clone();
        let waiter = thread::spawn(move || q2.wait_dequeue(|| false));

        thread::sleep(Duration::from_millis(20));
        q.try_enqueue(99).expect("room");

        assert_eq!(waiter.join().expect("waiter panicked"), Some(99));
    }

    #[test]
    fn wait_dequeue_returns_none_once_stopped() {
        let q = Arc::new(BoundedQueue::<u32>::new(4));
        let stop = Arc::new(AtomicBool::new(false));

        let (q2, stop2) = (q.clone(), stop.clone());
        let waiter = thread::spawn(move || q2.wait_dequeue(|| stop2.load(Ordering::SeqCst)));

        thread::sleep(Duration::from_millis(20));
        stop.store(true, Ordering::SeqCst);
        q.wake();

        assert_eq!(waiter.join().expect("waiter panicked"), None);
    }

    #[test]
    fn stop_wins_over_pending_items() {
        let q = BoundedQueue::new(2);
        q.try_enqueue(1).expect("room");
        assert_eq!(q.wait_dequeue(|| true), None);
        assert_eq!(q.len(), 1, "item must stay queued");
    }
}
