use crate::runtime::task::Task;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::thread;

/// A per-worker double-ended task queue.
///
/// `WorkStealingQueue` is owned by one worker thread but shared by
/// reference with every other worker of the pool:
///
/// - the owner pushes and pops at the **front** (LIFO), which keeps the
///   most recently produced work hot in its cache,
/// - stealers remove from the **back** (FIFO), taking the oldest work,
///   so the owner and a stealer touch opposite ends.
///
/// The whole sequence sits behind a single mutex. Every operation takes
/// that guard, performs an O(1) or O(batch) edit and releases it before
/// returning; nothing is ever executed while it is held.
///
/// Only [`push`](Self::push) can wait. Every other operation tries the
/// guard once and reports failure when it is contended, leaving the
/// queue untouched.
///
/// The queue is deliberately not `Clone`: share it through an `Arc`.
pub struct WorkStealingQueue<T = Task> {
    /// Tasks, front = owner end, back = steal end.
    deque: Mutex<VecDeque<T>>,

    /// Length mirror, only written while `deque` is locked.
    ///
    /// Read without the guard for the empty fast-path, so it may be
    /// stale by the time the guard is taken.
    len: AtomicUsize,
}

impl<T> WorkStealingQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            deque: Mutex::new(VecDeque::new()),
            len: AtomicUsize::new(0),
        }
    }

    /// Inserts a task at the front, waiting for the guard if needed.
    ///
    /// The guard is retried with a [`thread::yield_now`] between
    /// attempts until it is acquired. The task is never dropped; the
    /// call can only be delayed by peers holding the guard.
    pub fn push(&self, task: T) {
        loop {
            if let Some(mut deque) = self.try_guard() {
                deque.push_front(task);
                self.len.store(deque.len(), Ordering::Release);
                return;
            }

            thread::yield_now();
        }
    }

    /// Tries to insert a task at the back without waiting.
    ///
    /// # Errors
    ///
    /// Returns the task back to the caller when the guard is held by
    /// another thread, so it can be routed elsewhere.
    pub fn try_push(&self, task: T) -> Result<(), T> {
        match self.try_guard() {
            Some(mut deque) => {
                deque.push_back(task);
                self.len.store(deque.len(), Ordering::Release);
                Ok(())
            }
            None => Err(task),
        }
    }

    /// Tries to remove the front task.
    ///
    /// Returns `None` when the queue is empty or the guard is contended.
    pub fn try_pop(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let mut deque = self.try_guard()?;
        let task = deque.pop_front();
        self.len.store(deque.len(), Ordering::Release);

        task
    }

    /// Moves up to `max` tasks from the front into `batch`.
    ///
    /// Tasks are appended in removal order under a single guard
    /// acquisition. Returns `true` if at least one task was moved.
    pub fn try_pop_batch(&self, batch: &mut Vec<T>, max: usize) -> bool {
        self.drain_into(batch, max, VecDeque::pop_front)
    }

    /// Tries to remove the back task.
    ///
    /// Returns `None` when the queue is empty or the guard is contended.
    pub fn try_steal(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let mut deque = self.try_guard()?;
        let task = deque.pop_back();
        self.len.store(deque.len(), Ordering::Release);

        task
    }

    /// Moves up to `max` tasks from the back into `batch`.
    ///
    /// Tasks are appended in removal order (oldest first) under a single
    /// guard acquisition. Returns `true` if at least one task was moved.
    pub fn try_steal_batch(&self, batch: &mut Vec<T>, max: usize) -> bool {
        self.drain_into(batch, max, VecDeque::pop_back)
    }

    /// Number of queued tasks.
    ///
    /// Exact when no other thread is operating on the queue, otherwise
    /// a snapshot that may already be outdated.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns `true` if the queue currently holds no task.
    ///
    /// Same caveat as [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn drain_into(
        &self,
        batch: &mut Vec<T>,
        max: usize,
        mut take: impl FnMut(&mut VecDeque<T>) -> Option<T>,
    ) -> bool {
        if max == 0 || self.is_empty() {
            return false;
        }

        let Some(mut deque) = self.try_guard() else {
            return false;
        };

        let before = batch.len();
        while batch.len() - before < max {
            match take(&mut *deque) {
                Some(task) => batch.push(task),
                None => break,
            }
        }
        self.len.store(deque.len(), Ordering::Release);

        batch.len() > before
    }

    /// Attempts to take the guard once.
    ///
    /// Poisoning is recovered from: no task code ever runs under the
    /// guard, so the deque is consistent whenever a holder unwinds.
    fn try_guard(&self) -> Option<MutexGuard<'_, VecDeque<T>>> {
        match self.deque.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

impl<T> Default for WorkStealingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::WorkStealingQueue;

    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn test_contended_guard_fails_without_mutating() {
        let queue = WorkStealingQueue::new();
        queue.push(1);
        queue.push(2);

        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        thread::scope(|scope| {
            let holder = &queue;
            scope.spawn(move || {
                let _guard = holder.deque.lock().unwrap();
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            });

            locked_rx.recv().unwrap();

            let mut batch = vec![0];
            assert_eq!(queue.try_pop(), None);
            assert_eq!(queue.try_steal(), None);
            assert!(!queue.try_pop_batch(&mut batch, 2));
            assert!(!queue.try_steal_batch(&mut batch, 2));
            assert_eq!(batch, vec![0]);
            assert_eq!(queue.try_push(3), Err(3));
            assert_eq!(queue.len(), 2);

            release_tx.send(()).unwrap();
        });

        assert_eq!(queue.try_pop(), Some(2));
        assert_eq!(queue.try_steal(), Some(1));
        assert!(queue.is_empty());
    }
}
