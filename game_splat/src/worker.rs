//! Bounded worker pool used for chunk fetches and LOD tree rebuilds
//! (spec.md §4.6).
//!
//! Grounded in the dependency set `game_tasks`'s manifest declares for its
//! own pool (`crossbeam-queue`, `parking_lot`) rather than that crate's own
//! (unavailable) implementation.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_queue::SegQueue;
use parking_lot::{Condvar, Mutex};

use game_tracing::trace_span;

type BoxedJob = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    queue: SegQueue<BoxedJob>,
    idle: Mutex<()>,
    wake: Condvar,
    shutdown: AtomicBool,
    pending: AtomicUsize,
}

/// A bounded pool of worker threads draining a shared job queue.
///
/// Unlike a general-purpose async executor, jobs here are plain
/// `FnOnce() + Send` closures: the splat core never needs a job to await
/// another job, only to run to completion and report its result through a
/// [`JobHandle`] (spec.md §9: "tasks + channels", not a full async runtime).
pub struct WorkerPool {
    shared: Arc<Shared>,
    threads: Vec<std::thread::JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(num_workers: usize) -> Self {
        let shared = Arc::new(Shared {
            queue: SegQueue::new(),
            idle: Mutex::new(()),
            wake: Condvar::new(),
            shutdown: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
        });

        let threads = (0..num_workers.max(1))
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || worker_loop(shared))
            })
            .collect();

        Self { shared, threads }
    }

    /// Queues `job`, returning a handle to poll/join its result.
    pub fn spawn<T: Send + 'static>(
        &self,
        job: impl FnOnce() -> T + Send + 'static,
    ) -> JobHandle<T> {
        let slot: Arc<Mutex<Option<std::thread::Result<T>>>> = Arc::new(Mutex::new(None));
        let handle_slot = slot.clone();

        self.shared.pending.fetch_add(1, Ordering::SeqCst);
        let shared = self.shared.clone();
        let boxed: BoxedJob = Box::new(move || {
            let _span = trace_span!("WorkerPool job").entered();
            let result = panic::catch_unwind(AssertUnwindSafe(job));
            *handle_slot.lock() = Some(result);
            shared.pending.fetch_sub(1, Ordering::SeqCst);
        });
        self.shared.queue.push(boxed);
        self.shared.wake.notify_one();

        JobHandle { slot }
    }

    /// Blocks until the queue is drained. Test-only: production code polls
    /// [`JobHandle::is_finished`] from the frame loop instead of blocking.
    #[doc(hidden)]
    pub fn drain_for_test(&self) {
        while self.shared.pending.load(Ordering::SeqCst) > 0 || !self.shared.queue.is_empty() {
            std::thread::yield_now();
        }
    }

    /// Runs `f` only if no other caller currently holds the exclusive
    /// section, returning `None` if it was already taken (spec.md §4.6
    /// `tryExclusive`: at most one LOD-tree mutation in flight at a time).
    pub fn try_exclusive<R>(guard: &AtomicBool, f: impl FnOnce() -> R) -> Option<R> {
        if guard
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let result = f();
        guard.store(false, Ordering::Release);
        Some(result)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.wake.notify_all();
        for thread in self.threads.drain(..) {
            let _ = thread.join();
        }
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        match shared.queue.pop() {
            Some(job) => job(),
            None => {
                if shared.shutdown.load(Ordering::SeqCst) {
                    return;
                }
                let mut guard = shared.idle.lock();
                shared
                    .wake
                    .wait_for(&mut guard, std::time::Duration::from_millis(10));
            }
        }
    }
}

/// A handle to a job's eventual result.
pub struct JobHandle<T> {
    slot: Arc<Mutex<Option<std::thread::Result<T>>>>,
}

impl<T> JobHandle<T> {
    /// Returns `true` once the job has run (successfully or panicked).
    pub fn is_finished(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Consumes the handle, returning the job's result. Panics if called
    /// before [`is_finished`](Self::is_finished) returns `true`.
    pub fn join(self) -> std::thread::Result<T> {
        self.slot
            .lock()
            .take()
            .expect("JobHandle::join called before the job finished")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_job_completes() {
        let pool = WorkerPool::new(2);
        let handle = pool.spawn(|| 2 + 2);
        pool.drain_for_test();
        assert!(handle.is_finished());
        assert_eq!(handle.join().unwrap(), 4);
    }

    #[test]
    fn try_exclusive_rejects_reentry() {
        let guard = AtomicBool::new(false);
        let first = WorkerPool::try_exclusive(&guard, || {
            let second = WorkerPool::try_exclusive(&guard, || 1);
            assert!(second.is_none());
            42
        });
        assert_eq!(first, Some(42));
        // The guard is released afterwards, so a later call succeeds.
        assert_eq!(WorkerPool::try_exclusive(&guard, || 7), Some(7));
    }
}
