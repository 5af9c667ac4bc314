//! Delayed-callback schedulers.
//!
//! Animations never sleep. Each tick asks a [`Scheduler`] to run the next
//! tick after a delay and keeps the returned [`TimerId`] so that it can be
//! cancelled. [`TokioScheduler`] uses real timers; [`ManualScheduler`] runs
//! on a virtual clock so tests can step through an animation exactly.

use std::{
    cmp::{Ordering, Reverse},
    collections::{BinaryHeap, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{runtime::Handle, task::AbortHandle};

/// A callback queued for later execution.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Identifies a scheduled callback for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

pub trait Scheduler: Clone + Send + Sync + 'static {
    /// Run `task` once `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerId;

    /// Drop a pending callback. Unknown or already-fired ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
pub fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Tokio timers
// ---------------------------------------------------------------------------

/// Schedules callbacks as sleeping tasks on a tokio runtime.
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
    timers: Arc<Mutex<TokioTimers>>,
}

#[derive(Default)]
struct TokioTimers {
    next_id: u64,
    pending: HashMap<u64, AbortHandle>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(Mutex::new(TokioTimers::default())),
        }
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        lock(&self.timers).pending.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerId {
        // Held until the abort handle is registered, so the spawned task
        // always finds its own entry.
        let mut timers = lock(&self.timers);
        let id = timers.next_id;
        timers.next_id += 1;

        let registry = Arc::clone(&self.timers);
        let join = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let live = lock(&registry).pending.remove(&id).is_some();
            if live {
                task();
            }
        });
        timers.pending.insert(id, join.abort_handle());
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = lock(&self.timers).pending.remove(&id.0) {
            handle.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Virtual clock
// ---------------------------------------------------------------------------

struct QueuedTask {
    due: Duration,
    /// Insertion order, for deterministic tie-breaking.
    sequence: u64,
    task: Task,
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.sequence == other.sequence
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

#[derive(Default)]
struct ManualQueue {
    now: Duration,
    sequence: u64,
    queue: BinaryHeap<Reverse<QueuedTask>>,
}

/// A deterministic scheduler driven by explicit calls.
///
/// Time only moves when [`run_next`](Self::run_next) or
/// [`advance`](Self::advance) is called. Tasks due at the same instant run
/// in the order they were scheduled.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time, measured from creation.
    pub fn now(&self) -> Duration {
        lock(&self.inner).now
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        lock(&self.inner).queue.len()
    }

    /// Due time of the earliest queued task.
    pub fn next_due(&self) -> Option<Duration> {
        lock(&self.inner).queue.peek().map(|Reverse(t)| t.due)
    }

    /// Jump to the earliest queued task and run it.
    ///
    /// Returns `false` when nothing is queued.
    pub fn run_next(&self) -> bool {
        let next = {
            let mut inner = lock(&self.inner);
            let next = inner.queue.pop();
            if let Some(Reverse(ref queued)) = next {
                inner.now = inner.now.max(queued.due);
            }
            next
        };
        match next {
            // The lock is released so the task may schedule its successor.
            Some(Reverse(queued)) => {
                (queued.task)();
                true
            }
            None => false,
        }
    }

    /// Move the clock forward by `by`, running every task that falls due.
    ///
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        while self.next_due().is_some_and(|due| due <= target) {
            self.run_next();
            ran += 1;
        }
        lock(&self.inner).now = target;
        ran
    }

    /// Run queued tasks until none remain or `limit` have run.
    pub fn run_until_idle(&self, limit: usize) -> usize {
        let mut ran = 0;
        while ran < limit && self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerId {
        let mut inner = lock(&self.inner);
        let sequence = inner.sequence;
        inner.sequence += 1;
        let due = inner.now + delay;
        inner.queue.push(Reverse(QueuedTask {
            due,
            sequence,
            task,
        }));
        TimerId(sequence)
    }

    fn cancel(&self, id: TimerId) {
        lock(&self.inner)
            .queue
            .retain(|Reverse(queued)| queued.sequence != id.0);
    }
}
