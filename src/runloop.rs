//! Single-threaded deferred-call and timer queue.
//!
//! The host shell delivers every signal on one cooperative run loop; this
//! type is the crate's handle to that loop. The embedder advances the clock
//! with real elapsed time and drains the queue after posting events; tests
//! drive both manually, which makes all debounced behavior deterministic.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

/// Handle to a scheduled one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct TimerEntry {
    id: TimerId,
    due: Duration,
    callback: Box<dyn FnOnce()>,
}

/// Deferred calls, one-shot timers and a monotonic clock, all on the
/// current thread. Callbacks may freely post, schedule and cancel from
/// within a callback; they run after the current one returns.
pub struct RunLoop {
    now: Cell<Duration>,
    next_timer: Cell<u64>,
    queue: RefCell<VecDeque<Box<dyn FnOnce()>>>,
    timers: RefCell<Vec<TimerEntry>>,
}

impl RunLoop {
    pub fn new() -> Rc<Self> {
        Rc::new(RunLoop {
            now: Cell::new(Duration::ZERO),
            next_timer: Cell::new(1),
            queue: RefCell::new(VecDeque::new()),
            timers: RefCell::new(Vec::new()),
        })
    }

    /// The current monotonic time. Starts at zero and only moves through
    /// [`RunLoop::advance`].
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Defers a call to the next drain of the queue.
    pub fn post(&self, callback: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(callback));
    }

    /// Schedules `callback` to run once `delay` has elapsed. A zero delay
    /// fires on the next drain.
    pub fn schedule(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        self.timers.borrow_mut().push(TimerEntry {
            id,
            due: self.now.get() + delay,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancels a pending timer. Unknown or already-fired ids are ignored.
    pub fn cancel(&self, timer: TimerId) {
        self.timers.borrow_mut().retain(|entry| entry.id != timer);
    }

    /// Runs all queued calls and all timers due at the current time,
    /// including ones queued while draining.
    pub fn drain(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            if let Some(callback) = next {
                callback();
                continue;
            }
            match self.take_due_timer(self.now.get()) {
                Some(entry) => (entry.callback)(),
                None => break,
            }
        }
    }

    /// Moves the clock forward by `dt`, firing timers in due order and
    /// draining the queue between them.
    pub fn advance(&self, dt: Duration) {
        let target = self.now.get() + dt;
        loop {
            self.drain();
            let Some(entry) = self.take_due_timer(target) else {
                break;
            };
            if entry.due > self.now.get() {
                self.now.set(entry.due);
            }
            trace!(timer = entry.id.0, "timer fired");
            (entry.callback)();
        }
        self.now.set(target);
        self.drain();
    }

    /// Removes and returns the earliest timer due at or before `at`.
    /// Ties break by scheduling order.
    fn take_due_timer(&self, at: Duration) -> Option<TimerEntry> {
        let mut timers = self.timers.borrow_mut();
        let position = timers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= at)
            .min_by_key(|(_, entry)| (entry.due, entry.id.0))
            .map(|(position, _)| position)?;
        Some(timers.remove(position))
    }
}
