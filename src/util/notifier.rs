//! Debounced subscribe/notify mechanism.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::runloop::{RunLoop, TimerId};
use crate::util::subject::Subject;

/// Handle to one subscription on a [`DebouncingNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

struct Inner<T> {
    latest: Option<T>,
    pending: Option<TimerId>,
    next_id: u64,
    subscribers: Vec<(SubscriberId, Rc<dyn Fn(&T)>)>,
}

/// Coalesces bursts of `notify` calls into a single downstream delivery.
///
/// In coalesce mode a pending delivery suppresses rescheduling, so a burst
/// produces exactly one callback at a fixed delay after the first call. In
/// renew mode every `notify` cancels and reschedules the pending delivery,
/// debouncing to quiescence. Either way the delivery carries the value of
/// the latest `notify` call, read at fire time.
pub struct DebouncingNotifier<T: 'static> {
    runloop: Rc<RunLoop>,
    delay: Duration,
    renew: bool,
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: Clone + 'static> DebouncingNotifier<T> {
    pub fn new(runloop: &Rc<RunLoop>, delay: Duration, renew: bool) -> Self {
        DebouncingNotifier {
            runloop: runloop.clone(),
            delay,
            renew,
            inner: Rc::new(RefCell::new(Inner {
                latest: None,
                pending: None,
                next_id: 1,
                subscribers: Vec::new(),
            })),
        }
    }

    /// A coalescing notifier that delivers on the next run-loop drain.
    pub fn coalescing(runloop: &Rc<RunLoop>) -> Self {
        Self::new(runloop, Duration::ZERO, false)
    }

    /// Schedules delivery of `value` to all subscribers after the delay.
    pub fn notify(&self, value: T) {
        let mut inner = self.inner.borrow_mut();
        inner.latest = Some(value);
        if let Some(pending) = inner.pending {
            if self.renew {
                self.runloop.cancel(pending);
            } else {
                return;
            }
        }
        let weak = Rc::downgrade(&self.inner);
        inner.pending = Some(self.runloop.schedule(self.delay, move || fire(&weak)));
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriberId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriberId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        id
    }

    /// Subscribes `callback` until the companion subject fires, at which
    /// point the subscription is removed automatically.
    pub fn subscribe_until(&self, callback: impl Fn(&T) + 'static, until: &Subject<()>) {
        let id = self.subscribe(callback);
        let weak = Rc::downgrade(&self.inner);
        until.subscribe(move |()| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.retain(|(sub_id, _)| *sub_id != id);
            }
        });
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.borrow_mut().subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Cancels any pending delivery and drops all subscribers.
    pub fn destroy(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(pending) = inner.pending.take() {
            self.runloop.cancel(pending);
        }
        inner.latest = None;
        inner.subscribers.clear();
    }
}

impl<T: 'static> Drop for DebouncingNotifier<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.inner.borrow_mut().pending.take() {
            self.runloop.cancel(pending);
        }
    }
}

fn fire<T: Clone>(inner: &Weak<RefCell<Inner<T>>>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let (value, subscribers) = {
        let mut inner = inner.borrow_mut();
        inner.pending = None;
        (inner.latest.take(), inner.subscribers.clone())
    };
    if let Some(value) = value {
        for (_, subscriber) in subscribers {
            subscriber(&value);
        }
    }
}
