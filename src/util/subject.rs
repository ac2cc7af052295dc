//! Observable value cell.

use std::cell::RefCell;
use std::rc::Rc;

/// Handle to one subscription on a [`Subject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Inner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Rc<dyn Fn(&T)>)>,
}

/// A value cell with change subscriptions.
///
/// Subscribers are invoked in registration order, after the new value has
/// been stored. Every registration is reversible through the returned
/// [`SubscriptionId`]; `complete` drops all subscribers at once.
pub struct Subject<T> {
    inner: RefCell<Inner<T>>,
}

impl<T: Clone> Subject<T> {
    pub fn new(value: T) -> Self {
        Subject {
            inner: RefCell::new(Inner {
                value,
                next_id: 1,
                subscribers: Vec::new(),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Stores `value` and notifies all subscribers. Subscribers may
    /// subscribe or unsubscribe from within their callback; such changes
    /// take effect for the next notification.
    pub fn set(&self, value: T) {
        let subscribers = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.subscribers.clone()
        };
        let value = self.inner.borrow().value.clone();
        for (_, subscriber) in subscribers {
            subscriber(&value);
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        id
    }

    /// Like `subscribe`, but also invokes the callback immediately with the
    /// current value.
    pub fn subscribe_with_current(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = self.subscribe(callback);
        let (value, subscriber) = {
            let inner = self.inner.borrow();
            let subscriber = inner
                .subscribers
                .iter()
                .find(|(sub_id, _)| *sub_id == id)
                .map(|(_, cb)| cb.clone());
            (inner.value.clone(), subscriber)
        };
        if let Some(subscriber) = subscriber {
            subscriber(&value);
        }
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.borrow_mut().subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Drops all subscribers. The stored value stays readable.
    pub fn complete(&self) {
        self.inner.borrow_mut().subscribers.clear();
    }
}
