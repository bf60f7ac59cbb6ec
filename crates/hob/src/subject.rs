// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Replay-latest broadcast channel.
//!
//! A [`Subject`] remembers the last value it emitted. New subscribers are called
//! right away with that value (or `None` if nothing was emitted yet), and then
//! synchronously for every subsequent value, in emission order.
//!
//! Values emitted by a subscriber while a delivery is in progress are queued
//! and delivered once every subscriber has seen the current value.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Subscriber<T> = Rc<dyn Fn(Option<&T>)>;

struct Inner<T> {
    latest: RefCell<Option<T>>,
    subscribers: RefCell<Vec<(u64, Subscriber<T>)>>,
    next_id: Cell<u64>,
    delivering: Cell<bool>,
    pending: RefCell<VecDeque<T>>,
}

pub struct Subject<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Subject {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for Subject<T> {
    fn default() -> Self {
        Subject::new()
    }
}

impl<T: Clone + 'static> Subject<T> {
    pub fn new() -> Self {
        Subject {
            inner: Rc::new(Inner {
                latest: RefCell::new(None),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                delivering: Cell::new(false),
                pending: RefCell::new(VecDeque::new()),
            }),
        }
    }

    /// Register a subscriber. It is called immediately with the latest value.
    ///
    /// The subscriber stays registered for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping a Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, subscriber: F) -> Subscription
    where
        F: Fn(Option<&T>) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let subscriber: Subscriber<T> = Rc::new(subscriber);

        self.inner
            .subscribers
            .borrow_mut()
            .push((id, subscriber.clone()));

        let latest = self.latest();
        subscriber(latest.as_ref());

        let weak: Weak<Inner<T>> = Rc::downgrade(&self.inner);

        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    /// Store `value` as the latest and deliver it to every subscriber.
    pub fn next(&self, value: T) {
        self.inner.pending.borrow_mut().push_back(value);

        if self.inner.delivering.replace(true) {
            return;
        }

        loop {
            let value = match self.inner.pending.borrow_mut().pop_front() {
                Some(value) => value,
                None => break,
            };

            self.deliver(value);
        }

        self.inner.delivering.set(false);
    }

    fn deliver(&self, value: T) {
        *self.inner.latest.borrow_mut() = Some(value.clone());

        // Subscribers may subscribe or unsubscribe while being called.
        let subscribers: Vec<Subscriber<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect();

        for subscriber in subscribers {
            subscriber(Some(&value));
        }
    }

    /// Most recently emitted value.
    pub fn latest(&self) -> Option<T> {
        self.inner.latest.borrow().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// Keeps a subscriber registered. Dropping it unsubscribes.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Keep the subscriber registered for the lifetime of the subject.
    pub fn forget(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
