// src/common/subject.rs
//! Observable value cell.
//!
//! Holds one current value and a list of subscribers. `next` replaces the
//! value and calls every subscriber synchronously, in subscription order.
//! New subscribers are called once with the current value right away.

use std::sync::{Arc, Mutex, MutexGuard};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Subject::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

struct Inner<T> {
    value: T,
    subscribers: Vec<(u64, Callback<T>)>,
    next_id: u64,
}

/// Cloning a `Subject` yields another handle to the same cell
pub struct Subject<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Subject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: initial,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    // Callbacks never run under the lock, so a poisoned guard still holds a whole value
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn value(&self) -> T {
        self.lock().value.clone()
    }

    /// Replace the value and notify subscribers.
    ///
    /// Callbacks run after the lock is released, so they may read the cell
    /// or publish to other cells.
    pub fn next(&self, value: T) {
        let subscribers: Vec<Callback<T>> = {
            let mut inner = self.lock();
            inner.value = value.clone();
            inner.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for callback in subscribers {
            callback(&value);
        }
    }

    /// Update the value in place, then notify
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.value();
        f(&mut value);
        self.next(value);
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Callback<T> = Arc::new(callback);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::clone(&callback)));
            (id, inner.value.clone())
        };
        callback(&current);
        Subscription(id)
    }

    pub fn unsubscribe(&self, subscription: Subscription) {
        self.lock().subscribers.retain(|(id, _)| *id != subscription.0);
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}
