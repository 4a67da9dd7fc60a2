//! Observer registry with scoped, deterministic release.
//!
//! Every push-style feed in the crate (document store change feed, auth
//! state, the in-process task store) hands out a [`Subscription`] from a
//! [`Subscribers`] registry.
//!
//! ## Guarantees
//!
//! - Once [`Subscription::unsubscribe`] returns (or the subscription is
//!   dropped), its callback never runs again. A delivery in flight on
//!   another thread is waited for.
//! - A value published from inside a subscriber's own callback is queued and
//!   delivered to that subscriber right after the callback returns. Queued
//!   values coalesce to the latest one, as each value is a full replacement.
//! - A callback may release its own subscription.
//!
//! ## Usage
//!
//! ```rust
//! use gigtask::api::subscription::Subscribers;
//! use std::sync::{Arc, Mutex};
//!
//! let feed: Subscribers<u32> = Subscribers::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//! let subscription = feed.subscribe(move |v: &u32| sink.lock().unwrap().push(*v));
//!
//! feed.notify(&1);
//! drop(subscription);
//! feed.notify(&2);
//! assert_eq!(*seen.lock().unwrap(), vec![1]);
//! ```

use parking_lot::{Mutex, ReentrantMutex};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

type Callback<T> = Box<dyn FnMut(&T) + Send>;

struct Subscriber<T> {
    active: AtomicBool,
    // Held for the whole delivery, so a release from another thread waits.
    callback: ReentrantMutex<RefCell<Option<Callback<T>>>>,
    pending: Mutex<Option<T>>,
}

impl<T: Clone> Subscriber<T> {
    fn new(callback: Callback<T>) -> Self {
        Subscriber {
            active: AtomicBool::new(true),
            callback: ReentrantMutex::new(RefCell::new(Some(callback))),
            pending: Mutex::new(None),
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn deliver(&self, value: &T) {
        let slot = self.callback.lock();
        if !self.is_active() {
            return;
        }

        let Ok(mut callback) = slot.try_borrow_mut() else {
            // Published from inside our own callback; picked up below.
            *self.pending.lock() = Some(value.clone());
            return;
        };

        if let Some(cb) = callback.as_mut() {
            cb(value);
        }
        while self.is_active() {
            let Some(queued) = self.pending.lock().take() else {
                break;
            };
            if let Some(cb) = callback.as_mut() {
                cb(&queued);
            }
        }

        if !self.is_active() {
            callback.take();
            self.pending.lock().take();
        }
    }

    fn release(&self) {
        self.active.store(false, Ordering::Release);
        let slot = self.callback.lock();
        // Fails only when called from inside the callback; `deliver` drops it then.
        if let Ok(mut callback) = slot.try_borrow_mut() {
            callback.take();
        }
        self.pending.lock().take();
    }
}

struct Registry<T> {
    next_id: AtomicU64,
    entries: Mutex<BTreeMap<u64, Arc<Subscriber<T>>>>,
}

/// Registry of callbacks interested in values of type `T`.
pub struct Subscribers<T> {
    inner: Arc<Registry<T>>,
}

impl<T> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Subscribers { inner: self.inner.clone() }
    }
}

impl<T: Clone + Send + 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Subscribers<T> {
    pub fn new() -> Self {
        Subscribers {
            inner: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                entries: Mutex::new(BTreeMap::new()),
            }),
        }
    }

    /// Registers `callback` for every future [`notify`](Self::notify).
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.register(callback).1
    }

    /// Registers `callback`, then computes `initial` and delivers it to this
    /// subscriber alone.
    ///
    /// `initial` runs after registration, so a value published concurrently is
    /// never missed. If it fails, the subscription is released and the error
    /// returned.
    pub fn subscribe_with<F, I, E>(&self, initial: I, callback: F) -> Result<Subscription, E>
    where
        F: FnMut(&T) + Send + 'static,
        I: FnOnce() -> Result<T, E>,
    {
        let (subscriber, subscription) = self.register(callback);
        let value = initial()?;
        subscriber.deliver(&value);
        Ok(subscription)
    }

    fn register<F>(&self, callback: F) -> (Arc<Subscriber<T>>, Subscription)
    where
        F: FnMut(&T) + Send + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let subscriber = Arc::new(Subscriber::new(Box::new(callback)));
        self.inner.entries.lock().insert(id, subscriber.clone());

        let registry = Arc::downgrade(&self.inner);
        let handle = subscriber.clone();
        let subscription = Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.entries.lock().remove(&id);
            }
            handle.release();
        });
        (subscriber, subscription)
    }

    /// Delivers `value` to every live subscriber, in registration order.
    pub fn notify(&self, value: &T) {
        // Snapshot the list so callbacks may subscribe or release freely.
        let subscribers: Vec<Arc<Subscriber<T>>> = self.inner.entries.lock().values().cloned().collect();
        for subscriber in subscribers {
            subscriber.deliver(value);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// No subscribers, and no other handle that could still register one.
    pub fn is_idle(&self) -> bool {
        Arc::strong_count(&self.inner) == 1 && self.is_empty()
    }
}

/// Handle to a registered callback. Releasing it is idempotent; dropping it releases.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Subscription {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Subscription { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl FnMut(&u32) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |v: &u32| sink.lock().push(*v))
    }

    #[test]
    fn test_no_delivery_after_unsubscribe() {
        let feed = Subscribers::new();
        let (seen, callback) = recorder();
        let mut subscription = feed.subscribe(callback);

        feed.notify(&1);
        subscription.unsubscribe();
        subscription.unsubscribe();
        feed.notify(&2);

        assert_eq!(*seen.lock(), vec![1]);
        assert!(feed.is_empty());
        assert!(!subscription.is_active());
    }

    #[test]
    fn test_subscribe_with_delivers_initial_value_only_to_new_subscriber() {
        let feed = Subscribers::new();
        let (first, callback) = recorder();
        let _a = feed.subscribe(callback);
        let (second, callback) = recorder();
        let _b = feed.subscribe_with(|| Ok::<_, ()>(7), callback).unwrap();

        assert!(first.lock().is_empty());
        assert_eq!(*second.lock(), vec![7]);
    }

    #[test]
    fn test_subscribe_with_failing_initial_releases() {
        let feed: Subscribers<u32> = Subscribers::new();
        let (seen, callback) = recorder();
        let result = feed.subscribe_with(|| Err("offline"), callback);

        assert_eq!(result.unwrap_err(), "offline");
        feed.notify(&1);
        assert!(seen.lock().is_empty());
        assert!(feed.is_empty());
    }

    #[test]
    fn test_nested_notify_is_queued_and_coalesced() {
        let feed: Subscribers<u32> = Subscribers::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let inner_feed = feed.clone();
        let _subscription = feed.subscribe(move |v: &u32| {
            sink.lock().push(*v);
            if *v == 1 {
                inner_feed.notify(&2);
                inner_feed.notify(&3);
            }
        });

        feed.notify(&1);
        assert_eq!(*seen.lock(), vec![1, 3]);
    }

    #[test]
    fn test_release_from_inside_callback() {
        let feed: Subscribers<u32> = Subscribers::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let own = slot.clone();
        let subscription = feed.subscribe(move |v: &u32| {
            sink.lock().push(*v);
            if let Some(mut me) = own.lock().take() {
                me.unsubscribe();
            }
        });
        *slot.lock() = Some(subscription);

        feed.notify(&1);
        feed.notify(&2);
        assert_eq!(*seen.lock(), vec![1]);
        assert!(feed.is_empty());
    }

    #[test]
    fn test_unsubscribe_waits_for_in_flight_delivery() {
        let feed: Subscribers<u32> = Subscribers::new();
        let (started_tx, started_rx) = mpsc::channel();
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let mut subscription = feed.subscribe(move |_: &u32| {
            let _ = started_tx.send(());
            thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
        });

        let publisher = feed.clone();
        let worker = thread::spawn(move || publisher.notify(&1));
        started_rx.recv().unwrap();
        subscription.unsubscribe();

        assert!(finished.load(Ordering::SeqCst));
        worker.join().unwrap();
    }
}
