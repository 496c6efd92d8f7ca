//! Observable presence store.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use super::{Presence, UserData, UserPatch};
use crate::session::LayoutData;

type Listener = Arc<dyn Fn(&UserData) + Send + Sync>;

struct Inner {
    value: UserData,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
    /// Notifications not yet delivered, oldest first.
    pending: VecDeque<(UserData, Vec<Listener>)>,
    delivering: bool,
}

impl Inner {
    fn new(value: UserData) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 0,
            pending: VecDeque::new(),
            delivering: false,
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Observable holder of the current [`UserData`].
///
/// Every change is broadcast to all subscribers in subscription order.
/// Changes made from inside a subscriber are queued and delivered after the
/// current broadcast finishes, so every subscriber sees values in the order
/// they were set. Identical values are not deduplicated.
///
/// Delivery is single-threaded: whichever call is already broadcasting also
/// delivers changes made meanwhile, including ones from other threads. On a
/// single thread, or with no broadcast in progress, subscribers have been
/// notified by the time the mutating call returns. If a subscriber panics,
/// the undelivered notifications are dropped and the store stays usable.
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct PresenceStore {
    inner: Arc<Mutex<Inner>>,
}

impl PresenceStore {
    /// Create a store holding the anonymous value.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::new(UserData::anonymous()))),
        }
    }

    /// Current value.
    pub fn get(&self) -> UserData {
        lock(&self.inner).value.clone()
    }

    /// Current value as a tagged login state.
    pub fn presence(&self) -> Presence {
        lock(&self.inner).value.presence()
    }

    /// Register a subscriber.
    ///
    /// The subscriber is called once immediately with the current value and
    /// then after every change until the returned [`Subscription`] is dropped
    /// or [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UserData) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let (id, current) = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener.clone()));
            (id, inner.value.clone())
        };
        listener(&current);

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Merge `patch` into the current value.
    ///
    /// Fields not mentioned in the patch are kept. No consistency check is
    /// made; see [`PresenceStore::presence`] for a validated view.
    pub fn update_user(&self, patch: UserPatch) {
        self.mutate(|value| value.merge(patch));
    }

    /// Reset to `{ isAuthenticated: false }`, discarding every other field.
    pub fn clear_user(&self) {
        self.mutate(|value| *value = UserData::anonymous());
    }

    /// Replace the whole value.
    pub fn set(&self, value: UserData) {
        self.mutate(|current| *current = value);
    }

    /// Seed the store from server-resolved layout data.
    ///
    /// An authenticated layout is merged in; an anonymous one clears the
    /// store.
    pub fn bootstrap(&self, layout: &LayoutData) {
        match &layout.user {
            Some(user) => self.update_user(UserPatch::from(user)),
            None => self.clear_user(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    /// Drop every subscriber and any undelivered notifications.
    ///
    /// Called when the owning UI root is torn down. The store keeps working
    /// afterwards but nobody is listening.
    pub fn dispose(&self) {
        let mut inner = lock(&self.inner);
        inner.listeners.clear();
        inner.pending.clear();
    }

    fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut UserData),
    {
        {
            let mut inner = lock(&self.inner);
            change(&mut inner.value);
            let snapshot = inner.value.clone();
            let listeners = inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            inner.pending.push_back((snapshot, listeners));
            if inner.delivering {
                return;
            }
            inner.delivering = true;
        }

        let _guard = DeliveryGuard { inner: &self.inner };
        loop {
            let next = {
                let mut inner = lock(&self.inner);
                let next = inner.pending.pop_front();
                if next.is_none() {
                    inner.delivering = false;
                }
                next
            };
            let Some((value, listeners)) = next else {
                break;
            };
            for listener in listeners {
                listener(&value);
            }
        }
    }
}

/// Releases the delivery flag if a subscriber unwinds mid-broadcast.
struct DeliveryGuard<'a> {
    inner: &'a Mutex<Inner>,
}

impl Drop for DeliveryGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut inner = lock(self.inner);
            inner.delivering = false;
            inner.pending.clear();
        }
    }
}

impl Default for PresenceStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`PresenceStore::subscribe`].
///
/// The subscriber stays registered for as long as this handle lives.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    store: Weak<Mutex<Inner>>,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the subscriber registered for the lifetime of the store.
    pub fn detach(mut self) {
        self.store = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            lock(&inner).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
