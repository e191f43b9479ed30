#![forbid(unsafe_code)]

//! Shared value with change notification.
//!
//! [`Observable<T>`] keeps a value behind `Rc<RefCell<..>>`. A `set` that
//! changes the value (by `PartialEq`) bumps the version and notifies every
//! live subscriber in registration order. Viewport dimensions, modal state
//! and theme values are all published through this type.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 per value-changing mutation.
//! 2. Setting an equal value is a no-op.
//! 3. No borrow is held while subscriber callbacks run, so a callback may
//!    read or write the same observable.
//! 4. Subscribers are held weakly; dropping the [`Subscription`] detaches
//!    the callback before the next notification.
//!
//! # Failure Modes
//!
//! - A callback that keeps writing different values into its own source
//!   recurses without bound. Subscribers must converge.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Slot<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<dyn Fn(&T)>>,
}

/// A shared, version-tracked value.
///
/// Clones are handles onto the same slot.
pub struct Observable<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Observable")
            .field("value", &slot.value)
            .field("version", &slot.version)
            .field("subscribers", &slot.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable at version 0 with no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` must not write to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.slot.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    ///
    /// Returns `true` when the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut slot = self.slot.borrow_mut();
            if slot.value == value {
                return false;
            }
            slot.value = value;
            slot.version += 1;
        }
        self.notify();
        true
    }

    /// Mutate in place; subscribers run only if the result differs.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let changed = {
            let mut slot = self.slot.borrow_mut();
            let before = slot.value.clone();
            f(&mut slot.value);
            if slot.value == before {
                false
            } else {
                slot.version += 1;
                true
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Register `callback` for future changes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Callback<T> = Rc::new(callback);
        self.slot
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription::hold(strong)
    }

    /// Register `callback` and invoke it once with the current value.
    pub fn subscribe_current(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let current = self.get();
        callback(&current);
        self.subscribe(callback)
    }

    /// Version counter; increments once per change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.borrow().version
    }

    /// Registered subscribers, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.slot.borrow().subscribers.len()
    }

    fn notify(&self) {
        let (value, live): (T, Vec<Callback<T>>) = {
            let mut slot = self.slot.borrow_mut();
            slot.subscribers.retain(|w| w.strong_count() > 0);
            let live = slot.subscribers.iter().filter_map(Weak::upgrade).collect();
            (slot.value.clone(), live)
        };
        for callback in &live {
            callback(&value);
        }
    }
}

/// RAII guard keeping a subscriber callback alive.
///
/// Dropping it releases the only strong reference, so the weak entry in the
/// source fails to upgrade from then on.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl Subscription {
    pub(crate) fn hold<G: 'static>(guard: G) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }

    /// A subscription that holds nothing.
    pub fn empty() -> Self {
        Self::hold(())
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
