#![forbid(unsafe_code)]

//! One-shot value that may arrive later.
//!
//! A [`Deferred<T>`] starts pending and resolves at most once. Continuations
//! registered with [`Deferred::then`] run exactly once: immediately when the
//! value is already present, otherwise at resolution time. Continuations
//! live inside the deferred, so dropping every handle to a pending deferred
//! drops its continuations unrun.
//!
//! # Invariants
//!
//! 1. The first `resolve` wins; later calls return `false` and change nothing.
//! 2. Continuations run outside any internal borrow and in registration order.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::emitter::Emitter;
use super::observable::Subscription;

type Continuation<T> = Box<dyn FnOnce(T)>;

struct Pending<T> {
    value: Option<T>,
    waiters: Vec<Continuation<T>>,
    source: Option<Subscription>,
}

/// Pending-or-resolved single value.
pub struct Deferred<T> {
    cell: Rc<RefCell<Pending<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.borrow();
        f.debug_struct("Deferred")
            .field("value", &cell.value)
            .field("waiters", &cell.waiters.len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::pending()
    }
}

impl<T: Clone + 'static> Deferred<T> {
    #[must_use]
    pub fn pending() -> Self {
        Self {
            cell: Rc::new(RefCell::new(Pending {
                value: None,
                waiters: Vec::new(),
                source: None,
            })),
        }
    }

    /// Already-resolved deferred.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        let deferred = Self::pending();
        deferred.cell.borrow_mut().value = Some(value);
        deferred
    }

    /// Resolve with the first event `emitter` delivers, mapped through `map`.
    ///
    /// The listener is released once the value arrives. If the emitter
    /// completes first, the deferred stays pending.
    pub fn first_of<E: 'static>(
        emitter: &Emitter<E>,
        map: impl Fn(&E) -> T + 'static,
    ) -> Self {
        let deferred = Self::pending();
        let weak: Weak<RefCell<Pending<T>>> = Rc::downgrade(&deferred.cell);
        let subscription = emitter.subscribe(move |event| {
            if let Some(cell) = weak.upgrade() {
                Deferred { cell }.resolve(map(event));
            }
        });
        let mut cell = deferred.cell.borrow_mut();
        if cell.value.is_none() {
            cell.source = Some(subscription);
        }
        drop(cell);
        deferred
    }

    /// Store `value` and run pending continuations. Returns `false` if
    /// already resolved.
    pub fn resolve(&self, value: T) -> bool {
        let waiters = {
            let mut cell = self.cell.borrow_mut();
            if cell.value.is_some() {
                return false;
            }
            cell.value = Some(value.clone());
            cell.source = None;
            std::mem::take(&mut cell.waiters)
        };
        for waiter in waiters {
            waiter(value.clone());
        }
        true
    }

    /// Run `f` with the value once available.
    pub fn then(&self, f: impl FnOnce(T) + 'static) {
        let ready = self.cell.borrow().value.clone();
        match ready {
            Some(value) => f(value),
            None => self.cell.borrow_mut().waiters.push(Box::new(f)),
        }
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.cell.borrow().value.is_some()
    }

    /// The resolved value, if any.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.cell.borrow().value.clone()
    }

    /// Derived deferred resolving with `f(value)`.
    pub fn map<U: Clone + 'static>(&self, f: impl FnOnce(T) -> U + 'static) -> Deferred<U> {
        let out = Deferred::pending();
        let sink = out.clone();
        self.then(move |value| {
            sink.resolve(f(value));
        });
        out
    }
}
