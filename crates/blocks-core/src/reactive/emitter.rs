#![forbid(unsafe_code)]

//! Event stream without a current value.
//!
//! [`Emitter<T>`] broadcasts discrete events (key presses, backdrop clicks,
//! navigation, close results) to weakly held listeners. Once completed it
//! ignores further emissions and drops its listeners.
//!
//! Listeners are snapshotted before dispatch: a listener registered while an
//! event is being delivered does not see that event.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::observable::Subscription;

type Listener<T> = Rc<dyn Fn(&T)>;

struct Channel<T> {
    listeners: Vec<Weak<dyn Fn(&T)>>,
    completed: bool,
    emitted: u64,
}

/// Multicast event source.
pub struct Emitter<T> {
    channel: Rc<RefCell<Channel<T>>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: Rc::clone(&self.channel),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = self.channel.borrow();
        f.debug_struct("Emitter")
            .field("listeners", &channel.listeners.len())
            .field("completed", &channel.completed)
            .field("emitted", &channel.emitted)
            .finish()
    }
}

impl<T: 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Emitter<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channel: Rc::new(RefCell::new(Channel {
                listeners: Vec::new(),
                completed: false,
                emitted: 0,
            })),
        }
    }

    /// Listen for future events. Returns an inert subscription when completed.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let mut channel = self.channel.borrow_mut();
        if channel.completed {
            return Subscription::empty();
        }
        let strong: Listener<T> = Rc::new(listener);
        channel.listeners.push(Rc::downgrade(&strong));
        Subscription::hold(strong)
    }

    /// Deliver `event` to every live listener.
    ///
    /// Returns the number of listeners reached.
    pub fn emit(&self, event: &T) -> usize {
        let live: Vec<Listener<T>> = {
            let mut channel = self.channel.borrow_mut();
            if channel.completed {
                return 0;
            }
            channel.emitted += 1;
            channel.listeners.retain(|w| w.strong_count() > 0);
            channel.listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in &live {
            listener(event);
        }
        live.len()
    }

    /// Close the stream. Later emissions are dropped.
    pub fn complete(&self) {
        let mut channel = self.channel.borrow_mut();
        channel.completed = true;
        channel.listeners.clear();
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.channel.borrow().completed
    }

    /// Total events emitted so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.channel.borrow().emitted
    }

    /// Live listener count.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.channel
            .borrow()
            .listeners
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}
